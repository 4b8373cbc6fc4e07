use crate::coerce::text_from_value;
use crate::judge::{AuditOutcome, JudgeService};
use crate::model::{CampaignContext, Issue, NarrativeSet, Severity};
use crate::rules::codes;
use serde_json::Value;

/// Runs the auditor. Never fails: every error becomes `AuditOutcome::Failed`.
pub(crate) async fn run_audit(
    svc: &JudgeService,
    context: &CampaignContext,
    narratives: &NarrativeSet,
) -> AuditOutcome {
    match call_auditor_impl(svc, context, narratives).await {
        Ok((issues, model)) => AuditOutcome::Merged { issues, model },
        Err(e) => AuditOutcome::Failed {
            reason: format!("{:#}", e),
        },
    }
}

async fn call_auditor_impl(
    svc: &JudgeService,
    context: &CampaignContext,
    narratives: &NarrativeSet,
) -> anyhow::Result<(Vec<Issue>, String)> {
    let client = svc
        .client
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("LLM client not configured"))?;
    let request = super::prompt::build_request(&svc.config.llm, context, narratives);
    let resp = client.complete(&request).await?;
    let issues = parse_audit_issues(&resp.text)?;
    let model = if resp.model.is_empty() {
        request.model
    } else {
        resp.model
    };
    Ok((issues, model))
}

/// Extracts issues from the first JSON value in `text`.
///
/// Accepts `{"issues": [...]}`, `{"findings": [...]}` or a bare array.
/// Entries without a message are dropped; an unknown severity becomes WARN
/// and a missing code becomes `LLM_AUDIT`.
pub(crate) fn parse_audit_issues(text: &str) -> anyhow::Result<Vec<Issue>> {
    let text = text.trim();
    let json_start_idx = text
        .find(['{', '['])
        .ok_or_else(|| anyhow::anyhow!("No JSON start ({{ or [) found in auditor output"))?;
    let val: Value = serde_json::Deserializer::from_str(&text[json_start_idx..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No JSON value found in extracted text"))?
        .map_err(|e| anyhow::anyhow!("Invalid JSON: {}", e))?;

    let entries = match &val {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => obj
            .get("issues")
            .or_else(|| obj.get("findings"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| anyhow::anyhow!("Auditor JSON missing 'issues' array"))?,
        _ => anyhow::bail!("Auditor JSON is neither an object nor an array"),
    };

    Ok(entries.iter().filter_map(coerce_issue).collect())
}

fn coerce_issue(entry: &Value) -> Option<Issue> {
    let obj = entry.as_object()?;
    let message = obj.get("message").and_then(text_from_value)?;
    let code = obj
        .get("code")
        .and_then(text_from_value)
        .unwrap_or_else(|| codes::LLM_AUDIT.to_string());
    let severity = obj
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .unwrap_or(Severity::Warn);
    let issue = Issue::new(code, severity, message);
    Some(match obj.get("evidence").and_then(text_from_value) {
        Some(evidence) => issue.with_evidence(evidence),
        None => issue,
    })
}
