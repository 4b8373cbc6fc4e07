use crate::model::{JudgeVerdict, Severity};
use std::path::Path;

/// Plain-text verdict summary. Deterministic, unit-testable.
#[must_use]
pub fn render_console(verdict: &JudgeVerdict) -> String {
    let mut lines = Vec::new();
    let (icon, status) = if verdict.pass {
        ("✅", "PASS")
    } else {
        ("❌", "FAIL")
    };
    lines.push(format!(
        "{} {}  score {}/100  campaign {}",
        icon, status, verdict.score, verdict.context.campaign_id
    ));

    for severity in [Severity::Blocker, Severity::Warn, Severity::Nit] {
        let group: Vec<_> = verdict
            .issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("{} ({})", severity, group.len()));
        for issue in group {
            lines.push(format!("  {:<28} {}", issue.code, issue.message));
            if let Some(evidence) = &issue.evidence {
                lines.push(format!("      evidence: {}", evidence));
            }
        }
    }

    if !verdict.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations".to_string());
        for r in &verdict.recommendations {
            lines.push(format!("  → {}", r));
        }
    }

    if !verdict.requires_regeneration.is_empty() {
        let phases: Vec<&str> = verdict
            .requires_regeneration
            .iter()
            .map(|p| p.as_str())
            .collect();
        lines.push(String::new());
        lines.push(format!("Regenerate: {}", phases.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!("Flags: {}", verdict.flags.join(" ")));
    if let Some(meta) = &verdict.meta {
        let model = meta.model.as_deref().unwrap_or("failed");
        lines.push(format!("LLM audit: {}", model));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn write_json(verdict: &JudgeVerdict, out: &Path) -> anyhow::Result<()> {
    std::fs::write(out, serde_json::to_string_pretty(verdict)?)?;
    Ok(())
}
