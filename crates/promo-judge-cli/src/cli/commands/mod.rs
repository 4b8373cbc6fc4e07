mod dispatch;
pub mod judge;
pub mod signals;

pub use dispatch::dispatch;

use std::io::Read;
use std::path::Path;

/// Reads a file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))
}
