use std::path::Path;

use crate::error::Result;
use crate::models::Briefing;

/// Pretty-printed JSON with two-space indentation; non-ASCII text is kept as-is.
pub fn to_json(briefing: &Briefing) -> Result<String> {
    Ok(serde_json::to_string_pretty(briefing)?)
}

pub fn write_briefing(path: &Path, briefing: &Briefing) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_json(briefing)?)?;
    Ok(())
}
