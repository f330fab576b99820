use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use noema_core::model::BuildInfo;
use time::OffsetDateTime;

use crate::output;

pub fn run(out: &Path) -> Result<()> {
    let info = BuildInfo::from_parts(
        git(&["rev-parse", "HEAD"]).as_deref(),
        git(&["rev-parse", "--abbrev-ref", "HEAD"]).as_deref(),
        OffsetDateTime::now_utc(),
    );
    write(out, &info)?;
    output::status(true, &format!("wrote {}", out.display()));
    output::print(&info)
}

/// Trimmed stdout of a successful git invocation.
fn git(args: &[&str]) -> Option<String> {
    let out = Command::new("git").args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8(out.stdout).ok()?;
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

pub fn write(path: &Path, info: &BuildInfo) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let mut json = serde_json::to_string_pretty(info)?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
