use std::fs;
use std::path::Path;

use crate::{StoreError, StoreResult};

pub(crate) fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn ensure_parent(path: &Path) -> StoreResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    Ok(())
}

/// Replace `path` with `bytes` via a sibling temp file.
pub(crate) fn write_replace(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    ensure_parent(path)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).map_err(io_err(path))?;
    Ok(())
}
