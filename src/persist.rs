//! Writing the reconciled store back to disk

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SkeletonizeError};
use crate::store::{self, PersistedStore};

/// Write `store` to `ini_file`, replacing it wholesale.
///
/// Fails with [`SkeletonizeError::TargetExists`] without touching the file when
/// it already exists and `overwrite` is false.
pub fn save_config<P: AsRef<Path>>(store: &PersistedStore, ini_file: P, overwrite: bool) -> Result<()> {
    let path = ini_file.as_ref();
    if !overwrite && path.exists() {
        return Err(SkeletonizeError::TargetExists {
            path: path.to_path_buf(),
        });
    }

    let io_error = |source| SkeletonizeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    store::write(store, &mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
