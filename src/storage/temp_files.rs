//! Temp file storage for files handed over by the UI (e.g. a resume upload)

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Build `<epoch-millis>_<file_name>`
pub fn temp_file_name(file_name: &str, now: SystemTime) -> String {
    let millis = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    format!("{}_{}", millis, file_name)
}

/// Reject anything that is not a bare file name
fn validate_file_name(file_name: &str) -> io::Result<()> {
    let bare = Path::new(file_name)
        .file_name()
        .map(|name| name == std::ffi::OsStr::new(file_name))
        .unwrap_or(false);

    if bare {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid file name: {:?}", file_name),
        ))
    }
}

/// Write `contents` into `temp_dir` under a timestamped name and return the
/// absolute path. The directory is created if needed.
pub async fn save_temp_file(temp_dir: &Path, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
    validate_file_name(file_name)?;

    tokio::fs::create_dir_all(temp_dir).await?;

    let path = std::path::absolute(temp_dir.join(temp_file_name(file_name, SystemTime::now())))?;
    tokio::fs::write(&path, contents).await?;

    info!("Saved {} bytes to {:?}", contents.len(), path);
    Ok(path)
}
