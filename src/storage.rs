use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;
use uuid::Uuid;

/// Reduce a client-supplied filename to its final path component.
///
/// Returns `None` for names that cannot name a file inside the upload
/// directory (empty, `.`, `..`).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or("");
    match last {
        "" | "." | ".." => None,
        name if name.contains('\0') => None,
        name => Some(name.to_string()),
    }
}

/// Write `bytes` to `dir/filename`.
///
/// The data lands in a uniquely named temporary file first and is renamed
/// into place, so two uploads with the same name never mix their bytes.
pub async fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let target = dir.join(filename);
    let staging = dir.join(format!(".{}.part", Uuid::new_v4().simple()));

    if let Err(e) = fs::write(&staging, bytes).await {
        discard(&staging).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&staging, &target).await {
        discard(&staging).await;
        return Err(e);
    }

    Ok(target)
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("[storage] Failed to remove staging file {:?}: {}", path, e);
        }
    }
}
