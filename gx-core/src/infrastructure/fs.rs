// gx-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Write content to a file atomically using a temporary file.
///
/// The target file is either fully written or not written at all.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    // Same directory as the target so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    // Atomic rename (persist)
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Writes `content` only when `path` does not exist yet. Returns whether it wrote.
pub fn write_if_missing<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<bool, InfrastructureError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, content)?;
    Ok(true)
}

/// Indented listing of a directory: each directory line is followed by its
/// files, then its subdirectories, sorted by name, four spaces per level.
pub fn directory_tree(root: &Path) -> Result<String, InfrastructureError> {
    let mut out = String::new();
    let walker = WalkDir::new(root).sort_by(|a, b| {
        (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            InfrastructureError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;
        let indent = " ".repeat(4 * entry.depth());
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            out.push_str(&format!("{}{}/\n", indent, name));
        } else {
            out.push_str(&format!("{}{}\n", indent, name));
        }
    }
    Ok(out)
}
