// MaintLog - platform/fs.rs
//
// Filesystem helpers: lossy reads for user-supplied text files and atomic
// whole-file replacement for pipeline outputs.

use crate::util::error::ExportError;
use std::fs::File;
use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Replace `path` with content produced by `write`, atomically.
///
/// The content goes to a temporary file in the destination directory which
/// is renamed over `path` only after `write` succeeds. On any error the
/// destination is left exactly as it was. Missing parent directories are
/// created.
pub fn replace_file_atomically<T, F>(path: &Path, write: F) -> Result<T, ExportError>
where
    F: FnOnce(&mut File) -> Result<T, ExportError>,
{
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
    let value = write(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %path.display(), "Output file replaced");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_replace_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.jsonl");

        replace_file_atomically(&path, |f| {
            f.write_all(b"first\nsecond\n").map_err(|e| ExportError::Io {
                path: path.clone(),
                source: e,
            })
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        replace_file_atomically(&path, |f| {
            f.write_all(b"third\n").map_err(|e| ExportError::Io {
                path: path.clone(),
                source: e,
            })
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "third\n");
    }

    #[test]
    fn test_failed_write_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        std::fs::write(&path, "previous run\n").unwrap();

        let result: Result<(), ExportError> = replace_file_atomically(&path, |_| {
            Err(ExportError::Io {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::Other, "boom"),
            })
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous run\n");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file was not cleaned up");
    }

    #[test]
    fn test_read_file_lossy_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, b"id = \"a\xffb\"").unwrap();
        let content = read_file_lossy(&path).unwrap();
        assert!(content.contains('\u{fffd}'));
    }
}
