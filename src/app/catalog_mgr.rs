// MaintLog - app/catalog_mgr.rs
//
// Selects the pattern catalog for a run: the embedded built-in catalog, or a
// user-supplied TOML file that replaces it entirely.

use crate::core::catalog::{self, PatternCatalog};
use crate::platform::fs::read_file_lossy;
use crate::util::constants;
use crate::util::error::CatalogError;
use std::path::Path;

/// Load the catalog to run with.
///
/// `user_catalog` (from `--catalog` or `[catalog] path`) wins when set; a
/// broken user catalog is an error, never a silent fallback to the built-in.
pub fn load_catalog(user_catalog: Option<&Path>) -> Result<PatternCatalog, CatalogError> {
    let catalog = match user_catalog {
        Some(path) => load_catalog_file(path)?,
        None => catalog::load_builtin_catalog()?,
    };

    tracing::info!(
        catalog_id = %catalog.id,
        version = %catalog.version,
        builtin = catalog.is_builtin,
        rules = catalog.rules.len(),
        "Pattern catalog ready"
    );
    Ok(catalog)
}

/// Load a single user-defined catalog file.
fn load_catalog_file(path: &Path) -> Result<PatternCatalog, CatalogError> {
    let metadata = std::fs::metadata(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_CATALOG_FILE_SIZE {
        return Err(CatalogError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_CATALOG_FILE_SIZE,
        });
    }

    let content = read_file_lossy(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let def = catalog::parse_catalog_toml(&content, path)?;
    catalog::validate_and_compile(def, path, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Category;

    #[test]
    fn test_builtin_when_no_user_catalog() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.is_builtin);
        assert!(catalog.rule_count(Category::Symptom) > 0);
    }

    #[test]
    fn test_user_catalog_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydraulics.toml");
        std::fs::write(
            &path,
            r#"
[catalog]
id = "hydraulics"
name = "Hydraulic presses"

[[rules]]
label = "COMPONENT"
kind = "surface"
words = ["ram", "valve"]
"#,
        )
        .unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.id, "hydraulics");
        assert!(!catalog.is_builtin);
        assert_eq!(catalog.rules.len(), 1);
        assert_eq!(catalog.rule_count(Category::Action), 0);
    }

    #[test]
    fn test_missing_user_catalog_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_oversized_user_catalog_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.toml");
        let padding = "#".repeat(constants::MAX_CATALOG_FILE_SIZE as usize + 1);
        std::fs::write(&path, padding).unwrap();
        assert!(matches!(
            load_catalog(Some(&path)),
            Err(CatalogError::FileTooLarge { .. })
        ));
    }
}
