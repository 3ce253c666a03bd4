//! Referrer database suppliers.

use std::path::PathBuf;

use crate::parser::ReferrerDatabase;

/// Source of referrer databases. Suppliers never fail: when their own source
/// is unusable they fall back to the bundled snapshot.
pub trait DatabaseSupplier: Send + Sync {
    /// Current database. `force_refresh` asks the supplier to bypass any
    /// cached copy it keeps.
    fn referrer_database(&self, force_refresh: bool) -> ReferrerDatabase;
}

/// Supplies the database compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDatabase;

impl DatabaseSupplier for BundledDatabase {
    fn referrer_database(&self, _force_refresh: bool) -> ReferrerDatabase {
        ReferrerDatabase::bundled()
    }
}

/// Supplies a database read from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileDatabase {
    path: PathBuf,
}

impl FileDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatabaseSupplier for FileDatabase {
    fn referrer_database(&self, _force_refresh: bool) -> ReferrerDatabase {
        match ReferrerDatabase::from_path(&self.path) {
            Ok(database) if !database.is_empty() => database,
            Ok(_) => {
                log::warn!(
                    "Referrer database '{}' has no providers, using bundled database",
                    self.path.display()
                );
                ReferrerDatabase::bundled()
            }
            Err(err) => {
                log::warn!(
                    "Failed to load referrer database '{}': {err}; using bundled database",
                    self.path.display()
                );
                ReferrerDatabase::bundled()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("refattr-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn file_database_reads_json() {
        let path = temp_file(
            "custom.json",
            r#"{"search": {"Example Search": {"domains": ["search.example"], "parameters": ["s"]}}}"#,
        );
        let db = FileDatabase::new(&path).referrer_database(false);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(db.len(), 1);
        assert_eq!(db.entries()[0].provider, "Example Search");
    }

    #[test]
    fn file_database_falls_back_to_bundled() {
        let missing = FileDatabase::new("/nonexistent/referers.json").referrer_database(true);
        assert_eq!(missing, ReferrerDatabase::bundled());

        let path = temp_file("invalid.json", "not json");
        let invalid = FileDatabase::new(&path).referrer_database(false);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(invalid, ReferrerDatabase::bundled());
    }

    #[test]
    fn suppliers_are_object_safe() {
        let suppliers: Vec<Box<dyn DatabaseSupplier>> =
            vec![Box::new(BundledDatabase), Box::new(FileDatabase::new("/nonexistent"))];
        for supplier in &suppliers {
            assert!(!supplier.referrer_database(false).is_empty());
        }
    }
}
