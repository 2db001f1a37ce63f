//! Writing the active-accounts subset to disk.

use anyhow::{Context, Result};
use handlecheck_core::AccountMetadata;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Stem used when there is no input file (inline usernames only).
const INLINE_STEM: &str = "usernames";

/// Export file for a run: `<dir>/final_<input stem>.json`.
pub fn export_path(dir: &Path, input: Option<&Path>) -> PathBuf {
    let stem = input
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(INLINE_STEM);
    dir.join(format!("final_{stem}.json"))
}

/// Write `accounts` as a pretty-printed JSON array, creating `path`'s
/// parent directory if needed.
pub fn write_active_accounts(path: &Path, accounts: &[AccountMetadata]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let contents = serde_json::to_string_pretty(accounts)?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;

    info!("Exported {} active accounts to {}", accounts.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlecheck_core::Username;
    use serde_json::{json, Value};

    #[test]
    fn test_export_path_uses_input_stem() {
        let path = export_path(Path::new("/out"), Some(Path::new("/data/accounts.json")));
        assert_eq!(path, PathBuf::from("/out/final_accounts.json"));
    }

    #[test]
    fn test_export_path_without_input() {
        let path = export_path(Path::new("/out"), None);
        assert_eq!(path, PathBuf::from("/out/final_usernames.json"));
    }

    #[test]
    fn test_write_active_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("final_list.json");

        let mut fields = serde_json::Map::new();
        fields.insert("username".to_string(), json!("alice"));
        fields.insert("password".to_string(), json!("hunter2"));
        let accounts = vec![
            AccountMetadata::new(fields),
            AccountMetadata::minimal(&Username::new("bob").unwrap()),
        ];

        write_active_accounts(&path, &accounts).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains('\n'), "output should be pretty-printed");
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            json!([
                {"username": "alice", "password": "hunter2"},
                {"username": "bob"}
            ])
        );
    }

    #[test]
    fn test_write_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("final_empty.json");

        write_active_accounts(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
