//! Loading usernames (and their account metadata) from input files.

use anyhow::{bail, Context, Result};
use handlecheck_core::{AccountMetadata, Username};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Usernames to check, in input order, plus whatever metadata came with them.
#[derive(Debug, Default)]
pub struct RunInput {
    pub usernames: Vec<Username>,
    pub metadata: HashMap<Username, AccountMetadata>,
    seen: HashSet<Username>,
}

impl RunInput {
    /// Load a `.json` account list or a plain file with one username per line.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let input = if is_json {
            Self::parse_json(&contents)
                .with_context(|| format!("invalid account list in {}", path.display()))?
        } else {
            Self::parse_lines(&contents)
        };

        debug!(
            "Loaded {} usernames from {}",
            input.usernames.len(),
            path.display()
        );
        Ok(input)
    }

    /// Parse a JSON array of account objects.
    ///
    /// Every field of an object is kept as that username's metadata. Objects
    /// without a non-blank `username` string are skipped.
    pub fn parse_json(contents: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(contents)?;
        let Value::Array(entries) = value else {
            bail!("expected a JSON array of account objects");
        };

        let mut input = Self::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let Value::Object(fields) = entry else {
                warn!("Skipping entry {}: not an object", index);
                continue;
            };
            let Some(name) = fields.get("username").and_then(Value::as_str) else {
                warn!("Skipping entry {}: no username", index);
                continue;
            };
            let Ok(username) = Username::new(name.trim()) else {
                warn!("Skipping entry {}: blank username", index);
                continue;
            };
            input.push(username, Some(AccountMetadata::new(fields)));
        }
        Ok(input)
    }

    /// Parse one username per line, ignoring blank lines.
    #[must_use]
    pub fn parse_lines(contents: &str) -> Self {
        let mut input = Self::default();
        for line in contents.lines() {
            if let Ok(username) = Username::new(line.trim()) {
                input.push(username, None);
            }
        }
        input
    }

    /// Add usernames given directly on the command line.
    pub fn extend_inline(&mut self, names: &[String]) {
        for name in names {
            match Username::new(name.trim()) {
                Ok(username) => {
                    self.push(username, None);
                }
                Err(e) => warn!("Ignoring --username {:?}: {}", name, e),
            }
        }
    }

    /// Add a username unless it is already present. The first occurrence wins.
    pub fn push(&mut self, username: Username, metadata: Option<AccountMetadata>) -> bool {
        if !self.seen.insert(username.clone()) {
            debug!("Dropping duplicate username {}", username);
            return false;
        }
        if let Some(metadata) = metadata {
            self.metadata.insert(username.clone(), metadata);
        }
        self.usernames.push(username);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn names(input: &RunInput) -> Vec<&str> {
        input.usernames.iter().map(Username::as_str).collect()
    }

    #[test]
    fn test_parse_lines_trims_and_skips_blanks() {
        let input = RunInput::parse_lines("alice\n\n  bob  \n\t\ncarol\r\n");
        assert_eq!(names(&input), vec!["alice", "bob", "carol"]);
        assert!(input.metadata.is_empty());
    }

    #[test]
    fn test_parse_lines_drops_duplicates_keeping_order() {
        let input = RunInput::parse_lines("bob\nalice\nbob\n");
        assert_eq!(names(&input), vec!["bob", "alice"]);
    }

    #[test]
    fn test_parse_json_keeps_all_fields() {
        let input = RunInput::parse_json(
            r#"[
                {"username": "alice", "password": "hunter2", "note": 3},
                {"username": "bob"}
            ]"#,
        )
        .unwrap();

        assert_eq!(names(&input), vec!["alice", "bob"]);
        let alice = &input.metadata[&Username::new("alice").unwrap()];
        assert_eq!(alice.get("password"), Some(&json!("hunter2")));
        assert_eq!(alice.get("note"), Some(&json!(3)));
    }

    #[test]
    fn test_parse_json_skips_entries_without_username() {
        let input = RunInput::parse_json(
            r#"[{"email": "x@example.com"}, {"username": "   "}, 42, {"username": "carol"}]"#,
        )
        .unwrap();
        assert_eq!(names(&input), vec!["carol"]);
    }

    #[test]
    fn test_parse_json_first_duplicate_wins() {
        let input = RunInput::parse_json(
            r#"[{"username": "alice", "tag": "first"}, {"username": "alice", "tag": "second"}]"#,
        )
        .unwrap();
        assert_eq!(input.usernames.len(), 1);
        let alice = &input.metadata[&Username::new("alice").unwrap()];
        assert_eq!(alice.get("tag"), Some(&json!("first")));
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        assert!(RunInput::parse_json(r#"{"username": "alice"}"#).is_err());
        assert!(RunInput::parse_json("not json").is_err());
    }

    #[test]
    fn test_extend_inline_merges_with_file_input() {
        let mut input = RunInput::parse_lines("alice\n");
        input.extend_inline(&["bob".to_string(), "alice".to_string(), " ".to_string()]);
        assert_eq!(names(&input), vec!["alice", "bob"]);
    }

    #[test]
    fn test_from_file_detects_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("accounts.JSON");
        fs::write(&json_path, r#"[{"username": "alice"}]"#).unwrap();
        let input = RunInput::from_file(&json_path).unwrap();
        assert_eq!(names(&input), vec!["alice"]);
        assert!(input.metadata.contains_key(&Username::new("alice").unwrap()));

        let txt_path = dir.path().join("names.txt");
        let mut file = fs::File::create(&txt_path).unwrap();
        writeln!(file, "bob\ncarol").unwrap();
        let input = RunInput::from_file(&txt_path).unwrap();
        assert_eq!(names(&input), vec!["bob", "carol"]);
    }

    #[test]
    fn test_from_file_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunInput::from_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read input file"));
    }

    #[test]
    fn test_empty_input() {
        assert!(RunInput::parse_lines("\n\n").is_empty());
        assert!(RunInput::parse_json("[]").unwrap().is_empty());
    }
}
