//! Teacher credential lookup.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("credential lookup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Username to password mapping for teacher accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    passwords: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TeacherFile {
    #[serde(default)]
    teachers: Vec<TeacherEntry>,
}

#[derive(Deserialize)]
struct TeacherEntry {
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            passwords: pairs
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    /// Parse `{"teachers": [{"username": .., "password": ..}, ..]}`.
    /// Entries missing either field are skipped.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let file: TeacherFile = serde_json::from_str(contents)?;
        Ok(Self {
            passwords: file
                .teachers
                .into_iter()
                .filter_map(|t| Some((t.username?, t.password?)))
                .collect(),
        })
    }

    /// Exact, case-sensitive match of both username and password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.passwords
            .get(username)
            .is_some_and(|expected| expected == password)
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

/// Source of teacher credentials, consulted on every login attempt.
///
/// `load` may block; callers run it off the async executor.
pub trait CredentialStore: Send + Sync + 'static {
    fn load(&self) -> Result<Credentials, CredentialStoreError>;
}

/// Fixed in-memory credentials.
impl CredentialStore for Credentials {
    fn load(&self) -> Result<Credentials, CredentialStoreError> {
        Ok(self.clone())
    }
}

/// Credentials read from a JSON file on each call.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for JsonFileStore {
    fn load(&self) -> Result<Credentials, CredentialStoreError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Credentials::from_json(&contents).map_err(|source| CredentialStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verify_is_exact_and_case_sensitive() {
        let creds = Credentials::from_pairs([("teacher1", "pw1")]);
        assert!(creds.verify("teacher1", "pw1"));
        assert!(!creds.verify("teacher1", "PW1"));
        assert!(!creds.verify("Teacher1", "pw1"));
        assert!(!creds.verify("teacher1", "pw1 "));
        assert!(!creds.verify("nobody", "x"));
    }

    #[test]
    fn from_json_skips_incomplete_entries() {
        let creds = Credentials::from_json(
            r#"{"teachers": [
                {"username": "teacher1", "password": "pw1"},
                {"username": "nopass"},
                {"password": "nouser"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(creds.len(), 1);
        assert!(creds.verify("teacher1", "pw1"));
    }

    #[test]
    fn from_json_without_teachers_key_is_empty() {
        let creds = Credentials::from_json("{}").unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn file_store_rereads_on_every_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"teachers": [{{"username": "a", "password": "1"}}]}}"#).unwrap();
        let store = JsonFileStore::new(file.path());
        assert!(store.load().unwrap().verify("a", "1"));

        std::fs::write(
            file.path(),
            r#"{"teachers": [{"username": "a", "password": "2"}]}"#,
        )
        .unwrap();
        let creds = store.load().unwrap();
        assert!(!creds.verify("a", "1"));
        assert!(creds.verify("a", "2"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("teachers.json"));
        assert!(matches!(store.load(), Err(CredentialStoreError::Io { .. })));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let store = JsonFileStore::new(file.path());
        assert!(matches!(store.load(), Err(CredentialStoreError::Parse { .. })));
    }
}
