// File: src/serializer.rs
//! Portable JSON form of a decoded session, independent of the dictionary
//! store.

use crate::core::session::DecodeSession;
use crate::core::types::ImportOutcome;
use crate::persistence::{json_destination, write_atomic};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionDocument {
    pub title: String,
    pub source_words: Vec<String>,
    pub target_words: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

impl From<&DecodeSession> for SessionDocument {
    fn from(session: &DecodeSession) -> Self {
        let language = |l: &str| (!l.is_empty()).then(|| l.to_string());
        Self {
            title: session.title().to_string(),
            source_words: session.source_words().to_vec(),
            target_words: session.target_words().to_vec(),
            source_language: language(session.source_language()),
            target_language: language(session.target_language()),
        }
    }
}

pub fn export(session: &DecodeSession) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SessionDocument::from(session))
}

/// Writes the export to `<dir>/<stem>.json` and returns that path.
pub fn export_to_file(session: &DecodeSession, destination: &Path) -> std::io::Result<PathBuf> {
    let path = json_destination(destination, session.display_title());
    let data = export(session)?;
    write_atomic(&path, data.as_bytes())?;
    info!(path = %path.display(), words = session.len(), "exported session");
    Ok(path)
}

/// Loads an exported session. Anything that is not a well formed document
/// with aligned columns is rejected and the session is left untouched.
pub fn import_(session: &mut DecodeSession, document: &str) -> ImportOutcome {
    let outcome = match serde_json::from_str::<SessionDocument>(document) {
        Err(e) => ImportOutcome::rejected(format!("not a session document: {e}")),
        Ok(doc) if doc.source_words.len() != doc.target_words.len() => ImportOutcome::rejected(
            format!(
                "{} source words but {} target words",
                doc.source_words.len(),
                doc.target_words.len()
            ),
        ),
        Ok(doc) => {
            let languages = doc.source_language.zip(doc.target_language);
            session.adopt_imported(doc.title, doc.source_words, doc.target_words, languages);
            info!(words = session.len(), "imported session");
            ImportOutcome::Applied
        }
    };

    if let ImportOutcome::Rejected(reason) = &outcome {
        warn!(%reason, "session import rejected");
    }
    outcome
}

pub fn import_file(session: &mut DecodeSession, path: &Path) -> std::io::Result<ImportOutcome> {
    let document = fs::read_to_string(path)?;
    Ok(import_(session, &document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::replacements::ReplacementTable;

    fn decoded() -> DecodeSession {
        let mut session = DecodeSession::new("Hola mundo", "es", "en");
        session.set_title("Saludo");
        session
            .set_words(
                vec!["Hola".into(), "mundo".into()],
                vec!["Hello".into(), "world".into()],
            )
            .unwrap();
        session
    }

    #[test]
    fn export_then_import_restores_columns() {
        let original = decoded();
        let document = export(&original).unwrap();

        let mut restored = DecodeSession::default();
        assert!(import_(&mut restored, &document).is_applied());
        assert_eq!(restored.title(), "Saludo");
        assert_eq!(restored.source_words(), original.source_words());
        assert_eq!(restored.target_words(), original.target_words());
        assert_eq!(restored.target_language(), "en");
    }

    #[test]
    fn imported_columns_survive_the_split_gate() {
        let mut session = DecodeSession::default();
        import_(&mut session, &export(&decoded()).unwrap());
        assert!(!session.split_text(&ReplacementTable::default()));
        assert_eq!(session.target_words(), ["Hello", "world"]);
    }

    #[test]
    fn rejects_bad_documents_without_mutation() {
        let mut session = decoded();
        let before = session.clone();
        for document in [
            "not json",
            "[]",
            r#"{"title": "t", "source_words": ["a"]}"#,
            r#"{"title": "t", "source_words": ["a"], "target_words": []}"#,
            r#"{"title": "t", "source_words": [1], "target_words": ["a"]}"#,
        ] {
            assert!(!import_(&mut session, document).is_applied(), "{document}");
        }
        assert_eq!(session, before);
    }

    #[test]
    fn export_to_file_uses_json_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_file(&decoded(), &dir.path().join("book.pdf")).unwrap();
        assert_eq!(path, dir.path().join("book.json"));

        let mut session = DecodeSession::default();
        assert!(import_file(&mut session, &path).unwrap().is_applied());
        assert_eq!(session.len(), 2);
    }
}
