// File: src/dictionaries.rs
//! Per-identity store of the replacement table and the named correction
//! dictionaries, persisted as one JSON document per identity.

use crate::core::replacements::ReplacementTable;
use crate::core::types::{CorrectionDictionary, DictionaryMap, ImportOutcome};
use crate::errors::{DictionaryError, Result};
use crate::persistence::{json_destination, write_atomic};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// The persisted document. A missing field falls back to its default; a
/// present but malformed field fails the whole load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    replacements: ReplacementTable,
    #[serde(default)]
    dictionaries: DictionaryMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionDictionaryStore {
    storage_root: PathBuf,
    /// Replacement table a new identity starts with.
    default_replacements: ReplacementTable,
    replacements: ReplacementTable,
    dictionaries: DictionaryMap,
}

impl CorrectionDictionaryStore {
    /// An empty store with the built-in replacement table.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            default_replacements: ReplacementTable::default(),
            replacements: ReplacementTable::default(),
            dictionaries: DictionaryMap::new(),
        }
    }

    /// Uses `replacements` instead of the built-in table for identities
    /// without a stored document, and as the current table.
    pub fn with_default_replacements(mut self, replacements: ReplacementTable) -> Self {
        self.replacements = replacements.clone();
        self.default_replacements = replacements;
        self
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    pub fn document_path(&self, identity: &str) -> PathBuf {
        self.storage_root.join(format!("{identity}.json"))
    }

    pub fn replacements(&self) -> &ReplacementTable {
        &self.replacements
    }

    pub fn replacements_mut(&mut self) -> &mut ReplacementTable {
        &mut self.replacements
    }

    pub fn dictionaries(&self) -> &DictionaryMap {
        &self.dictionaries
    }

    pub fn dictionary(&self, name: &str) -> Option<&CorrectionDictionary> {
        self.dictionaries.get(name)
    }

    pub fn dictionary_names(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    pub fn remove_dictionary(&mut self, name: &str) -> Option<CorrectionDictionary> {
        self.dictionaries.remove(name)
    }

    /// Records a single correction, creating the dictionary if needed.
    pub fn add_correction(&mut self, name: &str, source: &str, target: &str) {
        if source.is_empty() {
            return;
        }
        self.dictionaries
            .entry(name.to_string())
            .or_default()
            .insert(source.to_string(), target.to_string());
    }

    /// Reads the document of `identity`. Without one, the defaults (no
    /// dictionaries, the default replacement table) are persisted as its
    /// first document and become the in-memory state.
    pub fn load(&mut self, identity: &str) -> Result<()> {
        let path = self.document_path(identity);
        if !path.is_file() {
            info!(%identity, "no dictionaries stored yet, writing defaults");
            let document = StoreDocument {
                replacements: self.default_replacements.clone(),
                dictionaries: DictionaryMap::new(),
            };
            write_document(&path, &document)?;
            self.replacements = document.replacements;
            self.dictionaries = document.dictionaries;
            info!(%identity, path = %path.display(), "saved dictionaries");
            return Ok(());
        }

        let document = fs::read_to_string(&path)
            .map_err(|e| DictionaryError::io(&path, e))
            .and_then(|raw| Ok(serde_json::from_str::<StoreDocument>(&raw)?))
            .inspect_err(|e| error!(path = %path.display(), "could not parse dictionaries: {e}"))?;

        self.replacements = document.replacements;
        self.dictionaries = document.dictionaries;
        info!(
            %identity,
            dictionaries = self.dictionaries.len(),
            "parsed dictionaries"
        );
        Ok(())
    }

    /// Overwrites the document of `identity` with the in-memory state.
    pub fn save(&self, identity: &str) -> Result<()> {
        let path = self.document_path(identity);
        let document = StoreDocument {
            replacements: self.replacements.clone(),
            dictionaries: self.dictionaries.clone(),
        };
        write_document(&path, &document)?;
        info!(%identity, path = %path.display(), "saved dictionaries");
        Ok(())
    }

    /// Installs `raw_document` under `name`, replacing any dictionary of that
    /// name. The document must be a flat object of strings; any other shape
    /// is rejected without touching the store. Unparseable JSON is an error.
    pub fn import_dictionary(&mut self, name: &str, raw_document: &str) -> Result<ImportOutcome> {
        let value: Value = serde_json::from_str(raw_document)
            .inspect_err(|e| error!(%name, "could not parse import: {e}"))?;

        let outcome = match value {
            Value::Object(map) => {
                let mut dictionary = CorrectionDictionary::new();
                let mut bad_key = None;
                for (key, value) in map {
                    match value {
                        Value::String(target) => {
                            dictionary.insert(key, target);
                        }
                        _ => {
                            bad_key = Some(key);
                            break;
                        }
                    }
                }
                match bad_key {
                    None => {
                        info!(%name, entries = dictionary.len(), "imported dictionary");
                        self.dictionaries.insert(name.to_string(), dictionary);
                        ImportOutcome::Applied
                    }
                    Some(key) => {
                        ImportOutcome::rejected(format!("value of '{key}' is not a string"))
                    }
                }
            }
            _ => ImportOutcome::rejected("document is not a flat object"),
        };

        if let ImportOutcome::Rejected(reason) = &outcome {
            warn!(%name, %reason, "dictionary import rejected");
        }
        Ok(outcome)
    }

    /// Serializes dictionary `name` (an empty object when unknown). With a
    /// destination the JSON is written to `<dir>/<stem>.json` and `None` is
    /// returned; otherwise the JSON is returned.
    pub fn export_dictionary(&self, name: &str, destination: Option<&Path>) -> Result<Option<String>> {
        let empty = CorrectionDictionary::new();
        let dictionary = self.dictionaries.get(name).unwrap_or(&empty);
        let data = serde_json::to_string_pretty(dictionary)?;

        let Some(destination) = destination else {
            return Ok(Some(data));
        };

        let path = json_destination(destination, name);
        write_atomic(&path, data.as_bytes())
            .map_err(|e| DictionaryError::io(&path, e))
            .inspect_err(|e| error!("could not execute export: {e}"))?;
        info!(%name, path = %path.display(), "exported dictionary");
        Ok(None)
    }
}

fn write_document(path: &Path, document: &StoreDocument) -> Result<()> {
    let data = serde_json::to_string_pretty(document)?;
    write_atomic(path, data.as_bytes())
        .map_err(|e| DictionaryError::io(path, e))
        .inspect_err(|e| error!("could not save dictionaries: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> CorrectionDictionaryStore {
        CorrectionDictionaryStore::new(dir.path().join("json"))
    }

    #[test]
    fn load_creates_document_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = store(&dir);
        first.load("user-1").unwrap();
        assert!(first.document_path("user-1").is_file());

        let mut second = store(&dir);
        second.load("user-1").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn first_use_starts_from_defaults_not_previous_identity() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        s.load("alice").unwrap();
        s.add_correction("fix", "mundo", "planet");
        s.replacements_mut().insert("ß", "ss");
        s.save("alice").unwrap();

        s.load("bob").unwrap();
        assert!(s.dictionaries().is_empty());
        assert_eq!(s.replacements(), &ReplacementTable::default());

        let mut fresh = store(&dir);
        fresh.load("bob").unwrap();
        assert!(fresh.dictionaries().is_empty());

        let mut alice = store(&dir);
        alice.load("alice").unwrap();
        assert_eq!(alice.dictionary("fix").unwrap()["mundo"], "planet");
    }

    #[test]
    fn first_use_seeds_configured_replacements() {
        let dir = tempfile::tempdir().unwrap();
        let mut seed = ReplacementTable::empty();
        seed.insert("œ", "oe");
        let mut s = store(&dir).with_default_replacements(seed.clone());
        s.replacements_mut().insert("x", "y");

        s.load("new").unwrap();
        assert_eq!(s.replacements(), &seed);

        let mut reloaded = store(&dir);
        reloaded.load("new").unwrap();
        assert_eq!(reloaded.replacements(), &seed);
    }

    #[test]
    fn failed_save_keeps_previous_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        s.add_correction("fix", "mundo", "planet");
        s.save("u").unwrap();
        let saved = fs::read_to_string(s.document_path("u")).unwrap();

        let blocked = s.document_path("v");
        fs::create_dir_all(&blocked).unwrap();
        fs::write(blocked.join("keep"), "old").unwrap();
        s.add_correction("fix", "hola", "hi");
        assert!(matches!(s.save("v"), Err(DictionaryError::Io { .. })));

        assert_eq!(fs::read_to_string(blocked.join("keep")).unwrap(), "old");
        assert_eq!(fs::read_to_string(s.document_path("u")).unwrap(), saved);
        let mut entries: Vec<_> = fs::read_dir(s.storage_root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        entries.sort();
        assert_eq!(entries, ["u.json", "v.json"]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut original = store(&dir);
        original.add_correction("es", "mundo", "planet");
        original.replacements_mut().insert("ß", "ss");
        original.save("u").unwrap();

        let mut loaded = store(&dir);
        loaded.load("u").unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_fields_default_independently() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        fs::create_dir_all(s.storage_root()).unwrap();
        fs::write(s.document_path("u"), r#"{"dictionaries": {"d": {"a": "b"}}}"#).unwrap();
        s.load("u").unwrap();
        assert_eq!(s.replacements(), &ReplacementTable::default());
        assert_eq!(s.dictionary("d").unwrap()["a"], "b");
    }

    #[test]
    fn malformed_document_fails_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        s.add_correction("keep", "x", "y");
        fs::create_dir_all(s.storage_root()).unwrap();
        fs::write(s.document_path("u"), r#"{"dictionaries": {"d": {"a": 1}}}"#).unwrap();

        let before = s.clone();
        assert!(matches!(s.load("u"), Err(DictionaryError::Json(_))));
        assert_eq!(s, before);
    }

    #[test]
    fn save_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();
        let s = CorrectionDictionaryStore::new(&blocker);
        assert!(matches!(s.save("u"), Err(DictionaryError::Io { .. })));
    }

    #[test]
    fn import_accepts_flat_string_objects() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        let outcome = s.import_dictionary("fix", r#"{"mundo": "planet"}"#).unwrap();
        assert!(outcome.is_applied());
        assert_eq!(s.dictionary("fix").unwrap()["mundo"], "planet");

        s.import_dictionary("fix", r#"{"hola": "hi"}"#).unwrap();
        assert_eq!(s.dictionary("fix").unwrap().len(), 1);
    }

    #[test]
    fn import_rejects_other_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        s.add_correction("fix", "old", "entry");
        let before = s.dictionaries().clone();

        for doc in [r#"{"a": 1}"#, r#"{"a": {"b": "c"}}"#, r#"["a"]"#, r#""a""#, "null"] {
            let outcome = s.import_dictionary("fix", doc).unwrap();
            assert!(!outcome.is_applied(), "{doc} should be rejected");
        }
        assert_eq!(s.dictionaries(), &before);
    }

    #[test]
    fn import_of_unparseable_text_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        assert!(matches!(
            s.import_dictionary("fix", "{not json"),
            Err(DictionaryError::Json(_))
        ));
        assert!(s.dictionaries().is_empty());
    }

    #[test]
    fn export_unknown_name_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        assert_eq!(s.export_dictionary("fix", None).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn export_to_file_normalizes_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = store(&dir);
        s.add_correction("fix", "mundo", "planet");
        let written = s
            .export_dictionary("fix", Some(&dir.path().join("mine.txt")))
            .unwrap();
        assert!(written.is_none());

        let raw = fs::read_to_string(dir.path().join("mine.json")).unwrap();
        let mut other = store(&dir);
        assert!(other.import_dictionary("fix", &raw).unwrap().is_applied());
        assert_eq!(other.dictionary("fix"), s.dictionary("fix"));
    }
}
