// File: src/glossary.rs
use crate::core::segmenter::bare;
use crate::decoder::Translator;
use crate::errors::{BoxError, GlossaryError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Word-for-word translator backed by a flat glossary. Words without an
/// entry are passed through unchanged.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTranslator {
    entries: HashMap<String, String>,
}

impl GlossaryTranslator {
    pub fn new(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(source, target)| (source.to_lowercase(), target))
            .collect();
        Self { entries }
    }

    /// Reads a flat JSON object of strings.
    pub fn from_file(path: &Path) -> Result<Self, GlossaryError> {
        let raw = fs::read_to_string(path).map_err(|source| GlossaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "loaded glossary");
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn word(&self, source: &str) -> String {
        if let Some(target) = self.entries.get(&source.to_lowercase()) {
            return target.clone();
        }
        let core = bare(source);
        match self.entries.get(&core.to_lowercase()) {
            Some(target) if !core.is_empty() => source.replacen(core, target, 1),
            _ => source.to_string(),
        }
    }
}

impl Translator for GlossaryTranslator {
    fn translate_words(&self, words: &[String], _: &str, _: &str) -> Result<Vec<String>, BoxError> {
        Ok(words.iter().map(|w| self.word(w)).collect())
    }

    fn translate_sentences(&self, sentences: &[String], _: &str, _: &str) -> Result<Vec<String>, BoxError> {
        Ok(sentences
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .map(|w| self.word(w))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect())
    }
}
