// File: src/core/session.rs
use crate::core::fingerprint::Fingerprint;
use crate::core::replacements::ReplacementTable;
use crate::core::segmenter;
use crate::errors::AlignmentError;
use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "decoded";

/// One text being decoded: the source, its aligned word columns and the
/// fingerprints gating re-segmentation, re-decoding and re-rendering.
///
/// `source_words.len() == target_words.len() == raw_target_words.len()`
/// holds after every public method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeSession {
    source_text: String,
    source_language: String,
    target_language: String,
    title: String,
    source_words: Vec<String>,
    target_words: Vec<String>,
    /// Translator output plus manual edits. Corrections are overlaid on top.
    raw_target_words: Vec<String>,
    sentences: Vec<String>,
    translated_sentences: Vec<String>,
    split_hash: Option<String>,
    decode_hash: Option<String>,
    export_hash: Option<String>,
    #[serde(skip)]
    rendered: Option<Vec<u8>>,
}

impl DecodeSession {
    pub fn new(
        source_text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            ..Self::default()
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The title, or `"decoded"` when none was given.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    pub fn source_words(&self) -> &[String] {
        &self.source_words
    }

    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    pub fn raw_target_words(&self) -> &[String] {
        &self.raw_target_words
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn translated_sentences(&self) -> &[String] {
        &self.translated_sentences
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.source_words
            .iter()
            .zip(&self.target_words)
            .map(|(s, t)| (s.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.source_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_words.is_empty()
    }

    /// Whether the words were split from the current source text.
    pub fn is_segmented(&self) -> bool {
        self.split_hash.as_deref() == Some(self.split_fingerprint().as_str())
    }

    pub fn is_decoded(&self) -> bool {
        self.decode_hash.is_some()
    }

    pub fn split_hash(&self) -> Option<&str> {
        self.split_hash.as_deref()
    }

    pub fn decode_hash(&self) -> Option<&str> {
        self.decode_hash.as_deref()
    }

    pub fn export_hash(&self) -> Option<&str> {
        self.export_hash.as_deref()
    }

    /// Character length of the longest source or target word.
    pub fn longest_word_len(&self) -> usize {
        self.source_words
            .iter()
            .chain(&self.target_words)
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) {
        self.source_text = text.into();
    }

    pub fn set_languages(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.source_language = source.into();
        self.target_language = target.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Segments the source text unless it is unchanged since the last split.
    ///
    /// A new split empties the target column (one empty word per source word)
    /// and drops the previous decode. Returns whether a split happened.
    pub fn split_text(&mut self, replacements: &ReplacementTable) -> bool {
        let hash = self.split_fingerprint();
        if self.split_hash.as_deref() == Some(hash.as_str()) {
            tracing::debug!(split_hash = %hash, "source text unchanged, keeping segmentation");
            return false;
        }

        let segmentation = segmenter::split(&self.source_text, replacements);
        let blank = vec![String::new(); segmentation.words.len()];
        self.source_words = segmentation.words;
        self.target_words = blank.clone();
        self.raw_target_words = blank;
        self.sentences = segmentation.sentences;
        self.translated_sentences.clear();
        self.split_hash = Some(hash);
        self.decode_hash = None;
        tracing::debug!(
            words = self.source_words.len(),
            sentences = self.sentences.len(),
            "segmented source text"
        );
        true
    }

    /// Replaces both word columns, e.g. after the learner edited rows.
    /// Unequal lengths are refused and nothing changes.
    pub fn set_words(
        &mut self,
        source_words: Vec<String>,
        target_words: Vec<String>,
    ) -> Result<(), AlignmentError> {
        if source_words.len() != target_words.len() {
            return Err(AlignmentError {
                source_len: source_words.len(),
                target_len: target_words.len(),
            });
        }
        self.source_words = source_words;
        self.raw_target_words = target_words.clone();
        self.target_words = target_words;
        Ok(())
    }

    /// Manually corrects one target word. The edit also becomes the raw
    /// baseline, so re-applying dictionaries keeps it unless a dictionary
    /// entry matches that source word. Returns false when out of range.
    pub fn edit_target(&mut self, index: usize, word: impl Into<String>) -> bool {
        let Some(slot) = self.target_words.get_mut(index) else {
            return false;
        };
        let word = word.into();
        self.raw_target_words[index] = word.clone();
        *slot = word;
        true
    }

    pub(crate) fn split_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new("split");
        fp.field(&self.source_text);
        fp.finish()
    }

    pub(crate) fn decode_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new("decode");
        fp.field(&self.source_text)
            .field(&self.source_language)
            .field(&self.target_language);
        fp.finish()
    }

    pub(crate) fn export_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new("export");
        fp.field(self.display_title())
            .list(&self.source_words)
            .list(&self.target_words);
        fp.finish()
    }

    /// Installs a completed decode. Lengths are checked by the caller.
    pub(crate) fn install_decode(
        &mut self,
        raw_target_words: Vec<String>,
        translated_sentences: Vec<String>,
        decode_hash: String,
    ) {
        debug_assert_eq!(raw_target_words.len(), self.source_words.len());
        self.target_words = raw_target_words.clone();
        self.raw_target_words = raw_target_words;
        self.translated_sentences = translated_sentences;
        self.decode_hash = Some(decode_hash);
    }

    /// Replaces the session with imported columns and treats them as a
    /// finished decode of their joined text, so neither gate discards them.
    pub(crate) fn adopt_imported(
        &mut self,
        title: String,
        source_words: Vec<String>,
        target_words: Vec<String>,
        languages: Option<(String, String)>,
    ) {
        debug_assert_eq!(source_words.len(), target_words.len());
        if let Some((source, target)) = languages {
            self.set_languages(source, target);
        }
        self.title = title;
        self.source_text = source_words.join(" ");
        self.sentences = segmenter::split(&self.source_text, &ReplacementTable::empty()).sentences;
        self.translated_sentences.clear();
        self.source_words = source_words;
        self.raw_target_words = target_words.clone();
        self.target_words = target_words;
        self.split_hash = Some(self.split_fingerprint());
        self.decode_hash = Some(self.decode_fingerprint());
    }

    /// Overwrites the corrected column. Lengths are checked by the caller.
    pub(crate) fn replace_target_words(&mut self, target_words: Vec<String>) {
        debug_assert_eq!(target_words.len(), self.source_words.len());
        self.target_words = target_words;
    }

    pub(crate) fn cached_render(&self, export_hash: &str) -> Option<&[u8]> {
        match (&self.export_hash, &self.rendered) {
            (Some(hash), Some(payload)) if hash == export_hash => Some(payload),
            _ => None,
        }
    }

    pub(crate) fn store_render(&mut self, export_hash: String, payload: Vec<u8>) {
        self.export_hash = Some(export_hash);
        self.rendered = Some(payload);
    }
}
