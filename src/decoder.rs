// File: src/decoder.rs
//! Drives the external translator over a [`DecodeSession`].
//!
//! Decoding is the one slow step of the pipeline, so it runs on tokio's
//! blocking pool and is skipped while the (text, source language, target
//! language) fingerprint is unchanged.

use crate::core::overlay::apply_dict;
use crate::core::replacements::ReplacementTable;
use crate::core::session::DecodeSession;
use crate::dictionaries::CorrectionDictionaryStore;
use crate::errors::{BoxError, DecodeError, RenderError};
use std::sync::Arc;
use tracing::{debug, info};

/// Word and sentence translation service. Outputs must keep the length and
/// order of the inputs.
pub trait Translator: Send + Sync {
    fn translate_words(
        &self,
        words: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, BoxError>;

    fn translate_sentences(
        &self,
        sentences: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, BoxError>;
}

/// Produces a printable document from the aligned columns.
pub trait Renderer {
    fn render(
        &self,
        title: &str,
        source_words: &[String],
        target_words: &[String],
    ) -> Result<Vec<u8>, BoxError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The fingerprint matched a completed decode; the translator was not called.
    Cached,
    /// The translator ran and its output was installed.
    Decoded,
}

pub struct Decoder {
    translator: Arc<dyn Translator>,
}

impl Decoder {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Decodes the session unless its fingerprint matches the last completed
    /// decode. Holding `&mut` across the await keeps one decode in flight per
    /// session. On error the session is left as it was.
    ///
    /// The words must have been split from the current source text (see
    /// [`prepare`]), otherwise `DecodeError::NotSegmented` is returned.
    pub async fn ensure_decoded(&self, session: &mut DecodeSession) -> Result<DecodeStatus, DecodeError> {
        if !session.is_segmented() {
            return Err(DecodeError::NotSegmented);
        }

        let hash = session.decode_fingerprint();
        if session.decode_hash() == Some(hash.as_str()) {
            debug!(decode_hash = %hash, "decode fingerprint unchanged, skipping translator");
            return Ok(DecodeStatus::Cached);
        }

        if session.source_text().trim().is_empty() {
            session.install_decode(vec![String::new(); session.len()], Vec::new(), hash);
            return Ok(DecodeStatus::Decoded);
        }

        info!(
            words = session.len(),
            source = session.source_language(),
            target = session.target_language(),
            "decoding words"
        );

        let translator = Arc::clone(&self.translator);
        let words = session.source_words().to_vec();
        let sentences = session.sentences().to_vec();
        let source_language = session.source_language().to_string();
        let target_language = session.target_language().to_string();

        let (targets, translated) = tokio::task::spawn_blocking(move || {
            let targets = translator
                .translate_words(&words, &source_language, &target_language)
                .map_err(DecodeError::Translator)?;
            check_len("words", words.len(), targets.len())?;

            let translated = translator
                .translate_sentences(&sentences, &source_language, &target_language)
                .map_err(DecodeError::Translator)?;
            check_len("sentences", sentences.len(), translated.len())?;

            Ok::<_, DecodeError>((targets, translated))
        })
        .await??;

        session.install_decode(targets, translated, hash);
        info!(words = session.len(), "decoded words");
        Ok(DecodeStatus::Decoded)
    }

    /// Splits, decodes and applies the store's dictionaries in one go.
    pub async fn run(
        &self,
        session: &mut DecodeSession,
        store: &CorrectionDictionaryStore,
    ) -> Result<DecodeStatus, DecodeError> {
        prepare(session, store.replacements());
        let status = self.ensure_decoded(session).await?;
        apply_dict(session, store);
        Ok(status)
    }
}

/// Segments the session with `replacements` if its text changed.
pub fn prepare(session: &mut DecodeSession, replacements: &ReplacementTable) -> bool {
    session.split_text(replacements)
}

/// Renders the session, reusing the last payload while title and both word
/// columns are unchanged.
pub fn render(session: &mut DecodeSession, renderer: &dyn Renderer) -> Result<Vec<u8>, RenderError> {
    let hash = session.export_fingerprint();
    if let Some(payload) = session.cached_render(&hash) {
        debug!(export_hash = %hash, "render fingerprint unchanged, reusing payload");
        return Ok(payload.to_vec());
    }

    let payload = renderer
        .render(session.display_title(), session.source_words(), session.target_words())
        .map_err(RenderError)?;
    session.store_render(hash, payload.clone());
    Ok(payload)
}

fn check_len(stage: &'static str, expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::Misaligned {
            stage,
            expected,
            actual,
        })
    }
}
