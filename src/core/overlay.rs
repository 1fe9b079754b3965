// File: src/core/overlay.rs
use crate::core::segmenter::bare;
use crate::core::session::DecodeSession;
use crate::core::types::CorrectionDictionary;
use crate::dictionaries::CorrectionDictionaryStore;

const INVERTED_MARKS: [char; 2] = ['¡', '¿'];

/// Rebuilds the corrected target column from the raw column, applying every
/// dictionary of the store in ascending name order. Later dictionaries win.
///
/// Always starting from the raw column makes this idempotent.
/// Returns the number of target words changed by a dictionary.
pub fn apply_dict(session: &mut DecodeSession, store: &CorrectionDictionaryStore) -> usize {
    overlay(session, store.dictionaries().values())
}

/// Like [`apply_dict`] but with an explicit, ordered list of dictionary
/// names. Unknown names are skipped.
pub fn apply_selected<S: AsRef<str>>(
    session: &mut DecodeSession,
    store: &CorrectionDictionaryStore,
    names: &[S],
) -> usize {
    let dictionaries = names.iter().filter_map(|name| {
        let found = store.dictionary(name.as_ref());
        if found.is_none() {
            tracing::warn!(name = name.as_ref(), "unknown dictionary skipped");
        }
        found
    });
    overlay(session, dictionaries)
}

fn overlay<'a>(
    session: &mut DecodeSession,
    dictionaries: impl Iterator<Item = &'a CorrectionDictionary>,
) -> usize {
    let mut targets = session.raw_target_words().to_vec();
    let mut corrected = vec![false; targets.len()];

    for dictionary in dictionaries {
        if dictionary.is_empty() {
            continue;
        }
        for (i, source) in session.source_words().iter().enumerate() {
            if let Some(word) = lookup(dictionary, source) {
                targets[i] = word;
                corrected[i] = true;
            }
        }
    }

    let count = corrected.iter().filter(|&&c| c).count();
    session.replace_target_words(targets);
    tracing::debug!(corrected = count, "applied correction dictionaries");
    count
}

/// Exact matches win. A match on the bare word keeps the source word's
/// surrounding punctuation, so `mundo.` corrected by `mundo -> planet`
/// becomes `planet.`. Leading inverted marks (`¡`, `¿`) are dropped: the
/// correction is written in the target language, which has no use for them.
fn lookup(dictionary: &CorrectionDictionary, source: &str) -> Option<String> {
    if let Some(target) = dictionary.get(source) {
        return Some(target.clone());
    }

    let core = bare(source);
    if core.is_empty() || core.len() == source.len() {
        return None;
    }
    let target = dictionary.get(core)?;
    let start = source.len() - source.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
    let end = start + core.len();
    let prefix: String = source[..start].chars().filter(|c| !INVERTED_MARKS.contains(c)).collect();
    Some(format!("{prefix}{target}{}", &source[end..]))
}
