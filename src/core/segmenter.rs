// File: src/core/segmenter.rs
use crate::core::replacements::ReplacementTable;

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ';'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}'];

/// Ordered word and sentence sequences of one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

/// Splits source text into words and sentences.
///
/// Pure: the same text and table always give identical output. Words keep
/// their attached punctuation and every occurrence is kept in order.
pub fn split(raw_text: &str, replacements: &ReplacementTable) -> Segmentation {
    let normalized = replacements.normalize(raw_text);

    let mut words = Vec::new();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for word in normalized.split_whitespace() {
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        words.push(word.to_string());

        if ends_sentence(word) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    Segmentation { words, sentences }
}

/// A word closes a sentence when it ends with terminal punctuation,
/// optionally followed by closing quotes or brackets.
fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(CLOSERS)
        .ends_with(SENTENCE_TERMINATORS)
}

/// The word without surrounding punctuation, e.g. `"mundo!"` -> `mundo`.
pub fn bare(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Segmentation {
        split(text, &ReplacementTable::empty())
    }

    #[test]
    fn splits_words_in_order_with_duplicates() {
        let seg = plain("la casa  y\tla\nmesa");
        assert_eq!(seg.words, vec!["la", "casa", "y", "la", "mesa"]);
    }

    #[test]
    fn splits_sentences_on_terminators() {
        let seg = plain("Hola mundo. ¿Qué tal? Bien!  Sin punto");
        assert_eq!(
            seg.sentences,
            vec!["Hola mundo.", "¿Qué tal?", "Bien!", "Sin punto"]
        );
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        let seg = plain("Er sagte \"Nein.\" Dann ging er.");
        assert_eq!(seg.sentences, vec!["Er sagte \"Nein.\"", "Dann ging er."]);
    }

    #[test]
    fn applies_replacements_before_splitting() {
        let seg = split("«Hola»\u{00a0}mundo", &ReplacementTable::default());
        assert_eq!(seg.words, vec!["\"Hola\"", "mundo"]);
    }

    #[test]
    fn empty_text_gives_empty_sequences() {
        assert_eq!(plain("   \n "), Segmentation::default());
    }

    #[test]
    fn is_deterministic() {
        let text = "Uno dos. Tres; cuatro";
        assert_eq!(plain(text), plain(text));
    }

    #[test]
    fn bare_trims_punctuation() {
        assert_eq!(bare("\"mundo!\""), "mundo");
        assert_eq!(bare("¿Qué"), "Qué");
        assert_eq!(bare("..."), "");
    }
}
