// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named correction dictionary: source word or phrase -> corrected target.
pub type CorrectionDictionary = BTreeMap<String, String>;

/// All correction dictionaries of one identity, keyed by dictionary name.
/// Iteration order (ascending name) is the default overlay order.
pub type DictionaryMap = BTreeMap<String, CorrectionDictionary>;

/// Outcome of importing user supplied data that may have the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportOutcome {
    /// The document was installed.
    Applied,
    /// The document was rejected and nothing changed.
    Rejected(String),
}

impl ImportOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ImportOutcome::Applied)
    }

    pub(crate) fn rejected(reason: impl Into<String>) -> Self {
        ImportOutcome::Rejected(reason.into())
    }
}
