// src/lib.rs

pub mod config;
pub mod core;
pub mod decoder;
pub mod dictionaries;
pub mod errors;
pub mod glossary;
pub mod persistence;
pub mod serializer;

pub use crate::core::overlay::{apply_dict, apply_selected};
pub use crate::core::replacements::ReplacementTable;
pub use crate::core::session::DecodeSession;
pub use crate::core::types::ImportOutcome;
pub use crate::decoder::{DecodeStatus, Decoder, Renderer, Translator};
pub use crate::dictionaries::CorrectionDictionaryStore;
