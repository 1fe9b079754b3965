// src/core/mod.rs

pub mod fingerprint;
pub mod overlay;
pub mod replacements;
pub mod segmenter;
pub mod session;
pub mod types;
