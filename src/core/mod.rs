//! Decode engine and history store.

/// Hex-run detection, decoding and substitution.
pub mod decoder;
/// Bounded decode history over a storage handle.
pub mod history;

pub(crate) mod offsets;
