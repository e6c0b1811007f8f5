//! Public library API for decoding and re-encoding Oxygen Not Included `.sav` files.

/// Save container decoding, type templates, dynamic values, and write-back.
pub mod save;
