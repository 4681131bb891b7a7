//! Codec layer: fixed-width name packing, per-kind schemas, and the
//! entity encode/decode engine.

pub mod entity;
pub mod names;
pub mod schema;

pub use entity::EncodedVar;
pub use names::{decode_fixed_strings, encode_fixed_strings};
