//! CSS sub-language support: tokenizing, the property schema, the color
//! keyword table, and the property sanitizer built on top of them
//! (spec §4.3, §4.4).

pub mod colors;
pub mod sanitizer;
pub mod schema;
pub mod tokenizer;

pub use sanitizer::sanitize_style;
