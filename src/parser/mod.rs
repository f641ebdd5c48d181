//! Tokenizer / Parser module
//!
//! Converts `.iim` macro source text into an ordered sequence of `Command`
//! records. See `lexer` for the implementation and `types` for the shared
//! data model.

pub mod lexer;
pub mod types;

pub use lexer::parse;
pub use types::*;
