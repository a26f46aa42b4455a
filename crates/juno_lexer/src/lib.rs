//! Juno Lexer — tokenizes Juno source code.
//!
//! Converts source text into a complete token stream, handling:
//! - Keywords, identifiers, literals (radix-prefixed ints, floats, strings, chars)
//! - Compound operators resolved by one-character lookahead
//! - Unary sign fusion into numeric literals
//! - Bracket balancing (first mismatch only)
//! - Comments and whitespace as position-preserving trivia tokens
//! - Color-literal annotations for editor tooling
//!
//! The lexer never aborts: malformed input degrades to a best partial
//! token plus a diagnostic, so downstream stages always receive a full
//! token stream.

pub mod color;
pub mod lexer;
pub mod token;


pub use color::{Color, ColorAnnotation};
pub use lexer::{lex, Lexer};
pub use token::*;
