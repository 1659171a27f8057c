//! Lexical analysis

mod lexer;
mod token_kind;

pub use lexer::Lexer;
pub use token_kind::TokenKind;

use std::ops::Range;

/// 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Coordinate {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte range in the unit's text
    pub span: Range<usize>,
    pub coordinate: Coordinate,
}
