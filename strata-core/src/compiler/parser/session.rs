use super::parser::Parser;
use std::ops::{Deref, DerefMut};

/// Scoped use of the shared parser; the parser is reset when the session ends
///
/// The reset runs on every exit path, including early returns and unwinding.
pub struct ParserSession<'a> {
    parser: &'a mut Parser,
}

impl Parser {
    /// Start a transient session over this parser
    pub fn session(&mut self) -> ParserSession<'_> {
        ParserSession { parser: self }
    }
}

impl Deref for ParserSession<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
    }
}

impl DerefMut for ParserSession<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
    }
}

impl Drop for ParserSession<'_> {
    fn drop(&mut self) {
        self.parser.reset_state();
    }
}
