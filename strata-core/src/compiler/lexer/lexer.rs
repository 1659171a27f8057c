//! Hand-written scanner over a (sub)range of a unit's text

use super::token_kind::TokenKind;
use super::{Coordinate, Token};
use std::ops::Range;

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            end: source.len(),
            line: 1,
            column: 1,
        }
    }

    /// Scan only `range`, reporting positions as if scanning started at `start`
    ///
    /// Used to materialize deferred method bodies with their real line numbers.
    pub fn for_range(source: &'a str, range: Range<usize>, start: Coordinate) -> Self {
        let end = range.end.min(source.len());
        Self {
            source,
            pos: range.start.min(end),
            end,
            line: start.line,
            column: start.column,
        }
    }

    /// Scan everything into `out`; the last token is always `Eof`
    pub fn tokenize_into(mut self, out: &mut Vec<Token>) {
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            out.push(token);
            if done {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        self.source[self.pos..self.end].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..self.end].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;
        let coordinate = Coordinate {
            line: self.line,
            column: self.column,
        };

        let Some(c) = self.bump() else {
            return Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: start..start,
                coordinate,
            };
        };

        let kind = match c {
            c if c.is_ascii_alphabetic() || c == '_' => {
                while matches!(self.peek(), Some(n) if n.is_ascii_alphanumeric() || n == '_') {
                    self.bump();
                }
                TokenKind::keyword(&self.source[start..self.pos]).unwrap_or(TokenKind::Identifier)
            }
            c if c.is_ascii_digit() => {
                while matches!(self.peek(), Some(n) if n.is_ascii_digit()) {
                    self.bump();
                }
                TokenKind::LiteralInteger
            }
            '=' => self.pair('=', TokenKind::DoubleEqual, TokenKind::Equal),
            '!' => self.pair('=', TokenKind::ExclamationEqual, TokenKind::Exclamation),
            '<' => self.pair('=', TokenKind::LessThanEqual, TokenKind::LessThan),
            '>' => self.pair('=', TokenKind::GreaterThanEqual, TokenKind::GreaterThan),
            '&' => self.pair('&', TokenKind::DoubleAmpersand, TokenKind::Invalid),
            '|' => self.pair('|', TokenKind::DoublePipe, TokenKind::Invalid),
            '{' => TokenKind::LeftCurly,
            '}' => TokenKind::RightCurly,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            _ => TokenKind::Invalid,
        };

        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: start..self.pos,
            coordinate,
        }
    }

    fn pair(&mut self, second: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.bump();
            matched
        } else {
            single
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut tokens = Vec::new();
        Lexer::new(source).tokenize_into(&mut tokens);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("class Point extends Shape"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::Extends,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a <= b && !c || d != 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::LessThanEqual,
                TokenKind::Identifier,
                TokenKind::DoubleAmpersand,
                TokenKind::Exclamation,
                TokenKind::Identifier,
                TokenKind::DoublePipe,
                TokenKind::Identifier,
                TokenKind::ExclamationEqual,
                TokenKind::LiteralInteger,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments_and_positions() {
        let mut tokens = Vec::new();
        Lexer::new("// header\n  int x;").tokenize_into(&mut tokens);

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].coordinate, Coordinate { line: 2, column: 3 });
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[1].span, 16..17);
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            kinds("a # b & c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Invalid,
                TokenKind::Identifier,
                TokenKind::Invalid,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_range_scan_keeps_coordinates() {
        let source = "class A {\n  void m() { return; }\n}";
        let start = source.find("{ return").unwrap();
        let end = source.find("}\n}").unwrap() + 1;

        let mut tokens = Vec::new();
        Lexer::for_range(source, start..end, Coordinate { line: 2, column: 12 })
            .tokenize_into(&mut tokens);

        assert_eq!(tokens[0].kind, TokenKind::LeftCurly);
        assert_eq!(tokens[1].kind, TokenKind::Return);
        assert_eq!(tokens[1].coordinate, Coordinate { line: 2, column: 14 });
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokens.len(), 5);
    }
}
