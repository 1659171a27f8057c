use crate::compiler::lexer::Coordinate;
use std::fmt;

/// Syntax error with position
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    pub kind: ParserErrorKind,
    pub location: ErrorLocation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorLocation {
    /// At the offending token
    At(Coordinate),
    /// Just after the token at this position (a missing terminator)
    After(Coordinate),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorKind {
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
    },
    ExpectedIdentifier {
        found: String,
    },
    MissingSemicolon,
    MissingRightCurly,
    MissingRightParen,
    InvalidCharacter(String),
    InvalidNumberFormat(String),
    InvalidAssignmentTarget,
    NotAStatement,
    /// A modifier that is not allowed where it appears
    IllegalModifier {
        modifier: String,
        subject: String,
    },
    TrailingInput {
        found: String,
    },
    /// Expression tree or operand nesting beyond what later phases walk
    ExpressionTooComplex,
    NestingTooDeep,
}

pub type ParseResult<T> = Result<T, ParserError>;

impl ParserError {
    pub fn at(kind: ParserErrorKind, coordinate: Coordinate) -> Self {
        Self {
            kind,
            location: ErrorLocation::At(coordinate),
        }
    }

    pub fn after(kind: ParserErrorKind, coordinate: Coordinate) -> Self {
        Self {
            kind,
            location: ErrorLocation::After(coordinate),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self.location {
            ErrorLocation::At(coord) | ErrorLocation::After(coord) => coord,
        }
    }

    pub fn line(&self) -> Option<usize> {
        Some(self.coordinate().line)
    }

    pub fn column(&self) -> Option<usize> {
        Some(self.coordinate().column)
    }
}

impl fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserErrorKind::UnexpectedToken { found, expected } => {
                if expected.is_empty() {
                    write!(f, "Unexpected token '{found}'")
                } else {
                    write!(f, "Unexpected token '{found}', expected: {}", expected.join(", "))
                }
            }
            ParserErrorKind::ExpectedIdentifier { found } => {
                write!(f, "Expected identifier, found '{found}'")
            }
            ParserErrorKind::MissingSemicolon => write!(f, "Missing ';'"),
            ParserErrorKind::MissingRightCurly => write!(f, "Missing '}}' to complete block"),
            ParserErrorKind::MissingRightParen => write!(f, "Missing ')'"),
            ParserErrorKind::InvalidCharacter(c) => write!(f, "Invalid character '{c}'"),
            ParserErrorKind::InvalidNumberFormat(s) => write!(f, "Invalid number format: '{s}'"),
            ParserErrorKind::InvalidAssignmentTarget => {
                write!(f, "The left-hand side of an assignment must be a variable")
            }
            ParserErrorKind::NotAStatement => write!(f, "Expression is not a statement"),
            ParserErrorKind::ExpressionTooComplex => write!(f, "The expression is too complex"),
            ParserErrorKind::NestingTooDeep => write!(f, "Statements are nested too deeply"),
            ParserErrorKind::IllegalModifier { modifier, subject } => {
                write!(f, "Illegal modifier '{modifier}' for {subject}")
            }
            ParserErrorKind::TrailingInput { found } => {
                write!(f, "Unexpected '{found}' after the module declaration")
            }
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            ErrorLocation::At(c) => write!(f, "{}:{}: {}", c.line, c.column, self.kind),
            ErrorLocation::After(c) => write!(f, "{}:{}(after): {}", c.line, c.column, self.kind),
        }
    }
}

impl std::error::Error for ParserError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_location() {
        let err = ParserError::after(
            ParserErrorKind::MissingSemicolon,
            Coordinate { line: 3, column: 9 },
        );
        assert_eq!(err.to_string(), "3:9(after): Missing ';'");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_unexpected_token_message() {
        let kind = ParserErrorKind::UnexpectedToken {
            found: "}".to_string(),
            expected: vec!["class".to_string(), "interface".to_string()],
        };
        assert_eq!(kind.to_string(), "Unexpected token '}', expected: class, interface");
    }
}
