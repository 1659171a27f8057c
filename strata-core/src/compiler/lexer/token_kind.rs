//! Strata token kinds

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Package,
    Import,
    Class,
    Interface,
    Abstract,
    Extends,
    Implements,
    Int,
    Boolean,
    Void,
    If,
    Else,
    While,
    Return,
    True,
    False,
    Null,
    This,
    New,

    // Literals and names
    LiteralInteger,
    Identifier,

    // Two-character symbols
    DoubleEqual,
    ExclamationEqual,
    LessThanEqual,
    GreaterThanEqual,
    DoubleAmpersand,
    DoublePipe,

    // Single-character symbols
    LeftCurly,
    RightCurly,
    LeftParen,
    RightParen,
    Semicolon,
    Comma,
    Dot,
    Equal,
    Exclamation,
    LessThan,
    GreaterThan,
    Plus,
    Minus,
    Asterisk,
    Slash,

    /// A character the language does not use
    Invalid,
    Eof,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "package" => TokenKind::Package,
            "import" => TokenKind::Import,
            "class" => TokenKind::Class,
            "interface" => TokenKind::Interface,
            "abstract" => TokenKind::Abstract,
            "extends" => TokenKind::Extends,
            "implements" => TokenKind::Implements,
            "int" => TokenKind::Int,
            "boolean" => TokenKind::Boolean,
            "void" => TokenKind::Void,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "this" => TokenKind::This,
            "new" => TokenKind::New,
            _ => return None,
        };
        Some(kind)
    }

    /// Human-readable form used in syntax error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Package => "package",
            TokenKind::Import => "import",
            TokenKind::Class => "class",
            TokenKind::Interface => "interface",
            TokenKind::Abstract => "abstract",
            TokenKind::Extends => "extends",
            TokenKind::Implements => "implements",
            TokenKind::Int => "int",
            TokenKind::Boolean => "boolean",
            TokenKind::Void => "void",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::This => "this",
            TokenKind::New => "new",
            TokenKind::LiteralInteger => "integer literal",
            TokenKind::Identifier => "identifier",
            TokenKind::DoubleEqual => "==",
            TokenKind::ExclamationEqual => "!=",
            TokenKind::LessThanEqual => "<=",
            TokenKind::GreaterThanEqual => ">=",
            TokenKind::DoubleAmpersand => "&&",
            TokenKind::DoublePipe => "||",
            TokenKind::LeftCurly => "{",
            TokenKind::RightCurly => "}",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Equal => "=",
            TokenKind::Exclamation => "!",
            TokenKind::LessThan => "<",
            TokenKind::GreaterThan => ">",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Invalid => "invalid character",
            TokenKind::Eof => "end of file",
        }
    }

    /// Tokens that can start a type in a declaration
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Boolean | TokenKind::Void | TokenKind::Identifier
        )
    }
}
