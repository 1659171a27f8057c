pub mod error;
pub mod parser;
mod session;

pub use error::{ErrorLocation, ParseResult, ParserError, ParserErrorKind};
pub use parser::Parser;
pub use session::ParserSession;
