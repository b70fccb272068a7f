pub mod errors;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod token;
pub mod token_sets;

pub use errors::{ErrorHandler, PascalErrorCode};
pub use parser::{ParseOutcome, Parser};
pub use scanner::Scanner;
pub use source::Source;
pub use token::{Token, TokenKind, TokenValue};
