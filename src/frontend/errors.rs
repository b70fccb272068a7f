use crate::frontend::token::Token;
use crate::message::{Message, MessageHandler};
use crate::utils::config::parser::MAX_SYNTAX_ERRORS;
use crate::utils::errors::{PascalError, PascalResult};

/// Diagnostics raised by the scanner and the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PascalErrorCode {
    AlreadyForwarded,
    CaseConstantReused,
    IdentifierRedefined,
    IdentifierUndefined,
    IncompatibleAssignment,
    IncompatibleTypes,
    InvalidAssignment,
    InvalidCharacter,
    InvalidConstant,
    InvalidExponent,
    InvalidExpression,
    InvalidField,
    InvalidFraction,
    InvalidIdentifierUsage,
    InvalidIndexType,
    InvalidNumber,
    InvalidStatement,
    InvalidSubrangeType,
    InvalidTarget,
    InvalidType,
    InvalidVarParm,
    MinGtMax,
    MissingBegin,
    MissingColon,
    MissingColonEquals,
    MissingComma,
    MissingConstant,
    MissingDo,
    MissingDotDot,
    MissingEnd,
    MissingEquals,
    MissingForControl,
    MissingIdentifier,
    MissingLeftBracket,
    MissingOf,
    MissingPeriod,
    MissingProgram,
    MissingRightBracket,
    MissingRightParen,
    MissingSemicolon,
    MissingThen,
    MissingToDownto,
    MissingUntil,
    MissingVariable,
    NotConstantIdentifier,
    NotRecordVariable,
    NotTypeIdentifier,
    RangeInteger,
    RangeReal,
    StackOverflow,
    TooManyLevels,
    TooManySubscripts,
    UnexpectedEof,
    UnexpectedToken,
    Unimplemented,
    Unrecognizable,
    WrongNumberOfParms,

    // Fatal
    IoError,
    TooManyErrors,
}

impl PascalErrorCode {
    pub fn message(&self) -> &'static str {
        use PascalErrorCode::*;
        match self {
            AlreadyForwarded => "Already specified in forward",
            CaseConstantReused => "CASE constant reused",
            IdentifierRedefined => "Redefined identifier",
            IdentifierUndefined => "Undefined identifier",
            IncompatibleAssignment => "Incompatible assignment",
            IncompatibleTypes => "Incompatible types",
            InvalidAssignment => "Invalid assignment statement",
            InvalidCharacter => "Invalid character",
            InvalidConstant => "Invalid constant",
            InvalidExponent => "Invalid exponent",
            InvalidExpression => "Invalid expression",
            InvalidField => "Invalid field",
            InvalidFraction => "Invalid fraction",
            InvalidIdentifierUsage => "Invalid identifier usage",
            InvalidIndexType => "Invalid index type",
            InvalidNumber => "Invalid number",
            InvalidStatement => "Invalid statement",
            InvalidSubrangeType => "Invalid subrange type",
            InvalidTarget => "Invalid assignment target",
            InvalidType => "Invalid type",
            InvalidVarParm => "Invalid VAR parameter",
            MinGtMax => "Min limit greater than max limit",
            MissingBegin => "Missing BEGIN",
            MissingColon => "Missing :",
            MissingColonEquals => "Missing :=",
            MissingComma => "Missing ,",
            MissingConstant => "Missing constant",
            MissingDo => "Missing DO",
            MissingDotDot => "Missing ..",
            MissingEnd => "Missing END",
            MissingEquals => "Missing =",
            MissingForControl => "Invalid FOR control variable",
            MissingIdentifier => "Missing identifier",
            MissingLeftBracket => "Missing [",
            MissingOf => "Missing OF",
            MissingPeriod => "Missing .",
            MissingProgram => "Missing PROGRAM",
            MissingRightBracket => "Missing ]",
            MissingRightParen => "Missing )",
            MissingSemicolon => "Missing ;",
            MissingThen => "Missing THEN",
            MissingToDownto => "Missing TO or DOWNTO",
            MissingUntil => "Missing UNTIL",
            MissingVariable => "Missing variable",
            NotConstantIdentifier => "Not a constant identifier",
            NotRecordVariable => "Not a record variable",
            NotTypeIdentifier => "Not a type identifier",
            RangeInteger => "Integer literal out of range",
            RangeReal => "Real literal out of range",
            StackOverflow => "Stack overflow",
            TooManyLevels => "Nesting level too deep",
            TooManySubscripts => "Too many subscripts",
            UnexpectedEof => "Unexpected end of file",
            UnexpectedToken => "Unexpected token",
            Unimplemented => "Unimplemented feature",
            Unrecognizable => "Unrecognizable input",
            WrongNumberOfParms => "Wrong number of actual parameters",
            IoError => "Object I/O error",
            TooManyErrors => "Too many syntax errors",
        }
    }

    /// Process exit status; only the fatal codes are non-zero.
    pub fn status(&self) -> i32 {
        match self {
            PascalErrorCode::IoError => -101,
            PascalErrorCode::TooManyErrors => -102,
            _ => 0,
        }
    }
}

impl std::fmt::Display for PascalErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Counts flagged errors and reports each one as a message.
pub struct ErrorHandler {
    error_count: usize,
    messages: MessageHandler,
}

impl ErrorHandler {
    pub fn new(messages: MessageHandler) -> Self {
        Self {
            error_count: 0,
            messages,
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Report `code` at `token`. Fails once the error budget is exceeded.
    pub fn flag(&mut self, token: &Token, code: PascalErrorCode) -> PascalResult<()> {
        self.messages.send(Message::SyntaxError {
            line_number: token.line,
            position: token.position,
            text: token.text.clone(),
            message: code.message().to_string(),
        });

        self.error_count += 1;
        if self.error_count > MAX_SYNTAX_ERRORS {
            return Err(self.abort_translation(PascalErrorCode::TooManyErrors, token.line));
        }
        Ok(())
    }

    fn abort_translation(&self, code: PascalErrorCode, line: usize) -> PascalError {
        self.messages.send(Message::Fatal {
            message: format!("FATAL ERROR: {}", code.message()),
            status: code.status(),
        });
        PascalError::TooManyErrors {
            count: self.error_count,
            line,
        }
    }
}
