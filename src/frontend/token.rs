use crate::frontend::errors::PascalErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Reserved words
    And,
    Array,
    Begin,
    Case,
    Const,
    Div,
    Do,
    Downto,
    Else,
    End,
    File,
    For,
    Function,
    Goto,
    If,
    In,
    Label,
    Mod,
    Nil,
    Not,
    Of,
    Or,
    Packed,
    Procedure,
    Program,
    Record,
    Repeat,
    Set,
    Then,
    To,
    Type,
    Until,
    Var,
    While,
    With,

    // Special symbols
    Plus,
    Minus,
    Star,
    Slash,
    ColonEquals,
    Dot,
    Comma,
    Semicolon,
    Colon,
    Quote,
    Equals,
    NotEquals,
    LessThan,
    LessEquals,
    GreaterEquals,
    GreaterThan,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    UpArrow,
    DotDot,

    Identifier,
    Integer,
    Real,
    String,
    Error,
    EndOfFile,
}

impl TokenKind {
    pub fn is_reserved_word(&self) -> bool {
        *self <= TokenKind::With
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_reserved_word() {
            return write!(f, "{}", format!("{:?}", self).to_uppercase());
        }
        let name = match self {
            TokenKind::ColonEquals => "COLON_EQUALS",
            TokenKind::NotEquals => "NOT_EQUALS",
            TokenKind::LessThan => "LESS_THAN",
            TokenKind::LessEquals => "LESS_EQUALS",
            TokenKind::GreaterEquals => "GREATER_EQUALS",
            TokenKind::GreaterThan => "GREATER_THAN",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::UpArrow => "UP_ARROW",
            TokenKind::DotDot => "DOT_DOT",
            TokenKind::EndOfFile => "END_OF_FILE",
            other => return write!(f, "{}", format!("{:?}", other).to_uppercase()),
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Integer(i64),
    Real(f64),
    Str(String),
    Error(PascalErrorCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub value: TokenValue,
    pub line: usize,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, value: TokenValue, line: usize, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            value,
            line,
            position,
        }
    }

    pub fn eof(line: usize, position: usize) -> Self {
        Self::new(TokenKind::EndOfFile, "", TokenValue::None, line, position)
    }

    pub fn error(code: PascalErrorCode, text: impl Into<String>, line: usize, position: usize) -> Self {
        Self::new(TokenKind::Error, text, TokenValue::Error(code), line, position)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Identifier text as stored in the symbol table.
    pub fn lowercase_text(&self) -> String {
        self.text.to_lowercase()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}
