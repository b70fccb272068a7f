// Scanner tables
pub mod scanner {
    use crate::frontend::token::TokenKind;
    use lazy_static::lazy_static;
    use std::collections::HashMap;

    lazy_static! {
        pub static ref RESERVED_WORDS: HashMap<&'static str, TokenKind> = [
            ("and", TokenKind::And),
            ("array", TokenKind::Array),
            ("begin", TokenKind::Begin),
            ("case", TokenKind::Case),
            ("const", TokenKind::Const),
            ("div", TokenKind::Div),
            ("do", TokenKind::Do),
            ("downto", TokenKind::Downto),
            ("else", TokenKind::Else),
            ("end", TokenKind::End),
            ("file", TokenKind::File),
            ("for", TokenKind::For),
            ("function", TokenKind::Function),
            ("goto", TokenKind::Goto),
            ("if", TokenKind::If),
            ("in", TokenKind::In),
            ("label", TokenKind::Label),
            ("mod", TokenKind::Mod),
            ("nil", TokenKind::Nil),
            ("not", TokenKind::Not),
            ("of", TokenKind::Of),
            ("or", TokenKind::Or),
            ("packed", TokenKind::Packed),
            ("procedure", TokenKind::Procedure),
            ("program", TokenKind::Program),
            ("record", TokenKind::Record),
            ("repeat", TokenKind::Repeat),
            ("set", TokenKind::Set),
            ("then", TokenKind::Then),
            ("to", TokenKind::To),
            ("type", TokenKind::Type),
            ("until", TokenKind::Until),
            ("var", TokenKind::Var),
            ("while", TokenKind::While),
            ("with", TokenKind::With),
        ]
        .into_iter()
        .collect();

        pub static ref SPECIAL_SYMBOLS: HashMap<&'static str, TokenKind> = [
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            (":=", TokenKind::ColonEquals),
            (".", TokenKind::Dot),
            (",", TokenKind::Comma),
            (";", TokenKind::Semicolon),
            (":", TokenKind::Colon),
            ("'", TokenKind::Quote),
            ("=", TokenKind::Equals),
            ("<>", TokenKind::NotEquals),
            ("<", TokenKind::LessThan),
            ("<=", TokenKind::LessEquals),
            (">=", TokenKind::GreaterEquals),
            (">", TokenKind::GreaterThan),
            ("(", TokenKind::LeftParen),
            (")", TokenKind::RightParen),
            ("[", TokenKind::LeftBracket),
            ("]", TokenKind::RightBracket),
            ("{", TokenKind::LeftBrace),
            ("}", TokenKind::RightBrace),
            ("^", TokenKind::UpArrow),
            ("..", TokenKind::DotDot),
        ]
        .into_iter()
        .collect();
    }
}

// Parser constants and operator tables
pub mod parser {
    use crate::ast::NodeKind;
    use crate::frontend::token::TokenKind;
    use lazy_static::lazy_static;
    use std::collections::HashMap;

    // Translation aborts once this many errors have been flagged.
    pub const MAX_SYNTAX_ERRORS: usize = 25;

    pub const DUMMY_PROGRAM_NAME: &str = "dummyprogramname";
    pub const DUMMY_PROCEDURE_PREFIX: &str = "dummyprocedurename_";
    pub const DUMMY_FUNCTION_PREFIX: &str = "dummyfunctionname_";

    // Directive that turns a routine header into a forward declaration
    pub const FORWARD_DIRECTIVE: &str = "forward";

    lazy_static! {
        pub static ref RELATIONAL_OPERATORS: HashMap<TokenKind, NodeKind> = [
            (TokenKind::Equals, NodeKind::Eq),
            (TokenKind::NotEquals, NodeKind::Ne),
            (TokenKind::LessThan, NodeKind::Lt),
            (TokenKind::LessEquals, NodeKind::Le),
            (TokenKind::GreaterThan, NodeKind::Gt),
            (TokenKind::GreaterEquals, NodeKind::Ge),
        ]
        .into_iter()
        .collect();

        pub static ref ADDITIVE_OPERATORS: HashMap<TokenKind, NodeKind> = [
            (TokenKind::Plus, NodeKind::Add),
            (TokenKind::Minus, NodeKind::Subtract),
            (TokenKind::Or, NodeKind::Or),
        ]
        .into_iter()
        .collect();

        pub static ref MULTIPLICATIVE_OPERATORS: HashMap<TokenKind, NodeKind> = [
            (TokenKind::Star, NodeKind::Multiply),
            (TokenKind::Slash, NodeKind::FloatDivide),
            (TokenKind::Div, NodeKind::IntegerDivide),
            (TokenKind::Mod, NodeKind::Mod),
            (TokenKind::And, NodeKind::And),
        ]
        .into_iter()
        .collect();
    }

    pub fn dummy_procedure_name(counter: usize) -> String {
        format!("{}{:03}", DUMMY_PROCEDURE_PREFIX, counter)
    }

    pub fn dummy_function_name(counter: usize) -> String {
        format!("{}{:03}", DUMMY_FUNCTION_PREFIX, counter)
    }
}

// Listing layout
pub mod listing {
    // Width of the "NNN " prefix in front of each echoed source line
    pub const LINE_PREFIX_WIDTH: usize = 4;
    pub const INDENT_WIDTH: usize = 2;

    // Column width of identifiers in the cross-reference listing
    pub const NAME_WIDTH: usize = 16;

    // Parse tree lines wrap past this width
    pub const LINE_WIDTH: usize = 80;
}
