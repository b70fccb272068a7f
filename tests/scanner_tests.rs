use pascalfe::frontend::errors::PascalErrorCode;
use pascalfe::frontend::scanner::scan;
use pascalfe::frontend::token::{TokenKind, TokenValue};
use pascalfe::utils::errors::PascalResult;

fn kinds(text: &str) -> PascalResult<Vec<TokenKind>> {
    Ok(scan(text)?.into_iter().map(|token| token.kind).collect())
}

#[test]
fn test_reserved_words_ignore_case() -> PascalResult<()> {
    let kinds = kinds("BEGIN End wHiLe downto Program")?;
    assert_eq!(
        kinds,
        vec![
            TokenKind::Begin,
            TokenKind::End,
            TokenKind::While,
            TokenKind::Downto,
            TokenKind::Program,
            TokenKind::EndOfFile,
        ]
    );
    Ok(())
}

#[test]
fn test_identifiers_keep_their_spelling() -> PascalResult<()> {
    let tokens = scan("Total_Sum x1")?;
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "Total_Sum");
    assert_eq!(tokens[0].lowercase_text(), "total_sum");
    assert_eq!(tokens[1].text, "x1");
    Ok(())
}

#[test]
fn test_special_symbols() -> PascalResult<()> {
    let kinds = kinds(":= <> <= >= < > = .. . , ; : ( ) [ ] + - * / ^")?;
    assert_eq!(
        kinds,
        vec![
            TokenKind::ColonEquals,
            TokenKind::NotEquals,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::Equals,
            TokenKind::DotDot,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::UpArrow,
            TokenKind::EndOfFile,
        ]
    );
    Ok(())
}

#[test]
fn test_numbers() -> PascalResult<()> {
    let tokens = scan("42 3.25 1e3 2.5E-2")?;
    assert_eq!(tokens[0].value, TokenValue::Integer(42));
    assert_eq!(tokens[1].kind, TokenKind::Real);
    assert_eq!(tokens[1].value, TokenValue::Real(3.25));
    assert_eq!(tokens[2].value, TokenValue::Real(1000.0));
    assert_eq!(tokens[3].value, TokenValue::Real(0.025));
    Ok(())
}

#[test]
fn test_subrange_is_not_a_real_number() -> PascalResult<()> {
    let tokens = scan("1..10")?;
    assert_eq!(tokens[0].value, TokenValue::Integer(1));
    assert_eq!(tokens[1].kind, TokenKind::DotDot);
    assert_eq!(tokens[2].value, TokenValue::Integer(10));
    Ok(())
}

#[test]
fn test_number_errors() -> PascalResult<()> {
    let tokens = scan("1. 2e+ 99999999999999999999")?;
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].value, TokenValue::Error(PascalErrorCode::InvalidFraction));
    assert_eq!(tokens[1].value, TokenValue::Error(PascalErrorCode::InvalidExponent));
    assert_eq!(tokens[2].value, TokenValue::Error(PascalErrorCode::RangeInteger));
    Ok(())
}

#[test]
fn test_strings() -> PascalResult<()> {
    let tokens = scan("'don''t' 'a'")?;
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "'don''t'");
    assert_eq!(tokens[0].value, TokenValue::Str("don't".to_string()));
    assert_eq!(tokens[1].value, TokenValue::Str("a".to_string()));
    Ok(())
}

#[test]
fn test_string_spanning_lines_gets_blanks() -> PascalResult<()> {
    let tokens = scan("'one\ntwo'")?;
    assert_eq!(tokens[0].value, TokenValue::Str("one two".to_string()));
    Ok(())
}

#[test]
fn test_unterminated_string() -> PascalResult<()> {
    let tokens = scan("'never closed")?;
    assert_eq!(tokens[0].value, TokenValue::Error(PascalErrorCode::UnexpectedEof));
    assert!(tokens[1].is_eof());
    Ok(())
}

#[test]
fn test_comments_are_skipped() -> PascalResult<()> {
    let kinds = kinds("x { a comment\n spanning lines } := 1 {unterminated")?;
    assert_eq!(
        kinds,
        vec![TokenKind::Identifier, TokenKind::ColonEquals, TokenKind::Integer, TokenKind::EndOfFile]
    );
    Ok(())
}

#[test]
fn test_invalid_character() -> PascalResult<()> {
    let tokens = scan("a @ b")?;
    assert_eq!(tokens[1].value, TokenValue::Error(PascalErrorCode::InvalidCharacter));
    assert_eq!(tokens[1].text, "@");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    Ok(())
}

#[test]
fn test_line_and_position() -> PascalResult<()> {
    let tokens = scan("begin\n  x := 1\nend")?;
    assert_eq!((tokens[0].line, tokens[0].position), (1, 0));
    assert_eq!((tokens[1].line, tokens[1].position), (2, 2));
    assert_eq!((tokens[2].line, tokens[2].position), (2, 4));
    assert_eq!((tokens[4].line, tokens[4].position), (3, 0));
    Ok(())
}
