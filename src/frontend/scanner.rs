use crate::frontend::errors::PascalErrorCode;
use crate::frontend::source::Source;
use crate::frontend::token::{Token, TokenKind, TokenValue};
use crate::utils::config::scanner::{RESERVED_WORDS, SPECIAL_SYMBOLS};
use crate::utils::errors::PascalResult;

/// Produces tokens one at a time from a `Source`.
pub struct Scanner<'a> {
    source: Source<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: Source<'a>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Source<'a> {
        &self.source
    }

    pub fn next_token(&mut self) -> PascalResult<Token> {
        self.skip_whitespace_and_comments()?;
        let line = self.source.line_number();
        let position = self.source.position();

        match self.source.current_char() {
            None => Ok(Token::eof(line, position)),
            Some(ch) if ch.is_alphabetic() || ch == '_' => self.scan_word(line, position),
            Some(ch) if ch.is_ascii_digit() => self.scan_number(line, position),
            Some('\'') => self.scan_string(line, position),
            Some(':') => self.scan_colon(line, position),
            Some('<') => self.scan_less_than(line, position),
            Some('>') => self.scan_greater_than(line, position),
            Some('.') => self.scan_dot(line, position),
            Some(ch) => self.scan_single_char_token(ch, line, position),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> PascalResult<()> {
        loop {
            match self.source.current_char() {
                Some('{') => self.scan_comment()?,
                Some(ch) if ch.is_whitespace() => {
                    self.source.next_char()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    // An unterminated comment runs to the end of the file.
    fn scan_comment(&mut self) -> PascalResult<()> {
        self.source.next_char()?; // Consume '{'
        loop {
            match self.source.current_char() {
                None => return Ok(()),
                Some('}') => {
                    self.source.next_char()?; // Consume '}'
                    return Ok(());
                }
                Some(_) => {
                    self.source.next_char()?;
                }
            }
        }
    }

    fn scan_word(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        let mut text = String::new();
        while let Some(ch) = self.source.current_char() {
            if !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            text.push(ch);
            self.source.next_char()?;
        }
        Ok(self.keyword_or_identifier(text, line, position))
    }

    fn keyword_or_identifier(&self, text: String, line: usize, position: usize) -> Token {
        let kind = RESERVED_WORDS
            .get(text.to_lowercase().as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, TokenValue::None, line, position)
    }

    /// Append a run of decimal digits to `text`, returning how many were read.
    fn scan_digits(&mut self, text: &mut String) -> PascalResult<usize> {
        let mut count = 0;
        while let Some(ch) = self.source.current_char() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            count += 1;
            self.source.next_char()?;
        }
        Ok(count)
    }

    // A '.' followed by another '.' ends the number: it starts a '..' token.
    fn scan_number(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        let mut text = String::new();
        let mut is_real = false;
        self.scan_digits(&mut text)?;

        if self.source.current_char() == Some('.') && self.source.peek_char() != Some('.') {
            is_real = true;
            text.push('.');
            self.source.next_char()?; // Consume '.'
            if self.scan_digits(&mut text)? == 0 {
                return Ok(Token::error(PascalErrorCode::InvalidFraction, text, line, position));
            }
        }

        if let Some(ch @ ('e' | 'E')) = self.source.current_char() {
            is_real = true;
            text.push(ch);
            self.source.next_char()?;
            if let Some(sign @ ('+' | '-')) = self.source.current_char() {
                text.push(sign);
                self.source.next_char()?;
            }
            if self.scan_digits(&mut text)? == 0 {
                return Ok(Token::error(PascalErrorCode::InvalidExponent, text, line, position));
            }
        }

        if is_real {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    Ok(Token::new(TokenKind::Real, text, TokenValue::Real(value), line, position))
                }
                _ => Ok(Token::error(PascalErrorCode::RangeReal, text, line, position)),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Ok(Token::new(TokenKind::Integer, text, TokenValue::Integer(value), line, position)),
                Err(_) => Ok(Token::error(PascalErrorCode::RangeInteger, text, line, position)),
            }
        }
    }

    // Two adjacent quotes stand for one quote character. Whitespace inside
    // the string, including line breaks, becomes a blank.
    fn scan_string(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        let mut text = String::from("'");
        let mut value = String::new();
        self.source.next_char()?; // Consume opening quote

        loop {
            match self.source.current_char() {
                None => return Ok(Token::error(PascalErrorCode::UnexpectedEof, text, line, position)),
                Some('\'') if self.source.peek_char() == Some('\'') => {
                    text.push_str("''");
                    value.push('\'');
                    self.source.next_char()?;
                    self.source.next_char()?;
                }
                Some('\'') => {
                    text.push('\'');
                    self.source.next_char()?; // Consume closing quote
                    break;
                }
                Some(ch) => {
                    let ch = if ch.is_whitespace() { ' ' } else { ch };
                    text.push(ch);
                    value.push(ch);
                    self.source.next_char()?;
                }
            }
        }
        Ok(Token::new(TokenKind::String, text, TokenValue::Str(value), line, position))
    }

    fn scan_colon(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        self.source.next_char()?; // Consume ':'
        if self.source.current_char() == Some('=') {
            self.source.next_char()?;
            return Ok(self.symbol(":=", line, position));
        }
        Ok(self.symbol(":", line, position))
    }

    fn scan_less_than(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        self.source.next_char()?; // Consume '<'
        match self.source.current_char() {
            Some('=') => {
                self.source.next_char()?;
                Ok(self.symbol("<=", line, position))
            }
            Some('>') => {
                self.source.next_char()?;
                Ok(self.symbol("<>", line, position))
            }
            _ => Ok(self.symbol("<", line, position)),
        }
    }

    fn scan_greater_than(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        self.source.next_char()?; // Consume '>'
        if self.source.current_char() == Some('=') {
            self.source.next_char()?;
            return Ok(self.symbol(">=", line, position));
        }
        Ok(self.symbol(">", line, position))
    }

    fn scan_dot(&mut self, line: usize, position: usize) -> PascalResult<Token> {
        self.source.next_char()?; // Consume '.'
        if self.source.current_char() == Some('.') {
            self.source.next_char()?;
            return Ok(self.symbol("..", line, position));
        }
        Ok(self.symbol(".", line, position))
    }

    fn scan_single_char_token(&mut self, ch: char, line: usize, position: usize) -> PascalResult<Token> {
        self.source.next_char()?;
        let text = ch.to_string();
        match SPECIAL_SYMBOLS.get(text.as_str()) {
            Some(&kind) => Ok(Token::new(kind, text, TokenValue::None, line, position)),
            None => Ok(Token::error(PascalErrorCode::InvalidCharacter, text, line, position)),
        }
    }

    fn symbol(&self, text: &str, line: usize, position: usize) -> Token {
        let kind = SPECIAL_SYMBOLS.get(text).copied().unwrap_or(TokenKind::Error);
        Token::new(kind, text, TokenValue::None, line, position)
    }
}

/// Scan all of `text` into tokens, stopping after the end-of-file token.
pub fn scan(text: &str) -> PascalResult<Vec<Token>> {
    let source = Source::from_str(text, crate::message::MessageHandler::new())?;
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
