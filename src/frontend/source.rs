use crate::message::{Message, MessageHandler};
use crate::utils::errors::PascalResult;
use std::io::BufRead;

/// End-of-line marker returned at the end of every source line.
pub const EOL: char = '\n';

/// Line-buffered character source. `None` marks the end of the file.
pub struct Source<'a> {
    reader: Box<dyn BufRead + 'a>,
    line: Vec<char>,
    line_number: usize,
    position: usize,
    at_eof: bool,
    messages: MessageHandler,
}

impl<'a> Source<'a> {
    pub fn new(reader: Box<dyn BufRead + 'a>, messages: MessageHandler) -> PascalResult<Self> {
        let mut source = Self {
            reader,
            line: Vec::new(),
            line_number: 0,
            position: 0,
            at_eof: false,
            messages,
        };
        source.read_line()?;
        Ok(source)
    }

    pub fn from_str(text: &'a str, messages: MessageHandler) -> PascalResult<Self> {
        Self::new(Box::new(text.as_bytes()), messages)
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_char(&self) -> Option<char> {
        if self.at_eof {
            None
        } else if self.position >= self.line.len() {
            Some(EOL)
        } else {
            Some(self.line[self.position])
        }
    }

    /// Advance one character and return the new current character.
    pub fn next_char(&mut self) -> PascalResult<Option<char>> {
        if self.at_eof {
            return Ok(None);
        }
        self.position += 1;
        if self.position > self.line.len() {
            self.read_line()?;
        }
        Ok(self.current_char())
    }

    /// The character after the current one, without consuming anything.
    /// Never looks past the end of the current line.
    pub fn peek_char(&self) -> Option<char> {
        if self.at_eof {
            return None;
        }
        let next = self.position + 1;
        if next < self.line.len() {
            Some(self.line[next])
        } else {
            Some(EOL)
        }
    }

    fn read_line(&mut self) -> PascalResult<()> {
        let mut text = String::new();
        let bytes = self.reader.read_line(&mut text)?;
        self.position = 0;
        if bytes == 0 {
            self.at_eof = true;
            self.line.clear();
            return Ok(());
        }

        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        self.line_number += 1;
        self.line = text.chars().collect();
        self.messages.send(Message::SourceLine {
            line_number: self.line_number,
            text,
        });
        Ok(())
    }
}
