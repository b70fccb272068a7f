//! Recursive-descent parser for Pascal.
//!
//! Grammar areas live in separate files, each adding an `impl Parser` block:
//! program and routine headers, declarations, type specifications,
//! statements, expressions, variables and calls.
//!
//! Every method returns `PascalResult`. The only error that escapes is the
//! fatal one raised when the syntax error budget runs out; everything else
//! is flagged and recovered from by synchronizing on a token set.

mod calls;
mod declarations;
mod expressions;
mod program;
mod statements;
mod types;
mod variables;

use crate::frontend::errors::{ErrorHandler, PascalErrorCode};
use crate::frontend::scanner::Scanner;
use crate::frontend::source::Source;
use crate::frontend::token::{Token, TokenKind};
use crate::frontend::token_sets::TokenSet;
use crate::message::{Message, MessageHandler};
use crate::semantic::predefined::Predefined;
use crate::semantic::symboltable::{SymbolTableStack, TableId};
use crate::semantic::type_checker::TypeChecker;
use crate::semantic::typespec::TypeId;
use crate::utils::errors::PascalResult;
use std::time::Instant;

/// Everything a successful parse hands to the back end.
#[derive(Debug)]
pub struct ParseOutcome {
    pub symtab_stack: SymbolTableStack,
    pub predefined: Predefined,
    pub error_count: usize,
    pub line_count: usize,
    pub elapsed_time: f64,
}

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current_token: Token,
    symtab_stack: SymbolTableStack,
    predefined: Predefined,
    error_handler: ErrorHandler,
    messages: MessageHandler,
    trace_tokens: bool,
    dummy_counter: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: Source<'a>, messages: MessageHandler) -> Self {
        let mut symtab_stack = SymbolTableStack::new();
        let predefined = Predefined::initialize(&mut symtab_stack);
        Self {
            scanner: Scanner::new(source),
            current_token: Token::eof(0, 0),
            symtab_stack,
            predefined,
            error_handler: ErrorHandler::new(messages.clone()),
            messages,
            trace_tokens: false,
            dummy_counter: 0,
        }
    }

    /// Report every token fetched as a `Message::Token`.
    pub fn trace_tokens(mut self, enabled: bool) -> Self {
        self.trace_tokens = enabled;
        self
    }

    /// Parse a whole program.
    pub fn parse(mut self) -> PascalResult<ParseOutcome> {
        let start = Instant::now();
        self.next_token()?;
        self.parse_program()?;

        let elapsed_time = start.elapsed().as_secs_f64();
        let line_count = self.scanner.source().line_number();
        let error_count = self.error_handler.error_count();
        self.messages.send(Message::ParserSummary {
            line_count,
            error_count,
            elapsed_time,
        });

        Ok(ParseOutcome {
            symtab_stack: self.symtab_stack,
            predefined: self.predefined,
            error_count,
            line_count,
            elapsed_time,
        })
    }

    pub fn error_count(&self) -> usize {
        self.error_handler.error_count()
    }

    fn current(&self) -> Token {
        self.current_token.clone()
    }

    fn current_kind(&self) -> TokenKind {
        self.current_token.kind
    }

    fn at_eof(&self) -> bool {
        self.current_token.is_eof()
    }

    /// Fetch the next token. Error tokens from the scanner are flagged
    /// here and skipped.
    fn next_token(&mut self) -> PascalResult<Token> {
        loop {
            let token = self.scanner.next_token()?;
            if self.trace_tokens {
                self.messages.send(Message::Token {
                    line_number: token.line,
                    position: token.position,
                    kind: token.kind,
                    text: token.text.clone(),
                    value: token.value.clone(),
                });
            }
            if let crate::frontend::token::TokenValue::Error(code) = token.value {
                self.error_handler.flag(&token, code)?;
                continue;
            }
            self.current_token = token;
            return Ok(self.current());
        }
    }

    fn flag(&mut self, token: &Token, code: PascalErrorCode) -> PascalResult<()> {
        self.error_handler.flag(token, code)
    }

    fn flag_current(&mut self, code: PascalErrorCode) -> PascalResult<()> {
        let token = self.current();
        self.error_handler.flag(&token, code)
    }

    /// Return the current token if it is in `set`. Otherwise flag
    /// UNEXPECTED_TOKEN once and skip to the first token in `set` or EOF.
    fn synchronize(&mut self, set: &TokenSet) -> PascalResult<Token> {
        if set.contains(&self.current_kind()) {
            return Ok(self.current());
        }

        self.flag_current(PascalErrorCode::UnexpectedToken)?;
        while !self.at_eof() && !set.contains(&self.current_kind()) {
            self.next_token()?;
        }
        Ok(self.current())
    }

    /// Consume one or more semicolons; flag MISSING_SEMICOLON instead if
    /// the current token starts something in `next_start`.
    fn skip_semicolons(&mut self, next_start: &TokenSet) -> PascalResult<()> {
        if self.current_kind() == TokenKind::Semicolon {
            while self.current_kind() == TokenKind::Semicolon {
                self.next_token()?;
            }
        } else if next_start.contains(&self.current_kind()) {
            self.flag_current(PascalErrorCode::MissingSemicolon)?;
        }
        Ok(())
    }

    /// Run `body` with `table` pushed as the innermost scope. The table is
    /// popped again whatever `body` returns.
    fn in_scope<T>(&mut self, table: TableId, body: impl FnOnce(&mut Self) -> PascalResult<T>) -> PascalResult<T> {
        self.symtab_stack.push_table(table);
        let result = body(self);
        self.symtab_stack.pop()?;
        result
    }

    fn checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(&self.symtab_stack, &self.predefined)
    }

    fn undefined_type(&self) -> Option<TypeId> {
        Some(self.predefined.undefined_type)
    }
}
