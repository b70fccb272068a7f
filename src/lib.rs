use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod backend;
pub mod frontend;
pub mod message;
pub mod semantic;
pub mod utils;

use crate::ast::ICode;
use crate::backend::Backend;
use crate::frontend::{ParseOutcome, Parser, Source};
use crate::message::MessageHandler;
use crate::semantic::symboltable::EntryId;
use crate::utils::errors::{PascalError, PascalResult};

pub const VERSION: &str = "0.1.0";

pub fn read(filename: &Path) -> PascalResult<String> {
    let path = Path::new(filename);

    match path.extension() {
        Some(ext) if ext == "pas" => {}
        _ => {
            return Err(PascalError::FileReadError("File must have a .pas extension".to_string()));
        }
    }
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Send a `Message::Token` for every token scanned.
    pub trace_tokens: bool,
}

/// Result of running the front end and, when it parsed cleanly, a back end.
#[derive(Debug)]
pub struct Translation {
    pub outcome: ParseOutcome,
    pub backend_invoked: bool,
}

impl Translation {
    pub fn error_count(&self) -> usize {
        self.outcome.error_count
    }

    pub fn program_id(&self) -> Option<EntryId> {
        self.outcome.symtab_stack.program_id()
    }

    /// Intermediate code of the main program.
    pub fn program_icode(&self) -> Option<&ICode> {
        let id = self.program_id()?;
        routine_icode(&self.outcome, id)
    }
}

/// Intermediate code attached to a routine entry.
pub fn routine_icode(outcome: &ParseOutcome, id: EntryId) -> Option<&ICode> {
    outcome
        .symtab_stack
        .entry(id)
        .routine
        .as_ref()
        .and_then(|routine| routine.icode.as_ref())
}

/// Parse `text` without running a back end.
pub fn parse_source(text: &str, options: Options, messages: MessageHandler) -> PascalResult<ParseOutcome> {
    let source = Source::from_str(text, messages.clone())?;
    Parser::new(source, messages).trace_tokens(options.trace_tokens).parse()
}

/// Parse `text` and hand the program to `backend` if no errors were
/// flagged. A fatal error budget overrun comes back as
/// `Err(PascalError::TooManyErrors)` and the back end is never called.
pub fn translate(
    text: &str,
    backend: &mut dyn Backend,
    options: Options,
    messages: MessageHandler,
) -> PascalResult<Translation> {
    let outcome = parse_source(text, options, messages)?;
    let mut translation = Translation {
        outcome,
        backend_invoked: false,
    };

    if translation.error_count() == 0 {
        let icode = translation
            .program_icode()
            .cloned()
            .ok_or_else(|| PascalError::internal_error("program has no intermediate code"))?;
        backend.process(&icode, &translation.outcome.symtab_stack)?;
        translation.backend_invoked = true;
    }
    Ok(translation)
}
