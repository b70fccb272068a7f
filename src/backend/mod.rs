//! Back ends that consume a successfully parsed program.

pub mod compiler;
pub mod interpreter;

use crate::ast::ICode;
use crate::message::MessageHandler;
use crate::semantic::symboltable::SymbolTableStack;
use crate::utils::errors::PascalResult;

pub use compiler::CodeGenerator;
pub use interpreter::Executor;

/// Consumer of the front end's output. Called once per translation, and
/// only when parsing finished without errors.
pub trait Backend {
    fn process(&mut self, icode: &ICode, symtab_stack: &SymbolTableStack) -> PascalResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Compile,
    Interpret,
}

pub fn create_backend(kind: BackendKind, messages: MessageHandler) -> Box<dyn Backend> {
    match kind {
        BackendKind::Compile => Box::new(CodeGenerator::new(messages)),
        BackendKind::Interpret => Box::new(Executor::new(messages)),
    }
}
