use crate::ast::ICode;
use crate::backend::Backend;
use crate::message::{Message, MessageHandler};
use crate::semantic::symboltable::SymbolTableStack;
use crate::utils::errors::{PascalError, PascalResult};
use std::time::Instant;

/// Code generator stub. It walks the program's intermediate code and
/// reports how many nodes it would translate.
pub struct CodeGenerator {
    messages: MessageHandler,
}

impl CodeGenerator {
    pub fn new(messages: MessageHandler) -> Self {
        Self { messages }
    }
}

impl Backend for CodeGenerator {
    fn process(&mut self, icode: &ICode, symtab_stack: &SymbolTableStack) -> PascalResult<()> {
        let start = Instant::now();
        if symtab_stack.program_id().is_none() {
            return Err(PascalError::backend_error("code generation", "no program entry"));
        }

        let instruction_count = icode.root().map_or(0, |root| root.count());
        self.messages.send(Message::CompilerSummary {
            instruction_count,
            elapsed_time: start.elapsed().as_secs_f64(),
        });
        Ok(())
    }
}
