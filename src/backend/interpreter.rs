use crate::ast::{ICode, ICodeNode, NodeKind};
use crate::backend::Backend;
use crate::message::{Message, MessageHandler};
use crate::semantic::symboltable::SymbolTableStack;
use crate::utils::errors::{PascalError, PascalResult};
use std::time::Instant;

/// Interpreter stub: walks the program and reports how many statements
/// it visited, without evaluating anything.
pub struct Executor {
    messages: MessageHandler,
    execution_count: usize,
}

impl Executor {
    pub fn new(messages: MessageHandler) -> Self {
        Self {
            messages,
            execution_count: 0,
        }
    }
}

impl Backend for Executor {
    fn process(&mut self, icode: &ICode, symtab_stack: &SymbolTableStack) -> PascalResult<()> {
        let start = Instant::now();
        let (Some(root), Some(_)) = (icode.root(), symtab_stack.program_id()) else {
            return Err(PascalError::backend_error("execution", "nothing to execute"));
        };

        let mut statements = 0;
        root.visit(&mut |node: &ICodeNode| {
            if is_statement(node.kind) {
                statements += 1;
            }
        });
        self.execution_count += statements;

        self.messages.send(Message::InterpreterSummary {
            execution_count: self.execution_count,
            runtime_errors: 0,
            elapsed_time: start.elapsed().as_secs_f64(),
        });
        Ok(())
    }
}

fn is_statement(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Compound | NodeKind::Assign | NodeKind::Loop | NodeKind::If | NodeKind::Select | NodeKind::NoOp
    )
}
