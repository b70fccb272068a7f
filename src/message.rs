use crate::frontend::token::{TokenKind, TokenValue};
use std::cell::RefCell;
use std::rc::Rc;

/// Events reported by the source, the parser and the back ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SourceLine {
        line_number: usize,
        text: String,
    },
    Token {
        line_number: usize,
        position: usize,
        kind: TokenKind,
        text: String,
        value: TokenValue,
    },
    SyntaxError {
        line_number: usize,
        position: usize,
        text: String,
        message: String,
    },
    ParserSummary {
        line_count: usize,
        error_count: usize,
        elapsed_time: f64,
    },
    CompilerSummary {
        instruction_count: usize,
        elapsed_time: f64,
    },
    InterpreterSummary {
        execution_count: usize,
        runtime_errors: usize,
        elapsed_time: f64,
    },
    Fatal {
        message: String,
        status: i32,
    },
}

pub trait MessageListener {
    fn message_received(&mut self, message: &Message);
}

pub type ListenerRef = Rc<RefCell<dyn MessageListener>>;

/// Fan-out of messages to every registered listener.
#[derive(Clone, Default)]
pub struct MessageHandler {
    listeners: Vec<ListenerRef>,
}

impl MessageHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: ListenerRef) {
        self.listeners.push(listener);
    }

    pub fn send(&self, message: Message) {
        for listener in &self.listeners {
            listener.borrow_mut().message_received(&message);
        }
    }
}

/// Listener that keeps every message it receives.
#[derive(Debug, Default)]
pub struct MessageLog {
    pub messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// (line, message) of every syntax error received so far.
    pub fn syntax_errors(&self) -> Vec<(usize, String)> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::SyntaxError { line_number, message, .. } => Some((*line_number, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count_errors(&self, message: &str) -> usize {
        self.syntax_errors().iter().filter(|(_, m)| m == message).count()
    }
}

impl MessageListener for MessageLog {
    fn message_received(&mut self, message: &Message) {
        self.messages.push(message.clone());
    }
}
