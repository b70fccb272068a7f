pub mod node;

pub use node::{ICode, ICodeNode, NodeKind};
