pub mod config;
pub mod cross_referencer;
pub mod errors;
pub mod parse_tree_printer;
pub mod string_utils;

pub use errors::*;
pub use string_utils::write_line;
