pub mod predefined;
pub mod symboltable;
pub mod type_checker;
pub mod typespec;
pub mod value;

pub use predefined::Predefined;
pub use symboltable::{
    Definition, EntryId, RoutineCode, RoutineInfo, SymbolTable, SymbolTableEntry, SymbolTableStack, TableId,
};
pub use type_checker::TypeChecker;
pub use typespec::{TypeForm, TypeId, TypeSpec};
pub use value::Value;
