use crate::ast::ICode;
use crate::semantic::typespec::{TypeForm, TypeId, TypeSpec};
use crate::semantic::value::Value;
use crate::utils::errors::{PascalError, PascalResult};
use std::collections::BTreeMap;
use std::fmt;

/// Handle of an entry owned by a `SymbolTableStack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

/// Handle of a table owned by a `SymbolTableStack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(usize);

impl EntryId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl TableId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The role an identifier plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Definition {
    Constant,
    EnumerationConstant,
    Type,
    Variable,
    Field,
    ValueParm,
    VarParm,
    ProgramParm,
    Program,
    Procedure,
    Function,
    Undefined,
}

impl Definition {
    pub fn text(&self) -> &'static str {
        match self {
            Definition::Constant => "constant",
            Definition::EnumerationConstant => "enumeration constant",
            Definition::Type => "type",
            Definition::Variable => "variable",
            Definition::Field => "record field",
            Definition::ValueParm => "value parameter",
            Definition::VarParm => "VAR parameter",
            Definition::ProgramParm => "program parameter",
            Definition::Program => "program",
            Definition::Procedure => "procedure",
            Definition::Function => "function",
            Definition::Undefined => "undefined",
        }
    }

    /// Definitions that may appear as the target of an assignment.
    pub fn is_variable_like(&self) -> bool {
        matches!(
            self,
            Definition::Variable | Definition::ValueParm | Definition::VarParm | Definition::Undefined
        )
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineCode {
    Declared,
    Forward,
    Read,
    Readln,
    Write,
    Writeln,
    Abs,
    Arctan,
    Chr,
    Cos,
    Eof,
    Eoln,
    Exp,
    Ln,
    Odd,
    Ord,
    Pred,
    Round,
    Sin,
    Sqr,
    Sqrt,
    Succ,
    Trunc,
}

impl RoutineCode {
    pub fn is_declared(&self) -> bool {
        matches!(self, RoutineCode::Declared | RoutineCode::Forward)
    }
}

impl fmt::Display for RoutineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Routine attributes of a program, procedure or function entry.
#[derive(Debug, Default)]
pub struct RoutineInfo {
    pub code: Option<RoutineCode>,
    pub symtab: Option<TableId>,
    pub icode: Option<ICode>,
    pub parms: Vec<EntryId>,
    pub routines: Vec<EntryId>,
}

#[derive(Debug)]
pub struct SymbolTableEntry {
    pub name: String,
    pub table: TableId,
    pub definition: Definition,
    pub type_id: Option<TypeId>,
    pub line_numbers: Vec<usize>,
    pub constant_value: Option<Value>,
    pub routine: Option<RoutineInfo>,
}

impl SymbolTableEntry {
    fn new(name: String, table: TableId) -> Self {
        Self {
            name,
            table,
            definition: Definition::Undefined,
            type_id: None,
            line_numbers: Vec::new(),
            constant_value: None,
            routine: None,
        }
    }

    pub fn append_line_number(&mut self, line: usize) {
        self.line_numbers.push(line);
    }

    pub fn routine_code(&self) -> Option<RoutineCode> {
        self.routine.as_ref().and_then(|routine| routine.code)
    }

    pub fn routine_mut(&mut self) -> &mut RoutineInfo {
        self.routine.get_or_insert_with(RoutineInfo::default)
    }

    pub fn parms(&self) -> &[EntryId] {
        self.routine.as_ref().map(|routine| routine.parms.as_slice()).unwrap_or(&[])
    }
}

/// One scope. Entries are keyed by lower-cased name and iterate sorted.
#[derive(Debug)]
pub struct SymbolTable {
    nesting_level: usize,
    entries: BTreeMap<String, EntryId>,
}

impl SymbolTable {
    fn new(nesting_level: usize) -> Self {
        Self {
            nesting_level,
            entries: BTreeMap::new(),
        }
    }

    pub fn nesting_level(&self) -> usize {
        self.nesting_level
    }

    pub fn lookup(&self, name: &str) -> Option<EntryId> {
        self.entries.get(&name.to_lowercase()).copied()
    }

    /// Entries sorted by name.
    pub fn sorted_entries(&self) -> Vec<EntryId> {
        self.entries.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns every table, entry and type created during one translation.
/// `active` holds the tables currently in scope, indexed by nesting level.
#[derive(Debug)]
pub struct SymbolTableStack {
    tables: Vec<SymbolTable>,
    entries: Vec<SymbolTableEntry>,
    types: Vec<TypeSpec>,
    active: Vec<TableId>,
    program_id: Option<EntryId>,
}

impl Default for SymbolTableStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableStack {
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::new(0)],
            entries: Vec::new(),
            types: Vec::new(),
            active: vec![TableId(0)],
            program_id: None,
        }
    }

    pub fn current_nesting_level(&self) -> usize {
        self.active.len() - 1
    }

    pub fn local_table(&self) -> TableId {
        self.active[self.active.len() - 1]
    }

    /// Create a table one level deeper than the current scope without
    /// entering it.
    pub fn create_table(&mut self) -> TableId {
        let id = TableId(self.tables.len());
        self.tables.push(SymbolTable::new(self.active.len()));
        id
    }

    /// Enter a new, empty scope one level deeper.
    pub fn push(&mut self) -> TableId {
        let id = self.create_table();
        self.active.push(id);
        id
    }

    /// Re-enter a previously created table.
    pub fn push_table(&mut self, table: TableId) {
        self.active.push(table);
    }

    pub fn pop(&mut self) -> PascalResult<TableId> {
        if self.active.len() <= 1 {
            return Err(PascalError::internal_error("Cannot pop the outermost scope - scope underflow"));
        }
        self.active
            .pop()
            .ok_or_else(|| PascalError::internal_error("scope underflow"))
    }

    /// Always creates a new entry in the local table, replacing any entry
    /// of the same name. Callers check for redefinition first.
    pub fn enter_local(&mut self, name: &str) -> EntryId {
        let table = self.local_table();
        self.enter_in(table, name)
    }

    pub fn enter_in(&mut self, table: TableId, name: &str) -> EntryId {
        let name = name.to_lowercase();
        let id = EntryId(self.entries.len());
        self.entries.push(SymbolTableEntry::new(name.clone(), table));
        self.tables[table.0].entries.insert(name, id);
        id
    }

    pub fn lookup_local(&self, name: &str) -> Option<EntryId> {
        self.tables[self.local_table().0].lookup(name)
    }

    /// Innermost-first search through the active scopes.
    pub fn lookup(&self, name: &str) -> Option<EntryId> {
        self.active
            .iter()
            .rev()
            .find_map(|table| self.tables[table.0].lookup(name))
    }

    pub fn lookup_in(&self, table: TableId, name: &str) -> Option<EntryId> {
        self.tables[table.0].lookup(name)
    }

    pub fn set_program_id(&mut self, id: EntryId) {
        self.program_id = Some(id);
    }

    pub fn program_id(&self) -> Option<EntryId> {
        self.program_id
    }

    pub fn table(&self, id: TableId) -> &SymbolTable {
        &self.tables[id.0]
    }

    pub fn entry(&self, id: EntryId) -> &SymbolTableEntry {
        &self.entries[id.0]
    }

    pub fn entry_mut(&mut self, id: EntryId) -> &mut SymbolTableEntry {
        &mut self.entries[id.0]
    }

    pub fn create_type(&mut self, form: TypeForm) -> TypeId {
        let id = TypeId::new(self.types.len());
        self.types.push(TypeSpec::new(form));
        id
    }

    pub fn type_spec(&self, id: TypeId) -> &TypeSpec {
        &self.types[id.index()]
    }

    pub fn type_spec_mut(&mut self, id: TypeId) -> &mut TypeSpec {
        &mut self.types[id.index()]
    }

    /// Type of an entry, if it has one.
    pub fn entry_type(&self, id: EntryId) -> Option<TypeId> {
        self.entry(id).type_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut stack = SymbolTableStack::new();
        let id = stack.enter_local("Counter");
        assert_eq!(stack.entry(id).name, "counter");
        assert_eq!(stack.lookup_local("COUNTER"), Some(id));
    }

    #[test]
    fn pop_refuses_the_outermost_scope() {
        let mut stack = SymbolTableStack::new();
        assert!(stack.pop().is_err());
        stack.push();
        assert!(stack.pop().is_ok());
        assert_eq!(stack.current_nesting_level(), 0);
    }

    #[test]
    fn push_table_reenters_an_existing_scope() {
        let mut stack = SymbolTableStack::new();
        let table = stack.push();
        let x = stack.enter_local("x");
        stack.pop().unwrap();
        assert_eq!(stack.lookup("x"), None);

        stack.push_table(table);
        assert_eq!(stack.lookup("x"), Some(x));
        assert_eq!(stack.table(table).nesting_level(), 1);
    }

    #[test]
    fn sorted_entries_are_ordered_by_name() {
        let mut stack = SymbolTableStack::new();
        let b = stack.enter_local("b");
        let a = stack.enter_local("a");
        let c = stack.enter_local("c");
        let table = stack.local_table();
        assert_eq!(stack.table(table).sorted_entries(), vec![a, b, c]);
    }
}
