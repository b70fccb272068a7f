use crate::semantic::symboltable::{Definition, EntryId, SymbolTableStack, TableId};
use crate::semantic::typespec::{TypeForm, TypeId};
use crate::utils::config::listing::NAME_WIDTH;
use crate::utils::errors::PascalResult;
use crate::utils::string_utils::write_line;
use std::fmt;

/// Cross-reference listing of every identifier, starting at the program
/// and descending into nested routines and record types.
pub struct CrossReferencer<'a> {
    stack: &'a SymbolTableStack,
    indent: String,
}

impl<'a> CrossReferencer<'a> {
    pub fn new(stack: &'a SymbolTableStack) -> Self {
        Self {
            stack,
            indent: " ".repeat(NAME_WIDTH * 3),
        }
    }

    pub fn print(&self) -> PascalResult<String> {
        let mut buf = String::new();
        write_line(&mut buf, format_args!("{:=^width$}", " CROSS-REFERENCE TABLE ", width = NAME_WIDTH * 5))?;
        if let Some(program_id) = self.stack.program_id() {
            self.print_routine(&mut buf, program_id)?;
        }
        Ok(buf)
    }

    fn print_column_headings(&self, buf: &mut String) -> PascalResult<()> {
        write_line(
            buf,
            format_args!(
                "\n{:<name$}{:<lines$}Type specification",
                "Identifier",
                "Line numbers",
                name = NAME_WIDTH,
                lines = NAME_WIDTH * 2
            ),
        )?;
        write_line(buf, format_args!("{}", "-".repeat(NAME_WIDTH * 5)))
    }

    fn print_routine(&self, buf: &mut String, routine_id: EntryId) -> PascalResult<()> {
        let entry = self.stack.entry(routine_id);
        write_line(buf, format_args!("\n*** {} {} ***", entry.definition.text().to_uppercase(), entry.name))?;
        self.print_column_headings(buf)?;

        let Some(routine) = &entry.routine else {
            return Ok(());
        };
        let mut record_types = Vec::new();
        if let Some(table) = routine.symtab {
            self.print_table(buf, table, &mut record_types)?;
        }
        self.print_records(buf, &record_types)?;

        for child in &routine.routines {
            self.print_routine(buf, *child)?;
        }
        Ok(())
    }

    fn print_table(&self, buf: &mut String, table: TableId, record_types: &mut Vec<TypeId>) -> PascalResult<()> {
        for id in self.stack.table(table).sorted_entries() {
            let entry = self.stack.entry(id);
            let lines: Vec<String> = entry.line_numbers.iter().map(|line| format!("{:03}", line)).collect();
            write_line(buf, format_args!("{:<width$}{}", entry.name, lines.join(" "), width = NAME_WIDTH))?;
            self.print_entry(buf, id, record_types)?;
        }
        Ok(())
    }

    fn print_records(&self, buf: &mut String, record_types: &[TypeId]) -> PascalResult<()> {
        for &record_type in record_types {
            let TypeForm::Record { symtab } = self.stack.type_spec(record_type).form else {
                continue;
            };

            write_line(buf, format_args!("\n--- RECORD {} ---", self.stack.type_name(record_type)))?;
            self.print_column_headings(buf)?;
            let mut nested = Vec::new();
            self.print_table(buf, symtab, &mut nested)?;
            self.print_records(buf, &nested)?;
        }
        Ok(())
    }

    fn print_entry(&self, buf: &mut String, id: EntryId, record_types: &mut Vec<TypeId>) -> PascalResult<()> {
        let entry = self.stack.entry(id);
        let level = self.stack.table(entry.table).nesting_level();
        self.detail(buf, format_args!("Defined as: {}", entry.definition))?;
        self.detail(buf, format_args!("Scope nesting level: {}", level))?;

        let Some(type_id) = entry.type_id else {
            return Ok(());
        };
        self.print_type(buf, type_id)?;

        let type_identifier = self.stack.type_spec(type_id).identifier;
        match entry.definition {
            Definition::Constant => {
                if let Some(value) = &entry.constant_value {
                    self.detail(buf, format_args!("Value = {}", value))?;
                }
                if type_identifier.is_none() {
                    self.print_type_detail(buf, type_id, record_types)?;
                }
            }
            Definition::EnumerationConstant => {
                if let Some(value) = &entry.constant_value {
                    self.detail(buf, format_args!("Value = {}", value))?;
                }
            }
            // Only where the type is first named
            Definition::Type => {
                if type_identifier == Some(id) {
                    self.print_type_detail(buf, type_id, record_types)?;
                }
            }
            Definition::Variable | Definition::Field | Definition::ValueParm | Definition::VarParm => {
                if type_identifier.is_none() {
                    self.print_type_detail(buf, type_id, record_types)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn print_type(&self, buf: &mut String, type_id: TypeId) -> PascalResult<()> {
        let spec = self.stack.type_spec(type_id);
        let name = self.stack.type_name(type_id);
        self.detail(buf, format_args!("Type form = {}, Type id = {}", spec.form, name))
    }

    fn print_type_detail(&self, buf: &mut String, type_id: TypeId, record_types: &mut Vec<TypeId>) -> PascalResult<()> {
        match &self.stack.type_spec(type_id).form {
            TypeForm::Scalar => {}
            TypeForm::Enumeration { constants } => {
                self.detail(buf, format_args!("--- Enumeration constants ---"))?;
                for &constant in constants {
                    let entry = self.stack.entry(constant);
                    let value = entry.constant_value.as_ref().map(|v| v.to_string()).unwrap_or_default();
                    self.detail(buf, format_args!("{:<width$} = {}", entry.name, value, width = NAME_WIDTH))?;
                }
            }
            TypeForm::Subrange {
                base_type,
                min_value,
                max_value,
            } => {
                self.detail(buf, format_args!("--- Base type ---"))?;
                if let Some(base_type) = *base_type {
                    self.print_type(buf, base_type)?;
                    if self.stack.type_spec(base_type).identifier.is_none() {
                        self.print_type_detail(buf, base_type, record_types)?;
                    }
                }
                self.detail(buf, format_args!("Range = {}..{}", Bound(*min_value), Bound(*max_value)))?;
            }
            TypeForm::Array {
                index_type,
                element_type,
                element_count,
            } => {
                self.detail(buf, format_args!("--- INDEX TYPE ---"))?;
                if let Some(index_type) = *index_type {
                    self.print_type(buf, index_type)?;
                    if self.stack.type_spec(index_type).identifier.is_none() {
                        self.print_type_detail(buf, index_type, record_types)?;
                    }
                }

                self.detail(buf, format_args!("--- ELEMENT TYPE ---"))?;
                if let Some(element_type) = *element_type {
                    self.print_type(buf, element_type)?;
                    self.detail(buf, format_args!("{} elements", element_count))?;
                    if self.stack.type_spec(element_type).identifier.is_none() {
                        self.print_type_detail(buf, element_type, record_types)?;
                    }
                }
            }
            TypeForm::Record { .. } => record_types.push(type_id),
        }
        Ok(())
    }

    fn detail(&self, buf: &mut String, args: fmt::Arguments) -> PascalResult<()> {
        write_line(buf, format_args!("{}{}", self.indent, args))
    }
}

// Subrange limit that may be missing after a syntax error
struct Bound(Option<i64>);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "?"),
        }
    }
}
