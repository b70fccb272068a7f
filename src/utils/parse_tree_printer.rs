//! Dumps of the intermediate code: an indented tag listing and a
//! Graphviz description.

use crate::ast::{ICodeNode, NodeKind};
use crate::semantic::symboltable::{EntryId, SymbolTableStack};
use crate::semantic::typespec::TypeId;
use crate::semantic::value::Value;
use crate::utils::config::listing::{INDENT_WIDTH, LINE_WIDTH};
use crate::utils::errors::PascalResult;
use crate::utils::string_utils::{indentation, write_line};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Characters that must be escaped inside a quoted DOT label
    static ref DOT_SPECIAL: Regex = Regex::new(r#"["\\]"#).unwrap();
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Str(text) => text.clone(),
        other => other.to_string(),
    }
}

fn type_name(stack: &SymbolTableStack, type_id: TypeId) -> String {
    match stack.type_spec(type_id).identifier {
        Some(id) => stack.entry(id).name.clone(),
        None => format!("$anon_{}$", type_id.index()),
    }
}

/// Every routine's entry, program first, then nested routines depth first.
fn routines_of(stack: &SymbolTableStack) -> Vec<EntryId> {
    fn collect(stack: &SymbolTableStack, id: EntryId, into: &mut Vec<EntryId>) {
        into.push(id);
        if let Some(routine) = &stack.entry(id).routine {
            for child in &routine.routines {
                collect(stack, *child, into);
            }
        }
    }

    let mut routines = Vec::new();
    if let Some(program_id) = stack.program_id() {
        collect(stack, program_id, &mut routines);
    }
    routines
}

fn icode_root(stack: &SymbolTableStack, id: EntryId) -> Option<&ICodeNode> {
    stack
        .entry(id)
        .routine
        .as_ref()
        .and_then(|routine| routine.icode.as_ref())
        .and_then(|icode| icode.root())
}

/// Indented listing such as
///
/// ```text
/// <ASSIGN line="4" type_id="integer">
///   <VARIABLE id="x" level="1" type_id="integer" />
///   <INTEGER_CONSTANT value="1" type_id="integer" />
/// </ASSIGN>
/// ```
pub struct ParseTreePrinter<'a> {
    stack: &'a SymbolTableStack,
    output: String,
    line: String,
    indentation: String,
}

impl<'a> ParseTreePrinter<'a> {
    pub fn new(stack: &'a SymbolTableStack) -> Self {
        Self {
            stack,
            output: String::new(),
            line: String::new(),
            indentation: String::new(),
        }
    }

    pub fn print(mut self) -> PascalResult<String> {
        for routine_id in routines_of(self.stack) {
            let entry = self.stack.entry(routine_id);
            let title = format!(" {} {} ", entry.definition.text().to_uppercase(), entry.name);
            write_line(&mut self.output, format_args!("\n{:=^width$}\n", title, width = LINE_WIDTH))?;

            if let Some(root) = icode_root(self.stack, routine_id) {
                self.print_node(root);
                self.flush();
            }
        }
        Ok(self.output)
    }

    fn print_node(&mut self, node: &ICodeNode) {
        let indent = self.indentation.clone();
        self.append(&indent);
        self.append(&format!("<{}", node.kind.name()));
        self.print_attributes(node);

        if node.children.is_empty() {
            self.append(" />");
            self.flush();
            return;
        }

        self.append(">");
        self.flush();

        let saved = self.indentation.clone();
        self.indentation.push_str(&indentation(1, INDENT_WIDTH));
        for child in &node.children {
            self.print_node(child);
        }
        self.indentation = saved;

        let indent = self.indentation.clone();
        self.append(&indent);
        self.append(&format!("</{}>", node.kind.name()));
        self.flush();
    }

    fn print_attributes(&mut self, node: &ICodeNode) {
        let saved = self.indentation.clone();
        self.indentation.push_str(&indentation(1, INDENT_WIDTH));

        if let Some(line) = node.line {
            self.print_attribute("line", &line.to_string());
        }
        if let Some(id) = node.id {
            let entry = self.stack.entry(id);
            let name = entry.name.clone();
            let level = self.stack.table(entry.table).nesting_level();
            self.print_attribute("id", &name);
            self.print_attribute("level", &level.to_string());
        }
        if let Some(value) = &node.value {
            self.print_attribute("value", &value_text(value));
        }
        if let Some(type_id) = node.type_id {
            self.print_attribute("type_id", &type_name(self.stack, type_id));
        }

        self.indentation = saved;
    }

    fn print_attribute(&mut self, key: &str, value: &str) {
        self.append(" ");
        self.append(&format!("{}=\"{}\"", key, value));
    }

    // Text that would run past LINE_WIDTH starts a new, indented line.
    fn append(&mut self, text: &str) {
        let line_break = !self.line.is_empty() && self.line.len() + text.len() > LINE_WIDTH;
        if line_break {
            self.flush();
            self.line.push_str(&self.indentation);
        }
        if !(line_break && text == " ") {
            self.line.push_str(text);
        }
    }

    fn flush(&mut self) {
        if !self.line.is_empty() {
            self.output.push_str(&self.line);
            self.output.push('\n');
            self.line.clear();
        }
    }
}

/// Graphviz `digraph` of every routine's intermediate code.
pub struct ParseTreeDotPrinter<'a> {
    stack: &'a SymbolTableStack,
    index: usize,
    node_lines: Vec<String>,
    edge_lines: Vec<String>,
}

impl<'a> ParseTreeDotPrinter<'a> {
    pub fn new(stack: &'a SymbolTableStack) -> Self {
        Self {
            stack,
            index: 0,
            node_lines: Vec::new(),
            edge_lines: Vec::new(),
        }
    }

    pub fn print(mut self) -> PascalResult<String> {
        for routine_id in routines_of(self.stack) {
            if let Some(root) = icode_root(self.stack, routine_id) {
                self.print_node(root);
            }
        }

        let mut buf = String::new();
        write_line(&mut buf, format_args!("digraph \"parse tree\"\n{{"))?;
        write_line(&mut buf, format_args!("  rankdir=\"LR\""))?;
        write_line(&mut buf, format_args!("  {{"))?;
        write_line(&mut buf, format_args!("    node [shape=box, style=\"rounded\"]"))?;
        for line in &self.node_lines {
            write_line(&mut buf, format_args!("    {}", line))?;
        }
        write_line(&mut buf, format_args!("  }}"))?;
        for line in &self.edge_lines {
            write_line(&mut buf, format_args!("  {}", line))?;
        }
        write_line(&mut buf, format_args!("}}"))?;
        Ok(buf)
    }

    fn print_node(&mut self, node: &ICodeNode) -> String {
        let name = format!("node{}", self.index);
        self.index += 1;

        let label = self.label(node);
        self.node_lines.push(format!("{} [label = \"{}\"]", name, label));

        for child in &node.children {
            let child_name = self.print_node(child);
            self.edge_lines.push(format!("{} -> {}", name, child_name));
        }
        name
    }

    fn label(&self, node: &ICodeNode) -> String {
        let mut parts = vec![node.kind.name().to_string()];
        if let Some(line) = node.line {
            parts.push(format!("LINE: {}", line));
        }
        if let Some(id) = node.id {
            parts.push(format!("ID: {}", self.stack.entry(id).name));
        }
        if let Some(value) = &node.value {
            let text = match (node.kind, value) {
                (NodeKind::StringConstant, Value::Str(text)) => format!("'{}'", text),
                _ => value_text(value),
            };
            parts.push(format!("VALUE: {}", text));
        }
        if let Some(type_id) = node.type_id {
            parts.push(format!("TYPE: {}", type_name(self.stack, type_id)));
        }

        parts
            .iter()
            .map(|part| DOT_SPECIAL.replace_all(part, r"\$0").into_owned())
            .collect::<Vec<_>>()
            .join("\\n")
    }
}
