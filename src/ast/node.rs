use crate::semantic::symboltable::EntryId;
use crate::semantic::typespec::TypeId;
use crate::semantic::value::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Program structure
    Program,
    Procedure,
    Function,

    // Statements
    Compound,
    Assign,
    Loop,
    Test,
    Call,
    Parameters,
    If,
    Select,
    SelectBranch,
    SelectConstants,
    NoOp,

    // Relational operators
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Not,

    // Additive operators
    Add,
    Subtract,
    Or,
    Negate,

    // Multiplicative operators
    Multiply,
    IntegerDivide,
    FloatDivide,
    Mod,
    And,

    // Operands
    Variable,
    Subscripts,
    Field,
    IntegerConstant,
    RealConstant,
    StringConstant,

    // write/writeln argument with optional width and precision
    WriteParm,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Procedure => "PROCEDURE",
            NodeKind::Function => "FUNCTION",
            NodeKind::Compound => "COMPOUND",
            NodeKind::Assign => "ASSIGN",
            NodeKind::Loop => "LOOP",
            NodeKind::Test => "TEST",
            NodeKind::Call => "CALL",
            NodeKind::Parameters => "PARAMETERS",
            NodeKind::If => "IF",
            NodeKind::Select => "SELECT",
            NodeKind::SelectBranch => "SELECT_BRANCH",
            NodeKind::SelectConstants => "SELECT_CONSTANTS",
            NodeKind::NoOp => "NO_OP",
            NodeKind::Eq => "EQ",
            NodeKind::Ne => "NE",
            NodeKind::Lt => "LT",
            NodeKind::Le => "LE",
            NodeKind::Gt => "GT",
            NodeKind::Ge => "GE",
            NodeKind::Not => "NOT",
            NodeKind::Add => "ADD",
            NodeKind::Subtract => "SUBTRACT",
            NodeKind::Or => "OR",
            NodeKind::Negate => "NEGATE",
            NodeKind::Multiply => "MULTIPLY",
            NodeKind::IntegerDivide => "INTEGER_DIVIDE",
            NodeKind::FloatDivide => "FLOAT_DIVIDE",
            NodeKind::Mod => "MOD",
            NodeKind::And => "AND",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Subscripts => "SUBSCRIPTS",
            NodeKind::Field => "FIELD",
            NodeKind::IntegerConstant => "INTEGER_CONSTANT",
            NodeKind::RealConstant => "REAL_CONSTANT",
            NodeKind::StringConstant => "STRING_CONSTANT",
            NodeKind::WriteParm => "WRITE_PARM",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One node of a routine's intermediate code tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ICodeNode {
    pub kind: NodeKind,
    pub line: Option<usize>,
    pub id: Option<EntryId>,
    pub value: Option<Value>,
    pub type_id: Option<TypeId>,
    pub children: Vec<ICodeNode>,
}

impl ICodeNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            line: None,
            id: None,
            value: None,
            type_id: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(kind: NodeKind, value: Value, type_id: Option<TypeId>) -> Self {
        let mut node = Self::new(kind);
        node.value = Some(value);
        node.type_id = type_id;
        node
    }

    pub fn add_child(&mut self, child: ICodeNode) {
        self.children.push(child);
    }

    pub fn add_optional_child(&mut self, child: Option<ICodeNode>) {
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Duplicate of this node's attributes without its children.
    pub fn copy(&self) -> ICodeNode {
        ICodeNode {
            kind: self.kind,
            line: self.line,
            id: self.id,
            value: self.value.clone(),
            type_id: self.type_id,
            children: Vec::new(),
        }
    }

    pub fn child(&self, index: usize) -> Option<&ICodeNode> {
        self.children.get(index)
    }

    /// Pre-order traversal.
    pub fn visit<F: FnMut(&ICodeNode)>(&self, visitor: &mut F) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    pub fn count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }
}

/// Intermediate code of one routine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ICode {
    root: Option<ICodeNode>,
}

impl ICode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, root: ICodeNode) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<&ICodeNode> {
        self.root.as_ref()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_keeps_attributes_and_drops_children() {
        let mut node = ICodeNode::with_value(NodeKind::IntegerConstant, Value::Integer(3), None);
        node.line = Some(4);
        node.add_child(ICodeNode::new(NodeKind::NoOp));

        let copy = node.copy();
        assert_eq!(copy.kind, NodeKind::IntegerConstant);
        assert_eq!(copy.value, Some(Value::Integer(3)));
        assert_eq!(copy.line, Some(4));
        assert!(copy.children.is_empty());
    }

    #[test]
    fn visit_walks_in_pre_order() {
        let mut compound = ICodeNode::new(NodeKind::Compound);
        let mut assign = ICodeNode::new(NodeKind::Assign);
        assign.add_child(ICodeNode::new(NodeKind::Variable));
        compound.add_child(assign);

        let mut icode = ICode::new();
        icode.set_root(compound);
        let root = icode.root().unwrap();

        let mut seen = Vec::new();
        root.visit(&mut |node: &ICodeNode| seen.push(node.kind));
        assert_eq!(seen, vec![NodeKind::Compound, NodeKind::Assign, NodeKind::Variable]);
        assert_eq!(root.count(), 3);
    }
}
