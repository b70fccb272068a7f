use crate::semantic::symboltable::{Definition, RoutineCode, SymbolTableStack};
use crate::semantic::typespec::{TypeForm, TypeId};
use crate::semantic::value::Value;

/// Built-in types and identifiers of one translation, entered into the
/// outermost scope before parsing starts.
#[derive(Debug, Clone)]
pub struct Predefined {
    pub integer_type: TypeId,
    pub real_type: TypeId,
    pub boolean_type: TypeId,
    pub char_type: TypeId,
    pub undefined_type: TypeId,
}

const STANDARD_PROCEDURES: [(&str, RoutineCode); 4] = [
    ("read", RoutineCode::Read),
    ("readln", RoutineCode::Readln),
    ("write", RoutineCode::Write),
    ("writeln", RoutineCode::Writeln),
];

const STANDARD_FUNCTIONS: [(&str, RoutineCode); 17] = [
    ("abs", RoutineCode::Abs),
    ("arctan", RoutineCode::Arctan),
    ("chr", RoutineCode::Chr),
    ("cos", RoutineCode::Cos),
    ("eof", RoutineCode::Eof),
    ("eoln", RoutineCode::Eoln),
    ("exp", RoutineCode::Exp),
    ("ln", RoutineCode::Ln),
    ("odd", RoutineCode::Odd),
    ("ord", RoutineCode::Ord),
    ("pred", RoutineCode::Pred),
    ("round", RoutineCode::Round),
    ("sin", RoutineCode::Sin),
    ("sqr", RoutineCode::Sqr),
    ("sqrt", RoutineCode::Sqrt),
    ("succ", RoutineCode::Succ),
    ("trunc", RoutineCode::Trunc),
];

impl Predefined {
    pub fn initialize(stack: &mut SymbolTableStack) -> Self {
        let integer_type = Self::scalar_type(stack, "integer");
        let real_type = Self::scalar_type(stack, "real");
        let char_type = Self::scalar_type(stack, "char");
        let boolean_type = Self::boolean_type(stack);
        let undefined_type = stack.create_type(TypeForm::Scalar);

        for (name, code) in STANDARD_PROCEDURES {
            Self::standard_routine(stack, name, Definition::Procedure, code);
        }
        for (name, code) in STANDARD_FUNCTIONS {
            Self::standard_routine(stack, name, Definition::Function, code);
        }

        Self {
            integer_type,
            real_type,
            boolean_type,
            char_type,
            undefined_type,
        }
    }

    fn scalar_type(stack: &mut SymbolTableStack, name: &str) -> TypeId {
        let id = stack.enter_local(name);
        let type_id = stack.create_type(TypeForm::Scalar);
        stack.type_spec_mut(type_id).identifier = Some(id);
        let entry = stack.entry_mut(id);
        entry.definition = Definition::Type;
        entry.type_id = Some(type_id);
        type_id
    }

    fn boolean_type(stack: &mut SymbolTableStack) -> TypeId {
        let boolean_id = stack.enter_local("boolean");
        let boolean_type = stack.create_type(TypeForm::Scalar);
        stack.type_spec_mut(boolean_type).identifier = Some(boolean_id);
        {
            let entry = stack.entry_mut(boolean_id);
            entry.definition = Definition::Type;
            entry.type_id = Some(boolean_type);
        }

        let mut constants = Vec::new();
        for (ordinal, name) in ["false", "true"].into_iter().enumerate() {
            let id = stack.enter_local(name);
            let entry = stack.entry_mut(id);
            entry.definition = Definition::EnumerationConstant;
            entry.type_id = Some(boolean_type);
            entry.constant_value = Some(Value::Integer(ordinal as i64));
            constants.push(id);
        }
        stack.type_spec_mut(boolean_type).form = TypeForm::Enumeration { constants };
        boolean_type
    }

    fn standard_routine(stack: &mut SymbolTableStack, name: &str, definition: Definition, code: RoutineCode) {
        let id = stack.enter_local(name);
        let entry = stack.entry_mut(id);
        entry.definition = definition;
        entry.routine_mut().code = Some(code);
    }
}
