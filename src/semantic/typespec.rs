use crate::semantic::symboltable::{EntryId, SymbolTableStack, TableId};
use std::fmt;

/// Handle of a type owned by a `SymbolTableStack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        TypeId(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeForm {
    Scalar,
    Enumeration {
        constants: Vec<EntryId>,
    },
    Subrange {
        base_type: Option<TypeId>,
        min_value: Option<i64>,
        max_value: Option<i64>,
    },
    Array {
        index_type: Option<TypeId>,
        element_type: Option<TypeId>,
        element_count: i64,
    },
    Record {
        symtab: TableId,
    },
}

impl TypeForm {
    pub fn empty_array() -> Self {
        TypeForm::Array {
            index_type: None,
            element_type: None,
            element_count: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeForm::Scalar => "scalar",
            TypeForm::Enumeration { .. } => "enumeration",
            TypeForm::Subrange { .. } => "subrange",
            TypeForm::Array { .. } => "array",
            TypeForm::Record { .. } => "record",
        }
    }
}

impl fmt::Display for TypeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub form: TypeForm,
    /// Entry that names this type; anonymous types have none.
    pub identifier: Option<EntryId>,
}

impl TypeSpec {
    pub fn new(form: TypeForm) -> Self {
        Self { form, identifier: None }
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(self.form, TypeForm::Enumeration { .. })
    }

    pub fn is_array_or_record(&self) -> bool {
        matches!(self.form, TypeForm::Array { .. } | TypeForm::Record { .. })
    }

    pub fn set_array_index_type(&mut self, index: Option<TypeId>, count: i64) {
        if let TypeForm::Array { index_type, element_count, .. } = &mut self.form {
            *index_type = index;
            *element_count = count;
        }
    }

    pub fn set_array_element_type(&mut self, element: Option<TypeId>) {
        if let TypeForm::Array { element_type, .. } = &mut self.form {
            *element_type = element;
        }
    }
}

impl SymbolTableStack {
    /// Follow subrange base types down to a non-subrange type.
    pub fn base_type(&self, id: Option<TypeId>) -> Option<TypeId> {
        let mut current = id?;
        loop {
            match &self.type_spec(current).form {
                TypeForm::Subrange { base_type: Some(base), .. } => current = *base,
                TypeForm::Subrange { base_type: None, .. } => return None,
                _ => return Some(current),
            }
        }
    }

    pub fn form_of(&self, id: Option<TypeId>) -> Option<&TypeForm> {
        id.map(|id| &self.type_spec(id).form)
    }

    /// Anonymous `array [1..length] of char`.
    pub fn create_string_type(&mut self, length: usize, integer_type: TypeId, char_type: TypeId) -> TypeId {
        let index_type = self.create_type(TypeForm::Subrange {
            base_type: Some(integer_type),
            min_value: Some(1),
            max_value: Some(length as i64),
        });
        self.create_type(TypeForm::Array {
            index_type: Some(index_type),
            element_type: Some(char_type),
            element_count: length as i64,
        })
    }

    /// Display name of a type: its identifier, or `<anonymous form>`.
    pub fn type_name(&self, id: TypeId) -> String {
        let spec = self.type_spec(id);
        match spec.identifier {
            Some(entry) => self.entry(entry).name.clone(),
            None => format!("<anonymous {}>", spec.form.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_type_resolves_subrange_chains() {
        let mut stack = SymbolTableStack::new();
        let integer = stack.create_type(TypeForm::Scalar);
        let outer = stack.create_type(TypeForm::Subrange {
            base_type: Some(integer),
            min_value: Some(1),
            max_value: Some(10),
        });
        let inner = stack.create_type(TypeForm::Subrange {
            base_type: Some(outer),
            min_value: Some(2),
            max_value: Some(3),
        });
        assert_eq!(stack.base_type(Some(inner)), Some(integer));
        assert_eq!(stack.base_type(Some(integer)), Some(integer));
        assert_eq!(stack.base_type(None), None);
    }

    #[test]
    fn string_type_is_char_array_indexed_from_one() {
        let mut stack = SymbolTableStack::new();
        let integer = stack.create_type(TypeForm::Scalar);
        let ch = stack.create_type(TypeForm::Scalar);
        let string = stack.create_string_type(5, integer, ch);

        match stack.type_spec(string).form.clone() {
            TypeForm::Array { index_type, element_type, element_count } => {
                assert_eq!(element_type, Some(ch));
                assert_eq!(element_count, 5);
                assert_eq!(
                    stack.form_of(index_type),
                    Some(&TypeForm::Subrange {
                        base_type: Some(integer),
                        min_value: Some(1),
                        max_value: Some(5),
                    })
                );
            }
            other => panic!("expected an array, got {:?}", other),
        }
        assert_eq!(stack.type_name(string), "<anonymous array>");
    }
}
