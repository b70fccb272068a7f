use crate::semantic::predefined::Predefined;
use crate::semantic::symboltable::SymbolTableStack;
use crate::semantic::typespec::{TypeForm, TypeId};

/// Type predicates and compatibility rules. A missing type is never
/// integer, real, boolean or char, and is compatible with nothing.
pub struct TypeChecker<'a> {
    stack: &'a SymbolTableStack,
    predefined: &'a Predefined,
}

impl<'a> TypeChecker<'a> {
    pub fn new(stack: &'a SymbolTableStack, predefined: &'a Predefined) -> Self {
        Self { stack, predefined }
    }

    fn base(&self, type_id: Option<TypeId>) -> Option<TypeId> {
        self.stack.base_type(type_id)
    }

    pub fn is_integer(&self, type_id: Option<TypeId>) -> bool {
        self.base(type_id) == Some(self.predefined.integer_type)
    }

    pub fn are_both_integer(&self, type1: Option<TypeId>, type2: Option<TypeId>) -> bool {
        self.is_integer(type1) && self.is_integer(type2)
    }

    pub fn is_real(&self, type_id: Option<TypeId>) -> bool {
        self.base(type_id) == Some(self.predefined.real_type)
    }

    pub fn is_integer_or_real(&self, type_id: Option<TypeId>) -> bool {
        self.is_integer(type_id) || self.is_real(type_id)
    }

    /// real+real, real+integer or integer+real.
    pub fn is_at_least_one_real(&self, type1: Option<TypeId>, type2: Option<TypeId>) -> bool {
        (self.is_real(type1) && self.is_real(type2))
            || (self.is_real(type1) && self.is_integer(type2))
            || (self.is_integer(type1) && self.is_real(type2))
    }

    pub fn is_boolean(&self, type_id: Option<TypeId>) -> bool {
        self.base(type_id) == Some(self.predefined.boolean_type)
    }

    pub fn are_both_boolean(&self, type1: Option<TypeId>, type2: Option<TypeId>) -> bool {
        self.is_boolean(type1) && self.is_boolean(type2)
    }

    pub fn is_char(&self, type_id: Option<TypeId>) -> bool {
        self.base(type_id) == Some(self.predefined.char_type)
    }

    pub fn is_enumeration(&self, type_id: Option<TypeId>) -> bool {
        matches!(self.stack.form_of(self.base(type_id)), Some(TypeForm::Enumeration { .. }))
    }

    pub fn is_scalar(&self, type_id: Option<TypeId>) -> bool {
        matches!(self.stack.form_of(self.base(type_id)), Some(TypeForm::Scalar))
    }

    /// An array of char indexed by integer.
    pub fn is_pascal_string(&self, type_id: Option<TypeId>) -> bool {
        match self.stack.form_of(type_id) {
            Some(TypeForm::Array { index_type, element_type, .. }) => {
                self.is_char(*element_type) && self.is_integer(*index_type)
            }
            _ => false,
        }
    }

    pub fn are_assignment_compatible(&self, target: Option<TypeId>, value: Option<TypeId>) -> bool {
        let (target, value) = match (self.base(target), self.base(value)) {
            (Some(target), Some(value)) => (target, value),
            _ => return false,
        };

        target == value
            || (self.is_real(Some(target)) && self.is_integer(Some(value)))
            || (self.is_pascal_string(Some(target)) && self.is_pascal_string(Some(value)))
    }

    pub fn are_comparison_compatible(&self, type1: Option<TypeId>, type2: Option<TypeId>) -> bool {
        let (type1, type2) = match (self.base(type1), self.base(type2)) {
            (Some(type1), Some(type2)) => (type1, type2),
            _ => return false,
        };

        let ordinal_form = matches!(
            self.stack.type_spec(type1).form,
            TypeForm::Scalar | TypeForm::Enumeration { .. }
        );
        (type1 == type2 && ordinal_form)
            || self.is_at_least_one_real(Some(type1), Some(type2))
            || (self.is_pascal_string(Some(type1)) && self.is_pascal_string(Some(type2)))
    }
}
