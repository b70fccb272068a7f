use super::Parser;
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind};
use crate::frontend::token_sets::*;
use crate::semantic::symboltable::{Definition, EntryId};
use crate::semantic::typespec::{TypeForm, TypeId};
use crate::semantic::value::Value;
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /* type-spec = simple-type | array-type | record-type . */
    pub(super) fn parse_type_spec(&mut self) -> PascalResult<Option<TypeId>> {
        self.synchronize(&TYPE_SPEC_START)?;
        match self.current_kind() {
            TokenKind::Array => self.parse_array_type().map(Some),
            TokenKind::Record => self.parse_record_type().map(Some),
            _ => self.parse_simple_type(),
        }
    }

    /* simple-type = type-identifier | enumeration-type | subrange-type . */
    pub(super) fn parse_simple_type(&mut self) -> PascalResult<Option<TypeId>> {
        let token = self.synchronize(&SIMPLE_TYPE_START)?;

        match token.kind {
            TokenKind::Identifier => {
                let Some(id) = self.symtab_stack.lookup(&token.lowercase_text()) else {
                    self.flag(&token, PascalErrorCode::IdentifierUndefined)?;
                    self.next_token()?;
                    return Ok(None);
                };

                match self.symtab_stack.entry(id).definition {
                    Definition::Type => {
                        self.symtab_stack.entry_mut(id).append_line_number(token.line);
                        self.next_token()?;
                        Ok(self.symtab_stack.entry(id).type_id)
                    }
                    Definition::Constant | Definition::EnumerationConstant => self.parse_subrange_type().map(Some),
                    _ => {
                        self.flag(&token, PascalErrorCode::NotTypeIdentifier)?;
                        self.next_token()?;
                        Ok(None)
                    }
                }
            }
            TokenKind::LeftParen => self.parse_enumeration_type().map(Some),
            TokenKind::Comma | TokenKind::Semicolon => {
                self.flag(&token, PascalErrorCode::InvalidType)?;
                Ok(None)
            }
            _ => self.parse_subrange_type().map(Some),
        }
    }

    /* subrange-type = constant ".." constant . */
    fn parse_subrange_type(&mut self) -> PascalResult<TypeId> {
        let min_token = self.current();
        let (min_value, min_type) = self.parse_subrange_bound()?;
        let min_value = self.ordinal_bound(&min_token, min_value, min_type)?;

        let saw_dot_dot = self.current_kind() == TokenKind::DotDot;
        if saw_dot_dot {
            self.next_token()?;
        }

        let mut max_value = None;
        if CONSTANT_START.contains(&self.current_kind()) {
            if !saw_dot_dot {
                self.flag_current(PascalErrorCode::MissingDotDot)?;
            }

            let max_token = self.synchronize(&CONSTANT_START)?;
            let (value, max_type) = self.parse_subrange_bound()?;
            max_value = self.ordinal_bound(&max_token, value, max_type)?;

            if min_type.is_none() || max_type.is_none() {
                self.flag(&max_token, PascalErrorCode::IncompatibleTypes)?;
            } else if min_type != max_type {
                self.flag(&max_token, PascalErrorCode::InvalidSubrangeType)?;
            } else if let (Some(min), Some(max)) = (min_value, max_value) {
                if min > max {
                    self.flag(&max_token, PascalErrorCode::MinGtMax)?;
                }
            }
        } else {
            self.flag(&min_token, PascalErrorCode::InvalidSubrangeType)?;
        }

        Ok(self.symtab_stack.create_type(TypeForm::Subrange {
            base_type: min_type,
            min_value,
            max_value,
        }))
    }

    fn parse_subrange_bound(&mut self) -> PascalResult<(Option<Value>, Option<TypeId>)> {
        let token = self.current();
        let value = self.parse_constant()?;
        let type_id = if token.kind == TokenKind::Identifier {
            self.constant_identifier_type(&token)
        } else {
            match &value {
                Some(value) => self.constant_type(value),
                None => None,
            }
        };
        Ok((value, type_id))
    }

    /// Ordinal of a subrange bound. Chars give their code point; real and
    /// string bounds are rejected.
    fn ordinal_bound(&mut self, token: &Token, value: Option<Value>, type_id: Option<TypeId>) -> PascalResult<Option<i64>> {
        let Some(value) = value else {
            return Ok(None);
        };

        let predefined = &self.predefined;
        let is_enumeration = type_id.is_some_and(|id| self.symtab_stack.type_spec(id).is_enumeration());
        match (type_id, &value) {
            (None, value) => Ok(value.as_integer()),
            (Some(id), Value::Integer(ordinal)) if id == predefined.integer_type || is_enumeration => Ok(Some(*ordinal)),
            (Some(id), Value::Str(text)) if id == predefined.char_type => Ok(text.chars().next().map(|c| c as i64)),
            _ => {
                self.flag(token, PascalErrorCode::InvalidSubrangeType)?;
                Ok(None)
            }
        }
    }

    /* enumeration-type = "(" ident { "," ident } ")" . */
    fn parse_enumeration_type(&mut self) -> PascalResult<TypeId> {
        let enum_type = self.symtab_stack.create_type(TypeForm::Enumeration { constants: Vec::new() });
        let mut constants = Vec::new();
        let mut value = 0;
        self.next_token()?;

        loop {
            self.synchronize(&ENUM_CONSTANT_START)?;
            if let Some(id) = self.parse_enumeration_identifier(value, enum_type)? {
                constants.push(id);
                value += 1;
            }

            if self.current_kind() == TokenKind::Comma {
                self.next_token()?;
                if ENUM_DEFINITION_FOLLOW.contains(&self.current_kind()) {
                    self.flag_current(PascalErrorCode::MissingIdentifier)?;
                }
            } else if ENUM_CONSTANT_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingComma)?;
            }

            if ENUM_DEFINITION_FOLLOW.contains(&self.current_kind()) || self.at_eof() {
                break;
            }
        }

        if self.current_kind() == TokenKind::RightParen {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingRightParen)?;
        }

        self.symtab_stack.type_spec_mut(enum_type).form = TypeForm::Enumeration { constants };
        Ok(enum_type)
    }

    fn parse_enumeration_identifier(&mut self, value: i64, enum_type: TypeId) -> PascalResult<Option<EntryId>> {
        let token = self.current();
        if token.kind != TokenKind::Identifier {
            self.flag(&token, PascalErrorCode::MissingIdentifier)?;
            return Ok(None);
        }

        let name = token.lowercase_text();
        let mut constant_id = None;
        if self.symtab_stack.lookup_local(&name).is_some() {
            self.flag(&token, PascalErrorCode::IdentifierRedefined)?;
        } else {
            let id = self.symtab_stack.enter_local(&name);
            let entry = self.symtab_stack.entry_mut(id);
            entry.definition = Definition::EnumerationConstant;
            entry.type_id = Some(enum_type);
            entry.constant_value = Some(Value::Integer(value));
            entry.append_line_number(token.line);
            constant_id = Some(id);
        }

        self.next_token()?;
        Ok(constant_id)
    }

    /* array-type = "ARRAY" "[" index-type { "," index-type } "]" "OF" type-spec . */
    fn parse_array_type(&mut self) -> PascalResult<TypeId> {
        let array_type = self.symtab_stack.create_type(TypeForm::empty_array());
        self.next_token()?;

        self.synchronize(&LEFT_BRACKET_SET)?;
        if self.current_kind() == TokenKind::LeftBracket {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingLeftBracket)?;
        }

        let innermost = self.parse_index_type_list(array_type)?;

        self.synchronize(&ARRAY_RIGHT_BRACKET_SET)?;
        if self.current_kind() == TokenKind::RightBracket {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingRightBracket)?;
        }

        self.synchronize(&ARRAY_OF_SET)?;
        if self.current_kind() == TokenKind::Of {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingOf)?;
        }

        let element_type = self.parse_type_spec()?;
        self.symtab_stack.type_spec_mut(innermost).set_array_element_type(element_type);
        Ok(array_type)
    }

    /// `array [a, b] of T` is `array [a] of array [b] of T`. Returns the
    /// innermost array, whose element type is still to be filled in.
    fn parse_index_type_list(&mut self, array_type: TypeId) -> PascalResult<TypeId> {
        let mut current = array_type;

        loop {
            self.synchronize(&INDEX_START)?;
            self.parse_index_type(current)?;
            self.synchronize(&INDEX_FOLLOW)?;

            let kind = self.current_kind();
            let another_index = if kind == TokenKind::Comma {
                self.next_token()?;
                true
            } else if INDEX_START.contains(&kind) && !INDEX_END.contains(&kind) {
                self.flag_current(PascalErrorCode::MissingComma)?;
                true
            } else {
                false
            };
            if !another_index || self.at_eof() {
                return Ok(current);
            }

            let element = self.symtab_stack.create_type(TypeForm::empty_array());
            self.symtab_stack.type_spec_mut(current).set_array_element_type(Some(element));
            current = element;
        }
    }

    fn parse_index_type(&mut self, array_type: TypeId) -> PascalResult<()> {
        let token = self.current();
        let index_type = self.parse_simple_type()?;

        let count = match self.symtab_stack.form_of(index_type).cloned() {
            None => 0,
            Some(TypeForm::Subrange { min_value, max_value, .. }) => match (min_value, max_value) {
                (Some(min), Some(max)) => match max.checked_sub(min).and_then(|span| span.checked_add(1)) {
                    Some(count) => count.max(0),
                    None => {
                        self.flag(&token, PascalErrorCode::RangeInteger)?;
                        0
                    }
                },
                _ => 0,
            },
            Some(TypeForm::Enumeration { constants }) => constants.len() as i64,
            Some(_) => {
                self.flag(&token, PascalErrorCode::InvalidIndexType)?;
                0
            }
        };

        self.symtab_stack.type_spec_mut(array_type).set_array_index_type(index_type, count);
        Ok(())
    }

    /* record-type = "RECORD" field-list "END" . */
    fn parse_record_type(&mut self) -> PascalResult<TypeId> {
        let table = self.symtab_stack.create_table();
        let record_type = self.symtab_stack.create_type(TypeForm::Record { symtab: table });
        self.next_token()?;

        self.in_scope(table, |parser| parser.parse_variable_declarations(Definition::Field))?;

        self.synchronize(&RECORD_END_SET)?;
        if self.current_kind() == TokenKind::End {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingEnd)?;
        }
        Ok(record_type)
    }
}
