use super::Parser;
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind, TokenValue};
use crate::frontend::token_sets::*;
use crate::semantic::symboltable::{Definition, EntryId};
use crate::semantic::typespec::TypeId;
use crate::semantic::value::Value;
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /* declarations = [ "CONST" constant-definitions ] [ "TYPE" type-definitions ]
     *                [ "VAR" variable-declarations ] { routine ";" } .
     */
    pub(super) fn parse_declarations(&mut self, parent: EntryId) -> PascalResult<()> {
        self.synchronize(&DECLARATION_START)?;
        if self.current_kind() == TokenKind::Const {
            self.next_token()?;
            self.parse_constant_definitions()?;
        }

        self.synchronize(&TYPE_SECTION_START)?;
        if self.current_kind() == TokenKind::Type {
            self.next_token()?;
            self.parse_type_definitions()?;
        }

        self.synchronize(&VAR_SECTION_START)?;
        if self.current_kind() == TokenKind::Var {
            self.next_token()?;
            self.parse_variable_declarations(Definition::Variable)?;
        }

        self.synchronize(&ROUTINE_SECTION_START)?;
        while matches!(self.current_kind(), TokenKind::Procedure | TokenKind::Function) {
            self.parse_routine(Some(parent))?;
            while self.current_kind() == TokenKind::Semicolon {
                self.next_token()?;
            }
            self.synchronize(&ROUTINE_SECTION_START)?;
        }
        Ok(())
    }

    /* constant-definitions = ident "=" constant ";" { ident "=" constant ";" } . */
    fn parse_constant_definitions(&mut self) -> PascalResult<()> {
        self.synchronize(&CONSTANT_IDENTIFIER_SET)?;

        while self.current_kind() == TokenKind::Identifier {
            let constant_id = self.enter_new_identifier()?;
            self.next_token()?;

            self.synchronize(&CONSTANT_EQUALS_SET)?;
            if self.current_kind() == TokenKind::Equals {
                self.next_token()?;
            } else {
                self.flag_current(PascalErrorCode::MissingEquals)?;
            }

            let constant_token = self.current();
            let value = self.parse_constant()?;

            if let Some(id) = constant_id {
                let type_id = if constant_token.kind == TokenKind::Identifier {
                    self.constant_identifier_type(&constant_token)
                } else {
                    value.as_ref().and_then(|value| self.constant_type(value))
                };
                let entry = self.symtab_stack.entry_mut(id);
                entry.definition = Definition::Constant;
                entry.constant_value = value;
                entry.type_id = type_id;
            }

            self.skip_semicolons(&CONSTANT_NEXT_START)?;
            self.synchronize(&CONSTANT_IDENTIFIER_SET)?;
        }
        Ok(())
    }

    /// Enter the current identifier into the local scope, or flag it as
    /// redefined. The token is not consumed.
    fn enter_new_identifier(&mut self) -> PascalResult<Option<EntryId>> {
        let token = self.current();
        let name = token.lowercase_text();
        if self.symtab_stack.lookup_local(&name).is_some() {
            self.flag(&token, PascalErrorCode::IdentifierRedefined)?;
            return Ok(None);
        }

        let id = self.symtab_stack.enter_local(&name);
        self.symtab_stack.entry_mut(id).append_line_number(token.line);
        Ok(Some(id))
    }

    /* constant = [ "+" | "-" ] ( unsigned-number | constant-identifier ) | string . */
    pub(super) fn parse_constant(&mut self) -> PascalResult<Option<Value>> {
        self.synchronize(&CONSTANT_START)?;

        let mut sign = None;
        if matches!(self.current_kind(), TokenKind::Plus | TokenKind::Minus) {
            sign = Some(self.current_kind());
            self.next_token()?;
        }

        let token = self.current();
        let negate = |value: Value| {
            if sign == Some(TokenKind::Minus) {
                value.negated()
            } else {
                value
            }
        };

        match (token.kind, &token.value) {
            (TokenKind::Identifier, _) => self.parse_identifier_constant(&token, sign),
            (TokenKind::Integer, TokenValue::Integer(value)) => {
                self.next_token()?;
                Ok(Some(negate(Value::Integer(*value))))
            }
            (TokenKind::Real, TokenValue::Real(value)) => {
                self.next_token()?;
                Ok(Some(negate(Value::Real(*value))))
            }
            (TokenKind::String, TokenValue::Str(value)) => {
                if sign.is_some() {
                    self.flag(&token, PascalErrorCode::InvalidConstant)?;
                }
                self.next_token()?;
                Ok(Some(Value::Str(value.clone())))
            }
            _ => {
                self.flag(&token, PascalErrorCode::InvalidConstant)?;
                Ok(None)
            }
        }
    }

    fn parse_identifier_constant(&mut self, token: &Token, sign: Option<TokenKind>) -> PascalResult<Option<Value>> {
        let id = self.symtab_stack.lookup(&token.lowercase_text());
        self.next_token()?;

        let Some(id) = id else {
            self.flag(token, PascalErrorCode::IdentifierUndefined)?;
            return Ok(None);
        };

        match self.symtab_stack.entry(id).definition {
            Definition::Constant => {
                let value = self.symtab_stack.entry(id).constant_value.clone();
                self.symtab_stack.entry_mut(id).append_line_number(token.line);
                match value {
                    Some(Value::Str(text)) => {
                        if sign.is_some() {
                            self.flag(token, PascalErrorCode::InvalidConstant)?;
                        }
                        Ok(Some(Value::Str(text)))
                    }
                    Some(value) if sign == Some(TokenKind::Minus) => Ok(Some(value.negated())),
                    value => Ok(value),
                }
            }
            Definition::EnumerationConstant => {
                let value = self.symtab_stack.entry(id).constant_value.clone();
                self.symtab_stack.entry_mut(id).append_line_number(token.line);
                if sign.is_some() {
                    self.flag(token, PascalErrorCode::InvalidConstant)?;
                }
                Ok(value)
            }
            _ => {
                self.flag(token, PascalErrorCode::NotConstantIdentifier)?;
                Ok(None)
            }
        }
    }

    /// Type of a literal constant value. One-character strings are chars.
    pub(super) fn constant_type(&mut self, value: &Value) -> Option<TypeId> {
        let predefined = &self.predefined;
        match value {
            Value::Integer(_) => Some(predefined.integer_type),
            Value::Real(_) => Some(predefined.real_type),
            Value::Str(text) if text.chars().count() == 1 => Some(predefined.char_type),
            Value::Str(text) => {
                let (integer_type, char_type) = (predefined.integer_type, predefined.char_type);
                Some(self.symtab_stack.create_string_type(text.chars().count(), integer_type, char_type))
            }
        }
    }

    /// Type of a constant written as a constant identifier.
    pub(super) fn constant_identifier_type(&self, token: &Token) -> Option<TypeId> {
        let id = self.symtab_stack.lookup(&token.lowercase_text())?;
        let entry = self.symtab_stack.entry(id);
        match entry.definition {
            Definition::Constant | Definition::EnumerationConstant => entry.type_id,
            _ => None,
        }
    }

    /* type-definitions = ident "=" type-spec ";" { ident "=" type-spec ";" } . */
    fn parse_type_definitions(&mut self) -> PascalResult<()> {
        self.synchronize(&TYPE_IDENTIFIER_SET)?;

        while self.current_kind() == TokenKind::Identifier {
            let type_entry = self.enter_new_identifier()?;
            self.next_token()?;

            self.synchronize(&TYPE_EQUALS_SET)?;
            if self.current_kind() == TokenKind::Equals {
                self.next_token()?;
            } else {
                self.flag_current(PascalErrorCode::MissingEquals)?;
            }

            let type_id = self.parse_type_spec()?;
            if let Some(id) = type_entry {
                self.symtab_stack.entry_mut(id).definition = Definition::Type;
            }

            match (type_entry, type_id) {
                (Some(id), Some(type_id)) => {
                    let spec = self.symtab_stack.type_spec_mut(type_id);
                    if spec.identifier.is_none() {
                        spec.identifier = Some(id);
                    }
                    self.symtab_stack.entry_mut(id).type_id = Some(type_id);
                }
                _ => {
                    self.synchronize(&TYPE_FOLLOW_SET)?;
                }
            }

            self.skip_semicolons(&TYPE_NEXT_START)?;
            self.synchronize(&TYPE_IDENTIFIER_SET)?;
        }
        Ok(())
    }

    /* variable-declarations = ident-list ":" type-spec ";" { ident-list ":" type-spec ";" } .
     *
     * Also reads the field list of a record type.
     */
    pub(super) fn parse_variable_declarations(&mut self, definition: Definition) -> PascalResult<()> {
        self.synchronize(&VARIABLE_IDENTIFIER_SET)?;

        while self.current_kind() == TokenKind::Identifier {
            self.parse_identifier_sublist(definition, &IDENTIFIER_FOLLOW, &IDENTIFIER_COMMA_SET)?;
            self.skip_semicolons(&VARIABLE_NEXT_START)?;
            self.synchronize(&VARIABLE_IDENTIFIER_SET)?;
        }
        Ok(())
    }

    /// Read `ident { "," ident }` and, except for program parameters, the
    /// `":" type` that follows. Every identifier read gets that type.
    pub(super) fn parse_identifier_sublist(
        &mut self,
        definition: Definition,
        follow: &TokenSet,
        comma_set: &TokenSet,
    ) -> PascalResult<Vec<EntryId>> {
        let mut sublist = Vec::new();

        loop {
            self.synchronize(&IDENTIFIER_START)?;
            if let Some(id) = self.parse_identifier(definition)? {
                sublist.push(id);
            }

            self.synchronize(comma_set)?;
            if self.current_kind() == TokenKind::Comma {
                self.next_token()?;
                if follow.contains(&self.current_kind()) {
                    self.flag_current(PascalErrorCode::MissingIdentifier)?;
                }
            } else if IDENTIFIER_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingComma)?;
            }

            if follow.contains(&self.current_kind()) || self.at_eof() {
                break;
            }
        }

        if definition != Definition::ProgramParm {
            let type_id = self.parse_declared_type(definition)?;
            for id in &sublist {
                self.symtab_stack.entry_mut(*id).type_id = type_id;
            }
        }
        Ok(sublist)
    }

    fn parse_identifier(&mut self, definition: Definition) -> PascalResult<Option<EntryId>> {
        if self.current_kind() != TokenKind::Identifier {
            self.flag_current(PascalErrorCode::MissingIdentifier)?;
            return Ok(None);
        }

        let id = self.enter_new_identifier()?;
        if let Some(id) = id {
            self.symtab_stack.entry_mut(id).definition = definition;
        }
        self.next_token()?;
        Ok(id)
    }

    /// Read `":" type-spec`. Parameters and function results must name
    /// their type with a type identifier.
    pub(super) fn parse_declared_type(&mut self, definition: Definition) -> PascalResult<Option<TypeId>> {
        self.synchronize(&COLON_SET)?;
        if self.current_kind() == TokenKind::Colon {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingColon)?;
        }

        let token = self.current();
        let type_id = self.parse_type_spec()?;

        let named_type_required = !matches!(definition, Definition::Variable | Definition::Field);
        if let Some(type_id) = type_id {
            if named_type_required && self.symtab_stack.type_spec(type_id).identifier.is_none() {
                self.flag(&token, PascalErrorCode::InvalidType)?;
            }
        }
        Ok(type_id)
    }
}
