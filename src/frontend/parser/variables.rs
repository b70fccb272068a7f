use super::Parser;
use crate::ast::{ICodeNode, NodeKind};
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::TokenKind;
use crate::frontend::token_sets::{SUBSCRIPT_FIELD_START, VARIABLE_RIGHT_BRACKET_SET};
use crate::semantic::symboltable::{Definition, EntryId};
use crate::semantic::typespec::{TypeForm, TypeId};
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /* variable = ident { "[" expression { "," expression } "]" | "." ident } . */
    pub(super) fn parse_variable(&mut self) -> PascalResult<ICodeNode> {
        let token = self.current();
        if token.kind != TokenKind::Identifier {
            self.flag(&token, PascalErrorCode::MissingVariable)?;
            let mut node = ICodeNode::new(NodeKind::Variable);
            node.type_id = self.undefined_type();
            return Ok(node);
        }

        let id = self.lookup_or_enter_undefined()?;
        self.parse_variable_for(id, false)
    }

    /// Name of the enclosing function used as an assignment target.
    pub(super) fn parse_function_name_target(&mut self) -> PascalResult<ICodeNode> {
        let id = self.lookup_or_enter_undefined()?;
        self.parse_variable_for(id, true)
    }

    /// Look up the current identifier. An undefined one is flagged and
    /// entered locally with the undefined type.
    fn lookup_or_enter_undefined(&mut self) -> PascalResult<EntryId> {
        let token = self.current();
        let name = token.lowercase_text();
        if let Some(id) = self.symtab_stack.lookup(&name) {
            return Ok(id);
        }

        self.flag(&token, PascalErrorCode::IdentifierUndefined)?;
        let id = self.symtab_stack.enter_local(&name);
        self.symtab_stack.entry_mut(id).type_id = self.undefined_type();
        Ok(id)
    }

    /// Parse a variable whose identifier `id` is the current token.
    pub(super) fn parse_variable_for(&mut self, id: EntryId, function_target: bool) -> PascalResult<ICodeNode> {
        let token = self.current();
        let definition = self.symtab_stack.entry(id).definition;
        let usable = definition.is_variable_like() || (function_target && definition == Definition::Function);
        if !usable {
            self.flag(&token, PascalErrorCode::InvalidIdentifierUsage)?;
        }

        self.symtab_stack.entry_mut(id).append_line_number(token.line);
        let mut node = ICodeNode::new(NodeKind::Variable);
        node.id = Some(id);
        self.next_token()?;

        let mut variable_type = self.symtab_stack.entry_type(id);
        if !function_target {
            while SUBSCRIPT_FIELD_START.contains(&self.current_kind()) {
                let modifier = if self.current_kind() == TokenKind::LeftBracket {
                    self.parse_subscripts(variable_type)?
                } else {
                    self.parse_field(variable_type)?
                };
                variable_type = modifier.type_id;
                node.add_child(modifier);
            }
        }

        node.type_id = variable_type.or(self.undefined_type());
        Ok(node)
    }

    fn parse_subscripts(&mut self, variable_type: Option<TypeId>) -> PascalResult<ICodeNode> {
        let mut subscripts = ICodeNode::new(NodeKind::Subscripts);
        let mut current_type = variable_type;

        loop {
            self.next_token()?;
            let token = self.current();

            match self.symtab_stack.form_of(current_type).cloned() {
                Some(TypeForm::Array { index_type, element_type, .. }) => {
                    let index = self.parse_expression()?;
                    if !self.checker().are_assignment_compatible(index_type, index.type_id) {
                        self.flag(&token, PascalErrorCode::InvalidIndexType)?;
                    }
                    subscripts.add_child(index);
                    current_type = element_type;
                }
                _ => {
                    self.flag(&token, PascalErrorCode::TooManySubscripts)?;
                    self.parse_expression()?;
                }
            }

            if self.current_kind() != TokenKind::Comma {
                break;
            }
        }

        self.synchronize(&VARIABLE_RIGHT_BRACKET_SET)?;
        if self.current_kind() == TokenKind::RightBracket {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingRightBracket)?;
        }

        subscripts.type_id = current_type.or(self.undefined_type());
        Ok(subscripts)
    }

    fn parse_field(&mut self, variable_type: Option<TypeId>) -> PascalResult<ICodeNode> {
        let mut field = ICodeNode::new(NodeKind::Field);
        self.next_token()?;
        let token = self.current();

        let record_table = match self.symtab_stack.form_of(variable_type) {
            Some(TypeForm::Record { symtab }) => Some(*symtab),
            _ => None,
        };
        let field_id = match record_table {
            Some(table) if token.kind == TokenKind::Identifier => {
                self.symtab_stack.lookup_in(table, &token.lowercase_text())
            }
            _ => None,
        };

        match field_id {
            Some(id) => {
                self.symtab_stack.entry_mut(id).append_line_number(token.line);
                field.id = Some(id);
                field.type_id = self.symtab_stack.entry_type(id).or(self.undefined_type());
            }
            None => {
                self.flag(&token, PascalErrorCode::InvalidField)?;
                field.type_id = self.undefined_type();
            }
        }

        if token.kind == TokenKind::Identifier {
            self.next_token()?;
        }
        Ok(field)
    }
}
