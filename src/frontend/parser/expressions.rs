use super::Parser;
use crate::ast::{ICodeNode, NodeKind};
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind, TokenValue};
use crate::semantic::symboltable::Definition;
use crate::semantic::typespec::TypeId;
use crate::semantic::value::Value;
use crate::utils::config::parser::{ADDITIVE_OPERATORS, MULTIPLICATIVE_OPERATORS, RELATIONAL_OPERATORS};
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /* expression = simple-expression [ relational-operator simple-expression ] . */
    pub(super) fn parse_expression(&mut self) -> PascalResult<ICodeNode> {
        let root = self.parse_simple_expression()?;

        let Some(&kind) = RELATIONAL_OPERATORS.get(&self.current_kind()) else {
            return Ok(root);
        };
        let operator = self.current();
        self.next_token()?;

        let left_type = root.type_id;
        let right = self.parse_simple_expression()?;
        let right_type = right.type_id;

        let mut node = ICodeNode::new(kind);
        node.add_child(root);
        node.add_child(right);

        node.type_id = if self.checker().are_comparison_compatible(left_type, right_type) {
            Some(self.predefined.boolean_type)
        } else {
            self.flag(&operator, PascalErrorCode::IncompatibleTypes)?;
            self.undefined_type()
        };
        Ok(node)
    }

    /* simple-expression = [ "+" | "-" ] term { additive-operator term } . */
    fn parse_simple_expression(&mut self) -> PascalResult<ICodeNode> {
        let mut sign = None;
        if matches!(self.current_kind(), TokenKind::Plus | TokenKind::Minus) {
            sign = Some(self.current());
            self.next_token()?;
        }

        let mut root = self.parse_term()?;

        if let Some(sign) = sign {
            if !self.checker().is_integer_or_real(root.type_id) {
                self.flag(&sign, PascalErrorCode::IncompatibleTypes)?;
            }
            if sign.kind == TokenKind::Minus {
                let mut negate = ICodeNode::new(NodeKind::Negate);
                negate.type_id = root.type_id;
                negate.add_child(root);
                root = negate;
            }
        }

        while let Some(&kind) = ADDITIVE_OPERATORS.get(&self.current_kind()) {
            let operator = self.current();
            self.next_token()?;
            let right = self.parse_term()?;

            let result_type = self.binary_result_type(&operator, kind, root.type_id, right.type_id)?;
            let mut node = ICodeNode::new(kind);
            node.type_id = result_type;
            node.add_child(root);
            node.add_child(right);
            root = node;
        }
        Ok(root)
    }

    /* term = factor { multiplicative-operator factor } . */
    fn parse_term(&mut self) -> PascalResult<ICodeNode> {
        let mut root = self.parse_factor()?;

        while let Some(&kind) = MULTIPLICATIVE_OPERATORS.get(&self.current_kind()) {
            let operator = self.current();
            self.next_token()?;
            let right = self.parse_factor()?;

            let result_type = self.binary_result_type(&operator, kind, root.type_id, right.type_id)?;
            let mut node = ICodeNode::new(kind);
            node.type_id = result_type;
            node.add_child(root);
            node.add_child(right);
            root = node;
        }
        Ok(root)
    }

    /// Result type of an arithmetic or boolean operator. Operands of the
    /// wrong type flag INCOMPATIBLE_TYPES and give the undefined type.
    fn binary_result_type(
        &mut self,
        operator: &Token,
        kind: NodeKind,
        left: Option<TypeId>,
        right: Option<TypeId>,
    ) -> PascalResult<Option<TypeId>> {
        let checker = self.checker();
        let integer_type = Some(self.predefined.integer_type);
        let real_type = Some(self.predefined.real_type);
        let boolean_type = Some(self.predefined.boolean_type);

        let result = match kind {
            NodeKind::Add | NodeKind::Subtract | NodeKind::Multiply => {
                if checker.are_both_integer(left, right) {
                    integer_type
                } else if checker.is_at_least_one_real(left, right) {
                    real_type
                } else {
                    None
                }
            }
            NodeKind::FloatDivide => {
                if checker.are_both_integer(left, right) || checker.is_at_least_one_real(left, right) {
                    real_type
                } else {
                    None
                }
            }
            NodeKind::IntegerDivide | NodeKind::Mod => {
                if checker.are_both_integer(left, right) {
                    integer_type
                } else {
                    None
                }
            }
            NodeKind::Or | NodeKind::And => {
                if checker.are_both_boolean(left, right) {
                    boolean_type
                } else {
                    None
                }
            }
            _ => None,
        };

        match result {
            Some(result) => Ok(Some(result)),
            None => {
                self.flag(operator, PascalErrorCode::IncompatibleTypes)?;
                Ok(self.undefined_type())
            }
        }
    }

    /* factor = variable | function-call | constant-identifier | unsigned-number
     *        | string | "NOT" factor | "(" expression ")" .
     */
    fn parse_factor(&mut self) -> PascalResult<ICodeNode> {
        let token = self.current();

        match (token.kind, &token.value) {
            (TokenKind::Identifier, _) => self.parse_identifier_factor(&token),
            (TokenKind::Integer, TokenValue::Integer(value)) => {
                self.next_token()?;
                let integer_type = Some(self.predefined.integer_type);
                Ok(ICodeNode::with_value(NodeKind::IntegerConstant, Value::Integer(*value), integer_type))
            }
            (TokenKind::Real, TokenValue::Real(value)) => {
                self.next_token()?;
                let real_type = Some(self.predefined.real_type);
                Ok(ICodeNode::with_value(NodeKind::RealConstant, Value::Real(*value), real_type))
            }
            (TokenKind::String, TokenValue::Str(text)) => {
                self.next_token()?;
                let value = Value::Str(text.clone());
                let type_id = self.constant_type(&value);
                Ok(ICodeNode::with_value(NodeKind::StringConstant, value, type_id))
            }
            (TokenKind::Not, _) => {
                self.next_token()?;
                let operand_token = self.current();
                let operand = self.parse_factor()?;
                if !self.checker().is_boolean(operand.type_id) {
                    self.flag(&operand_token, PascalErrorCode::IncompatibleTypes)?;
                }

                let mut node = ICodeNode::new(NodeKind::Not);
                node.type_id = Some(self.predefined.boolean_type);
                node.add_child(operand);
                Ok(node)
            }
            (TokenKind::LeftParen, _) => {
                self.next_token()?;
                let node = self.parse_expression()?;
                if self.current_kind() == TokenKind::RightParen {
                    self.next_token()?;
                } else {
                    self.flag_current(PascalErrorCode::MissingRightParen)?;
                }
                Ok(node)
            }
            _ => {
                self.flag(&token, PascalErrorCode::UnexpectedToken)?;
                let mut node = ICodeNode::new(NodeKind::NoOp);
                node.type_id = self.undefined_type();
                Ok(node)
            }
        }
    }

    fn parse_identifier_factor(&mut self, token: &Token) -> PascalResult<ICodeNode> {
        let name = token.lowercase_text();
        let id = match self.symtab_stack.lookup(&name) {
            Some(id) => id,
            None => {
                self.flag(token, PascalErrorCode::IdentifierUndefined)?;
                let id = self.symtab_stack.enter_local(&name);
                self.symtab_stack.entry_mut(id).type_id = self.undefined_type();
                id
            }
        };

        match self.symtab_stack.entry(id).definition {
            Definition::Constant | Definition::EnumerationConstant => {
                let entry = self.symtab_stack.entry(id);
                let type_id = entry.type_id;
                let value = entry.constant_value.clone();
                self.symtab_stack.entry_mut(id).append_line_number(token.line);
                self.next_token()?;

                Ok(match value {
                    Some(value) => {
                        let kind = match value {
                            Value::Integer(_) => NodeKind::IntegerConstant,
                            Value::Real(_) => NodeKind::RealConstant,
                            Value::Str(_) => NodeKind::StringConstant,
                        };
                        ICodeNode::with_value(kind, value, type_id)
                    }
                    None => {
                        let mut node = ICodeNode::new(NodeKind::NoOp);
                        node.type_id = self.undefined_type();
                        node
                    }
                })
            }
            Definition::Function => self.parse_call(),
            _ => self.parse_variable_for(id, false),
        }
    }
}
