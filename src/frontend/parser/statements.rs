use super::Parser;
use crate::ast::{ICodeNode, NodeKind};
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind, TokenValue};
use crate::frontend::token_sets::*;
use crate::semantic::symboltable::Definition;
use crate::semantic::typespec::TypeId;
use crate::semantic::value::Value;
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /// Parse one statement. The returned node is stamped with the line
    /// the statement starts on.
    pub(super) fn parse_statement(&mut self) -> PascalResult<ICodeNode> {
        let token = self.current();

        let mut node = match token.kind {
            TokenKind::Begin => self.parse_compound_statement()?,
            TokenKind::Identifier => self.parse_identifier_statement(&token)?,
            TokenKind::Repeat => self.parse_repeat_statement()?,
            TokenKind::While => self.parse_while_statement()?,
            TokenKind::For => self.parse_for_statement()?,
            TokenKind::If => self.parse_if_statement()?,
            TokenKind::Case => self.parse_case_statement()?,
            _ => ICodeNode::new(NodeKind::NoOp),
        };

        node.line = Some(token.line);
        Ok(node)
    }

    fn parse_identifier_statement(&mut self, token: &Token) -> PascalResult<ICodeNode> {
        let definition = self
            .symtab_stack
            .lookup(&token.lowercase_text())
            .map(|id| self.symtab_stack.entry(id).definition);

        match definition {
            None => self.parse_assignment(),
            Some(definition) if definition.is_variable_like() => self.parse_assignment(),
            Some(Definition::Function) => self.parse_function_assignment(),
            Some(Definition::Procedure) => self.parse_call(),
            Some(_) => {
                self.flag(token, PascalErrorCode::UnexpectedToken)?;
                self.next_token()?;
                Ok(ICodeNode::new(NodeKind::NoOp))
            }
        }
    }

    /// Parse statements separated by semicolons into `parent` until
    /// `terminator`, which is consumed. `error_code` is flagged if the
    /// terminator is missing.
    pub(super) fn parse_statement_list(
        &mut self,
        parent: &mut ICodeNode,
        terminator: TokenKind,
        error_code: PascalErrorCode,
    ) -> PascalResult<()> {
        let mut terminator_set = STATEMENT_START.clone();
        terminator_set.insert(terminator);

        while !self.at_eof() && self.current_kind() != terminator {
            let statement = self.parse_statement()?;
            parent.add_child(statement);

            if self.current_kind() == TokenKind::Semicolon {
                self.next_token()?;
            } else if STATEMENT_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingSemicolon)?;
            }

            self.synchronize(&terminator_set)?;
        }

        if self.current_kind() == terminator {
            self.next_token()?;
        } else {
            self.flag_current(error_code)?;
        }
        Ok(())
    }

    /* compound-statement = "BEGIN" statement { ";" statement } "END" . */
    fn parse_compound_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let mut compound = ICodeNode::new(NodeKind::Compound);
        self.parse_statement_list(&mut compound, TokenKind::End, PascalErrorCode::MissingEnd)?;
        Ok(compound)
    }

    /* assignment = variable ":=" expression . */
    fn parse_assignment(&mut self) -> PascalResult<ICodeNode> {
        let target = self.parse_variable()?;
        self.parse_assignment_to(target)
    }

    /// Assignment to a function's name inside its own body, which sets the
    /// function's result.
    fn parse_function_assignment(&mut self) -> PascalResult<ICodeNode> {
        let target = self.parse_function_name_target()?;
        self.parse_assignment_to(target)
    }

    fn parse_assignment_to(&mut self, target: ICodeNode) -> PascalResult<ICodeNode> {
        let target_type = target.type_id.or(self.undefined_type());
        let mut assign = ICodeNode::new(NodeKind::Assign);
        assign.add_child(target);

        self.synchronize(&COLON_EQUALS_SET)?;
        if self.current_kind() == TokenKind::ColonEquals {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingColonEquals)?;
        }

        let token = self.current();
        let expression = self.parse_expression()?;
        let expression_type = expression.type_id.or(self.undefined_type());
        if !self.checker().are_assignment_compatible(target_type, expression_type) {
            self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
        }

        assign.add_child(expression);
        assign.type_id = target_type;
        Ok(assign)
    }

    /* repeat-statement = "REPEAT" statement { ";" statement } "UNTIL" expression .
     *
     * LOOP
     *   statements...
     *   TEST
     *     expression
     */
    fn parse_repeat_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let mut loop_node = ICodeNode::new(NodeKind::Loop);
        self.parse_statement_list(&mut loop_node, TokenKind::Until, PascalErrorCode::MissingUntil)?;

        let condition = self.parse_condition()?;
        let mut test = ICodeNode::new(NodeKind::Test);
        test.add_child(condition);
        loop_node.add_child(test);
        Ok(loop_node)
    }

    /* while-statement = "WHILE" expression "DO" statement .
     *
     * LOOP
     *   TEST
     *     NOT
     *       expression
     *   statement
     */
    fn parse_while_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let mut loop_node = ICodeNode::new(NodeKind::Loop);

        let condition = self.parse_condition()?;
        let mut not = ICodeNode::new(NodeKind::Not);
        not.type_id = Some(self.predefined.boolean_type);
        not.add_child(condition);
        let mut test = ICodeNode::new(NodeKind::Test);
        test.add_child(not);
        loop_node.add_child(test);

        self.synchronize(&DO_SET)?;
        if self.current_kind() == TokenKind::Do {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingDo)?;
        }

        loop_node.add_child(self.parse_statement()?);
        Ok(loop_node)
    }

    /// Boolean expression controlling an IF, WHILE or REPEAT.
    fn parse_condition(&mut self) -> PascalResult<ICodeNode> {
        let token = self.current();
        let expression = self.parse_expression()?;
        if !self.checker().is_boolean(expression.type_id) {
            self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
        }
        Ok(expression)
    }

    /* for-statement = "FOR" ident ":=" expression ( "TO" | "DOWNTO" ) expression
     *                 "DO" statement .
     *
     * COMPOUND
     *   ASSIGN                       control := initial
     *   LOOP
     *     TEST
     *       GT (TO) or LT (DOWNTO)   control, final
     *     statement
     *     ASSIGN                     control := control +/- 1
     */
    fn parse_for_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let target_token = self.current();

        let target = if target_token.kind == TokenKind::Identifier {
            let target = self.parse_variable()?;
            if !target.children.is_empty() {
                self.flag(&target_token, PascalErrorCode::MissingForControl)?;
            }
            target
        } else {
            self.flag(&target_token, PascalErrorCode::MissingForControl)?;
            let mut placeholder = ICodeNode::new(NodeKind::Variable);
            placeholder.type_id = self.undefined_type();
            placeholder
        };

        let control = target.copy();
        let mut initial = self.parse_assignment_to(target)?;
        initial.line = Some(target_token.line);

        let control_type = initial.type_id;
        let checker = self.checker();
        if !checker.is_integer(control_type) && !checker.is_enumeration(control_type) {
            self.flag(&target_token, PascalErrorCode::IncompatibleTypes)?;
        }

        self.synchronize(&TO_DOWNTO_SET)?;
        let direction = match self.current_kind() {
            kind @ (TokenKind::To | TokenKind::Downto) => {
                self.next_token()?;
                kind
            }
            _ => {
                self.flag_current(PascalErrorCode::MissingToDownto)?;
                TokenKind::To
            }
        };

        let mut relation = ICodeNode::new(if direction == TokenKind::To {
            NodeKind::Gt
        } else {
            NodeKind::Lt
        });
        relation.type_id = Some(self.predefined.boolean_type);
        relation.add_child(control.copy());

        let token = self.current();
        let final_value = self.parse_expression()?;
        if !self.checker().are_assignment_compatible(control_type, final_value.type_id) {
            self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
        }
        relation.add_child(final_value);

        let mut test = ICodeNode::new(NodeKind::Test);
        test.add_child(relation);
        let mut loop_node = ICodeNode::new(NodeKind::Loop);
        loop_node.add_child(test);

        self.synchronize(&DO_SET)?;
        if self.current_kind() == TokenKind::Do {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingDo)?;
        }
        loop_node.add_child(self.parse_statement()?);

        loop_node.add_child(self.control_step(&control, control_type, direction, target_token.line));

        let mut compound = ICodeNode::new(NodeKind::Compound);
        compound.add_child(initial);
        compound.add_child(loop_node);
        Ok(compound)
    }

    fn control_step(&self, control: &ICodeNode, control_type: Option<TypeId>, direction: TokenKind, line: usize) -> ICodeNode {
        let integer_type = Some(self.predefined.integer_type);

        let mut arithmetic = ICodeNode::new(if direction == TokenKind::To {
            NodeKind::Add
        } else {
            NodeKind::Subtract
        });
        arithmetic.type_id = control_type;
        arithmetic.add_child(control.copy());
        arithmetic.add_child(ICodeNode::with_value(NodeKind::IntegerConstant, Value::Integer(1), integer_type));

        let mut step = ICodeNode::new(NodeKind::Assign);
        step.type_id = control_type;
        step.line = Some(line);
        step.add_child(control.copy());
        step.add_child(arithmetic);
        step
    }

    /* if-statement = "IF" expression "THEN" statement [ "ELSE" statement ] . */
    fn parse_if_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let mut if_node = ICodeNode::new(NodeKind::If);
        if_node.add_child(self.parse_condition()?);

        self.synchronize(&THEN_SET)?;
        if self.current_kind() == TokenKind::Then {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingThen)?;
        }
        if_node.add_child(self.parse_statement()?);

        if self.current_kind() == TokenKind::Else {
            self.next_token()?;
            if_node.add_child(self.parse_statement()?);
        }
        Ok(if_node)
    }

    /* case-statement = "CASE" expression "OF" case-branch { ";" case-branch } "END" .
     * case-branch = constant { "," constant } ":" statement .
     *
     * SELECT
     *   expression
     *   SELECT_BRANCH
     *     SELECT_CONSTANTS
     *       constants...
     *     statement
     */
    fn parse_case_statement(&mut self) -> PascalResult<ICodeNode> {
        self.next_token()?;
        let mut select = ICodeNode::new(NodeKind::Select);

        let token = self.current();
        let selector = self.parse_expression()?;
        let selector_type = selector.type_id;
        let checker = self.checker();
        if !checker.is_integer(selector_type) && !checker.is_char(selector_type) && !checker.is_enumeration(selector_type) {
            self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
        }
        select.add_child(selector);

        self.synchronize(&CASE_OF_SET)?;
        if self.current_kind() == TokenKind::Of {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingOf)?;
        }

        let mut branch_start = CONSTANT_START.clone();
        branch_start.insert(TokenKind::End);
        let mut seen = Vec::new();

        while !self.at_eof() && self.current_kind() != TokenKind::End {
            select.add_child(self.parse_case_branch(selector_type, &mut seen)?);

            if self.current_kind() == TokenKind::Semicolon {
                self.next_token()?;
            } else if CONSTANT_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingSemicolon)?;
            }
            self.synchronize(&branch_start)?;
        }

        if self.current_kind() == TokenKind::End {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingEnd)?;
        }
        Ok(select)
    }

    fn parse_case_branch(&mut self, selector_type: Option<TypeId>, seen: &mut Vec<Value>) -> PascalResult<ICodeNode> {
        let mut branch = ICodeNode::new(NodeKind::SelectBranch);
        let mut constants = ICodeNode::new(NodeKind::SelectConstants);

        while CONSTANT_START.contains(&self.current_kind()) {
            if let Some(constant) = self.parse_case_constant(selector_type, seen)? {
                constants.add_child(constant);
            }

            self.synchronize(&CASE_COMMA_SET)?;
            if self.current_kind() == TokenKind::Comma {
                self.next_token()?;
            } else if CONSTANT_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingComma)?;
            }
        }
        branch.add_child(constants);

        if self.current_kind() == TokenKind::Colon {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingColon)?;
        }

        branch.add_child(self.parse_statement()?);
        Ok(branch)
    }

    /// One case label. The label token is always consumed, even when it is
    /// not a valid constant.
    fn parse_case_constant(&mut self, selector_type: Option<TypeId>, seen: &mut Vec<Value>) -> PascalResult<Option<ICodeNode>> {
        self.synchronize(&CONSTANT_START)?;

        let mut sign = None;
        if matches!(self.current_kind(), TokenKind::Plus | TokenKind::Minus) {
            sign = Some(self.current_kind());
            self.next_token()?;
        }

        let token = self.current();
        let integer_type = Some(self.predefined.integer_type);
        let constant = match (token.kind, &token.value) {
            (TokenKind::Identifier, _) => self.case_constant_identifier(&token, sign)?,
            (TokenKind::Integer, TokenValue::Integer(value)) => {
                let value = if sign == Some(TokenKind::Minus) { -value } else { *value };
                Some(ICodeNode::with_value(NodeKind::IntegerConstant, Value::Integer(value), integer_type))
            }
            (TokenKind::String, TokenValue::Str(text)) if sign.is_none() && text.chars().count() == 1 => {
                let char_type = Some(self.predefined.char_type);
                Some(ICodeNode::with_value(NodeKind::StringConstant, Value::Str(text.clone()), char_type))
            }
            _ => {
                self.flag(&token, PascalErrorCode::InvalidConstant)?;
                None
            }
        };

        if let Some(constant) = &constant {
            if let Some(value) = &constant.value {
                if seen.contains(value) {
                    self.flag(&token, PascalErrorCode::CaseConstantReused)?;
                } else {
                    seen.push(value.clone());
                }
            }
            if !self.checker().are_comparison_compatible(selector_type, constant.type_id) {
                self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
            }
        }

        self.next_token()?;
        Ok(constant)
    }

    fn case_constant_identifier(&mut self, token: &Token, sign: Option<TokenKind>) -> PascalResult<Option<ICodeNode>> {
        let name = token.lowercase_text();
        let Some(id) = self.symtab_stack.lookup(&name) else {
            let id = self.symtab_stack.enter_local(&name);
            self.symtab_stack.entry_mut(id).type_id = self.undefined_type();
            self.flag(token, PascalErrorCode::IdentifierUndefined)?;
            return Ok(None);
        };

        self.symtab_stack.entry_mut(id).append_line_number(token.line);
        let entry = self.symtab_stack.entry(id);
        if !matches!(entry.definition, Definition::Constant | Definition::EnumerationConstant) {
            self.flag(token, PascalErrorCode::NotConstantIdentifier)?;
            return Ok(None);
        }

        let type_id = entry.type_id;
        let Some(value) = entry.constant_value.clone() else {
            return Ok(None);
        };
        if sign.is_some() && !self.checker().is_integer(type_id) {
            self.flag(token, PascalErrorCode::InvalidConstant)?;
        }

        let value = if sign == Some(TokenKind::Minus) { value.negated() } else { value };
        let kind = match value {
            Value::Integer(_) => NodeKind::IntegerConstant,
            Value::Real(_) => NodeKind::RealConstant,
            Value::Str(_) => NodeKind::StringConstant,
        };
        Ok(Some(ICodeNode::with_value(kind, value, type_id)))
    }
}
