use super::Parser;
use crate::ast::{ICodeNode, NodeKind};
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind};
use crate::frontend::token_sets::{ACTUAL_COMMA_SET, EXPRESSION_START};
use crate::semantic::symboltable::{Definition, EntryId, RoutineCode};
use crate::semantic::typespec::{TypeForm, TypeId};
use crate::utils::errors::PascalResult;

/// How the actual parameters of a call are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParameterMode {
    /// Against the formal parameters of a declared routine.
    Declared,
    /// read and readln: variables of scalar type.
    Read,
    /// write and writeln: scalars or strings, with optional width and precision.
    Write,
    /// Standard functions check their single argument themselves.
    Standard,
}

impl<'a> Parser<'a> {
    /* call = ident [ "(" actual-parameter { "," actual-parameter } ")" ] . */
    pub(super) fn parse_call(&mut self) -> PascalResult<ICodeNode> {
        let token = self.current();
        let Some(id) = self.symtab_stack.lookup(&token.lowercase_text()) else {
            return self.parse_variable();
        };

        let entry = self.symtab_stack.entry(id);
        let code = entry.routine_code();
        let mut call = ICodeNode::new(NodeKind::Call);
        call.id = Some(id);
        call.type_id = entry.type_id;

        self.symtab_stack.entry_mut(id).append_line_number(token.line);
        self.next_token()?;

        match code {
            None | Some(RoutineCode::Declared) | Some(RoutineCode::Forward) => {
                let parms = self.parse_actual_parameters(id, ParameterMode::Declared)?;
                call.add_optional_child(parms);
            }
            Some(code) => self.parse_standard_call(&token, id, code, &mut call)?,
        }
        Ok(call)
    }

    fn parse_standard_call(&mut self, token: &Token, id: EntryId, code: RoutineCode, call: &mut ICodeNode) -> PascalResult<()> {
        let mode = match code {
            RoutineCode::Read | RoutineCode::Readln => ParameterMode::Read,
            RoutineCode::Write | RoutineCode::Writeln => ParameterMode::Write,
            _ => ParameterMode::Standard,
        };
        let parms = self.parse_actual_parameters(id, mode)?;

        match code {
            RoutineCode::Read | RoutineCode::Write => {
                if parms.as_ref().map_or(true, |parms| parms.children.is_empty()) {
                    self.flag(token, PascalErrorCode::WrongNumberOfParms)?;
                }
            }
            RoutineCode::Readln | RoutineCode::Writeln => {}
            RoutineCode::Eof | RoutineCode::Eoln => {
                if parms.is_some() {
                    self.flag(token, PascalErrorCode::WrongNumberOfParms)?;
                }
                call.type_id = Some(self.predefined.boolean_type);
            }
            _ => call.type_id = self.standard_function_type(token, code, &parms)?,
        }

        call.add_optional_child(parms);
        Ok(())
    }

    /// Result type of a one-argument standard function.
    fn standard_function_type(
        &mut self,
        token: &Token,
        code: RoutineCode,
        parms: &Option<ICodeNode>,
    ) -> PascalResult<Option<TypeId>> {
        let arguments = parms.as_ref().map_or(&[][..], |parms| parms.children.as_slice());
        if arguments.len() != 1 {
            self.flag(token, PascalErrorCode::WrongNumberOfParms)?;
            return Ok(self.undefined_type());
        }

        let argument = self.symtab_stack.base_type(arguments[0].type_id);
        let predefined = &self.predefined;
        let checker = self.checker();
        let result = match code {
            RoutineCode::Abs | RoutineCode::Sqr if checker.is_integer_or_real(argument) => argument,
            RoutineCode::Arctan
            | RoutineCode::Cos
            | RoutineCode::Exp
            | RoutineCode::Ln
            | RoutineCode::Sin
            | RoutineCode::Sqrt
                if checker.is_integer_or_real(argument) =>
            {
                Some(predefined.real_type)
            }
            RoutineCode::Pred | RoutineCode::Succ if checker.is_integer(argument) || checker.is_enumeration(argument) => {
                argument
            }
            RoutineCode::Chr if checker.is_integer(argument) => Some(predefined.char_type),
            RoutineCode::Odd if checker.is_integer(argument) => Some(predefined.boolean_type),
            RoutineCode::Ord if checker.is_char(argument) || checker.is_enumeration(argument) => {
                Some(predefined.integer_type)
            }
            RoutineCode::Round | RoutineCode::Trunc if checker.is_real(argument) => Some(predefined.integer_type),
            _ => None,
        };

        match result {
            Some(result) => Ok(Some(result)),
            None => {
                self.flag(token, PascalErrorCode::InvalidType)?;
                Ok(self.undefined_type())
            }
        }
    }

    /// Parse `"(" actual { "," actual } ")"` if present. Returns the
    /// PARAMETERS node, or `None` when the call has no parenthesized list.
    fn parse_actual_parameters(&mut self, routine_id: EntryId, mode: ParameterMode) -> PascalResult<Option<ICodeNode>> {
        let formals: Vec<EntryId> = match mode {
            ParameterMode::Declared => self.symtab_stack.entry(routine_id).parms().to_vec(),
            _ => Vec::new(),
        };

        if self.current_kind() != TokenKind::LeftParen {
            if !formals.is_empty() {
                self.flag_current(PascalErrorCode::WrongNumberOfParms)?;
            }
            return Ok(None);
        }
        self.next_token()?;

        let mut parms = ICodeNode::new(NodeKind::Parameters);
        let mut count = 0;

        while self.current_kind() != TokenKind::RightParen && !self.at_eof() {
            let token = self.current();
            let mut actual = self.parse_expression()?;

            match mode {
                ParameterMode::Declared => {
                    if let Some(&formal) = formals.get(count) {
                        self.check_actual_parameter(&token, formal, &actual)?;
                    }
                }
                ParameterMode::Read => {
                    if !self.is_readable_variable(&actual) {
                        self.flag(&token, PascalErrorCode::InvalidVarParm)?;
                    }
                }
                ParameterMode::Write => {
                    let base = self.symtab_stack.base_type(actual.type_id);
                    let checker = self.checker();
                    let writable = checker.is_scalar(base) || checker.is_boolean(base) || checker.is_pascal_string(base);
                    if !writable {
                        self.flag(&token, PascalErrorCode::IncompatibleTypes)?;
                    }

                    let mut write_parm = ICodeNode::new(NodeKind::WriteParm);
                    write_parm.type_id = actual.type_id;
                    write_parm.add_child(actual);
                    let width = self.parse_write_spec()?;
                    write_parm.add_optional_child(width);
                    let precision = self.parse_write_spec()?;
                    write_parm.add_optional_child(precision);
                    actual = write_parm;
                }
                ParameterMode::Standard => {}
            }

            parms.add_child(actual);
            count += 1;

            self.synchronize(&ACTUAL_COMMA_SET)?;
            if self.current_kind() == TokenKind::Comma {
                self.next_token()?;
            } else if EXPRESSION_START.contains(&self.current_kind()) {
                self.flag_current(PascalErrorCode::MissingComma)?;
            }
        }

        let close = self.current();
        if close.kind == TokenKind::RightParen {
            self.next_token()?;
        } else {
            self.flag(&close, PascalErrorCode::MissingRightParen)?;
        }

        // Standard routines check their own argument counts.
        if mode == ParameterMode::Declared && (count == 0 || count != formals.len()) {
            self.flag(&close, PascalErrorCode::WrongNumberOfParms)?;
        }
        Ok(Some(parms))
    }

    /// VAR parameters need a variable of the identical type; value
    /// parameters need an assignment-compatible expression.
    fn check_actual_parameter(&mut self, token: &Token, formal: EntryId, actual: &ICodeNode) -> PascalResult<()> {
        let formal_entry = self.symtab_stack.entry(formal);
        let formal_type = formal_entry.type_id;

        if formal_entry.definition == Definition::VarParm {
            if actual.kind != NodeKind::Variable || actual.type_id != formal_type {
                self.flag(token, PascalErrorCode::InvalidVarParm)?;
            }
        } else if !self.checker().are_assignment_compatible(formal_type, actual.type_id) {
            self.flag(token, PascalErrorCode::IncompatibleTypes)?;
        }
        Ok(())
    }

    fn is_readable_variable(&self, actual: &ICodeNode) -> bool {
        if actual.kind != NodeKind::Variable {
            return false;
        }
        let checker = self.checker();
        match self.symtab_stack.form_of(actual.type_id) {
            Some(TypeForm::Scalar) => true,
            Some(TypeForm::Subrange { .. }) => checker.is_integer(actual.type_id),
            _ => checker.is_boolean(actual.type_id),
        }
    }

    /// Optional `":" integer` field width or precision of a write argument.
    fn parse_write_spec(&mut self) -> PascalResult<Option<ICodeNode>> {
        if self.current_kind() != TokenKind::Colon {
            return Ok(None);
        }
        self.next_token()?;

        let token = self.current();
        let spec = self.parse_expression()?;
        if spec.kind == NodeKind::IntegerConstant {
            Ok(Some(spec))
        } else {
            self.flag(&token, PascalErrorCode::InvalidNumber)?;
            Ok(None)
        }
    }
}
