use super::Parser;
use crate::ast::{ICode, ICodeNode, NodeKind};
use crate::frontend::errors::PascalErrorCode;
use crate::frontend::token::{Token, TokenKind};
use crate::frontend::token_sets::*;
use crate::semantic::symboltable::{Definition, EntryId, RoutineCode};
use crate::semantic::typespec::TypeId;
use crate::utils::config::parser::{
    dummy_function_name, dummy_procedure_name, DUMMY_PROGRAM_NAME, FORWARD_DIRECTIVE,
};
use crate::utils::errors::PascalResult;

impl<'a> Parser<'a> {
    /* program = "PROGRAM" ident [ "(" ident { "," ident } ")" ] ";" block "." . */
    pub(super) fn parse_program(&mut self) -> PascalResult<()> {
        self.synchronize(&PROGRAM_START)?;
        self.parse_routine(None)?;

        if self.current_kind() != TokenKind::Dot {
            self.flag_current(PascalErrorCode::MissingPeriod)?;
        }
        Ok(())
    }

    /* routine = ( "PROGRAM" | "PROCEDURE" | "FUNCTION" ) ident header ";"
     *           ( block | "forward" ) .
     */
    pub(super) fn parse_routine(&mut self, parent: Option<EntryId>) -> PascalResult<EntryId> {
        let (definition, dummy_name) = match self.current_kind() {
            TokenKind::Program => {
                self.next_token()?;
                (Definition::Program, DUMMY_PROGRAM_NAME.to_string())
            }
            TokenKind::Procedure => {
                self.next_token()?;
                self.dummy_counter += 1;
                (Definition::Procedure, dummy_procedure_name(self.dummy_counter))
            }
            TokenKind::Function => {
                self.next_token()?;
                self.dummy_counter += 1;
                (Definition::Function, dummy_function_name(self.dummy_counter))
            }
            _ => {
                self.flag_current(PascalErrorCode::MissingProgram)?;
                (Definition::Program, DUMMY_PROGRAM_NAME.to_string())
            }
        };

        let header_token = self.current();
        let routine_id = self.parse_routine_name(&dummy_name)?;
        let was_forwarded = self.symtab_stack.entry(routine_id).routine_code() == Some(RoutineCode::Forward);

        if was_forwarded {
            if self.symtab_stack.entry(routine_id).definition != definition {
                self.flag(&header_token, PascalErrorCode::AlreadyForwarded)?;
            }
        } else {
            self.symtab_stack.entry_mut(routine_id).definition = definition;
        }

        let existing = self
            .symtab_stack
            .entry(routine_id)
            .routine
            .as_ref()
            .and_then(|routine| routine.symtab);
        let table = match existing {
            Some(table) if was_forwarded => table,
            _ => {
                let table = self.symtab_stack.create_table();
                self.symtab_stack.entry_mut(routine_id).routine_mut().symtab = Some(table);
                table
            }
        };

        if definition == Definition::Program {
            self.symtab_stack.set_program_id(routine_id);
        } else if !was_forwarded {
            if let Some(parent) = parent {
                self.symtab_stack.entry_mut(parent).routine_mut().routines.push(routine_id);
            }
        }

        self.in_scope(table, |parser| parser.parse_routine_body(routine_id, was_forwarded))?;
        Ok(routine_id)
    }

    /// Find or enter the routine's name. A name already declared in this
    /// scope is only acceptable when it was declared `forward`; otherwise
    /// the routine is entered under `dummy_name` so parsing can go on.
    fn parse_routine_name(&mut self, dummy_name: &str) -> PascalResult<EntryId> {
        let token = self.current();
        let mut routine_id = None;

        if token.kind == TokenKind::Identifier {
            let name = token.lowercase_text();
            match self.symtab_stack.lookup_local(&name) {
                None => {
                    let id = self.symtab_stack.enter_local(&name);
                    self.symtab_stack.entry_mut(id).append_line_number(token.line);
                    routine_id = Some(id);
                }
                Some(id) if self.symtab_stack.entry(id).routine_code() == Some(RoutineCode::Forward) => {
                    self.symtab_stack.entry_mut(id).append_line_number(token.line);
                    routine_id = Some(id);
                }
                Some(_) => self.flag(&token, PascalErrorCode::IdentifierRedefined)?,
            }
            self.next_token()?;
        } else {
            self.flag(&token, PascalErrorCode::MissingIdentifier)?;
        }

        Ok(match routine_id {
            Some(id) => id,
            None => self.symtab_stack.enter_local(dummy_name),
        })
    }

    fn parse_routine_body(&mut self, routine_id: EntryId, was_forwarded: bool) -> PascalResult<()> {
        if !was_forwarded {
            self.parse_header(routine_id)?;
        } else if self.current_kind() != TokenKind::Semicolon {
            self.parse_repeated_header(routine_id)?;
        }

        if self.current_kind() == TokenKind::Semicolon {
            while self.current_kind() == TokenKind::Semicolon {
                self.next_token()?;
            }
        } else {
            self.flag_current(PascalErrorCode::MissingSemicolon)?;
        }

        if self.current_kind() == TokenKind::Identifier && self.current_token.lowercase_text() == FORWARD_DIRECTIVE {
            self.next_token()?;
            self.symtab_stack.entry_mut(routine_id).routine_mut().code = Some(RoutineCode::Forward);
            return Ok(());
        }

        // Recursive calls inside the block must see a declared routine.
        self.symtab_stack.entry_mut(routine_id).routine_mut().code = Some(RoutineCode::Declared);
        let body = self.parse_block(routine_id)?;

        let kind = match self.symtab_stack.entry(routine_id).definition {
            Definition::Program => NodeKind::Program,
            Definition::Function => NodeKind::Function,
            _ => NodeKind::Procedure,
        };
        let mut root = ICodeNode::new(kind);
        root.id = Some(routine_id);
        root.add_optional_child(body);

        let mut icode = ICode::new();
        icode.set_root(root);
        self.symtab_stack.entry_mut(routine_id).routine_mut().icode = Some(icode);
        Ok(())
    }

    /* header = [ "(" parameters ")" ] [ ":" type-identifier ] . */
    fn parse_header(&mut self, routine_id: EntryId) -> PascalResult<()> {
        let is_program = self.symtab_stack.entry(routine_id).definition == Definition::Program;
        if let Some(parms) = self.parse_formal_parameters(is_program)? {
            self.symtab_stack.entry_mut(routine_id).routine_mut().parms = parms;
        }

        if self.symtab_stack.entry(routine_id).definition == Definition::Function {
            let type_id = self.parse_return_type()?;
            self.symtab_stack.entry_mut(routine_id).type_id = type_id;
        }
        Ok(())
    }

    /// Header written again on the body of a routine declared `forward`.
    /// It is parsed into a scratch scope and must match the forward
    /// declaration exactly.
    fn parse_repeated_header(&mut self, routine_id: EntryId) -> PascalResult<()> {
        let token = self.current();
        let is_function = self.symtab_stack.entry(routine_id).definition == Definition::Function;
        let scratch = self.symtab_stack.create_table();

        let (parms, return_type) = self.in_scope(scratch, |parser| {
            let parms = parser.parse_formal_parameters(false)?;
            let return_type = if is_function && parser.current_kind() == TokenKind::Colon {
                Some(parser.parse_return_type()?)
            } else {
                None
            };
            Ok((parms, return_type))
        })?;

        let parms_match = match &parms {
            Some(parms) => self.same_parameters(self.symtab_stack.entry(routine_id).parms(), parms),
            None => true,
        };
        let type_matches = match return_type {
            Some(type_id) => type_id == self.symtab_stack.entry(routine_id).type_id,
            None => true,
        };
        if !parms_match || !type_matches {
            self.flag(&token, PascalErrorCode::AlreadyForwarded)?;
        }
        Ok(())
    }

    fn same_parameters(&self, forward: &[EntryId], repeated: &[EntryId]) -> bool {
        forward.len() == repeated.len()
            && forward.iter().zip(repeated).all(|(a, b)| {
                let a = self.symtab_stack.entry(*a);
                let b = self.symtab_stack.entry(*b);
                a.name == b.name && a.definition == b.definition && a.type_id == b.type_id
            })
    }

    fn parse_return_type(&mut self) -> PascalResult<Option<TypeId>> {
        let token = self.current();
        let type_id = self.parse_declared_type(Definition::Function)?;

        match type_id {
            Some(type_id) => {
                if self.symtab_stack.type_spec(type_id).is_array_or_record() {
                    self.flag(&token, PascalErrorCode::InvalidType)?;
                }
                Ok(Some(type_id))
            }
            None => Ok(self.undefined_type()),
        }
    }

    /* parameters = parameter-group { ";" parameter-group } .
     * parameter-group = [ "VAR" ] ident { "," ident } ":" type-identifier .
     */
    fn parse_formal_parameters(&mut self, is_program: bool) -> PascalResult<Option<Vec<EntryId>>> {
        self.synchronize(&LEFT_PAREN_SET)?;
        if self.current_kind() != TokenKind::LeftParen {
            return Ok(None);
        }
        self.next_token()?;

        let mut parms = Vec::new();
        self.synchronize(&PARAMETER_SET)?;
        while matches!(self.current_kind(), TokenKind::Identifier | TokenKind::Var) {
            parms.extend(self.parse_parameter_group(is_program)?);
        }

        if self.current_kind() == TokenKind::RightParen {
            self.next_token()?;
        } else {
            self.flag_current(PascalErrorCode::MissingRightParen)?;
        }
        Ok(Some(parms))
    }

    fn parse_parameter_group(&mut self, is_program: bool) -> PascalResult<Vec<EntryId>> {
        let mut definition = if is_program {
            Definition::ProgramParm
        } else {
            Definition::ValueParm
        };

        if self.current_kind() == TokenKind::Var {
            if is_program {
                self.flag_current(PascalErrorCode::InvalidVarParm)?;
            } else {
                definition = Definition::VarParm;
            }
            self.next_token()?;
        }

        let group = self.parse_identifier_sublist(definition, &PARAMETER_FOLLOW, &PARAMETER_COMMA_SET)?;
        if !is_program {
            self.skip_semicolons(&VARIABLE_NEXT_START)?;
            self.synchronize(&PARAMETER_SET)?;
        }
        Ok(group)
    }

    /* block = declarations compound-statement . */
    fn parse_block(&mut self, routine_id: EntryId) -> PascalResult<Option<ICodeNode>> {
        self.parse_declarations(routine_id)?;
        let token: Token = self.synchronize(&STATEMENT_START)?;

        if token.kind == TokenKind::Begin {
            return self.parse_statement().map(Some);
        }

        self.flag(&token, PascalErrorCode::MissingBegin)?;
        if STATEMENT_START.contains(&token.kind) {
            let mut compound = ICodeNode::new(NodeKind::Compound);
            compound.line = Some(token.line);
            self.parse_statement_list(&mut compound, TokenKind::End, PascalErrorCode::MissingEnd)?;
            return Ok(Some(compound));
        }
        Ok(None)
    }
}
