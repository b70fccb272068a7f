//! Synchronization sets used by the parser's error recovery.

use crate::frontend::token::TokenKind::{self, *};
use lazy_static::lazy_static;
use std::collections::HashSet;

pub type TokenSet = HashSet<TokenKind>;

fn set_of(bases: &[&TokenSet], extra: &[TokenKind]) -> TokenSet {
    let mut set: TokenSet = extra.iter().copied().collect();
    for base in bases {
        set.extend(base.iter().copied());
    }
    set
}

lazy_static! {
    // Declarations
    pub static ref DECLARATION_START: TokenSet = set_of(&[], &[Const, Type, Var, Procedure, Function, Begin]);
    pub static ref TYPE_SECTION_START: TokenSet = set_of(&[], &[Type, Var, Procedure, Function, Begin]);
    pub static ref VAR_SECTION_START: TokenSet = set_of(&[], &[Var, Procedure, Function, Begin]);
    pub static ref ROUTINE_SECTION_START: TokenSet = set_of(&[], &[Procedure, Function, Begin]);
    pub static ref PROGRAM_START: TokenSet = set_of(&[&DECLARATION_START], &[Program, Semicolon]);

    // Constant definitions
    pub static ref CONSTANT_START: TokenSet =
        set_of(&[], &[Identifier, Integer, Real, Plus, Minus, String, Semicolon]);
    pub static ref CONSTANT_IDENTIFIER_SET: TokenSet = set_of(&[&TYPE_SECTION_START], &[Identifier]);
    pub static ref CONSTANT_EQUALS_SET: TokenSet = set_of(&[&CONSTANT_START], &[Equals, Semicolon]);
    pub static ref CONSTANT_NEXT_START: TokenSet = set_of(&[&TYPE_SECTION_START], &[Semicolon, Identifier]);

    // Type definitions and specifications
    pub static ref SIMPLE_TYPE_START: TokenSet = set_of(&[&CONSTANT_START], &[LeftParen, Comma, Semicolon]);
    pub static ref TYPE_SPEC_START: TokenSet = set_of(&[&SIMPLE_TYPE_START], &[Array, Record, Semicolon]);
    pub static ref TYPE_IDENTIFIER_SET: TokenSet = set_of(&[&VAR_SECTION_START], &[Identifier]);
    pub static ref TYPE_EQUALS_SET: TokenSet = set_of(&[&TYPE_SPEC_START], &[Equals, Semicolon]);
    pub static ref TYPE_FOLLOW_SET: TokenSet = set_of(&[&VAR_SECTION_START], &[Semicolon]);
    pub static ref TYPE_NEXT_START: TokenSet = set_of(&[&VAR_SECTION_START], &[Semicolon, Identifier]);
    pub static ref ENUM_CONSTANT_START: TokenSet = set_of(&[], &[Identifier, Comma]);
    pub static ref ENUM_DEFINITION_FOLLOW: TokenSet = set_of(&[&VAR_SECTION_START], &[RightParen, Semicolon]);
    pub static ref LEFT_BRACKET_SET: TokenSet = set_of(&[&SIMPLE_TYPE_START], &[LeftBracket, RightBracket]);
    pub static ref ARRAY_RIGHT_BRACKET_SET: TokenSet = set_of(&[], &[RightBracket, Of, Semicolon]);
    pub static ref ARRAY_OF_SET: TokenSet = set_of(&[&TYPE_SPEC_START], &[Of, Semicolon]);
    pub static ref INDEX_START: TokenSet = set_of(&[&SIMPLE_TYPE_START], &[Comma]);
    pub static ref INDEX_END: TokenSet = set_of(&[], &[RightBracket, Of, Semicolon]);
    pub static ref INDEX_FOLLOW: TokenSet = set_of(&[&INDEX_START, &INDEX_END], &[]);
    pub static ref RECORD_END_SET: TokenSet = set_of(&[&VAR_SECTION_START], &[End, Semicolon]);

    // Variable declarations and formal parameters
    pub static ref VARIABLE_IDENTIFIER_SET: TokenSet = set_of(&[&VAR_SECTION_START], &[Identifier, End, Semicolon]);
    pub static ref VARIABLE_NEXT_START: TokenSet = set_of(&[&DECLARATION_START], &[Identifier, Semicolon]);
    pub static ref IDENTIFIER_START: TokenSet = set_of(&[], &[Identifier, Comma]);
    pub static ref IDENTIFIER_FOLLOW: TokenSet = set_of(&[&VAR_SECTION_START], &[Colon, Semicolon]);
    pub static ref IDENTIFIER_COMMA_SET: TokenSet = set_of(&[], &[Comma, Colon, Identifier, Semicolon]);
    pub static ref COLON_SET: TokenSet = set_of(&[], &[Colon, Semicolon]);
    pub static ref LEFT_PAREN_SET: TokenSet = set_of(&[&DECLARATION_START], &[LeftParen, Semicolon, Colon]);
    pub static ref PARAMETER_SET: TokenSet = set_of(&[&DECLARATION_START], &[Identifier, RightParen]);
    pub static ref PARAMETER_FOLLOW: TokenSet =
        set_of(&[&DECLARATION_START], &[Colon, RightParen, Semicolon]);
    pub static ref PARAMETER_COMMA_SET: TokenSet =
        set_of(&[&DECLARATION_START], &[Comma, Colon, Identifier, RightParen, Semicolon]);

    // Statements
    pub static ref STATEMENT_START: TokenSet =
        set_of(&[], &[Begin, Case, For, If, Repeat, While, Identifier, Semicolon]);
    pub static ref STATEMENT_FOLLOW: TokenSet = set_of(&[], &[Semicolon, End, Else, Until, Dot]);
    pub static ref EXPRESSION_START: TokenSet =
        set_of(&[], &[Plus, Minus, Identifier, Integer, Real, String, Not, LeftParen]);
    pub static ref COLON_EQUALS_SET: TokenSet = set_of(&[&EXPRESSION_START, &STATEMENT_FOLLOW], &[ColonEquals]);
    pub static ref TO_DOWNTO_SET: TokenSet = set_of(&[&EXPRESSION_START, &STATEMENT_FOLLOW], &[To, Downto]);
    pub static ref DO_SET: TokenSet = set_of(&[&STATEMENT_START, &STATEMENT_FOLLOW], &[Do]);
    pub static ref THEN_SET: TokenSet = set_of(&[&STATEMENT_START, &STATEMENT_FOLLOW], &[Then]);
    pub static ref CASE_OF_SET: TokenSet = set_of(&[&CONSTANT_START, &STATEMENT_FOLLOW], &[Of]);
    pub static ref CASE_COMMA_SET: TokenSet =
        set_of(&[&CONSTANT_START, &STATEMENT_START, &STATEMENT_FOLLOW], &[Comma, Colon]);

    // Variables and calls
    pub static ref SUBSCRIPT_FIELD_START: TokenSet = set_of(&[], &[LeftBracket, Dot]);
    pub static ref VARIABLE_RIGHT_BRACKET_SET: TokenSet = set_of(&[], &[RightBracket, Equals, Semicolon]);
    pub static ref ACTUAL_COMMA_SET: TokenSet = set_of(&[&EXPRESSION_START], &[Comma, RightParen]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_start_sets_shrink_in_declaration_order() {
        assert!(DECLARATION_START.contains(&Const));
        assert!(!TYPE_SECTION_START.contains(&Const));
        assert!(!VAR_SECTION_START.contains(&Type));
        assert!(!ROUTINE_SECTION_START.contains(&Var));
        assert!(ROUTINE_SECTION_START.contains(&Begin));
    }

    #[test]
    fn derived_sets_include_their_bases() {
        assert!(PROGRAM_START.contains(&Program));
        assert!(PROGRAM_START.contains(&Begin));
        assert!(DO_SET.contains(&Do));
        assert!(DO_SET.contains(&Until));
        assert!(INDEX_FOLLOW.contains(&Comma) && INDEX_FOLLOW.contains(&Of));
    }
}
