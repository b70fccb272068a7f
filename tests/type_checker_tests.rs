use pascalfe::semantic::{Predefined, SymbolTableStack, TypeChecker, TypeForm, TypeId};

fn environment() -> (SymbolTableStack, Predefined) {
    let mut stack = SymbolTableStack::new();
    let predefined = Predefined::initialize(&mut stack);
    (stack, predefined)
}

fn subrange(stack: &mut SymbolTableStack, base: TypeId, min: i64, max: i64) -> TypeId {
    stack.create_type(TypeForm::Subrange {
        base_type: Some(base),
        min_value: Some(min),
        max_value: Some(max),
    })
}

#[test]
fn test_predicates_follow_subrange_bases() {
    let (mut stack, predefined) = environment();
    let small = subrange(&mut stack, predefined.integer_type, 1, 10);
    let checker = TypeChecker::new(&stack, &predefined);

    assert!(checker.is_integer(Some(small)));
    assert!(checker.is_integer_or_real(Some(predefined.real_type)));
    assert!(checker.is_boolean(Some(predefined.boolean_type)));
    assert!(checker.is_enumeration(Some(predefined.boolean_type)));
    assert!(checker.is_char(Some(predefined.char_type)));
    assert!(checker.is_scalar(Some(small)));
    assert!(!checker.is_scalar(Some(predefined.boolean_type)));
    assert!(!checker.is_integer(None));
}

#[test]
fn test_real_promotion() {
    let (stack, predefined) = environment();
    let checker = TypeChecker::new(&stack, &predefined);
    let (integer, real) = (Some(predefined.integer_type), Some(predefined.real_type));

    assert!(checker.is_at_least_one_real(real, integer));
    assert!(checker.is_at_least_one_real(integer, real));
    assert!(checker.is_at_least_one_real(real, real));
    assert!(!checker.is_at_least_one_real(integer, integer));
    assert!(checker.are_both_integer(integer, integer));
}

#[test]
fn test_assignment_compatibility() {
    let (mut stack, predefined) = environment();
    let small = subrange(&mut stack, predefined.integer_type, 1, 10);
    let five = stack.create_string_type(5, predefined.integer_type, predefined.char_type);
    let seven = stack.create_string_type(7, predefined.integer_type, predefined.char_type);
    let checker = TypeChecker::new(&stack, &predefined);

    let (integer, real, char_type) = (
        Some(predefined.integer_type),
        Some(predefined.real_type),
        Some(predefined.char_type),
    );
    assert!(checker.are_assignment_compatible(real, integer));
    assert!(!checker.are_assignment_compatible(integer, real));
    assert!(checker.are_assignment_compatible(Some(small), integer));
    assert!(checker.are_assignment_compatible(integer, Some(small)));
    assert!(checker.are_assignment_compatible(Some(five), Some(seven)));
    assert!(!checker.are_assignment_compatible(char_type, Some(five)));
    assert!(!checker.are_assignment_compatible(integer, Some(predefined.undefined_type)));
    assert!(!checker.are_assignment_compatible(None, integer));
}

#[test]
fn test_comparison_compatibility() {
    let (mut stack, predefined) = environment();
    let colors = stack.create_type(TypeForm::Enumeration { constants: Vec::new() });
    let shades = stack.create_type(TypeForm::Enumeration { constants: Vec::new() });
    let record = {
        let table = stack.create_table();
        stack.create_type(TypeForm::Record { symtab: table })
    };
    let checker = TypeChecker::new(&stack, &predefined);

    let (integer, real, boolean) = (
        Some(predefined.integer_type),
        Some(predefined.real_type),
        Some(predefined.boolean_type),
    );
    assert!(checker.are_comparison_compatible(integer, integer));
    assert!(checker.are_comparison_compatible(integer, real));
    assert!(checker.are_comparison_compatible(boolean, boolean));
    assert!(checker.are_comparison_compatible(Some(colors), Some(colors)));
    assert!(!checker.are_comparison_compatible(Some(colors), Some(shades)));
    assert!(!checker.are_comparison_compatible(Some(record), Some(record)));
    assert!(!checker.are_comparison_compatible(boolean, integer));
}
