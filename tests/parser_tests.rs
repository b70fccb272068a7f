use pascalfe::ast::{ICode, ICodeNode, NodeKind};
use pascalfe::backend::Backend;
use pascalfe::frontend::ParseOutcome;
use pascalfe::message::{MessageHandler, MessageLog};
use pascalfe::semantic::{Definition, EntryId, RoutineCode, SymbolTableStack, TypeForm, Value};
use pascalfe::utils::errors::{PascalError, PascalResult};
use pascalfe::{parse_source, routine_icode, translate, Options};
use std::cell::RefCell;
use std::rc::Rc;

fn parse(text: &str) -> PascalResult<(ParseOutcome, Rc<RefCell<MessageLog>>)> {
    let log = Rc::new(RefCell::new(MessageLog::new()));
    let mut messages = MessageHandler::new();
    messages.add_listener(log.clone());
    let outcome = parse_source(text, Options::default(), messages)?;
    Ok((outcome, log))
}

fn program_body(outcome: &ParseOutcome) -> &ICodeNode {
    let program = outcome.symtab_stack.program_id().expect("program entry");
    let root = routine_icode(outcome, program).and_then(|icode| icode.root()).expect("program icode");
    assert_eq!(root.kind, NodeKind::Program);
    root.child(0).expect("program body")
}

fn first_statement(outcome: &ParseOutcome) -> &ICodeNode {
    program_body(outcome).child(0).expect("first statement")
}

fn lookup_in_program(outcome: &ParseOutcome, name: &str) -> EntryId {
    let stack = &outcome.symtab_stack;
    let program = stack.program_id().expect("program entry");
    let table = stack.entry(program).routine.as_ref().and_then(|r| r.symtab).expect("program table");
    stack.lookup_in(table, name).expect("declared name")
}

fn kinds(node: &ICodeNode) -> Vec<NodeKind> {
    node.children.iter().map(|child| child.kind).collect()
}

/// Back end that only counts how often it is called.
#[derive(Default)]
struct RecordingBackend {
    calls: usize,
}

impl Backend for RecordingBackend {
    fn process(&mut self, _icode: &ICode, _symtab_stack: &SymbolTableStack) -> PascalResult<()> {
        self.calls += 1;
        Ok(())
    }
}

const FULL_PROGRAM: &str = "\
program demo(input, output);
const
  limit = 10;
  greeting = 'hello';
type
  range = 1..10;
  color = (red, green, blue);
  vector = array [range] of integer;
  point = record x, y: real end;
var
  i, total: integer;
  c: color;
  v: vector;
  p: point;
  ok: boolean;
  ch: char;

function square(n: integer): integer;
begin
  square := n * n
end;

procedure show(var t: integer; scale: real);
begin
  writeln(greeting, ' total = ', t:5, scale:8:2)
end;

begin
  total := 0;
  for i := 1 to limit do
    total := total + square(i);
  v[1] := total div 2;
  p.x := 1.5; p.y := p.x * 2;
  c := green;
  ok := (total > 100) and not (c = red);
  while total > 0 do total := total - 1;
  repeat i := i - 1 until i <= 0;
  case c of
    red: ch := 'r';
    green, blue: ch := 'g'
  end;
  if ok then show(total, 2) else writeln
end.
";

#[test]
fn test_full_program_parses_cleanly() -> PascalResult<()> {
    let (outcome, log) = parse(FULL_PROGRAM)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.line_count, 43);
    Ok(())
}

#[test]
fn test_every_variable_node_is_typed() -> PascalResult<()> {
    let (outcome, _) = parse(FULL_PROGRAM)?;
    let stack = &outcome.symtab_stack;
    let program = stack.program_id().unwrap();

    let mut routines = vec![program];
    routines.extend(stack.entry(program).routine.as_ref().unwrap().routines.iter().copied());
    assert_eq!(routines.len(), 3);

    let mut variables = 0;
    for id in routines {
        let root = routine_icode(&outcome, id).and_then(|icode| icode.root()).unwrap();
        assert_eq!(root.id, Some(id));
        root.visit(&mut |node: &ICodeNode| {
            if node.kind == NodeKind::Variable {
                variables += 1;
                assert!(node.type_id.is_some(), "untyped variable node {:?}", node.id);
            }
        });
    }
    assert!(variables > 20);
    Ok(())
}

#[test]
fn test_declarations_are_entered() -> PascalResult<()> {
    let (outcome, _) = parse(FULL_PROGRAM)?;
    let stack = &outcome.symtab_stack;

    let limit = stack.entry(lookup_in_program(&outcome, "limit"));
    assert_eq!(limit.definition, Definition::Constant);
    assert_eq!(limit.constant_value, Some(Value::Integer(10)));

    let green = stack.entry(lookup_in_program(&outcome, "green"));
    assert_eq!(green.definition, Definition::EnumerationConstant);
    assert_eq!(green.constant_value, Some(Value::Integer(1)));

    let vector = stack.entry(lookup_in_program(&outcome, "vector"));
    match &stack.type_spec(vector.type_id.unwrap()).form {
        TypeForm::Array { element_count, element_type, .. } => {
            assert_eq!(*element_count, 10);
            assert_eq!(*element_type, Some(outcome.predefined.integer_type));
        }
        other => panic!("vector has form {}", other),
    }

    let input = stack.entry(lookup_in_program(&outcome, "input"));
    assert_eq!(input.definition, Definition::ProgramParm);

    let show = stack.entry(lookup_in_program(&outcome, "show"));
    assert_eq!(show.definition, Definition::Procedure);
    assert_eq!(show.routine_code(), Some(RoutineCode::Declared));
    let parms = show.parms();
    assert_eq!(parms.len(), 2);
    assert_eq!(stack.entry(parms[0]).definition, Definition::VarParm);
    assert_eq!(stack.entry(parms[1]).definition, Definition::ValueParm);

    let square = stack.entry(lookup_in_program(&outcome, "square"));
    assert_eq!(square.type_id, Some(outcome.predefined.integer_type));
    Ok(())
}

#[test]
fn test_line_numbers_are_recorded() -> PascalResult<()> {
    let (outcome, _) = parse(FULL_PROGRAM)?;
    let total = outcome.symtab_stack.entry(lookup_in_program(&outcome, "total"));
    assert_eq!(total.line_numbers[0], 11);
    assert!(total.line_numbers.contains(&31));
    Ok(())
}

#[test]
fn test_redefined_identifier() -> PascalResult<()> {
    let (outcome, log) = parse("program r;\nvar x: integer;\n    x: real;\nbegin\nend.\n")?;
    assert_eq!(log.borrow().syntax_errors(), vec![(3, "Redefined identifier".to_string())]);
    assert_eq!(outcome.error_count, 1);
    Ok(())
}

#[test]
fn test_undefined_identifier() -> PascalResult<()> {
    let (_, log) = parse("program u;\nbegin\n  y := 1\nend.\n")?;
    let log = log.borrow();
    assert_eq!(log.count_errors("Undefined identifier"), 1);
    assert_eq!(log.syntax_errors()[0].0, 3);
    Ok(())
}

#[test]
fn test_forward_declaration_is_resolved() -> PascalResult<()> {
    let source = "\
program fwd;
var r: integer;
function later(n: integer): integer; forward;
procedure first;
begin
  r := later(3)
end;
function later;
begin
  later := n + 1
end;
begin
  first
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let later = lookup_in_program(&outcome, "later");
    let entry = outcome.symtab_stack.entry(later);
    assert_eq!(entry.routine_code(), Some(RoutineCode::Declared));
    assert!(routine_icode(&outcome, later).is_some());
    assert_eq!(entry.line_numbers, vec![3, 6, 8, 10]);
    Ok(())
}

#[test]
fn test_forward_header_mismatch() -> PascalResult<()> {
    let source = "\
program fwd;
function later(n: integer): integer; forward;
function later(m: integer): integer;
begin
  later := n
end;
begin
end.
";
    let (_, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![(3, "Already specified in forward".to_string())]);
    Ok(())
}

#[test]
fn test_subrange_limits() -> PascalResult<()> {
    let (_, log) = parse("program s;\ntype r = 1..10;\nbegin\nend.\n")?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let (_, log) = parse("program s;\ntype r = 10..1;\nbegin\nend.\n")?;
    assert_eq!(
        log.borrow().syntax_errors(),
        vec![(2, "Min limit greater than max limit".to_string())]
    );
    Ok(())
}

#[test]
fn test_char_and_enumeration_subranges() -> PascalResult<()> {
    let source = "\
program s;
type
  color = (red, green, blue);
  warm = red..green;
  letters = 'a'..'z';
var l: letters;
begin
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let letters = outcome.symtab_stack.entry(lookup_in_program(&outcome, "letters"));
    match &outcome.symtab_stack.type_spec(letters.type_id.unwrap()).form {
        TypeForm::Subrange { min_value, max_value, base_type } => {
            assert_eq!((*min_value, *max_value), (Some(97), Some(122)));
            assert_eq!(*base_type, Some(outcome.predefined.char_type));
        }
        other => panic!("letters has form {}", other),
    }
    Ok(())
}

#[test]
fn test_for_to_statement_shape() -> PascalResult<()> {
    let source = "program f;\nvar i, n: integer;\nbegin\n  for i := 1 to 10 do n := i\nend.\n";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let for_node = first_statement(&outcome);
    assert_eq!(for_node.kind, NodeKind::Compound);
    assert_eq!(for_node.line, Some(4));
    assert_eq!(kinds(for_node), vec![NodeKind::Assign, NodeKind::Loop]);

    let loop_node = for_node.child(1).unwrap();
    assert_eq!(kinds(loop_node), vec![NodeKind::Test, NodeKind::Assign, NodeKind::Assign]);

    let relation = loop_node.child(0).unwrap().child(0).unwrap();
    assert_eq!(relation.kind, NodeKind::Gt);
    assert_eq!(relation.type_id, Some(outcome.predefined.boolean_type));
    assert_eq!(relation.child(0).unwrap().kind, NodeKind::Variable);
    assert_eq!(relation.child(1).unwrap().value, Some(Value::Integer(10)));

    let step = loop_node.child(2).unwrap();
    assert_eq!(step.line, Some(4));
    assert_eq!(step.type_id, Some(outcome.predefined.integer_type));
    let increment = step.child(1).unwrap();
    assert_eq!(increment.kind, NodeKind::Add);
    assert_eq!(increment.child(1).unwrap().value, Some(Value::Integer(1)));
    assert_eq!(step.child(0).unwrap().id, relation.child(0).unwrap().id);
    Ok(())
}

#[test]
fn test_for_downto_counts_down() -> PascalResult<()> {
    let source = "program f;\nvar i, n: integer;\nbegin\n  for i := 10 downto 1 do n := i\nend.\n";
    let (outcome, _) = parse(source)?;

    let loop_node = first_statement(&outcome).child(1).unwrap();
    assert_eq!(loop_node.child(0).unwrap().child(0).unwrap().kind, NodeKind::Lt);
    assert_eq!(loop_node.child(2).unwrap().child(1).unwrap().kind, NodeKind::Subtract);
    Ok(())
}

#[test]
fn test_for_control_must_be_ordinal() -> PascalResult<()> {
    let source = "program f;\nvar r: real;\nbegin\n  for r := 1 to 2 do\nend.\n";
    let (_, log) = parse(source)?;
    assert_eq!(log.borrow().count_errors("Incompatible types"), 1);
    Ok(())
}

#[test]
fn test_while_statement_shape() -> PascalResult<()> {
    let source = "program w;\nvar i: integer;\nbegin\n  while i > 0 do i := i - 1\nend.\n";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let loop_node = first_statement(&outcome);
    assert_eq!(loop_node.kind, NodeKind::Loop);
    assert_eq!(kinds(loop_node), vec![NodeKind::Test, NodeKind::Assign]);

    let not = loop_node.child(0).unwrap().child(0).unwrap();
    assert_eq!(not.kind, NodeKind::Not);
    assert_eq!(not.child(0).unwrap().kind, NodeKind::Gt);
    Ok(())
}

#[test]
fn test_repeat_statement_shape() -> PascalResult<()> {
    let source = "program r;\nvar i: integer;\nbegin\n  repeat i := i + 1; i := i * 2 until i > 100\nend.\n";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let loop_node = first_statement(&outcome);
    assert_eq!(kinds(loop_node), vec![NodeKind::Assign, NodeKind::Assign, NodeKind::Test]);
    assert_eq!(loop_node.child(2).unwrap().child(0).unwrap().kind, NodeKind::Gt);
    Ok(())
}

#[test]
fn test_condition_must_be_boolean() -> PascalResult<()> {
    let source = "program c;\nvar i: integer;\nbegin\n  if i then i := 0;\n  while i do i := 0\nend.\n";
    let (_, log) = parse(source)?;
    assert_eq!(
        log.borrow().syntax_errors(),
        vec![(4, "Incompatible types".to_string()), (5, "Incompatible types".to_string())]
    );
    Ok(())
}

#[test]
fn test_if_statement_shape() -> PascalResult<()> {
    let source = "program i;\nvar b: boolean; n: integer;\nbegin\n  if b then n := 1 else n := 2\nend.\n";
    let (outcome, _) = parse(source)?;
    let if_node = first_statement(&outcome);
    assert_eq!(if_node.kind, NodeKind::If);
    assert_eq!(kinds(if_node), vec![NodeKind::Variable, NodeKind::Assign, NodeKind::Assign]);
    Ok(())
}

#[test]
fn test_case_statement_shape() -> PascalResult<()> {
    let source = "\
program c;
var i, j: integer;
begin
  case i of
    1, 2: j := 1;
    -3: j := 2;
  end
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let select = first_statement(&outcome);
    assert_eq!(select.kind, NodeKind::Select);
    assert_eq!(kinds(select), vec![NodeKind::Variable, NodeKind::SelectBranch, NodeKind::SelectBranch]);

    let first = select.child(1).unwrap();
    assert_eq!(kinds(first), vec![NodeKind::SelectConstants, NodeKind::Assign]);
    let values: Vec<_> = first.child(0).unwrap().children.iter().map(|c| c.value.clone()).collect();
    assert_eq!(values, vec![Some(Value::Integer(1)), Some(Value::Integer(2))]);

    let second = select.child(2).unwrap().child(0).unwrap();
    assert_eq!(second.child(0).unwrap().value, Some(Value::Integer(-3)));
    Ok(())
}

#[test]
fn test_case_constant_reused() -> PascalResult<()> {
    let source = "\
program c;
var i, j: integer;
begin
  case i of
    1, 2: j := 1;
    2: j := 2
  end
end.
";
    let (_, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![(6, "CASE constant reused".to_string())]);
    Ok(())
}

#[test]
fn test_case_constants_must_match_selector() -> PascalResult<()> {
    let source = "\
program c;
var ch: char; j: integer;
begin
  case ch of
    'a': j := 1;
    5: j := 2;
    2.5: j := 3
  end
end.
";
    let (_, log) = parse(source)?;
    let log = log.borrow();
    assert_eq!(log.count_errors("Incompatible types"), 1);
    assert_eq!(log.count_errors("Invalid constant"), 1);
    Ok(())
}

#[test]
fn test_expression_types() -> PascalResult<()> {
    let source = "\
program e;
var i: integer; r: real; b: boolean;
begin
  r := 7 / 2;
  i := 7 div 2 + 3 mod 2;
  r := i * 1.5;
  b := (i < r) or not b;
  i := -i
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let body = program_body(&outcome);
    let division = body.child(0).unwrap().child(1).unwrap();
    assert_eq!(division.kind, NodeKind::FloatDivide);
    assert_eq!(division.type_id, Some(outcome.predefined.real_type));

    let negate = body.child(4).unwrap().child(1).unwrap();
    assert_eq!(negate.kind, NodeKind::Negate);
    assert_eq!(negate.type_id, Some(outcome.predefined.integer_type));
    Ok(())
}

#[test]
fn test_operator_type_errors() -> PascalResult<()> {
    let source = "\
program e;
var i: integer; r: real; b: boolean;
begin
  i := 7 / 2;
  i := r div 2;
  b := b + 1
end.
";
    let (_, log) = parse(source)?;
    let errors = log.borrow().syntax_errors();
    let lines: Vec<usize> = errors.iter().map(|(line, _)| *line).collect();
    assert!(errors.iter().all(|(_, message)| message == "Incompatible types"));
    assert_eq!(lines, vec![4, 5, 5, 6, 6]);
    Ok(())
}

#[test]
fn test_array_and_record_access() -> PascalResult<()> {
    let source = "\
program a;
type
  cell = record value: integer; next: integer end;
var
  grid: array [1..3, 1..4] of cell;
  k: integer;
begin
  grid[1, 2].value := 5;
  k := grid[2][3].next;
  k := grid[1, 2, 3].value;
  k := grid[1, 1].missing;
  k := grid[1].value
end.
";
    let (outcome, log) = parse(source)?;
    let log = log.borrow();
    assert_eq!(log.count_errors("Too many subscripts"), 1);
    assert_eq!(log.count_errors("Invalid field"), 2);

    let target = first_statement(&outcome).child(0).unwrap();
    assert_eq!(kinds(target), vec![NodeKind::Subscripts, NodeKind::Field]);
    assert_eq!(target.child(0).unwrap().children.len(), 2);
    assert_eq!(target.type_id, Some(outcome.predefined.integer_type));
    Ok(())
}

#[test]
fn test_declared_routine_calls_are_checked() -> PascalResult<()> {
    let source = "\
program p;
var i: integer; r: real;
function square(n: integer): integer;
begin
  square := n * n
end;
procedure bump(var target: integer);
begin
  target := target + 1
end;
begin
  i := square(1, 2);
  bump(3);
  bump(r);
  bump(i);
  i := square(i)
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(
        log.borrow().syntax_errors(),
        vec![
            (12, "Wrong number of actual parameters".to_string()),
            (13, "Invalid VAR parameter".to_string()),
            (14, "Invalid VAR parameter".to_string()),
        ]
    );

    let call = program_body(&outcome).child(3).unwrap();
    assert_eq!(call.kind, NodeKind::Call);
    assert_eq!(call.child(0).unwrap().kind, NodeKind::Parameters);
    Ok(())
}

#[test]
fn test_standard_routine_calls() -> PascalResult<()> {
    let source = "\
program p;
var i: integer; r: real; ch: char; b: boolean;
begin
  readln(i, ch);
  writeln('i = ', i:3, r:8:2);
  r := sqrt(i) + sin(r);
  i := round(r) + trunc(r) + ord(ch) + abs(i) + sqr(i);
  ch := chr(65);
  b := odd(i) or eof or eoln;
  i := succ(pred(i))
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let write = program_body(&outcome).child(1).unwrap();
    let parms = write.child(0).unwrap();
    assert_eq!(kinds(parms), vec![NodeKind::WriteParm, NodeKind::WriteParm, NodeKind::WriteParm]);
    assert_eq!(parms.child(2).unwrap().children.len(), 3);
    Ok(())
}

#[test]
fn test_standard_routine_errors() -> PascalResult<()> {
    let source = "\
program p;
var i: integer;
begin
  read(5);
  write;
  i := ord(1.5);
  i := abs(i, i)
end.
";
    let (_, log) = parse(source)?;
    let log = log.borrow();
    assert_eq!(log.count_errors("Invalid VAR parameter"), 1);
    assert_eq!(log.count_errors("Wrong number of actual parameters"), 2);
    assert_eq!(log.count_errors("Invalid type"), 1);
    Ok(())
}

#[test]
fn test_missing_semicolon_and_period() -> PascalResult<()> {
    let (_, log) = parse("program m;\nvar i, j: integer;\nbegin\n  i := 1\n  j := 2\nend\n")?;
    assert_eq!(
        log.borrow().syntax_errors(),
        vec![(5, "Missing ;".to_string()), (6, "Missing .".to_string())]
    );
    Ok(())
}

#[test]
fn test_missing_program_header() -> PascalResult<()> {
    let (outcome, log) = parse("begin\nend.\n")?;
    assert_eq!(log.borrow().count_errors("Missing PROGRAM"), 1);
    let program = outcome.symtab_stack.program_id().unwrap();
    assert_eq!(outcome.symtab_stack.entry(program).name, "dummyprogramname");
    Ok(())
}

#[test]
fn test_scanner_errors_are_flagged() -> PascalResult<()> {
    let (_, log) = parse("program s;\nvar i: integer;\nbegin\n  i := 99999999999999999999 @\nend.\n")?;
    let log = log.borrow();
    assert_eq!(log.count_errors("Integer literal out of range"), 1);
    assert_eq!(log.count_errors("Invalid character"), 1);
    Ok(())
}

#[test]
fn test_too_many_errors_stops_translation() {
    let mut source = String::from("program t;\nbegin\n");
    for n in 0..30 {
        source.push_str(&format!("  undefined{} := 1;\n", n));
    }
    source.push_str("end.\n");

    let mut backend = RecordingBackend::default();
    let result = translate(&source, &mut backend, Options::default(), MessageHandler::new());
    assert!(matches!(result, Err(PascalError::TooManyErrors { count: 26, .. })));
    assert_eq!(backend.calls, 0);
}

#[test]
fn test_backend_runs_only_without_errors() -> PascalResult<()> {
    let mut backend = RecordingBackend::default();
    let translation = translate(FULL_PROGRAM, &mut backend, Options::default(), MessageHandler::new())?;
    assert!(translation.backend_invoked);
    assert_eq!(backend.calls, 1);

    let mut backend = RecordingBackend::default();
    let translation = translate("program x;\nbegin\n  y := 1\nend.\n", &mut backend, Options::default(), MessageHandler::new())?;
    assert_eq!(translation.error_count(), 2);
    assert!(!translation.backend_invoked);
    assert_eq!(backend.calls, 0);
    Ok(())
}

#[test]
fn test_token_tracing() -> PascalResult<()> {
    use pascalfe::message::Message;

    let log = Rc::new(RefCell::new(MessageLog::new()));
    let mut messages = MessageHandler::new();
    messages.add_listener(log.clone());
    let options = Options { trace_tokens: true };
    parse_source("program t;\nbegin\nend.\n", options, messages)?;

    let tokens = log
        .borrow()
        .messages
        .iter()
        .filter(|message| matches!(message, Message::Token { .. }))
        .count();
    assert_eq!(tokens, 6);
    Ok(())
}

#[test]
fn test_array_size_overflow_is_flagged() -> PascalResult<()> {
    let source = "program p;\nvar a: array [0..9223372036854775807] of integer;\nbegin\nend.\n";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![(2, "Integer literal out of range".to_string())]);

    let array = outcome.symtab_stack.entry(lookup_in_program(&outcome, "a")).type_id.unwrap();
    match &outcome.symtab_stack.type_spec(array).form {
        TypeForm::Array { element_count, .. } => assert_eq!(*element_count, 0),
        other => panic!("a has form {}", other),
    }
    Ok(())
}

#[test]
fn test_subrange_bounds_from_different_enumerations() -> PascalResult<()> {
    let source = "program s;\ntype\n  a = (r, g);\n  b = (x, y);\n  mixed = r..y;\nbegin\nend.\n";
    let (_, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![(5, "Invalid subrange type".to_string())]);
    Ok(())
}

#[test]
fn test_unbounded_index_type() -> PascalResult<()> {
    let (_, log) = parse("program s;\nvar a: array [integer] of char;\nbegin\nend.\n")?;
    assert_eq!(log.borrow().syntax_errors(), vec![(2, "Invalid index type".to_string())]);
    Ok(())
}

#[test]
fn test_subscript_must_fit_index_type() -> PascalResult<()> {
    let source = "\
program s;
var v: array [1..3] of integer;
    r: real;
begin
  v[2] := 1;
  v[r] := 1
end.
";
    let (_, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![(6, "Invalid index type".to_string())]);
    Ok(())
}

#[test]
fn test_forward_header_repeated_in_full() -> PascalResult<()> {
    let source = "\
program fwd;
var total: integer;
procedure add(x: integer); forward;
procedure add(x: integer);
begin
  total := total + x
end;
begin
  add(2)
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let add = lookup_in_program(&outcome, "add");
    assert_eq!(outcome.symtab_stack.entry(add).parms().len(), 1);
    assert!(routine_icode(&outcome, add).is_some());
    Ok(())
}

#[test]
fn test_redefinition_keeps_first_declaration() -> PascalResult<()> {
    let (outcome, _) = parse("program r;\nvar x: integer;\n    x: real;\nbegin\nend.\n")?;
    let x = outcome.symtab_stack.entry(lookup_in_program(&outcome, "x"));
    assert_eq!(x.type_id, Some(outcome.predefined.integer_type));
    assert_eq!(x.line_numbers, vec![2]);
    Ok(())
}

#[test]
fn test_program_parameters_cannot_be_var() -> PascalResult<()> {
    let (_, log) = parse("program p(var input);\nbegin\nend.\n")?;
    assert_eq!(log.borrow().syntax_errors(), vec![(1, "Invalid VAR parameter".to_string())]);
    Ok(())
}

#[test]
fn test_empty_argument_lists() -> PascalResult<()> {
    let source = "\
program p;
procedure tick;
begin
end;
begin
  writeln();
  readln();
  write();
  tick()
end.
";
    let (_, log) = parse(source)?;
    assert_eq!(
        log.borrow().syntax_errors(),
        vec![
            (8, "Wrong number of actual parameters".to_string()),
            (9, "Wrong number of actual parameters".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_for_over_enumeration_steps_in_its_type() -> PascalResult<()> {
    let source = "\
program f;
type color = (red, green, blue);
var c: color;
begin
  for c := red to blue do
end.
";
    let (outcome, log) = parse(source)?;
    assert_eq!(log.borrow().syntax_errors(), vec![]);

    let color = outcome.symtab_stack.entry(lookup_in_program(&outcome, "color")).type_id;
    let step = first_statement(&outcome).child(1).unwrap().child(2).unwrap();
    assert_eq!(step.type_id, color);
    let increment = step.child(1).unwrap();
    assert_eq!(increment.kind, NodeKind::Add);
    assert_eq!(increment.type_id, color);
    Ok(())
}

#[test]
fn test_interpreter_counts_statements() -> PascalResult<()> {
    use pascalfe::backend::Executor;
    use pascalfe::message::Message;

    let log = Rc::new(RefCell::new(MessageLog::new()));
    let mut messages = MessageHandler::new();
    messages.add_listener(log.clone());
    let mut executor = Executor::new(messages.clone());

    let source = "program b;\nvar i: integer;\nbegin\n  i := 1;\n  if i > 0 then i := 2\nend.\n";
    let translation = translate(source, &mut executor, Options::default(), messages)?;
    assert!(translation.backend_invoked);

    let counts: Vec<usize> = log
        .borrow()
        .messages
        .iter()
        .filter_map(|message| match message {
            Message::InterpreterSummary { execution_count, .. } => Some(*execution_count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![4]);
    Ok(())
}
