use rook_common::config::AllocConfig;
use rook_common::ir::{
    Opcode, Operand, Program, Reg, RegClass, SymReg, UnitKind,
};
use rook_common::names::Names;

use super::resolve;
use crate::testing::TestDriver;

fn run(source: &str) -> (Program, Vec<String>) {
    let mut driver = TestDriver::default();
    let mut names = Names::new();

    let tokens = crate::lex::lex(&mut driver, source, 0);
    let stmts = crate::parse::parse(&mut driver, tokens, 0);
    let stmts = crate::expand::expand(&mut driver, stmts, &AllocConfig::default());

    assert!(driver.msgs.msgs.is_empty(), "{:?}", driver.codes());

    let program = resolve(&mut driver, &mut names, stmts, 0);
    (program, driver.codes())
}

fn check(source: &str) -> Program {
    let (program, codes) = run(source);
    assert!(codes.is_empty(), "{codes:?}");
    program
}

fn sym(class: RegClass, index: usize) -> Operand {
    Operand::Reg(Reg::Symbolic(SymReg { class, index }))
}

#[test]
fn resolve_toplevel_comes_first() {
    let program = check(".sub helper\nret\n.end\nset $I0, 1\nend");

    assert_eq!(2, program.units.len());
    assert_eq!(UnitKind::TopLevel, program.units[0].kind);
    assert!(matches!(program.units[1].kind, UnitKind::Sub(_)));
}

#[test]
fn resolve_dense_indices_by_first_appearance() {
    // $I7 appears first, so it gets index 0; the numbering in the source
    // does not matter.
    let program = check("set $I7, 1\nset $I2, 2\nadd $I7, $I7, $I2\nend");
    let unit = &program.units[0];

    assert_eq!(2, unit.registers.count(RegClass::Int));
    assert_eq!(vec![sym(RegClass::Int, 0), Operand::Int(1)], unit.instructions[0].operands);
    assert_eq!(vec![sym(RegClass::Int, 1), Operand::Int(2)], unit.instructions[1].operands);
}

#[test]
fn resolve_named_and_numbered_interleave() {
    let source = "\
.local int counter
set $I0, 1
set counter, 2
add counter, counter, $I0
end";

    let program = check(source);
    let unit = &program.units[0];

    // `counter` is declared before $I0 is first used, so it takes index 0.
    assert_eq!(2, unit.registers.count(RegClass::Int));
    assert_eq!(vec![sym(RegClass::Int, 1), Operand::Int(1)], unit.instructions[0].operands);
    assert_eq!(vec![sym(RegClass::Int, 0), Operand::Int(2)], unit.instructions[1].operands);
}

#[test]
fn resolve_classes_are_separate() {
    let program = check("set $I0, 1\nset $N0, 1.5\nset $S0, \"x\"\nend");
    let unit = &program.units[0];

    assert_eq!(1, unit.registers.count(RegClass::Int));
    assert_eq!(1, unit.registers.count(RegClass::Num));
    assert_eq!(1, unit.registers.count(RegClass::Str));
    assert_eq!(0, unit.registers.count(RegClass::Obj));
}

#[test]
fn resolve_labels() {
    let program = check("goto skip\ninc $I0\nskip:\nend");
    let unit = &program.units[0];

    assert_eq!(1, unit.labels.len());
    let (id, info) = unit.labels.iter().next().unwrap();
    assert_eq!("skip", info.name);
    assert_eq!(2, info.target);
    assert_eq!(vec![Operand::Label(id)], unit.instructions[0].operands);
}

#[test]
fn resolve_end_of_unit_label() {
    // A label after the last instruction is legal and points past the end.
    let program = check("goto done\ndone:");
    let unit = &program.units[0];

    assert_eq!(1, unit.labels.target(unit.labels.iter().next().unwrap().0));
    assert_eq!(1, unit.instructions.len());
}

#[test]
fn resolve_undefined_label() {
    let (program, codes) = run("goto nowhere\nend");

    assert!(program.units.is_empty());
    assert_eq!(vec!["ES00".to_string()], codes);
}

#[test]
fn resolve_duplicate_label() {
    let (_, codes) = run("here:\ninc $I0\nhere:\nend");
    assert_eq!(vec!["ES01".to_string()], codes);
}

#[test]
fn resolve_declaration_class_mismatch() {
    let (_, codes) = run(".local int x\n.local num x\nset x, 1\nend");
    assert_eq!(vec!["ES02".to_string()], codes);
}

#[test]
fn resolve_duplicate_declaration() {
    let (_, codes) = run(".local int x\n.local int x\nset x, 1\nend");
    assert_eq!(vec!["ES03".to_string()], codes);
}

#[test]
fn resolve_operand_class_mismatch() {
    let (_, codes) = run("set $I0, \"text\"\nend");
    assert_eq!(vec!["ES04".to_string()], codes);
}

#[test]
fn resolve_logic_wants_int() {
    let (_, codes) = run("and $N0, $N1, $N2\nend");
    assert_eq!(vec!["ES04".to_string()], codes);
}

#[test]
fn resolve_int_literal_widens_to_num() {
    check("set $N0, 3\nadd $N0, $N0, 1\nend");
}

#[test]
fn resolve_physical_outside_emit() {
    let (program, codes) = run("set I0, 1\nend");

    assert!(program.units.is_empty());
    assert_eq!(vec!["ES05".to_string()], codes);
}

#[test]
fn resolve_symbolic_inside_emit() {
    let (_, codes) = run(".emit\nset $I0, 1\n.eom");
    assert_eq!(vec!["ES06".to_string()], codes);
}

#[test]
fn resolve_emit_passes_physical_registers() {
    let program = check(".emit\nset I0, 1\nadd I1, I0, 2\n.eom");
    let unit = &program.units[0];

    assert!(unit.is_emit());
    assert_eq!(2, unit.instructions.len());
    assert!(matches!(
        unit.instructions[0].operands[0],
        Operand::Reg(Reg::Physical(_))
    ));
}

#[test]
fn resolve_undefined_register() {
    let (_, codes) = run("set mystery, 1\nend");
    assert_eq!(vec!["ES07".to_string()], codes);
}

#[test]
fn resolve_directive_inside_emit() {
    let (_, codes) = run(".emit\n.local int x\n.eom");
    assert_eq!(vec!["ES08".to_string()], codes);
}

#[test]
fn resolve_stray_end() {
    let (_, codes) = run(".end");
    assert_eq!(vec!["ES09".to_string()], codes);
}

#[test]
fn resolve_unclosed_sub() {
    let (_, codes) = run(".sub broken\nret");
    assert_eq!(vec!["ES09".to_string()], codes);
}

#[test]
fn resolve_globals_span_units() {
    let source = "\
.global int shared
.sub reader
set $I0, shared
ret
.end
set shared, 1
end";

    let program = check(source);

    assert_eq!(2, program.units.len());

    // Each unit sees `shared` as its own symbolic register.
    for unit in &program.units {
        assert!(unit.registers.count(RegClass::Int) >= 1);
    }
}

#[test]
fn resolve_globals_declared_by_macros() {
    // The declaration only exists once the macro is expanded; resolution
    // sees plain statements, never macro bodies.
    let source = "\
.macro declare()
.global int shared
.endm
.declare()
.sub reader
set $I0, shared
ret
.end
set shared, 1
end";

    let program = check(source);

    assert_eq!(2, program.units.len());
    for unit in &program.units {
        assert!(unit.registers.count(RegClass::Int) >= 1);
    }
}

#[test]
fn resolve_failed_unit_is_dropped_whole() {
    let source = "\
.sub bad
goto nowhere
.end
.sub good
ret
.end";

    let (program, codes) = run(source);

    // The broken unit vanishes entirely; the good one survives.
    assert_eq!(1, program.units.len());
    assert!(matches!(program.units[0].kind, UnitKind::Sub(_)));
    assert_eq!(vec!["ES00".to_string()], codes);
}

#[test]
fn resolve_subs_in_namespaces() {
    let source = "\
.namespace math
.sub square
.param int x
mul x, x, x
.return x
.end";

    let program = check(source);
    assert_eq!(1, program.units.len());

    let unit = &program.units[0];
    assert!(matches!(unit.kind, UnitKind::Sub(_)));
    assert!(unit.registers.get(SymReg { class: RegClass::Int, index: 0 }).param);
}
