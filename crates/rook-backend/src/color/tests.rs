use rook_common::config::AllocConfig;
use rook_common::ir::{RegClass, SymReg, Unit};
use rook_common::message::Messages;

use super::{color, Assignment, Coloring};
use crate::testing::{budget, unit};
use crate::{cfg, interfere, liveness};

fn reg(index: usize) -> SymReg {
    SymReg {
        class: RegClass::Int,
        index,
    }
}

fn run(unit: &Unit, config: &AllocConfig, base_slot: usize) -> (Option<Coloring>, Messages) {
    let (cfg, _) = cfg::build(unit, config);
    let live = liveness::analyze(&cfg, unit);
    let graphs = interfere::build(&live, unit);
    color(unit, &graphs, &live, config, base_slot)
}

#[test]
fn interfering_registers_get_distinct_colors() {
    let source = "\
set $I0, 1
set $I1, 2
add $I2, $I0, $I1
print $I2
end";

    let unit = unit(source);
    let (coloring, msgs) = run(&unit, &budget(4), 0);

    assert!(msgs.msgs.is_empty());
    let coloring = coloring.unwrap();
    assert!(coloring.spilled.is_empty());

    let phys = |index| match coloring.get(reg(index)) {
        Assignment::Reg(phys) => phys,
        Assignment::Spill(_) => panic!("unexpected spill"),
    };

    assert_ne!(phys(0), phys(1));
}

#[test]
fn tight_budget_spills_by_declaration_order() {
    // Three mutually live registers with identical use densities; the
    // tie-break picks the lowest index.
    let source = "\
set $I0, 1
set $I1, 2
set $I2, 3
print $I0
print $I1
print $I2
end";

    let unit = unit(source);
    let (coloring, msgs) = run(&unit, &budget(2), 0);

    assert!(msgs.msgs.is_empty());
    let coloring = coloring.unwrap();

    assert_eq!(vec![reg(0)], coloring.spilled);
    assert_eq!(Assignment::Spill(0), coloring.get(reg(0)));
    assert_eq!(1, coloring.next_slot);
}

#[test]
fn spill_prefers_low_use_density() {
    // $I2 is used once over a long range; the busy $I0 and $I1 stay in
    // registers.
    let source = "\
set $I0, 1
set $I1, 2
set $I2, 3
add $I0, $I0, $I1
add $I0, $I0, $I1
add $I0, $I0, $I1
print $I0
print $I1
print $I2
end";

    let unit = unit(source);
    let (coloring, _) = run(&unit, &budget(2), 0);
    let coloring = coloring.unwrap();

    assert_eq!(vec![reg(2)], coloring.spilled);
}

#[test]
fn slots_continue_from_the_base() {
    let source = "\
set $I0, 1
set $I1, 2
set $I2, 3
print $I0
print $I1
print $I2
end";

    let unit = unit(source);
    let (coloring, _) = run(&unit, &budget(2), 5);
    let coloring = coloring.unwrap();

    assert_eq!(Assignment::Spill(5), coloring.get(reg(0)));
    assert_eq!(6, coloring.next_slot);
}

#[test]
fn zero_budget_with_registers_fails() {
    let unit = unit("set $I0, 1\nend");
    let (coloring, msgs) = run(&unit, &budget(0), 0);

    assert!(coloring.is_none());
    assert_eq!(1, msgs.num_errors());
    assert_eq!(Some("EA00".to_string()), msgs.msgs[0].code);
}

#[test]
fn zero_budget_without_registers_is_fine() {
    // No num registers are used, so the zero num budget never matters.
    let unit = unit("set $I0, 1\nprint $I0\nend");

    let config = AllocConfig {
        budgets: [4, 0, 4, 4],
        ..AllocConfig::default()
    };

    let (coloring, msgs) = run(&unit, &config, 0);

    assert!(msgs.msgs.is_empty());
    assert!(coloring.unwrap().spilled.is_empty());
}

#[test]
fn three_operand_instruction_colors_at_budget_two() {
    // Both sources die at the add, so the destination can share a color
    // with one of them; nothing spills.
    let unit = unit("add $I0, $I1, $I2\nprint $I0\nend");
    let (coloring, msgs) = run(&unit, &budget(2), 0);

    assert!(msgs.msgs.is_empty(), "{:?}", msgs.msgs);
    let coloring = coloring.unwrap();
    assert!(coloring.spilled.is_empty());

    let phys = |index| match coloring.get(reg(index)) {
        Assignment::Reg(phys) => phys,
        Assignment::Spill(_) => panic!("unexpected spill"),
    };

    assert_ne!(phys(1), phys(2));
}

#[test]
fn coloring_is_deterministic() {
    let source = "\
set $I0, 1
set $I1, 2
set $I2, 3
set $I3, 4
add $I4, $I0, $I1
add $I4, $I4, $I2
add $I4, $I4, $I3
print $I4
end";

    let unit = unit(source);

    let (first, _) = run(&unit, &budget(3), 0);
    let (second, _) = run(&unit, &budget(3), 0);

    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.spilled, second.spilled);
}
