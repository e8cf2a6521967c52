use rook_common::config::AllocConfig;
use rook_common::ir::{RegClass, SymReg};

use super::analyze;
use crate::cfg;
use crate::testing::unit;

fn reg(class: RegClass, index: usize) -> SymReg {
    SymReg { class, index }
}

#[test]
fn straight_line_ranges() {
    let source = "\
set $I0, 1
set $I1, 2
add $I2, $I0, $I1
print $I2
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    let i0 = reg(RegClass::Int, 0);
    let i1 = reg(RegClass::Int, 1);
    let i2 = reg(RegClass::Int, 2);

    // $I0 lives from its def to the add; $I2 from the add to the print.
    assert!(live.insn_out[0].contains(&i0));
    assert!(live.insn_out[1].contains(&i0));
    assert!(!live.insn_out[2].contains(&i0));

    assert!(!live.insn_out[0].contains(&i1));
    assert!(live.insn_out[1].contains(&i1));

    assert!(live.insn_out[2].contains(&i2));
    assert!(!live.insn_out[3].contains(&i2));
}

#[test]
fn loop_carries_liveness_backward() {
    let source = "\
set $I0, 10
loop:
  dec $I0
  if $I0 goto loop
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    let i0 = reg(RegClass::Int, 0);

    // The backedge keeps $I0 live at the loop head and through the branch.
    let body = cfg
        .ids()
        .find(|block| cfg.get(*block).range.contains(&1))
        .unwrap();

    assert!(live.block_in[&body].contains(&i0));
    assert!(live.block_out[&body].contains(&i0));
    assert!(live.insn_out[2].contains(&i0));
}

#[test]
fn dead_def_is_not_live() {
    let source = "\
set $I0, 1
set $I1, 2
print $I1
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    let i0 = reg(RegClass::Int, 0);
    assert!(live.insn_out.iter().all(|out| !out.contains(&i0)));
}

#[test]
fn branches_merge_facts() {
    let source = "\
set $I0, 1
set $I1, 2
if $I0 goto other
print $I0
end
other:
print $I1
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    let i0 = reg(RegClass::Int, 0);
    let i1 = reg(RegClass::Int, 1);

    // Both arms' needs are live out of the branch.
    assert!(live.insn_out[2].contains(&i0));
    assert!(live.insn_out[2].contains(&i1));
}

#[test]
fn values_stay_live_across_calls() {
    let source = "\
.sub caller
set $I0, 7
.arg $I0
call helper
.result $I1
add $I2, $I0, $I1
.return $I2
.end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    let i0 = reg(RegClass::Int, 0);

    // $I0 is read after the call, so it is live out of it.
    assert!(live.insn_out[2].contains(&i0));
}

#[test]
fn analysis_is_idempotent() {
    let source = "\
set $I0, 3
top:
  dec $I0
  if $I0 > $I1 goto top
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());

    assert_eq!(analyze(&cfg, &unit), analyze(&cfg, &unit));
}

#[test]
fn range_len_counts_boundaries() {
    let source = "\
set $I0, 1
inc $I0
print $I0
end";

    let unit = unit(source);
    let (cfg, _) = cfg::build(&unit, &AllocConfig::default());
    let live = analyze(&cfg, &unit);

    // Live out of the set and the inc, dead after the print.
    assert_eq!(2, live.range_len(reg(RegClass::Int, 0)));

    // Never-live registers still report a nonzero range.
    assert_eq!(1, live.range_len(reg(RegClass::Int, 7)));
}
