//! Register allocation over resolved units. Units are independent, so they
//! allocate in parallel; results and diagnostics come back in unit order.

pub mod cfg;
pub mod color;
pub mod interfere;
pub mod liveness;
pub mod rewrite;

#[cfg(test)]
mod testing;


use log::info;
use rayon::prelude::*;

use rook_common::config::AllocConfig;
use rook_common::ir::{Program, Unit, UnitMeta};
use rook_common::message::Messages;
use rook_common::Driver;

#[derive(Debug)]
pub struct AllocatedUnit {
    pub unit: Unit,
    pub meta: UnitMeta,
}

#[derive(Debug, Default)]
pub struct AllocatedProgram {
    pub units: Vec<AllocatedUnit>,
}

impl AllocatedProgram {
    /// A plain program view, for printing.
    pub fn to_program(&self) -> Program {
        Program {
            units: self
                .units
                .iter()
                .map(|allocated| allocated.unit.clone())
                .collect(),
        }
    }
}

/// Allocate every unit in the program. Units that fail are dropped whole;
/// their diagnostics are reported and the rest of the program survives.
pub fn allocate_program(
    driver: &mut impl Driver,
    config: &AllocConfig,
    program: Program,
) -> AllocatedProgram {
    let results: Vec<(Option<(Unit, usize)>, Messages)> = program
        .units
        .into_par_iter()
        .map(|unit| allocate_unit(unit, config))
        .collect();

    let mut msgs = Messages::new();
    let mut units = Vec::new();
    let mut entry = 0;

    for (result, unit_msgs) in results {
        msgs.merge(unit_msgs);

        if let Some((unit, spill_slots)) = result {
            let meta = UnitMeta {
                entry,
                locals: unit.registers.num_named(),
                spill_slots,
            };

            entry += unit.instructions.len();
            units.push(AllocatedUnit { unit, meta });
        }
    }

    driver.report(msgs);

    AllocatedProgram { units }
}

/// One unit through the allocation loop: build the CFG, analyze, color, and
/// either commit the coloring or rewrite the spills and go again. The loop
/// terminates because spill temporaries are unspillable and live for a
/// single instruction each.
fn allocate_unit(unit: Unit, config: &AllocConfig) -> (Option<(Unit, usize)>, Messages) {
    let mut msgs = Messages::new();

    // Emit units carry physical registers already and pass through.
    if unit.is_emit() {
        return (Some((unit, 0)), msgs);
    }

    let mut unit = unit;
    let mut base_slot = 0;
    let mut round = 0;

    loop {
        let (cfg, cfg_msgs) = cfg::build(&unit, config);

        // Rewriting never changes reachability, so only the first round's
        // dead-code warnings are worth keeping.
        if round == 0 {
            msgs.merge(cfg_msgs);
        }

        let liveness = liveness::analyze(&cfg, &unit);
        let graphs = interfere::build(&liveness, &unit);

        let (coloring, color_msgs) = color::color(&unit, &graphs, &liveness, config, base_slot);
        msgs.merge(color_msgs);

        let coloring = match coloring {
            Some(coloring) => coloring,
            None => return (None, msgs),
        };

        if coloring.spilled.is_empty() {
            info!("unit allocated after {} spill rounds", round);
            let (unit, spill_slots) = rewrite::apply(&unit, &coloring, &liveness, config);
            return (Some((unit, spill_slots)), msgs);
        }

        base_slot = coloring.next_slot;
        unit = rewrite::spill(&unit, &coloring);
        round += 1;
    }
}
