//! Unit rewriting. [`spill`] turns a failed coloring's spilled registers
//! into loads and stores through frame slots, still in symbolic form, so the
//! allocator can try again. [`apply`] commits a spill-free coloring, mapping
//! every symbolic register to its physical one and preserving caller-saved
//! registers around calls.


use std::collections::HashMap;

use log::info;

use rook_common::config::AllocConfig;
use rook_common::ir::{
    Instruction, Opcode, Operand, PhysReg, Reg, SymReg, Unit,
};

use crate::color::{Assignment, Coloring};
use crate::liveness::Liveness;

/// Rewrite every access to a spilled register through its slot. Each access
/// goes through a fresh unspillable temporary whose live range covers a
/// single instruction, so the rewritten unit is strictly easier to color.
pub fn spill(unit: &Unit, coloring: &Coloring) -> Unit {
    let mut registers = unit.registers.clone();
    let mut rewriter = Rewriter::new(unit);

    for instruction in unit.instructions.iter() {
        rewriter.open_group();

        // One temporary per spilled register per instruction. Read-modify-
        // write opcodes reuse the same temporary for the load and the store.
        let mut temps: HashMap<SymReg, SymReg> = HashMap::new();

        let mut loads: Vec<SymReg> = instruction
            .uses()
            .into_iter()
            .filter_map(|reg| reg.sym())
            .filter(|reg| is_spilled(coloring, *reg))
            .collect();
        loads.sort_unstable();
        loads.dedup();

        for reg in loads {
            let temp = *temps
                .entry(reg)
                .or_insert_with(|| registers.temp(reg.class, instruction.span));

            rewriter.push(Instruction::new(
                Opcode::Load,
                vec![
                    Operand::Reg(Reg::Symbolic(temp)),
                    Operand::Slot(slot_of(coloring, reg)),
                ],
                instruction.span,
            ));
        }

        let store = instruction
            .def()
            .and_then(|reg| reg.sym())
            .filter(|reg| is_spilled(coloring, *reg))
            .map(|reg| {
                let temp = *temps
                    .entry(reg)
                    .or_insert_with(|| registers.temp(reg.class, instruction.span));
                (temp, slot_of(coloring, reg))
            });

        let operands = instruction
            .operands
            .iter()
            .map(|operand| match operand {
                Operand::Reg(Reg::Symbolic(reg)) => match temps.get(reg) {
                    Some(temp) => Operand::Reg(Reg::Symbolic(*temp)),
                    None => operand.clone(),
                },
                _ => operand.clone(),
            })
            .collect();

        rewriter.push(Instruction::new(instruction.opcode, operands, instruction.span));

        if let Some((temp, slot)) = store {
            rewriter.push(Instruction::new(
                Opcode::Store,
                vec![Operand::Reg(Reg::Symbolic(temp)), Operand::Slot(slot)],
                instruction.span,
            ));
        }
    }

    info!(
        "spill rewrite: {} -> {} instructions",
        unit.instructions.len(),
        rewriter.len()
    );

    rewriter.finish(unit, registers)
}

/// Commit a spill-free coloring. Every symbolic register becomes physical,
/// and caller-saved physical registers that are live across a call are
/// stored before it and reloaded after it. Returns the rewritten unit and
/// the unit's total slot count.
pub fn apply(
    unit: &Unit,
    coloring: &Coloring,
    liveness: &Liveness,
    config: &AllocConfig,
) -> (Unit, usize) {
    let mut rewriter = Rewriter::new(unit);

    // Each preserved physical register keeps one dedicated slot for the
    // whole unit, handed out past the spill slots already in use.
    let mut next_slot = coloring.next_slot;
    let mut preserve_slots: HashMap<PhysReg, usize> = HashMap::new();

    for (index, instruction) in unit.instructions.iter().enumerate() {
        rewriter.open_group();

        let preserved = if instruction.is_call() {
            let mut live: Vec<PhysReg> = liveness.insn_out[index]
                .iter()
                .filter(|reg| config.is_caller_saved(reg.class))
                .map(|reg| phys_of(coloring, *reg))
                .collect();
            live.sort_unstable();
            live.dedup();

            for phys in live.iter() {
                let slot = *preserve_slots.entry(*phys).or_insert_with(|| {
                    let slot = next_slot;
                    next_slot += 1;
                    slot
                });

                rewriter.push(Instruction::new(
                    Opcode::Store,
                    vec![Operand::Reg(Reg::Physical(*phys)), Operand::Slot(slot)],
                    instruction.span,
                ));
            }

            live
        } else {
            Vec::new()
        };

        let operands = instruction
            .operands
            .iter()
            .map(|operand| match operand {
                Operand::Reg(Reg::Symbolic(reg)) => {
                    Operand::Reg(Reg::Physical(phys_of(coloring, *reg)))
                }
                _ => operand.clone(),
            })
            .collect();

        rewriter.push(Instruction::new(instruction.opcode, operands, instruction.span));

        for phys in preserved {
            rewriter.push(Instruction::new(
                Opcode::Load,
                vec![
                    Operand::Reg(Reg::Physical(phys)),
                    Operand::Slot(preserve_slots[&phys]),
                ],
                instruction.span,
            ));
        }
    }

    let unit = rewriter.finish(unit, unit.registers.clone());
    (unit, next_slot)
}

fn is_spilled(coloring: &Coloring, reg: SymReg) -> bool {
    matches!(
        coloring.assignment.get(&reg),
        Some(Assignment::Spill(_))
    )
}

fn slot_of(coloring: &Coloring, reg: SymReg) -> usize {
    match coloring.get(reg) {
        Assignment::Spill(slot) => slot,
        Assignment::Reg(_) => unreachable!("slot lookup for colored register"),
    }
}

fn phys_of(coloring: &Coloring, reg: SymReg) -> PhysReg {
    match coloring.get(reg) {
        Assignment::Reg(phys) => phys,
        Assignment::Spill(_) => unreachable!("coloring applied with live spills"),
    }
}

/// Accumulates rewritten instructions while tracking where each original
/// instruction's group starts, so labels can follow their instruction. A
/// label lands on the start of the group, ahead of any inserted loads or
/// stores, which keeps branch entries loading what they need.
struct Rewriter {
    instructions: Vec<Instruction>,
    starts: Vec<usize>,
}

impl Rewriter {
    fn new(unit: &Unit) -> Self {
        Self {
            instructions: Vec::with_capacity(unit.instructions.len()),
            starts: Vec::with_capacity(unit.instructions.len()),
        }
    }

    fn open_group(&mut self) {
        self.starts.push(self.instructions.len());
    }

    fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn len(&self) -> usize {
        self.instructions.len()
    }

    fn finish(self, unit: &Unit, registers: rook_common::ir::RegisterTable) -> Unit {
        let mut labels = unit.labels.clone();

        for (id, info) in unit.labels.iter() {
            // An end-of-unit label stays at the end.
            let target = match self.starts.get(info.target) {
                Some(start) => *start,
                None => self.instructions.len(),
            };

            labels.retarget(id, target);
        }

        Unit {
            kind: unit.kind,
            span: unit.span,
            instructions: self.instructions,
            labels,
            registers,
        }
    }
}
