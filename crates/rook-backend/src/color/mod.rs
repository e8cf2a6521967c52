//! Graph coloring by simplify/select with optimistic spilling. Each class is
//! colored independently against its own budget.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use log::{info, trace};

use rook_common::config::{AllocConfig, TieBreak};
use rook_common::ir::{PhysReg, Reg, SymReg, Unit};
use rook_common::message::Messages;

use crate::interfere::{ClassGraphs, Graph};
use crate::liveness::Liveness;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Assignment {
    Reg(PhysReg),
    Spill(usize),
}

#[derive(Debug)]
pub struct Coloring {
    pub assignment: HashMap<SymReg, Assignment>,
    /// Registers that must be rewritten through memory, in ascending
    /// declaration order.
    pub spilled: Vec<SymReg>,
    /// First slot index not taken by this coloring.
    pub next_slot: usize,
}

impl Coloring {
    pub fn get(&self, reg: SymReg) -> Assignment {
        self.assignment[&reg]
    }
}

/// Color every register in the unit. Slots for spilled registers start at
/// `base_slot`, so repeated rounds over the same unit never reuse a slot.
pub fn color(
    unit: &Unit,
    graphs: &ClassGraphs,
    liveness: &Liveness,
    config: &AllocConfig,
    base_slot: usize,
) -> (Option<Coloring>, Messages) {
    let mut msgs = Messages::new();

    // A class the unit uses at all needs at least one register before any
    // finer check is worth making.
    for graph in graphs.iter() {
        if config.budget(graph.class) == 0 && !graph.is_empty() {
            msgs.at(unit.span).alloc_zero_budget(graph.class);
            return (None, msgs);
        }
    }

    let uses = count_uses(unit);

    let mut assignment = HashMap::new();
    let mut spilled = Vec::new();

    for graph in graphs.iter() {
        let budget = config.budget(graph.class);

        if graph.is_empty() {
            continue;
        }

        let colorer = Colorer {
            unit,
            graph,
            liveness,
            uses: &uses,
            budget,
            tie_break: config.tie_break,
        };

        let colors = match colorer.run(&mut msgs) {
            Some(colors) => colors,
            None => return (None, msgs),
        };

        for (index, color) in colors {
            let reg = SymReg {
                class: graph.class,
                index,
            };

            match color {
                Some(color) => {
                    assignment.insert(
                        reg,
                        Assignment::Reg(PhysReg {
                            class: graph.class,
                            index: color,
                        }),
                    );
                }

                None => spilled.push(reg),
            }
        }
    }

    // Slot numbering follows declaration order, classes in `RegClass::ALL`
    // order. `SymReg`'s derived ordering is exactly that.
    spilled.sort_unstable();

    let mut next_slot = base_slot;
    for reg in spilled.iter() {
        assignment.insert(*reg, Assignment::Spill(next_slot));
        next_slot += 1;
    }

    if spilled.is_empty() {
        info!("coloring complete, no spills");
    } else {
        info!("coloring spilled {} registers", spilled.len());
    }

    (
        Some(Coloring {
            assignment,
            spilled,
            next_slot,
        }),
        msgs,
    )
}

/// Occurrence counts per register, defs included. Divided by the live range
/// length this approximates the memory traffic a spill would add.
fn count_uses(unit: &Unit) -> HashMap<SymReg, usize> {
    let mut uses: HashMap<SymReg, usize> = HashMap::new();

    for instruction in unit.instructions.iter() {
        for reg in instruction.uses().into_iter().chain(instruction.def()) {
            if let Reg::Symbolic(reg) = reg {
                *uses.entry(reg).or_default() += 1;
            }
        }
    }

    uses
}

struct Colorer<'a> {
    unit: &'a Unit,
    graph: &'a Graph,
    liveness: &'a Liveness,
    uses: &'a HashMap<SymReg, usize>,
    budget: usize,
    tie_break: TieBreak,
}

impl<'a> Colorer<'a> {
    /// Simplify then select. The result maps every node to its color, or to
    /// `None` if it spills. A `None` result means the class cannot be
    /// colored at all and an error has been reported.
    fn run(self, msgs: &mut Messages) -> Option<HashMap<usize, Option<usize>>> {
        let stack = self.simplify(msgs)?;
        Some(self.select(stack))
    }

    /// Repeatedly remove a node of insignificant degree; when none exists,
    /// remove the cheapest spillable node instead and let selection decide
    /// whether it actually spills.
    fn simplify(&self, msgs: &mut Messages) -> Option<Vec<usize>> {
        let mut alive: HashSet<usize> = (0..self.graph.len()).collect();
        let mut stack = Vec::with_capacity(self.graph.len());

        while !alive.is_empty() {
            let node = match self.pick_simplifiable(&alive) {
                Some(node) => node,
                None => match self.pick_spill_candidate(&alive) {
                    Some(node) => node,

                    // Only unspillable temporaries remain, all entangled.
                    None => {
                        msgs.at(self.unit.span).alloc_overfull_instruction(
                            self.graph.class,
                            alive.len(),
                            self.budget,
                        );
                        return None;
                    }
                },
            };

            alive.remove(&node);
            stack.push(node);
        }

        Some(stack)
    }

    fn degree_in(&self, node: usize, alive: &HashSet<usize>) -> usize {
        self.graph
            .neighbors(node)
            .filter(|other| alive.contains(other))
            .count()
    }

    fn pick_simplifiable(&self, alive: &HashSet<usize>) -> Option<usize> {
        match self.tie_break {
            TieBreak::DeclarationOrder => alive
                .iter()
                .copied()
                .filter(|node| self.degree_in(*node, alive) < self.budget)
                .min_by_key(|node| (self.degree_in(*node, alive), *node)),

            TieBreak::Arbitrary => alive
                .iter()
                .copied()
                .find(|node| self.degree_in(*node, alive) < self.budget),
        }
    }

    /// Cheapest spillable node by use density. Costs are compared as exact
    /// fractions so ties fall through to declaration order, never to float
    /// rounding.
    fn pick_spill_candidate(&self, alive: &HashSet<usize>) -> Option<usize> {
        let class = self.graph.class;

        let candidates = alive.iter().copied().filter(|node| {
            self.unit
                .registers
                .get(SymReg {
                    class,
                    index: *node,
                })
                .spillable
        });

        let cost = |node: usize| {
            let reg = SymReg { class, index: node };
            let uses = self.uses.get(&reg).copied().unwrap_or(0);
            let len = self.liveness.range_len(reg);
            (uses, len)
        };

        match self.tie_break {
            TieBreak::DeclarationOrder => candidates.min_by(|a, b| {
                let (ua, la) = cost(*a);
                let (ub, lb) = cost(*b);
                (ua * lb).cmp(&(ub * la)).then(a.cmp(b))
            }),

            TieBreak::Arbitrary => candidates.min_by(|a, b| {
                let (ua, la) = cost(*a);
                let (ub, lb) = cost(*b);
                (ua * lb).cmp(&(ub * la))
            }),
        }
    }

    /// Pop the removal stack, giving each node the lowest color its already
    /// colored neighbors leave free. Nodes with no free color spill.
    fn select(&self, mut stack: Vec<usize>) -> HashMap<usize, Option<usize>> {
        let mut colors: HashMap<usize, Option<usize>> = HashMap::new();

        while let Some(node) = stack.pop() {
            let taken: HashSet<usize> = self
                .graph
                .neighbors(node)
                .filter_map(|other| colors.get(&other).copied().flatten())
                .collect();

            let color = (0..self.budget).find(|color| !taken.contains(color));

            if let Some(color) = color {
                trace!("{}{} gets color {color}", self.graph.class.prefix(), node);
            }

            colors.insert(node, color);
        }

        colors
    }
}
