//! Backward dataflow liveness. Block-level facts are computed by a worklist
//! fixpoint, then refined into per-instruction live-out sets by an in-block
//! reverse walk.

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use log::trace;

use rook_common::ir::{Reg, SymReg, Unit};

use crate::cfg::{BlockId, Cfg};

pub fn analyze(cfg: &Cfg, unit: &Unit) -> Liveness {
    let facts = BlockFacts::new(cfg, unit);
    let mut analyzer = Analyzer::new(cfg, &facts);
    analyzer.iterate();

    let mut insn_out: Vec<im::HashSet<SymReg>> =
        vec![im::HashSet::new(); unit.instructions.len()];

    // Walk each block backward from its live-out set to per-instruction
    // precision. Unreachable instructions keep empty sets.
    for block in cfg.ids() {
        let mut live: im::HashSet<SymReg> = analyzer
            .out_facts
            .get(&block)
            .into_iter()
            .flatten()
            .copied()
            .collect();

        for index in cfg.get(block).range.clone().rev() {
            let instruction = &unit.instructions[index];
            insn_out[index] = live.clone();

            if let Some(Reg::Symbolic(reg)) = instruction.def() {
                live = live.without(&reg);
            }

            for reg in instruction.uses() {
                if let Reg::Symbolic(reg) = reg {
                    live.insert(reg);
                }
            }
        }
    }

    trace!("liveness converged");

    Liveness {
        block_in: analyzer.in_facts,
        block_out: analyzer.out_facts,
        insn_out,
    }
}

#[derive(Debug, Eq, PartialEq)]
pub struct Liveness {
    pub block_in: HashMap<BlockId, HashSet<SymReg>>,
    pub block_out: HashMap<BlockId, HashSet<SymReg>>,
    /// Live-out set at each instruction boundary, indexed by instruction.
    pub insn_out: Vec<im::HashSet<SymReg>>,
}

impl Liveness {
    /// How many instruction boundaries each register is live across. The
    /// allocator divides use counts by this to estimate spill costs.
    pub fn range_len(&self, reg: SymReg) -> usize {
        self.insn_out
            .iter()
            .filter(|live| live.contains(&reg))
            .count()
            .max(1)
    }
}

struct BlockFacts {
    gens: HashMap<BlockId, HashSet<SymReg>>,
    kills: HashMap<BlockId, HashSet<SymReg>>,
}

impl BlockFacts {
    fn new(cfg: &Cfg, unit: &Unit) -> Self {
        let mut gens: HashMap<BlockId, HashSet<SymReg>> = HashMap::new();
        let mut kills: HashMap<BlockId, HashSet<SymReg>> = HashMap::new();

        for block in cfg.ids() {
            let gens = gens.entry(block).or_default();
            let kills = kills.entry(block).or_default();

            for index in cfg.get(block).range.clone() {
                let instruction = &unit.instructions[index];

                // Upward-exposed uses only: a use after a kill in the same
                // block is satisfied locally.
                for reg in instruction.uses() {
                    if let Reg::Symbolic(reg) = reg {
                        if !kills.contains(&reg) {
                            gens.insert(reg);
                        }
                    }
                }

                if let Some(Reg::Symbolic(reg)) = instruction.def() {
                    kills.insert(reg);
                }
            }
        }

        Self { gens, kills }
    }

    fn gens(&self, block: &BlockId) -> &HashSet<SymReg> {
        self.gens.get(block).unwrap()
    }

    fn kills(&self, block: &BlockId) -> &HashSet<SymReg> {
        self.kills.get(block).unwrap()
    }
}

struct Analyzer<'a> {
    in_facts: HashMap<BlockId, HashSet<SymReg>>,
    out_facts: HashMap<BlockId, HashSet<SymReg>>,
    cfg: &'a Cfg,
    facts: &'a BlockFacts,

    worklist: Vec<BlockId>,
}

impl<'a> Analyzer<'a> {
    fn new(cfg: &'a Cfg, facts: &'a BlockFacts) -> Self {
        Self {
            in_facts: HashMap::new(),
            out_facts: HashMap::new(),
            cfg,
            facts,

            worklist: cfg.ids().collect(),
        }
    }

    fn iterate(&mut self) {
        while let Some(block) = self.worklist.pop() {
            let out = self.compute_out(&block);
            let inb = self.compute_in(&out, &block);

            let out_fact = self.out_facts.entry(block).or_default();
            let in_fact = self.in_facts.entry(block).or_default();

            if &out != out_fact || &inb != in_fact {
                *out_fact = out;
                *in_fact = inb;

                self.worklist.extend(self.cfg.preds(block));
            }
        }
    }

    /// ```text
    /// in(b) = union(out(b) - kill(b), gen(b))
    /// ```
    fn compute_in(&self, out: &HashSet<SymReg>, block: &BlockId) -> HashSet<SymReg> {
        let without_kill = out.difference(self.facts.kills(block));

        let mut res = self.facts.gens(block).clone();
        res.extend(without_kill);

        res
    }

    /// ```text
    /// out(b) = union(in(s) for s in succ(b))
    /// ```
    fn compute_out(&self, block: &BlockId) -> HashSet<SymReg> {
        let mut res = HashSet::new();
        for succ in self.cfg.succs(*block) {
            res.extend(self.in_facts.get(&succ).into_iter().flatten().copied());
        }
        res
    }
}
