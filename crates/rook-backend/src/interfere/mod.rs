//! Per-class interference graphs. Nodes are addressed by the register's
//! dense index, so the arena doubles as the declaration-order tie-break.


use std::collections::HashSet;

use log::trace;

use rook_common::ir::{Reg, RegClass, SymReg, Unit};

use crate::liveness::Liveness;

#[derive(Debug)]
pub struct Graph {
    pub class: RegClass,
    adj: Vec<HashSet<usize>>,
}

impl Graph {
    fn new(class: RegClass, nodes: usize) -> Self {
        Self {
            class,
            adj: vec![HashSet::new(); nodes],
        }
    }

    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a != b {
            self.adj[a].insert(b);
            self.adj[b].insert(a);
        }
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adj[node].len()
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[node].iter().copied()
    }

    pub fn interferes(&self, a: usize, b: usize) -> bool {
        self.adj[a].contains(&b)
    }
}

#[derive(Debug)]
pub struct ClassGraphs {
    graphs: [Graph; 4],
}

impl ClassGraphs {
    pub fn get(&self, class: RegClass) -> &Graph {
        &self.graphs[class.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.iter()
    }
}

pub fn build(liveness: &Liveness, unit: &Unit) -> ClassGraphs {
    let mut graphs = ClassGraphs {
        graphs: [
            Graph::new(RegClass::Int, unit.registers.count(RegClass::Int)),
            Graph::new(RegClass::Num, unit.registers.count(RegClass::Num)),
            Graph::new(RegClass::Str, unit.registers.count(RegClass::Str)),
            Graph::new(RegClass::Obj, unit.registers.count(RegClass::Obj)),
        ],
    };

    // Clique edges over every boundary live set.
    for live in liveness
        .block_in
        .values()
        .chain(liveness.block_out.values())
    {
        let regs: im::HashSet<SymReg> = live.iter().copied().collect();
        clique(&mut graphs, &regs);
    }

    for live in liveness.insn_out.iter() {
        clique(&mut graphs, live);
    }

    // A def interferes with everything live after its instruction, even if
    // the defined value itself is never read. Without this a dead write
    // could share a register with a live value and clobber it.
    for (index, instruction) in unit.instructions.iter().enumerate() {
        if let Some(Reg::Symbolic(def)) = instruction.def() {
            let graph = &mut graphs.graphs[def.class.index()];
            for other in liveness.insn_out[index].iter() {
                if other.class == def.class {
                    graph.add_edge(def.index, other.index);
                }
            }
        }
    }

    trace!(
        "interference graphs built: {} nodes total",
        graphs.iter().map(Graph::len).sum::<usize>()
    );

    graphs
}

fn clique(graphs: &mut ClassGraphs, regs: &im::HashSet<SymReg>) {
    for reg in regs.iter() {
        let interfere = regs.without(reg);
        let graph = &mut graphs.graphs[reg.class.index()];

        for other in interfere.iter() {
            if other.class == reg.class {
                graph.add_edge(reg.index, other.index);
            }
        }
    }
}
