//! Basic block construction. Blocks are index ranges over the unit's
//! instruction sequence; edges are fall-through and taken-branch successors.
//! Blocks unreachable from the entry are pruned before any analysis runs.


use std::collections::{HashMap, HashSet};
use std::ops::Range;

use log::trace;

use rook_common::config::AllocConfig;
use rook_common::ir::{Flow, Unit};
use rook_common::message::Messages;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlockId(pub usize);

#[derive(Clone, Debug)]
pub struct Block {
    pub range: Range<usize>,
    /// Successors, fall-through first where both exist.
    pub succs: Vec<BlockId>,
}

#[derive(Debug)]
pub struct Cfg {
    pub blocks: Vec<Block>,
    pub entry: BlockId,
    preds: HashMap<BlockId, Vec<BlockId>>,
}

impl Cfg {
    pub fn preds(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.preds.get(&block).into_iter().flatten().copied()
    }

    pub fn succs(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks[block.0].succs.iter().copied()
    }

    pub fn get(&self, block: BlockId) -> &Block {
        &self.blocks[block.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> {
        (0..self.blocks.len()).map(BlockId)
    }
}

pub fn build(unit: &Unit, config: &AllocConfig) -> (Cfg, Messages) {
    let mut msgs = Messages::new();
    let len = unit.instructions.len();

    // Leaders: the entry, every label target, and every instruction after a
    // control transfer. Calls do not end blocks.
    let mut leaders: HashSet<usize> = HashSet::new();
    leaders.insert(0);

    for (_, info) in unit.labels.iter() {
        leaders.insert(info.target);
    }

    for (index, instruction) in unit.instructions.iter().enumerate() {
        if !matches!(instruction.flow(), Flow::Fallthrough) {
            leaders.insert(index + 1);
        }
    }

    let mut starts: Vec<usize> = leaders.into_iter().filter(|start| *start < len).collect();
    starts.sort_unstable();

    // Map every instruction index to the block that will start there.
    let start_of: HashMap<usize, usize> = starts
        .iter()
        .enumerate()
        .map(|(block, start)| (*start, block))
        .collect();

    let mut blocks: Vec<Block> = Vec::with_capacity(starts.len());

    for (block, start) in starts.iter().enumerate() {
        let end = starts.get(block + 1).copied().unwrap_or(len);
        let last = &unit.instructions[end - 1];

        let mut succs = Vec::new();
        match last.flow() {
            Flow::Fallthrough => {
                if end < len {
                    succs.push(BlockId(block + 1));
                }
            }

            Flow::Jump(label) => {
                let target = unit.labels.target(label);
                if let Some(to) = start_of.get(&target) {
                    succs.push(BlockId(*to));
                }
            }

            Flow::Branch(label) => {
                if end < len {
                    succs.push(BlockId(block + 1));
                }

                let target = unit.labels.target(label);
                if let Some(to) = start_of.get(&target) {
                    succs.push(BlockId(*to));
                }
            }

            Flow::Stop => {}
        }

        blocks.push(Block {
            range: *start..end,
            succs,
        });
    }

    // Prune everything unreachable from the entry. Dead code is legal IR
    // (macro expansion produces it), so pruning only warns.
    let mut reachable = vec![false; blocks.len()];
    let mut worklist = vec![0usize];

    while let Some(block) = worklist.pop() {
        if blocks.is_empty() || reachable[block] {
            continue;
        }

        reachable[block] = true;
        worklist.extend(blocks[block].succs.iter().map(|id| id.0));
    }

    if config.diagnostics {
        for (block, live) in reachable.iter().enumerate() {
            if !live && !blocks.is_empty() {
                let range = blocks[block].range.clone();
                let span = unit.instructions[range]
                    .iter()
                    .map(|instruction| instruction.span)
                    .sum();
                msgs.at(span).cfg_unreachable_code();
            }
        }
    }

    let remap: HashMap<usize, usize> = reachable
        .iter()
        .enumerate()
        .filter(|(_, live)| **live)
        .enumerate()
        .map(|(new, (old, _))| (old, new))
        .collect();

    let blocks: Vec<Block> = blocks
        .into_iter()
        .enumerate()
        .filter(|(old, _)| reachable.get(*old).copied().unwrap_or(false))
        .map(|(_, block)| Block {
            range: block.range,
            succs: block
                .succs
                .into_iter()
                .filter_map(|id| remap.get(&id.0).map(|new| BlockId(*new)))
                .collect(),
        })
        .collect();

    let mut preds: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
    for (from, block) in blocks.iter().enumerate() {
        for to in block.succs.iter() {
            preds.entry(*to).or_default().push(BlockId(from));
        }
    }

    trace!("built cfg with {} blocks", blocks.len());

    let cfg = Cfg {
        blocks,
        entry: BlockId(0),
        preds,
    };

    (cfg, msgs)
}
