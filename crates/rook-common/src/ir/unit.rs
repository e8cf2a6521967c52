use crate::message::Span;
use crate::names::Name;

use super::instruction::Instruction;
use super::register::RegisterTable;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LabelId(pub usize);

#[derive(Clone, Debug)]
pub struct LabelInfo {
    pub name: String,
    /// Index of the instruction this label precedes. May equal the unit's
    /// instruction count, which marks the end of the unit.
    pub target: usize,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    labels: Vec<LabelInfo>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: LabelInfo) -> LabelId {
        let id = LabelId(self.labels.len());
        self.labels.push(info);
        id
    }

    pub fn get(&self, id: LabelId) -> &LabelInfo {
        &self.labels[id.0]
    }

    pub fn target(&self, id: LabelId) -> usize {
        self.labels[id.0].target
    }

    pub fn retarget(&mut self, id: LabelId, target: usize) {
        self.labels[id.0].target = target;
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &LabelInfo)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(id, info)| (LabelId(id), info))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnitKind {
    /// A `.sub` body.
    Sub(Name),
    /// The file-level instruction sequence.
    TopLevel,
    /// A `.emit` block: physical registers only, bypasses allocation.
    Emit,
}

/// One allocation unit: an independent scope over which liveness and
/// coloring are computed in isolation.
#[derive(Clone, Debug)]
pub struct Unit {
    pub kind: UnitKind,
    pub span: Span,
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
    pub registers: RegisterTable,
}

impl Unit {
    pub fn is_emit(&self) -> bool {
        matches!(self.kind, UnitKind::Emit)
    }
}

#[derive(Debug, Default)]
pub struct Program {
    pub units: Vec<Unit>,
}

/// Frame layout facts the emitter needs about an allocated unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnitMeta {
    /// Offset of the unit's first instruction in the linearized program.
    pub entry: usize,
    /// Number of registers introduced by named declarations.
    pub locals: usize,
    /// Total spill slots, including call-site preservation slots.
    pub spill_slots: usize,
}
