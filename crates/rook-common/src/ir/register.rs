use std::fmt;

use crate::message::Span;

/// One of the four typed register kinds. Values never cross classes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RegClass {
    Int,
    Num,
    Str,
    Obj,
}

impl RegClass {
    pub const ALL: [RegClass; 4] = [RegClass::Int, RegClass::Num, RegClass::Str, RegClass::Obj];

    pub fn index(&self) -> usize {
        match self {
            Self::Int => 0,
            Self::Num => 1,
            Self::Str => 2,
            Self::Obj => 3,
        }
    }

    /// The register prefix letter, as in `$I0` or `N3`.
    pub fn prefix(&self) -> char {
        match self {
            Self::Int => 'I',
            Self::Num => 'N',
            Self::Str => 'S',
            Self::Obj => 'P',
        }
    }

    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Int),
            'N' => Some(Self::Num),
            'S' => Some(Self::Str),
            'P' => Some(Self::Obj),
            _ => None,
        }
    }
}

impl fmt::Display for RegClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Num => write!(f, "num"),
            Self::Str => write!(f, "str"),
            Self::Obj => write!(f, "obj"),
        }
    }
}

/// A symbolic register. The index is dense within its unit and class, and is
/// assigned in order of first textual appearance, so it doubles as the
/// allocator's declaration-order tie-break key.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SymReg {
    pub class: RegClass,
    pub index: usize,
}

/// A physical register within the class budget.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PhysReg {
    pub class: RegClass,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Reg {
    Symbolic(SymReg),
    Physical(PhysReg),
}

impl Reg {
    pub fn class(&self) -> RegClass {
        match self {
            Self::Symbolic(reg) => reg.class,
            Self::Physical(reg) => reg.class,
        }
    }

    pub fn sym(&self) -> Option<SymReg> {
        match self {
            Self::Symbolic(reg) => Some(*reg),
            Self::Physical(_) => None,
        }
    }
}

/// How a symbolic register was introduced in the source.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RegName {
    /// A numbered register like `$I5`.
    Numbered(u32),
    /// A register declared with `.local`, `.sym`, `.param`, or `.global`.
    /// Register names are unit-local, so a plain string suffices.
    Named(String),
    /// A temporary introduced by spill rewriting.
    Temp(usize),
}

#[derive(Clone, Debug)]
pub struct RegInfo {
    pub name: RegName,
    pub span: Span,
    pub param: bool,
    /// Spill temporaries must never be chosen as spill candidates again.
    pub spillable: bool,
}

/// The per-unit register table. Registers get dense indices per class in
/// order of first appearance.
#[derive(Clone, Debug, Default)]
pub struct RegisterTable {
    classes: [Vec<RegInfo>; 4],
    temps: usize,
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, class: RegClass) -> usize {
        self.classes[class.index()].len()
    }

    pub fn get(&self, reg: SymReg) -> &RegInfo {
        &self.classes[reg.class.index()][reg.index]
    }

    pub fn add(&mut self, class: RegClass, info: RegInfo) -> SymReg {
        let regs = &mut self.classes[class.index()];
        let index = regs.len();
        regs.push(info);
        SymReg { class, index }
    }

    /// Introduce a fresh unspillable temporary for spill rewriting.
    pub fn temp(&mut self, class: RegClass, span: Span) -> SymReg {
        let id = self.temps;
        self.temps += 1;

        self.add(
            class,
            RegInfo {
                name: RegName::Temp(id),
                span,
                param: false,
                spillable: false,
            },
        )
    }

    pub fn iter(&self, class: RegClass) -> impl Iterator<Item = (SymReg, &RegInfo)> {
        self.classes[class.index()]
            .iter()
            .enumerate()
            .map(move |(index, info)| (SymReg { class, index }, info))
    }

    /// The number of registers introduced by a named declaration.
    pub fn num_named(&self) -> usize {
        self.classes
            .iter()
            .flatten()
            .filter(|info| matches!(info.name, RegName::Named(_)))
            .count()
    }
}
