use crate::ir::RegClass;

/// Everything the allocator lets the surrounding tooling decide: how many
/// physical registers each class has, which classes survive a call in
/// registers, how allocator ties are broken, and how deep macros may expand.
#[derive(Clone, Debug)]
pub struct AllocConfig {
    /// Physical register budget per class, indexed by [`RegClass::index`].
    pub budgets: [usize; 4],

    /// Classes whose registers are clobbered by a call. Values of these
    /// classes that live across a call are preserved in memory by the
    /// rewriter.
    pub caller_saved: [bool; 4],

    pub tie_break: TieBreak,

    /// Maximum macro expansion depth before `EM00` is reported.
    pub macro_depth: usize,

    /// Report non-fatal diagnostics such as unreachable code.
    pub diagnostics: bool,
}

impl AllocConfig {
    pub fn budget(&self, class: RegClass) -> usize {
        self.budgets[class.index()]
    }

    pub fn is_caller_saved(&self, class: RegClass) -> bool {
        self.caller_saved[class.index()]
    }
}

impl Default for AllocConfig {
    fn default() -> Self {
        Self {
            budgets: [8; 4],
            caller_saved: [true; 4],
            tie_break: TieBreak::DeclarationOrder,
            macro_depth: 64,
            diagnostics: false,
        }
    }
}

/// How the allocator chooses between otherwise equal candidates.
///
/// Declaration order is the reproducible policy; `Arbitrary` lets candidate
/// scans follow map iteration order, which is still a correct coloring but
/// not stable between runs. Tests use the contrast to check that determinism
/// comes from the policy and not from data structure accidents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TieBreak {
    DeclarationOrder,
    Arbitrary,
}
