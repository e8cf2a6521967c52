use std::collections::HashMap;

use bimap::BiMap;

use crate::message::Span;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Name(usize);

/// A fully qualified name: an optional scope (namespace or class) followed by
/// the actual name within it.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Path(pub Option<Name>, pub Actual);

impl Path {
    pub fn new(ctx: Name, actual: Actual) -> Self {
        Self(Some(ctx), actual)
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Actual {
    Root,
    Lit(String),
}

#[derive(Debug, Default)]
pub struct Names {
    names: BiMap<Name, Path>,
    decls: HashMap<Name, Span>,
}

impl Names {
    pub fn new() -> Self {
        Self {
            names: BiMap::new(),
            decls: HashMap::new(),
        }
    }

    pub fn root(&mut self) -> Name {
        self.add(Span::new(0, 0, 0), Path(None, Actual::Root))
    }

    pub fn add(&mut self, at: Span, name: Path) -> Name {
        if let Some(id) = self.names.get_by_right(&name) {
            *id
        } else {
            let id = Name(self.names.len());
            self.names.insert(id, name);
            self.decls.insert(id, at);
            id
        }
    }

    pub fn get_path(&self, name: &Name) -> &Path {
        // Only one `Names` should be able to produce names, so this should never fail.
        self.names.get_by_left(name).unwrap()
    }

    pub fn get_span(&self, name: &Name) -> Span {
        *self.decls.get(name).unwrap()
    }
}
