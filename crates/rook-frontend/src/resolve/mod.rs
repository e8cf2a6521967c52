//! Splits the statement stream into allocation units, interns sub names
//! under their namespace or class, and resolves registers and labels.

mod unit;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use log::{info, trace};

use rook_common::ir::{Program, RegClass, Unit, UnitKind};
use rook_common::message::{File, Messages, Span};
use rook_common::names::{Actual, Name, Names, Path};
use rook_common::Driver;

use crate::parse::tree::{Stmt, StmtNode};
use unit::UnitResolver;

pub fn resolve(
    driver: &mut impl Driver,
    names: &mut Names,
    stmts: Vec<Stmt>,
    file: File,
) -> Program {
    info!("resolving file with id {file}");

    let mut resolver = Resolver::new(names, file);
    resolver.scan_globals(&stmts);
    resolver.run(stmts);

    driver.report(resolver.msgs);

    trace!("done resolving file {file}");

    Program {
        units: resolver.units,
    }
}

struct Resolver<'a> {
    names: &'a mut Names,
    msgs: Messages,
    root: Name,
    namespace: Name,
    classes: Vec<Name>,
    globals: HashMap<String, (RegClass, Span)>,
    units: Vec<Unit>,
}

impl<'a> Resolver<'a> {
    fn new(names: &'a mut Names, _file: File) -> Self {
        let root = names.root();

        Self {
            names,
            msgs: Messages::new(),
            root,
            namespace: root,
            classes: Vec::new(),
            globals: HashMap::new(),
            units: Vec::new(),
        }
    }

    /// `.global` declarations are file scoped no matter where they appear.
    fn scan_globals(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match &stmt.node {
                StmtNode::Global { class, name } => {
                    if let Some((prev_class, prev)) = self.globals.get(name) {
                        if *prev_class != *class {
                            self.msgs.at(stmt.span).resolve_register_class_mismatch(
                                name,
                                *prev_class,
                                *class,
                            );
                        } else {
                            self.msgs
                                .at(stmt.span)
                                .resolve_duplicate_register(name, *prev);
                        }
                    } else {
                        self.globals.insert(name.clone(), (*class, stmt.span));
                    }
                }

                _ => {}
            }
        }
    }

    fn run(&mut self, stmts: Vec<Stmt>) {
        let mut toplevel = Vec::new();
        let mut iter = stmts.into_iter();

        while let Some(stmt) = iter.next() {
            match stmt.node {
                StmtNode::Sub(name) => {
                    let ctx = self.context();
                    let sub = self
                        .names
                        .add(stmt.span, Path::new(ctx, Actual::Lit(name)));

                    let body = self.collect_block(&mut iter, stmt.span, ".sub", ".end", |node| {
                        matches!(node, StmtNode::End)
                    });

                    self.unit(UnitKind::Sub(sub), ctx, stmt.span, body);
                }

                StmtNode::Emit => {
                    let ctx = self.context();
                    let body = self.collect_block(&mut iter, stmt.span, ".emit", ".eom", |node| {
                        matches!(node, StmtNode::Eom)
                    });

                    self.unit(UnitKind::Emit, ctx, stmt.span, body);
                }

                StmtNode::Namespace(name) => {
                    self.namespace = self
                        .names
                        .add(stmt.span, Path::new(self.root, Actual::Lit(name)));
                }

                StmtNode::Class(name) => {
                    let ctx = self.context();
                    let class = self
                        .names
                        .add(stmt.span, Path::new(ctx, Actual::Lit(name)));
                    self.classes.push(class);
                }

                StmtNode::EndClass => {
                    if self.classes.pop().is_none() {
                        self.msgs.at(stmt.span).resolve_stray_directive(".endclass");
                    }
                }

                StmtNode::End => {
                    self.msgs.at(stmt.span).resolve_stray_directive(".end");
                }

                StmtNode::Eom => {
                    self.msgs.at(stmt.span).resolve_stray_directive(".eom");
                }

                // Already collected by the global scan.
                StmtNode::Global { .. } => {}

                _ => toplevel.push(stmt),
            }
        }

        for class in self.classes.drain(..).collect::<Vec<_>>() {
            let span = self.names.get_span(&class);
            self.msgs.at(span).resolve_unclosed_block(".class", ".endclass");
        }

        if !toplevel.is_empty() {
            let span = toplevel.iter().map(|stmt| stmt.span).sum();
            let ctx = self.root;

            let start = self.units.len();
            self.unit(UnitKind::TopLevel, ctx, span, toplevel);

            // The file-level sequence is the program entry; it goes first.
            if self.units.len() > start {
                let unit = self.units.remove(start);
                self.units.insert(0, unit);
            }
        }
    }

    fn collect_block(
        &mut self,
        iter: &mut impl Iterator<Item = Stmt>,
        at: Span,
        opener: &str,
        closer: &str,
        is_close: impl Fn(&StmtNode) -> bool,
    ) -> Vec<Stmt> {
        let mut body = Vec::new();

        for stmt in iter.by_ref() {
            if is_close(&stmt.node) {
                return body;
            }

            body.push(stmt);
        }

        self.msgs.at(at).resolve_unclosed_block(opener, closer);
        body
    }

    fn unit(&mut self, kind: UnitKind, ctx: Name, span: Span, body: Vec<Stmt>) {
        let resolver = UnitResolver::new(self.names, &self.globals, kind, ctx);
        if let Some(unit) = resolver.resolve(span, body, &mut self.msgs) {
            self.units.push(unit);
        }
    }

    /// The scope that subs declared here belong to.
    fn context(&self) -> Name {
        self.classes.last().copied().unwrap_or(self.namespace)
    }
}
