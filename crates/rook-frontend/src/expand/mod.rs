//! Macro recording and bounded template substitution. Runs between parsing
//! and resolution; no macro survives this stage.


use std::collections::{HashMap, HashSet};

use log::{info, trace};

use rook_common::config::AllocConfig;
use rook_common::message::{Messages, Span};
use rook_common::Driver;

use crate::parse::tree::{Arg, ArgNode, Stmt, StmtNode};

pub fn expand(driver: &mut impl Driver, stmts: Vec<Stmt>, config: &AllocConfig) -> Vec<Stmt> {
    info!("expanding macros");

    let mut expander = Expander::new(config.macro_depth);
    let stmts = expander.expand_stmts(stmts, 0);

    driver.report(expander.msgs);

    trace!("done expanding macros");

    stmts
}

#[derive(Debug)]
struct Template {
    params: Vec<String>,
    body: Vec<Stmt>,
}

#[derive(Debug)]
struct Expander {
    macros: HashMap<String, Template>,
    msgs: Messages,
    depth_limit: usize,
    /// Counts instantiations so every expansion gets its own label suffix.
    instances: usize,
}

impl Expander {
    fn new(depth_limit: usize) -> Self {
        Self {
            macros: HashMap::new(),
            msgs: Messages::new(),
            depth_limit,
            instances: 0,
        }
    }

    fn expand_stmts(&mut self, stmts: Vec<Stmt>, depth: usize) -> Vec<Stmt> {
        let mut res = Vec::with_capacity(stmts.len());

        for stmt in stmts {
            match stmt.node {
                StmtNode::MacroDef { name, params, body } => {
                    if self.macros.contains_key(&name) {
                        self.msgs.at(stmt.span).expand_duplicate_macro(&name);
                    } else {
                        self.macros.insert(name, Template { params, body });
                    }
                }

                StmtNode::MacroCall { name, args } => {
                    res.extend(self.instantiate(&name, args, stmt.span, depth));
                }

                _ => res.push(stmt),
            }
        }

        res
    }

    fn instantiate(
        &mut self,
        name: &str,
        args: Vec<Arg>,
        span: Span,
        depth: usize,
    ) -> Vec<Stmt> {
        if depth >= self.depth_limit {
            self.msgs.at(span).expand_depth_overflow(self.depth_limit);
            return vec![];
        }

        let template = match self.macros.get(name) {
            Some(template) => template,
            None => {
                self.msgs.at(span).expand_unknown_macro(name);
                return vec![];
            }
        };

        if template.params.len() != args.len() {
            let expected = template.params.len();
            self.msgs
                .at(span)
                .expand_wrong_arity(name, expected, args.len());
            return vec![];
        }

        let substs: HashMap<&str, &Arg> = template
            .params
            .iter()
            .map(String::as_str)
            .zip(args.iter())
            .collect();

        // Labels defined inside the body are private to this instantiation.
        let locals: HashSet<&str> = template
            .body
            .iter()
            .filter_map(|stmt| match &stmt.node {
                StmtNode::Label(label) => Some(label.as_str()),
                _ => None,
            })
            .collect();

        let instance = self.instances;
        self.instances += 1;

        let body = template
            .body
            .iter()
            .map(|stmt| subst_stmt(stmt, &substs, &locals, instance))
            .collect();

        self.expand_stmts(body, depth + 1)
    }
}

fn subst_stmt(
    stmt: &Stmt,
    substs: &HashMap<&str, &Arg>,
    locals: &HashSet<&str>,
    instance: usize,
) -> Stmt {
    let node = match &stmt.node {
        StmtNode::Label(label) if locals.contains(label.as_str()) => {
            StmtNode::Label(localize(label, instance))
        }

        StmtNode::Instruction { opcode, args } => StmtNode::Instruction {
            opcode: *opcode,
            args: args
                .iter()
                .map(|arg| subst_arg(arg, substs, locals, instance))
                .collect(),
        },

        StmtNode::MacroCall { name, args } => StmtNode::MacroCall {
            name: name.clone(),
            args: args
                .iter()
                .map(|arg| subst_arg(arg, substs, locals, instance))
                .collect(),
        },

        other => other.clone(),
    };

    Stmt {
        node,
        span: stmt.span,
    }
}

fn subst_arg(
    arg: &Arg,
    substs: &HashMap<&str, &Arg>,
    locals: &HashSet<&str>,
    instance: usize,
) -> Arg {
    if let ArgNode::Ident(name) = &arg.node {
        if let Some(subst) = substs.get(name.as_str()) {
            return (*subst).clone();
        }

        if locals.contains(name.as_str()) {
            return Arg {
                node: ArgNode::Ident(localize(name, instance)),
                span: arg.span,
            };
        }
    }

    arg.clone()
}

/// Labels cannot contain `@`, so localized names never collide with source
/// names.
fn localize(label: &str, instance: usize) -> String {
    format!("{label}@{instance}")
}
