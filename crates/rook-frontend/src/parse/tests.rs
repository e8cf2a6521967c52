use rook_common::ir::{Opcode, RegClass, Relop};

use super::parse;
use super::tree::{ArgNode, StmtNode};
use crate::lex::lex;
use crate::testing::TestDriver;

/// Parse a source snippet and return the statement nodes; no messages may be
/// produced.
fn check(source: &str) -> Vec<StmtNode> {
    let mut driver = TestDriver::default();
    let tokens = lex(&mut driver, source, 0);
    let stmts = parse(&mut driver, tokens, 0);

    assert!(driver.msgs.msgs.is_empty(), "{:?}", driver.codes());

    stmts.into_iter().map(|stmt| stmt.node).collect()
}

/// Parse a bad snippet and return the nodes plus the reported error codes.
fn check_error(source: &str) -> (Vec<StmtNode>, Vec<String>) {
    let mut driver = TestDriver::default();
    let tokens = lex(&mut driver, source, 0);
    let stmts = parse(&mut driver, tokens, 0);

    let codes = driver.codes();
    assert!(!codes.is_empty());

    (stmts.into_iter().map(|stmt| stmt.node).collect(), codes)
}

fn args(stmt: &StmtNode) -> Vec<ArgNode> {
    match stmt {
        StmtNode::Instruction { args, .. } => {
            args.iter().map(|arg| arg.node.clone()).collect()
        }
        _ => panic!("not an instruction: {stmt:?}"),
    }
}

#[test]
fn parse_simple_instructions() {
    let stmts = check("set $I0, 10\nadd $I1, $I0, 1\nret");

    assert_eq!(3, stmts.len());

    assert!(matches!(
        stmts[0],
        StmtNode::Instruction {
            opcode: Opcode::Set,
            ..
        }
    ));
    assert_eq!(
        vec![ArgNode::Sym(RegClass::Int, 0), ArgNode::Int(10)],
        args(&stmts[0])
    );

    assert!(matches!(
        stmts[1],
        StmtNode::Instruction {
            opcode: Opcode::Add,
            ..
        }
    ));

    assert!(matches!(
        stmts[2],
        StmtNode::Instruction {
            opcode: Opcode::Ret,
            ..
        }
    ));
}

#[test]
fn parse_labels() {
    let stmts = check("top:\n  inc $I0\nagain: goto top");

    assert_eq!(4, stmts.len());
    assert_eq!(StmtNode::Label("top".into()), stmts[0]);
    assert_eq!(StmtNode::Label("again".into()), stmts[2]);

    // The shared-line goto still parses as its own statement.
    assert!(matches!(
        stmts[3],
        StmtNode::Instruction {
            opcode: Opcode::Goto,
            ..
        }
    ));
    assert_eq!(vec![ArgNode::Ident("top".into())], args(&stmts[3]));
}

#[test]
fn parse_branches() {
    let stmts = check("if $I0 goto done\nunless $I1 goto done\nif $I0 < $I1 goto done");

    assert!(matches!(
        stmts[0],
        StmtNode::Instruction {
            opcode: Opcode::If,
            ..
        }
    ));
    assert_eq!(
        vec![
            ArgNode::Sym(RegClass::Int, 0),
            ArgNode::Ident("done".into())
        ],
        args(&stmts[0])
    );

    assert!(matches!(
        stmts[1],
        StmtNode::Instruction {
            opcode: Opcode::Unless,
            ..
        }
    ));

    assert!(matches!(
        stmts[2],
        StmtNode::Instruction {
            opcode: Opcode::IfCmp(Relop::Lt),
            ..
        }
    ));
    assert_eq!(3, args(&stmts[2]).len());
}

#[test]
fn parse_declarations() {
    let stmts = check(".local int counter\n.sym str message\n.param num rate\n.global obj state");

    assert_eq!(
        StmtNode::Local {
            class: RegClass::Int,
            name: "counter".into()
        },
        stmts[0]
    );
    assert_eq!(
        StmtNode::Local {
            class: RegClass::Str,
            name: "message".into()
        },
        stmts[1]
    );
    assert_eq!(
        StmtNode::Param {
            class: RegClass::Num,
            name: "rate".into()
        },
        stmts[2]
    );
    assert_eq!(
        StmtNode::Global {
            class: RegClass::Obj,
            name: "state".into()
        },
        stmts[3]
    );
}

#[test]
fn parse_call_directives() {
    let stmts = check(".arg $I0\ncall helper\n.result $I1\n.return $I1");

    assert!(matches!(
        stmts[0],
        StmtNode::Instruction {
            opcode: Opcode::Arg,
            ..
        }
    ));
    assert!(matches!(
        stmts[1],
        StmtNode::Instruction {
            opcode: Opcode::Call,
            ..
        }
    ));
    assert!(matches!(
        stmts[2],
        StmtNode::Instruction {
            opcode: Opcode::Result,
            ..
        }
    ));
    assert!(matches!(
        stmts[3],
        StmtNode::Instruction {
            opcode: Opcode::Return,
            ..
        }
    ));
}

#[test]
fn parse_macro_def_and_call() {
    let source = ".macro twice (reg)\n  add reg, reg, reg\n.endm\n.twice($I0)";
    let stmts = check(source);

    assert_eq!(2, stmts.len());

    match &stmts[0] {
        StmtNode::MacroDef { name, params, body } => {
            assert_eq!("twice", name);
            assert_eq!(&["reg".to_string()], params.as_slice());
            assert_eq!(1, body.len());
        }
        other => panic!("expected a macro definition: {other:?}"),
    }

    match &stmts[1] {
        StmtNode::MacroCall { name, args } => {
            assert_eq!("twice", name);
            assert_eq!(1, args.len());
        }
        other => panic!("expected a macro call: {other:?}"),
    }
}

#[test]
fn parse_nested_macro_is_an_error() {
    let source = ".macro outer\n.macro inner\n.endm\n.endm";
    let (_, codes) = check_error(source);

    assert!(codes.contains(&"EP07".into()));
}

#[test]
fn parse_unterminated_macro() {
    let source = ".macro lonely\n  inc $I0";
    let (stmts, codes) = check_error(source);

    assert!(stmts.is_empty());
    assert_eq!(vec!["EP08".to_string()], codes);
}

#[test]
fn parse_missing_operand() {
    let (stmts, codes) = check_error("add $I0, $I1\nret");

    // The parser recovers and keeps going after the bad line.
    assert_eq!(1, stmts.len());
    assert_eq!(vec!["EP01".to_string()], codes);
}

#[test]
fn parse_branch_without_goto() {
    let (_, codes) = check_error("if $I0 done");
    assert_eq!(vec!["EP04".to_string()], codes);
}

#[test]
fn parse_unknown_opcode() {
    let (stmts, codes) = check_error("frobnicate $I0\nret");

    assert_eq!(1, stmts.len());
    assert_eq!(vec!["EP00".to_string()], codes);
}

#[test]
fn parse_trailing_garbage() {
    let (stmts, codes) = check_error("ret ret\ninc $I0");

    assert_eq!(2, stmts.len());
    assert_eq!(vec!["EP09".to_string()], codes);
}

#[test]
fn parse_bad_register_class() {
    let (_, codes) = check_error(".local float x");
    assert_eq!(vec!["EP02".to_string()], codes);
}
