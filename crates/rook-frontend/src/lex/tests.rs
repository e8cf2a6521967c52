use rook_common::ir::{RegClass, Relop};

use super::{lex, Token};
use crate::testing::TestDriver;

/// Check that the lexer produces the expected tokens and no messages.
fn check(source: &str, expected: &[Token]) {
    let mut driver = TestDriver::default();
    let tokens: Vec<Token> = lex(&mut driver, source, 0)
        .into_iter()
        .map(|(tok, _)| tok)
        .collect();

    assert_eq!(expected, tokens.as_slice());
    assert!(driver.msgs.msgs.is_empty());
}

/// Check the tokens and that the given error codes were reported.
fn check_error(source: &str, expected: &[Token], codes: &[&str]) {
    let mut driver = TestDriver::default();
    let tokens: Vec<Token> = lex(&mut driver, source, 0)
        .into_iter()
        .map(|(tok, _)| tok)
        .collect();

    assert_eq!(expected, tokens.as_slice());
    assert_eq!(codes, driver.codes().as_slice());
}

#[test]
fn lex_directives() {
    let source = ".sub main\nset $I0, 1\n.end";
    let expected = &[
        Token::Sub,
        Token::Name("main".into()),
        Token::Eol,
        Token::Name("set".into()),
        Token::SymReg(RegClass::Int, 0),
        Token::Comma,
        Token::Int(1),
        Token::Eol,
        Token::End,
    ];

    check(source, expected);
}

#[test]
fn lex_registers() {
    let source = "$I0 $N12 $S3 $P4 I0 N12 S3 P4";
    let expected = &[
        Token::SymReg(RegClass::Int, 0),
        Token::SymReg(RegClass::Num, 12),
        Token::SymReg(RegClass::Str, 3),
        Token::SymReg(RegClass::Obj, 4),
        Token::PhysReg(RegClass::Int, 0),
        Token::PhysReg(RegClass::Num, 12),
        Token::PhysReg(RegClass::Str, 3),
        Token::PhysReg(RegClass::Obj, 4),
    ];

    check(source, expected);
}

#[test]
fn lex_register_like_names() {
    // A trailing letter makes it a plain name again.
    let source = "I0x In0 counter";
    let expected = &[
        Token::Name("I0x".into()),
        Token::Name("In0".into()),
        Token::Name("counter".into()),
    ];

    check(source, expected);
}

#[test]
fn lex_relops() {
    let source = "== != < <= > >=";
    let expected = &[
        Token::Relop(Relop::Eq),
        Token::Relop(Relop::Ne),
        Token::Relop(Relop::Lt),
        Token::Relop(Relop::Le),
        Token::Relop(Relop::Gt),
        Token::Relop(Relop::Ge),
    ];

    check(source, expected);
}

#[test]
fn lex_numbers() {
    let source = "0 42 -17 3.25 -0.5 1.5e3";
    let expected = &[
        Token::Int(0),
        Token::Int(42),
        Token::Int(-17),
        Token::Num(3.25),
        Token::Num(-0.5),
        Token::Num(1500.0),
    ];

    check(source, expected);
}

#[test]
fn lex_strings() {
    let source = r#""hello" "a\nb" "q\"q" "back\\slash""#;
    let expected = &[
        Token::Str("hello".into()),
        Token::Str("a\nb".into()),
        Token::Str("q\"q".into()),
        Token::Str("back\\slash".into()),
    ];

    check(source, expected);
}

#[test]
fn lex_unterminated_string() {
    let source = "set $S0, \"oops\nret";
    let expected = &[
        Token::Name("set".into()),
        Token::SymReg(RegClass::Str, 0),
        Token::Comma,
        Token::Invalid,
        Token::Eol,
        Token::Name("ret".into()),
    ];

    check_error(source, expected, &["EL01"]);
}

#[test]
fn lex_invalid_character() {
    let source = "set $I0, `";
    let expected = &[
        Token::Name("set".into()),
        Token::SymReg(RegClass::Int, 0),
        Token::Comma,
        Token::Invalid,
    ];

    check_error(source, expected, &["EL00"]);
}

#[test]
fn lex_collapses_blank_lines() {
    let source = "\n\nret\n\n\nend\n";
    let expected = &[
        Token::Name("ret".into()),
        Token::Eol,
        Token::Name("end".into()),
        Token::Eol,
    ];

    check(source, expected);
}

#[test]
fn lex_comments() {
    let source = "inc $I0 # bump the counter\n# whole line\nret";
    let expected = &[
        Token::Name("inc".into()),
        Token::SymReg(RegClass::Int, 0),
        Token::Eol,
        Token::Name("ret".into()),
    ];

    check(source, expected);
}

#[test]
fn lex_macro_names() {
    let source = ".macro swap (a, b)\n.endm\n.swap $I0, $I1";
    let expected = &[
        Token::Macro,
        Token::MacroName("swap".into()),
        Token::LParen,
        Token::Name("a".into()),
        Token::Comma,
        Token::Name("b".into()),
        Token::RParen,
        Token::Eol,
        Token::Endm,
        Token::Eol,
        Token::MacroName("swap".into()),
        Token::SymReg(RegClass::Int, 0),
        Token::Comma,
        Token::SymReg(RegClass::Int, 1),
    ];

    check(source, expected);
}
