use minic::grammer::ast::{BinaryOp, Call, Command, Expr, Method, Program};
use minic::{Error, Parser};
use arch::Ty;

fn parse(code: &str) -> Result<(Program, Vec<Error>), Error> {
    println!("{code}");
    Parser::from_source(code)?.parse()
}

fn assert(code: &str) {
    let (program, errors) = parse(code).unwrap();
    print!("{}", program.tree());
    assert!(errors.is_empty(), "Errors found: {:?}", errors);

    // Printed source parses back to the same tree
    let printed = program.to_string();
    println!("{printed}");
    let (reparsed, errors) = parse(&printed).unwrap();
    assert!(errors.is_empty(), "Errors found: {:?}", errors);
    assert_eq!(program, reparsed);
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

// Methods
case!(method_empty, "void main() { }");
case!(method_params, "double sum(int a, double b) { return a + b }");
case!(method_many, "int one() { return 1 } void main() { print one() }");
case!(method_trailing_semicolon, "void main() { int a; a = 1; }");

// Commands
case!(declare, "void main() { int a; double b }");
case!(assign, "void main() { int a; a = 775 }");
case!(call_command, "void f(int a, int b) { } void main() { f(1, 2) }");
case!(call_no_args, "void f() { } void main() { f() }");
case!(return_bare, "void main() { return }");
case!(return_bare_semicolon, "void main() { print 1; return; }");
case!(print, "void main() { print 2.5 }");

// Conditionals
case!(cond_if, "void main() { if ((1) < (2)) { print 1 } }");
case!(
    cond_full,
    "void main() { int a; a = 3; if ((a) == (1)) { print 1 } elseif ((a) >= (2)) { print 2 } elseif (a) { } else { print 3 } }"
);
case!(cond_nested, "void main() { if (1) { if (0) { print 0 } else { print 1 } } }");

// Expressions
case!(precedence, "void main() { print 1 + 2 * 3 - 4 / 5 }");
case!(power_chain, "void main() { print 2 ^ 3 ^ 2 }");
case!(boolean, "void main() { print (1) < (2) && (3) > (2) || !0 }");
case!(unary, "void main() { print -(1 + 2) * -3 }");
case!(not_comparison, "void main() { print !((1) == (2)) }");
case!(nested_call, "int f(int a) { return a } void main() { print f(f(1) + f(2)) }");
case!(comment_in_method, "void main() { /* nothing */ print 1 // done\n }");

fn expression(code: &str) -> Expr {
    Parser::from_source(code).unwrap().parse_expression().unwrap()
}

#[test]
fn multiplication_binds_tighter() {
    assert_eq!(
        expression("7+54*2"),
        Expr::binary(
            BinaryOp::Add,
            Expr::int("7"),
            Expr::binary(BinaryOp::Mul, Expr::int("54"), Expr::int("2"))
        )
    );
}

#[test]
fn unary_minus_factor() {
    let factor = Parser::from_source("-11223").unwrap().parse_factor().unwrap();
    assert_eq!(factor, Expr::neg(Expr::int("11223")));
}

#[test]
fn left_associative() {
    assert_eq!(
        expression("1-2-3"),
        Expr::binary(
            BinaryOp::Sub,
            Expr::binary(BinaryOp::Sub, Expr::int("1"), Expr::int("2")),
            Expr::int("3")
        )
    );
}

#[test]
fn power_right_associative() {
    assert_eq!(
        expression("2^3^4"),
        Expr::binary(
            BinaryOp::Pow,
            Expr::int("2"),
            Expr::binary(BinaryOp::Pow, Expr::int("3"), Expr::int("4"))
        )
    );
}

#[test]
fn comparison_atom() {
    assert_eq!(
        expression("(a) <= (1.5)"),
        Expr::binary(BinaryOp::Le, Expr::var("a"), Expr::double("1.5"))
    );
}

#[test]
fn call_expression() {
    assert_eq!(
        expression("f(1, x)"),
        Expr::Call(Call("f".into(), vec![Expr::int("1"), Expr::var("x")]))
    );
}

#[test]
fn method_structure() {
    let (program, _) = parse("int sum(int a, int b) { return a + b }").unwrap();
    assert_eq!(
        program.0[0],
        Method {
            ret: Ty::Int,
            name: "sum".into(),
            params: vec![(Ty::Int, "a".into()), (Ty::Int, "b".into())],
            body: vec![Command::Return(Some(Expr::binary(
                BinaryOp::Add,
                Expr::var("a"),
                Expr::var("b")
            )))],
        }
    );
}

#[test]
fn first_method_is_required() {
    let err = parse("int").unwrap_err();
    assert!(err.is_syntax());
    assert!(parse("").is_err());
}

#[test]
fn later_method_failure_is_recovered() {
    let (program, errors) = parse("void main() { } int broken( { }").unwrap();
    assert_eq!(program.0.len(), 1);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_syntax());
}

#[test]
fn body_failure_is_recovered() {
    let (program, errors) = parse("void main() { print 1; print }").unwrap();
    assert_eq!(program.0[0].body.len(), 1);
    assert_eq!(errors.len(), 1);
}

#[test]
fn first_command_failure_is_fatal() {
    assert!(parse("void main() { = }").is_err());
}

#[test]
fn illegal_character_in_method() {
    let err = parse("void main() { print 1 $ }").unwrap_err();
    assert!(matches!(err, Error::IllegalCharacter('$', _)));
}

#[test]
fn missing_paren_message() {
    let err = parse("void main( { }").unwrap_err();
    assert_eq!(err.to_string(), "`)` expected instead of `{` at 1:11");
}

#[test]
fn atom_cannot_start_with_minus_twice() {
    assert!(Parser::from_source("--1").unwrap().parse_expression().is_err());
}
