use arch::{Inst, Ty};
use minic::compile::func::MethodCode;
use minic::{program2listing, Config, Error, Listing, Parser};
use std::collections::{HashMap, HashSet};

fn compile(code: &str) -> Result<Listing, Vec<Error>> {
    let (program, errors) = Parser::from_source(code).unwrap().parse().unwrap();
    assert!(errors.is_empty(), "Errors found: {:?}", errors);
    program2listing(&program, &Config::default())
}

fn method<'a>(listing: &'a Listing, name: &str) -> &'a MethodCode {
    listing.methods.iter().find(|code| code.sig.name == name).unwrap()
}

/// Replay the stack effects and check the declared limit covers every instruction boundary
fn check_stack(code: &MethodCode) {
    let mut depth: isize = 0;
    let mut peak: isize = 0;
    let mut at_label = HashMap::new();
    for inst in &code.insts {
        match inst {
            Inst::Label(label) => {
                if let Some(&saved) = at_label.get(label) {
                    depth = saved;
                }
            }
            Inst::If(_, label) | Inst::IfICmp(_, label) | Inst::Goto(label) => {
                let (pop, push) = inst.stack_effect();
                depth += push as isize - pop as isize;
                at_label.entry(label.clone()).or_insert(depth);
                assert!(depth >= 0, "stack underflow at {}", inst);
                continue;
            }
            _ => {}
        }
        let (pop, push) = inst.stack_effect();
        depth -= pop as isize;
        assert!(depth >= 0, "stack underflow at {}", inst);
        depth += push as isize;
        peak = peak.max(depth);
    }
    assert!(
        code.max_stack as isize >= peak,
        "{}: limit {} below peak {}",
        code.sig,
        code.max_stack,
        peak
    );
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            let listing = compile($code).unwrap();
            println!("{}", listing);
            for code in &listing.methods {
                check_stack(code);
            }
        }
    };
}

case!(stack_print, "void main() { print 1 + 2 }");
case!(stack_mixed, "double f(int a, double b) { return a * b + a / b - a } void main() { print f(1, 2.0) }");
case!(
    stack_nested_calls,
    "int g(int a, int b, int c) { return a + b * c } void main() { print g(g(1, 2, 3), g(4, 5, 6), 7) }"
);
case!(
    stack_conditionals,
    "void main() { int a; a = 2; if ((a) > (1)) { print 1 } elseif ((a) == (0)) { print 0 } else { print -1 } }"
);
case!(stack_power, "void main() { double d; d = 2 ^ 0.5; print 2 ^ 10 }");
case!(stack_boolean, "void main() { print ((1) < (2) && !((3.0) >= (4))) || 0 }");
case!(
    stack_returning_branches,
    "int sign(int a) { if ((a) < (0)) { return -1 } else { return 1 } } void main() { print sign(-3) }"
);
case!(stack_recursion, "int fact(int n) { if ((n) <= (1)) { return 1 }; return n * fact(n - 1) } void main() { print fact(5) }");

#[test]
fn add_int_double_casts_once() {
    let listing = compile("double f(int a, double b) { return a + b }").unwrap();
    let code = method(&listing, "f");
    let casts = code.insts.iter().filter(|inst| matches!(inst, Inst::Cast(..))).count();
    assert_eq!(casts, 1);
}

#[test]
fn add_int_int_no_cast() {
    let listing = compile("int f(int a, int b) { return a + b }").unwrap();
    let code = method(&listing, "f");
    assert!(!code.insts.iter().any(|inst| matches!(inst, Inst::Cast(..))));
}

#[test]
fn undeclared_method() {
    let errors = compile("void main() { missing(1) }").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_compilation());
    assert!(errors[0].to_string().contains("missing"));
}

#[test]
fn argument_is_widened() {
    let listing = compile("double half(double x) { return x / 2 } void main() { print half(3) }").unwrap();
    let code = method(&listing, "main");
    assert!(code.insts.contains(&Inst::Cast(Ty::Int, Ty::Double)));
}

#[test]
fn assignment_is_narrowed() {
    let listing = compile("void main() { int a; a = 2.5 }").unwrap();
    let code = method(&listing, "main");
    assert_eq!(
        code.insts[..3],
        [
            Inst::Ldc2W("2.5".into()),
            Inst::Cast(Ty::Double, Ty::Int),
            Inst::Store(Ty::Int, 1),
        ]
    );
}

#[test]
fn print_sequence() {
    let text = compile("void main() { print 2.5 }").unwrap().to_string();
    assert!(text.contains("   getstatic             java/lang/System/out Ljava/io/PrintStream;\n"));
    assert!(text.contains("   ldc2_w                2.5\n"));
    assert!(text.contains("   invokevirtual         java/io/PrintStream/println(D)V\n"));
}

#[test]
fn double_pow_calls_math() {
    let text = compile("void main() { print 2.0 ^ 3 }").unwrap().to_string();
    assert!(text.contains("invokestatic          java/lang/Math/pow(DD)D"));
    assert!(!text.contains("$ipow"));
}

#[test]
fn return_value_from_void() {
    let errors = compile("void f() { return 1 } void main() { }").unwrap_err();
    assert!(matches!(&errors[0], Error::MethodFailed { source, .. } if matches!(**source, Error::ReturnValueFromVoid(_))));
}

#[test]
fn missing_return_value() {
    let errors = compile("int f() { return } void main() { }").unwrap_err();
    assert!(matches!(&errors[0], Error::MethodFailed { source, .. } if matches!(**source, Error::MissingReturnValue(_))));
}

#[test]
fn entry_point_not_callable() {
    let errors = compile("void f() { main() } void main() { }").unwrap_err();
    assert!(matches!(&errors[0], Error::MethodFailed { source, .. } if matches!(**source, Error::EntryPointCall)));
}

#[test]
fn duplicate_method() {
    let errors = compile("void f() { } void f() { } void main() { }").unwrap_err();
    assert!(matches!(&errors[0], Error::DuplicateMethod(name) if name == "f"));
}

#[test]
fn labels_unique_per_method() {
    let listing = compile("void main() { if (1) { print 1 }; if (2) { print 2 } }").unwrap();
    let labels: Vec<String> = method(&listing, "main")
        .insts
        .iter()
        .filter(|inst| inst.is_label())
        .map(|inst| inst.to_string())
        .collect();
    let unique: HashSet<&String> = labels.iter().collect();
    assert_eq!(labels.len(), 4);
    assert_eq!(unique.len(), 4);
}

#[test]
fn variables_are_flat() {
    let listing = compile("void main() { if (1) { int a; a = 1 }; int b; b = 2 }").unwrap();
    let code = method(&listing, "main");
    assert!(code.insts.contains(&Inst::Store(Ty::Int, 1)));
    assert!(code.insts.contains(&Inst::Store(Ty::Int, 2)));
}

#[test]
fn custom_class_name() {
    let (program, _) = Parser::from_source("int f() { return 1 } void main() { print f() }").unwrap().parse().unwrap();
    let config = Config::from_yaml("class_name: Demo").unwrap();
    let text = program2listing(&program, &config).unwrap().to_string();
    assert!(text.contains(".source                  Demo.java\n"));
    assert!(text.contains("invokestatic          Demo/f()I"));
}

#[test]
fn returning_branches_end_the_method() {
    let listing = compile("int sign(int a) { if ((a) < (0)) { return -1 } elseif ((a) == (0)) { return 0 } else { return 1 } }").unwrap();
    let code = method(&listing, "sign");
    assert!(!code.insts.iter().any(|inst| matches!(inst, Inst::Goto(_))));
    assert_eq!(code.insts.iter().filter(|inst| **inst == Inst::Return(Ty::Int)).count(), 3);
}

#[test]
fn double_ordering_comparisons() {
    let text = compile("void main() { print (1.5) <= (2.0); print (1.5) >= (2.0) }").unwrap().to_string();
    assert!(text.contains("   dcmpg\n   ifle"));
    assert!(text.contains("   dcmpl\n   ifge"));
}
