//! End-to-end evaluation of hand-built expression trees.
//!
//! Each test builds the tree a template parser would produce for a short
//! expression and checks the value or error that comes out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use stencil_eval::bridge::{ArgKind, MethodInfo, NamespaceInfo, ParamSpec, PropertyInfo, TypeInfo};
use stencil_eval::{
    buffer_handler, evaluate, ErrorCode, EvalMode, EvalResult, Interpreter, RegistryBridge,
    Scope, Stream, Symbol, TypeDescriptor, Value,
};
use stencil_ir::{BinaryOp, Builtin, Expr};

fn num(n: f64) -> Expr {
    Expr::number(n)
}

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

fn run(expr: &Expr) -> EvalResult {
    evaluate(expr, &Scope::new())
}

fn code(result: EvalResult) -> Option<ErrorCode> {
    result.err().map(|e| e.code())
}

#[test]
fn precedence_is_in_the_tree() {
    // 1 + 2 * 3
    let expr = bin(BinaryOp::Add, num(1.0), bin(BinaryOp::Mul, num(2.0), num(3.0)));
    assert_eq!(run(&expr).unwrap(), Value::Number(7.0));
}

#[test]
fn string_concatenation() {
    let expr = bin(BinaryOp::Add, Expr::string("a"), Expr::string("b"));
    assert_eq!(run(&expr).unwrap(), Value::from("ab"));
}

#[test]
fn define_then_call() {
    // def f(n) = n*n; f(5)
    let expr = Expr::StmtList(vec![
        Expr::func("f", &["n"], bin(BinaryOp::Mul, sym("n"), sym("n"))),
        Expr::user_call("f", vec![num(5.0)]),
    ]);
    assert_eq!(run(&expr).unwrap(), Value::Number(25.0));
}

#[test]
fn undefined_symbol() {
    assert_eq!(code(run(&sym("q"))), Some(ErrorCode::MissingSymbol));
}

#[test]
fn string_number_coercion_is_symmetric() {
    let left = bin(BinaryOp::Add, Expr::string("x="), num(5.0));
    let right = bin(BinaryOp::Add, num(5.0), Expr::string("=x"));
    assert_eq!(run(&left).unwrap(), Value::from("x=5"));
    assert_eq!(run(&right).unwrap(), Value::from("5=x"));
}

#[test]
fn string_repetition() {
    let rep = |n: f64| run(&bin(BinaryOp::Mul, Expr::string("ab"), num(n))).unwrap();
    assert_eq!(rep(3.0), Value::from("ababab"));
    assert_eq!(rep(0.0), Value::from(""));
    assert_eq!(rep(-1.0), Value::from(""));
}

#[test]
fn division_by_zero() {
    let expr = bin(BinaryOp::Div, num(4.0), num(0.0));
    assert_eq!(code(run(&expr)), Some(ErrorCode::DivideByZero));
}

#[test]
fn scope_shadowing() {
    let parent = Scope::new();
    parent.bind_value("name", "parent");
    let child = parent.new_child();
    child.bind_value("name", "child");

    assert_eq!(evaluate(&sym("name"), &child).unwrap(), Value::from("child"));
    assert_eq!(evaluate(&sym("name"), &parent).unwrap(), Value::from("parent"));
}

#[test]
fn resolver_is_asked_once_per_scope_and_name() {
    let calls = Rc::new(std::cell::Cell::new(0));
    let scope = Scope::new();
    let counter = Rc::clone(&calls);
    scope.set_resolver(move |_: &Scope, name: &str| {
        counter.set(counter.get() + 1);
        (name == "lazy").then(|| Symbol::with_value("loaded"))
    });

    let expr = bin(BinaryOp::Add, sym("lazy"), sym("lazy"));
    assert_eq!(evaluate(&expr, &scope).unwrap(), Value::from("loadedloaded"));
    assert_eq!(calls.get(), 1);
}

#[test]
fn closure_reads_live_captured_chain() {
    // x = 1; g = func() x; then x changes in a sibling scope and in the root.
    let root = Scope::new();
    root.bind_value("x", 1.0);
    let defining = root.new_child();
    evaluate(&Expr::assign("g", Expr::lambda(&[], sym("x"))), &defining).unwrap();
    let closure = defining.peek("g").and_then(|s| s.value()).unwrap();

    let sibling = root.new_child();
    sibling.bind_value("x", 2.0);
    sibling.bind_value("g", closure);
    let call = Expr::user_call("g", vec![]);
    assert_eq!(evaluate(&call, &sibling).unwrap(), Value::Number(1.0));

    root.bind_value("x", 5.0);
    assert_eq!(evaluate(&call, &sibling).unwrap(), Value::Number(5.0));
}

#[test]
fn while_loop_results() {
    let scope = Scope::new();
    scope.bind_value("i", 0.0);
    let body = Expr::assign("i", bin(BinaryOp::Add, sym("i"), num(1.0)));
    let expr = Expr::while_loop(bin(BinaryOp::Lt, sym("i"), num(4.0)), Some(body));
    assert_eq!(evaluate(&expr, &scope).unwrap(), Value::Number(4.0));

    // Condition false from the start.
    assert_eq!(evaluate(&expr, &scope).unwrap(), Value::Null);
}

#[test]
fn arity_errors_do_not_run_the_body() {
    let scope = Scope::new();
    let body = Expr::builtin_call(Builtin::Assert, Expr::boolean(false));
    evaluate(&Expr::func("one", &["a"], body), &scope).unwrap();

    for args in [vec![], vec![num(1.0), num(2.0)]] {
        let result = evaluate(&Expr::user_call("one", args), &scope);
        // A body run would fail with RuntimeError instead.
        assert_eq!(code(result), Some(ErrorCode::SyntaxError));
    }
}

#[test]
fn assertions() {
    for falsy in [num(0.0), Expr::boolean(false), Expr::Null, Expr::string("")] {
        let result = run(&Expr::builtin_call(Builtin::Assert, falsy));
        assert_eq!(code(result), Some(ErrorCode::RuntimeError));
    }
    for truthy in [num(1.0), Expr::string("x")] {
        assert_eq!(
            run(&Expr::builtin_call(Builtin::Assert, truthy)).unwrap(),
            Value::Boolean(true)
        );
    }
}

#[test]
fn arity_message_names_the_function() {
    let scope = Scope::new();
    evaluate(&Expr::func("f", &["n"], sym("n")), &scope).unwrap();
    let err = evaluate(&Expr::user_call("f", vec![]), &scope).unwrap_err();
    assert_eq!(err.message, "\"f\" takes 1 argument, got 0");
    assert_eq!(err.to_string(), "syntax-error: \"f\" takes 1 argument, got 0");
}

#[test]
fn sandbox_mode_limits_and_silences() {
    let handler = buffer_handler();
    let mut interp = Interpreter::builder()
        .mode(EvalMode::sandbox())
        .print_handler(handler.clone())
        .build();
    let scope = Scope::new();

    let print = Expr::builtin_call(Builtin::Print, Expr::string("visible"));
    interp.eval(&print, &scope).unwrap();
    assert_eq!(handler.output(Stream::Out), "\"visible\"\n");

    let spin = Expr::func("spin", &["n"], Expr::user_call("spin", vec![sym("n")]));
    interp.eval(&spin, &scope).unwrap();
    let err = interp
        .eval(&Expr::user_call("spin", vec![num(0.0)]), &scope)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RecursionLimit);
    assert!(err.backtrace.is_some_and(|b| b.frames().iter().all(|f| f == "spin")));
}

struct Counter {
    count: std::cell::Cell<i64>,
}

fn counter_bridge() -> RegistryBridge {
    let base = TypeDescriptor::new("Object");
    let counter = TypeDescriptor::derived("Counter", &base, &[]);

    let mut bridge = RegistryBridge::new();
    bridge.register_type(
        TypeInfo::new(counter.clone())
            .property(PropertyInfo::read_write(
                "count",
                ArgKind::Int,
                |h| Ok(Value::Int(h.downcast::<Counter>().unwrap().count.get())),
                |h, v| {
                    let Value::Int(n) = v else {
                        return Ok(Value::Null);
                    };
                    h.downcast::<Counter>().unwrap().count.set(n);
                    Ok(Value::Int(n))
                },
            ))
            .method(MethodInfo::new(
                "add",
                vec![ParamSpec::input("by", ArgKind::Int)],
                |receiver, args| {
                    let (Value::Native(h), Value::Int(by)) = (receiver, &args[0]) else {
                        return Ok(Value::Null);
                    };
                    let c = h.downcast::<Counter>().unwrap();
                    c.count.set(c.count.get() + by);
                    Ok(Value::Int(c.count.get()))
                },
            ))
            .function(MethodInfo::new("new", vec![], {
                let counter = counter.clone();
                move |_, _| {
                    Ok(Value::object(
                        counter.clone(),
                        Rc::new(Counter {
                            count: std::cell::Cell::new(0),
                        }),
                    ))
                }
            })),
    );
    bridge.register_namespace(
        NamespaceInfo::new("Counting", "1.0")
            .member("Counter", RegistryBridge::type_handle(&counter)),
    );
    bridge
}

#[test]
fn host_objects_through_the_registry_bridge() {
    let mut interp = Interpreter::builder()
        .bridge(Rc::new(counter_bridge()))
        .print_handler(buffer_handler())
        .build();
    let scope = Scope::new();

    // require Counting 1.0
    // c = Counting.Counter.new()
    // c.count = 10
    // c.add(5)
    // c.count
    let program = Expr::StmtList(vec![
        Expr::require("Counting", Some("1.0")),
        Expr::assign(
            "c",
            Expr::native_call(Expr::get_attr(sym("Counting"), "Counter"), "new", vec![]),
        ),
        Expr::set_attr(sym("c"), "count", num(10.0)),
        Expr::native_call(sym("c"), "add", vec![num(5.0)]),
        Expr::get_attr(sym("c"), "count"),
    ]);
    assert_eq!(interp.eval(&program, &scope).unwrap(), Value::Int(15));

    let typeof_c = Expr::native_call(
        Expr::builtin_call(Builtin::TypeOf, sym("c")),
        "name",
        vec![],
    );
    assert_eq!(interp.eval(&typeof_c, &scope).unwrap(), Value::from("Counter"));

    let missing = Expr::native_call(sym("c"), "reset", vec![]);
    assert_eq!(
        interp.eval(&missing, &scope).unwrap_err().code(),
        ErrorCode::NoSuchMethod
    );
}
