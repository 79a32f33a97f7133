// Integration tests for the parser and evaluator

use pcc::config::{Config, Preprocessor};
use pcc::errors::{Error, RuntimeErrorKind};
use pcc::interpreter::engine::Interpreter;
use pcc::memory::environment::ScopeMode;
use pcc::memory::value::Value;
use pcc::parser::ast::StmtKind;
use pcc::parser::parse::Parser;

fn run_with(source: &str, config: &Config) -> Result<(Interpreter, Option<Value>), Error> {
    let mut parser = Parser::with_config(source, config);
    let module = parser.parse_module()?;
    let mut interpreter = Interpreter::new(parser.source(), config);
    let result = interpreter.run(&module)?;
    Ok((interpreter, result))
}

fn run(source: &str) -> (Interpreter, Option<Value>) {
    run_with(source, &Config::default()).expect("program should run")
}

fn runtime_kind(source: &str) -> RuntimeErrorKind {
    let err = run_with(source, &Config::default()).err().expect("program should fail");
    err.runtime_kind().cloned().expect("expected a runtime error")
}

#[test]
fn test_if_updates_outer_variable() {
    let source = "int x = 2; if (x < 3) { x = x + 10; } ";

    let mut parser = Parser::new(source);
    let module = parser.parse_module().expect("Parsing failed");
    assert_eq!(module.statements.len(), 2);
    assert!(matches!(module.statements[0].kind, StmtKind::Declaration(_)));
    assert!(matches!(module.statements[1].kind, StmtKind::If { .. }));

    let (interpreter, _) = run(source);
    assert_eq!(interpreter.lookup("x"), Some(Value::Int(12)));
}

#[test]
fn test_float_multiplication() {
    let (interpreter, _) = run("float y = 1.5; y = y * 2;");
    assert_eq!(interpreter.lookup("y"), Some(Value::Float(3.0)));
}

#[test]
fn test_precedence() {
    let (interpreter, _) = run("int a = 2 + 3 * 4; int b = (2 + 3) * 4; int c = 10 - 4 - 3; int d = 7 % 4 * 2;");
    assert_eq!(interpreter.lookup("a"), Some(Value::Int(14)));
    assert_eq!(interpreter.lookup("b"), Some(Value::Int(20)));
    assert_eq!(interpreter.lookup("c"), Some(Value::Int(3)));
    assert_eq!(interpreter.lookup("d"), Some(Value::Int(6)));
}

#[test]
fn test_logical_operators_short_circuit() {
    let (interpreter, _) = run(
        "int hits = 0;\n\
         bool both = 1 < 2 && 3 > 2;\n\
         bool either = 1 < 2 || hits++ > 0;\n\
         bool neither = 2 < 1 && hits++ > 0;",
    );
    assert_eq!(interpreter.lookup("both"), Some(Value::Bool(true)));
    assert_eq!(interpreter.lookup("either"), Some(Value::Bool(true)));
    assert_eq!(interpreter.lookup("neither"), Some(Value::Bool(false)));
    assert_eq!(interpreter.lookup("hits"), Some(Value::Int(0)));
}

#[test]
fn test_redeclaration_in_same_scope() {
    assert!(matches!(
        runtime_kind("int x = 1; int x = 2;"),
        RuntimeErrorKind::Redeclaration { .. }
    ));
    assert!(matches!(
        runtime_kind("int main() { int y; { int z; int z; } return 0; }"),
        RuntimeErrorKind::Redeclaration { .. }
    ));
}

#[test]
fn test_shadowing_leaves_outer_binding_alone() {
    let source = "int x = 1; int seen = 0; { int x = 5; seen = x; x = 9; }";

    let (shared, _) = run(source);
    assert_eq!(shared.lookup("x"), Some(Value::Int(1)));
    assert_eq!(shared.lookup("seen"), Some(Value::Int(5)));

    let snapshot = Config::default().with_scope_mode(ScopeMode::Snapshot);
    let (isolated, _) = run_with(source, &snapshot).expect("program should run");
    assert_eq!(isolated.lookup("x"), Some(Value::Int(1)));
    assert_eq!(isolated.lookup("seen"), Some(Value::Int(0)));
}

#[test]
fn test_snapshot_mode_keeps_block_updates_local() {
    let snapshot = Config::default().with_scope_mode(ScopeMode::Snapshot);
    let (interpreter, _) =
        run_with("int x = 2; if (x < 3) { x = x + 10; }", &snapshot).expect("program should run");
    assert_eq!(interpreter.lookup("x"), Some(Value::Int(2)));
}

#[test]
fn test_increments() {
    let (interpreter, _) = run("int x = 5; int pre = ++x; int y = 5; int post = y++;");
    assert_eq!(interpreter.lookup("pre"), Some(Value::Int(6)));
    assert_eq!(interpreter.lookup("x"), Some(Value::Int(6)));
    assert_eq!(interpreter.lookup("post"), Some(Value::Int(5)));
    assert_eq!(interpreter.lookup("y"), Some(Value::Int(6)));
}

#[test]
fn test_loops_and_functions() {
    let source = r#"
        int total = 0;

        int square(int n) {
            return n * n;
        }

        int main() {
            for (int i = 1; i <= 4; i++) {
                total += square(i);
            }
            int countdown = 3;
            while (countdown > 0) {
                countdown--;
            }
            return total + countdown;
        }
    "#;

    let (interpreter, result) = run(source);
    assert_eq!(result, Some(Value::Int(30)));
    assert_eq!(interpreter.lookup("total"), Some(Value::Int(30)));
}

#[test]
fn test_failed_trial_leaves_cursor_in_place() {
    let mut parser = Parser::new("@@@;");
    let err = parser.parse_statement().unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.message().starts_with("No production matched. Tried:"));
    assert_eq!(parser.position(), 0);
}

#[test]
fn test_prototype_then_definition() {
    let (interpreter, result) = run(
        "int twice(int n);\n\
         int twice(int n) { return n + n; }\n\
         int main() { return twice(21); }",
    );
    assert!(interpreter.has_function("twice"));
    assert_eq!(result, Some(Value::Int(42)));
}

#[test]
fn test_strip_comments_preprocessor() {
    let source = "#include <stdio.h>\n// running total\nint x = 1; /* bump\n it */ x += 2;\n";

    assert!(run_with(source, &Config::default()).is_err());

    let config = Config::default().with_preprocessor(Preprocessor::StripComments);
    let (interpreter, _) = run_with(source, &config).expect("program should run");
    assert_eq!(interpreter.lookup("x"), Some(Value::Int(3)));
}

#[test]
fn test_runtime_error_points_at_source() {
    let err = run_with("int x = 1;\nint y = x / 0;", &Config::default()).unwrap_err();
    assert_eq!(err.category(), "Runtime");
    assert_eq!(err.context().line, 2);

    let text = err.to_string();
    assert!(text.starts_with("Runtime error: Division by zero"));
    assert!(text.contains("----- Lexer Debug ----------"));
    assert!(text.contains("Lexer @ ln2:"));
}

#[test]
fn test_unbound_read() {
    assert!(matches!(
        runtime_kind("int x = missing + 1;"),
        RuntimeErrorKind::Unbound { .. }
    ));
}

#[test]
fn test_nested_function_is_rejected() {
    assert!(matches!(
        runtime_kind("int main() { int inner() { return 1; } return 0; }"),
        RuntimeErrorKind::IllegalFunctionNesting { .. }
    ));
}

#[test]
fn test_trace_records_productions_and_handlers() {
    let config = Config::default().with_trace(false);
    let mut parser = Parser::with_config("int x = 1;", &config);
    let module = parser.parse_module().unwrap();
    let parse_trace = parser.take_trace();
    assert_eq!(parse_trace.first().map(String::as_str), Some("→ Entering parse_module()"));
    assert!(parse_trace
        .iter()
        .any(|line| line.contains("(success) Exiting parse_declaration()")));

    let mut interpreter = Interpreter::new(parser.source(), &config);
    interpreter.run(&module).unwrap();
    let run_trace = interpreter.take_trace();
    assert_eq!(run_trace.first().map(String::as_str), Some("→ Entering run()"));
    assert!(run_trace.last().unwrap().starts_with("← (success) Exiting run()"));
}

#[test]
fn test_recursion_close_to_default_call_limit() {
    let limit = Config::default().max_call_depth;
    let source = format!(
        "int f(int n) {{ if (n <= 0) {{ return 0; }} return 1 + f(n - 1); }}\n\
         int main() {{ return f({}); }}",
        limit - 2
    );
    let (_, result) = run(&source);
    assert_eq!(result, Some(Value::Int(limit as i64 - 2)));

    let too_deep = source.replace(&format!("f({})", limit - 2), &format!("f({})", limit + 10));
    assert!(matches!(
        runtime_kind(&too_deep),
        RuntimeErrorKind::CallDepthExceeded { limit: l } if l == limit
    ));
}

#[test]
fn test_deeply_parenthesized_program_is_rejected() {
    let source = format!("int x = {}1{};", "(".repeat(10_000), ")".repeat(10_000));
    let err = run_with(&source, &Config::default()).unwrap_err();
    assert_eq!(err.category(), "Parse");
    assert!(err.message().starts_with("Nesting too deep"));

    let (interpreter, _) = run("int x = ((((((((((1))))))))));");
    assert_eq!(interpreter.lookup("x"), Some(Value::Int(1)));
}

#[test]
fn test_number_prefixed_identifier_is_a_syntax_error() {
    let mut parser = Parser::new("9lives = 1;");
    let err = parser.parse_statement().unwrap_err();
    assert_eq!(err.category(), "Syntax");
    assert!(err.message().contains("'9lives', identifiers cannot start with a number."));
}
