//! Property tests for expression evaluation and span recording
//!
//! These use proptest to check that:
//! 1. Integer arithmetic honours `* / %` over `+ -`, left to right within a level
//! 2. Every node the parser produces ends no earlier than it starts
//! 3. The parser returns an error instead of panicking on arbitrary input

use pcc::config::Config;
use pcc::interpreter::engine::Interpreter;
use pcc::memory::value::Value;
use pcc::parser::ast::tree_rows;
use pcc::parser::parse::Parser;
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// A literal followed by `(operator, literal)` pairs; divisors are never zero
fn arithmetic_terms() -> impl Strategy<Value = (i64, Vec<(char, i64)>)> {
    let pair = prop_oneof![
        (prop_oneof![Just('+'), Just('-'), Just('*')], 0i64..100),
        (prop_oneof![Just('/'), Just('%')], 1i64..10),
    ];
    (0i64..100, prop::collection::vec(pair, 0..8))
}

fn render(first: i64, rest: &[(char, i64)]) -> String {
    let mut text = first.to_string();
    for (op, n) in rest {
        text.push_str(&format!(" {} {}", op, n));
    }
    text
}

/// Reference evaluation: fold the multiplicative level first, then the additive one
fn reference(first: i64, rest: &[(char, i64)]) -> i64 {
    let mut terms = vec![first];
    let mut signs = Vec::new();
    for &(op, n) in rest {
        match op {
            '+' | '-' => {
                signs.push(op);
                terms.push(n);
            }
            _ => {
                let last = terms.last_mut().expect("at least one term");
                *last = match op {
                    '*' => *last * n,
                    '/' => *last / n,
                    _ => *last % n,
                };
            }
        }
    }
    let mut total = terms[0];
    for (sign, term) in signs.iter().zip(&terms[1..]) {
        total = if *sign == '+' { total + term } else { total - term };
    }
    total
}

/// Small well-formed programs mixing declarations, control flow, and calls
fn program() -> impl Strategy<Value = String> {
    let statement = prop_oneof![
        (0i64..50).prop_map(|n| format!("x = x + {};", n)),
        (0i64..50).prop_map(|n| format!("if (x < {}) {{ x++; }} else {{ x--; }}", n)),
        Just("while (x > 100) { x = x / 2; }".to_string()),
        Just("for (int i = 0; i < 3; i++) { x += i; }".to_string()),
        (1i64..9).prop_map(|n| format!("x *= {};", n)),
        Just("{ int y = x * 2; x = y / 2; }".to_string()),
    ];
    prop::collection::vec(statement, 0..10)
        .prop_map(|stmts| format!("int x = 1;\n{}\nint main() {{ return x; }}", stmts.join("\n")))
}

fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x20-\x7E\n]{0,200}").expect("valid regex")
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_integer_precedence((first, rest) in arithmetic_terms()) {
        let source = render(first, &rest);
        let mut parser = Parser::new(&source);
        let expr = parser.parse_expression().expect("expression should parse");
        let mut interpreter = Interpreter::new(parser.source(), &Config::default());
        let value = interpreter.evaluate_expr(&expr).expect("expression should evaluate");
        prop_assert_eq!(value, Value::Int(reference(first, &rest)));
    }

    #[test]
    fn prop_spans_never_end_before_they_start(source in program()) {
        let mut parser = Parser::new(&source);
        let module = parser.parse_module().expect("program should parse");
        for row in tree_rows(&module) {
            prop_assert!(row.span.end >= row.span.start, "{} @ {}", row.label, row.span);
        }
    }

    #[test]
    fn prop_generated_programs_run(source in program()) {
        let mut parser = Parser::new(&source);
        let module = parser.parse_module().expect("program should parse");
        let mut interpreter = Interpreter::new(parser.source(), &Config::default());
        let result = interpreter.run(&module).expect("program should run");
        prop_assert_eq!(result, interpreter.lookup("x"));
    }

    #[test]
    fn prop_parser_never_panics(source in arbitrary_source_string()) {
        let mut parser = Parser::new(&source);
        let _ = parser.parse_module();
    }
}

#[test]
fn test_float_promotion() {
    let mut parser = Parser::new("int a = 7 / 2; float b = 7 / 2.0; float c = 1.5 + 1;");
    let module = parser.parse_module().unwrap();
    let mut interpreter = Interpreter::new(parser.source(), &Config::default());
    interpreter.run(&module).unwrap();
    assert_eq!(interpreter.lookup("a"), Some(Value::Int(3)));
    assert_eq!(interpreter.lookup("b"), Some(Value::Float(3.5)));
    assert_eq!(interpreter.lookup("c"), Some(Value::Float(2.5)));
}
