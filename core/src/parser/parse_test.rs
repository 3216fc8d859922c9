use pretty_assertions::assert_eq;

use super::*;
use crate::lexer::LexErrorKind;

fn parse_ok(source: &str) -> Expr {
    parse(source).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e))
}

fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(expr) => panic!("Expected parse error for {:?}, got {}", source, expr),
        Err(err) => err,
    }
}

#[test]
fn test_valid_expressions() {
    let examples = [
        "1 + 2",
        "a * b + c",
        "score > 100 && lives > 0",
        "!alive",
        "-x",
        "x ? 1 : 2",
        "min(1, 2)",
        "rand()",
        "vec2(1, 2)",
        "vec2(1, 2).x",
        "self.transform.x",
        "self.velocity.y * dt",
        "items.length",
        "\"text\"",
        "'text'",
        "`Score: ${score}`",
        "``",
        "`${a}${b}`",
        "`outer ${ `inner ${x}` }`",
        "1e3",
        "2.5E-2",
        "(((1)))",
        "choose(1, 2, 3) + weightedChoice(1, 0.5, 2, 0.5)",
    ];

    for example in examples {
        if let Err(e) = parse(example) {
            panic!("Failed to parse {:?}: {}", example, e);
        }
    }
}

#[test]
fn test_literals() {
    assert_eq!(parse_ok("42").kind, ExprKind::Number(42.0));
    assert_eq!(parse_ok("3.5").kind, ExprKind::Number(3.5));
    assert_eq!(parse_ok("1e3").kind, ExprKind::Number(1000.0));
    assert_eq!(parse_ok("true").kind, ExprKind::Bool(true));
    assert_eq!(parse_ok("false").kind, ExprKind::Bool(false));
    assert_eq!(parse_ok("'hi'").kind, ExprKind::Str("hi".into()));
}

#[test]
fn test_spans_cover_source() {
    let expr = parse_ok("  a + bc  ");
    assert_eq!(expr.span, Span::new(2, 8));

    let ExprKind::Binary { left, right, .. } = &expr.kind else {
        panic!("expected binary, got {:?}", expr.kind);
    };
    assert_eq!(left.span, Span::new(2, 3));
    assert_eq!(right.span, Span::new(6, 8));
}

#[test]
fn test_vector_literal() {
    let expr = parse_ok("vec2(1, x + 1)");
    let ExprKind::Vector { x, y } = &expr.kind else {
        panic!("expected vector literal, got {:?}", expr.kind);
    };
    assert_eq!(x.kind, ExprKind::Number(1.0));
    assert_eq!(y.to_string(), "(x + 1)");
    assert_eq!(expr.span, Span::new(0, 14));
}

#[test]
fn test_vector_literal_needs_two_components() {
    let err = parse_err("vec2(1)");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "','".to_string(),
            found: "')'".to_string()
        }
    );

    let err = parse_err("vec2(1, 2, 3)");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "')'".to_string(),
            found: "','".to_string()
        }
    );
}

#[test]
fn test_vec2_without_parens_is_identifier() {
    assert_eq!(parse_ok("vec2").kind, ExprKind::Ident("vec2".into()));
}

#[test]
fn test_function_call() {
    let expr = parse_ok("clamp(x, 0, 10)");
    let ExprKind::Call {
        name,
        name_span,
        args,
    } = &expr.kind
    else {
        panic!("expected call, got {:?}", expr.kind);
    };
    assert_eq!(name.as_str(), "clamp");
    assert_eq!(*name_span, Span::new(0, 5));
    assert_eq!(args.len(), 3);
}

#[test]
fn test_call_on_member_is_rejected() {
    let err = parse_err("a.b()");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "end of input".to_string(),
            found: "'('".to_string()
        }
    );
    assert_eq!((err.line, err.column), (1, 4));
}

#[test]
fn test_call_on_call_is_rejected() {
    assert!(parse("f()()").is_err());
}

#[test]
fn test_member_access() {
    let expr = parse_ok("self.transform.angle");
    let ExprKind::Member { object, property } = &expr.kind else {
        panic!("expected member access, got {:?}", expr.kind);
    };
    assert_eq!(property.as_str(), "angle");
    assert_eq!(object.to_string(), "self.transform");
}

#[test]
fn test_template_parts() {
    let expr = parse_ok("`Score: ${score * 2} pts`");
    let ExprKind::Template(parts) = &expr.kind else {
        panic!("expected template, got {:?}", expr.kind);
    };
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], TemplatePart::Text("Score: ".into()));
    let TemplatePart::Expr(inner) = &parts[1] else {
        panic!("expected expression part");
    };
    assert_eq!(inner.to_string(), "(score * 2)");
    assert_eq!(parts[2], TemplatePart::Text(" pts".into()));
}

#[test]
fn test_empty_template() {
    assert_eq!(parse_ok("``").kind, ExprKind::Template(vec![]));
}

#[test]
fn test_empty_template_expression_is_error() {
    let err = parse_err("`a ${} b`");
    assert!(matches!(
        err.kind,
        ParseErrorKind::UnexpectedToken { ref expected, .. } if expected == "expression"
    ));
}

#[test]
fn test_unexpected_token_reports_line_and_column() {
    let err = parse_err("1 +\n  * 2");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "expression".to_string(),
            found: "'*'".to_string()
        }
    );
    assert_eq!((err.line, err.column), (2, 3));
    assert_eq!(err.source, "1 +\n  * 2");
}

#[test]
fn test_missing_colon_in_ternary() {
    let err = parse_err("a ? b");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "':'".to_string(),
            found: "end of input".to_string()
        }
    );
}

#[test]
fn test_unclosed_paren() {
    let err = parse_err("(1 + 2");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "')'".to_string(),
            found: "end of input".to_string()
        }
    );
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse_err("1 2");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "end of input".to_string(),
            found: "number '2'".to_string()
        }
    );
}

#[test]
fn test_lex_errors_surface_as_parse_errors() {
    let err = parse_err("\"abc");
    assert_eq!(err.kind, ParseErrorKind::Lex(LexErrorKind::UnterminatedString));
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("P002"));

    let err = parse_err("1 # 2");
    assert_eq!(err.kind, ParseErrorKind::Lex(LexErrorKind::UnexpectedChar('#')));
    assert_eq!((err.line, err.column), (1, 3));
}

#[test]
fn test_empty_input() {
    let err = parse_err("");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "expression".to_string(),
            found: "end of input".to_string()
        }
    );
}

#[test]
fn test_max_depth_exceeded() {
    let source = format!("{}1{}", "(".repeat(20), ")".repeat(20));
    assert!(parse_with_max_depth(&source, 64).is_ok());

    let err = parse_with_max_depth(&source, 10).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 10 });
}

#[test]
fn test_deep_unary_chain_is_bounded() {
    let source = format!("{}1", "-".repeat(10_000));
    let err = parse(&source).unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::MaxDepthExceeded {
            max_depth: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn test_long_binary_chain_is_bounded() {
    let source = vec!["1"; 10_000].join("+");
    assert_eq!(
        parse(&source).unwrap_err().kind,
        ParseErrorKind::MaxDepthExceeded {
            max_depth: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn test_long_member_chain_is_bounded() {
    let source = format!("v{}", ".x".repeat(10_000));
    assert_eq!(
        parse(&source).unwrap_err().kind,
        ParseErrorKind::MaxDepthExceeded {
            max_depth: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn test_chain_steps_count_toward_depth() {
    let sum = vec!["1"; 10].join(" + ");
    assert!(parse_with_max_depth(&sum, 64).is_ok());
    assert_eq!(
        parse_with_max_depth(&sum, 2).unwrap_err().kind,
        ParseErrorKind::MaxDepthExceeded { max_depth: 2 }
    );

    let members = format!("v{}", ".x".repeat(10));
    assert!(parse_with_max_depth(&members, 64).is_ok());
    assert!(parse_with_max_depth(&members, 2).is_err());
}

#[test]
fn test_dependencies_exclude_globals_and_function_names() {
    let expr = parse_ok("min(a, score) + b * a + self.health + PI + `${c}`");
    let dependencies = expr.dependencies();
    let deps: Vec<&str> = dependencies.iter().map(|d| d.as_str()).collect();
    assert_eq!(deps, vec!["a", "b", "c"]);
}

#[test]
fn test_expression_depth() {
    assert_eq!(parse_ok("1").depth(), 1);
    assert_eq!(parse_ok("1 + 2").depth(), 2);
    assert_eq!(parse_ok("-(1 + abs(x))").depth(), 4);
}

#[test]
fn test_display_round_trips_through_parser() {
    for source in [
        "a + b * c",
        "x ? vec2(1, 2) : -v",
        "`hp: ${self.health}/${self.maxHealth}`",
        "listGet(list(1, 2, 3), 1)",
        "'quote\"d'",
    ] {
        let printed = parse_ok(source).to_string();
        assert_eq!(parse_ok(&printed).to_string(), printed, "source: {source}");
    }
}

mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::evaluator::{self, EvalContext};

    fn arithmetic() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            (0u32..1000).prop_map(|n| n.to_string()),
            Just("score".to_string()),
            Just("wave".to_string()),
        ];
        leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![
                (inner.clone(), prop_oneof![Just("+"), Just("-"), Just("*")], inner.clone())
                    .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
                inner.prop_map(|e| format!("-{e}")),
            ]
        })
    }

    proptest! {
        #[test]
        fn parse_and_eval_never_panic(source in "[ -~é]{0,64}") {
            if let Ok(expr) = parse(&source) {
                let _ = evaluator::eval(&expr, &EvalContext::default());
            }
        }

        #[test]
        fn printed_arithmetic_reparses(source in arithmetic()) {
            let printed = parse_ok(&source).to_string();
            prop_assert_eq!(parse_ok(&printed).to_string(), printed);
        }

        #[test]
        fn arithmetic_always_evaluates(source in arithmetic()) {
            let expr = parse_ok(&source);
            prop_assert!(evaluator::eval(&expr, &EvalContext::default()).is_ok());
        }
    }
}
