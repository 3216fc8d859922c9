use std::sync::Arc;

use ecow::EcoString;
use pretty_assertions::assert_eq;

use super::*;
use crate::api::{EngineOptions, ExpressionValue};
use crate::evaluator::{
    EntityContext, EntityQuery, EntitySnapshot, EvalContext, EvalErrorKind, GameState, Transform,
};
use crate::values::{RuntimeValue, Vec2};

fn expr(source: &str) -> GameVariable {
    ExpressionValue::new(source).into()
}

fn table(entries: Vec<(&str, GameVariable)>) -> VariableMap {
    let mut map = VariableMap::new();
    for (name, variable) in entries {
        map.insert(name, variable).unwrap();
    }
    map
}

fn build(variables: &VariableMap) -> Result<EvalContext, BuildError> {
    build_eval_context(BuildOptions::new(GameState::default(), variables))
}

fn number(ctx: &EvalContext, name: &str) -> f64 {
    match ctx.variables.get(name) {
        Some(RuntimeValue::Number(n)) => *n,
        other => panic!("{name} is not a number: {other:?}"),
    }
}

#[test]
fn test_chain_resolves_in_any_declaration_order() {
    let orders = [
        vec![("a", GameVariable::from(10.0)), ("b", expr("a * 2")), ("c", expr("b + 5"))],
        vec![("c", expr("b + 5")), ("b", expr("a * 2")), ("a", GameVariable::from(10.0))],
        vec![("b", expr("a * 2")), ("c", expr("b + 5")), ("a", GameVariable::from(10.0))],
    ];
    for entries in orders {
        let ctx = build(&table(entries)).unwrap();
        assert_eq!(number(&ctx, "a"), 10.0);
        assert_eq!(number(&ctx, "b"), 20.0);
        assert_eq!(number(&ctx, "c"), 25.0);
    }
}

#[test]
fn test_diamond_dependencies() {
    let variables = table(vec![
        ("total", expr("left + right")),
        ("left", expr("root * 2")),
        ("right", expr("root * 3")),
        ("root", GameVariable::from(1.5)),
    ]);
    let ctx = build(&variables).unwrap();
    assert_eq!(number(&ctx, "total"), 7.5);
}

#[test]
fn test_self_reference_is_a_cycle() {
    let err = build(&table(vec![("a", expr("a + 1"))])).unwrap_err();
    assert_eq!(
        err,
        BuildError::CyclicDependency {
            cycle: vec!["a".into()],
            variable_name: "a".into(),
        }
    );
    assert_eq!(err.to_string(), "Cyclic dependency detected: a -> a");
}

#[test]
fn test_mutual_cycle() {
    let variables = table(vec![
        ("start", GameVariable::from(1.0)),
        ("a", expr("b + start")),
        ("b", expr("c")),
        ("c", expr("a * 2")),
    ]);
    let err = build(&variables).unwrap_err();
    let BuildError::CyclicDependency {
        cycle,
        variable_name,
    } = err
    else {
        panic!("expected a cycle");
    };
    assert_eq!(variable_name, EcoString::from("a"));
    assert_eq!(cycle, vec![EcoString::from("a"), "b".into(), "c".into()]);
}

#[test]
fn test_unknown_variable() {
    let variables = table(vec![
        ("base", GameVariable::from(3.0)),
        ("result", expr("base + unknownVar")),
    ]);
    assert_eq!(
        build(&variables).unwrap_err(),
        BuildError::UnknownVariable {
            variable_name: "unknownVar".into(),
            referenced_in: "result".into(),
        }
    );
}

#[test]
fn test_unknown_variable_is_reported_before_cycles() {
    let variables = table(vec![("a", expr("a")), ("b", expr("missing"))]);
    assert!(matches!(
        build(&variables),
        Err(BuildError::UnknownVariable { .. })
    ));
}

#[test]
fn test_reserved_globals_are_not_dependencies() {
    let variables = table(vec![("bonus", expr("score * 0.1 + lives + wave"))]);
    let ctx = build_eval_context(BuildOptions::new(
        GameState {
            score: 100.0,
            ..GameState::default()
        },
        &variables,
    ))
    .unwrap();
    assert_eq!(number(&ctx, "bonus"), 10.0 + 3.0 + 1.0);
}

#[test]
fn test_compile_error_names_variable() {
    let variables = table(vec![("broken", expr("1 +"))]);
    match build(&variables).unwrap_err() {
        BuildError::Compile { variable, .. } => assert_eq!(variable, EcoString::from("broken")),
        other => panic!("expected compile error, got {other:?}"),
    }
}

#[test]
fn test_evaluation_error_names_variable() {
    let variables = table(vec![("zero", GameVariable::from(0.0)), ("ratio", expr("1 / zero"))]);
    match build(&variables).unwrap_err() {
        BuildError::Evaluation { variable, error } => {
            assert_eq!(variable, EcoString::from("ratio"));
            assert_eq!(error.kind, EvalErrorKind::DivisionByZero);
        }
        other => panic!("expected evaluation error, got {other:?}"),
    }
}

#[test]
fn test_tuned_variables_are_unwrapped() {
    let variables: VariableMap = serde_json::from_str(
        r#"{
            "gravity": {"value": 800, "label": "Gravity", "tuning": {"min": 0, "max": 2000, "step": 10}},
            "jumpForce": {"value": {"expr": "gravity * 0.5"}, "category": "player"},
            "spawn": {"x": 10, "y": 20},
            "theme": "dark"
        }"#,
    )
    .unwrap();

    let ctx = build(&variables).unwrap();
    assert_eq!(number(&ctx, "gravity"), 800.0);
    assert_eq!(number(&ctx, "jumpForce"), 400.0);
    assert_eq!(
        ctx.variables["spawn"],
        RuntimeValue::Vec2(Vec2::new(10.0, 20.0))
    );
    assert_eq!(ctx.variables["theme"], RuntimeValue::from("dark"));
}

#[test]
fn test_seed_determinism() {
    let variables = table(vec![("roll", expr("rand()")), ("pick", expr("randomInt(1, 100)"))]);
    let build_with = |seed| {
        EvalContextBuilder::new()
            .build(BuildOptions::new(GameState::default(), &variables).with_seed(seed))
            .unwrap()
    };

    let first = build_with(7);
    let second = build_with(7);
    assert_eq!(first.variables, second.variables);
    // The returned generator starts over from the seed.
    assert_eq!(first.random(), second.random());

    let other = build_with(8);
    assert_ne!(first.variables["roll"], other.variables["roll"]);
}

#[test]
fn test_returned_random_restarts_from_seed() {
    let variables = table(vec![("roll", expr("rand()"))]);
    let ctx = EvalContextBuilder::new()
        .build(BuildOptions::new(GameState::default(), &variables).with_seed(42))
        .unwrap();
    assert_eq!(ctx.variables["roll"], RuntimeValue::Number(ctx.random()));
}

#[test]
fn test_self_and_entities_are_visible() {
    struct Enemies;

    impl EntityQuery for Enemies {
        fn entities_by_tag(&self, tag: &str) -> Vec<EntitySnapshot> {
            if tag != "enemy" {
                return Vec::new();
            }
            vec![EntitySnapshot {
                id: "e1".into(),
                position: Vec2::new(3.0, 4.0),
            }]
        }
    }

    let variables = table(vec![
        ("reach", expr("self.transform.x + 1")),
        ("enemies", expr("entityCount('enemy')")),
    ]);
    let ctx = EvalContextBuilder::new()
        .build(
            BuildOptions::new(GameState::default(), &variables)
                .with_self(EntityContext::new(
                    "player",
                    Transform {
                        x: 4.0,
                        y: 0.0,
                        angle: 0.0,
                    },
                ))
                .with_entity_query(Arc::new(Enemies)),
        )
        .unwrap();
    assert_eq!(number(&ctx, "reach"), 5.0);
    assert_eq!(number(&ctx, "enemies"), 1.0);
    assert!(ctx.self_entity.is_some());
}

#[test]
fn test_builder_is_reusable() {
    let builder = EvalContextBuilder::with_options(EngineOptions::default());
    let ok = table(vec![("a", GameVariable::from(1.0))]);
    let cyclic = table(vec![("x", expr("y")), ("y", expr("x"))]);

    assert!(builder.build(BuildOptions::new(GameState::default(), &cyclic)).is_err());
    let ctx = builder.build(BuildOptions::new(GameState::default(), &ok)).unwrap();
    assert_eq!(number(&ctx, "a"), 1.0);
}

#[test]
fn test_empty_table() {
    let ctx = build(&VariableMap::new()).unwrap();
    assert!(ctx.variables.is_empty());
}
