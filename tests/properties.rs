//! Property tests for seeded randomness and frame caching.

use gamexpr::{
    BuildOptions, ComputedValueSystem, EvalContext, EvalContextBuilder, ExpressionValue,
    GameState, RuntimeValue, Value, VariableMap,
};
use proptest::prelude::*;

fn random_table() -> VariableMap {
    serde_json::from_str(
        r#"{
            "roll": {"expr": "rand()"},
            "die": {"expr": "randomInt(1, 6)"},
            "spread": {"expr": "rand(-1, 1) * roll"}
        }"#,
    )
    .unwrap()
}

fn build(variables: &VariableMap, seed: u32) -> EvalContext {
    EvalContextBuilder::new()
        .build(BuildOptions::new(GameState::default(), variables).with_seed(seed))
        .unwrap()
}

proptest! {
    #[test]
    fn same_seed_same_values(seed in any::<u32>()) {
        let variables = random_table();
        let first = build(&variables, seed);
        let second = build(&variables, seed);
        prop_assert_eq!(&first.variables, &second.variables);
        prop_assert_eq!(first.random(), second.random());
    }

    #[test]
    fn different_seeds_differ(a in 1u32..1_000_000, b in 1u32..1_000_000) {
        prop_assume!(a != b);
        let variables = random_table();
        prop_assert_ne!(
            &build(&variables, a).variables["roll"],
            &build(&variables, b).variables["roll"]
        );
    }

    #[test]
    fn rand_stays_in_range(seed in any::<u32>()) {
        let ctx = build(&random_table(), seed);
        let RuntimeValue::Number(roll) = ctx.variables["roll"] else {
            panic!("roll is not a number");
        };
        prop_assert!((0.0..=1.0).contains(&roll));
        let RuntimeValue::Number(die) = ctx.variables["die"] else {
            panic!("die is not a number");
        };
        prop_assert!((1.0..=6.0).contains(&die) && die.fract() == 0.0);
    }

    #[test]
    fn frame_cache_is_stable_within_a_frame(
        seed in any::<u32>(),
        frame_id in any::<u64>(),
        repeats in 1usize..20,
    ) {
        let mut system = ComputedValueSystem::new();
        let ctx = EvalContext::with_seed(GameState { frame_id, ..GameState::default() }, seed);
        let field: Value<f64> = ExpressionValue::new("rand() * 100").frame_cached().into();

        let first = system.resolve_number(&field, &ctx).unwrap();
        for _ in 0..repeats {
            prop_assert_eq!(system.resolve_number(&field, &ctx).unwrap(), first);
        }
    }

    #[test]
    fn frame_cache_follows_frame_id(frames in proptest::collection::vec(0u64..1000, 1..30)) {
        let mut system = ComputedValueSystem::new();
        let field: Value<f64> = ExpressionValue::new("frameId * 2").frame_cached().into();
        for frame_id in frames {
            let ctx = EvalContext::new(GameState { frame_id, ..GameState::default() });
            prop_assert_eq!(system.resolve_number(&field, &ctx).unwrap(), frame_id as f64 * 2.0);
        }
    }
}
