//! Invariants that hold for any input, checked with generated cases.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rootsolve_core::arith::{divide, round};
use rootsolve_core::solver::compute_error;
use rootsolve_core::{
    bisection, false_position, fixed_point, newton_raphson, secant, Bracket, Decimal, Fx,
    IterationResult, RoundingMode, RunConfig,
};

fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..14).prop_map(|(m, s)| Decimal::new(m, s))
}

fn divisor_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000, any::<bool>(), 0u32..4).prop_map(|(m, neg, s)| {
        let d = Decimal::new(m, s);
        if neg {
            -d
        } else {
            d
        }
    })
}

fn rounding_strategy() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::HalfEven),
        Just(RoundingMode::HalfUp),
        Just(RoundingMode::HalfDown),
        Just(RoundingMode::Up),
        Just(RoundingMode::Down),
        Just(RoundingMode::Ceiling),
        Just(RoundingMode::Floor),
    ]
}

fn fx(source: &str) -> Fx {
    Fx::parse(source).unwrap()
}

/// At most `max_iterations` passes, numbered from 1, with an error on every
/// pass but the first and every approximation at the output scale.
fn assert_well_formed(
    result: &IterationResult,
    max_iterations: usize,
    cfg: &RunConfig,
) -> Result<(), TestCaseError> {
    let its = result.iterations();
    prop_assert!(its.len() <= max_iterations);
    for (i, it) in its.iter().enumerate() {
        prop_assert_eq!(it.index, i + 1);
        prop_assert_eq!(it.error.is_none(), i == 0);
        prop_assert_eq!(it.x_new.scale(), cfg.output_scale);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn round_is_idempotent_and_exact_scale(
        value in decimal_strategy(),
        scale in 0u32..10,
        mode in rounding_strategy(),
    ) {
        let once = round(&value, scale, mode);
        prop_assert_eq!(once.scale(), scale);
        prop_assert_eq!(round(&once, scale, mode), once);
    }

    #[test]
    fn divide_lands_on_requested_scale(
        a in decimal_strategy(),
        b in divisor_strategy(),
        scale in 0u32..10,
        mode in rounding_strategy(),
    ) {
        prop_assume!(!round(&b, scale, mode).is_zero());
        let q = divide(&a, &b, scale, mode).unwrap();
        prop_assert_eq!(q.scale(), scale);
    }

    #[test]
    fn first_error_is_always_absent(x in decimal_strategy(), scale in 0u32..10) {
        prop_assert_eq!(compute_error(None, &x, scale, RoundingMode::HalfEven).unwrap(), None);
    }

    #[test]
    fn min_iterations_are_honoured(min in 0usize..15) {
        // A constant g repeats its value from the second pass on
        let cfg = RunConfig::new().with_min_iterations(min).with_max_iterations(50);
        let result = fixed_point(&fx("1"), Some(Decimal::zero()), &cfg).unwrap();
        prop_assert_eq!(result.iterations().len(), min.max(2));
    }
}

// Every engine keeps the same history shape.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bisection_history_is_well_formed(
        root in 1_000i64..100_000,
        left in 1i64..10,
        right in 1i64..50,
        max_iterations in 0usize..40,
    ) {
        let c = Decimal::new(root, 2);
        let f = fx(&format!("x - ({})", c));
        let bracket = Bracket::new(&c - Decimal::from(left), &c + Decimal::from(right));
        let cfg = RunConfig::new().with_max_iterations(max_iterations);

        let result = bisection(&f, Some(bracket.clone()), &cfg).unwrap();
        assert_well_formed(&result, max_iterations, &cfg)?;

        // Same inputs, same history
        prop_assert_eq!(bisection(&f, Some(bracket), &cfg).unwrap(), result);
    }

    #[test]
    fn false_position_history_is_well_formed(
        root in 1_000i64..100_000,
        left in 1i64..10,
        right in 1i64..50,
        max_iterations in 0usize..40,
    ) {
        let c = Decimal::new(root, 2);
        let f = fx(&format!("3 * x - 3 * ({})", c));
        let bracket = Bracket::new(&c - Decimal::from(left), &c + Decimal::from(right));
        let cfg = RunConfig::new().with_max_iterations(max_iterations);

        let result = false_position(&f, Some(bracket.clone()), &cfg).unwrap();
        assert_well_formed(&result, max_iterations, &cfg)?;
        prop_assert_eq!(false_position(&f, Some(bracket), &cfg).unwrap(), result);
    }

    #[test]
    fn fixed_point_history_is_well_formed(
        shift in 10i64..1_000,
        start in 0i64..1_000,
        max_iterations in 0usize..60,
    ) {
        // g(x) = x/2 + c contracts onto 2c and never reaches zero from x >= 0
        let g = fx(&format!("x / 2 + {}", shift));
        let cfg = RunConfig::new().with_max_iterations(max_iterations);

        let result = fixed_point(&g, Some(Decimal::from(start)), &cfg).unwrap();
        assert_well_formed(&result, max_iterations, &cfg)?;
        prop_assert_eq!(fixed_point(&g, Some(Decimal::from(start)), &cfg).unwrap(), result);
    }

    #[test]
    fn newton_history_is_well_formed(
        k in 3i64..30,
        start in 1i64..100,
        max_iterations in 0usize..40,
    ) {
        // k^2 + 1 is never a perfect square, so no pass lands exactly on the root
        let f = fx(&format!("x^2 - {}", k * k + 1));
        let df = fx("2 * x");
        let cfg = RunConfig::new().with_max_iterations(max_iterations);

        let result = newton_raphson(&f, &df, Some(Decimal::from(start)), &cfg).unwrap();
        assert_well_formed(&result, max_iterations, &cfg)?;
        prop_assert_eq!(
            newton_raphson(&f, &df, Some(Decimal::from(start)), &cfg).unwrap(),
            result
        );
    }

    #[test]
    fn secant_history_is_well_formed(
        k in 3i64..30,
        start in 1i64..100,
        gap in 1i64..10,
        max_iterations in 0usize..40,
    ) {
        // For x^2 - c the secant step is (ab + c) / (a + b), positive for positive seeds
        let f = fx(&format!("x^2 - {}", k * k + 1));
        let a = Decimal::from(start);
        let b = Decimal::from(start + gap);
        let cfg = RunConfig::new().with_max_iterations(max_iterations);

        let result = secant(&f, Some(a.clone()), Some(b.clone()), &cfg).unwrap();
        assert_well_formed(&result, max_iterations, &cfg)?;
        prop_assert_eq!(secant(&f, Some(a), Some(b), &cfg).unwrap(), result);
    }
}
