use larder_catalog::pricing::{price_fresh, price_industrial_grade_d, price_industrial_standard};
use larder_catalog::{
    calculate_sell_price, FreshMarginTable, Grade, IndustrialMargin, IndustrialMarginTable, Product,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn fresh_table(steps: &[f64]) -> FreshMarginTable {
    // cumulative steps keep the table non-decreasing from S to E
    let mut running = 0.0;
    Grade::ALL
        .into_iter()
        .zip(steps.iter())
        .map(|(grade, step)| {
            running += step;
            (grade, running)
        })
        .collect()
}

fn industrial_table() -> IndustrialMarginTable {
    Grade::ALL
        .into_iter()
        .zip([1.02, 1.04, 1.06, 1.08, 1.0, 1.12])
        .map(|(grade, m)| (grade, IndustrialMargin::new(m, 1.0)))
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn fresh_price_is_monotonic_across_grades(
        buy_price in 0.0_f64..10_000.0,
        adj in -500.0_f64..500.0,
        steps in prop::collection::vec(0.0_f64..50.0, 6)
    ) {
        let fresh = fresh_table(&steps);
        let industrial = industrial_table();
        let product = Product::fresh("VEG-1");

        let prices: Vec<f64> = Grade::ALL
            .into_iter()
            .map(|grade| {
                calculate_sell_price(&product, grade, &fresh, &industrial, buy_price, adj)
                    .unwrap()
                    .sell_price
            })
            .collect();

        for pair in prices.windows(2) {
            prop_assert!(pair[0] <= pair[1], "prices not monotonic: {:?}", prices);
        }
    }

    #[test]
    fn pricing_is_pure(
        pur in 0.0_f64..5_000.0,
        min in 0.0_f64..5_000.0,
        mid in 0.0_f64..5_000.0,
        adj in -100.0_f64..100.0,
        grade_index in 0_usize..6
    ) {
        let grade = Grade::ALL[grade_index];
        let fresh = fresh_table(&[1.0; 6]);
        let industrial = industrial_table();
        let product = Product::industrial("CAN-1", pur, Some(min), Some(mid));

        let first = calculate_sell_price(&product, grade, &fresh, &industrial, 0.0, adj).unwrap();
        let second = calculate_sell_price(&product, grade, &fresh, &industrial, 0.0, adj).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.margin_percent.is_some(), grade == Grade::D);
    }

    #[test]
    fn standard_price_rounds_before_adjustment(
        pur in 0.0_f64..5_000.0,
        multiplier in 0.5_f64..3.0,
        adj in -100.0_f64..100.0
    ) {
        let base = price_industrial_standard(pur, multiplier, 0.0);
        prop_assert_eq!(base, base.round());
        prop_assert_eq!(price_industrial_standard(pur, multiplier, adj), base + adj);
    }

    #[test]
    fn renegotiation_flag_is_strictly_below_threshold(
        pur in 0.0_f64..1_000.0,
        min in 0.0_f64..1_000.0,
        mid in 0.0_f64..1_000.0,
        threshold in -20.0_f64..40.0
    ) {
        let result = price_industrial_grade_d(min, mid, pur, threshold, 0.0);
        let margin = result.margin_percent.unwrap();
        prop_assert_eq!(result.sell_price, min.max(mid));
        prop_assert_eq!(result.needs_renegotiation, Some(margin < threshold));
    }
}

#[test]
fn fresh_formula_examples() {
    assert_eq!(price_fresh(30.0, 10.0, 0.0), 40.0);
    assert_eq!(price_fresh(30.0, 10.0, -5.0), 35.0);
}

#[test]
fn grade_d_examples() {
    let flagged = price_industrial_grade_d(50.0, 60.0, 65.0, 5.0, 0.0);
    assert_eq!(flagged.sell_price, 60.0);
    assert_eq!(flagged.margin_percent, Some(-7.7));
    assert_eq!(flagged.needs_renegotiation, Some(true));

    let healthy = price_industrial_grade_d(50.0, 60.0, 55.0, 5.0, 0.0);
    assert_eq!(healthy.margin_percent, Some(9.1));
    assert_eq!(healthy.needs_renegotiation, Some(false));

    let zero_cost = price_industrial_grade_d(50.0, 60.0, 0.0, 5.0, 0.0);
    assert_eq!(zero_cost.margin_percent, Some(0.0));
    assert_eq!(zero_cost.needs_renegotiation, Some(true));
}
