use agrofuzzy::{
    Antecedent, Consequent, Engine, InferenceRecord, Inputs, LinguisticVariable, Rule, Triangle, Universe,
    select_best_month,
};
use proptest::prelude::*;

fn breakpoints() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0..100.0f64, 0.0..50.0f64, 0.0..50.0f64).prop_map(|(a, left, right)| (a, a + left, a + left + right))
}

/// `x` and `y` over `[0, 10]` with a single `t` term; `z` is fired by AND and OR.
fn two_input_engine() -> Engine {
    let universe = Universe::new(0.0, 10.0, 1.0).unwrap();
    let t = Triangle::new(0.0, 5.0, 10.0).unwrap();
    let x = LinguisticVariable::antecedent("x", universe.clone()).unwrap().with_term("t", t).unwrap();
    let y = LinguisticVariable::antecedent("y", universe.clone()).unwrap().with_term("t", t).unwrap();
    let z = LinguisticVariable::consequent("z", universe)
        .unwrap()
        .with_term("lo", Triangle::new(0.0, 0.0, 5.0).unwrap())
        .unwrap()
        .with_term("hi", Triangle::new(5.0, 10.0, 10.0).unwrap())
        .unwrap();
    let rules = vec![
        Rule::new("both", Antecedent::is("x", "t") & Antecedent::is("y", "t"), Consequent::new("z", "lo")),
        Rule::new("either", Antecedent::is("x", "t") | Antecedent::is("y", "t"), Consequent::new("z", "hi")),
    ];
    Engine::new(vec![x, y, z], rules).unwrap()
}

proptest! {
    #[test]
    fn degree_is_a_membership_grade((a, b, c) in breakpoints(), x in -200.0..200.0f64) {
        let t = Triangle::new(a, b, c).unwrap();
        let mu = t.degree(x);
        prop_assert!((0.0..=1.0).contains(&mu), "degree({x}) = {mu}");
        prop_assert_eq!(t.degree(b), 1.0);
        if a < b {
            prop_assert_eq!(t.degree(a), 0.0);
        }
        if b < c {
            prop_assert_eq!(t.degree(c), 0.0);
        }
    }

    #[test]
    fn degree_rises_then_falls((a, b, c) in breakpoints(), p in 0.0..1.0f64, q in 0.0..1.0f64) {
        let t = Triangle::new(a, b, c).unwrap();
        let (lo, hi) = if p <= q { (p, q) } else { (q, p) };

        let (x1, x2) = (a + lo * (b - a), a + hi * (b - a));
        prop_assert!(t.degree(x1) <= t.degree(x2) + 1e-12);

        let (x1, x2) = (b + lo * (c - b), b + hi * (c - b));
        prop_assert!(t.degree(x1) + 1e-12 >= t.degree(x2));
    }

    #[test]
    fn and_is_min_or_is_max(x in -2.0..12.0f64, y in -2.0..12.0f64) {
        let engine = two_input_engine();
        let t = Triangle::new(0.0, 5.0, 10.0).unwrap();
        let trace = engine.compute_verbose(&Inputs::new().with("x", x).with("y", y)).unwrap();

        prop_assert_eq!(trace.firings[0].strength, t.degree(x).min(t.degree(y)));
        prop_assert_eq!(trace.firings[1].strength, t.degree(x).max(t.degree(y)));
    }

    #[test]
    fn compute_is_deterministic(x in 0.0..10.0f64, y in 0.0..10.0f64) {
        let engine = two_input_engine();
        let inputs = Inputs::new().with("x", x).with("y", y);
        prop_assert_eq!(engine.compute(&inputs).unwrap(), engine.compute(&inputs).unwrap());
    }

    #[test]
    fn symmetric_triangle_centroid_is_its_peak(m in 20u32..80, w in 1u32..20) {
        let (m, w) = (f64::from(m), f64::from(w));
        let universe = Universe::new(0.0, 100.0, 0.5).unwrap();
        let curve = Triangle::new(m - w, m, m + w).unwrap().sample(&universe);
        let out = LinguisticVariable::consequent("z", universe).unwrap().defuzzify(&curve);
        prop_assert!(!out.undefined);
        prop_assert!((out.value - m).abs() < 1e-9, "centroid {} != {}", out.value, m);
    }

    #[test]
    fn scan_keeps_first_of_equal_scores(
        rain in 0.0..300.0f64,
        temp in 0.0..50.0f64,
        copies in 1usize..6,
    ) {
        let records = vec![InferenceRecord::new("Maio", rain, temp); copies];
        let report = select_best_month(&records).unwrap();
        prop_assert_eq!(report.best.index, 0);
    }

    #[test]
    fn scan_picks_the_first_maximum(
        months in prop::collection::vec((0.0..300.0f64, 0.0..50.0f64), 1..12),
    ) {
        let records: Vec<_> = months.iter().map(|&(rain, temp)| InferenceRecord::new("m", rain, temp)).collect();
        let report = select_best_month(&records).unwrap();
        let max = report.scored.iter().map(|s| s.score.value).fold(f64::NEG_INFINITY, f64::max);
        let first = report.scored.iter().find(|s| s.score.value == max).unwrap();
        prop_assert_eq!(report.best.index, first.index);
        prop_assert_eq!(report.best.score, max);
    }
}
