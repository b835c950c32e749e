use fuzzy_mamdani::ops::{aggregate, clip};
use fuzzy_mamdani::{membership_at, DefuzzificationOp, MembershipFunction, Shape, Universe};
use proptest::collection::vec;
use proptest::prelude::*;

fn percent() -> Universe {
    Universe::new(0., 100., 101).unwrap()
}

/// Integer breakpoints a < b < c inside [0, 100]
fn arb_triangle() -> impl Strategy<Value = (usize, usize, usize)> {
    (0usize..=98).prop_flat_map(|a| (Just(a), a + 1..=99)).prop_flat_map(|(a, b)| (Just(a), Just(b), b + 1..=100))
}

/// Three curves sampled over the same number of points
fn arb_curves() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..24).prop_flat_map(|n| (vec(0.0..=1.0, n), vec(0.0..=1.0, n), vec(0.0..=1.0, n)))
}

proptest! {
    #[test]
    fn prop_triangle_vertices((a, b, c) in arb_triangle()) {
        let curve = Shape::triangular(a as f64, b as f64, c as f64).resolve(&percent()).unwrap();
        let samples = curve.samples();

        prop_assert_eq!(samples[a], 0.);
        prop_assert_eq!(samples[b], 1.);
        prop_assert_eq!(samples[c], 0.);
        prop_assert!(samples.iter().all(|m| (0. ..=1.).contains(m)));
        prop_assert!(samples[a..=b].windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(samples[b..=c].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn prop_aggregate_is_pointwise_max((u, v, w) in arb_curves()) {
        let max = |a: &[f64], b: &[f64]| aggregate([a, b]).unwrap();
        let uv = max(&u, &v);

        prop_assert!(uv.iter().zip(&u).zip(&v).all(|((m, a), b)| *m == a.max(*b)));
        prop_assert_eq!(&uv, &max(&v, &u));
        prop_assert_eq!(max(&uv, &w), max(&u, &max(&v, &w)));
        prop_assert_eq!(max(&u, &u), u.clone());
    }

    #[test]
    fn prop_clip_is_bounded(strength in 0.0..=1.0f64, curve in vec(0.0..=1.0f64, 1..24)) {
        let clipped = clip(strength, &curve);

        prop_assert!(clipped.iter().zip(&curve).all(|(c, m)| *c <= strength && c <= m));
    }

    #[test]
    fn prop_symmetric_triangle_centroid_is_peak(peak in 10usize..=90, width in 1usize..=10) {
        let universe = percent();
        let (a, b, c) = ((peak - width) as f64, peak as f64, (peak + width) as f64);
        let curve = Shape::triangular(a, b, c).resolve(&universe).unwrap();
        let value = DefuzzificationOp::Centroid.call(&curve).unwrap();

        prop_assert!((value - b).abs() < 1e-9, "centroid {} for peak {}", value, b);
    }

    #[test]
    fn prop_defuzzification_fails_only_on_zero_curves(samples in vec(prop_oneof![Just(0.), 0.0..=1.0f64], 2..24)) {
        let last = (samples.len() - 1) as f64;
        let universe = Universe::new(0., last, samples.len()).unwrap();
        let all_zero = samples.iter().all(|&m| m == 0.);
        let curve = MembershipFunction::from_samples(&universe, samples).unwrap();

        for op in [
            DefuzzificationOp::Centroid,
            DefuzzificationOp::AreaCentroid,
            DefuzzificationOp::Bisector,
            DefuzzificationOp::MeanOfMaximum,
            DefuzzificationOp::SmallestOfMaximum,
            DefuzzificationOp::LargestOfMaximum,
        ] {
            let value = op.call(&curve);

            prop_assert_eq!(value.is_none(), all_zero);

            if let Some(value) = value {
                prop_assert!((-1e-9..=last + 1e-9).contains(&value), "{:?} gave {}", op, value);
            }
        }
    }

    #[test]
    fn prop_fuzzification_clamps_to_universe((a, b, c) in arb_triangle(), x in -50.0..150.0f64) {
        let universe = percent();
        let curve = Shape::triangular(a as f64, b as f64, c as f64).resolve(&universe).unwrap();
        let degree = membership_at(&curve, x);

        prop_assert!((0. ..=1.).contains(&degree));
        prop_assert_eq!(degree, membership_at(&curve, universe.clamp(x)));
    }
}
