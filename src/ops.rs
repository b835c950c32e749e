use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, Result};
use crate::math::zip_with;
use crate::membership::MembershipFunction;

/// Fuzzy AND (minimum t-norm)
pub fn fuzzy_and(u: f64, v: f64) -> f64 {
    f64::min(u, v)
}

/// Fuzzy OR (maximum t-conorm)
pub fn fuzzy_or(u: f64, v: f64) -> f64 {
    f64::max(u, v)
}

pub fn complement(u: f64) -> f64 {
    1. - u
}

/// Mamdani implication: the consequent curve clipped at the rule's firing strength
pub fn clip(strength: f64, consequent: &[f64]) -> Vec<f64> {
    consequent.iter().map(|&m| fuzzy_and(strength, m)).collect()
}

/// Pointwise maximum of curves sampled over the same universe.
///
/// No curves aggregate to an empty curve. Curves of different lengths are rejected.
pub fn aggregate<'c>(curves: impl IntoIterator<Item = &'c [f64]>) -> Result<Vec<f64>> {
    let mut curves = curves.into_iter();
    let Some(first) = curves.next() else {
        return Ok(Vec::new());
    };
    let mut agg = first.to_vec();

    for curve in curves {
        if curve.len() != agg.len() {
            return Err(FuzzyError::InvalidShape(format!(
                "cannot aggregate curves of {} and {} samples",
                agg.len(),
                curve.len()
            )));
        }

        agg = zip_with(&agg, curve, fuzzy_or);
    }

    Ok(agg)
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Membership weighted mean of the sample points
    #[default]
    Centroid,
    /// Center of gravity of the area under the piecewise-linear curve
    AreaCentroid,
    /// Bisector of Area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
}

impl DefuzzificationOp {
    /// Reduces a sampled curve to a crisp value.
    ///
    /// Returns `None` when every sample is zero, since no method is defined there.
    pub fn call(self, function: &MembershipFunction) -> Option<f64> {
        let universe = function.universe().points();
        let membership = function.samples();

        if membership.iter().all(|&m| m == 0.) {
            return None;
        }

        let value = match self {
            Self::Centroid => weighted_mean(universe, membership),
            Self::AreaCentroid => area_centroid(universe, membership),
            Self::Bisector => bisector(universe, membership),
            Self::MeanOfMaximum => {
                let (len, sum) = maxima(universe, membership).fold((0usize, 0.), |(n, sum), x| (n + 1, sum + x));

                sum / len as f64
            },
            Self::SmallestOfMaximum => maxima(universe, membership).fold(f64::INFINITY, f64::min),
            Self::LargestOfMaximum => maxima(universe, membership).fold(f64::NEG_INFINITY, f64::max),
        };

        Some(value)
    }
}

fn weighted_mean(universe: &[f64], membership: &[f64]) -> f64 {
    let num: f64 = universe.iter().zip(membership).map(|(x, m)| x * m).sum();
    let den: f64 = membership.iter().sum();

    num / den
}

fn maxima<'u>(universe: &'u [f64], membership: &'u [f64]) -> impl Iterator<Item = f64> + 'u {
    let maximum = membership.iter().copied().fold(0., f64::max);

    universe.iter().zip(membership).filter_map(move |(&u, &m)| if m == maximum { Some(u) } else { None })
}

// Splits each segment into a rectangle and a triangle and weighs their centroids by area
fn area_centroid(universe: &[f64], membership: &[f64]) -> f64 {
    let mut num = 0.;
    let mut den = 0.;

    for i in 0..universe.len().saturating_sub(1) {
        let base = universe[i + 1] - universe[i];
        let (m0, m1) = (membership[i], membership[i + 1]);
        let area_rect = f64::min(m0, m1) * base;
        let center_rect = universe[i] + base / 2.;
        let (area_tri, center_tri) = if m1 == m0 {
            (0., 0.)
        } else if m1 > m0 {
            (base * (m1 - m0).abs() / 2., universe[i] + 2. / 3. * base)
        } else {
            (base * (m1 - m0).abs() / 2., universe[i] + 1. / 3. * base)
        };
        let area = area_rect + area_tri;

        if area > 0. {
            num += area_rect * center_rect + area_tri * center_tri;
            den += area;
        }
    }

    // Only a lone sample encloses no area
    if den == 0. {
        return weighted_mean(universe, membership);
    }

    num / den
}

// Inside the crossing segment the curve is linear, so the enclosed area grows quadratically:
// m0 * t + k * t^2 / 2 = rest, solved in the form that stays stable when k is zero.
fn bisector(universe: &[f64], membership: &[f64]) -> f64 {
    let areas: Vec<f64> = universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / 2.)
        .collect();
    let total_area: f64 = areas.iter().sum();

    if total_area == 0. {
        return weighted_mean(universe, membership);
    }

    let target = total_area / 2.;
    let mut cum_area = 0.;

    for (i, area) in areas.iter().enumerate() {
        if cum_area + area >= target {
            let (x0, x1) = (universe[i], universe[i + 1]);
            let (m0, m1) = (membership[i], membership[i + 1]);
            let rest = target - cum_area;
            let slope = (m1 - m0) / (x1 - x0);
            let discriminant = f64::max(m0 * m0 + 2. * slope * rest, 0.);
            let t = 2. * rest / (m0 + discriminant.sqrt());

            return (x0 + t).clamp(x0, x1);
        }

        cum_area += area;
    }

    universe[universe.len() - 1]
}

#[cfg(test)]
fn sampled(points: &[f64], samples: &[f64]) -> MembershipFunction {
    use crate::universe::Universe;

    let universe = Universe::new(points[0], points[points.len() - 1], points.len()).unwrap();

    MembershipFunction::from_samples(&universe, samples.to_vec()).unwrap()
}

#[test]
fn test_clip_and_aggregate() {
    use pretty_assertions::assert_eq;

    let low = [1., 0.5, 0., 0.];
    let high = [0., 0., 0.5, 1.];
    let clipped = clip(0.6, &high);

    assert_eq!(clipped, vec![0., 0., 0.5, 0.6]);
    assert_eq!(aggregate([&low[..], &clipped[..]]).unwrap(), vec![1., 0.5, 0.5, 0.6]);
    assert_eq!(aggregate([&low[..], &low[..]]).unwrap(), low.to_vec());
    assert_eq!(aggregate(std::iter::empty::<&[f64]>()).unwrap(), Vec::<f64>::new());
}

#[test]
fn test_aggregate_rejects_mismatched_curves() {
    let short = [1., 0.5];
    let long = [0., 0., 1.];

    assert!(matches!(aggregate([&short[..], &long[..]]), Err(FuzzyError::InvalidShape(_))));
}

#[test]
fn test_centroid_of_symmetric_triangle() {
    use crate::membership::Shape;
    use crate::universe::Universe;

    let universe = Universe::new(0., 100., 101).unwrap();
    let curve = Shape::triangular(20., 35., 50.).resolve(&universe).unwrap();

    for op in [DefuzzificationOp::Centroid, DefuzzificationOp::AreaCentroid, DefuzzificationOp::Bisector] {
        let value = op.call(&curve).unwrap();

        assert!((value - 35.).abs() < 1e-9, "{op:?} gave {value}");
    }
}

#[test]
fn test_centroid_of_disjoint_pair_is_midpoint() {
    use crate::membership::Shape;
    use crate::universe::Universe;

    let universe = Universe::new(0., 100., 101).unwrap();
    let left = Shape::triangular(10., 20., 30.).resolve(&universe).unwrap();
    let right = Shape::triangular(60., 70., 80.).resolve(&universe).unwrap();
    let both = left.with_samples(aggregate([left.samples(), right.samples()]).unwrap());

    let value = DefuzzificationOp::Centroid.call(&both).unwrap();

    assert!((value - 45.).abs() < 1e-9);
}

#[test]
fn test_maximum_methods() {
    let plateau = sampled(&[0., 1., 2., 3., 4.], &[0., 0.5, 0.5, 0.5, 0.]);

    assert_eq!(DefuzzificationOp::MeanOfMaximum.call(&plateau), Some(2.));
    assert_eq!(DefuzzificationOp::SmallestOfMaximum.call(&plateau), Some(1.));
    assert_eq!(DefuzzificationOp::LargestOfMaximum.call(&plateau), Some(3.));
}

#[test]
fn test_bisector_splits_area() {
    let ramp = sampled(&[0., 1., 2., 3., 4.], &[0., 0., 1., 1., 1.]);

    // area 2.5, half of it is reached three quarters into the flat [2, 3] segment
    assert_eq!(DefuzzificationOp::Bisector.call(&ramp), Some(2.75));
}

#[test]
fn test_bisector_on_sloped_segment() {
    let rising = sampled(&[0., 1.], &[0., 1.]);
    let falling = sampled(&[0., 1.], &[1., 0.]);

    // the triangle under y = x holds half its area left of sqrt(1/2)
    let half = f64::sqrt(0.5);

    assert!((DefuzzificationOp::Bisector.call(&rising).unwrap() - half).abs() < 1e-12);
    assert!((DefuzzificationOp::Bisector.call(&falling).unwrap() - (1. - half)).abs() < 1e-12);

    let trapezoid = sampled(&[0., 2.], &[0.5, 1.]);

    // area 1.5; 0.5 * t + t^2 / 8 = 0.75 gives t = sqrt(10) - 2
    let expected = f64::sqrt(10.) - 2.;

    assert!((DefuzzificationOp::Bisector.call(&trapezoid).unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_degenerate_aggregate() {
    let points = [0., 1., 2.];

    assert_eq!(DefuzzificationOp::Centroid.call(&sampled(&points, &[0., 0., 0.])), None);
    assert_eq!(DefuzzificationOp::Bisector.call(&sampled(&points, &[0., 0., 0.])), None);
    assert!(DefuzzificationOp::Centroid.call(&sampled(&points, &[0., 1e-12, 0.])).is_some());
}
