use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{FuzzyError, Result};
use crate::math::{interp, interp_one};
use crate::universe::Universe;

/// Symbolic description of a piecewise-linear membership function.
///
/// A shape is only a recipe; [`Shape::resolve`] samples it over a [`Universe`] into the
/// [`MembershipFunction`] every operator works on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// `[a, b, c]`: zero outside `[a, c]`, one at `b`
    Triangular(f64, f64, f64),
    /// `[a, b, c, d]`: zero outside `[a, d]`, one on `[b, c]`
    Trapezoidal(f64, f64, f64, f64),
    /// `(x, degree)` breakpoints, linearly interpolated; the edge degrees extend past the first and last x
    Piecewise(Vec<(f64, f64)>),
}

impl Shape {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        Shape::Triangular(a, b, c)
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Shape::Trapezoidal(a, b, c, d)
    }

    pub fn piecewise(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Shape::Piecewise(points.into_iter().collect())
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Triangular(a, b, c) => check_breakpoints(&[*a, *b, *c]),
            Shape::Trapezoidal(a, b, c, d) => check_breakpoints(&[*a, *b, *c, *d]),
            Shape::Piecewise(points) => {
                if points.is_empty() {
                    return Err(FuzzyError::InvalidShape("piecewise shape has no breakpoints".into()));
                }
                if let Some((x, y)) = points.iter().find(|(_, y)| !(0. ..=1.).contains(y)) {
                    return Err(FuzzyError::InvalidShape(format!("degree {y} at x = {x} is outside [0, 1]")));
                }

                let xs: Vec<_> = points.iter().map(|(x, _)| *x).collect();

                check_breakpoints(&xs)
            },
        }
    }

    /// Degree of membership of `x` in the unsampled shape
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Shape::Triangular(a, b, c) => trapezoid(x, a, b, b, c),
            Shape::Trapezoidal(a, b, c, d) => trapezoid(x, a, b, c, d),
            Shape::Piecewise(ref points) => {
                let (xp, fp): (Vec<_>, Vec<_>) = points.iter().copied().unzip();

                interp_one(x, &xp, &fp)
            },
        }
    }

    /// Samples the shape at every point of `universe`.
    ///
    /// Breakpoints outside the universe are allowed; the curve is whatever the shape evaluates to at
    /// the sample points, which may be zero everywhere.
    pub fn resolve(&self, universe: &Universe) -> Result<MembershipFunction> {
        self.resolve_shared(Arc::new(universe.clone()))
    }

    pub(crate) fn resolve_shared(&self, universe: Arc<Universe>) -> Result<MembershipFunction> {
        self.validate()?;

        let samples = match self {
            Shape::Piecewise(points) => {
                let (xp, fp): (Vec<_>, Vec<_>) = points.iter().copied().unzip();

                interp(universe.points().iter().copied(), &xp, &fp)
            },
            _ => universe.points().iter().map(|&x| self.degree(x)).collect(),
        };

        Ok(MembershipFunction { universe, samples })
    }
}

fn check_breakpoints(xs: &[f64]) -> Result<()> {
    if let Some(x) = xs.iter().find(|x| !x.is_finite()) {
        return Err(FuzzyError::InvalidShape(format!("breakpoint {x} is not finite")));
    }
    if let Some(pair) = xs.windows(2).find(|pair| pair[0] > pair[1]) {
        return Err(FuzzyError::InvalidShape(format!(
            "breakpoints must be weakly increasing, found {} before {}",
            pair[0], pair[1]
        )));
    }

    Ok(())
}

// Requires a <= b <= c <= d. Inside each slope the denominator is nonzero: x < b with x >= a means a < b.
fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

/// A membership curve sampled over a universe; the runtime form of every linguistic term.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFunction {
    universe: Arc<Universe>,
    samples: Vec<f64>,
}

impl MembershipFunction {
    /// Wraps already sampled degrees. Fails unless there is one degree in `[0, 1]` per universe point.
    pub fn from_samples(universe: &Universe, samples: Vec<f64>) -> Result<Self> {
        if samples.len() != universe.steps() {
            return Err(FuzzyError::InvalidShape(format!(
                "expected {} samples, got {}",
                universe.steps(),
                samples.len()
            )));
        }
        if let Some(y) = samples.iter().find(|y| !(0. ..=1.).contains(*y)) {
            return Err(FuzzyError::InvalidShape(format!("degree {y} is outside [0, 1]")));
        }

        Ok(Self { universe: Arc::new(universe.clone()), samples })
    }

    pub(crate) fn from_shared(universe: Arc<Universe>, samples: Vec<f64>) -> Self {
        debug_assert_eq!(universe.steps(), samples.len());

        Self { universe, samples }
    }

    /// Same universe, different degrees
    pub(crate) fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self::from_shared(self.universe.clone(), samples)
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// `(x, degree)` pairs, ready for plotting
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.universe.points().iter().copied().zip(self.samples.iter().copied())
    }

    pub fn is_zero(&self) -> bool {
        self.samples.iter().all(|&y| y == 0.)
    }
}

impl Serialize for MembershipFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points())
    }
}

#[test]
fn test_triangular_resolve() {
    let universe = Universe::with_step(60., 95., 1.).unwrap();
    let low = Shape::triangular(50., 60., 70.).resolve(&universe).unwrap();
    let high = Shape::triangular(70., 80., 95.).resolve(&universe).unwrap();

    assert_eq!(low.samples().len(), 36);
    assert_eq!(&low.samples()[..4], &[1., 0.9, 0.8, 0.7]);
    assert_eq!(low.samples()[10], 0.);
    assert_eq!(high.samples()[20], 1.);
    assert_eq!(high.samples()[35], 0.);
    assert!(high.samples()[..10].iter().all(|&y| y == 0.));
}

#[test]
fn test_shoulders_and_plateau() {
    let universe = Universe::new(0., 10., 11).unwrap();
    let left = Shape::triangular(0., 0., 5.).resolve(&universe).unwrap();
    let plateau = Shape::trapezoidal(2., 4., 6., 8.).resolve(&universe).unwrap();

    assert_eq!(&left.samples()[..3], &[1., 0.8, 0.6]);
    assert_eq!(plateau.samples(), &[0., 0., 0., 0.5, 1., 1., 1., 0.5, 0., 0., 0.]);
}

#[test]
fn test_piecewise_holds_edges() {
    let universe = Universe::new(150., 200., 11).unwrap();
    let low = Shape::piecewise([(155., 1.), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)]);
    let curve = low.resolve(&universe).unwrap();

    assert_eq!(curve.samples()[0], 1.);
    assert_eq!(curve.samples()[2], 0.8);
    assert_eq!(curve.samples()[10], 0.);
}

#[test]
fn test_out_of_universe_shape_is_zero() {
    let universe = Universe::new(0., 10., 11).unwrap();
    let curve = Shape::triangular(20., 30., 40.).resolve(&universe).unwrap();

    assert!(curve.is_zero());
}

#[test]
fn test_invalid_shapes() {
    let universe = Universe::new(0., 10., 11).unwrap();

    assert!(matches!(Shape::triangular(3., 2., 5.).resolve(&universe), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(Shape::trapezoidal(1., 2., 5., 4.).resolve(&universe), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(Shape::triangular(f64::NAN, 2., 5.).resolve(&universe), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(Shape::Piecewise(vec![]).resolve(&universe), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(Shape::piecewise([(1., 1.5)]).resolve(&universe), Err(FuzzyError::InvalidShape(_))));
    assert!(matches!(
        MembershipFunction::from_samples(&universe, vec![0.; 3]),
        Err(FuzzyError::InvalidShape(_))
    ));
}
