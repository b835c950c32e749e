use serde::Serialize;

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;

/// An evenly spaced discretization of `[min, max]`, the universe of discourse of a variable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Universe {
    min: f64,
    max: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Samples `steps` points from `min` to `max` inclusive
    pub fn new(min: f64, max: f64, steps: usize) -> Result<Self> {
        let invalid = |reason| FuzzyError::InvalidUniverse { min, max, steps, reason };

        if !min.is_finite() || !max.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if min >= max {
            return Err(invalid("min must be below max"));
        }
        if steps < 2 {
            return Err(invalid("at least two steps are required"));
        }

        Ok(Self { min, max, points: Linspace::new(min, max, steps).collect() })
    }

    /// Derives the step count from a step width, the way `numpy.arange(min, max + step, step)` would.
    pub fn with_step(min: f64, max: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0. {
            return Err(FuzzyError::InvalidUniverse { min, max, steps: 0, reason: "step must be positive" });
        }

        // floor is closest approx to what python does for int() conversion. Nudge by a few ulps so that
        // (100 - 50) / 0.1 style divisions that land just under an integer still count the last sample.
        let ratio = (max - min) / step;
        let num = (ratio + ratio.abs() * 4. * f64::EPSILON).floor();

        if !num.is_finite() || num < 0. {
            return Self::new(min, max, 0);
        }

        Self::new(min, max, num as usize + 1)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of sample points
    pub fn steps(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.
    }

    /// Clamps `x` into `[min, max]`
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

#[test]
fn test_universe_points() {
    let universe = Universe::with_step(50., 100., 1.).unwrap();

    assert_eq!(universe.steps(), 51);
    assert_eq!(universe.points()[0], 50.);
    assert_eq!(universe.points()[47], 97.);
    assert_eq!(universe.points()[50], 100.);
    assert_eq!(universe.midpoint(), 75.);

    let universe = Universe::with_step(0., 1., 0.1).unwrap();

    assert_eq!(universe.steps(), 11);
}

#[test]
fn test_invalid_universe() {
    assert!(matches!(Universe::new(1., 1., 10), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(2., 1., 10), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(0., 1., 1), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::new(0., f64::NAN, 5), Err(FuzzyError::InvalidUniverse { .. })));
    assert!(matches!(Universe::with_step(0., 1., 0.), Err(FuzzyError::InvalidUniverse { .. })));
}
