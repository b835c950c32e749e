use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::math::interp_one;
use crate::membership::MembershipFunction;
use crate::variable::LinguisticVariable;

/// Degree of membership of `x`, interpolated between the two bracketing samples.
///
/// Inputs outside the universe take the degree of the nearest edge sample; nothing is extrapolated.
/// A NaN input has no degree and yields NaN. [`MamdaniInference::eval`](crate::MamdaniInference::eval)
/// rejects such inputs with [`FuzzyError::InvalidInput`](crate::FuzzyError::InvalidInput) before they get here.
pub fn membership_at(function: &MembershipFunction, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }

    let universe = function.universe();

    interp_one(universe.clamp(x), universe.points(), function.samples())
}

/// Degree of `x` in every term of `variable`. Every degree is NaN when `x` is.
pub fn fuzzify<T: Clone + Eq + Hash + Debug>(variable: &LinguisticVariable<T>, x: f64) -> HashMap<T, f64> {
    variable.terms().map(|(term, function)| (term.clone(), membership_at(function, x))).collect()
}

#[cfg(test)]
use crate::membership::Shape;
#[cfg(test)]
use crate::universe::Universe;
#[cfg(test)]
use crate::variable::Variables;

#[test]
fn test_membership_at_interpolates() {
    let universe = Universe::with_step(50., 100., 1.).unwrap();
    let high = Shape::triangular(80., 90., 100.).resolve(&universe).unwrap();

    assert!((membership_at(&high, 97.) - 0.3).abs() < 1e-12);
    assert!((membership_at(&high, 85.5) - 0.55).abs() < 1e-12);
    assert_eq!(membership_at(&high, 90.), 1.);
}

#[test]
fn test_membership_at_clamps() {
    let universe = Universe::with_step(60., 95., 1.).unwrap();
    let low = Shape::triangular(50., 60., 70.).resolve(&universe).unwrap();

    assert_eq!(membership_at(&low, 10.), membership_at(&low, 60.));
    assert_eq!(membership_at(&low, 10.), 1.);
    assert_eq!(membership_at(&low, f64::INFINITY), 0.);
}

#[test]
fn test_fuzzify_every_term() {
    let mut vars = Variables::new();
    let average = vars
        .insert(
            "average",
            Universe::with_step(20., 90., 1.).unwrap(),
            [
                ("low", Shape::triangular(40., 50., 60.)),
                ("medium", Shape::triangular(50., 60., 70.)),
                ("high", Shape::triangular(60., 70., 80.)),
            ],
        )
        .unwrap();

    let degrees = fuzzify(vars.get(average.key()).unwrap(), 68.);

    assert_eq!(degrees["low"], 0.);
    assert!((degrees["medium"] - 0.2).abs() < 1e-12);
    assert!((degrees["high"] - 0.8).abs() < 1e-12);
}

#[test]
fn test_nan_has_no_degree() {
    let universe = Universe::new(0., 10., 11).unwrap();
    let slow = Shape::triangular(0., 0., 5.).resolve(&universe).unwrap();

    assert!(membership_at(&slow, f64::NAN).is_nan());
    assert_eq!(membership_at(&slow, 0.), 1.);
}
