use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;

use crate::dsl::{Expr, Polarity, Proposition};
use crate::error::{FuzzyError, Result};
use crate::variable::Variables;

/// Position of a rule in its rule base
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RuleId(usize);

impl RuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct Rules<T>(pub(crate) Vec<Rule<T>>);

impl<T: Clone + Eq + Hash + Debug> Rules<T> {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Adds `if premise then consequence`.
    ///
    /// Every variable and term is checked against `vars` here, so evaluation never meets an
    /// unknown reference. The consequence must be a single `variable.is(term)`.
    pub fn add(&mut self, vars: &Variables<T>, premise: Expr<T>, consequence: Expr<T>) -> Result<RuleId> {
        let id = RuleId(self.0.len());

        if premise.has_empty_group() {
            return Err(FuzzyError::EmptyPremise { rule: id.0 });
        }

        let consequence = match consequence {
            Expr::Is(prop) if prop.polarity == Polarity::Is => prop,
            _ => return Err(FuzzyError::InvalidConsequent { rule: id.0 }),
        };

        for prop in premise.propositions().into_iter().chain(Some(&consequence)) {
            vars.require(prop.var)?.require_term(&prop.term)?;
        }

        self.0.push(Rule { premise, consequence });

        Ok(id)
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule<T>> {
        self.0.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &Rule<T>)> {
        self.0.iter().enumerate().map(|(i, rule)| (RuleId(i), rule))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Clone + Eq + Hash + Debug> Default for Rules<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct Rule<T> {
    pub(crate) premise: Expr<T>,
    pub(crate) consequence: Proposition<T>,
}

impl<T> Rule<T> {
    pub fn premise(&self) -> &Expr<T> {
        &self.premise
    }

    pub fn consequence(&self) -> &Proposition<T> {
        &self.consequence
    }
}

#[cfg(test)]
use crate::membership::Shape;
#[cfg(test)]
use crate::universe::Universe;

#[cfg(test)]
fn speed_and_brake() -> (Variables<String>, crate::Variable<String>, crate::Variable<String>) {
    let mut vars = Variables::new();
    let universe = Universe::new(0., 10., 11).unwrap();
    let speed = vars.insert("speed", universe.clone(), [("fast".to_owned(), Shape::triangular(5., 10., 10.))]);
    let brake = vars.insert("brake", universe, [("hard".to_owned(), Shape::triangular(5., 10., 10.))]);

    (vars, speed.unwrap(), brake.unwrap())
}

#[test]
fn test_add_validates_references() {
    let (vars, speed, brake) = speed_and_brake();
    let mut rules = Rules::new();

    let id = rules.add(&vars, speed.is("fast".to_owned()), brake.is("hard".to_owned())).unwrap();

    assert_eq!(id.index(), 0);
    assert_eq!(
        rules.add(&vars, speed.is("slow".to_owned()), brake.is("hard".to_owned())).unwrap_err(),
        FuzzyError::UnknownTerm { variable: "speed".into(), term: "slow".into() }
    );
    assert_eq!(
        rules.add(&vars, speed.is("fast".to_owned()), brake.is("soft".to_owned())).unwrap_err(),
        FuzzyError::UnknownTerm { variable: "brake".into(), term: "soft".into() }
    );
    assert_eq!(rules.len(), 1);
}

#[test]
fn test_add_rejects_malformed_rules() {
    let (vars, speed, brake) = speed_and_brake();
    let mut rules = Rules::new();

    assert_eq!(
        rules.add(&vars, speed.is("fast".to_owned()), brake.is_not("hard".to_owned())).unwrap_err(),
        FuzzyError::InvalidConsequent { rule: 0 }
    );
    assert_eq!(
        rules
            .add(&vars, speed.is("fast".to_owned()), brake.is("hard".to_owned()).and(speed.is("fast".to_owned())))
            .unwrap_err(),
        FuzzyError::InvalidConsequent { rule: 0 }
    );
    assert_eq!(
        rules.add(&vars, Expr::And(Vec::new()), brake.is("hard".to_owned())).unwrap_err(),
        FuzzyError::EmptyPremise { rule: 0 }
    );
    assert!(rules.is_empty());
}
