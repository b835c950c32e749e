use serde::{Deserialize, Serialize};

use crate::ops::{complement, fuzzy_and, fuzzy_or};
use crate::variable::{Variable, VariableKey};

/// Whether a proposition asserts a term or its complement
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    Is,
    IsNot,
}

impl Polarity {
    pub fn apply(self, degree: f64) -> f64 {
        match self {
            Polarity::Is => degree,
            Polarity::IsNot => complement(degree),
        }
    }
}

/// `variable is [not] term`
#[derive(Clone, Debug, PartialEq)]
pub struct Proposition<T> {
    pub(crate) var: VariableKey,
    pub(crate) term: T,
    pub(crate) polarity: Polarity,
}

impl<T> Proposition<T> {
    pub fn new(var: VariableKey, term: T, polarity: Polarity) -> Self {
        Self { var, term, polarity }
    }

    pub fn variable(&self) -> VariableKey {
        self.var
    }

    pub fn term(&self) -> &T {
        &self.term
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }
}

/// How the propositions of a premise group combine
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Minimum of the degrees
    #[default]
    And,
    /// Maximum of the degrees
    Or,
}

// TODO: Support hedges ("very", "somewhat") as proposition modifiers
#[derive(Clone, Debug, PartialEq)]
pub enum Expr<T> {
    Is(Proposition<T>),
    And(Vec<Expr<T>>),
    Or(Vec<Expr<T>>),
}

impl<T> Expr<T> {
    /// Groups `exprs` under one combinator
    pub fn group(combinator: Combinator, exprs: impl IntoIterator<Item = Expr<T>>) -> Self {
        let exprs = exprs.into_iter().collect();

        match combinator {
            Combinator::And => Expr::And(exprs),
            Combinator::Or => Expr::Or(exprs),
        }
    }

    /// `a.and(b).and(c)` builds one flat group of three
    pub fn and(self, rhs: Expr<T>) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs);
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs]),
        }
    }

    pub fn or(self, rhs: Expr<T>) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs);
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs]),
        }
    }

    pub fn propositions(&self) -> Vec<&Proposition<T>> {
        let mut props = Vec::new();

        fn parse<'p, T>(expr: &'p Expr<T>, out: &mut Vec<&'p Proposition<T>>) {
            match expr {
                Expr::Is(prop) => out.push(prop),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
            }
        }

        parse(self, &mut props);

        props
    }

    /// True when some group, at any depth, has nothing in it
    pub(crate) fn has_empty_group(&self) -> bool {
        match self {
            Expr::Is(_) => false,
            Expr::And(exprs) | Expr::Or(exprs) => exprs.is_empty() || exprs.iter().any(Expr::has_empty_group),
        }
    }

    /// Firing strength of the premise given the degree of each affirmative proposition
    pub(crate) fn firing_strength(&self, degree: &impl Fn(&Proposition<T>) -> f64) -> f64 {
        match self {
            Expr::Is(prop) => prop.polarity.apply(degree(prop)),
            Expr::And(exprs) => exprs.iter().map(|expr| expr.firing_strength(degree)).fold(1., fuzzy_and),
            Expr::Or(exprs) => exprs.iter().map(|expr| expr.firing_strength(degree)).fold(0., fuzzy_or),
        }
    }
}

impl<T> From<Proposition<T>> for Expr<T> {
    fn from(prop: Proposition<T>) -> Self {
        Expr::Is(prop)
    }
}

impl<I> Variable<I> {
    pub fn is<T>(self, rhs: I) -> Expr<T>
    where
        I: Into<T>,
    {
        Expr::Is(Proposition::new(self.0, rhs.into(), Polarity::Is))
    }

    pub fn is_not<T>(self, rhs: I) -> Expr<T>
    where
        I: Into<T>,
    {
        Expr::Is(Proposition::new(self.0, rhs.into(), Polarity::IsNot))
    }
}

#[test]
fn test_builders_flatten() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let (a, b, c) = (keys.insert(()), keys.insert(()), keys.insert(()));
    let is = |var, term: u8| Expr::Is(Proposition::new(var, term, Polarity::Is));

    let flat = is(a, 0).and(is(b, 1)).and(is(c, 2));
    let mixed = is(a, 0).and(is(b, 1)).or(is(c, 2));

    assert!(matches!(&flat, Expr::And(exprs) if exprs.len() == 3));
    assert!(matches!(&mixed, Expr::Or(exprs) if exprs.len() == 2));
    assert_eq!(mixed.propositions().len(), 3);
    assert!(Expr::group(Combinator::Or, Vec::<Expr<u8>>::new()).has_empty_group());
}

#[test]
fn test_firing_strength() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let (a, b) = (keys.insert(()), keys.insert(()));
    let degree = |prop: &Proposition<u8>| if prop.var == a { 0.3 } else { 0.8 };
    let is = |var| Expr::Is(Proposition::new(var, 0u8, Polarity::Is));

    assert_eq!(is(a).and(is(b)).firing_strength(&degree), 0.3);
    assert_eq!(is(a).or(is(b)).firing_strength(&degree), 0.8);

    let negated = Expr::Is(Proposition::new(b, 0u8, Polarity::IsNot));

    assert!((is(a).and(negated).firing_strength(&degree) - 0.2).abs() < 1e-12);
}

#[test]
fn test_firing_strength_of_nested_groups() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let (a, b, c) = (keys.insert(()), keys.insert(()), keys.insert(()));
    let degree = |prop: &Proposition<u8>| match prop.var {
        var if var == a => 0.3,
        var if var == b => 0.8,
        _ => 0.1,
    };
    let is = |var| Expr::Is(Proposition::new(var, 0u8, Polarity::Is));

    let and_then_or = is(a).and(is(b)).or(is(c));
    let or_then_and = is(a).or(is(c)).and(is(b));

    assert!(matches!(&and_then_or, Expr::Or(exprs) if matches!(exprs[0], Expr::And(_))));
    assert_eq!(and_then_or.firing_strength(&degree), 0.3);
    assert_eq!(or_then_and.firing_strength(&degree), 0.3);
    assert_eq!(is(c).or(is(a).and(is(b).or(is(c)))).firing_strength(&degree), 0.3);
}
