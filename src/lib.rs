//! Mamdani fuzzy inference over sampled, piecewise-linear membership functions.
//!
//! Variables are declared over a discretized [`Universe`], rules are built from [`Expr`] premises and a
//! single consequent term, and [`MamdaniInference::eval`] turns crisp inputs into crisp outputs along
//! with the intermediate curves. [`FuzzySystem`] wraps the same pipeline for string-named systems
//! loaded from TOML.

mod config;
mod dsl;
mod error;
mod fuzzify;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
pub mod ops;
mod outputs;
mod rules;
mod system;
mod terms;
mod universe;
mod variable;

pub use config::{AntecedentConfig, RuleConfig, SystemConfig, TermRef, VariableConfig, DEFAULT_STEP};
pub use dsl::{Combinator, Expr, Polarity, Proposition};
pub use error::{FuzzyError, Result};
pub use fuzzify::{fuzzify, membership_at};
pub use inference::{MamdaniInference, OnDegenerate};
pub use inputs::Inputs;
pub use membership::{MembershipFunction, Shape};
pub use ops::DefuzzificationOp;
pub use outputs::{OutputInference, Outputs, RuleActivation};
pub use rules::{Rule, RuleId, Rules};
pub use system::FuzzySystem;
pub use terms::{Key, Terms};
pub use universe::Universe;
pub use variable::{LinguisticVariable, Variable, VariableKey, Variables};
