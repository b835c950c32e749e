use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::membership::MembershipFunction;
use crate::rules::RuleId;
use crate::variable::{Variable, VariableKey};

/// A rule's firing strength and its clipped consequent
#[derive(Clone, Debug, Serialize)]
pub struct RuleActivation {
    pub(crate) rule: RuleId,
    #[serde(skip)]
    pub(crate) output: VariableKey,
    pub(crate) firing_strength: f64,
    pub(crate) curve: MembershipFunction,
}

impl RuleActivation {
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// The variable the rule concludes about
    pub fn output(&self) -> VariableKey {
        self.output
    }

    pub fn firing_strength(&self) -> f64 {
        self.firing_strength
    }

    pub fn curve(&self) -> &MembershipFunction {
        &self.curve
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.curve.points()
    }
}

/// The aggregated curve of one output variable and its crisp value
#[derive(Clone, Debug, Serialize)]
pub struct OutputInference {
    pub(crate) name: String,
    #[serde(skip)]
    pub(crate) key: VariableKey,
    pub(crate) value: f64,
    /// True when no rule fired and the value is a fallback
    pub(crate) degenerate: bool,
    pub(crate) aggregated: MembershipFunction,
}

impl OutputInference {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> VariableKey {
        self.key
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn aggregated(&self) -> &MembershipFunction {
        &self.aggregated
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.aggregated.points()
    }
}

/// Everything one evaluation produced
#[derive(Clone, Debug, Serialize)]
pub struct Outputs<T> {
    pub(crate) outputs: Vec<OutputInference>,
    pub(crate) activations: Vec<RuleActivation>,
    #[serde(skip)]
    pub(crate) degrees: HashMap<(VariableKey, T), f64>,
}

impl<T: Eq + Hash> Outputs<T> {
    /// Crisp value inferred for `var`
    pub fn get_inferred_membership<I>(&self, var: Variable<I>) -> Option<f64> {
        self.output(var.0).map(OutputInference::value)
    }

    pub fn output(&self, key: VariableKey) -> Option<&OutputInference> {
        self.outputs.iter().find(|output| output.key == key)
    }

    pub fn output_by_name(&self, name: &str) -> Option<&OutputInference> {
        self.outputs.iter().find(|output| output.name == name)
    }

    pub fn outputs(&self) -> &[OutputInference] {
        &self.outputs
    }

    /// Activations in rule order
    pub fn activations(&self) -> &[RuleActivation] {
        &self.activations
    }

    pub fn activation(&self, rule: RuleId) -> Option<&RuleActivation> {
        self.activations.get(rule.index())
    }

    /// Fuzzified degree of an input in one of its terms, if some rule asked for it
    pub fn degree(&self, var: VariableKey, term: T) -> Option<f64> {
        self.degrees.get(&(var, term)).copied()
    }
}
