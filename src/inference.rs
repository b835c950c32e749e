use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::dsl::Proposition;
use crate::error::{FuzzyError, Result};
use crate::fuzzify::membership_at;
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;
use crate::ops::{aggregate, clip, DefuzzificationOp};
use crate::outputs::{OutputInference, Outputs, RuleActivation};
use crate::rules::Rules;
use crate::variable::{term_label, VariableKey, Variables};

/// What to do when an output's aggregated curve is zero everywhere
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDegenerate {
    /// Fail the evaluation with [`FuzzyError::DegenerateAggregate`]
    #[default]
    Fail,
    /// Report the midpoint of the output universe
    UniverseMidpoint,
}

/// Mamdani inference: min/max premise combination, clipping implication, max aggregation.
#[derive(Clone, Copy, Debug, Default)]
pub struct MamdaniInference {
    defuzz_op: DefuzzificationOp,
    on_degenerate: OnDegenerate,
}

impl MamdaniInference {
    pub fn new(defuzz_op: DefuzzificationOp, on_degenerate: OnDegenerate) -> Self {
        Self { defuzz_op, on_degenerate }
    }

    pub fn defuzz_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    pub fn on_degenerate(&self) -> OnDegenerate {
        self.on_degenerate
    }

    /// Runs the whole pipeline once per output variable named by some rule consequence.
    ///
    /// `vars` and `rules` are only read, so one configuration can serve any number of concurrent calls.
    pub fn eval<T: Clone + Eq + Hash + Debug>(
        &self,
        vars: &Variables<T>,
        rules: &Rules<T>,
        inputs: &Inputs,
    ) -> Result<Outputs<T>> {
        let _span = tracing::debug_span!("mamdani_eval", rules = rules.len(), inputs = inputs.len()).entered();
        let mut session = Session::new(vars, inputs);

        // Fuzzificate Facts
        for (_, rule) in rules.iter() {
            for prop in rule.premise.propositions() {
                session.fuzzificate(prop)?;
            }
        }

        // Fire Rules
        for (id, rule) in rules.iter() {
            let strength = rule.premise.firing_strength(&|prop: &Proposition<T>| session.degree(prop));
            let consequence = &rule.consequence;
            let output = vars.require(consequence.var)?;
            let membership = output.require_term(&consequence.term)?;
            let curve = membership.with_samples(clip(strength, membership.samples()));

            tracing::trace!(rule = id.index(), strength, output = output.name(), "rule fired");

            session.activations.push(RuleActivation {
                rule: id,
                output: consequence.var,
                firing_strength: strength,
                curve,
            });
        }

        // Aggregate and Defuzzificate, one output variable at a time
        let mut output_keys: Vec<VariableKey> = Vec::new();

        for activation in &session.activations {
            if !output_keys.contains(&activation.output) {
                output_keys.push(activation.output);
            }
        }

        for key in output_keys {
            let output = self.infer_output(vars, key, &session.activations)?;

            session.outputs.push(output);
        }

        Ok(session.finish())
    }

    fn infer_output<T: Clone + Eq + Hash + Debug>(
        &self,
        vars: &Variables<T>,
        key: VariableKey,
        activations: &[RuleActivation],
    ) -> Result<OutputInference> {
        let var = vars.require(key)?;
        let universe = var.universe();
        let curves = activations.iter().filter(|activation| activation.output == key).map(|a| a.curve.samples());
        let aggregated = MembershipFunction::from_shared(var.shared_universe(), aggregate(curves)?);

        let (value, degenerate) = match self.defuzz_op.call(&aggregated) {
            Some(value) => (value, false),
            None => match self.on_degenerate {
                OnDegenerate::Fail => {
                    return Err(FuzzyError::DegenerateAggregate { variable: var.name().to_owned() });
                },
                OnDegenerate::UniverseMidpoint => {
                    tracing::warn!(variable = var.name(), "no rule fired, falling back to the universe midpoint");

                    (universe.midpoint(), true)
                },
            },
        };

        tracing::debug!(variable = var.name(), value, method = ?self.defuzz_op, "defuzzificated");

        Ok(OutputInference { name: var.name().to_owned(), key, value, degenerate, aggregated })
    }
}

/// Working state of a single evaluation; dropped or turned into [`Outputs`] when it ends.
struct Session<'a, T> {
    vars: &'a Variables<T>,
    inputs: &'a Inputs,
    degrees: HashMap<(VariableKey, T), f64>,
    activations: Vec<RuleActivation>,
    outputs: Vec<OutputInference>,
}

impl<'a, T: Clone + Eq + Hash + Debug> Session<'a, T> {
    fn new(vars: &'a Variables<T>, inputs: &'a Inputs) -> Self {
        Self { vars, inputs, degrees: HashMap::new(), activations: Vec::new(), outputs: Vec::new() }
    }

    fn fuzzificate(&mut self, prop: &Proposition<T>) -> Result<()> {
        let key = (prop.var, prop.term.clone());

        if self.degrees.contains_key(&key) {
            return Ok(());
        }

        let var = self.vars.require(prop.var)?;
        let x = self
            .inputs
            .get(prop.var)
            .ok_or_else(|| FuzzyError::MissingInput { variable: var.name().to_owned() })?;

        if x.is_nan() {
            return Err(FuzzyError::InvalidInput { variable: var.name().to_owned() });
        }

        let degree = membership_at(var.require_term(&prop.term)?, x);

        tracing::trace!(variable = var.name(), term = %term_label(&prop.term), x, degree, "fuzzificated");

        self.degrees.insert(key, degree);

        Ok(())
    }

    // Every premise proposition was fuzzificated before any rule fires
    fn degree(&self, prop: &Proposition<T>) -> f64 {
        self.degrees.get(&(prop.var, prop.term.clone())).copied().unwrap_or(0.)
    }

    fn finish(self) -> Outputs<T> {
        Outputs { outputs: self.outputs, activations: self.activations, degrees: self.degrees }
    }
}

#[cfg(test)]
use fixed_map::Key;
#[cfg(test)]
use pretty_assertions::assert_eq;
#[cfg(test)]
use crate::membership::Shape;
#[cfg(test)]
use crate::terms::Terms;
#[cfg(test)]
use crate::universe::Universe;
#[cfg(test)]
use crate::variable::Variable;

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
enum Highest {
    Low,
    Medium,
    High,
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
enum Average {
    Low,
    Medium,
    High,
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
enum Cutoff {
    Low,
    Medium,
    High,
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Marks {
    Highest(Highest),
    Average(Average),
    Cutoff(Cutoff),
}

#[cfg(test)]
impl From<Highest> for Marks {
    fn from(h: Highest) -> Self {
        Self::Highest(h)
    }
}

#[cfg(test)]
impl From<Average> for Marks {
    fn from(a: Average) -> Self {
        Self::Average(a)
    }
}

#[cfg(test)]
impl From<Cutoff> for Marks {
    fn from(c: Cutoff) -> Self {
        Self::Cutoff(c)
    }
}

#[cfg(test)]
struct Admission {
    vars: Variables<Marks>,
    rules: Rules<Marks>,
    highest: Variable<Highest>,
    average: Variable<Average>,
    cutoff: Variable<Cutoff>,
}

// Admission cutoff from the highest and the average mark of a class
#[cfg(test)]
fn admission() -> Admission {
    let mut highest_terms = Terms::new();
    let mut average_terms = Terms::new();
    let mut cutoff_terms = Terms::new();

    highest_terms.insert(Highest::Low, Shape::triangular(60., 70., 80.));
    highest_terms.insert(Highest::Medium, Shape::triangular(70., 80., 90.));
    highest_terms.insert(Highest::High, Shape::triangular(80., 90., 100.));
    average_terms.insert(Average::Low, Shape::triangular(40., 50., 60.));
    average_terms.insert(Average::Medium, Shape::triangular(50., 60., 70.));
    average_terms.insert(Average::High, Shape::triangular(60., 70., 80.));
    cutoff_terms.insert(Cutoff::Low, Shape::triangular(50., 60., 70.));
    cutoff_terms.insert(Cutoff::Medium, Shape::triangular(60., 70., 80.));
    cutoff_terms.insert(Cutoff::High, Shape::triangular(70., 80., 95.));

    let mut vars = Variables::<Marks>::new();
    let highest = vars.add("highest", Universe::with_step(50., 100., 1.).unwrap(), highest_terms).unwrap();
    let average = vars.add("average", Universe::with_step(20., 90., 1.).unwrap(), average_terms).unwrap();
    let cutoff = vars.add("cutoff", Universe::with_step(60., 95., 1.).unwrap(), cutoff_terms).unwrap();
    let mut rules = Rules::new();

    rules.add(&vars, highest.is(Highest::Low).or(average.is(Average::Low)), cutoff.is(Cutoff::Low)).unwrap();
    rules.add(&vars, average.is(Average::Medium), cutoff.is(Cutoff::Medium)).unwrap();
    rules.add(&vars, highest.is(Highest::High).or(average.is(Average::High)), cutoff.is(Cutoff::High)).unwrap();

    Admission { vars, rules, highest, average, cutoff }
}

#[cfg(test)]
fn inputs(admission: &Admission, highest: f64, average: f64) -> Inputs {
    let mut inputs = Inputs::new();

    inputs.add(admission.highest, highest);
    inputs.add(admission.average, average);
    inputs
}

#[cfg(test)]
fn eval(admission: &Admission, highest: f64, average: f64) -> Result<Outputs<Marks>> {
    let inputs = inputs(admission, highest, average);

    MamdaniInference::default().eval(&admission.vars, &admission.rules, &inputs)
}

#[test]
fn test_admission_cutoff() {
    let admission = admission();
    let outputs = eval(&admission, 97., 68.).unwrap();
    let strengths: Vec<_> = outputs.activations().iter().map(RuleActivation::firing_strength).collect();

    assert_eq!(strengths[0], 0.);
    assert!((strengths[1] - 0.2).abs() < 1e-12);
    assert!((strengths[2] - 0.8).abs() < 1e-12);

    let cutoff = outputs.get_inferred_membership(admission.cutoff).unwrap();

    assert!((cutoff - 79.476_190_476_190_5).abs() < 1e-9, "cutoff was {cutoff}");
    assert_eq!(outputs.outputs().len(), 1);
    assert_eq!(outputs.output_by_name("cutoff").unwrap().aggregated().samples().len(), 36);

    let high = outputs.degree(admission.highest.key(), Highest::High.into()).unwrap();

    assert!((high - 0.3).abs() < 1e-12);
}

#[test]
fn test_out_of_range_input_clamps() {
    let admission = admission();
    let clamped = eval(&admission, 150., 68.).unwrap();
    let edge = eval(&admission, 100., 68.).unwrap();

    assert_eq!(
        clamped.get_inferred_membership(admission.cutoff),
        edge.get_inferred_membership(admission.cutoff)
    );
}

#[test]
fn test_missing_and_invalid_input() {
    let admission = admission();
    let mut inputs = Inputs::new();

    inputs.add(admission.highest, 80.);

    assert_eq!(
        MamdaniInference::default().eval(&admission.vars, &admission.rules, &inputs).unwrap_err(),
        FuzzyError::MissingInput { variable: "average".into() }
    );
    assert_eq!(
        eval(&admission, f64::NAN, 60.).unwrap_err(),
        FuzzyError::InvalidInput { variable: "highest".into() }
    );
}

#[test]
fn test_degenerate_policies() {
    let admission = admission();

    // highest = 50 and average = 20 sit outside every premise term
    assert_eq!(
        eval(&admission, 50., 20.).unwrap_err(),
        FuzzyError::DegenerateAggregate { variable: "cutoff".into() }
    );

    let inputs = inputs(&admission, 50., 20.);
    let model = MamdaniInference::new(DefuzzificationOp::Centroid, OnDegenerate::UniverseMidpoint);
    let outputs = model.eval(&admission.vars, &admission.rules, &inputs).unwrap();
    let cutoff = outputs.output_by_name("cutoff").unwrap();

    assert_eq!(cutoff.value(), 77.5);
    assert!(cutoff.is_degenerate());
}

#[test]
fn test_alternative_defuzzification() {
    let admission = admission();
    let inputs = inputs(&admission, 97., 68.);
    let value = |op| {
        let model = MamdaniInference::new(op, OnDegenerate::Fail);
        let outputs = model.eval(&admission.vars, &admission.rules, &inputs).unwrap();

        outputs.get_inferred_membership(admission.cutoff).unwrap()
    };

    assert_eq!(value(DefuzzificationOp::MeanOfMaximum), 80.5);
    assert_eq!(value(DefuzzificationOp::SmallestOfMaximum), 78.);
    assert_eq!(value(DefuzzificationOp::LargestOfMaximum), 83.);
    assert!((value(DefuzzificationOp::Bisector) - 80.25).abs() < 1e-9);
    assert!((value(DefuzzificationOp::AreaCentroid) - 79.476_190_476_190_5).abs() < 1e-9);
}

#[test]
fn test_shared_consequent_terms_activate_separately() {
    let admission = admission();
    let mut rules = admission.rules.clone();
    let (average, cutoff) = (admission.average, admission.cutoff);

    rules.add(&admission.vars, average.is_not(Average::Low), cutoff.is(Cutoff::High)).unwrap();

    let inputs = inputs(&admission, 97., 68.);
    let outputs = MamdaniInference::default().eval(&admission.vars, &rules, &inputs).unwrap();

    assert_eq!(outputs.activations().len(), 4);
    assert_eq!(outputs.activations()[3].firing_strength(), 1.);
    assert_eq!(outputs.activations()[3].curve().samples(), admission_high_curve(&admission));
}

#[cfg(test)]
fn admission_high_curve(admission: &Admission) -> &[f64] {
    let cutoff = admission.vars.get(admission.cutoff.key()).unwrap();

    cutoff.term(&Cutoff::High.into()).unwrap().samples()
}

#[test]
fn test_nested_premise() {
    let admission = admission();
    let (highest, average, cutoff) = (admission.highest, admission.average, admission.cutoff);
    let mut rules = Rules::new();
    let premise = highest.is(Highest::High).and(average.is(Average::High)).or(average.is(Average::Medium));

    rules.add(&admission.vars, premise, cutoff.is(Cutoff::Medium)).unwrap();

    let inputs = inputs(&admission, 97., 68.);
    let outputs = MamdaniInference::default().eval(&admission.vars, &rules, &inputs).unwrap();
    let activation = &outputs.activations()[0];
    let medium = admission.vars.get(cutoff.key()).unwrap().term(&Cutoff::Medium.into()).unwrap();
    let strength = activation.firing_strength();
    let clipped: Vec<f64> = medium.samples().iter().map(|&m| m.min(strength)).collect();

    // max(min(0.3, 0.8), 0.2)
    assert!((strength - 0.3).abs() < 1e-12);
    assert_eq!(activation.curve().samples(), &clipped[..]);
    assert!(clipped.iter().any(|&m| m == strength));
    assert!((outputs.get_inferred_membership(cutoff).unwrap() - 70.).abs() < 1e-9);
}
