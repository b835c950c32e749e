use crate::config::{RuleConfig, SystemConfig};
use crate::dsl::{Expr, Polarity, Proposition};
use crate::error::{FuzzyError, Result};
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::Variables;

/// A rule base over string-named variables and terms, built from a [`SystemConfig`].
#[derive(Clone, Debug)]
pub struct FuzzySystem {
    variables: Variables<String>,
    rules: Rules<String>,
    inference: MamdaniInference,
}

impl FuzzySystem {
    pub fn new(variables: Variables<String>, rules: Rules<String>, inference: MamdaniInference) -> Self {
        Self { variables, rules, inference }
    }

    /// Resolves every shape and checks every rule reference up front
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        let mut variables = Variables::new();

        for var in &config.variables {
            let terms = var.terms.iter().map(|(term, shape)| (term.clone(), shape.clone()));

            variables.insert(var.name.clone(), var.universe()?, terms)?;
        }

        let mut rules = Rules::with_capacity(config.rules.len());

        for rule in &config.rules {
            let (premise, consequence) = build_rule(&variables, rule)?;

            rules.add(&variables, premise, consequence)?;
        }

        tracing::debug!(variables = variables.len(), rules = rules.len(), "fuzzy system configured");

        Ok(Self::new(variables, rules, MamdaniInference::new(config.defuzzification, config.on_degenerate)))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Self::from_config(&SystemConfig::from_toml(text)?)
    }

    pub fn variables(&self) -> &Variables<String> {
        &self.variables
    }

    pub fn rules(&self) -> &Rules<String> {
        &self.rules
    }

    pub fn inference(&self) -> MamdaniInference {
        self.inference
    }

    /// Evaluates the rule base for crisp inputs given by variable name
    pub fn infer<K: AsRef<str>>(&self, inputs: impl IntoIterator<Item = (K, f64)>) -> Result<Outputs<String>> {
        let mut keyed = Inputs::new();

        for (name, value) in inputs {
            let name = name.as_ref();
            let key = self.variables.key_of(name).ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))?;

            keyed.add_key(key, value);
        }

        self.inference.eval(&self.variables, &self.rules, &keyed)
    }
}

fn build_rule(variables: &Variables<String>, rule: &RuleConfig) -> Result<(Expr<String>, Expr<String>)> {
    let proposition = |name: &str, term: &str, polarity: Polarity| -> Result<Expr<String>> {
        let key = variables.key_of(name).ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))?;

        Ok(Expr::Is(Proposition::new(key, term.to_owned(), polarity)))
    };

    let mut antecedents = rule
        .antecedents
        .iter()
        .map(|a| proposition(&a.variable, &a.term, if a.negated { Polarity::IsNot } else { Polarity::Is }))
        .collect::<Result<Vec<_>>>()?;

    let premise = if antecedents.len() == 1 {
        antecedents.remove(0)
    } else {
        Expr::group(rule.combinator, antecedents)
    };
    let consequence = proposition(&rule.consequent.variable, &rule.consequent.term, Polarity::Is)?;

    Ok((premise, consequence))
}

#[cfg(test)]
const ADMISSION: &str = r#"
    [[variable]]
    name = "highest"
    min = 50.0
    max = 100.0
    step = 1.0
    [variable.terms]
    low = { triangular = [60.0, 70.0, 80.0] }
    medium = { triangular = [70.0, 80.0, 90.0] }
    high = { triangular = [80.0, 90.0, 100.0] }

    [[variable]]
    name = "average"
    min = 20.0
    max = 90.0
    step = 1.0
    [variable.terms]
    low = { triangular = [40.0, 50.0, 60.0] }
    medium = { triangular = [50.0, 60.0, 70.0] }
    high = { triangular = [60.0, 70.0, 80.0] }

    [[variable]]
    name = "cutoff"
    min = 60.0
    max = 95.0
    step = 1.0
    [variable.terms]
    low = { triangular = [50.0, 60.0, 70.0] }
    medium = { triangular = [60.0, 70.0, 80.0] }
    high = { triangular = [70.0, 80.0, 95.0] }

    [[rule]]
    combinator = "or"
    antecedents = [{ variable = "highest", term = "low" }, { variable = "average", term = "low" }]
    consequent = { variable = "cutoff", term = "low" }

    [[rule]]
    antecedents = [{ variable = "average", term = "medium" }]
    consequent = { variable = "cutoff", term = "medium" }

    [[rule]]
    combinator = "or"
    antecedents = [{ variable = "highest", term = "high" }, { variable = "average", term = "high" }]
    consequent = { variable = "cutoff", term = "high" }
"#;

#[test]
fn test_infer_by_name() {
    let system = FuzzySystem::from_toml(ADMISSION).unwrap();
    let outputs = system.infer([("highest", 97.), ("average", 68.)]).unwrap();
    let cutoff = outputs.output_by_name("cutoff").unwrap();

    assert!((cutoff.value() - 79.476_190_476_190_5).abs() < 1e-9);
    assert!(outputs.activations()[1].firing_strength() > 0.);
    assert!(outputs.activations()[2].firing_strength() > 0.);
    assert_eq!(cutoff.points().count(), 36);
}

#[test]
fn test_unknown_references_fail_at_build_time() {
    let unknown_term = ADMISSION.replace(r#"term = "medium" }]"#, r#"term = "middling" }]"#);
    let unknown_variable =
        ADMISSION.replace(r#"variable = "average", term = "medium""#, r#"variable = "median", term = "medium""#);

    assert_eq!(
        FuzzySystem::from_toml(&unknown_term).unwrap_err(),
        FuzzyError::UnknownTerm { variable: "average".into(), term: "middling".into() }
    );
    assert_eq!(
        FuzzySystem::from_toml(&unknown_variable).unwrap_err(),
        FuzzyError::UnknownVariable("median".into())
    );
}

#[test]
fn test_infer_input_errors() {
    let system = FuzzySystem::from_toml(ADMISSION).unwrap();

    assert_eq!(
        system.infer([("highest", 97.)]).unwrap_err(),
        FuzzyError::MissingInput { variable: "average".into() }
    );
    assert_eq!(
        system.infer([("highest", 97.), ("average", 68.), ("median", 1.)]).unwrap_err(),
        FuzzyError::UnknownVariable("median".into())
    );
}

#[test]
fn test_concurrent_inference() {
    let system = FuzzySystem::from_toml(ADMISSION).unwrap();
    let expected = system.infer([("highest", 97.), ("average", 68.)]).unwrap().outputs()[0].value();

    std::thread::scope(|scope| {
        let infer = || system.infer([("highest", 97.), ("average", 68.)]).unwrap().outputs()[0].value();
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(infer)).collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_outputs_serialize_as_plain_data() {
    let system = FuzzySystem::from_toml(ADMISSION).unwrap();
    let outputs = system.infer([("highest", 97.), ("average", 68.)]).unwrap();
    let json = serde_json::to_value(&outputs).unwrap();

    assert_eq!(json["outputs"][0]["name"], "cutoff");
    assert_eq!(json["outputs"][0]["aggregated"].as_array().unwrap().len(), 36);
    assert_eq!(json["outputs"][0]["aggregated"][0][0], 60.);
    assert_eq!(json["activations"][2]["rule"], 2);
}
