//! Plain-data description of a fuzzy system, deserializable from TOML.
//!
//! ```toml
//! defuzzification = "centroid"
//!
//! [[variable]]
//! name = "speed"
//! min = 0.0
//! max = 100.0
//! step = 1.0
//! terms = { slow = { triangular = [0.0, 0.0, 50.0] }, fast = { trapezoidal = [40.0, 80.0, 100.0, 100.0] } }
//!
//! [[rule]]
//! combinator = "or"
//! antecedents = [{ variable = "speed", term = "fast" }]
//! consequent = { variable = "brake", term = "hard" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dsl::Combinator;
use crate::error::{FuzzyError, Result};
use crate::inference::OnDegenerate;
use crate::membership::Shape;
use crate::ops::DefuzzificationOp;
use crate::universe::Universe;

/// Default sampling step when a variable gives neither `steps` nor `step`
pub const DEFAULT_STEP: f64 = 0.1;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    #[serde(default)]
    pub defuzzification: DefuzzificationOp,
    #[serde(default)]
    pub on_degenerate: OnDegenerate,
    #[serde(default, rename = "variable")]
    pub variables: Vec<VariableConfig>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

impl SystemConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableConfig {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// Number of sample points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    /// Distance between sample points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default)]
    pub terms: BTreeMap<String, Shape>,
}

impl VariableConfig {
    pub fn universe(&self) -> Result<Universe> {
        match (self.steps, self.step) {
            (Some(_), Some(_)) => {
                Err(FuzzyError::Config(format!("variable `{}` sets both `steps` and `step`", self.name)))
            },
            (Some(steps), None) => Universe::new(self.min, self.max, steps),
            (None, step) => Universe::with_step(self.min, self.max, step.unwrap_or(DEFAULT_STEP)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default)]
    pub combinator: Combinator,
    pub antecedents: Vec<AntecedentConfig>,
    pub consequent: TermRef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AntecedentConfig {
    pub variable: String,
    pub term: String,
    #[serde(default)]
    pub negated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermRef {
    pub variable: String,
    pub term: String,
}

#[test]
fn test_parse_config() {
    let config = SystemConfig::from_toml(
        r#"
        defuzzification = "mean_of_maximum"

        [[variable]]
        name = "speed"
        min = 0.0
        max = 100.0
        steps = 101
        terms = { fast = { trapezoidal = [40.0, 80.0, 100.0, 100.0] } }

        [[variable]]
        name = "brake"
        min = 0.0
        max = 1.0
        [variable.terms]
        hard = { piecewise = [[0.5, 0.0], [1.0, 1.0]] }

        [[rule]]
        antecedents = [{ variable = "speed", term = "fast", negated = true }]
        consequent = { variable = "brake", term = "hard" }
        "#,
    )
    .unwrap();

    assert_eq!(config.defuzzification, DefuzzificationOp::MeanOfMaximum);
    assert_eq!(config.on_degenerate, OnDegenerate::Fail);
    assert_eq!(config.variables[0].terms["fast"], Shape::trapezoidal(40., 80., 100., 100.));
    assert_eq!(config.variables[1].terms["hard"], Shape::piecewise([(0.5, 0.), (1., 1.)]));
    assert_eq!(config.variables[0].universe().unwrap().steps(), 101);
    assert_eq!(config.variables[1].universe().unwrap().steps(), 11);
    assert_eq!(config.rules[0].combinator, Combinator::And);
    assert!(config.rules[0].antecedents[0].negated);
}

#[test]
fn test_config_errors() {
    assert!(matches!(SystemConfig::from_toml("[[variable]]\nname = 3"), Err(FuzzyError::Config(_))));
    assert!(matches!(SystemConfig::from_toml("defuzzification = \"median\""), Err(FuzzyError::Config(_))));

    let both = VariableConfig {
        name: "speed".into(),
        min: 0.,
        max: 1.,
        steps: Some(3),
        step: Some(0.5),
        terms: BTreeMap::new(),
    };

    assert!(matches!(both.universe(), Err(FuzzyError::Config(_))));
}
