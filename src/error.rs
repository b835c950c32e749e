use thiserror::Error;

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;

/// Errors raised while configuring or evaluating a fuzzy system
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    /// Universe bounds or resolution are unusable
    #[error("invalid universe [{min}, {max}] with {steps} steps: {reason}")]
    InvalidUniverse { min: f64, max: f64, steps: usize, reason: &'static str },

    /// Membership function control points are malformed
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("variable `{0}` is already defined")]
    DuplicateVariable(String),

    /// A rule or input refers to a variable that was never defined
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A rule refers to a term its variable does not define
    #[error("unknown term `{term}` in variable `{variable}`")]
    UnknownTerm { variable: String, term: String },

    #[error("rule #{rule}: consequent must be a single affirmative term")]
    InvalidConsequent { rule: usize },

    #[error("rule #{rule}: premise has no propositions")]
    EmptyPremise { rule: usize },

    /// An input used by at least one rule was not supplied
    #[error("missing input for variable `{variable}`")]
    MissingInput { variable: String },

    #[error("input for variable `{variable}` is not a number")]
    InvalidInput { variable: String },

    /// Every sample of the aggregated output curve is zero
    #[error("aggregated membership of `{variable}` is zero everywhere; no rule fired")]
    DegenerateAggregate { variable: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FuzzyError {
    fn from(err: toml::de::Error) -> Self {
        FuzzyError::Config(err.to_string())
    }
}
