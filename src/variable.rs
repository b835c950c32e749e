use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};

use crate::error::{FuzzyError, Result};
use crate::membership::{MembershipFunction, Shape};
use crate::terms::{Key, Terms};
use crate::universe::Universe;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Typed handle to a variable whose terms are `I`
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Variable<I> {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> Debug for Variable<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

/// A named variable and the sampled curves of its terms, all over one universe
#[derive(Clone, Debug)]
pub struct LinguisticVariable<T> {
    name: String,
    universe: Arc<Universe>,
    terms: HashMap<T, MembershipFunction>,
}

impl<T: Clone + Eq + Hash + Debug> LinguisticVariable<T> {
    fn new(name: String, universe: Universe, shapes: impl IntoIterator<Item = (T, Shape)>) -> Result<Self> {
        let universe = Arc::new(universe);
        let mut terms = HashMap::new();

        for (term, shape) in shapes {
            let membership = shape.resolve_shared(universe.clone())?;

            if membership.is_zero() {
                tracing::warn!(variable = %name, term = ?term, "term is zero across the whole universe");
            }

            terms.insert(term, membership);
        }

        Ok(Self { name, universe, terms })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub(crate) fn shared_universe(&self) -> Arc<Universe> {
        self.universe.clone()
    }

    pub fn term(&self, term: &T) -> Option<&MembershipFunction> {
        self.terms.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&T, &MembershipFunction)> {
        self.terms.iter()
    }

    pub(crate) fn require_term(&self, term: &T) -> Result<&MembershipFunction> {
        self.terms.get(term).ok_or_else(|| FuzzyError::UnknownTerm {
            variable: self.name.clone(),
            term: term_label(term),
        })
    }
}

pub(crate) fn term_label<T: Debug>(term: &T) -> String {
    format!("{term:?}").trim_matches('"').to_owned()
}

/// The variable store. Cloning is cheap: variables are shared until one of the clones is reconfigured.
#[derive(Clone, Debug)]
pub struct Variables<T> {
    pub(crate) vars: SlotMap<VariableKey, Arc<LinguisticVariable<T>>>,
    names: HashMap<String, VariableKey>,
}

impl<T: Clone + Eq + Hash + Debug> Variables<T> {
    pub fn new() -> Self {
        Self { vars: SlotMap::with_key(), names: HashMap::new() }
    }

    /// Adds a variable whose terms are keyed by the enum `I`
    pub fn add<I: Into<T> + Key>(
        &mut self,
        name: impl Into<String>,
        universe: Universe,
        terms: Terms<I>,
    ) -> Result<Variable<I>> {
        let shapes = terms.0.iter().map(|(k, shape)| (k.into(), shape.clone()));
        let key = self.insert_shapes(name.into(), universe, shapes)?;

        Ok(Variable(key, PhantomData))
    }

    /// Adds a variable whose terms are given as `(term, shape)` pairs
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        universe: Universe,
        terms: impl IntoIterator<Item = (T, Shape)>,
    ) -> Result<Variable<T>> {
        let key = self.insert_shapes(name.into(), universe, terms)?;

        Ok(Variable(key, PhantomData))
    }

    fn insert_shapes(
        &mut self,
        name: String,
        universe: Universe,
        shapes: impl IntoIterator<Item = (T, Shape)>,
    ) -> Result<VariableKey> {
        if self.names.contains_key(&name) {
            return Err(FuzzyError::DuplicateVariable(name));
        }

        let var = LinguisticVariable::new(name.clone(), universe, shapes)?;

        tracing::debug!(
            variable = %name,
            terms = var.terms.len(),
            steps = var.universe.steps(),
            "variable added"
        );

        let key = self.vars.insert(Arc::new(var));

        self.names.insert(name, key);

        Ok(key)
    }

    /// Re-samples an existing term with a new shape.
    ///
    /// Copy-on-write: clones of this store taken earlier keep seeing the old curve.
    pub fn replace_term(&mut self, key: VariableKey, term: &T, shape: Shape) -> Result<()> {
        let var = self.vars.get_mut(key).ok_or_else(|| FuzzyError::UnknownVariable(format!("{key:?}")))?;

        var.require_term(term)?;

        let membership = shape.resolve_shared(var.universe.clone())?;
        let var = Arc::make_mut(var);

        var.terms.insert(term.clone(), membership);

        tracing::debug!(variable = %var.name, term = ?term, "term replaced");

        Ok(())
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable<T>> {
        self.vars.get(key).map(|var| &**var)
    }

    pub fn key_of(&self, name: &str) -> Option<VariableKey> {
        self.names.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&LinguisticVariable<T>> {
        self.key_of(name).and_then(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable<T>)> {
        self.vars.iter().map(|(key, var)| (key, &**var))
    }

    pub(crate) fn require(&self, key: VariableKey) -> Result<&LinguisticVariable<T>> {
        self.get(key).ok_or_else(|| FuzzyError::UnknownVariable(format!("{key:?}")))
    }
}

impl<T: Clone + Eq + Hash + Debug> Default for Variables<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_variables() {
    let mut vars = Variables::<String>::new();
    let universe = Universe::new(0., 10., 11).unwrap();
    let speed = vars
        .insert(
            "speed",
            universe.clone(),
            [("slow".to_owned(), Shape::triangular(0., 0., 5.)), ("fast".to_owned(), Shape::triangular(5., 10., 10.))],
        )
        .unwrap();

    assert_eq!(vars.key_of("speed"), Some(speed.key()));
    assert_eq!(vars.by_name("speed").unwrap().terms().count(), 2);
    assert_eq!(
        vars.insert("speed", universe, Vec::<(String, Shape)>::new()).unwrap_err(),
        FuzzyError::DuplicateVariable("speed".into())
    );

    let err = vars.get(speed.key()).unwrap().require_term(&"medium".to_owned()).unwrap_err();

    assert_eq!(err, FuzzyError::UnknownTerm { variable: "speed".into(), term: "medium".into() });
}

#[test]
fn test_replace_term_is_copy_on_write() {
    let mut vars = Variables::<String>::new();
    let universe = Universe::new(0., 10., 11).unwrap();
    let speed = vars.insert("speed", universe, [("slow".to_owned(), Shape::triangular(0., 0., 5.))]).unwrap();
    let snapshot = vars.clone();
    let slow = "slow".to_owned();

    vars.replace_term(speed.key(), &slow, Shape::triangular(0., 0., 10.)).unwrap();

    assert_eq!(snapshot.get(speed.key()).unwrap().term(&slow).unwrap().samples()[5], 0.);
    assert_eq!(vars.get(speed.key()).unwrap().term(&slow).unwrap().samples()[5], 0.5);
    assert!(matches!(
        vars.replace_term(speed.key(), &"fast".to_owned(), Shape::triangular(0., 1., 2.)),
        Err(FuzzyError::UnknownTerm { .. })
    ));
}
