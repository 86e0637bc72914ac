//! Reaction nodes of the reaction-network IR.
use crate::KineticLaw::kinetic_law::KineticLaw;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReactionId(pub(crate) usize);

impl ReactionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ReactionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "reaction#{}", self.0)
    }
}

/// A reaction owns exactly one kinetic law at any time. Replacing the law hands the
/// previous tree back to the caller, who drops it or reuses it.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub id: ReactionId,
    pub name: String,
    pub reversible: bool,
    pub fast: bool,
    kinetic_law: KineticLaw,
    /// stochastic bookkeeping for the simulators
    pub fire_count: u64,
    /// time of the last propensity update, memoized by the simulators
    pub rate_update_time: f64,
}

impl Reaction {
    pub fn new(id: ReactionId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            reversible: false,
            fast: false,
            kinetic_law: KineticLaw::real(0.0),
            fire_count: 0,
            rate_update_time: -1.0,
        }
    }

    pub fn kinetic_law(&self) -> &KineticLaw {
        &self.kinetic_law
    }

    pub fn kinetic_law_mut(&mut self) -> &mut KineticLaw {
        &mut self.kinetic_law
    }

    /// installs `law` and returns the law it replaced
    pub fn set_kinetic_law(&mut self, law: KineticLaw) -> KineticLaw {
        std::mem::replace(&mut self.kinetic_law, law)
    }
}
