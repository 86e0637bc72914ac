//! Species nodes of the reaction-network IR.
use crate::KineticLaw::kinetic_law::KineticLaw;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Graph-owned handle of a species. Edges and kinetic laws refer to species only by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub(crate) usize);

impl SpeciesId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "species#{}", self.0)
    }
}

/// initial amount and initial concentration are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialQuantity {
    Amount(f64),
    Concentration(f64),
}

impl InitialQuantity {
    pub fn value(&self) -> f64 {
        match self {
            InitialQuantity::Amount(v) | InitialQuantity::Concentration(v) => *v,
        }
    }
    pub fn is_amount(&self) -> bool {
        matches!(self, InitialQuantity::Amount(_))
    }
    /// same quantity mode, value moved by `delta`
    pub fn shifted(&self, delta: f64) -> Self {
        match self {
            InitialQuantity::Amount(v) => InitialQuantity::Amount(v + delta),
            InitialQuantity::Concentration(v) => InitialQuantity::Concentration(v + delta),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub compartment: Option<String>,
    pub initial_quantity: InitialQuantity,
    pub boundary_condition: bool,
    /// participates only in the fast sub-network
    pub fast: bool,
    pub initial_assignment: Option<KineticLaw>,
    pub conversion_factor: Option<String>,
}

impl Species {
    pub fn new(id: SpeciesId, name: &str, initial_quantity: InitialQuantity) -> Self {
        Self {
            id,
            name: name.to_string(),
            compartment: None,
            initial_quantity,
            boundary_condition: false,
            fast: false,
            initial_assignment: None,
            conversion_factor: None,
        }
    }

    pub fn adjust_initial_quantity(&mut self, delta: f64) {
        self.initial_quantity = self.initial_quantity.shifted(delta);
    }
}
