//! Role-typed edges between a species and a reaction. The edge is the only place a
//! stoichiometry lives.
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRole {
    Reactant,
    Product,
    Modifier,
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            EdgeRole::Reactant => "reactant",
            EdgeRole::Product => "product",
            EdgeRole::Modifier => "modifier",
        };
        write!(f, "{}", name)
    }
}

/// Endpoints and role are fixed by the IR (see `IR::set_edge_role`), so the species and
/// reaction adjacency views can never disagree about an edge.
#[derive(Debug, Clone)]
pub struct IrEdge {
    pub(crate) id: EdgeId,
    pub(crate) role: EdgeRole,
    pub(crate) species: SpeciesId,
    pub(crate) reaction: ReactionId,
    pub stoichiometry: f64,
    /// symbolic species-reference parameter carrying the stoichiometry, if any
    pub species_ref: Option<String>,
}

impl IrEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }
    pub fn role(&self) -> EdgeRole {
        self.role
    }
    pub fn species(&self) -> SpeciesId {
        self.species
    }
    pub fn reaction(&self) -> ReactionId {
        self.reaction
    }
    pub fn stoichiometry(&self) -> f64 {
        self.stoichiometry
    }
}
