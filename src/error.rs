//! Crate-wide error type.
//!
//! Every graph mutator, kinetic-law operation and abstraction method returns a
//! [`Reb2SacResult`]. There is no retry and no partial success: the first error
//! aborts the running method and the abstraction pipeline above it.
use crate::IR::ir_edge::EdgeId;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Reb2SacError {
    /// generic internal failure: component + operation + context
    #[error("{component}: {operation} failed: {message}")]
    Failing {
        component: &'static str,
        operation: &'static str,
        message: String,
    },
    #[error("species {0} is not present in the IR")]
    UnknownSpecies(SpeciesId),
    #[error("reaction {0} is not present in the IR")]
    UnknownReaction(ReactionId),
    #[error("edge {0} is not present in the IR")]
    UnknownEdge(EdgeId),
    #[error("abstraction method '{0}' is not registered")]
    UnknownMethod(String),
    #[error("species '{species}' is still referenced by {referenced_by}")]
    SpeciesStillReferenced {
        species: String,
        referenced_by: String,
    },
    #[error("malformed kinetic law: {0}")]
    MalformedKineticLaw(String),
    #[error("kinetic law parse error at {position}: {message}")]
    Parse { position: usize, message: String },
    #[error("kinetic law evaluation failed: {0}")]
    Evaluation(String),
    #[error("IR is inconsistent: {0}")]
    Inconsistent(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Reb2SacError {
    pub fn failing(
        component: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Reb2SacError::Failing {
            component,
            operation,
            message: message.into(),
        }
    }
}

pub type Reb2SacResult<T> = Result<T, Reb2SacError>;
