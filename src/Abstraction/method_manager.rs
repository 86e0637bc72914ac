//! # Abstraction Method Manager
//!
//! ## Purpose
//! Owns the registration table of abstraction methods and applies them to an IR.
//!
//! ## Architecture
//! - **Registration table**: every method is constructed once from the [`Properties`]
//!   and stored under its id, in the canonical order returned by
//!   [`AbstractionMethodManager::method_ids`]
//! - **Staging**: a method runs on a clone of the IR; the clone replaces the caller's IR
//!   only when the method succeeded and the result passed
//!   [`IR::check_consistency`]. A failing method therefore leaves the IR exactly as it
//!   was before that method, while the methods already applied by the same pipeline stay
//!   applied.
//! - **Pipelines**: an explicit list of ids, the list configured under
//!   `reb2sac.abstraction.method`, or [`DEFAULT_ABSTRACTION_PIPELINE`]
//!
//! ## Usage
//! ```rust
//! use reb2sac::Abstraction::method_manager::AbstractionMethodManager;
//! use reb2sac::Abstraction::properties::Properties;
//! use reb2sac::IR::ir_graph::IR;
//! use reb2sac::IR::species_node::InitialQuantity;
//!
//! let mut ir = IR::new("demo");
//! let e = ir.add_species("E", InitialQuantity::Amount(1.0));
//! let s = ir.add_species("S", InitialQuantity::Amount(1.0));
//! let r = ir.create_reaction("R");
//! ir.add_reactant_edge(r, e, 1.0).unwrap();
//! ir.add_reactant_edge(r, s, 1.0).unwrap();
//! ir.add_product_edge(r, e, 1.0).unwrap();
//! let manager = AbstractionMethodManager::new(&Properties::new());
//! manager.apply_methods(&mut ir, &["modifier-structure-transformer"]).unwrap();
//! assert_eq!(ir.reaction_equation(r).unwrap(), "S -> ∅; E");
//! ```
use crate::Abstraction::abstraction_method::{
    AbstractionMethod, AbstractionMethodEnum, DummyAbstractionMethod,
};
use crate::Abstraction::birth_death_generation::BirthDeathGenerationMethod;
use crate::Abstraction::degradation_stoichiometry_amplification::DegradationStoichiometryAmplificationMethod;
use crate::Abstraction::enzyme_kinetics::EnzymeKineticQssa1Method;
use crate::Abstraction::kinetic_law_transformations::{
    DistributeMethod, KineticLawConstantsSimplifierMethod, PowKineticLawTransformationMethod,
};
use crate::Abstraction::properties::{
    ABSTRACTION_METHOD_KEY, DEFAULT_MAX_ABSTRACTION_PASSES, MAX_ABSTRACTION_PASSES_KEY,
    Properties,
};
use crate::Abstraction::rapid_equilibrium::{
    DimerizationLevelAssignmentMethod, DimerizationReductionMethod, OpSiteBindingAbstractionMethod,
};
use crate::Abstraction::reaction_splitting::{
    MultipleProductsReactionEliminationMethod, MultipleReactantsReactionEliminationMethod,
    SingleReactantProductReactionEliminationMethod,
};
use crate::Abstraction::reversible_methods::{
    ReversibleReactionStructureTransformationMethod, ReversibleToIrreversibleMethod,
};
use crate::Abstraction::species_elimination::{
    IrrelevantSpeciesEliminationMethod, ModifierConstantPropagationMethod,
};
use crate::Abstraction::stoichiometry_amplification::StoichiometryAmplificationMethod;
use crate::Abstraction::structure_transformations::{
    ModifierStructureTransformationMethod, SimilarReactionCombiningMethod,
};
use crate::IR::ir_graph::IR;
use crate::error::{Reb2SacError, Reb2SacResult};
use indexmap::IndexMap;
use log::{info, warn};

/// Pipeline used when no `reb2sac.abstraction.method` is configured.
pub const DEFAULT_ABSTRACTION_PIPELINE: [&str; 10] = [
    "modifier-structure-transformer",
    "enzyme-kinetic-qssa-1",
    "dimerization-reduction",
    "op-site-binding-abstractor",
    "distribute-transformer",
    "reversible-to-irreversible-transformer",
    "similar-reaction-combiner",
    "modifier-constant-propagation",
    "kinetic-law-constants-simplifier",
    "irrelevant-species-elimination",
];

pub struct AbstractionMethodManager {
    methods: IndexMap<&'static str, AbstractionMethodEnum>,
    properties: Properties,
}

impl AbstractionMethodManager {
    pub fn new(properties: &Properties) -> Self {
        let mut table: Vec<AbstractionMethodEnum> = vec![
            DimerizationLevelAssignmentMethod.into(),
            PowKineticLawTransformationMethod::from_properties(properties).into(),
            OpSiteBindingAbstractionMethod::new(true).into(),
            OpSiteBindingAbstractionMethod::new(false).into(),
            DimerizationReductionMethod.into(),
            EnzymeKineticQssa1Method.into(),
            ModifierConstantPropagationMethod.into(),
            IrrelevantSpeciesEliminationMethod::from_properties(properties).into(),
            KineticLawConstantsSimplifierMethod.into(),
            DistributeMethod.into(),
            SimilarReactionCombiningMethod.into(),
            ModifierStructureTransformationMethod.into(),
            ReversibleReactionStructureTransformationMethod.into(),
            ReversibleToIrreversibleMethod.into(),
            MultipleProductsReactionEliminationMethod.into(),
            MultipleReactantsReactionEliminationMethod.into(),
            SingleReactantProductReactionEliminationMethod.into(),
        ];
        for variant in 1..=3 {
            table.push(StoichiometryAmplificationMethod::new(variant, properties).into());
        }
        for variant in 1..=8 {
            table.push(DegradationStoichiometryAmplificationMethod::new(variant, properties).into());
        }
        for variant in 1..=7 {
            table.push(BirthDeathGenerationMethod::new(variant, properties).into());
        }
        table.push(DummyAbstractionMethod.into());

        let methods = table.into_iter().map(|method| (method.id(), method)).collect();
        Self {
            methods,
            properties: properties.clone(),
        }
    }

    /// registered ids in canonical order
    pub fn method_ids(&self) -> Vec<&'static str> {
        self.methods.keys().copied().collect()
    }

    pub fn lookup_method(&self, id: &str) -> Reb2SacResult<&AbstractionMethodEnum> {
        self.methods
            .get(id)
            .ok_or_else(|| Reb2SacError::UnknownMethod(id.to_string()))
    }

    /// Runs one method on a staged copy of `ir` and commits it on success.
    pub fn apply_method(&self, ir: &mut IR, id: &str) -> Reb2SacResult<()> {
        let method = self.lookup_method(id)?;
        info!("applying abstraction method '{}' to '{}'", id, ir.name);
        let mut staged = ir.clone();
        method.apply(&mut staged)?;
        staged.check_consistency()?;
        *ir = staged;
        Ok(())
    }

    /// Applies the methods in the given order. Every id is looked up before the first
    /// method runs; the first failing method stops the pipeline.
    pub fn apply_methods<S: AsRef<str>>(&self, ir: &mut IR, ids: &[S]) -> Reb2SacResult<()> {
        for id in ids {
            self.lookup_method(id.as_ref())?;
        }
        for id in ids {
            self.apply_method(ir, id.as_ref())?;
        }
        Ok(())
    }

    pub fn configured_pipeline(&self) -> Vec<String> {
        let configured = self.properties.get_list(ABSTRACTION_METHOD_KEY);
        if configured.is_empty() {
            DEFAULT_ABSTRACTION_PIPELINE.iter().map(|id| id.to_string()).collect()
        } else {
            configured
        }
    }

    pub fn apply_configured(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let pipeline = self.configured_pipeline();
        self.apply_methods(ir, &pipeline)
    }

    /// Repeats the pipeline until a whole pass leaves the model description unchanged,
    /// at most `reb2sac.abstraction.max.passes` times. Returns the number of passes run.
    /// Methods that change the model on every call are refused.
    pub fn apply_until_fixed_point<S: AsRef<str>>(
        &self,
        ir: &mut IR,
        ids: &[S],
    ) -> Reb2SacResult<usize> {
        for id in ids {
            let method = self.lookup_method(id.as_ref())?;
            if !method.is_idempotent() {
                return Err(Reb2SacError::failing(
                    "abstraction method manager",
                    "apply until fixed point",
                    format!("'{}' changes the model on every application", id.as_ref()),
                ));
            }
        }
        let max_passes = self
            .properties
            .get_int(MAX_ABSTRACTION_PASSES_KEY, DEFAULT_MAX_ABSTRACTION_PASSES)
            .max(1) as usize;
        for pass in 1..=max_passes {
            let before = ir.to_description()?;
            self.apply_methods(ir, ids)?;
            if ir.to_description()? == before {
                info!("'{}' reached a fixed point after {} passes", ir.name, pass);
                return Ok(pass);
            }
        }
        warn!("'{}' still changes after {} passes, stopping", ir.name, max_passes);
        Ok(max_passes)
    }
}
