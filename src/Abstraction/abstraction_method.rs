//! Common interface of the abstraction methods.
//!
//! Every method is a named rewrite rule over the IR. Most of them follow the same shape:
//! scan a snapshot of the species or reaction list, test a structural condition on each
//! node, and transform the nodes that satisfy it. A method returns the first error it
//! meets; the manager decides what happens to the partially rewritten IR.
use crate::Abstraction::birth_death_generation::BirthDeathGenerationMethod;
use crate::Abstraction::degradation_stoichiometry_amplification::DegradationStoichiometryAmplificationMethod;
use crate::Abstraction::enzyme_kinetics::EnzymeKineticQssa1Method;
use crate::Abstraction::kinetic_law_transformations::{
    DistributeMethod, KineticLawConstantsSimplifierMethod, PowKineticLawTransformationMethod,
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
use crate::error::Reb2SacResult;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub trait AbstractionMethod {
    /// registry key of the method
    fn id(&self) -> &'static str;
    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()>;
    /// Whether a second application right after the first leaves the IR unchanged.
    /// Amplifiers multiply stoichiometries on every call and report `false`.
    fn is_idempotent(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct DummyAbstractionMethod;

impl AbstractionMethod for DummyAbstractionMethod {
    fn id(&self) -> &'static str {
        "dummy-abstraction-method"
    }
    fn apply(&self, _ir: &mut IR) -> Reb2SacResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
#[enum_dispatch(AbstractionMethod)]
pub enum AbstractionMethodEnum {
    Dummy(DummyAbstractionMethod),
    PowKineticLaw(PowKineticLawTransformationMethod),
    Distribute(DistributeMethod),
    ConstantsSimplifier(KineticLawConstantsSimplifierMethod),
    OpSiteBinding(OpSiteBindingAbstractionMethod),
    Dimerization(DimerizationReductionMethod),
    DimerizationLevel(DimerizationLevelAssignmentMethod),
    EnzymeQssa(EnzymeKineticQssa1Method),
    ModifierConstantPropagation(ModifierConstantPropagationMethod),
    IrrelevantSpecies(IrrelevantSpeciesEliminationMethod),
    SimilarReactionCombiner(SimilarReactionCombiningMethod),
    ModifierStructure(ModifierStructureTransformationMethod),
    ReversibleStructure(ReversibleReactionStructureTransformationMethod),
    ReversibleToIrreversible(ReversibleToIrreversibleMethod),
    MultipleProducts(MultipleProductsReactionEliminationMethod),
    MultipleReactants(MultipleReactantsReactionEliminationMethod),
    SingleReactantProduct(SingleReactantProductReactionEliminationMethod),
    StoichiometryAmplifier(StoichiometryAmplificationMethod),
    DegradationStoichiometryAmplifier(DegradationStoichiometryAmplificationMethod),
    BirthDeath(BirthDeathGenerationMethod),
}
