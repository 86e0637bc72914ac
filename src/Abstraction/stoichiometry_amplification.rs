//! Stoichiometry amplification: reactions move `a` times as many molecules per firing
//! and fire `a` times less often.
//!
//! 1. every reaction is amplified;
//! 2. only pure-birth and pure-death reactions are amplified;
//! 3. as 1, and each reactant `S` of stoichiometry `s` is read as `S - s*(a-1)/2`.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{number, shifted_species};
use crate::Abstraction::properties::{
    DEFAULT_STOICHIOMETRY_AMPLIFIER, Properties, STOICHIOMETRY_AMPLIFIER_KEY,
};
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::Reb2SacResult;
use log::{debug, info};

const IDS: [&str; 3] = [
    "stoichiometry-amplifier",
    "stoichiometry-amplifier-2",
    "stoichiometry-amplifier-3",
];

#[derive(Debug, Clone)]
pub struct StoichiometryAmplificationMethod {
    variant: usize,
    amplifier: i64,
}

impl StoichiometryAmplificationMethod {
    pub fn new(variant: usize, properties: &Properties) -> Self {
        Self {
            variant: variant.clamp(1, IDS.len()),
            amplifier: properties
                .get_int(STOICHIOMETRY_AMPLIFIER_KEY, DEFAULT_STOICHIOMETRY_AMPLIFIER),
        }
    }

    pub fn variant(&self) -> usize {
        self.variant
    }

    pub fn is_condition_satisfied(&self, ir: &IR, reaction: ReactionId) -> bool {
        if self.variant != 2 {
            return true;
        }
        let (reactants, products) = (ir.reactant_edges(reaction), ir.product_edges(reaction));
        (reactants.is_empty() && products.len() == 1)
            || (reactants.len() == 1 && products.is_empty())
    }

    fn do_transformation(&self, ir: &mut IR, reaction: ReactionId) -> Reb2SacResult<()> {
        let a = self.amplifier as f64;
        let mut law = ir.reaction(reaction)?.kinetic_law().clone();
        for edge in ir.reactant_edges(reaction) {
            let stoichiometry = ir.stoichiometry_in_edge(edge)?;
            if self.variant == 3 {
                let species = ir.species_in_edge(edge)?;
                let shift = number(stoichiometry * (a - 1.0) / 2.0);
                law.replace_species_with_kinetic_law(species, &shifted_species(species, shift));
            }
            ir.set_stoichiometry(edge, stoichiometry * a)?;
        }
        for edge in ir.product_edges(reaction) {
            let stoichiometry = ir.stoichiometry_in_edge(edge)?;
            ir.set_stoichiometry(edge, stoichiometry * a)?;
        }
        ir.set_kinetic_law(reaction, law / KineticLaw::int(self.amplifier))?;
        debug!("'{}' amplified by {}", ir.reaction(reaction)?.name, self.amplifier);
        Ok(())
    }
}

impl AbstractionMethod for StoichiometryAmplificationMethod {
    fn id(&self) -> &'static str {
        IDS[self.variant - 1]
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        if self.amplifier <= 1 {
            info!("{}: amplifier {} leaves the model as is", self.id(), self.amplifier);
            return Ok(());
        }
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if self.is_condition_satisfied(ir, reaction) {
                self.do_transformation(ir, reaction)?;
                count += 1;
            }
        }
        info!("{}: {} reactions amplified by {}", self.id(), count, self.amplifier);
        Ok(())
    }

    fn is_idempotent(&self) -> bool {
        false
    }
}
