//! # Degradation stoichiometry amplification
//!
//! Pure-death reactions `s S -> ∅` of a species are combined per stoichiometry and made
//! to remove `s*a` molecules at a time, `a` being the configured amplifier. The law is
//! divided by `a` so the mean consumption is kept, and `S` is read through a shifted
//! value `S - shift` so the amplified process does not overshoot at low counts.
//!
//! | variant | deaths | shift | extra |
//! |---|---|---|---|
//! | 1 | unit | none | |
//! | 2 | unit | `(a-1)/2` | |
//! | 3 | any `s` | `s*a/2` | |
//! | 4 | any `s` | `(s*a-s)/2` | |
//! | 5 | any `s` | `s*a/2` | pure births of `S` amplified too |
//! | 6 | any `s` | `⌊s*a/2⌋` | |
//! | 7 | any `s` | `⌊s*a/2⌋` | pure births of `S` amplified too |
//! | 8 | any `s` | `s*a/2` | initial amount of `S` raised by the shift |
//!
//! An amplifier of 1 or less leaves the model untouched.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{
    adjust_initial_amount, combine_reactions, is_pure_birth, is_pure_death, number,
    shifted_species, sole_edge,
};
use crate::Abstraction::properties::{
    DEFAULT_DEGRADATION_STOICHIOMETRY_AMPLIFIER, DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY,
    Properties,
};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::{Reb2SacError, Reb2SacResult};
use log::{debug, info};

const IDS: [&str; 8] = [
    "degradation-stoichiometry-amplifier",
    "degradation-stoichiometry-amplifier-2",
    "degradation-stoichiometry-amplifier-3",
    "degradation-stoichiometry-amplifier-4",
    "degradation-stoichiometry-amplifier-5",
    "degradation-stoichiometry-amplifier-6",
    "degradation-stoichiometry-amplifier-7",
    "degradation-stoichiometry-amplifier-8",
];

#[derive(Debug, Clone)]
pub struct DegradationStoichiometryAmplificationMethod {
    variant: usize,
    amplifier: i64,
}

impl DegradationStoichiometryAmplificationMethod {
    pub fn new(variant: usize, properties: &Properties) -> Self {
        Self {
            variant: variant.clamp(1, IDS.len()),
            amplifier: properties.get_int(
                DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY,
                DEFAULT_DEGRADATION_STOICHIOMETRY_AMPLIFIER,
            ),
        }
    }

    pub fn variant(&self) -> usize {
        self.variant
    }

    pub fn amplifier(&self) -> i64 {
        self.amplifier
    }

    fn unit_only(&self) -> bool {
        matches!(self.variant, 1 | 2)
    }

    fn amplifies_births(&self) -> bool {
        matches!(self.variant, 5 | 7)
    }

    fn shift(&self, stoichiometry: f64) -> Option<KineticLaw> {
        let a = self.amplifier as f64;
        let amplified = stoichiometry * a;
        match self.variant {
            1 => None,
            2 => Some(number((a - 1.0) / 2.0)),
            4 => Some(KineticLaw::real((amplified - stoichiometry) / 2.0)),
            6 | 7 => Some(KineticLaw::int((amplified / 2.0).floor() as i64)),
            _ => Some(KineticLaw::real(amplified / 2.0)),
        }
    }

    /// pure deaths of `species` grouped by stoichiometry, in first-seen order
    fn death_groups(&self, ir: &IR, species: SpeciesId) -> Reb2SacResult<Vec<(f64, Vec<ReactionId>)>> {
        let mut groups: Vec<(f64, Vec<ReactionId>)> = Vec::new();
        for edge in ir.reactant_edges(species) {
            let reaction = ir.reaction_in_edge(edge)?;
            if !is_pure_death(ir, reaction, species, self.unit_only())? {
                continue;
            }
            let stoichiometry = ir.stoichiometry_in_edge(edge)?;
            match groups.iter_mut().find(|(s, _)| *s == stoichiometry) {
                Some((_, reactions)) => reactions.push(reaction),
                None => groups.push((stoichiometry, vec![reaction])),
            }
        }
        Ok(groups)
    }

    fn amplify_death(
        &self,
        ir: &mut IR,
        species: SpeciesId,
        reaction: ReactionId,
        stoichiometry: f64,
    ) -> Reb2SacResult<Option<KineticLaw>> {
        let Some((edge, _, _)) = sole_edge(ir, reaction, EdgeRole::Reactant)? else {
            return Err(Reb2SacError::failing(
                self.id(),
                "amplify degradation",
                format!("'{}' has no single reactant", ir.reaction(reaction)?.name),
            ));
        };
        let shift = self.shift(stoichiometry);
        let mut law = ir.reaction(reaction)?.kinetic_law().clone();
        if let Some(shift) = &shift {
            law.replace_species_with_kinetic_law(species, &shifted_species(species, shift.clone()));
        }
        ir.set_kinetic_law(reaction, law / KineticLaw::int(self.amplifier))?;
        ir.set_stoichiometry(edge, stoichiometry * self.amplifier as f64)?;
        debug!(
            "degradation '{}' of '{}' amplified to stoichiometry {}",
            ir.reaction(reaction)?.name,
            ir.species_name(species),
            stoichiometry * self.amplifier as f64
        );
        Ok(shift)
    }

    fn amplify_births(&self, ir: &mut IR, species: SpeciesId) -> Reb2SacResult<()> {
        for edge in ir.product_edges(species) {
            let reaction = ir.reaction_in_edge(edge)?;
            if !is_pure_birth(ir, reaction, species)? {
                continue;
            }
            let law =
                ir.reaction(reaction)?.kinetic_law().clone() / KineticLaw::int(self.amplifier);
            ir.set_kinetic_law(reaction, law)?;
            ir.set_stoichiometry(edge, self.amplifier as f64)?;
        }
        Ok(())
    }

    fn do_transformation(&self, ir: &mut IR, species: SpeciesId) -> Reb2SacResult<bool> {
        if ir.species(species)?.boundary_condition {
            return Ok(false);
        }
        let groups = self.death_groups(ir, species)?;
        if groups.is_empty() {
            return Ok(false);
        }
        let mut first_shift = None;
        for (stoichiometry, reactions) in groups {
            let Some(survivor) = combine_reactions(ir, &reactions)? else {
                continue;
            };
            let shift = self.amplify_death(ir, species, survivor, stoichiometry)?;
            if first_shift.is_none() {
                first_shift = shift;
            }
        }
        if self.amplifies_births() {
            self.amplify_births(ir, species)?;
        }
        if self.variant == 8 {
            if let Some(shift) = first_shift.and_then(|s| s.constant_value()) {
                adjust_initial_amount(ir, species, shift)?;
            }
        }
        Ok(true)
    }
}

impl AbstractionMethod for DegradationStoichiometryAmplificationMethod {
    fn id(&self) -> &'static str {
        IDS[self.variant - 1]
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        if self.amplifier <= 1 {
            info!("{}: amplifier {} leaves the model as is", self.id(), self.amplifier);
            return Ok(());
        }
        let mut count = 0;
        for species in ir.species_ids() {
            if self.do_transformation(ir, species)? {
                count += 1;
            }
        }
        info!(
            "{}: degradation of {} species amplified by {}",
            self.id(),
            count,
            self.amplifier
        );
        Ok(())
    }

    fn is_idempotent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::species_node::InitialQuantity;
    use approx::assert_relative_eq;

    fn with_amplifier(amplifier: i64) -> Properties {
        let mut properties = Properties::new();
        properties.set(DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY, amplifier);
        properties
    }

    fn decay_model(stoichiometry: f64) -> (IR, SpeciesId, ReactionId) {
        let mut ir = IR::new("decay");
        let a = ir.add_species("A", InitialQuantity::Amount(30.0));
        let r = ir.create_reaction("decay");
        ir.add_reactant_edge(r, a, stoichiometry).unwrap();
        let law = ir.parse_law("k*A").unwrap();
        ir.set_kinetic_law(r, law).unwrap();
        (ir, a, r)
    }

    #[test]
    fn third_variant_amplifies_and_shifts() {
        let (mut ir, a, r) = decay_model(3.0);
        DegradationStoichiometryAmplificationMethod::new(3, &with_amplifier(4))
            .apply(&mut ir)
            .unwrap();
        let edge = ir.find_edge(r, a, EdgeRole::Reactant).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 12.0);
        assert_eq!(ir.law_to_string(ir.reaction(r).unwrap().kinetic_law()), "k*(A - 6.0)/4");
        ir.check_consistency().unwrap();
    }

    #[test]
    fn unit_variants_ignore_larger_steps() {
        let (mut ir, a, r) = decay_model(3.0);
        DegradationStoichiometryAmplificationMethod::new(1, &with_amplifier(4))
            .apply(&mut ir)
            .unwrap();
        let edge = ir.find_edge(r, a, EdgeRole::Reactant).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 3.0);

        let (mut ir, _, r) = decay_model(1.0);
        DegradationStoichiometryAmplificationMethod::new(2, &with_amplifier(4))
            .apply(&mut ir)
            .unwrap();
        assert_eq!(ir.law_to_string(ir.reaction(r).unwrap().kinetic_law()), "k*(A - 1.5)/4");
    }

    #[test]
    fn deaths_of_equal_step_are_combined() {
        let (mut ir, a, r) = decay_model(1.0);
        let other = ir.create_reaction("decay2");
        ir.add_reactant_edge(other, a, 1.0).unwrap();
        let law = ir.parse_law("q*A").unwrap();
        ir.set_kinetic_law(other, law).unwrap();
        DegradationStoichiometryAmplificationMethod::new(6, &with_amplifier(3))
            .apply(&mut ir)
            .unwrap();
        assert_eq!(ir.reaction_count(), 1);
        assert_eq!(
            ir.law_to_string(ir.reaction(r).unwrap().kinetic_law()),
            "(k*(A - 1) + q*(A - 1))/3"
        );
    }

    #[test]
    fn births_and_initial_amount_variants() {
        let (mut ir, a, _) = decay_model(1.0);
        let birth = ir.create_reaction("birth");
        ir.add_product_edge(birth, a, 1.0).unwrap();
        ir.set_kinetic_law(birth, KineticLaw::symbol("kb")).unwrap();
        DegradationStoichiometryAmplificationMethod::new(5, &with_amplifier(2))
            .apply(&mut ir)
            .unwrap();
        let edge = ir.find_edge(birth, a, EdgeRole::Product).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 2.0);
        assert_eq!(ir.law_to_string(ir.reaction(birth).unwrap().kinetic_law()), "kb/2");

        let (mut ir, a, _) = decay_model(2.0);
        DegradationStoichiometryAmplificationMethod::new(8, &with_amplifier(3))
            .apply(&mut ir)
            .unwrap();
        assert_relative_eq!(ir.species(a).unwrap().initial_quantity.value(), 33.0);
    }

    #[test]
    fn amplifier_of_one_is_a_no_op() {
        let (mut ir, _, _) = decay_model(1.0);
        let before = ir.to_description().unwrap();
        DegradationStoichiometryAmplificationMethod::new(3, &with_amplifier(1))
            .apply(&mut ir)
            .unwrap();
        assert_eq!(ir.to_description().unwrap(), before);
    }
}
