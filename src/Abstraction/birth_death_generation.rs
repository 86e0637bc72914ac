//! # Birth-death generation
//!
//! A species `S` whose whole production comes from pure-birth reactions (`∅ -> S`) and
//! whose whole consumption comes from pure-death reactions (`S -> ∅`), all with unit
//! stoichiometry, behaves as a birth-death process. The method folds the births into one
//! production reaction with rate `f` and the deaths into one degradation reaction with
//! rate `g`, then replaces both laws with a closed form that lets `S` move in steps of
//! `n` (the per-species maximum oscillation amount) while keeping its mean behaviour.
//!
//! With `h = ⌊n/2⌋` and `m = h + 1` the variants are:
//!
//! | variant | production | degradation | adjustment |
//! |---|---|---|---|
//! | 1 | `f²/((f+g)(1-(g/(f+g))^m))` | `g/(((f+g)/g)^m - 1)` | `S -> S-h` |
//! | 2 | `(f-g)/(1-(g/f)^m)` | `(g-f)/(1-(f/g)^m)` | `S -> S-h` |
//! | 3 | `f/m` | `g/m` | none |
//! | 4 | as 1 | as 1 | `S -> S-h`, degradation stoichiometry `2h+1` |
//! | 5 | as 1 | as 1 | `S -> S+h` |
//! | 6 | as 1 | as 1 | initial amount `+h` |
//! | 7 | as 2 | as 2 | initial amount `+h` |
//!
//! Every variant except 4 sets the degradation stoichiometry to `n`.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{
    adjust_initial_amount, combine_reactions, ensure_modifiers_for_law, is_pure_birth,
    is_pure_death, sole_edge, shifted_species,
};
use crate::Abstraction::properties::{
    DEFAULT_MAX_SPECIES_OSCILLATION_REACTION_RATE, MAX_SPECIES_OSCILLATION_REACTION_RATE_KEY,
    Properties,
};
use crate::IR::ir_edge::{EdgeId, EdgeRole};
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::KineticLaw::kinetic_law_evaluator::KineticLawEvaluator;
use crate::error::{Reb2SacError, Reb2SacResult};
use log::{debug, info, warn};

const IDS: [&str; 7] = [
    "birth-death-generator",
    "birth-death-generator-2",
    "birth-death-generator-3",
    "birth-death-generator-4",
    "birth-death-generator-5",
    "birth-death-generator-6",
    "birth-death-generator-7",
];

fn reactions_of(ir: &IR, edges: Vec<EdgeId>) -> Reb2SacResult<Vec<ReactionId>> {
    let mut reactions = Vec::new();
    for edge in edges {
        let reaction = ir.reaction_in_edge(edge)?;
        if !reactions.contains(&reaction) {
            reactions.push(reaction);
        }
    }
    Ok(reactions)
}

/// Folds the pure-birth reactions of `species` into one production reaction and the
/// pure-death reactions into one degradation reaction. Returns `None` (and changes
/// nothing) unless `species` has at least one of each.
pub fn combine_birth_and_death_reactions(
    ir: &mut IR,
    species: SpeciesId,
) -> Reb2SacResult<Option<(ReactionId, ReactionId)>> {
    let births = reactions_of(ir, ir.product_edges(species))?;
    let deaths = reactions_of(ir, ir.reactant_edges(species))?;
    if births.is_empty() || deaths.is_empty() {
        return Ok(None);
    }
    let production = combine_reactions(ir, &births)?;
    let degradation = combine_reactions(ir, &deaths)?;
    Ok(production.zip(degradation))
}

#[derive(Debug, Clone)]
pub struct BirthDeathGenerationMethod {
    variant: usize,
    properties: Properties,
    min_rate: f64,
}

impl BirthDeathGenerationMethod {
    pub fn new(variant: usize, properties: &Properties) -> Self {
        Self {
            variant: variant.clamp(1, IDS.len()),
            properties: properties.clone(),
            min_rate: properties.get_f64(
                MAX_SPECIES_OSCILLATION_REACTION_RATE_KEY,
                DEFAULT_MAX_SPECIES_OSCILLATION_REACTION_RATE,
            ),
        }
    }

    /// 1 to 7
    pub fn variant(&self) -> usize {
        self.variant
    }

    fn oscillation_amount(&self, ir: &IR, species: SpeciesId) -> Reb2SacResult<i64> {
        Ok(self
            .properties
            .max_species_oscillation_amount(&ir.species(species)?.name))
    }

    pub fn is_condition_satisfied(&self, ir: &IR, species: SpeciesId) -> Reb2SacResult<bool> {
        if ir.species(species)?.boundary_condition || self.oscillation_amount(ir, species)? < 2 {
            return Ok(false);
        }
        let births = reactions_of(ir, ir.product_edges(species))?;
        let deaths = reactions_of(ir, ir.reactant_edges(species))?;
        if births.is_empty() || deaths.is_empty() {
            return Ok(false);
        }
        for reaction in &births {
            if !is_pure_birth(ir, *reaction, species)? {
                return Ok(false);
            }
        }
        for reaction in &deaths {
            if !is_pure_death(ir, *reaction, species, true)? {
                return Ok(false);
            }
        }
        if self.min_rate > 0.0 {
            let mut production = KineticLaw::int(0);
            for reaction in &births {
                production = production + ir.reaction(*reaction)?.kinetic_law().clone();
            }
            match KineticLawEvaluator::new(ir).evaluate_with_current_amounts(&production) {
                Ok(rate) if rate < self.min_rate => return Ok(false),
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "production rate of '{}' cannot be evaluated ({}), species skipped",
                        ir.species_name(species),
                        e
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn first_order_laws(f: &KineticLaw, g: &KineticLaw, m: KineticLaw) -> (KineticLaw, KineticLaw) {
        let sum = f.clone() + g.clone();
        let production = f.clone().pow(KineticLaw::int(2))
            / (sum.clone() * (KineticLaw::int(1) - (g.clone() / sum.clone()).pow(m.clone())));
        let degradation = g.clone() / ((sum / g.clone()).pow(m) - KineticLaw::int(1));
        (production, degradation)
    }

    fn difference_laws(f: &KineticLaw, g: &KineticLaw, m: KineticLaw) -> (KineticLaw, KineticLaw) {
        let production = (f.clone() - g.clone())
            / (KineticLaw::int(1) - (g.clone() / f.clone()).pow(m.clone()));
        let degradation =
            (g.clone() - f.clone()) / (KineticLaw::int(1) - (f.clone() / g.clone()).pow(m));
        (production, degradation)
    }

    fn do_transformation(&self, ir: &mut IR, species: SpeciesId) -> Reb2SacResult<()> {
        let n = self.oscillation_amount(ir, species)?;
        let h = n / 2;
        let m = KineticLaw::int(h + 1);
        let Some((production, degradation)) = combine_birth_and_death_reactions(ir, species)? else {
            return Err(Reb2SacError::failing(
                self.id(),
                "combine",
                format!("'{}' lost its births or deaths", ir.species_name(species)),
            ));
        };
        let f = ir.reaction(production)?.kinetic_law().clone();
        let g = ir.reaction(degradation)?.kinetic_law().clone();
        let (mut new_production, mut new_degradation) = match self.variant {
            2 | 7 => Self::difference_laws(&f, &g, m),
            3 => (f / m.clone(), g / m),
            _ => Self::first_order_laws(&f, &g, m),
        };
        let shift = match self.variant {
            1 | 2 | 4 => Some(shifted_species(species, KineticLaw::int(h))),
            5 => Some(KineticLaw::species(species) + KineticLaw::int(h)),
            _ => None,
        };
        if let Some(shift) = shift {
            new_production.replace_species_with_kinetic_law(species, &shift);
            new_degradation.replace_species_with_kinetic_law(species, &shift);
        }
        ir.set_kinetic_law(production, new_production)?;
        ir.set_kinetic_law(degradation, new_degradation)?;
        ensure_modifiers_for_law(ir, production)?;
        ensure_modifiers_for_law(ir, degradation)?;

        let stoichiometry = if self.variant == 4 { 2 * h + 1 } else { n };
        let Some((edge, _, _)) = sole_edge(ir, degradation, EdgeRole::Reactant)? else {
            return Err(Reb2SacError::failing(
                self.id(),
                "set stoichiometry",
                format!("'{}' has no single reactant", ir.reaction(degradation)?.name),
            ));
        };
        ir.set_stoichiometry(edge, stoichiometry as f64)?;
        if matches!(self.variant, 6 | 7) {
            adjust_initial_amount(ir, species, h as f64)?;
        }
        debug!(
            "'{}' turned into a birth-death process with step {}",
            ir.species_name(species),
            stoichiometry
        );
        Ok(())
    }
}

impl AbstractionMethod for BirthDeathGenerationMethod {
    fn id(&self) -> &'static str {
        IDS[self.variant - 1]
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for species in ir.species_ids() {
            if self.is_condition_satisfied(ir, species)? {
                self.do_transformation(ir, species)?;
                count += 1;
            }
        }
        info!("{}: {} birth-death processes generated", self.id(), count);
        Ok(())
    }

    fn is_idempotent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Abstraction::properties::MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX;
    use crate::IR::species_node::InitialQuantity;
    use approx::assert_relative_eq;

    /// two births `k1`, `k2` (the second one regulated by `E`) and one death `k3*S`
    fn birth_death_model() -> (IR, SpeciesId, SpeciesId) {
        let mut ir = IR::new("birth-death");
        for (name, value) in [("k1", 1.0), ("k2", 1.0), ("k3", 1.0)] {
            ir.set_parameter(name, value);
        }
        let s = ir.add_species("S", InitialQuantity::Amount(3.0));
        let e = ir.add_species("E", InitialQuantity::Amount(1.0));
        let b1 = ir.create_reaction("b1");
        ir.add_product_edge(b1, s, 1.0).unwrap();
        ir.set_kinetic_law(b1, KineticLaw::symbol("k1")).unwrap();
        let b2 = ir.create_reaction("b2");
        ir.add_product_edge(b2, s, 1.0).unwrap();
        ir.add_modifier_edge(b2, e, 1.0).unwrap();
        let law = ir.parse_law("k2*E").unwrap();
        ir.set_kinetic_law(b2, law).unwrap();
        let d = ir.create_reaction("d");
        ir.add_reactant_edge(d, s, 1.0).unwrap();
        let law = ir.parse_law("k3*S").unwrap();
        ir.set_kinetic_law(d, law).unwrap();
        (ir, s, e)
    }

    fn properties_with_amount(n: i64) -> Properties {
        let mut properties = Properties::new();
        properties.set(&format!("{}S", MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX), n);
        properties
    }

    #[test]
    fn births_and_deaths_are_combined() {
        let (mut ir, s, e) = birth_death_model();
        let (production, degradation) = combine_birth_and_death_reactions(&mut ir, s)
            .unwrap()
            .unwrap();
        assert_eq!(ir.reaction_count(), 2);
        let law = |r: ReactionId| ir.law_to_string(ir.reaction(r).unwrap().kinetic_law());
        assert_eq!(law(production), "k1 + k2*E");
        assert_eq!(law(degradation), "k3*S");
        assert!(ir.find_edge(production, e, EdgeRole::Modifier).is_some());
        ir.check_consistency().unwrap();
    }

    #[test]
    fn first_variant_shifts_and_sets_step() {
        let (mut ir, s, e) = birth_death_model();
        BirthDeathGenerationMethod::new(1, &properties_with_amount(2))
            .apply(&mut ir)
            .unwrap();
        let production = ir.find_reaction("b1").unwrap();
        let degradation = ir.find_reaction("d").unwrap();
        let edge = ir.find_edge(degradation, s, EdgeRole::Reactant).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 2.0);
        // f = 2, g = k3*(S - 1) = 2, m = 2
        let evaluator = KineticLawEvaluator::new(&ir);
        let rate = |r: ReactionId| {
            evaluator
                .evaluate_with_current_amounts(ir.reaction(r).unwrap().kinetic_law())
                .unwrap()
        };
        assert_relative_eq!(rate(production), 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(rate(degradation), 2.0 / 3.0, epsilon = 1e-12);
        // the degradation law now reads E through f
        assert!(ir.find_edge(degradation, e, EdgeRole::Modifier).is_some());
        ir.check_consistency().unwrap();
    }

    #[test]
    fn later_variants_differ_in_adjustment() {
        let (mut ir, s, _) = birth_death_model();
        BirthDeathGenerationMethod::new(6, &properties_with_amount(4))
            .apply(&mut ir)
            .unwrap();
        assert_relative_eq!(ir.species(s).unwrap().initial_quantity.value(), 5.0);
        let degradation = ir.find_reaction("d").unwrap();
        assert_eq!(
            ir.law_to_string(ir.reaction(degradation).unwrap().kinetic_law()),
            "k3*S/(((k1 + k2*E + k3*S)/(k3*S))^3 - 1)"
        );

        let (mut ir, s, _) = birth_death_model();
        BirthDeathGenerationMethod::new(4, &properties_with_amount(4))
            .apply(&mut ir)
            .unwrap();
        let degradation = ir.find_reaction("d").unwrap();
        let edge = ir.find_edge(degradation, s, EdgeRole::Reactant).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 5.0);
    }

    #[test]
    fn small_oscillation_amount_leaves_model_alone() {
        let (mut ir, _, _) = birth_death_model();
        let before = ir.to_description().unwrap();
        BirthDeathGenerationMethod::new(1, &Properties::new())
            .apply(&mut ir)
            .unwrap();
        assert_eq!(ir.to_description().unwrap(), before);
    }

    #[test]
    fn slow_production_is_skipped_under_rate_guard() {
        let (mut ir, _, _) = birth_death_model();
        let mut properties = properties_with_amount(2);
        properties.set(MAX_SPECIES_OSCILLATION_REACTION_RATE_KEY, 10.0);
        BirthDeathGenerationMethod::new(3, &properties)
            .apply(&mut ir)
            .unwrap();
        assert_eq!(ir.reaction_count(), 3);
    }
}
