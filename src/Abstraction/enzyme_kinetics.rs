//! Michaelis-Menten reduction of the enzymatic motif `E + S <-> C -> E + P`.
//!
//! Under the quasi-steady-state assumption on the complex `C`, the two reactions become
//! a single `S -> P` with rate `kcat*Etot*S/(Km + S)`, `Km = (kr + kcat)/kf` and `Etot`
//! the total enzyme. Other laws that read `C` or the free enzyme `E` get their
//! steady-state expressions `Etot*S/(Km + S)` and `Etot*Km/(Km + S)`.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{
    initial_amount, is_in_initial_assignment, mass_action_rate_constant, sole_edge,
    species_of_edges, split_reversible_law, substitute_species_everywhere,
};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::Reb2SacResult;
use log::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct EnzymeKineticQssa1Method;

struct EnzymeMotif {
    binding: ReactionId,
    catalysis: ReactionId,
    enzyme: SpeciesId,
    substrate: SpeciesId,
    complex: SpeciesId,
    kf: KineticLaw,
    kr: KineticLaw,
    kcat: KineticLaw,
}

fn is_species_free(law: &KineticLaw) -> bool {
    law.collect_species().is_empty()
}

/// every edge of `species` other than the listed ones is a modifier edge
fn only_modifiers_besides(ir: &IR, species: SpeciesId, expected: &[ReactionId]) -> Reb2SacResult<bool> {
    let mut seen = Vec::new();
    for edge in ir.reactant_edges(species).into_iter().chain(ir.product_edges(species)) {
        let reaction = ir.reaction_in_edge(edge)?;
        if !expected.contains(&reaction) {
            return Ok(false);
        }
        seen.push(reaction);
    }
    Ok(seen.len() == expected.len())
}

fn is_unconstrained(ir: &IR, species: SpeciesId) -> Reb2SacResult<bool> {
    let node = ir.species(species)?;
    Ok(!node.boundary_condition
        && node.initial_assignment.is_none()
        && !is_in_initial_assignment(ir, species)?)
}

fn all_unit(ir: &IR, reaction: ReactionId) -> Reb2SacResult<bool> {
    for edge in ir.reactant_edges(reaction).into_iter().chain(ir.product_edges(reaction)) {
        if ir.stoichiometry_in_edge(edge)? != 1.0 {
            return Ok(false);
        }
    }
    Ok(true)
}

impl EnzymeKineticQssa1Method {
    fn find_motif(&self, ir: &IR, binding: ReactionId) -> Reb2SacResult<Option<EnzymeMotif>> {
        let node = ir.reaction(binding)?;
        if !node.reversible || !ir.modifier_edges(binding).is_empty() || !all_unit(ir, binding)? {
            return Ok(None);
        }
        let Some((forward, backward)) = split_reversible_law(node.kinetic_law()) else {
            return Ok(None);
        };
        let reactants = species_of_edges(ir, &ir.reactant_edges(binding))?;
        let Some((_, complex, _)) = sole_edge(ir, binding, EdgeRole::Product)? else {
            return Ok(None);
        };
        if reactants.len() != 2 || reactants.contains(&complex) {
            return Ok(None);
        }
        // the complex is consumed by exactly one irreversible reaction C -> E + P
        let consuming = ir.reactant_edges(complex);
        if consuming.len() != 1 {
            return Ok(None);
        }
        let catalysis = ir.reaction_in_edge(consuming[0])?;
        let catalysis_node = ir.reaction(catalysis)?;
        if catalysis == binding
            || catalysis_node.reversible
            || !ir.modifier_edges(catalysis).is_empty()
            || !all_unit(ir, catalysis)?
            || sole_edge(ir, catalysis, EdgeRole::Reactant)?.is_none()
        {
            return Ok(None);
        }
        let products = species_of_edges(ir, &ir.product_edges(catalysis))?;
        if products.len() != 2 {
            return Ok(None);
        }
        let recycled = (products.contains(&reactants[0]), products.contains(&reactants[1]));
        let (enzyme, substrate) = match recycled {
            (true, false) => (reactants[0], reactants[1]),
            (false, true) => (reactants[1], reactants[0]),
            _ => return Ok(None),
        };
        if products.contains(&complex) {
            return Ok(None);
        }
        if !only_modifiers_besides(ir, complex, &[binding, catalysis])?
            || !only_modifiers_besides(ir, enzyme, &[binding, catalysis])?
            || !is_unconstrained(ir, complex)?
            || !is_unconstrained(ir, enzyme)?
        {
            return Ok(None);
        }
        let kf = mass_action_rate_constant(&forward, &[enzyme, substrate]);
        let kr = mass_action_rate_constant(&backward, &[complex]);
        let kcat = mass_action_rate_constant(catalysis_node.kinetic_law(), &[complex]);
        if !is_species_free(&kf) || !is_species_free(&kr) || !is_species_free(&kcat) {
            return Ok(None);
        }
        Ok(Some(EnzymeMotif {
            binding,
            catalysis,
            enzyme,
            substrate,
            complex,
            kf,
            kr,
            kcat,
        }))
    }

    fn do_transformation(&self, ir: &mut IR, motif: EnzymeMotif) -> Reb2SacResult<()> {
        let total_enzyme = KineticLaw::real(
            initial_amount(ir, motif.enzyme)? + initial_amount(ir, motif.complex)?,
        );
        let km = (motif.kr + motif.kcat.clone()) / motif.kf;
        let s = KineticLaw::species(motif.substrate);
        let saturation = km.clone() + s.clone();

        ir.remove_reaction(motif.binding)?;
        let catalysis = motif.catalysis;
        for edge in ir.reactant_edges(catalysis) {
            ir.remove_reactant_edge(edge)?;
        }
        if let Some(edge) = ir.find_edge(catalysis, motif.enzyme, EdgeRole::Product) {
            ir.remove_product_edge(edge)?;
        }
        ir.add_reactant_edge(catalysis, motif.substrate, 1.0)?;
        let law = motif.kcat * total_enzyme.clone() * s.clone() / saturation.clone();
        ir.set_kinetic_law(catalysis, law)?;

        let bound = total_enzyme.clone() * s / saturation.clone();
        let free = total_enzyme * km / saturation;
        substitute_species_everywhere(ir, motif.complex, &bound, &[motif.substrate])?;
        substitute_species_everywhere(ir, motif.enzyme, &free, &[motif.substrate])?;
        debug!(
            "enzyme '{}' on substrate '{}' reduced to '{}'",
            ir.species_name(motif.enzyme),
            ir.species_name(motif.substrate),
            ir.reaction(catalysis)?.name
        );
        ir.remove_species(motif.complex)?;
        ir.remove_species(motif.enzyme)?;
        Ok(())
    }
}

impl AbstractionMethod for EnzymeKineticQssa1Method {
    fn id(&self) -> &'static str {
        "enzyme-kinetic-qssa-1"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if !ir.contains_reaction(reaction) {
                continue;
            }
            if let Some(motif) = self.find_motif(ir, reaction)? {
                self.do_transformation(ir, motif)?;
                count += 1;
            }
        }
        info!("{}: {} enzymatic motifs reduced", self.id(), count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::species_node::InitialQuantity;
    use crate::KineticLaw::kinetic_law_evaluator::KineticLawEvaluator;
    use approx::assert_relative_eq;

    fn michaelis_menten() -> (IR, ReactionId) {
        let mut ir = IR::new("mm");
        ir.set_parameter("kf", 1.0);
        ir.set_parameter("kr", 2.0);
        ir.set_parameter("kcat", 3.0);
        let e = ir.add_species("E", InitialQuantity::Amount(4.0));
        let s = ir.add_species("S", InitialQuantity::Amount(5.0));
        let c = ir.add_species("C", InitialQuantity::Amount(1.0));
        let p = ir.add_species("P", InitialQuantity::Amount(0.0));
        let bind = ir.create_reaction("bind");
        ir.add_reactant_edge(bind, e, 1.0).unwrap();
        ir.add_reactant_edge(bind, s, 1.0).unwrap();
        ir.add_product_edge(bind, c, 1.0).unwrap();
        ir.reaction_mut(bind).unwrap().reversible = true;
        let law = ir.parse_law("kf*E*S - kr*C").unwrap();
        ir.set_kinetic_law(bind, law).unwrap();
        let cat = ir.create_reaction("cat");
        ir.add_reactant_edge(cat, c, 1.0).unwrap();
        ir.add_product_edge(cat, e, 1.0).unwrap();
        ir.add_product_edge(cat, p, 1.0).unwrap();
        let law = ir.parse_law("kcat*C").unwrap();
        ir.set_kinetic_law(cat, law).unwrap();
        (ir, cat)
    }

    #[test]
    fn motif_becomes_michaelis_menten() {
        let (mut ir, cat) = michaelis_menten();
        EnzymeKineticQssa1Method.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 1);
        assert_eq!(ir.species_count(), 2);
        assert_eq!(
            ir.law_to_string(ir.reaction(cat).unwrap().kinetic_law()),
            "kcat*5.0*S/((kr + kcat)/kf + S)"
        );
        assert_eq!(ir.reaction_equation(cat).unwrap(), "S -> P");
        let rate = KineticLawEvaluator::new(&ir)
            .evaluate_with_current_amounts(ir.reaction(cat).unwrap().kinetic_law())
            .unwrap();
        // Km = 5, Etot = 5, S = 5
        assert_relative_eq!(rate, 7.5);
        ir.check_consistency().unwrap();
    }

    #[test]
    fn enzyme_used_elsewhere_is_kept() {
        let (mut ir, _) = michaelis_menten();
        let e = ir.find_species("E").unwrap();
        let decay = ir.create_reaction("decay");
        ir.add_reactant_edge(decay, e, 1.0).unwrap();
        EnzymeKineticQssa1Method.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 3);
        assert!(ir.contains_species(e));
    }
}
