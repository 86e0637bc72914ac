//! Graph and kinetic-law helpers shared by the abstraction methods.
use crate::IR::ir_edge::{EdgeId, EdgeRole};
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::{KineticLaw, KineticLawOp};
use crate::error::{Reb2SacError, Reb2SacResult};
use log::debug;

/// adds a unit modifier edge unless the species already modifies the reaction
pub fn ensure_modifier_edge(ir: &mut IR, reaction: ReactionId, species: SpeciesId) -> Reb2SacResult<()> {
    if ir.find_edge(reaction, species, EdgeRole::Modifier).is_none() {
        ir.add_modifier_edge(reaction, species, 1.0)?;
    }
    Ok(())
}

/// Adds modifier edges for every species the law of `reaction` reads without being a
/// participant of it.
pub fn ensure_modifiers_for_law(ir: &mut IR, reaction: ReactionId) -> Reb2SacResult<()> {
    for species in ir.reaction(reaction)?.kinetic_law().collect_species() {
        if !ir.is_participant(reaction, species) {
            ir.add_modifier_edge(reaction, species, 1.0)?;
        }
    }
    Ok(())
}

pub fn remove_modifier_edges_of(ir: &mut IR, reaction: ReactionId, species: SpeciesId) -> Reb2SacResult<()> {
    while let Some(edge) = ir.find_edge(reaction, species, EdgeRole::Modifier) {
        ir.remove_modifier_edge(edge)?;
    }
    Ok(())
}

/// removes every edge of `reaction` in `role` except those of `keep`
pub fn strip_role_except(
    ir: &mut IR,
    reaction: ReactionId,
    role: EdgeRole,
    keep: Option<SpeciesId>,
) -> Reb2SacResult<()> {
    for edge in ir.edges_of(reaction, role) {
        if Some(ir.species_in_edge(edge)?) != keep {
            ir.remove_edge(edge)?;
        }
    }
    Ok(())
}

/// Distinct species of an edge list, in list order.
pub fn species_of_edges(ir: &IR, edges: &[EdgeId]) -> Reb2SacResult<Vec<SpeciesId>> {
    let mut species = Vec::new();
    for edge in edges {
        let s = ir.species_in_edge(*edge)?;
        if !species.contains(&s) {
            species.push(s);
        }
    }
    Ok(species)
}

/// Set equality of the species of two edge lists; stoichiometry and multiplicity are
/// ignored.
pub fn are_lists_of_species_same(ir: &IR, a: &[EdgeId], b: &[EdgeId]) -> Reb2SacResult<bool> {
    let a = species_of_edges(ir, a)?;
    let b = species_of_edges(ir, b)?;
    Ok(a.len() == b.len() && a.iter().all(|s| b.contains(s)))
}

/// Folds the laws of `reactions` with PLUS onto the first one, moves every modifier of
/// the others onto it and removes the others. Returns the surviving reaction.
pub fn combine_reactions(ir: &mut IR, reactions: &[ReactionId]) -> Reb2SacResult<Option<ReactionId>> {
    let Some((&survivor, rest)) = reactions.split_first() else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(Some(survivor));
    }
    let mut law = ir.reaction(survivor)?.kinetic_law().clone();
    for other in rest {
        law = law + ir.reaction(*other)?.kinetic_law().clone();
        for edge in ir.modifier_edges(*other) {
            let species = ir.species_in_edge(edge)?;
            ensure_modifier_edge(ir, survivor, species)?;
        }
        debug!(
            "combining reaction '{}' into '{}'",
            ir.reaction(*other)?.name,
            ir.reaction(survivor)?.name
        );
        ir.remove_reaction(*other)?;
    }
    ir.set_kinetic_law(survivor, law)?;
    Ok(Some(survivor))
}

/// Rate constant of a mass-action term: the law with each listed species set to one,
/// simplified.
pub fn mass_action_rate_constant(law: &KineticLaw, species: &[SpeciesId]) -> KineticLaw {
    let mut constant = law.clone();
    for s in species {
        constant.replace_species_with_kinetic_law(*s, &KineticLaw::int(1));
    }
    constant.simplify()
}

/// `species - shift`
pub fn shifted_species(species: SpeciesId, shift: KineticLaw) -> KineticLaw {
    KineticLaw::species(species) - shift
}

/// `species ^ n` with `species` alone for unit powers
pub fn species_power(species: SpeciesId, n: f64) -> KineticLaw {
    if n == 1.0 {
        KineticLaw::species(species)
    } else {
        KineticLaw::species(species).pow(number(n))
    }
}

/// integral values become integer literals
pub fn number(value: f64) -> KineticLaw {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        KineticLaw::int(value as i64)
    } else {
        KineticLaw::real(value)
    }
}

/// Splits a reversible law `forward - backward` into its two halves.
pub fn split_reversible_law(law: &KineticLaw) -> Option<(KineticLaw, KineticLaw)> {
    match law {
        KineticLaw::Op {
            op: KineticLawOp::Minus,
            left,
            right,
        } => Some((left.as_ref().clone(), right.as_ref().clone())),
        _ => None,
    }
}

/// Reaction with no reactants whose only product is `species` with unit stoichiometry.
pub fn is_pure_birth(ir: &IR, reaction: ReactionId, species: SpeciesId) -> Reb2SacResult<bool> {
    let products = ir.product_edges(reaction);
    if !ir.reactant_edges(reaction).is_empty() || products.len() != 1 {
        return Ok(false);
    }
    let edge = ir.edge(products[0])?;
    Ok(edge.species() == species && edge.stoichiometry() == 1.0)
}

/// Reaction with no products whose only reactant is `species`. With `unit` the
/// stoichiometry must also be one.
pub fn is_pure_death(ir: &IR, reaction: ReactionId, species: SpeciesId, unit: bool) -> Reb2SacResult<bool> {
    let reactants = ir.reactant_edges(reaction);
    if !ir.product_edges(reaction).is_empty() || reactants.len() != 1 {
        return Ok(false);
    }
    let edge = ir.edge(reactants[0])?;
    Ok(edge.species() == species && (!unit || edge.stoichiometry() == 1.0))
}

/// Single reactant/product edge of a reaction in `role`, with its species and stoichiometry.
pub fn sole_edge(ir: &IR, reaction: ReactionId, role: EdgeRole) -> Reb2SacResult<Option<(EdgeId, SpeciesId, f64)>> {
    let edges = ir.edges_of(reaction, role);
    if edges.len() != 1 {
        return Ok(None);
    }
    let edge = ir.edge(edges[0])?;
    Ok(Some((edge.id(), edge.species(), edge.stoichiometry())))
}

/// true when some initial assignment mentions `species`
pub fn is_in_initial_assignment(ir: &IR, species: SpeciesId) -> Reb2SacResult<bool> {
    for id in ir.species_ids() {
        if let Some(assignment) = &ir.species(id)?.initial_assignment {
            if assignment.find_species(species) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Replaces `species` with `replacement` in every kinetic law; reactions whose law now
/// reads `extra_modifiers` get modifier edges for them. Returns the touched reactions.
pub fn substitute_species_everywhere(
    ir: &mut IR,
    species: SpeciesId,
    replacement: &KineticLaw,
    extra_modifiers: &[SpeciesId],
) -> Reb2SacResult<Vec<ReactionId>> {
    let mut touched = Vec::new();
    for reaction in ir.reaction_ids() {
        let replaced = ir
            .reaction_mut(reaction)?
            .kinetic_law_mut()
            .replace_species_with_kinetic_law(species, replacement);
        if replaced > 0 {
            for modifier in extra_modifiers {
                if !ir.is_participant(reaction, *modifier) {
                    ensure_modifier_edge(ir, reaction, *modifier)?;
                }
            }
            touched.push(reaction);
        }
    }
    Ok(touched)
}

fn compartment_size(ir: &IR, species: SpeciesId) -> Reb2SacResult<f64> {
    let node = ir.species(species)?;
    match &node.compartment {
        Some(name) => ir.compartment(name).map(|c| c.size).ok_or_else(|| {
            Reb2SacError::failing(
                "abstraction",
                "initial amount",
                format!("compartment '{}' of '{}' is not declared", name, node.name),
            )
        }),
        None => Ok(1.0),
    }
}

/// initial amount of a species, with concentrations scaled by the compartment size
pub fn initial_amount(ir: &IR, species: SpeciesId) -> Reb2SacResult<f64> {
    let node = ir.species(species)?;
    if node.initial_quantity.is_amount() {
        return Ok(node.initial_quantity.value());
    }
    Ok(node.initial_quantity.value() * compartment_size(ir, species)?)
}

/// Moves the initial quantity of `species` by `delta` molecules, keeping the quantity
/// mode it was declared with.
pub fn adjust_initial_amount(ir: &mut IR, species: SpeciesId, delta: f64) -> Reb2SacResult<()> {
    let delta = if ir.species(species)?.initial_quantity.is_amount() {
        delta
    } else {
        delta / compartment_size(ir, species)?
    };
    ir.species_mut(species)?.adjust_initial_quantity(delta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::species_node::InitialQuantity;

    #[test]
    fn combine_folds_laws_and_keeps_modifiers() {
        let mut ir = IR::new("combine");
        let s = ir.add_species("S", InitialQuantity::Amount(0.0));
        let e = ir.add_species("E", InitialQuantity::Amount(1.0));
        let r1 = ir.create_reaction("r1");
        let r2 = ir.create_reaction("r2");
        ir.add_product_edge(r1, s, 1.0).unwrap();
        ir.add_product_edge(r2, s, 1.0).unwrap();
        ir.add_modifier_edge(r2, e, 1.0).unwrap();
        ir.set_kinetic_law(r1, KineticLaw::symbol("k1")).unwrap();
        ir.set_kinetic_law(r2, KineticLaw::symbol("k2") * KineticLaw::species(e)).unwrap();

        let survivor = combine_reactions(&mut ir, &[r1, r2]).unwrap();
        assert_eq!(survivor, Some(r1));
        assert_eq!(ir.reaction_count(), 1);
        assert_eq!(ir.law_to_string(ir.reaction(r1).unwrap().kinetic_law()), "k1 + k2*E");
        assert!(ir.find_edge(r1, e, EdgeRole::Modifier).is_some());
        ir.check_consistency().unwrap();
    }

    #[test]
    fn species_sets_ignore_stoichiometry() {
        let mut ir = IR::new("sets");
        let a = ir.add_species("A", InitialQuantity::Amount(0.0));
        let b = ir.add_species("B", InitialQuantity::Amount(0.0));
        let r1 = ir.create_reaction("r1");
        let r2 = ir.create_reaction("r2");
        ir.add_reactant_edge(r1, a, 1.0).unwrap();
        ir.add_reactant_edge(r1, b, 1.0).unwrap();
        ir.add_reactant_edge(r2, b, 3.0).unwrap();
        ir.add_reactant_edge(r2, a, 2.0).unwrap();
        let (x, y) = (ir.reactant_edges(r1), ir.reactant_edges(r2));
        assert!(are_lists_of_species_same(&ir, &x, &y).unwrap());
        assert!(!are_lists_of_species_same(&ir, &x, &y[..1]).unwrap());
    }

    #[test]
    fn mass_action_constant_drops_species() {
        let mut ir = IR::new("k");
        let a = ir.add_species("A", InitialQuantity::Amount(0.0));
        let law = ir.parse_law("kf*A^2").unwrap();
        assert_eq!(mass_action_rate_constant(&law, &[a]), KineticLaw::symbol("kf"));
    }
}
