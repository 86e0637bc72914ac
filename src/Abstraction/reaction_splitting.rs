//! Reaction-splitting methods.
//!
//! A reaction with N reactants (or N products) is split into N reactions sharing the
//! original kinetic law, each keeping one reactant (or product) edge. Species that leave
//! a split reaction but are read by its law stay attached as modifiers.
//!
//! Only the head reaction keeps the edges of the opposite role, so the split network
//! produces (or consumes) each species exactly as often as the original one did.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{
    ensure_modifier_edge, remove_modifier_edges_of, species_of_edges, strip_role_except,
};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::SpeciesId;
use crate::error::Reb2SacResult;
use log::{debug, info};

/// Shared body of the multiple-reactants and multiple-products eliminators.
fn split_by_role(ir: &mut IR, reaction: ReactionId, role: EdgeRole, tag: &str) -> Reb2SacResult<()> {
    let opposite = match role {
        EdgeRole::Reactant => EdgeRole::Product,
        _ => EdgeRole::Reactant,
    };
    let species = species_of_edges(ir, &ir.edges_of(reaction, role))?;
    let Some((&head, rest)) = species.split_first() else {
        return Ok(());
    };
    let name = ir.reaction(reaction)?.name.clone();

    // modifiers go on the original first so that every clone inherits them
    for s in &species {
        if ir.reaction(reaction)?.kinetic_law().find_species(*s) {
            ensure_modifier_edge(ir, reaction, *s)?;
        }
    }
    let opposite_read_by_law = species_of_edges(ir, &ir.edges_of(reaction, opposite))?
        .into_iter()
        .filter(|s| ir.reaction(reaction).map(|r| r.kinetic_law().find_species(*s)).unwrap_or(false))
        .collect::<Vec<_>>();
    for kept in rest {
        let clone = ir.clone_reaction(reaction)?;
        keep_only(ir, clone, role, *kept)?;
        strip_role_except(ir, clone, opposite, None)?;
        for s in &opposite_read_by_law {
            ensure_modifier_edge(ir, clone, *s)?;
        }
        let clone_name = format!("{}_{}_{}", name, tag, ir.species_name(*kept));
        debug!("split '{}' into '{}'", name, clone_name);
        ir.rename_reaction(clone, &clone_name)?;
    }
    keep_only(ir, reaction, role, head)?;
    let head_name = format!("{}_{}_{}", name, tag, ir.species_name(head));
    ir.rename_reaction(reaction, &head_name)?;
    Ok(())
}

/// keeps `species` as the only edge in `role` and drops its duplicate modifier
fn keep_only(ir: &mut IR, reaction: ReactionId, role: EdgeRole, species: SpeciesId) -> Reb2SacResult<()> {
    strip_role_except(ir, reaction, role, Some(species))?;
    remove_modifier_edges_of(ir, reaction, species)
}

#[derive(Debug, Clone, Default)]
pub struct MultipleReactantsReactionEliminationMethod;

impl MultipleReactantsReactionEliminationMethod {
    /// keys on the number of reactant edges, not on the total stoichiometry
    pub fn is_condition_satisfied(&self, ir: &IR, reaction: ReactionId) -> Reb2SacResult<bool> {
        Ok(!ir.reaction(reaction)?.reversible && ir.reactant_edges(reaction).len() > 1)
    }
}

impl AbstractionMethod for MultipleReactantsReactionEliminationMethod {
    fn id(&self) -> &'static str {
        "multiple-reactants-reaction-eliminator"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if self.is_condition_satisfied(ir, reaction)? {
                split_by_role(ir, reaction, EdgeRole::Reactant, "r")?;
                count += 1;
            }
        }
        info!("{}: {} reactions split", self.id(), count);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MultipleProductsReactionEliminationMethod;

impl MultipleProductsReactionEliminationMethod {
    pub fn is_condition_satisfied(&self, ir: &IR, reaction: ReactionId) -> Reb2SacResult<bool> {
        Ok(!ir.reaction(reaction)?.reversible && ir.product_edges(reaction).len() > 1)
    }
}

impl AbstractionMethod for MultipleProductsReactionEliminationMethod {
    fn id(&self) -> &'static str {
        "multiple-products-reaction-eliminator"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if self.is_condition_satisfied(ir, reaction)? {
                split_by_role(ir, reaction, EdgeRole::Product, "p")?;
                count += 1;
            }
        }
        info!("{}: {} reactions split", self.id(), count);
        Ok(())
    }
}

/// Turns `A -> B` into the consumption `A -> ∅` (`_r`) and the production `∅ -> B`
/// (`_p`), both driven by the original law.
#[derive(Debug, Clone, Default)]
pub struct SingleReactantProductReactionEliminationMethod;

impl SingleReactantProductReactionEliminationMethod {
    pub fn is_condition_satisfied(&self, ir: &IR, reaction: ReactionId) -> Reb2SacResult<bool> {
        Ok(!ir.reaction(reaction)?.reversible
            && ir.reactant_edges(reaction).len() == 1
            && ir.product_edges(reaction).len() == 1)
    }

    fn do_transformation(&self, ir: &mut IR, reaction: ReactionId) -> Reb2SacResult<()> {
        let reactant = ir.species_in_edge(ir.reactant_edges(reaction)[0])?;
        let product = ir.species_in_edge(ir.product_edges(reaction)[0])?;
        let name = ir.reaction(reaction)?.name.clone();
        for s in [reactant, product] {
            if ir.reaction(reaction)?.kinetic_law().find_species(s) {
                ensure_modifier_edge(ir, reaction, s)?;
            }
        }
        let production = ir.clone_reaction(reaction)?;
        // the original consumes the reactant
        strip_role_except(ir, reaction, EdgeRole::Product, None)?;
        remove_modifier_edges_of(ir, reaction, reactant)?;
        ir.rename_reaction(reaction, &format!("{}_r", name))?;
        // the clone produces the product
        strip_role_except(ir, production, EdgeRole::Reactant, None)?;
        remove_modifier_edges_of(ir, production, product)?;
        ir.rename_reaction(production, &format!("{}_p", name))?;
        debug!("split '{}' into consumption and production", name);
        Ok(())
    }
}

impl AbstractionMethod for SingleReactantProductReactionEliminationMethod {
    fn id(&self) -> &'static str {
        "single-reactant-product-reaction-eliminator"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if self.is_condition_satisfied(ir, reaction)? {
                self.do_transformation(ir, reaction)?;
                count += 1;
            }
        }
        info!("{}: {} reactions split", self.id(), count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::model_description::{ModelDescription, ReactionDescription, SpeciesDescription, SpeciesReferenceDescription};
    use crate::IR::species_node::InitialQuantity;

    fn model(reactants: &[(&str, f64)], products: &[(&str, f64)], law: &str) -> IR {
        let names = ["A", "B", "C", "D"];
        let description = ModelDescription {
            name: "split".to_string(),
            species: names
                .iter()
                .map(|n| SpeciesDescription {
                    name: n.to_string(),
                    compartment: None,
                    initial: InitialQuantity::Amount(1.0),
                    boundary_condition: false,
                    fast: false,
                    initial_assignment: None,
                    conversion_factor: None,
                })
                .collect(),
            reactions: vec![ReactionDescription {
                name: "R".to_string(),
                reversible: false,
                fast: false,
                reactants: reactants
                    .iter()
                    .map(|(s, n)| SpeciesReferenceDescription::new(s, *n))
                    .collect(),
                products: products
                    .iter()
                    .map(|(s, n)| SpeciesReferenceDescription::new(s, *n))
                    .collect(),
                modifiers: Vec::new(),
                kinetic_law: law.to_string(),
            }],
            ..Default::default()
        };
        IR::from_description(&description).unwrap()
    }

    #[test]
    fn repeated_reactant_is_not_split() {
        let mut ir = model(&[("A", 1.0), ("A", 1.0)], &[], "k*A*A");
        let before = ir.to_description().unwrap();
        MultipleReactantsReactionEliminationMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.to_description().unwrap(), before);
    }

    #[test]
    fn two_reactants_are_split_with_modifiers() {
        let mut ir = model(&[("A", 1.0), ("B", 1.0)], &[("C", 1.0)], "k*A*B");
        MultipleReactantsReactionEliminationMethod.apply(&mut ir).unwrap();
        let a = ir.find_species("A").unwrap();
        let b = ir.find_species("B").unwrap();
        let c = ir.find_species("C").unwrap();
        let ra = ir.find_reaction("R_r_A").unwrap();
        let rb = ir.find_reaction("R_r_B").unwrap();
        assert_eq!(ir.reaction_count(), 2);

        assert_eq!(species_of_edges(&ir, &ir.reactant_edges(ra)).unwrap(), vec![a]);
        assert_eq!(species_of_edges(&ir, &ir.modifier_edges(ra)).unwrap(), vec![b]);
        assert_eq!(species_of_edges(&ir, &ir.product_edges(ra)).unwrap(), vec![c]);

        assert_eq!(species_of_edges(&ir, &ir.reactant_edges(rb)).unwrap(), vec![b]);
        assert_eq!(species_of_edges(&ir, &ir.modifier_edges(rb)).unwrap(), vec![a]);
        assert!(ir.product_edges(rb).is_empty());

        assert_eq!(
            ir.reaction(ra).unwrap().kinetic_law(),
            ir.reaction(rb).unwrap().kinetic_law()
        );
        ir.check_consistency().unwrap();
    }

    #[test]
    fn species_outside_the_law_are_dropped() {
        let mut ir = model(&[("A", 1.0)], &[("B", 1.0), ("C", 2.0)], "k*A");
        MultipleProductsReactionEliminationMethod.apply(&mut ir).unwrap();
        let pb = ir.find_reaction("R_p_B").unwrap();
        let pc = ir.find_reaction("R_p_C").unwrap();
        let a = ir.find_species("A").unwrap();
        assert!(ir.modifier_edges(pb).is_empty());
        // the clone lost the reactant but its law still reads it
        assert_eq!(species_of_edges(&ir, &ir.modifier_edges(pc)).unwrap(), vec![a]);
        assert_eq!(ir.reactant_edges(pb).len(), 1);
        assert!(ir.reactant_edges(pc).is_empty());
        assert_eq!(ir.stoichiometry_in_edge(ir.product_edges(pc)[0]).unwrap(), 2.0);
    }

    #[test]
    fn single_reactant_product_split_is_stable() {
        let mut ir = model(&[("A", 1.0)], &[("B", 1.0)], "k*A");
        SingleReactantProductReactionEliminationMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 2);
        let consumption = ir.find_reaction("R_r").unwrap();
        let production = ir.find_reaction("R_p").unwrap();
        let a = ir.find_species("A").unwrap();
        assert_eq!(ir.reactant_edges(consumption).len(), 1);
        assert!(ir.product_edges(consumption).is_empty());
        assert!(ir.modifier_edges(consumption).is_empty());
        assert!(ir.reactant_edges(production).is_empty());
        assert_eq!(species_of_edges(&ir, &ir.modifier_edges(production)).unwrap(), vec![a]);

        // nothing left with one reactant and one product
        let after = ir.to_description().unwrap();
        SingleReactantProductReactionEliminationMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.to_description().unwrap(), after);
        ir.check_consistency().unwrap();
    }
}
