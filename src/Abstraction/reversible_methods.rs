//! Splitting reversible reactions into two irreversible ones, and merging them back.
//!
//! A reversible reaction carries the net law `forward - backward`. Splitting keeps the
//! forward half on the original reaction and moves the backward half to a clone whose
//! reactants and products are swapped. Merging looks for two irreversible reactions that
//! mirror each other and rebuilds the `forward - backward` law.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{are_lists_of_species_same, split_reversible_law};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::error::{Reb2SacError, Reb2SacResult};
use log::{debug, info, warn};

const FORWARD_SUFFIX: &str = "_forward";
const BACKWARD_SUFFIX: &str = "_backward";

#[derive(Debug, Clone, Default)]
pub struct ReversibleToIrreversibleMethod;

impl ReversibleToIrreversibleMethod {
    fn is_condition_satisfied(&self, ir: &IR, reaction: ReactionId) -> Reb2SacResult<bool> {
        let node = ir.reaction(reaction)?;
        if !node.reversible {
            return Ok(false);
        }
        if split_reversible_law(node.kinetic_law()).is_none() {
            warn!(
                "reversible reaction '{}' has no forward - backward law and is left as is",
                node.name
            );
            return Ok(false);
        }
        Ok(true)
    }

    fn do_transformation(&self, ir: &mut IR, reaction: ReactionId) -> Reb2SacResult<ReactionId> {
        let (forward, backward) = split_reversible_law(ir.reaction(reaction)?.kinetic_law())
            .ok_or_else(|| {
                Reb2SacError::MalformedKineticLaw(format!("{} has no forward - backward law", reaction))
            })?;
        let name = ir.reaction(reaction)?.name.clone();
        let reverse = ir.clone_reaction(reaction)?;
        for edge in ir.all_edges_of(reverse) {
            match ir.edge(edge)?.role() {
                EdgeRole::Reactant => ir.set_edge_role(edge, EdgeRole::Product)?,
                EdgeRole::Product => ir.set_edge_role(edge, EdgeRole::Reactant)?,
                EdgeRole::Modifier => {}
            }
        }
        ir.set_kinetic_law(reaction, forward)?;
        ir.set_kinetic_law(reverse, backward)?;
        ir.reaction_mut(reaction)?.reversible = false;
        ir.reaction_mut(reverse)?.reversible = false;
        ir.rename_reaction(reaction, &format!("{}{}", name, FORWARD_SUFFIX))?;
        ir.rename_reaction(reverse, &format!("{}{}", name, BACKWARD_SUFFIX))?;
        debug!("split reversible reaction '{}'", name);
        Ok(reverse)
    }
}

impl AbstractionMethod for ReversibleToIrreversibleMethod {
    fn id(&self) -> &'static str {
        "reversible-to-irreversible-transformer"
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

#[derive(Debug, Clone, Default)]
pub struct ReversibleReactionStructureTransformationMethod;

impl ReversibleReactionStructureTransformationMethod {
    /// `r1` and `r2` are both irreversible and mirror each other species-wise
    pub fn are_mirrored(&self, ir: &IR, r1: ReactionId, r2: ReactionId) -> Reb2SacResult<bool> {
        if r1 == r2 || ir.reaction(r1)?.reversible || ir.reaction(r2)?.reversible {
            return Ok(false);
        }
        Ok(
            are_lists_of_species_same(ir, &ir.reactant_edges(r1), &ir.product_edges(r2))?
                && are_lists_of_species_same(ir, &ir.product_edges(r1), &ir.reactant_edges(r2))?
                && are_lists_of_species_same(ir, &ir.modifier_edges(r1), &ir.modifier_edges(r2))?,
        )
    }

    fn do_transformation(&self, ir: &mut IR, r1: ReactionId, r2: ReactionId) -> Reb2SacResult<ReactionId> {
        // the side with more reactants is the forward direction, ties keep the first
        let (forward, backward) = if ir.reactant_edges(r2).len() > ir.reactant_edges(r1).len() {
            (r2, r1)
        } else {
            (r1, r2)
        };
        let law = ir.reaction(forward)?.kinetic_law().clone()
            - ir.reaction(backward)?.kinetic_law().clone();
        ir.set_kinetic_law(forward, law)?;
        ir.reaction_mut(forward)?.reversible = true;
        let name = ir.reaction(forward)?.name.clone();
        if let Some(base) = name.strip_suffix(FORWARD_SUFFIX) {
            ir.rename_reaction(forward, base)?;
        }
        debug!(
            "merged '{}' into reversible reaction '{}'",
            ir.reaction(backward)?.name,
            name
        );
        ir.remove_reaction(backward)?;
        Ok(forward)
    }
}

impl AbstractionMethod for ReversibleReactionStructureTransformationMethod {
    fn id(&self) -> &'static str {
        "reversible-reaction-structure-transformer"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let reactions = ir.reaction_ids();
        let mut count = 0;
        for (i, r1) in reactions.iter().enumerate() {
            for r2 in &reactions[i + 1..] {
                if !ir.contains_reaction(*r1) {
                    break;
                }
                if !ir.contains_reaction(*r2) {
                    continue;
                }
                if self.are_mirrored(ir, *r1, *r2)? {
                    self.do_transformation(ir, *r1, *r2)?;
                    count += 1;
                }
            }
        }
        info!("{}: {} reaction pairs merged", self.id(), count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::species_node::InitialQuantity;
    use crate::KineticLaw::kinetic_law::KineticLaw;

    fn reversible_model() -> (IR, ReactionId) {
        let mut ir = IR::new("binding");
        let a = ir.add_species("A", InitialQuantity::Amount(10.0));
        let b = ir.add_species("B", InitialQuantity::Amount(10.0));
        let c = ir.add_species("C", InitialQuantity::Amount(0.0));
        let e = ir.add_species("E", InitialQuantity::Amount(1.0));
        let r = ir.create_reaction("bind");
        ir.add_reactant_edge(r, a, 1.0).unwrap();
        ir.add_reactant_edge(r, b, 1.0).unwrap();
        ir.add_product_edge(r, c, 1.0).unwrap();
        ir.add_modifier_edge(r, e, 1.0).unwrap();
        ir.reaction_mut(r).unwrap().reversible = true;
        let law = ir.parse_law("kf*A*B*E - kr*C").unwrap();
        ir.set_kinetic_law(r, law).unwrap();
        (ir, r)
    }

    #[test]
    fn splits_into_forward_and_swapped_backward() {
        let (mut ir, r) = reversible_model();
        ReversibleToIrreversibleMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 2);
        let forward = ir.find_reaction("bind_forward").unwrap();
        let backward = ir.find_reaction("bind_backward").unwrap();
        assert_eq!(forward, r);
        assert!(!ir.reaction(forward).unwrap().reversible);
        assert!(!ir.reaction(backward).unwrap().reversible);
        assert_eq!(ir.law_to_string(ir.reaction(backward).unwrap().kinetic_law()), "kr*C");
        assert_eq!(ir.reactant_edges(backward).len(), 1);
        assert_eq!(ir.product_edges(backward).len(), 2);
        assert_eq!(ir.modifier_edges(backward).len(), 1);
        ir.check_consistency().unwrap();
    }

    #[test]
    fn split_then_merge_restores_the_law() {
        let (mut ir, r) = reversible_model();
        let original = ir.reaction(r).unwrap().kinetic_law().clone();
        ReversibleToIrreversibleMethod.apply(&mut ir).unwrap();
        ReversibleReactionStructureTransformationMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 1);
        let merged = ir.find_reaction("bind").unwrap();
        let reaction = ir.reaction(merged).unwrap();
        assert!(reaction.reversible);
        let (forward, backward) = split_reversible_law(reaction.kinetic_law()).unwrap();
        let (original_forward, original_backward) = split_reversible_law(&original).unwrap();
        assert_eq!(forward, original_forward);
        assert_eq!(backward, original_backward);
        ir.check_consistency().unwrap();
    }

    #[test]
    fn reversible_without_minus_root_is_kept() {
        let (mut ir, r) = reversible_model();
        ir.set_kinetic_law(r, KineticLaw::symbol("k")).unwrap();
        ReversibleToIrreversibleMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 1);
        assert!(ir.reaction(r).unwrap().reversible);
    }

    #[test]
    fn reactions_with_different_modifiers_are_not_merged() {
        let (mut ir, _) = reversible_model();
        ReversibleToIrreversibleMethod.apply(&mut ir).unwrap();
        let backward = ir.find_reaction("bind_backward").unwrap();
        let e = ir.find_species("E").unwrap();
        let edge = ir.find_edge(backward, e, EdgeRole::Modifier).unwrap();
        ir.remove_modifier_edge(edge).unwrap();
        ReversibleReactionStructureTransformationMethod.apply(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 2);
    }
}
