//! Structural clean-ups: catalytic species become modifiers, and reactions with the same
//! species sets are merged.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{are_lists_of_species_same, ensure_modifier_edge};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::KineticLaw::kinetic_law::{KineticLaw, KineticLawOp};
use crate::error::Reb2SacResult;
use log::{debug, info};

/// `E + S -> E + P` becomes `S -> P` with `E` as a modifier: a species that is both a
/// reactant and a product of one reaction, with equal stoichiometry, is a catalyst.
#[derive(Debug, Clone, Default)]
pub struct ModifierStructureTransformationMethod;

impl ModifierStructureTransformationMethod {
    fn transform_reaction(&self, ir: &mut IR, reaction: ReactionId) -> Reb2SacResult<usize> {
        let mut count = 0;
        for reactant in ir.reactant_edges(reaction) {
            let (species, stoichiometry) = {
                let edge = ir.edge(reactant)?;
                (edge.species(), edge.stoichiometry())
            };
            let matching_product = ir
                .product_edges(reaction)
                .into_iter()
                .find(|e| {
                    ir.edge(*e)
                        .map(|p| p.species() == species && p.stoichiometry() == stoichiometry)
                        .unwrap_or(false)
                });
            if let Some(product) = matching_product {
                ir.remove_reactant_edge(reactant)?;
                ir.remove_product_edge(product)?;
                ensure_modifier_edge(ir, reaction, species)?;
                debug!(
                    "'{}' is a modifier of '{}'",
                    ir.species_name(species),
                    ir.reaction(reaction)?.name
                );
                count += 1;
            }
        }
        Ok(count)
    }
}

impl AbstractionMethod for ModifierStructureTransformationMethod {
    fn id(&self) -> &'static str {
        "modifier-structure-transformer"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            count += self.transform_reaction(ir, reaction)?;
        }
        info!("{}: {} catalytic species turned into modifiers", self.id(), count);
        Ok(())
    }
}

/// Sum of two laws that factors out a shared operand: `k*A + k*B` gives `k*(A + B)` and
/// `A/V + B/V` gives `(A + B)/V`. Anything else is a plain sum.
pub fn combine_kinetic_laws(a: &KineticLaw, b: &KineticLaw) -> KineticLaw {
    if let (
        KineticLaw::Op {
            op: op_a,
            left: la,
            right: ra,
        },
        KineticLaw::Op {
            op: op_b,
            left: lb,
            right: rb,
        },
    ) = (a, b)
    {
        match (op_a, op_b) {
            (KineticLawOp::Times, KineticLawOp::Times) => {
                let (la, ra, lb, rb) = (la.as_ref(), ra.as_ref(), lb.as_ref(), rb.as_ref());
                if la == lb {
                    return la.clone() * (ra.clone() + rb.clone());
                }
                if la == rb {
                    return la.clone() * (ra.clone() + lb.clone());
                }
                if ra == lb {
                    return (la.clone() + rb.clone()) * ra.clone();
                }
                if ra == rb {
                    return (la.clone() + lb.clone()) * ra.clone();
                }
            }
            (KineticLawOp::Divide, KineticLawOp::Divide) if ra == rb => {
                return (la.as_ref().clone() + lb.as_ref().clone()) / ra.as_ref().clone();
            }
            _ => {}
        }
    }
    a.clone() + b.clone()
}

/// Merges two distinct reactions with the same reactant, product and modifier species
/// sets (stoichiometries are not compared) and the same reversibility.
#[derive(Debug, Clone, Default)]
pub struct SimilarReactionCombiningMethod;

impl SimilarReactionCombiningMethod {
    pub fn are_similar(&self, ir: &IR, r1: ReactionId, r2: ReactionId) -> Reb2SacResult<bool> {
        if r1 == r2 || ir.reaction(r1)?.reversible != ir.reaction(r2)?.reversible {
            return Ok(false);
        }
        for role in [EdgeRole::Reactant, EdgeRole::Product, EdgeRole::Modifier] {
            if !are_lists_of_species_same(ir, &ir.edges_of(r1, role), &ir.edges_of(r2, role))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl AbstractionMethod for SimilarReactionCombiningMethod {
    fn id(&self) -> &'static str {
        "similar-reaction-combiner"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let reactions = ir.reaction_ids();
        let mut count = 0;
        for (i, r1) in reactions.iter().enumerate() {
            for r2 in &reactions[i + 1..] {
                if !ir.contains_reaction(*r1) {
                    break;
                }
                if !ir.contains_reaction(*r2) || !self.are_similar(ir, *r1, *r2)? {
                    continue;
                }
                let law = combine_kinetic_laws(
                    ir.reaction(*r1)?.kinetic_law(),
                    ir.reaction(*r2)?.kinetic_law(),
                );
                ir.set_kinetic_law(*r1, law)?;
                debug!(
                    "combined '{}' into '{}'",
                    ir.reaction(*r2)?.name,
                    ir.reaction(*r1)?.name
                );
                ir.remove_reaction(*r2)?;
                count += 1;
            }
        }
        info!("{}: {} reactions combined", self.id(), count);
        Ok(())
    }
}
