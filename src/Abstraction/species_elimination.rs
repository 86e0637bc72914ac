//! Removing species that the dynamics do not need.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::is_in_initial_assignment;
use crate::Abstraction::properties::{INTERESTING_SPECIES_KEY, Properties};
use crate::IR::ir_graph::IR;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::Reb2SacResult;
use log::{debug, info};

/// A species that is never produced or consumed keeps its initial value forever, so the
/// laws that read it can use that value directly.
#[derive(Debug, Clone, Default)]
pub struct ModifierConstantPropagationMethod;

impl ModifierConstantPropagationMethod {
    pub fn is_condition_satisfied(&self, ir: &IR, species: SpeciesId) -> Reb2SacResult<bool> {
        let node = ir.species(species)?;
        Ok(node.initial_assignment.is_none()
            && ir.reactant_edges(species).is_empty()
            && ir.product_edges(species).is_empty()
            && !ir.modifier_edges(species).is_empty()
            && !is_in_initial_assignment(ir, species)?)
    }

    fn do_transformation(&self, ir: &mut IR, species: SpeciesId) -> Reb2SacResult<()> {
        // value in the quantity mode the species was declared with
        let value = KineticLaw::real(ir.species(species)?.initial_quantity.value());
        for reaction in ir.reaction_ids() {
            ir.reaction_mut(reaction)?
                .kinetic_law_mut()
                .replace_species_with_kinetic_law(species, &value);
        }
        debug!("'{}' replaced by its initial value {}", ir.species_name(species), value);
        ir.remove_species(species)?;
        Ok(())
    }
}

impl AbstractionMethod for ModifierConstantPropagationMethod {
    fn id(&self) -> &'static str {
        "modifier-constant-propagation"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for species in ir.species_ids() {
            if self.is_condition_satisfied(ir, species)? {
                self.do_transformation(ir, species)?;
                count += 1;
            }
        }
        info!("{}: {} constant species propagated", self.id(), count);
        Ok(())
    }
}

/// Removes species that are neither listed as interesting nor read by any law or initial
/// assignment, then the reactions left without edges. Without a list of interesting
/// species every species is kept.
#[derive(Debug, Clone, Default)]
pub struct IrrelevantSpeciesEliminationMethod {
    pub interesting: Vec<String>,
}

impl IrrelevantSpeciesEliminationMethod {
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            interesting: properties.get_list(INTERESTING_SPECIES_KEY),
        }
    }

    pub fn is_condition_satisfied(&self, ir: &IR, species: SpeciesId) -> Reb2SacResult<bool> {
        let node = ir.species(species)?;
        Ok(!self.interesting.iter().any(|name| *name == node.name)
            && ir.species_referenced_by(species).is_none())
    }
}

impl AbstractionMethod for IrrelevantSpeciesEliminationMethod {
    fn id(&self) -> &'static str {
        "irrelevant-species-elimination"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        if self.interesting.is_empty() {
            info!("{}: no interesting species configured", self.id());
            return Ok(());
        }
        let mut removed_species = 0;
        for species in ir.species_ids() {
            if self.is_condition_satisfied(ir, species)? {
                debug!("removing irrelevant species '{}'", ir.species_name(species));
                ir.remove_species(species)?;
                removed_species += 1;
            }
        }
        let mut removed_reactions = 0;
        for reaction in ir.reaction_ids() {
            if ir.all_edges_of(reaction).is_empty() {
                ir.remove_reaction(reaction)?;
                removed_reactions += 1;
            }
        }
        info!(
            "{}: {} species and {} reactions removed",
            self.id(),
            removed_species,
            removed_reactions
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IR::species_node::InitialQuantity;

    #[test]
    fn constant_modifier_is_inlined() {
        let mut ir = IR::new("constant");
        let e = ir.add_species("E", InitialQuantity::Amount(5.0));
        let s = ir.add_species("S", InitialQuantity::Amount(1.0));
        let r = ir.create_reaction("R");
        ir.add_reactant_edge(r, s, 1.0).unwrap();
        ir.add_modifier_edge(r, e, 1.0).unwrap();
        let law = ir.parse_law("k*E*S").unwrap();
        ir.set_kinetic_law(r, law).unwrap();
        ModifierConstantPropagationMethod.apply(&mut ir).unwrap();
        assert!(!ir.contains_species(e));
        assert!(ir.contains_species(s));
        assert_eq!(ir.law_to_string(ir.reaction(r).unwrap().kinetic_law()), "k*5.0*S");
        assert!(ir.modifier_edges(r).is_empty());
        ir.check_consistency().unwrap();
    }

    #[test]
    fn species_in_initial_assignment_is_kept() {
        let mut ir = IR::new("assigned");
        let e = ir.add_species("E", InitialQuantity::Amount(5.0));
        let f = ir.add_species("F", InitialQuantity::Amount(0.0));
        let r = ir.create_reaction("R");
        ir.add_modifier_edge(r, e, 1.0).unwrap();
        ir.species_mut(f).unwrap().initial_assignment = Some(KineticLaw::species(e));
        ModifierConstantPropagationMethod.apply(&mut ir).unwrap();
        assert!(ir.contains_species(e));
    }

    #[test]
    fn irrelevant_species_and_empty_reactions_go() {
        let mut ir = IR::new("irrelevant");
        let a = ir.add_species("A", InitialQuantity::Amount(1.0));
        let b = ir.add_species("B", InitialQuantity::Amount(0.0));
        let waste = ir.add_species("W", InitialQuantity::Amount(0.0));
        let r1 = ir.create_reaction("r1");
        ir.add_reactant_edge(r1, a, 1.0).unwrap();
        ir.add_product_edge(r1, b, 1.0).unwrap();
        let law = ir.parse_law("k*A").unwrap();
        ir.set_kinetic_law(r1, law).unwrap();
        let r2 = ir.create_reaction("r2");
        ir.add_product_edge(r2, waste, 1.0).unwrap();

        let mut properties = Properties::new();
        properties.set(INTERESTING_SPECIES_KEY, "A");
        let method = IrrelevantSpeciesEliminationMethod::from_properties(&properties);
        method.apply(&mut ir).unwrap();
        // B is not interesting and nobody reads it; A is read by r1
        assert!(ir.contains_species(a));
        assert!(!ir.contains_species(b));
        assert!(!ir.contains_species(waste));
        assert!(ir.contains_reaction(r1));
        assert!(!ir.contains_reaction(r2));
        ir.check_consistency().unwrap();
    }

    #[test]
    fn nothing_is_removed_without_interesting_species() {
        let mut ir = IR::new("keep");
        ir.add_species("A", InitialQuantity::Amount(1.0));
        IrrelevantSpeciesEliminationMethod::default().apply(&mut ir).unwrap();
        assert_eq!(ir.species_count(), 1);
    }
}
