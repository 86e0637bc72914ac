//! Rapid-equilibrium reductions: a fast reversible binding is assumed to sit at its
//! equilibrium, so the bound complex can be written as an algebraic function of the
//! free species and the binding reaction disappears.
//!
//! All methods expect mass-action halves: `kf*A*B^n - kr*C` where the rate constants
//! `kf` and `kr` do not read any species.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::abstraction_utils::{
    initial_amount, is_in_initial_assignment, mass_action_rate_constant, remove_modifier_edges_of,
    sole_edge, species_power, split_reversible_law, substitute_species_everywhere,
};
use crate::IR::ir_edge::EdgeRole;
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::{InitialQuantity, SpeciesId};
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::KineticLaw::kinetic_law_evaluator::KineticLawEvaluator;
use crate::error::Reb2SacResult;
use log::{debug, info};

/// `kf / kr` of a reversible mass-action reaction, or `None` when one of the constants
/// still reads a species.
fn equilibrium_constant(
    ir: &IR,
    reaction: ReactionId,
    forward_species: &[SpeciesId],
    backward_species: &[SpeciesId],
) -> Reb2SacResult<Option<KineticLaw>> {
    let node = ir.reaction(reaction)?;
    if !node.reversible {
        return Ok(None);
    }
    let Some((forward, backward)) = split_reversible_law(node.kinetic_law()) else {
        return Ok(None);
    };
    let kf = mass_action_rate_constant(&forward, forward_species);
    let kr = mass_action_rate_constant(&backward, backward_species);
    if !kf.collect_species().is_empty() || !kr.collect_species().is_empty() {
        return Ok(None);
    }
    Ok(Some(kf / kr))
}

/// Species produced by one reaction only and otherwise read as a modifier.
fn is_complex_only_of(ir: &IR, complex: SpeciesId, reaction: ReactionId) -> Reb2SacResult<bool> {
    let products = ir.product_edges(complex);
    Ok(products.len() == 1
        && ir.reaction_in_edge(products[0])? == reaction
        && ir.reactant_edges(complex).is_empty()
        && ir.species(complex)?.initial_assignment.is_none()
        && !is_in_initial_assignment(ir, complex)?)
}

/////////////////////////////////DIMERIZATION/////////////////////////////////

/// `2 M <-> D`: the dimer `D` is replaced by `(kf/kr)*M^2` in every law that reads it.
#[derive(Debug, Clone, Default)]
pub struct DimerizationReductionMethod;

struct Dimerization {
    reaction: ReactionId,
    monomer: SpeciesId,
    constant: KineticLaw,
}

/// the unit dimer `D` of a modifier-free `2 M <-> D` with mass-action halves
fn find_dimerization(ir: &IR, dimer: SpeciesId) -> Reb2SacResult<Option<Dimerization>> {
    let products = ir.product_edges(dimer);
    if products.len() != 1 {
        return Ok(None);
    }
    let reaction = ir.reaction_in_edge(products[0])?;
    if !is_complex_only_of(ir, dimer, reaction)? || !ir.modifier_edges(reaction).is_empty() {
        return Ok(None);
    }
    let (Some((_, monomer, n_monomer)), Some((_, product, n_dimer))) = (
        sole_edge(ir, reaction, EdgeRole::Reactant)?,
        sole_edge(ir, reaction, EdgeRole::Product)?,
    ) else {
        return Ok(None);
    };
    if n_monomer != 2.0 || n_dimer != 1.0 || product != dimer || monomer == dimer {
        return Ok(None);
    }
    let Some(constant) = equilibrium_constant(ir, reaction, &[monomer], &[dimer])? else {
        return Ok(None);
    };
    Ok(Some(Dimerization {
        reaction,
        monomer,
        constant,
    }))
}

impl DimerizationReductionMethod {
    fn do_transformation(&self, ir: &mut IR, dimer: SpeciesId, found: Dimerization) -> Reb2SacResult<()> {
        let replacement = found.constant * species_power(found.monomer, 2.0);
        debug!(
            "dimer '{}' replaced by {}",
            ir.species_name(dimer),
            ir.law_to_string(&replacement)
        );
        ir.remove_reaction(found.reaction)?;
        substitute_species_everywhere(ir, dimer, &replacement, &[found.monomer])?;
        ir.remove_species(dimer)?;
        Ok(())
    }
}

impl AbstractionMethod for DimerizationReductionMethod {
    fn id(&self) -> &'static str {
        "dimerization-reduction"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for species in ir.species_ids() {
            if !ir.contains_species(species) {
                continue;
            }
            if let Some(found) = find_dimerization(ir, species)? {
                self.do_transformation(ir, species, found)?;
                count += 1;
            }
        }
        info!("{}: {} dimers reduced", self.id(), count);
        Ok(())
    }
}

/// `2 M <-> D` at equilibrium, with the dimer kept as a level: the binding reaction is
/// removed, every law reads `(kf/kr)*M^2` instead of `D`, and `D` becomes a boundary
/// species whose initial assignment is that expression.
#[derive(Debug, Clone, Default)]
pub struct DimerizationLevelAssignmentMethod;

impl DimerizationLevelAssignmentMethod {
    fn do_transformation(&self, ir: &mut IR, dimer: SpeciesId, found: Dimerization) -> Reb2SacResult<()> {
        let level = found.constant * species_power(found.monomer, 2.0);
        ir.remove_reaction(found.reaction)?;
        for reaction in substitute_species_everywhere(ir, dimer, &level, &[found.monomer])? {
            remove_modifier_edges_of(ir, reaction, dimer)?;
        }
        let initial = KineticLawEvaluator::new(ir).evaluate_with_current_amounts(&level);
        let node = ir.species_mut(dimer)?;
        if let Ok(value) = initial {
            node.initial_quantity = InitialQuantity::Amount(value);
        }
        node.boundary_condition = true;
        node.initial_assignment = Some(level);
        debug!("dimer '{}' assigned from its monomer", ir.species_name(dimer));
        Ok(())
    }
}

impl AbstractionMethod for DimerizationLevelAssignmentMethod {
    fn id(&self) -> &'static str {
        "dimerization-reduction-level-assignment"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for species in ir.species_ids() {
            if let Some(found) = find_dimerization(ir, species)? {
                self.do_transformation(ir, species, found)?;
                count += 1;
            }
        }
        info!("{}: {} dimers turned into levels", self.id(), count);
        Ok(())
    }
}

/////////////////////////////////OPERATOR SITE BINDING/////////////////////////////////

/// An operator site `O` that binds regulators `R_i` through `O + n_i R_i <-> C_i`.
/// With `K_i = kf_i/kr_i` and `D = 1 + sum(K_i * R_i^n_i)` the equilibrium gives
/// `O = Otot/D` and `C_i = Otot*K_i*R_i^n_i/D`.
///
/// The first form drops `O` and uses the summed initial amounts as a constant `Otot`;
/// with `keep_operator` the species `O` stays and stands for the total operator.
#[derive(Debug, Clone, Default)]
pub struct OpSiteBindingAbstractionMethod {
    pub keep_operator: bool,
}

struct Binding {
    reaction: ReactionId,
    regulator: SpeciesId,
    stoichiometry: f64,
    complex: SpeciesId,
    constant: KineticLaw,
}

impl OpSiteBindingAbstractionMethod {
    pub fn new(keep_operator: bool) -> Self {
        Self { keep_operator }
    }

    fn find_binding(&self, ir: &IR, operator: SpeciesId, reaction: ReactionId) -> Reb2SacResult<Option<Binding>> {
        let reactants = ir.reactant_edges(reaction);
        if reactants.len() != 2 || !ir.modifier_edges(reaction).is_empty() {
            return Ok(None);
        }
        let mut regulator = None;
        for edge in &reactants {
            let edge = ir.edge(*edge)?;
            if edge.species() == operator {
                if edge.stoichiometry() != 1.0 {
                    return Ok(None);
                }
            } else {
                regulator = Some((edge.species(), edge.stoichiometry()));
            }
        }
        let Some((regulator, stoichiometry)) = regulator else {
            return Ok(None);
        };
        let Some((_, complex, n_complex)) = sole_edge(ir, reaction, EdgeRole::Product)? else {
            return Ok(None);
        };
        if n_complex != 1.0
            || complex == operator
            || complex == regulator
            || !is_complex_only_of(ir, complex, reaction)?
        {
            return Ok(None);
        }
        let Some(constant) = equilibrium_constant(ir, reaction, &[operator, regulator], &[complex])? else {
            return Ok(None);
        };
        Ok(Some(Binding {
            reaction,
            regulator,
            stoichiometry,
            complex,
            constant,
        }))
    }

    fn find_bindings(&self, ir: &IR, operator: SpeciesId) -> Reb2SacResult<Option<Vec<Binding>>> {
        let node = ir.species(operator)?;
        if node.boundary_condition
            || node.initial_assignment.is_some()
            || is_in_initial_assignment(ir, operator)?
            || !ir.product_edges(operator).is_empty()
        {
            return Ok(None);
        }
        let reactant_edges = ir.reactant_edges(operator);
        if reactant_edges.is_empty() {
            return Ok(None);
        }
        let mut bindings: Vec<Binding> = Vec::new();
        for edge in reactant_edges {
            let reaction = ir.reaction_in_edge(edge)?;
            let Some(binding) = self.find_binding(ir, operator, reaction)? else {
                return Ok(None);
            };
            // complexes must be distinct and must not regulate another site
            if bindings.iter().any(|b| {
                b.complex == binding.complex
                    || b.regulator == binding.complex
                    || b.complex == binding.regulator
            }) {
                return Ok(None);
            }
            bindings.push(binding);
        }
        Ok(Some(bindings))
    }

    fn do_transformation(&self, ir: &mut IR, operator: SpeciesId, bindings: Vec<Binding>) -> Reb2SacResult<()> {
        let mut total = initial_amount(ir, operator)?;
        for binding in &bindings {
            total += initial_amount(ir, binding.complex)?;
        }
        let mut denominator = KineticLaw::int(1);
        for binding in &bindings {
            denominator = denominator
                + binding.constant.clone() * species_power(binding.regulator, binding.stoichiometry);
        }
        let operator_total = if self.keep_operator {
            ir.species_mut(operator)?.initial_quantity = InitialQuantity::Amount(total);
            KineticLaw::species(operator)
        } else {
            KineticLaw::real(total)
        };
        let mut modifiers: Vec<SpeciesId> = bindings.iter().map(|b| b.regulator).collect();
        if self.keep_operator {
            modifiers.push(operator);
        }

        for binding in &bindings {
            ir.remove_reaction(binding.reaction)?;
        }
        // the free operator first, so its replacement is not applied to the kept total
        let free_operator = operator_total.clone() / denominator.clone();
        substitute_species_everywhere(ir, operator, &free_operator, &modifiers)?;
        for binding in &bindings {
            let bound = operator_total.clone()
                * binding.constant.clone()
                * species_power(binding.regulator, binding.stoichiometry)
                / denominator.clone();
            substitute_species_everywhere(ir, binding.complex, &bound, &modifiers)?;
            debug!(
                "complex '{}' of operator '{}' eliminated",
                ir.species_name(binding.complex),
                ir.species_name(operator)
            );
            ir.remove_species(binding.complex)?;
        }
        if !self.keep_operator {
            ir.remove_species(operator)?;
        }
        Ok(())
    }
}

impl AbstractionMethod for OpSiteBindingAbstractionMethod {
    fn id(&self) -> &'static str {
        if self.keep_operator {
            "op-site-binding-abstractor-2"
        } else {
            "op-site-binding-abstractor"
        }
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for species in ir.species_ids() {
            if !ir.contains_species(species) {
                continue;
            }
            if let Some(bindings) = self.find_bindings(ir, species)? {
                self.do_transformation(ir, species, bindings)?;
                count += 1;
            }
        }
        info!("{}: {} operator sites abstracted", self.id(), count);
        Ok(())
    }
}
