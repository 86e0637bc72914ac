//! Numeric evaluation of kinetic laws against the current state of an IR.
//!
//! The evaluator is the interface the simulators consume: every law produced by the
//! abstraction methods must be evaluable here with the same operator vocabulary.
use crate::IR::ir_graph::IR;
use crate::IR::species_node::SpeciesId;
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::error::{Reb2SacError, Reb2SacResult};
use std::collections::HashMap;

pub struct KineticLawEvaluator<'a> {
    ir: &'a IR,
    amounts: HashMap<SpeciesId, f64>,
}

impl<'a> KineticLawEvaluator<'a> {
    /// Current amounts start at the initial quantities: an initial concentration is
    /// turned into an amount with the size of the species compartment.
    pub fn new(ir: &'a IR) -> Self {
        let mut amounts = HashMap::new();
        for id in ir.species_ids() {
            if let Ok(species) = ir.species(id) {
                let value = if species.initial_quantity.is_amount() {
                    species.initial_quantity.value()
                } else {
                    species.initial_quantity.value() * compartment_size(ir, id)
                };
                amounts.insert(id, value);
            }
        }
        Self { ir, amounts }
    }

    pub fn set_amount(&mut self, species: SpeciesId, amount: f64) {
        self.amounts.insert(species, amount);
    }

    pub fn amount(&self, species: SpeciesId) -> Reb2SacResult<f64> {
        self.amounts
            .get(&species)
            .copied()
            .ok_or(Reb2SacError::UnknownSpecies(species))
    }

    pub fn evaluate_with_current_amounts(&self, law: &KineticLaw) -> Reb2SacResult<f64> {
        self.evaluate(law, &|species| self.amount(species))
    }

    pub fn evaluate_with_current_concentrations(&self, law: &KineticLaw) -> Reb2SacResult<f64> {
        self.evaluate(law, &|species| {
            Ok(self.amount(species)? / compartment_size(self.ir, species))
        })
    }

    fn evaluate(
        &self,
        law: &KineticLaw,
        species_value: &dyn Fn(SpeciesId) -> Reb2SacResult<f64>,
    ) -> Reb2SacResult<f64> {
        match law {
            KineticLaw::Op { op, left, right } => {
                let l = self.evaluate(left, species_value)?;
                let r = self.evaluate(right, species_value)?;
                Ok(op.apply(l, r))
            }
            KineticLaw::Unary { op, operand } => {
                Ok(op.apply(self.evaluate(operand, species_value)?))
            }
            KineticLaw::RealValue(v) => Ok(*v),
            KineticLaw::IntValue(v) => Ok(*v as f64),
            KineticLaw::Species(s) => species_value(*s),
            KineticLaw::Symbol(name) => self.symbol_value(name),
        }
    }

    fn symbol_value(&self, name: &str) -> Reb2SacResult<f64> {
        if let Some(value) = self.ir.parameter(name) {
            return Ok(value);
        }
        if let Some(compartment) = self.ir.compartment(name) {
            return Ok(compartment.size);
        }
        Err(Reb2SacError::Evaluation(format!(
            "symbol '{}' is neither a parameter nor a compartment",
            name
        )))
    }
}

fn compartment_size(ir: &IR, species: SpeciesId) -> f64 {
    ir.species(species)
        .ok()
        .and_then(|s| s.compartment.as_deref())
        .and_then(|c| ir.compartment(c))
        .map(|c| c.size)
        .unwrap_or(1.0)
}
