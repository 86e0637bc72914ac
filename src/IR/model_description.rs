//! # Model description
//!
//! Serializable description of a reaction network, used to build an IR without an SBML
//! front end and to persist the result of an abstraction pipeline.
//!
//! ## Format
//! ```json
//! {
//!   "name": "birth_death",
//!   "compartments": [{ "name": "cell", "size": 1.0 }],
//!   "parameters": [{ "name": "k1", "value": 0.1 }],
//!   "species": [{ "name": "S", "compartment": "cell", "initial": { "amount": 10.0 } }],
//!   "reactions": [
//!     { "name": "birth", "products": [{ "species": "S" }], "kinetic_law": "k1" },
//!     { "name": "death", "reactants": [{ "species": "S", "stoichiometry": 1.0 }],
//!       "modifiers": [], "kinetic_law": "k3*S" }
//!   ]
//! }
//! ```
//! A species listed twice in the same role of one reaction (`A + A`) becomes a single
//! edge whose stoichiometry is the sum of the listed ones.
use crate::IR::ir_edge::{EdgeId, EdgeRole};
use crate::IR::ir_graph::IR;
use crate::IR::reaction_node::ReactionId;
use crate::IR::species_node::{InitialQuantity, SpeciesId};
use crate::error::{Reb2SacError, Reb2SacResult};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

fn one() -> f64 {
    1.0
}

fn zero_amount() -> InitialQuantity {
    InitialQuantity::Amount(0.0)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub compartments: Vec<CompartmentDescription>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    #[serde(default)]
    pub species: Vec<SpeciesDescription>,
    #[serde(default)]
    pub reactions: Vec<ReactionDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentDescription {
    pub name: String,
    #[serde(default = "one")]
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment: Option<String>,
    #[serde(default = "zero_amount")]
    pub initial: InitialQuantity,
    #[serde(default)]
    pub boundary_condition: bool,
    #[serde(default)]
    pub fast: bool,
    /// kinetic-law text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_assignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_factor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesReferenceDescription {
    pub species: String,
    #[serde(default = "one")]
    pub stoichiometry: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_ref: Option<String>,
}

impl SpeciesReferenceDescription {
    pub fn new(species: &str, stoichiometry: f64) -> Self {
        Self {
            species: species.to_string(),
            stoichiometry,
            species_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionDescription {
    pub name: String,
    #[serde(default)]
    pub reversible: bool,
    #[serde(default)]
    pub fast: bool,
    #[serde(default)]
    pub reactants: Vec<SpeciesReferenceDescription>,
    #[serde(default)]
    pub products: Vec<SpeciesReferenceDescription>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub kinetic_law: String,
}

impl IR {
    pub fn from_description(description: &ModelDescription) -> Reb2SacResult<IR> {
        let mut ir = IR::new(&description.name);
        for compartment in &description.compartments {
            ir.add_compartment(&compartment.name, compartment.size);
        }
        for parameter in &description.parameters {
            ir.set_parameter(&parameter.name, parameter.value);
        }
        for species in &description.species {
            if ir.find_species(&species.name).is_some() {
                return Err(Reb2SacError::failing(
                    "model description",
                    "add species",
                    format!("species '{}' is declared twice", species.name),
                ));
            }
            let id = ir.add_species(&species.name, species.initial);
            let node = ir.species_mut(id)?;
            node.compartment = species.compartment.clone();
            node.boundary_condition = species.boundary_condition;
            node.fast = species.fast;
            node.conversion_factor = species.conversion_factor.clone();
        }
        // initial assignments may refer to any species, so they are parsed once all exist
        for species in &description.species {
            if let Some(text) = &species.initial_assignment {
                let law = ir.parse_law(text)?;
                let id = lookup_species(&ir, &species.name)?;
                ir.species_mut(id)?.initial_assignment = Some(law);
            }
        }
        for reaction in &description.reactions {
            let id = ir.create_reaction(&reaction.name);
            {
                let node = ir.reaction_mut(id)?;
                node.reversible = reaction.reversible;
                node.fast = reaction.fast;
            }
            for reference in &reaction.reactants {
                add_merged_edge(&mut ir, id, EdgeRole::Reactant, reference)?;
            }
            for reference in &reaction.products {
                add_merged_edge(&mut ir, id, EdgeRole::Product, reference)?;
            }
            for modifier in &reaction.modifiers {
                let species = lookup_species(&ir, modifier)?;
                if ir.find_edge(id, species, EdgeRole::Modifier).is_none() {
                    ir.add_modifier_edge(id, species, 1.0)?;
                }
            }
            if !reaction.kinetic_law.trim().is_empty() {
                let law = ir.parse_law(&reaction.kinetic_law)?;
                ir.set_kinetic_law(id, law)?;
            }
        }
        Ok(ir)
    }

    pub fn to_description(&self) -> Reb2SacResult<ModelDescription> {
        let compartments = self
            .compartments()
            .map(|c| CompartmentDescription {
                name: c.name.clone(),
                size: c.size,
            })
            .collect();
        let parameters = self
            .parameters()
            .map(|(name, value)| ParameterDescription {
                name: name.clone(),
                value: *value,
            })
            .collect();
        let mut species = Vec::new();
        for id in self.species_ids() {
            let node = self.species(id)?;
            species.push(SpeciesDescription {
                name: node.name.clone(),
                compartment: node.compartment.clone(),
                initial: node.initial_quantity,
                boundary_condition: node.boundary_condition,
                fast: node.fast,
                initial_assignment: node
                    .initial_assignment
                    .as_ref()
                    .map(|law| self.law_to_string(law)),
                conversion_factor: node.conversion_factor.clone(),
            });
        }
        let mut reactions = Vec::new();
        for id in self.reaction_ids() {
            let node = self.reaction(id)?;
            let references = |edges: Vec<EdgeId>| -> Reb2SacResult<Vec<SpeciesReferenceDescription>> {
                edges
                    .into_iter()
                    .map(|e| {
                        let edge = self.edge(e)?;
                        Ok(SpeciesReferenceDescription {
                            species: self.species_name(edge.species()),
                            stoichiometry: edge.stoichiometry(),
                            species_ref: edge.species_ref.clone(),
                        })
                    })
                    .collect()
            };
            let modifiers = self
                .modifier_edges(id)
                .into_iter()
                .map(|e| Ok(self.species_name(self.species_in_edge(e)?)))
                .collect::<Reb2SacResult<Vec<String>>>()?;
            reactions.push(ReactionDescription {
                name: node.name.clone(),
                reversible: node.reversible,
                fast: node.fast,
                reactants: references(self.reactant_edges(id))?,
                products: references(self.product_edges(id))?,
                modifiers,
                kinetic_law: self.law_to_string(node.kinetic_law()),
            });
        }
        Ok(ModelDescription {
            name: self.name.clone(),
            compartments,
            parameters,
            species,
            reactions,
        })
    }

    pub fn load_from_json_file(path: &str) -> Reb2SacResult<IR> {
        let content = fs::read_to_string(path)?;
        let description: ModelDescription = serde_json::from_str(&content)?;
        let ir = IR::from_description(&description)?;
        info!(
            "loaded model '{}' from {}: {} species, {} reactions",
            ir.name,
            path,
            ir.species_count(),
            ir.reaction_count()
        );
        Ok(ir)
    }

    pub fn save_to_json_file(&self, path: &str) -> Reb2SacResult<()> {
        let description = self.to_description()?;
        let content = serde_json::to_string_pretty(&description)?;
        fs::write(path, content)?;
        info!("model '{}' saved to {}", self.name, path);
        Ok(())
    }
}

fn lookup_species(ir: &IR, name: &str) -> Reb2SacResult<SpeciesId> {
    ir.find_species(name).ok_or_else(|| {
        Reb2SacError::failing(
            "model description",
            "resolve species",
            format!("species '{}' is not declared", name),
        )
    })
}

fn add_merged_edge(
    ir: &mut IR,
    reaction: ReactionId,
    role: EdgeRole,
    reference: &SpeciesReferenceDescription,
) -> Reb2SacResult<()> {
    let species = lookup_species(ir, &reference.species)?;
    match ir.find_edge(reaction, species, role) {
        Some(edge) => {
            let total = ir.stoichiometry_in_edge(edge)? + reference.stoichiometry;
            ir.set_stoichiometry(edge, total)
        }
        None => {
            ir.add_edge(
                role,
                reaction,
                species,
                reference.stoichiometry,
                reference.species_ref.clone(),
            )?;
            Ok(())
        }
    }
}
