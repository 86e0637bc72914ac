//! # Reaction-network IR
//!
//! The IR is a bipartite graph: species and reactions are nodes, and role-typed edges
//! (reactant, product, modifier) connect one species with one reaction.
//!
//! All edges live in a single store owned by the IR. The per-node adjacency lists are an
//! index over that store, updated only by the edge mutators in this file, so a species and
//! a reaction always agree about the edges between them.
//!
//! Node lists are returned as snapshots (`species_ids`, `reaction_ids`): abstraction
//! methods iterate a snapshot and skip ids that a previous step already removed.
use crate::IR::ir_edge::{EdgeId, EdgeRole, IrEdge};
use crate::IR::reaction_node::{Reaction, ReactionId};
use crate::IR::species_node::{InitialQuantity, Species, SpeciesId};
use crate::KineticLaw::kinetic_law::KineticLaw;
use crate::KineticLaw::kinetic_law_parser::parse_kinetic_law;
use crate::error::{Reb2SacError, Reb2SacResult};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Compartment {
    pub name: String,
    pub size: f64,
}

/// Either side of an edge. Adjacency queries accept both kinds of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrNode {
    Species(SpeciesId),
    Reaction(ReactionId),
}

impl From<SpeciesId> for IrNode {
    fn from(id: SpeciesId) -> Self {
        IrNode::Species(id)
    }
}

impl From<ReactionId> for IrNode {
    fn from(id: ReactionId) -> Self {
        IrNode::Reaction(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IR {
    pub name: String,
    species: IndexMap<SpeciesId, Species>,
    reactions: IndexMap<ReactionId, Reaction>,
    edges: IndexMap<EdgeId, IrEdge>,
    node_edges: HashMap<IrNode, Vec<EdgeId>>,
    compartments: IndexMap<String, Compartment>,
    parameters: IndexMap<String, f64>,
    next_id: usize,
}

impl IR {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /////////////////////////////////COMPARTMENTS AND PARAMETERS/////////////////////////////////
    pub fn add_compartment(&mut self, name: &str, size: f64) {
        self.compartments.insert(
            name.to_string(),
            Compartment {
                name: name.to_string(),
                size,
            },
        );
    }

    pub fn compartment(&self, name: &str) -> Option<&Compartment> {
        self.compartments.get(name)
    }

    pub fn compartments(&self) -> impl Iterator<Item = &Compartment> {
        self.compartments.values()
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) {
        self.parameters.insert(name.to_string(), value);
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.parameters.iter()
    }

    /////////////////////////////////SPECIES/////////////////////////////////
    pub fn add_species(&mut self, name: &str, initial_quantity: InitialQuantity) -> SpeciesId {
        let id = SpeciesId(self.next_id());
        self.species
            .insert(id, Species::new(id, name, initial_quantity));
        id
    }

    pub fn species(&self, id: SpeciesId) -> Reb2SacResult<&Species> {
        self.species.get(&id).ok_or(Reb2SacError::UnknownSpecies(id))
    }

    pub fn species_mut(&mut self, id: SpeciesId) -> Reb2SacResult<&mut Species> {
        self.species
            .get_mut(&id)
            .ok_or(Reb2SacError::UnknownSpecies(id))
    }

    pub fn contains_species(&self, id: SpeciesId) -> bool {
        self.species.contains_key(&id)
    }

    pub fn species_ids(&self) -> Vec<SpeciesId> {
        self.species.keys().copied().collect()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn find_species(&self, name: &str) -> Option<SpeciesId> {
        self.species
            .values()
            .find(|s| s.name == name)
            .map(|s| s.id)
    }

    /// name of a species, or its id when it is not in the IR
    pub fn species_name(&self, id: SpeciesId) -> String {
        match self.species.get(&id) {
            Some(species) => species.name.clone(),
            None => id.to_string(),
        }
    }

    /// Describes the first kinetic law or initial assignment that still mentions `id`.
    pub fn species_referenced_by(&self, id: SpeciesId) -> Option<String> {
        for reaction in self.reactions.values() {
            if reaction.kinetic_law().find_species(id) {
                return Some(format!("kinetic law of reaction '{}'", reaction.name));
            }
        }
        for species in self.species.values() {
            if let Some(assignment) = &species.initial_assignment {
                if assignment.find_species(id) {
                    return Some(format!("initial assignment of species '{}'", species.name));
                }
            }
        }
        None
    }

    /// Removes a species together with all of its edges. A species still mentioned by a
    /// kinetic law or an initial assignment is refused: laws must be rewritten first.
    pub fn remove_species(&mut self, id: SpeciesId) -> Reb2SacResult<Species> {
        let name = self.species(id)?.name.clone();
        if let Some(referenced_by) = self.species_referenced_by(id) {
            return Err(Reb2SacError::SpeciesStillReferenced {
                species: name,
                referenced_by,
            });
        }
        for edge in self.all_edges_of(id) {
            self.remove_edge(edge)?;
        }
        self.node_edges.remove(&IrNode::Species(id));
        self.species
            .shift_remove(&id)
            .ok_or(Reb2SacError::UnknownSpecies(id))
    }

    /////////////////////////////////REACTIONS/////////////////////////////////
    /// creates an irreversible reaction with no edges and a zero kinetic law
    pub fn create_reaction(&mut self, name: &str) -> ReactionId {
        let id = ReactionId(self.next_id());
        self.reactions.insert(id, Reaction::new(id, name));
        id
    }

    pub fn reaction(&self, id: ReactionId) -> Reb2SacResult<&Reaction> {
        self.reactions
            .get(&id)
            .ok_or(Reb2SacError::UnknownReaction(id))
    }

    pub fn reaction_mut(&mut self, id: ReactionId) -> Reb2SacResult<&mut Reaction> {
        self.reactions
            .get_mut(&id)
            .ok_or(Reb2SacError::UnknownReaction(id))
    }

    pub fn contains_reaction(&self, id: ReactionId) -> bool {
        self.reactions.contains_key(&id)
    }

    pub fn reaction_ids(&self) -> Vec<ReactionId> {
        self.reactions.keys().copied().collect()
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    pub fn find_reaction(&self, name: &str) -> Option<ReactionId> {
        self.reactions
            .values()
            .find(|r| r.name == name)
            .map(|r| r.id)
    }

    pub fn rename_reaction(&mut self, id: ReactionId, name: &str) -> Reb2SacResult<()> {
        self.reaction_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Installs `law` on the reaction and returns the replaced law.
    pub fn set_kinetic_law(&mut self, id: ReactionId, law: KineticLaw) -> Reb2SacResult<KineticLaw> {
        Ok(self.reaction_mut(id)?.set_kinetic_law(law))
    }

    /// Deep copy of a reaction: flags, kinetic law and every edge, in the same order.
    /// The clone keeps the original name; callers rename it.
    pub fn clone_reaction(&mut self, id: ReactionId) -> Reb2SacResult<ReactionId> {
        let mut copy = self.reaction(id)?.clone();
        let new_id = ReactionId(self.next_id());
        copy.id = new_id;
        copy.fire_count = 0;
        self.reactions.insert(new_id, copy);

        let originals: Vec<IrEdge> = self
            .all_edges_of(id)
            .into_iter()
            .map(|e| self.edge(e).cloned())
            .collect::<Reb2SacResult<_>>()?;
        for edge in originals {
            self.add_edge(
                edge.role,
                new_id,
                edge.species,
                edge.stoichiometry,
                edge.species_ref.clone(),
            )?;
        }
        Ok(new_id)
    }

    /// Detaches and drops every edge of the reaction, then the reaction itself.
    pub fn remove_reaction(&mut self, id: ReactionId) -> Reb2SacResult<Reaction> {
        self.reaction(id)?;
        for edge in self.all_edges_of(id) {
            self.remove_edge(edge)?;
        }
        self.node_edges.remove(&IrNode::Reaction(id));
        self.reactions
            .shift_remove(&id)
            .ok_or(Reb2SacError::UnknownReaction(id))
    }

    /////////////////////////////////EDGES/////////////////////////////////
    pub fn add_edge(
        &mut self,
        role: EdgeRole,
        reaction: ReactionId,
        species: SpeciesId,
        stoichiometry: f64,
        species_ref: Option<String>,
    ) -> Reb2SacResult<EdgeId> {
        self.reaction(reaction)?;
        self.species(species)?;
        let id = EdgeId(self.next_id());
        self.edges.insert(
            id,
            IrEdge {
                id,
                role,
                species,
                reaction,
                stoichiometry,
                species_ref,
            },
        );
        self.node_edges
            .entry(IrNode::Reaction(reaction))
            .or_default()
            .push(id);
        self.node_edges
            .entry(IrNode::Species(species))
            .or_default()
            .push(id);
        Ok(id)
    }

    pub fn add_reactant_edge(
        &mut self,
        reaction: ReactionId,
        species: SpeciesId,
        stoichiometry: f64,
    ) -> Reb2SacResult<EdgeId> {
        self.add_edge(EdgeRole::Reactant, reaction, species, stoichiometry, None)
    }

    pub fn add_product_edge(
        &mut self,
        reaction: ReactionId,
        species: SpeciesId,
        stoichiometry: f64,
    ) -> Reb2SacResult<EdgeId> {
        self.add_edge(EdgeRole::Product, reaction, species, stoichiometry, None)
    }

    pub fn add_modifier_edge(
        &mut self,
        reaction: ReactionId,
        species: SpeciesId,
        stoichiometry: f64,
    ) -> Reb2SacResult<EdgeId> {
        self.add_edge(EdgeRole::Modifier, reaction, species, stoichiometry, None)
    }

    /// Unlinks the edge from both of its endpoints and hands it back. The id is dead
    /// afterwards; any later use reports `UnknownEdge`.
    pub fn remove_edge(&mut self, id: EdgeId) -> Reb2SacResult<IrEdge> {
        let edge = self
            .edges
            .shift_remove(&id)
            .ok_or(Reb2SacError::UnknownEdge(id))?;
        for node in [IrNode::Reaction(edge.reaction), IrNode::Species(edge.species)] {
            if let Some(list) = self.node_edges.get_mut(&node) {
                list.retain(|e| *e != id);
            }
        }
        Ok(edge)
    }

    fn remove_edge_with_role(&mut self, id: EdgeId, role: EdgeRole) -> Reb2SacResult<IrEdge> {
        let actual = self.edge(id)?.role;
        if actual != role {
            return Err(Reb2SacError::failing(
                "IR",
                "remove edge",
                format!("{} is a {} edge, not a {} edge", id, actual, role),
            ));
        }
        self.remove_edge(id)
    }

    pub fn remove_reactant_edge(&mut self, id: EdgeId) -> Reb2SacResult<IrEdge> {
        self.remove_edge_with_role(id, EdgeRole::Reactant)
    }

    pub fn remove_product_edge(&mut self, id: EdgeId) -> Reb2SacResult<IrEdge> {
        self.remove_edge_with_role(id, EdgeRole::Product)
    }

    pub fn remove_modifier_edge(&mut self, id: EdgeId) -> Reb2SacResult<IrEdge> {
        self.remove_edge_with_role(id, EdgeRole::Modifier)
    }

    pub fn set_edge_role(&mut self, id: EdgeId, role: EdgeRole) -> Reb2SacResult<()> {
        self.edges
            .get_mut(&id)
            .ok_or(Reb2SacError::UnknownEdge(id))?
            .role = role;
        Ok(())
    }

    pub fn set_stoichiometry(&mut self, id: EdgeId, stoichiometry: f64) -> Reb2SacResult<()> {
        self.edges
            .get_mut(&id)
            .ok_or(Reb2SacError::UnknownEdge(id))?
            .stoichiometry = stoichiometry;
        Ok(())
    }

    pub fn edge(&self, id: EdgeId) -> Reb2SacResult<&IrEdge> {
        self.edges.get(&id).ok_or(Reb2SacError::UnknownEdge(id))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn species_in_edge(&self, id: EdgeId) -> Reb2SacResult<SpeciesId> {
        Ok(self.edge(id)?.species)
    }

    pub fn reaction_in_edge(&self, id: EdgeId) -> Reb2SacResult<ReactionId> {
        Ok(self.edge(id)?.reaction)
    }

    pub fn stoichiometry_in_edge(&self, id: EdgeId) -> Reb2SacResult<f64> {
        Ok(self.edge(id)?.stoichiometry)
    }

    /// Edges of `node` playing `role`, in insertion order. For a species this is "the
    /// reactions where the species is a reactant/product/modifier".
    pub fn edges_of(&self, node: impl Into<IrNode>, role: EdgeRole) -> Vec<EdgeId> {
        let node = node.into();
        match self.node_edges.get(&node) {
            Some(list) => list
                .iter()
                .copied()
                .filter(|e| self.edges.get(e).map(|edge| edge.role) == Some(role))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn all_edges_of(&self, node: impl Into<IrNode>) -> Vec<EdgeId> {
        self.node_edges
            .get(&node.into())
            .cloned()
            .unwrap_or_default()
    }

    pub fn reactant_edges(&self, node: impl Into<IrNode>) -> Vec<EdgeId> {
        self.edges_of(node, EdgeRole::Reactant)
    }

    pub fn product_edges(&self, node: impl Into<IrNode>) -> Vec<EdgeId> {
        self.edges_of(node, EdgeRole::Product)
    }

    pub fn modifier_edges(&self, node: impl Into<IrNode>) -> Vec<EdgeId> {
        self.edges_of(node, EdgeRole::Modifier)
    }

    /// arbitrary representative of an edge list
    pub fn head_edge(list: &[EdgeId]) -> Option<EdgeId> {
        list.first().copied()
    }

    /// first edge of `reaction` with `species` in `role`
    pub fn find_edge(
        &self,
        reaction: ReactionId,
        species: SpeciesId,
        role: EdgeRole,
    ) -> Option<EdgeId> {
        self.edges_of(reaction, role)
            .into_iter()
            .find(|e| self.edges.get(e).map(|edge| edge.species) == Some(species))
    }

    /// true if the species takes part in the reaction in any role
    pub fn is_participant(&self, reaction: ReactionId, species: SpeciesId) -> bool {
        self.all_edges_of(reaction)
            .iter()
            .any(|e| self.edges.get(e).map(|edge| edge.species) == Some(species))
    }

    /////////////////////////////////KINETIC LAWS/////////////////////////////////
    /// Parses a kinetic law, resolving identifiers to species of this IR first and to
    /// symbols otherwise.
    pub fn parse_law(&self, text: &str) -> Reb2SacResult<KineticLaw> {
        parse_kinetic_law(text, |name| self.find_species(name))
    }

    pub fn law_to_string(&self, law: &KineticLaw) -> String {
        law.format_with(&|id| self.species_name(id))
    }

    /////////////////////////////////CONSISTENCY/////////////////////////////////
    /// Checks that every edge joins live nodes and that both adjacency views list it
    /// exactly once, and that no kinetic law refers to a removed species.
    pub fn check_consistency(&self) -> Reb2SacResult<()> {
        for edge in self.edges.values() {
            if !self.species.contains_key(&edge.species) {
                return Err(Reb2SacError::Inconsistent(format!(
                    "{} refers to removed {}",
                    edge.id, edge.species
                )));
            }
            if !self.reactions.contains_key(&edge.reaction) {
                return Err(Reb2SacError::Inconsistent(format!(
                    "{} refers to removed {}",
                    edge.id, edge.reaction
                )));
            }
            for node in [IrNode::Species(edge.species), IrNode::Reaction(edge.reaction)] {
                let occurrences = self
                    .node_edges
                    .get(&node)
                    .map(|list| list.iter().filter(|e| **e == edge.id).count())
                    .unwrap_or(0);
                if occurrences != 1 {
                    return Err(Reb2SacError::Inconsistent(format!(
                        "{} is listed {} times by {:?}",
                        edge.id, occurrences, node
                    )));
                }
            }
        }
        for (node, list) in &self.node_edges {
            for e in list {
                if !self.edges.contains_key(e) {
                    return Err(Reb2SacError::Inconsistent(format!(
                        "{:?} lists removed {}",
                        node, e
                    )));
                }
            }
        }
        for reaction in self.reactions.values() {
            for species in reaction.kinetic_law().collect_species() {
                if !self.species.contains_key(&species) {
                    return Err(Reb2SacError::Inconsistent(format!(
                        "kinetic law of '{}' refers to removed {}",
                        reaction.name, species
                    )));
                }
            }
        }
        Ok(())
    }
}
