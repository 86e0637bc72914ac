/// eng
/// Intermediate representation of a reaction network: species and reactions are the nodes of
/// a bipartite graph, edges carry a role (reactant, product, modifier) and a stoichiometry.
/// The graph owns everything; kinetic laws and edges refer to species and reactions by id.
/// The module provides:
/// 1) role-qualified adjacency queries for species and reactions
/// 2) mutators that keep both adjacency views in agreement (add/remove edge, clone/remove reaction, remove species)
/// 3) a consistency check
/// 4) a JSON model description to build and persist networks
/// 5) a stoichiometry matrix and a table printout
/// # Examples
/// ```
/// use reb2sac::IR::ir_graph::IR;
/// use reb2sac::IR::species_node::InitialQuantity;
/// let mut ir = IR::new("decay");
/// let a = ir.add_species("A", InitialQuantity::Amount(100.0));
/// let r = ir.create_reaction("decay");
/// ir.add_reactant_edge(r, a, 1.0).unwrap();
/// let law = ir.parse_law("k*A").unwrap();
/// ir.set_kinetic_law(r, law).unwrap();
/// assert_eq!(ir.reaction_equation(r).unwrap(), "A -> ∅");
/// assert!(ir.check_consistency().is_ok());
/// ```
pub mod ir_graph;
pub mod ir_edge;
pub mod species_node;
pub mod reaction_node;
/// JSON description of a model
pub mod model_description;
pub mod ir_report;
