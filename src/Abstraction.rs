/// eng
/// Abstraction methods: named rewrite rules that shrink a reaction network while keeping the
/// behaviour simulators care about. Every method matches a structural motif in the IR
/// (a reaction shape, a species that is only born and killed, a fast binding equilibrium)
/// and rewrites the graph together with the kinetic laws that read the touched species.
/// The module provides:
/// 1) the common `AbstractionMethod` interface and its dispatch enum
/// 2) reaction splitting, reversible splitting/merging and structural clean-ups
/// 3) reaction combination with closed-form laws (birth-death generation, stoichiometry amplifiers)
/// 4) rapid-equilibrium and quasi-steady-state reductions
/// 5) a manager holding the registration table and running pipelines of methods
/// 6) the key/value properties the methods are configured from
/// # Examples
/// ```
/// use reb2sac::Abstraction::method_manager::AbstractionMethodManager;
/// use reb2sac::Abstraction::properties::Properties;
/// use reb2sac::IR::ir_graph::IR;
/// use reb2sac::IR::species_node::InitialQuantity;
/// let mut ir = IR::new("binding");
/// let a = ir.add_species("A", InitialQuantity::Amount(10.0));
/// let b = ir.add_species("B", InitialQuantity::Amount(0.0));
/// let r = ir.create_reaction("R");
/// ir.add_reactant_edge(r, a, 1.0).unwrap();
/// ir.add_product_edge(r, b, 1.0).unwrap();
/// ir.reaction_mut(r).unwrap().reversible = true;
/// let law = ir.parse_law("kf*A - kr*B").unwrap();
/// ir.set_kinetic_law(r, law).unwrap();
/// let manager = AbstractionMethodManager::new(&Properties::new());
/// manager
///     .apply_methods(&mut ir, &["reversible-to-irreversible-transformer"])
///     .unwrap();
/// assert_eq!(ir.reaction_count(), 2);
/// assert!(ir.find_reaction("R_backward").is_some());
/// ```
pub mod abstraction_method;
/// graph and kinetic-law helpers shared by the methods
pub mod abstraction_utils;
pub mod birth_death_generation;
pub mod degradation_stoichiometry_amplification;
/// Michaelis-Menten quasi-steady-state reduction
pub mod enzyme_kinetics;
pub mod kinetic_law_transformations;
pub mod method_manager;
pub mod properties;
/// dimerization and operator-site binding at rapid equilibrium
pub mod rapid_equilibrium;
pub mod reaction_splitting;
pub mod reversible_methods;
pub mod species_elimination;
pub mod stoichiometry_amplification;
pub mod structure_transformations;
mod abstraction_tests;
