use crate::Abstraction::method_manager::AbstractionMethodManager;
use crate::Abstraction::properties::{
    ABSTRACTION_METHOD_KEY, DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY,
    MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX, Properties,
};
use crate::IR::ir_graph::IR;
use crate::IR::species_node::InitialQuantity;
use crate::error::Reb2SacResult;
use log::error;

fn enzyme_model() -> Reb2SacResult<IR> {
    let mut ir = IR::new("michaelis-menten");
    ir.set_parameter("kf", 1.0);
    ir.set_parameter("kr", 2.0);
    ir.set_parameter("kcat", 3.0);
    let e = ir.add_species("E", InitialQuantity::Amount(4.0));
    let s = ir.add_species("S", InitialQuantity::Amount(50.0));
    let c = ir.add_species("C", InitialQuantity::Amount(1.0));
    let p = ir.add_species("P", InitialQuantity::Amount(0.0));
    let bind = ir.create_reaction("bind");
    ir.add_reactant_edge(bind, e, 1.0)?;
    ir.add_reactant_edge(bind, s, 1.0)?;
    ir.add_product_edge(bind, c, 1.0)?;
    ir.reaction_mut(bind)?.reversible = true;
    let law = ir.parse_law("kf*E*S - kr*C")?;
    ir.set_kinetic_law(bind, law)?;
    let cat = ir.create_reaction("cat");
    ir.add_reactant_edge(cat, c, 1.0)?;
    ir.add_product_edge(cat, e, 1.0)?;
    ir.add_product_edge(cat, p, 1.0)?;
    let law = ir.parse_law("kcat*C")?;
    ir.set_kinetic_law(cat, law)?;
    Ok(ir)
}

fn birth_death_model() -> Reb2SacResult<IR> {
    let mut ir = IR::new("birth-death");
    ir.set_parameter("k1", 1.0);
    ir.set_parameter("k2", 0.5);
    ir.set_parameter("k3", 0.1);
    let e = ir.add_species("E", InitialQuantity::Amount(2.0));
    let s = ir.add_species("S", InitialQuantity::Amount(20.0));
    let basal = ir.create_reaction("basal");
    ir.add_product_edge(basal, s, 1.0)?;
    let law = ir.parse_law("k1")?;
    ir.set_kinetic_law(basal, law)?;
    let induced = ir.create_reaction("induced");
    ir.add_modifier_edge(induced, e, 1.0)?;
    ir.add_product_edge(induced, s, 1.0)?;
    let law = ir.parse_law("k2*E")?;
    ir.set_kinetic_law(induced, law)?;
    let decay = ir.create_reaction("decay");
    ir.add_reactant_edge(decay, s, 1.0)?;
    let law = ir.parse_law("k3*S")?;
    ir.set_kinetic_law(decay, law)?;
    Ok(ir)
}

fn run(task: usize) -> Reb2SacResult<()> {
    match task {
        0 => {
            // default pipeline reduces the enzyme motif to Michaelis-Menten kinetics
            let mut ir = enzyme_model()?;
            ir.pretty_print()?;
            let manager = AbstractionMethodManager::new(&Properties::new());
            manager.apply_configured(&mut ir)?;
            ir.pretty_print()?;
        }
        1 => {
            // birth-death generation with an oscillation amount of 3
            let mut ir = birth_death_model()?;
            ir.pretty_print()?;
            let mut properties = Properties::new();
            properties.set(&format!("{}S", MAX_SPECIES_OSCILLATION_AMOUNT_KEY_PREFIX), 3);
            properties.set(ABSTRACTION_METHOD_KEY, "birth-death-generator");
            AbstractionMethodManager::new(&properties).apply_configured(&mut ir)?;
            ir.pretty_print()?;
            println!("stoichiometry matrix {}", ir.stoichiometry_matrix()?);
        }
        2 => {
            // degradation amplification, model stored and reloaded as JSON
            let mut ir = birth_death_model()?;
            let mut properties = Properties::new();
            properties.set(DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY, 4);
            let manager = AbstractionMethodManager::new(&properties);
            manager.apply_methods(&mut ir, &["degradation-stoichiometry-amplifier-6"])?;
            let path = std::env::temp_dir().join("reb2sac_amplified.json");
            let path = path.to_string_lossy();
            ir.save_to_json_file(&path)?;
            let reloaded = IR::load_from_json_file(&path)?;
            reloaded.pretty_print()?;
        }
        3 => {
            // pipeline repeated until nothing changes
            let mut ir = enzyme_model()?;
            let manager = AbstractionMethodManager::new(&Properties::new());
            let passes = manager.apply_until_fixed_point(
                &mut ir,
                &[
                    "modifier-structure-transformer",
                    "distribute-transformer",
                    "reversible-to-irreversible-transformer",
                    "kinetic-law-constants-simplifier",
                ],
            )?;
            println!("fixed point after {} passes", passes);
            ir.pretty_print()?;
        }
        _ => {
            println!("no example with number {}", task);
            println!(
                "available methods: {:?}",
                AbstractionMethodManager::new(&Properties::new()).method_ids()
            );
        }
    }
    Ok(())
}

pub fn abstraction_examples(task: usize) {
    if let Err(e) = run(task) {
        error!("example {} failed: {}", task, e);
    }
}
