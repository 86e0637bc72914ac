/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Abstraction::abstraction_method::AbstractionMethod;
    use crate::Abstraction::method_manager::{AbstractionMethodManager, DEFAULT_ABSTRACTION_PIPELINE};
    use crate::Abstraction::properties::{
        ABSTRACTION_METHOD_KEY, DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY, MAX_ABSTRACTION_PASSES_KEY,
        Properties,
    };
    use crate::IR::ir_edge::EdgeRole;
    use crate::IR::ir_graph::IR;
    use crate::IR::species_node::InitialQuantity;
    use crate::KineticLaw::kinetic_law::KineticLawOp;
    use crate::KineticLaw::kinetic_law_evaluator::KineticLawEvaluator;
    use crate::error::Reb2SacError;
    use approx::assert_relative_eq;

    fn michaelis_menten() -> IR {
        let mut ir = IR::new("mm");
        ir.set_parameter("kf", 1.0);
        ir.set_parameter("kr", 2.0);
        ir.set_parameter("kcat", 3.0);
        let e = ir.add_species("E", InitialQuantity::Amount(4.0));
        let s = ir.add_species("S", InitialQuantity::Amount(5.0));
        let c = ir.add_species("C", InitialQuantity::Amount(1.0));
        let p = ir.add_species("P", InitialQuantity::Amount(0.0));
        let bind = ir.create_reaction("bind");
        ir.add_reactant_edge(bind, e, 1.0).unwrap();
        ir.add_reactant_edge(bind, s, 1.0).unwrap();
        ir.add_product_edge(bind, c, 1.0).unwrap();
        ir.reaction_mut(bind).unwrap().reversible = true;
        let law = ir.parse_law("kf*E*S - kr*C").unwrap();
        ir.set_kinetic_law(bind, law).unwrap();
        let cat = ir.create_reaction("cat");
        ir.add_reactant_edge(cat, c, 1.0).unwrap();
        ir.add_product_edge(cat, e, 1.0).unwrap();
        ir.add_product_edge(cat, p, 1.0).unwrap();
        let law = ir.parse_law("kcat*C").unwrap();
        ir.set_kinetic_law(cat, law).unwrap();
        ir
    }

    fn volume_model() -> IR {
        let mut ir = IR::new("volume");
        let a = ir.add_species("A", InitialQuantity::Amount(1.0));
        let b = ir.add_species("B", InitialQuantity::Amount(1.0));
        let r = ir.create_reaction("R");
        ir.add_reactant_edge(r, a, 1.0).unwrap();
        ir.add_product_edge(r, b, 1.0).unwrap();
        ir.reaction_mut(r).unwrap().reversible = true;
        let law = ir.parse_law("1*V*(kf*A - kr*B)").unwrap();
        ir.set_kinetic_law(r, law).unwrap();
        ir
    }

    #[test]
    fn registry_is_complete_and_ordered() {
        let manager = AbstractionMethodManager::new(&Properties::new());
        let ids = manager.method_ids();
        assert_eq!(ids.len(), 36);
        assert_eq!(ids.first(), Some(&"dimerization-reduction-level-assignment"));
        assert_eq!(ids[1], "pow-kinetic-law-transformer");
        assert_eq!(ids.last(), Some(&"dummy-abstraction-method"));
        for id in &ids {
            assert_eq!(manager.lookup_method(id).unwrap().id(), *id);
        }
        for id in DEFAULT_ABSTRACTION_PIPELINE {
            assert!(ids.contains(&id));
        }
        assert!(ids.contains(&"degradation-stoichiometry-amplifier-8"));
        assert!(ids.contains(&"birth-death-generator-7"));
    }

    #[test]
    fn unknown_method_applies_nothing() {
        let manager = AbstractionMethodManager::new(&Properties::new());
        let mut ir = volume_model();
        let before = ir.to_description().unwrap();
        let result = manager.apply_methods(&mut ir, &["distribute-transformer", "no-such-method"]);
        assert!(matches!(result, Err(Reb2SacError::UnknownMethod(id)) if id == "no-such-method"));
        assert_eq!(ir.to_description().unwrap(), before);
    }

    #[test]
    fn failing_method_leaves_ir_untouched() {
        let mut ir = IR::new("failing");
        let a = ir.add_species("A", InitialQuantity::Concentration(2.0));
        ir.species_mut(a).unwrap().compartment = Some("cell".to_string());
        for (name, law) in [("d1", "k1*A"), ("d2", "k2*A")] {
            let r = ir.create_reaction(name);
            ir.add_reactant_edge(r, a, 1.0).unwrap();
            let law = ir.parse_law(law).unwrap();
            ir.set_kinetic_law(r, law).unwrap();
        }
        let before = ir.to_description().unwrap();
        let mut properties = Properties::new();
        properties.set(DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY, 2);
        let manager = AbstractionMethodManager::new(&properties);
        // the undeclared compartment makes the initial-amount adjustment fail after the
        // deaths were already combined on the staged copy
        let result = manager.apply_method(&mut ir, "degradation-stoichiometry-amplifier-8");
        assert!(matches!(result, Err(Reb2SacError::Failing { .. })));
        assert_eq!(ir.to_description().unwrap(), before);
        assert_eq!(ir.reaction_count(), 2);
    }

    #[test]
    fn degradation_amplifier_through_the_manager() {
        let mut ir = IR::new("decay");
        let a = ir.add_species("A", InitialQuantity::Amount(30.0));
        let r = ir.create_reaction("decay");
        ir.add_reactant_edge(r, a, 3.0).unwrap();
        let law = ir.parse_law("k*A").unwrap();
        ir.set_kinetic_law(r, law).unwrap();
        let mut properties = Properties::new();
        properties.set(DEGRADATION_STOICHIOMETRY_AMPLIFIER_KEY, 4);
        AbstractionMethodManager::new(&properties)
            .apply_method(&mut ir, "degradation-stoichiometry-amplifier-3")
            .unwrap();
        let edge = ir.find_edge(r, a, EdgeRole::Reactant).unwrap();
        assert_relative_eq!(ir.stoichiometry_in_edge(edge).unwrap(), 12.0);
        assert_eq!(ir.law_to_string(ir.reaction(r).unwrap().kinetic_law()), "k*(A - 6.0)/4");
    }

    #[test]
    fn default_pipeline_reduces_enzyme_motif() {
        let manager = AbstractionMethodManager::new(&Properties::new());
        assert_eq!(manager.configured_pipeline(), DEFAULT_ABSTRACTION_PIPELINE.to_vec());
        let mut ir = michaelis_menten();
        manager.apply_configured(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 1);
        let evaluator = KineticLawEvaluator::new(&ir);
        for reaction in ir.reaction_ids() {
            let law = ir.reaction(reaction).unwrap().kinetic_law();
            assert!(evaluator.evaluate_with_current_amounts(law).unwrap().is_finite());
        }
    }

    #[test]
    fn configured_pipeline_is_read_from_properties() {
        let mut properties = Properties::new();
        properties.set(
            ABSTRACTION_METHOD_KEY,
            "distribute-transformer, reversible-to-irreversible-transformer",
        );
        let manager = AbstractionMethodManager::new(&properties);
        assert_eq!(
            manager.configured_pipeline(),
            vec!["distribute-transformer", "reversible-to-irreversible-transformer"]
        );
        let mut ir = volume_model();
        manager.apply_configured(&mut ir).unwrap();
        assert_eq!(ir.reaction_count(), 2);
        assert!(ir.find_reaction("R_forward").is_some());
        ir.check_consistency().unwrap();
    }

    #[test]
    fn fixed_point_is_detected() {
        let manager = AbstractionMethodManager::new(&Properties::new());
        let mut ir = volume_model();
        let passes = manager
            .apply_until_fixed_point(
                &mut ir,
                &["distribute-transformer", "kinetic-law-constants-simplifier"],
            )
            .unwrap();
        assert_eq!(passes, 2);
        let r = ir.find_reaction("R").unwrap();
        assert!(ir.reaction(r).unwrap().kinetic_law().is_op(KineticLawOp::Minus));
    }

    #[test]
    fn fixed_point_search_is_bounded() {
        let mut properties = Properties::new();
        properties.set(MAX_ABSTRACTION_PASSES_KEY, 1);
        let manager = AbstractionMethodManager::new(&properties);
        let mut ir = volume_model();
        let passes = manager
            .apply_until_fixed_point(&mut ir, &["distribute-transformer"])
            .unwrap();
        assert_eq!(passes, 1);
    }

    #[test]
    fn amplifiers_are_refused_for_fixed_point() {
        let manager = AbstractionMethodManager::new(&Properties::new());
        let mut ir = volume_model();
        let before = ir.to_description().unwrap();
        let result = manager.apply_until_fixed_point(&mut ir, &["stoichiometry-amplifier"]);
        assert!(matches!(result, Err(Reb2SacError::Failing { .. })));
        assert_eq!(ir.to_description().unwrap(), before);
    }
}
