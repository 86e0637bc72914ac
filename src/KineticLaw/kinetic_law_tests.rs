/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::IR::ir_graph::IR;
    use crate::IR::species_node::InitialQuantity;
    use crate::KineticLaw::kinetic_law::{
        KineticLaw, KineticLawOp, KineticLawVisitor, are_kinetic_laws_structurally_equal,
    };
    use crate::KineticLaw::kinetic_law_evaluator::KineticLawEvaluator;
    use crate::KineticLaw::kinetic_law_parser::parse_kinetic_law;
    use crate::error::{Reb2SacError, Reb2SacResult};
    use RustedSciThe::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;

    fn model() -> (IR, KineticLaw) {
        let mut ir = IR::new("test");
        let a = ir.add_species("A", InitialQuantity::Amount(10.0));
        let b = ir.add_species("B", InitialQuantity::Amount(4.0));
        ir.set_parameter("k", 0.5);
        // k*A*B/(1 + A)
        let law = KineticLaw::symbol("k") * KineticLaw::species(a) * KineticLaw::species(b)
            / (KineticLaw::int(1) + KineticLaw::species(a));
        (ir, law)
    }

    #[test]
    fn clone_is_structurally_equal_and_disjoint() {
        let (ir, law) = model();
        let mut copy = law.clone();
        assert!(are_kinetic_laws_structurally_equal(&law, &copy));
        // mutating the clone must leave the original untouched
        let a = ir.find_species("A").unwrap();
        copy.replace_species_with_kinetic_law(a, &KineticLaw::real(2.0));
        assert!(!law.structurally_equal(&copy));
        assert!(law.find_species(a));
        assert!(!copy.find_species(a));
    }

    #[test]
    fn clone_of_clone_equals_clone() {
        let (_, law) = model();
        let once = law.clone();
        let twice = once.clone();
        assert_eq!(once, twice);
    }

    #[test]
    fn structural_equality_is_reflexive_and_symmetric() {
        let (_, law) = model();
        assert!(law.structurally_equal(&law));
        let nan = KineticLaw::real(f64::NAN) + KineticLaw::symbol("x");
        assert!(nan.structurally_equal(&nan));

        let other = KineticLaw::symbol("k") * KineticLaw::symbol("x");
        assert_eq!(law.structurally_equal(&other), other.structurally_equal(&law));
        // literal kinds are part of the structure
        assert_ne!(KineticLaw::int(1), KineticLaw::real(1.0));
    }

    #[test]
    fn find_species_in_nested_trees() {
        let mut ir = IR::new("nested");
        let a = ir.add_species("A", InitialQuantity::Amount(1.0));
        let b = ir.add_species("B", InitialQuantity::Amount(1.0));
        let c = ir.add_species("C", InitialQuantity::Amount(1.0));
        let mut law = KineticLaw::species(a);
        for i in 0..50 {
            law = (law + KineticLaw::int(i)).exp() * KineticLaw::symbol("k");
        }
        law = -(law / KineticLaw::species(b).pow(KineticLaw::int(2)));
        assert!(law.find_species(a));
        assert!(law.find_species(b));
        assert!(!law.find_species(c));
        assert_eq!(law.count_species_occurrences(a), 1);
        assert_eq!(law.collect_species(), vec![a, b]);
    }

    #[test]
    fn substitution_does_not_rescan_replacement() {
        let (ir, mut law) = model();
        let a = ir.find_species("A").unwrap();
        let shifted = KineticLaw::species(a) - KineticLaw::real(6.0);
        let replaced = law.replace_species_with_kinetic_law(a, &shifted);
        assert_eq!(replaced, 2);
        assert_eq!(law.count_species_occurrences(a), 2);
        assert!(law.contains_subtree(&shifted));
    }

    #[test]
    fn symbol_substitution() {
        let mut law = KineticLaw::symbol("V") * KineticLaw::symbol("k");
        let n = law.replace_symbol_with_kinetic_law("V", &KineticLaw::real(2.0));
        assert_eq!(n, 1);
        assert_eq!(law, KineticLaw::real(2.0) * KineticLaw::symbol("k"));
        assert_eq!(law.collect_symbols(), vec!["k".to_string()]);
    }

    struct OpCounter {
        ops: Vec<KineticLawOp>,
    }

    impl KineticLawVisitor for OpCounter {
        fn visit_op(&mut self, op: KineticLawOp) -> Reb2SacResult<()> {
            self.ops.push(op);
            Ok(())
        }
    }

    #[test]
    fn visitor_runs_in_post_order() {
        let law = (KineticLaw::symbol("a") + KineticLaw::symbol("b")) * KineticLaw::symbol("c");
        let mut counter = OpCounter { ops: Vec::new() };
        law.accept_post_order(&mut counter).unwrap();
        assert_eq!(counter.ops, vec![KineticLawOp::Plus, KineticLawOp::Times]);
    }

    #[test]
    fn parses_precedence_and_functions() {
        let law = parse_kinetic_law("a + b*c^2^d - exp(-x)/ln(y)", |_| None).unwrap();
        let expected = KineticLaw::symbol("a")
            + KineticLaw::symbol("b")
                * KineticLaw::symbol("c")
                    .pow(KineticLaw::int(2).pow(KineticLaw::symbol("d")))
            - (-KineticLaw::symbol("x")).exp() / KineticLaw::symbol("y").ln();
        assert_eq!(law, expected);

        let law = parse_kinetic_law("2 ** 3 * 1.5e-3", |_| None).unwrap();
        assert_eq!(
            law,
            KineticLaw::int(2).pow(KineticLaw::int(3)) * KineticLaw::real(1.5e-3)
        );
    }

    #[test]
    fn parse_errors_report_position() {
        match parse_kinetic_law("k * (A + ", |_| None) {
            Err(Reb2SacError::Parse { position, .. }) => assert_eq!(position, 9),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(parse_kinetic_law("k $ A", |_| None).is_err());
        assert!(parse_kinetic_law("", |_| None).is_err());
        assert!(parse_kinetic_law("sin(x)", |_| None).is_err());
        assert!(parse_kinetic_law("a b", |_| None).is_err());
    }

    #[test]
    fn text_round_trip() {
        let (ir, _) = model();
        let texts = [
            "k*A*B/(1 + A)",
            "a - (b - c)",
            "a/(b*c)",
            "(a^b)^c",
            "a^b^c",
            "-(A + B)*k",
            "k*(A - 6.0)",
            "2*(-3) + A*(-1.5)",
            "exp(k*A) - ln(B)",
        ];
        for text in texts {
            let law = ir.parse_law(text).unwrap();
            let printed = ir.law_to_string(&law);
            let reparsed = ir.parse_law(&printed).unwrap();
            assert_eq!(law, reparsed, "{} printed as {}", text, printed);
        }
        let law = ir.parse_law("k*(A - 6.0)").unwrap();
        assert_eq!(ir.law_to_string(&law), "k*(A - 6.0)");
    }

    #[test]
    fn evaluates_amounts_and_concentrations() {
        let mut ir = IR::new("eval");
        ir.add_compartment("cell", 2.0);
        let a = ir.add_species("A", InitialQuantity::Concentration(3.0));
        ir.species_mut(a).unwrap().compartment = Some("cell".to_string());
        let b = ir.add_species("B", InitialQuantity::Amount(4.0));
        ir.set_parameter("k", 0.5);
        let law = ir.parse_law("k*A*B/cell").unwrap();

        let mut evaluator = KineticLawEvaluator::new(&ir);
        // amount of A = 3.0 * 2.0
        assert_relative_eq!(evaluator.amount(a).unwrap(), 6.0);
        assert_relative_eq!(
            evaluator.evaluate_with_current_amounts(&law).unwrap(),
            0.5 * 6.0 * 4.0 / 2.0
        );
        assert_relative_eq!(
            evaluator.evaluate_with_current_concentrations(&law).unwrap(),
            0.5 * 3.0 * 4.0 / 2.0
        );
        evaluator.set_amount(b, 1.0);
        assert_relative_eq!(evaluator.evaluate_with_current_amounts(&law).unwrap(), 1.5);

        let unknown = KineticLaw::symbol("nope");
        assert!(matches!(
            evaluator.evaluate_with_current_amounts(&unknown),
            Err(Reb2SacError::Evaluation(_))
        ));
    }

    #[test]
    fn lowers_into_symbolic_expression() {
        let (ir, law) = model();
        let expr = law.to_symbolic(&|id| ir.species_name(id));
        let expected = Expr::Div(
            Box::new(Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Var("k".to_string())),
                    Box::new(Expr::Var("A".to_string())),
                )),
                Box::new(Expr::Var("B".to_string())),
            )),
            Box::new(Expr::Add(
                Box::new(Expr::Const(1.0)),
                Box::new(Expr::Var("A".to_string())),
            )),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn integer_folding_never_overflows() {
        let law = parse_kinetic_law("(-9223372036854775807 - 1)/(-1)", |_| None).unwrap();
        let folded = law.simplify();
        assert!(matches!(folded, KineticLaw::RealValue(_)));
        assert_relative_eq!(folded.constant_value().unwrap(), 9.223372036854776e18);
        let exact = parse_kinetic_law("12/4", |_| None).unwrap().simplify();
        assert_eq!(exact, KineticLaw::int(3));
        let inexact = parse_kinetic_law("7/2", |_| None).unwrap().simplify();
        assert_eq!(inexact, KineticLaw::real(3.5));
    }
}
