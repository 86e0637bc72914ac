/// eng
/// Kinetic-law expression trees: the rate law attached to every reaction of the IR.
/// A tree is built from binary operators (+ - * / ^), unary operators (negation, exp, ln),
/// numeric literals, species references and named symbols (parameters, compartment sizes).
/// The module provides:
/// 1) construction through `std::ops` and explicit constructors
/// 2) structural equality, subtree search, species lookup and in-place substitution
/// 3) algebraic simplification
/// 4) a textual form with a matching parser
/// 5) numeric evaluation against the current amounts of an IR
/// 6) lowering into the symbolic engine of RustedSciThe
/// # Examples
/// ```
/// use reb2sac::KineticLaw::kinetic_law::KineticLaw;
/// use reb2sac::KineticLaw::kinetic_law_parser::parse_kinetic_law;
/// let law = parse_kinetic_law("k1*A/(Km + A)", |_| None).unwrap();
/// let expected = KineticLaw::symbol("k1") * KineticLaw::symbol("A")
///     / (KineticLaw::symbol("Km") + KineticLaw::symbol("A"));
/// assert_eq!(law, expected);
/// ```
pub mod kinetic_law;
/// numeric evaluation of laws (the interface consumed by simulators)
pub mod kinetic_law_evaluator;
/// tokenizer and recursive-descent parser for the infix text form
pub mod kinetic_law_parser;
pub mod kinetic_law_simplify;
mod kinetic_law_tests;
