//! Kinetic-law expression trees.
//!
//! A `KineticLaw` exclusively owns its children (`Box`), so a tree attached to one
//! reaction can never alias a subtree of another: sharing always goes through `clone`,
//! which is a deep copy, and dropping a tree frees exactly the nodes it owns.
use crate::IR::species_node::SpeciesId;
use crate::error::Reb2SacResult;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KineticLawOp {
    Plus,
    Minus,
    Times,
    Divide,
    Pow,
}

impl KineticLawOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            KineticLawOp::Plus => "+",
            KineticLawOp::Minus => "-",
            KineticLawOp::Times => "*",
            KineticLawOp::Divide => "/",
            KineticLawOp::Pow => "^",
        }
    }

    pub(crate) fn precedence(&self) -> u8 {
        match self {
            KineticLawOp::Plus | KineticLawOp::Minus => 1,
            KineticLawOp::Times | KineticLawOp::Divide => 2,
            KineticLawOp::Pow => 3,
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            KineticLawOp::Plus => left + right,
            KineticLawOp::Minus => left - right,
            KineticLawOp::Times => left * right,
            KineticLawOp::Divide => left / right,
            KineticLawOp::Pow => left.powf(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KineticLawUnaryOp {
    Neg,
    Exp,
    Ln,
}

impl KineticLawUnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            KineticLawUnaryOp::Neg => "-",
            KineticLawUnaryOp::Exp => "exp",
            KineticLawUnaryOp::Ln => "ln",
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match self {
            KineticLawUnaryOp::Neg => -value,
            KineticLawUnaryOp::Exp => value.exp(),
            KineticLawUnaryOp::Ln => value.ln(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum KineticLaw {
    Op {
        op: KineticLawOp,
        left: Box<KineticLaw>,
        right: Box<KineticLaw>,
    },
    Unary {
        op: KineticLawUnaryOp,
        operand: Box<KineticLaw>,
    },
    RealValue(f64),
    IntValue(i64),
    Species(SpeciesId),
    /// parameter or compartment size
    Symbol(String),
}

/// Post-order visitor over a kinetic law: children are visited before their operator.
/// Returning an error stops the traversal.
pub trait KineticLawVisitor {
    fn visit_op(&mut self, _op: KineticLawOp) -> Reb2SacResult<()> {
        Ok(())
    }
    fn visit_unary(&mut self, _op: KineticLawUnaryOp) -> Reb2SacResult<()> {
        Ok(())
    }
    fn visit_real_value(&mut self, _value: f64) -> Reb2SacResult<()> {
        Ok(())
    }
    fn visit_int_value(&mut self, _value: i64) -> Reb2SacResult<()> {
        Ok(())
    }
    fn visit_species(&mut self, _species: SpeciesId) -> Reb2SacResult<()> {
        Ok(())
    }
    fn visit_symbol(&mut self, _symbol: &str) -> Reb2SacResult<()> {
        Ok(())
    }
}

struct SpeciesFinder {
    target: SpeciesId,
    occurrences: usize,
}

impl KineticLawVisitor for SpeciesFinder {
    fn visit_species(&mut self, species: SpeciesId) -> Reb2SacResult<()> {
        if species == self.target {
            self.occurrences += 1;
        }
        Ok(())
    }
}

#[derive(Default)]
struct SpeciesCollector {
    found: Vec<SpeciesId>,
}

impl KineticLawVisitor for SpeciesCollector {
    fn visit_species(&mut self, species: SpeciesId) -> Reb2SacResult<()> {
        if !self.found.contains(&species) {
            self.found.push(species);
        }
        Ok(())
    }
}

#[derive(Default)]
struct SymbolCollector {
    found: Vec<String>,
}

impl KineticLawVisitor for SymbolCollector {
    fn visit_symbol(&mut self, symbol: &str) -> Reb2SacResult<()> {
        if !self.found.iter().any(|s| s == symbol) {
            self.found.push(symbol.to_string());
        }
        Ok(())
    }
}

impl KineticLaw {
    /////////////////////////////////CONSTRUCTION/////////////////////////////////
    /// takes ownership of both operands
    pub fn create_op(op: KineticLawOp, left: KineticLaw, right: KineticLaw) -> Self {
        KineticLaw::Op {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn create_unary(op: KineticLawUnaryOp, operand: KineticLaw) -> Self {
        KineticLaw::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn real(value: f64) -> Self {
        KineticLaw::RealValue(value)
    }

    pub fn int(value: i64) -> Self {
        KineticLaw::IntValue(value)
    }

    pub fn species(id: SpeciesId) -> Self {
        KineticLaw::Species(id)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        KineticLaw::Symbol(name.into())
    }

    pub fn pow(self, exponent: KineticLaw) -> Self {
        KineticLaw::create_op(KineticLawOp::Pow, self, exponent)
    }

    pub fn exp(self) -> Self {
        KineticLaw::create_unary(KineticLawUnaryOp::Exp, self)
    }

    pub fn ln(self) -> Self {
        KineticLaw::create_unary(KineticLawUnaryOp::Ln, self)
    }

    /////////////////////////////////INSPECTION/////////////////////////////////
    pub fn op(&self) -> Option<KineticLawOp> {
        match self {
            KineticLaw::Op { op, .. } => Some(*op),
            _ => None,
        }
    }

    pub fn is_op(&self, op: KineticLawOp) -> bool {
        self.op() == Some(op)
    }

    pub fn left(&self) -> Option<&KineticLaw> {
        match self {
            KineticLaw::Op { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&KineticLaw> {
        match self {
            KineticLaw::Op { right, .. } => Some(right),
            _ => None,
        }
    }

    /// Splits an operator node into its operator and owned operands.
    pub fn into_op_parts(self) -> Option<(KineticLawOp, KineticLaw, KineticLaw)> {
        match self {
            KineticLaw::Op { op, left, right } => Some((op, *left, *right)),
            _ => None,
        }
    }

    /// numeric value of a literal leaf
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            KineticLaw::RealValue(v) => Some(*v),
            KineticLaw::IntValue(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.constant_value() == Some(0.0)
    }

    pub fn is_one(&self) -> bool {
        self.constant_value() == Some(1.0)
    }

    /// Structural, not semantic, equality: same shape, same operators, same leaves.
    /// Real leaves compare bitwise so that NaN equals itself.
    pub fn structurally_equal(&self, other: &KineticLaw) -> bool {
        match (self, other) {
            (
                KineticLaw::Op { op, left, right },
                KineticLaw::Op {
                    op: other_op,
                    left: other_left,
                    right: other_right,
                },
            ) => {
                op == other_op
                    && left.structurally_equal(other_left)
                    && right.structurally_equal(other_right)
            }
            (
                KineticLaw::Unary { op, operand },
                KineticLaw::Unary {
                    op: other_op,
                    operand: other_operand,
                },
            ) => op == other_op && operand.structurally_equal(other_operand),
            (KineticLaw::RealValue(a), KineticLaw::RealValue(b)) => a.to_bits() == b.to_bits(),
            (KineticLaw::IntValue(a), KineticLaw::IntValue(b)) => a == b,
            (KineticLaw::Species(a), KineticLaw::Species(b)) => a == b,
            (KineticLaw::Symbol(a), KineticLaw::Symbol(b)) => a == b,
            _ => false,
        }
    }

    /// true if `subtree` occurs (structurally) anywhere in this law, the root included
    pub fn contains_subtree(&self, subtree: &KineticLaw) -> bool {
        if self.structurally_equal(subtree) {
            return true;
        }
        match self {
            KineticLaw::Op { left, right, .. } => {
                left.contains_subtree(subtree) || right.contains_subtree(subtree)
            }
            KineticLaw::Unary { operand, .. } => operand.contains_subtree(subtree),
            _ => false,
        }
    }

    /////////////////////////////////TRAVERSAL/////////////////////////////////
    pub fn accept_post_order(&self, visitor: &mut dyn KineticLawVisitor) -> Reb2SacResult<()> {
        match self {
            KineticLaw::Op { op, left, right } => {
                left.accept_post_order(visitor)?;
                right.accept_post_order(visitor)?;
                visitor.visit_op(*op)
            }
            KineticLaw::Unary { op, operand } => {
                operand.accept_post_order(visitor)?;
                visitor.visit_unary(*op)
            }
            KineticLaw::RealValue(v) => visitor.visit_real_value(*v),
            KineticLaw::IntValue(v) => visitor.visit_int_value(*v),
            KineticLaw::Species(s) => visitor.visit_species(*s),
            KineticLaw::Symbol(name) => visitor.visit_symbol(name),
        }
    }

    pub fn count_species_occurrences(&self, species: SpeciesId) -> usize {
        let mut finder = SpeciesFinder {
            target: species,
            occurrences: 0,
        };
        // the finder never fails
        let _ = self.accept_post_order(&mut finder);
        finder.occurrences
    }

    /// does the law read the amount of `species` anywhere in its tree?
    pub fn find_species(&self, species: SpeciesId) -> bool {
        self.count_species_occurrences(species) > 0
    }

    /// distinct species leaves in order of first (post-order) appearance
    pub fn collect_species(&self) -> Vec<SpeciesId> {
        let mut collector = SpeciesCollector::default();
        let _ = self.accept_post_order(&mut collector);
        collector.found
    }

    pub fn collect_symbols(&self) -> Vec<String> {
        let mut collector = SymbolCollector::default();
        let _ = self.accept_post_order(&mut collector);
        collector.found
    }

    /////////////////////////////////SUBSTITUTION/////////////////////////////////
    /// Replaces, in place, every leaf referring to `species` with a fresh clone of
    /// `replacement`. Inserted subtrees are not scanned again, so the replacement may
    /// itself mention `species`. Returns the number of replaced leaves.
    pub fn replace_species_with_kinetic_law(
        &mut self,
        species: SpeciesId,
        replacement: &KineticLaw,
    ) -> usize {
        match self {
            KineticLaw::Species(s) if *s == species => {
                *self = replacement.clone();
                1
            }
            KineticLaw::Op { left, right, .. } => {
                left.replace_species_with_kinetic_law(species, replacement)
                    + right.replace_species_with_kinetic_law(species, replacement)
            }
            KineticLaw::Unary { operand, .. } => {
                operand.replace_species_with_kinetic_law(species, replacement)
            }
            _ => 0,
        }
    }

    pub fn replace_symbol_with_kinetic_law(&mut self, symbol: &str, replacement: &KineticLaw) -> usize {
        match self {
            KineticLaw::Symbol(name) if name == symbol => {
                *self = replacement.clone();
                1
            }
            KineticLaw::Op { left, right, .. } => {
                left.replace_symbol_with_kinetic_law(symbol, replacement)
                    + right.replace_symbol_with_kinetic_law(symbol, replacement)
            }
            KineticLaw::Unary { operand, .. } => {
                operand.replace_symbol_with_kinetic_law(symbol, replacement)
            }
            _ => 0,
        }
    }

    /////////////////////////////////OUTPUT/////////////////////////////////
    /// Infix text of the law with species printed through `name_of`. The text parses
    /// back into a structurally equal law.
    pub fn format_with(&self, name_of: &dyn Fn(SpeciesId) -> String) -> String {
        match self {
            KineticLaw::Op { op, left, right } => {
                let left_text = left.format_with(name_of);
                let right_text = right.format_with(name_of);
                let left_text = if needs_parentheses(left, *op, false) {
                    format!("({})", left_text)
                } else {
                    left_text
                };
                let right_text = if needs_parentheses(right, *op, true) {
                    format!("({})", right_text)
                } else {
                    right_text
                };
                match op {
                    KineticLawOp::Plus | KineticLawOp::Minus => {
                        format!("{} {} {}", left_text, op.symbol(), right_text)
                    }
                    _ => format!("{}{}{}", left_text, op.symbol(), right_text),
                }
            }
            KineticLaw::Unary { op, operand } => match op {
                KineticLawUnaryOp::Neg => match operand.as_ref() {
                    KineticLaw::Species(_) | KineticLaw::Symbol(_) => {
                        format!("-{}", operand.format_with(name_of))
                    }
                    _ => format!("-({})", operand.format_with(name_of)),
                },
                _ => format!("{}({})", op.name(), operand.format_with(name_of)),
            },
            KineticLaw::RealValue(v) => format!("{:?}", v),
            KineticLaw::IntValue(v) => format!("{}", v),
            KineticLaw::Species(s) => name_of(*s),
            KineticLaw::Symbol(name) => name.clone(),
        }
    }

    /// Lowers the law into the symbolic engine used by the ODE solvers. Species and
    /// symbols both become variables.
    pub fn to_symbolic(&self, name_of: &dyn Fn(SpeciesId) -> String) -> Expr {
        match self {
            KineticLaw::Op { op, left, right } => {
                let l = Box::new(left.to_symbolic(name_of));
                let r = Box::new(right.to_symbolic(name_of));
                match op {
                    KineticLawOp::Plus => Expr::Add(l, r),
                    KineticLawOp::Minus => Expr::Sub(l, r),
                    KineticLawOp::Times => Expr::Mul(l, r),
                    KineticLawOp::Divide => Expr::Div(l, r),
                    KineticLawOp::Pow => Expr::Pow(l, r),
                }
            }
            KineticLaw::Unary { op, operand } => {
                let x = Box::new(operand.to_symbolic(name_of));
                match op {
                    KineticLawUnaryOp::Neg => Expr::Mul(Box::new(Expr::Const(-1.0)), x),
                    KineticLawUnaryOp::Exp => Expr::Exp(x),
                    KineticLawUnaryOp::Ln => Expr::Ln(x),
                }
            }
            KineticLaw::RealValue(v) => Expr::Const(*v),
            KineticLaw::IntValue(v) => Expr::Const(*v as f64),
            KineticLaw::Species(s) => Expr::Var(name_of(*s)),
            KineticLaw::Symbol(name) => Expr::Var(name.clone()),
        }
    }
}

fn needs_parentheses(child: &KineticLaw, parent: KineticLawOp, is_right: bool) -> bool {
    match child {
        KineticLaw::Op { op, .. } => {
            let (child_prec, parent_prec) = (op.precedence(), parent.precedence());
            if child_prec != parent_prec {
                return child_prec < parent_prec;
            }
            // a^b^c is read as a^(b^c), everything else associates to the left
            match parent {
                KineticLawOp::Pow => !is_right,
                _ => is_right,
            }
        }
        KineticLaw::Unary {
            op: KineticLawUnaryOp::Neg,
            ..
        } => true,
        KineticLaw::RealValue(v) => *v < 0.0 || v.is_sign_negative(),
        KineticLaw::IntValue(v) => *v < 0,
        _ => false,
    }
}

/// `AreKineticLawsStructurallyEqual`
pub fn are_kinetic_laws_structurally_equal(a: &KineticLaw, b: &KineticLaw) -> bool {
    a.structurally_equal(b)
}

impl PartialEq for KineticLaw {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(other)
    }
}

impl fmt::Display for KineticLaw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_with(&|id| id.to_string()))
    }
}

impl Add for KineticLaw {
    type Output = KineticLaw;
    fn add(self, rhs: KineticLaw) -> KineticLaw {
        KineticLaw::create_op(KineticLawOp::Plus, self, rhs)
    }
}

impl Sub for KineticLaw {
    type Output = KineticLaw;
    fn sub(self, rhs: KineticLaw) -> KineticLaw {
        KineticLaw::create_op(KineticLawOp::Minus, self, rhs)
    }
}

impl Mul for KineticLaw {
    type Output = KineticLaw;
    fn mul(self, rhs: KineticLaw) -> KineticLaw {
        KineticLaw::create_op(KineticLawOp::Times, self, rhs)
    }
}

impl Div for KineticLaw {
    type Output = KineticLaw;
    fn div(self, rhs: KineticLaw) -> KineticLaw {
        KineticLaw::create_op(KineticLawOp::Divide, self, rhs)
    }
}

impl Neg for KineticLaw {
    type Output = KineticLaw;
    fn neg(self) -> KineticLaw {
        KineticLaw::create_unary(KineticLawUnaryOp::Neg, self)
    }
}
