//! Constant folding and algebraic identities for kinetic laws.
//!
//! Only rewrites that keep the value of the law for every species amount are applied:
//! `x + 0`, `x - 0`, `x * 1`, `x / 1`, `x ^ 1`, `x ^ 0`, `0 * x`, double negation and
//! folding of operators whose operands are both literals.
use crate::KineticLaw::kinetic_law::{KineticLaw, KineticLawOp, KineticLawUnaryOp};

impl KineticLaw {
    pub fn simplify(&self) -> KineticLaw {
        match self {
            KineticLaw::Op { op, left, right } => simplify_op(*op, left.simplify(), right.simplify()),
            KineticLaw::Unary { op, operand } => simplify_unary(*op, operand.simplify()),
            _ => self.clone(),
        }
    }
}

fn fold_constants(op: KineticLawOp, left: &KineticLaw, right: &KineticLaw) -> Option<KineticLaw> {
    if let (KineticLaw::IntValue(a), KineticLaw::IntValue(b)) = (left, right) {
        let folded = match op {
            KineticLawOp::Plus => a.checked_add(*b),
            KineticLawOp::Minus => a.checked_sub(*b),
            KineticLawOp::Times => a.checked_mul(*b),
            KineticLawOp::Divide => match a.checked_rem(*b) {
                Some(0) => a.checked_div(*b),
                _ => None,
            },
            KineticLawOp::Pow => u32::try_from(*b).ok().and_then(|e| a.checked_pow(e)),
        };
        if let Some(value) = folded {
            return Some(KineticLaw::int(value));
        }
    }
    let (a, b) = (left.constant_value()?, right.constant_value()?);
    Some(KineticLaw::real(op.apply(a, b)))
}

fn simplify_op(op: KineticLawOp, left: KineticLaw, right: KineticLaw) -> KineticLaw {
    if let Some(folded) = fold_constants(op, &left, &right) {
        return folded;
    }
    match op {
        KineticLawOp::Plus if left.is_zero() => right,
        KineticLawOp::Plus | KineticLawOp::Minus if right.is_zero() => left,
        KineticLawOp::Times if left.is_zero() => left,
        KineticLawOp::Times if right.is_zero() => right,
        KineticLawOp::Times if left.is_one() => right,
        KineticLawOp::Times | KineticLawOp::Divide if right.is_one() => left,
        KineticLawOp::Pow if right.is_one() => left,
        KineticLawOp::Pow if right.is_zero() => KineticLaw::int(1),
        _ => KineticLaw::create_op(op, left, right),
    }
}

fn simplify_unary(op: KineticLawUnaryOp, operand: KineticLaw) -> KineticLaw {
    if let Some(value) = operand.constant_value() {
        return match (op, &operand) {
            (KineticLawUnaryOp::Neg, KineticLaw::IntValue(v)) => match v.checked_neg() {
                Some(negated) => KineticLaw::int(negated),
                None => KineticLaw::real(-value),
            },
            _ => KineticLaw::real(op.apply(value)),
        };
    }
    match (op, operand) {
        (
            KineticLawUnaryOp::Neg,
            KineticLaw::Unary {
                op: KineticLawUnaryOp::Neg,
                operand,
            },
        ) => *operand,
        (op, operand) => KineticLaw::create_unary(op, operand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_integer_and_real_constants() {
        let law = KineticLaw::int(3) * KineticLaw::int(4) / KineticLaw::int(2);
        assert_eq!(law.simplify(), KineticLaw::int(6));
        let law = KineticLaw::int(1) / KineticLaw::int(4);
        assert_eq!(law.simplify(), KineticLaw::real(0.25));
        let law = KineticLaw::real(2.0).pow(KineticLaw::int(3));
        assert_eq!(law.simplify(), KineticLaw::real(8.0));
    }

    #[test]
    fn removes_neutral_elements() {
        let k = KineticLaw::symbol("k");
        let law = (KineticLaw::int(1) * k.clone() + KineticLaw::real(0.0)) / KineticLaw::int(1);
        assert_eq!(law.simplify(), k);
        let law = k.clone().pow(KineticLaw::int(0));
        assert_eq!(law.simplify(), KineticLaw::int(1));
        let law = KineticLaw::int(0) * k.clone();
        assert_eq!(law.simplify(), KineticLaw::int(0));
    }

    #[test]
    fn double_negation_cancels() {
        let k = KineticLaw::symbol("k");
        assert_eq!((-(-k.clone())).simplify(), k);
        assert_eq!((-KineticLaw::int(5)).simplify(), KineticLaw::int(-5));
    }
}
