//! Methods that rewrite kinetic laws without touching the graph.
use crate::Abstraction::abstraction_method::AbstractionMethod;
use crate::Abstraction::properties::{
    DEFAULT_POW_KINETIC_LAW_MAX_EXPONENT, POW_KINETIC_LAW_MAX_EXPONENT_KEY, Properties,
};
use crate::IR::ir_graph::IR;
use crate::KineticLaw::kinetic_law::{KineticLaw, KineticLawOp};
use crate::error::Reb2SacResult;
use log::{debug, info, warn};

fn split_minus(law: KineticLaw) -> Result<(KineticLaw, KineticLaw), KineticLaw> {
    match law {
        KineticLaw::Op {
            op: KineticLawOp::Minus,
            left,
            right,
        } => Ok((*left, *right)),
        other => Err(other),
    }
}

/// `c * (f - b)` becomes `c*f - c*b` (and `(f - b) * c` becomes `f*c - b*c`), also when
/// the difference sits deeper in a product. Returns `None` when nothing changes.
pub fn distribute_kinetic_law(law: &KineticLaw) -> Option<KineticLaw> {
    let KineticLaw::Op {
        op: KineticLawOp::Times,
        left,
        right,
    } = law
    else {
        return None;
    };
    let inner_left = distribute_kinetic_law(left);
    let inner_right = distribute_kinetic_law(right);
    let changed = inner_left.is_some() || inner_right.is_some();
    let left = inner_left.unwrap_or_else(|| left.as_ref().clone());
    let right = inner_right.unwrap_or_else(|| right.as_ref().clone());
    match split_minus(right) {
        Ok((forward, backward)) => Some(left.clone() * forward - left * backward),
        Err(right) => match split_minus(left) {
            Ok((forward, backward)) => Some(forward * right.clone() - backward * right),
            Err(left) if changed => Some(left * right),
            Err(_) => None,
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct DistributeMethod;

impl AbstractionMethod for DistributeMethod {
    fn id(&self) -> &'static str {
        "distribute-transformer"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if let Some(law) = distribute_kinetic_law(ir.reaction(reaction)?.kinetic_law()) {
                debug!("distributed the law of '{}'", ir.reaction(reaction)?.name);
                ir.set_kinetic_law(reaction, law)?;
                count += 1;
            }
        }
        info!("{}: {} laws distributed", self.id(), count);
        Ok(())
    }
}

/// largest exponent the pow transformer will ever expand
pub const MAX_POW_KINETIC_LAW_EXPONENT: i64 = 64;

/// Expands `x ^ n` for integral `n` with `|n|` up to the configured maximum into
/// products: `x^3` gives `x*x*x`, `x^-2` gives `1/(x*x)` and `x^0` gives `1`.
#[derive(Debug, Clone)]
pub struct PowKineticLawTransformationMethod {
    pub max_exponent: i64,
}

impl Default for PowKineticLawTransformationMethod {
    fn default() -> Self {
        Self {
            max_exponent: DEFAULT_POW_KINETIC_LAW_MAX_EXPONENT,
        }
    }
}

impl PowKineticLawTransformationMethod {
    pub fn from_properties(properties: &Properties) -> Self {
        let configured = properties.get_int(
            POW_KINETIC_LAW_MAX_EXPONENT_KEY,
            DEFAULT_POW_KINETIC_LAW_MAX_EXPONENT,
        );
        let max_exponent = configured.clamp(0, MAX_POW_KINETIC_LAW_EXPONENT);
        if max_exponent != configured {
            warn!(
                "{} = {} is out of range, using {}",
                POW_KINETIC_LAW_MAX_EXPONENT_KEY, configured, max_exponent
            );
        }
        Self { max_exponent }
    }

    fn integral_exponent(&self, exponent: &KineticLaw) -> Option<i64> {
        let n = match exponent {
            KineticLaw::IntValue(n) => *n,
            KineticLaw::RealValue(v) if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => *v as i64,
            _ => return None,
        };
        n.checked_abs()
            .filter(|abs| *abs <= self.max_exponent)
            .map(|_| n)
    }

    /// Returns `None` when the law has no expandable power.
    pub fn expand(&self, law: &KineticLaw) -> Option<KineticLaw> {
        match law {
            KineticLaw::Op { op, left, right } => {
                let new_left = self.expand(left);
                let new_right = self.expand(right);
                let changed = new_left.is_some() || new_right.is_some();
                let left = new_left.unwrap_or_else(|| left.as_ref().clone());
                let right = new_right.unwrap_or_else(|| right.as_ref().clone());
                if *op == KineticLawOp::Pow {
                    if let Some(n) = self.integral_exponent(&right) {
                        return Some(repeated_product(left, n));
                    }
                }
                changed.then(|| KineticLaw::create_op(*op, left, right))
            }
            KineticLaw::Unary { op, operand } => self
                .expand(operand)
                .map(|operand| KineticLaw::create_unary(*op, operand)),
            _ => None,
        }
    }
}

fn repeated_product(base: KineticLaw, n: i64) -> KineticLaw {
    if n == 0 {
        return KineticLaw::int(1);
    }
    let mut product = base.clone();
    for _ in 1..n.unsigned_abs() {
        product = product * base.clone();
    }
    if n < 0 {
        KineticLaw::int(1) / product
    } else {
        product
    }
}

impl AbstractionMethod for PowKineticLawTransformationMethod {
    fn id(&self) -> &'static str {
        "pow-kinetic-law-transformer"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            if let Some(law) = self.expand(ir.reaction(reaction)?.kinetic_law()) {
                ir.set_kinetic_law(reaction, law)?;
                count += 1;
            }
        }
        info!("{}: {} laws expanded", self.id(), count);
        Ok(())
    }
}

/// Constant folding and neutral-element removal on every kinetic law and initial
/// assignment.
#[derive(Debug, Clone, Default)]
pub struct KineticLawConstantsSimplifierMethod;

impl AbstractionMethod for KineticLawConstantsSimplifierMethod {
    fn id(&self) -> &'static str {
        "kinetic-law-constants-simplifier"
    }

    fn apply(&self, ir: &mut IR) -> Reb2SacResult<()> {
        let mut count = 0;
        for reaction in ir.reaction_ids() {
            let simplified = ir.reaction(reaction)?.kinetic_law().simplify();
            if &simplified != ir.reaction(reaction)?.kinetic_law() {
                ir.set_kinetic_law(reaction, simplified)?;
                count += 1;
            }
        }
        for species in ir.species_ids() {
            let node = ir.species_mut(species)?;
            if let Some(assignment) = &node.initial_assignment {
                let simplified = assignment.simplify();
                if &simplified != assignment {
                    node.initial_assignment = Some(simplified);
                    count += 1;
                }
            }
        }
        info!("{}: {} expressions simplified", self.id(), count);
        Ok(())
    }
}
