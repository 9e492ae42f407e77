use strum::Display;

/// Value types of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Ty {
    Int,
    Double,
    Void,
}

impl Ty {
    /// Descriptor letter used in method signatures
    pub fn code(&self) -> &'static str {
        match self {
            Ty::Int => "I",
            Ty::Double => "D",
            Ty::Void => "V",
        }
    }

    /// Mnemonic prefix of typed instructions (`iload`, `dadd`, `return`)
    pub fn prefix(&self) -> &'static str {
        match self {
            Ty::Int => "i",
            Ty::Double => "d",
            Ty::Void => "",
        }
    }

    /// Number of operand-stack cells (and local slots) a value occupies
    pub fn cells(&self) -> usize {
        match self {
            Ty::Int => 1,
            Ty::Double => 2,
            Ty::Void => 0,
        }
    }

    pub fn is_value(&self) -> bool {
        !matches!(self, Ty::Void)
    }

    /// Result type of a binary arithmetic operation
    pub fn promote(lhs: Ty, rhs: Ty) -> Ty {
        match (lhs, rhs) {
            (Ty::Int, Ty::Int) => Ty::Int,
            _ => Ty::Double,
        }
    }
}
