pub mod inst;
pub mod sig;
pub mod ty;

pub use inst::{ArithOp, Cond, Inst};
pub use sig::Signature;
pub use ty::Ty;
