use crate::ty::Ty;
use std::fmt;

/// Static method reference: `<owner>/<name>(<params>)<ret>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub owner: String,
    pub name: String,
    pub params: Vec<Ty>,
    pub ret: Ty,
}

impl Signature {
    pub fn new(owner: &str, name: &str, params: Vec<Ty>, ret: Ty) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            params,
            ret,
        }
    }

    /// `(II)D`
    pub fn descriptor(&self) -> String {
        let params: String = self.params.iter().map(|ty| ty.code()).collect();
        format!("({}){}", params, self.ret.code())
    }

    /// Program entry point. It takes the host argument array, which user code never sees.
    pub fn is_entry(&self) -> bool {
        self.name == "main"
    }

    /// Name and descriptor as written in a method declaration line
    pub fn declaration(&self) -> String {
        if self.is_entry() {
            "main([Ljava/lang/String;)V".to_string()
        } else {
            format!("{}{}", self.name, self.descriptor())
        }
    }

    /// Operand-stack cells consumed by the arguments
    pub fn arg_cells(&self) -> usize {
        self.params.iter().map(|ty| ty.cells()).sum()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.owner, self.name, self.descriptor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode() {
        let sig = Signature::new("MainJasmin", "sum", vec![Ty::Int, Ty::Double], Ty::Double);
        assert_eq!(sig.to_string(), "MainJasmin/sum(ID)D");
        assert_eq!(sig.declaration(), "sum(ID)D");
        assert_eq!(sig.arg_cells(), 3);
    }

    #[test]
    fn void_without_params() {
        let sig = Signature::new("MainJasmin", "tick", vec![], Ty::Void);
        assert_eq!(sig.to_string(), "MainJasmin/tick()V");
    }

    #[test]
    fn entry_point() {
        let sig = Signature::new("MainJasmin", "main", vec![], Ty::Void);
        assert_eq!(sig.declaration(), "main([Ljava/lang/String;)V");
    }
}
