use crate::error::Error;
use crate::grammer::ast::Program;
use arch::{Signature, Ty};
use indexmap::IndexMap;

/// Name of the runtime helper backing integer `^`
pub const IPOW: &str = "$ipow";

/// Program-wide method signatures, collected before any body is compiled.
pub struct Global {
    owner: String,
    methods: IndexMap<String, Signature>,
}

impl Global {
    pub fn collect(program: &Program, owner: &str) -> Result<Self, Error> {
        let mut methods = IndexMap::new();
        for method in &program.0 {
            if methods.contains_key(&method.name) {
                return Err(Error::DuplicateMethod(method.name.clone()));
            }
            let params = method.params.iter().map(|(ty, _)| *ty).collect();
            let sig = Signature::new(owner, &method.name, params, method.ret);
            if sig.is_entry() && (sig.ret != Ty::Void || !sig.params.is_empty()) {
                return Err(Error::InvalidEntryPoint);
            }
            methods.insert(method.name.clone(), sig);
        }
        Ok(Self {
            owner: owner.to_string(),
            methods,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Signature of a method declared in this program
    pub fn signature(&self, name: &str) -> Result<&Signature, Error> {
        self.methods
            .get(name)
            .ok_or_else(|| Error::UndeclaredMethod(name.to_string()))
    }

    /// Signature for a call site. The entry point is not callable.
    pub fn callee(&self, name: &str) -> Result<&Signature, Error> {
        let sig = self.signature(name)?;
        if sig.is_entry() {
            return Err(Error::EntryPointCall);
        }
        Ok(sig)
    }

    pub fn ipow(&self) -> Signature {
        Signature::new(&self.owner, IPOW, vec![Ty::Int, Ty::Int], Ty::Int)
    }

    pub fn math_pow() -> Signature {
        Signature::new("java/lang/Math", "pow", vec![Ty::Double, Ty::Double], Ty::Double)
    }

    pub fn println(ty: Ty) -> Signature {
        Signature::new("java/io/PrintStream", "println", vec![ty], Ty::Void)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammer::parsercore::Parser;

    fn collect(code: &str) -> Result<Global, Error> {
        let (program, _) = Parser::from_source(code).unwrap().parse().unwrap();
        Global::collect(&program, "MainJasmin")
    }

    #[test]
    fn forward_declaration() {
        let global = collect("void main() { f(1) } int f(int a) { return a }").unwrap();
        assert_eq!(global.callee("f").unwrap().to_string(), "MainJasmin/f(I)I");
    }

    #[test]
    fn undeclared() {
        let global = collect("void main() { }").unwrap();
        assert!(matches!(global.callee("g"), Err(Error::UndeclaredMethod(name)) if name == "g"));
    }

    #[test]
    fn entry_point() {
        let global = collect("void main() { }").unwrap();
        assert!(matches!(global.callee("main"), Err(Error::EntryPointCall)));
        assert!(matches!(collect("int main() { return 0 }"), Err(Error::InvalidEntryPoint)));
    }

    #[test]
    fn duplicate() {
        let res = collect("void f() { } void f() { }");
        assert!(matches!(res, Err(Error::DuplicateMethod(name)) if name == "f"));
    }
}
