use crate::error::Error;
use arch::{Inst, Ty};
use indexmap::IndexMap;

/// Method-scoped codegen state: variables, slot occupancy, operand-stack depth and labels.
pub struct Local<'a> {
    vars: IndexMap<&'a str, (Ty, u16)>,
    slots: Vec<bool>,
    pad: usize,
    temp_top: usize,
    depth: usize,
    max_depth: usize,
    labels: usize,
}

impl<'a> Local<'a> {
    pub fn fork(max_slots: usize, pad: usize) -> Self {
        Self {
            vars: IndexMap::new(),
            slots: vec![false; max_slots],
            pad,
            temp_top: 0,
            depth: 0,
            max_depth: 0,
            labels: 0,
        }
    }

    /// Mark slots taken by something other than a named variable (the entry point's argument array)
    pub fn reserve(&mut self, cells: usize) -> Result<(), Error> {
        let slot = self
            .find_free(cells)
            .ok_or_else(|| Error::SlotsExhausted("reserved slot".to_string()))?;
        self.occupy(slot, cells);
        Ok(())
    }

    /// Allocate the smallest run of free slots wide enough for `ty`
    pub fn declare(&mut self, name: &'a str, ty: Ty) -> Result<u16, Error> {
        if !ty.is_value() {
            return Err(Error::InvalidVariableType(name.to_string()));
        }
        if self.vars.contains_key(name) {
            return Err(Error::DuplicateVariable(name.to_string()));
        }
        let start = self
            .find_free(ty.cells())
            .ok_or_else(|| Error::SlotsExhausted(name.to_string()))?;
        let slot = u16::try_from(start).map_err(|_| Error::SlotsExhausted(name.to_string()))?;
        self.occupy(start, ty.cells());
        self.vars.insert(name, (ty, slot));
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Result<(Ty, u16), Error> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedVariable(name.to_string()))
    }

    /// Double-wide scratch slot for spilling. Not marked as occupied.
    pub fn temp(&mut self) -> Result<u16, Error> {
        let start = self
            .find_free(Ty::Double.cells())
            .ok_or_else(|| Error::SlotsExhausted("temporary".to_string()))?;
        let slot = u16::try_from(start).map_err(|_| Error::SlotsExhausted("temporary".to_string()))?;
        self.temp_top = self.temp_top.max(start + Ty::Double.cells());
        Ok(slot)
    }

    fn find_free(&self, cells: usize) -> Option<usize> {
        (0..self.slots.len().saturating_sub(cells - 1))
            .find(|&start| self.slots[start..start + cells].iter().all(|used| !used))
    }

    fn occupy(&mut self, start: usize, cells: usize) {
        self.slots[start..start + cells].iter_mut().for_each(|used| *used = true);
    }

    pub fn vars(&self) -> impl Iterator<Item = (&&'a str, &(Ty, u16))> {
        self.vars.iter()
    }
}

impl<'a> Local<'a> {
    /// Apply the operand-stack effect of an emitted instruction
    pub fn track(&mut self, inst: &Inst) {
        let (pop, push) = inst.stack_effect();
        self.depth = self.depth.saturating_sub(pop) + push;
        self.max_depth = self.max_depth.max(self.depth);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Rewind the depth at a branch target reached only by a jump
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    pub fn max_stack(&self) -> usize {
        self.max_depth
    }

    /// `.limit locals`: occupied slots plus the temporary pad, or the highest spill slot
    pub fn max_locals(&self) -> usize {
        let used = self.slots.iter().rposition(|used| *used).map_or(0, |last| last + 1);
        (used + self.pad).max(self.temp_top)
    }

    pub fn label(&mut self) -> String {
        let label = format!("L{}", self.labels);
        self.labels += 1;
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::ArithOp;

    #[test]
    fn smallest_free_slot() {
        let mut local = Local::fork(10, 2);
        assert_eq!(local.declare("a", Ty::Int).unwrap(), 0);
        assert_eq!(local.declare("b", Ty::Double).unwrap(), 1);
        assert_eq!(local.declare("c", Ty::Int).unwrap(), 3);
        assert_eq!(local.lookup("b").unwrap(), (Ty::Double, 1));
        assert_eq!(local.max_locals(), 6);
    }

    #[test]
    fn double_needs_two_free_slots() {
        let mut local = Local::fork(10, 0);
        local.reserve(1).unwrap();
        local.declare("a", Ty::Double).unwrap();
        assert_eq!(local.lookup("a").unwrap(), (Ty::Double, 1));
    }

    #[test]
    fn exhausted() {
        let mut local = Local::fork(3, 2);
        local.declare("a", Ty::Double).unwrap();
        assert!(matches!(local.declare("b", Ty::Double), Err(Error::SlotsExhausted(_))));
        assert_eq!(local.declare("c", Ty::Int).unwrap(), 2);
    }

    #[test]
    fn slot_beyond_operand_range() {
        let mut local = Local::fork(70000, 0);
        local.reserve(65536).unwrap();
        assert!(matches!(local.declare("a", Ty::Int), Err(Error::SlotsExhausted(_))));
        assert!(matches!(local.temp(), Err(Error::SlotsExhausted(_))));
    }

    #[test]
    fn rejects_void_and_duplicates() {
        let mut local = Local::fork(10, 2);
        assert!(matches!(local.declare("v", Ty::Void), Err(Error::InvalidVariableType(_))));
        local.declare("a", Ty::Int).unwrap();
        assert!(matches!(local.declare("a", Ty::Double), Err(Error::DuplicateVariable(_))));
        assert!(matches!(local.lookup("b"), Err(Error::UndefinedVariable(_))));
    }

    #[test]
    fn temp_is_not_occupied() {
        let mut local = Local::fork(10, 0);
        local.declare("a", Ty::Int).unwrap();
        assert_eq!(local.temp().unwrap(), 1);
        assert_eq!(local.declare("b", Ty::Int).unwrap(), 1);
        assert_eq!(local.max_locals(), 3);
    }

    #[test]
    fn stack_depth() {
        let mut local = Local::fork(10, 2);
        local.track(&Inst::Ldc("1".into()));
        local.track(&Inst::Ldc2W("2.0".into()));
        local.track(&Inst::Cast(Ty::Int, Ty::Double));
        assert_eq!(local.depth(), 4);
        local.track(&Inst::Arith(Ty::Double, ArithOp::Add));
        assert_eq!(local.depth(), 2);
        assert_eq!(local.max_stack(), 4);
    }

    #[test]
    fn labels_are_unique() {
        let mut local = Local::fork(1, 0);
        assert_eq!(local.label(), "L0");
        assert_eq!(local.label(), "L1");
    }
}
