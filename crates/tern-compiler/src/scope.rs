//! Variable scope management.
//!
//! Variables live on the value stack in declaration order, so a variable's
//! slot is simply its position in the table. Blocks nest by depth and
//! leaving a block drops the variables declared in it.
//!
//! Shadowing is not allowed: a name that is visible anywhere in the scope
//! chain cannot be declared again until it goes out of scope.

use tern_core::{CompilationError, Span, TypeDef};

/// Slots are a single byte in bytecode.
pub const MAX_VARIABLES: usize = 256;

/// A declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    pub name: String,
    pub ty: TypeDef,
    /// Block depth the variable was declared at (0 = top level)
    pub depth: u32,
    /// Source location of the declaration
    pub span: Span,
}

#[derive(Debug)]
pub struct LocalScope {
    vars: Vec<LocalVar>,
    depth: u32,
    capacity: usize,
}

impl Default for LocalScope {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalScope {
    pub fn new() -> Self {
        Self::with_capacity(MAX_VARIABLES)
    }

    /// A scope that holds at most `capacity` live variables, clamped to
    /// [`MAX_VARIABLES`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vars: Vec::new(),
            depth: 0,
            capacity: capacity.min(MAX_VARIABLES),
        }
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave the current block and return how many variables it dropped.
    pub fn pop_scope(&mut self) -> usize {
        debug_assert!(self.depth > 0, "pop_scope at top level");
        let keep = self
            .vars
            .iter()
            .rposition(|var| var.depth < self.depth)
            .map_or(0, |i| i + 1);
        let dropped = self.vars.len() - keep;
        self.vars.truncate(keep);
        self.depth = self.depth.saturating_sub(1);
        dropped
    }

    /// Drop the most recently declared variable.
    pub fn pop_last(&mut self) -> Option<LocalVar> {
        self.vars.pop()
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Declare a variable in the current block and return its slot.
    pub fn declare(&mut self, name: &str, ty: TypeDef, span: Span) -> Result<u8, CompilationError> {
        if let Some((_, existing)) = self.lookup(name) {
            return Err(CompilationError::VariableRedeclaration {
                name: name.to_string(),
                original_span: existing.span,
                new_span: span,
            });
        }
        if self.vars.len() >= self.capacity {
            return Err(CompilationError::TooManyVariables {
                limit: self.capacity,
                span,
            });
        }

        let slot = self.vars.len() as u8;
        self.vars.push(LocalVar {
            name: name.to_string(),
            ty,
            depth: self.depth,
            span,
        });
        Ok(slot)
    }

    /// Find a visible variable, innermost first.
    pub fn lookup(&self, name: &str) -> Option<(u8, &LocalVar)> {
        self.vars
            .iter()
            .enumerate()
            .rev()
            .find(|(_, var)| var.name == name)
            .map(|(slot, var)| (slot as u8, var))
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of live variables, which is also the next free slot.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(col: u32) -> Span {
        Span::new(1, col, 1)
    }

    #[test]
    fn slots_follow_declaration_order() {
        let mut scope = LocalScope::new();
        assert_eq!(scope.declare("a", TypeDef::NUMBER, span(1)), Ok(0));
        assert_eq!(scope.declare("b", TypeDef::STRING, span(2)), Ok(1));

        let (slot, var) = scope.lookup("b").unwrap();
        assert_eq!(slot, 1);
        assert_eq!(var.ty, TypeDef::STRING);
        assert!(scope.lookup("c").is_none());
    }

    #[test]
    fn redeclaration_in_same_scope() {
        let mut scope = LocalScope::new();
        scope.declare("x", TypeDef::NUMBER, span(1)).unwrap();
        assert_eq!(
            scope.declare("x", TypeDef::NUMBER, span(9)),
            Err(CompilationError::VariableRedeclaration {
                name: "x".into(),
                original_span: span(1),
                new_span: span(9),
            })
        );
    }

    #[test]
    fn no_shadowing_of_outer_scopes() {
        let mut scope = LocalScope::new();
        scope.declare("x", TypeDef::NUMBER, span(1)).unwrap();
        scope.push_scope();
        assert!(scope.declare("x", TypeDef::BOOLEAN, span(5)).is_err());
    }

    #[test]
    fn pop_scope_drops_inner_variables() {
        let mut scope = LocalScope::new();
        scope.declare("outer", TypeDef::NUMBER, span(1)).unwrap();
        scope.push_scope();
        scope.declare("a", TypeDef::NUMBER, span(2)).unwrap();
        scope.push_scope();
        scope.declare("b", TypeDef::NUMBER, span(3)).unwrap();

        assert_eq!(scope.pop_scope(), 1);
        assert_eq!(scope.pop_scope(), 1);
        assert_eq!(scope.depth(), 0);
        assert_eq!(scope.len(), 1);

        // name is free again once its block is gone
        scope.push_scope();
        assert_eq!(scope.declare("a", TypeDef::STRING, span(4)), Ok(1));
    }

    #[test]
    fn empty_block_drops_nothing() {
        let mut scope = LocalScope::new();
        scope.declare("x", TypeDef::NUMBER, span(1)).unwrap();
        scope.push_scope();
        assert_eq!(scope.pop_scope(), 0);
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut scope = LocalScope::with_capacity(2);
        scope.declare("a", TypeDef::NUMBER, span(1)).unwrap();
        scope.declare("b", TypeDef::NUMBER, span(2)).unwrap();
        assert_eq!(
            scope.declare("c", TypeDef::NUMBER, span(3)),
            Err(CompilationError::TooManyVariables {
                limit: 2,
                span: span(3)
            })
        );
    }

    #[test]
    fn capacity_is_clamped_to_slot_width() {
        assert_eq!(LocalScope::with_capacity(1000).capacity(), MAX_VARIABLES);
    }
}
