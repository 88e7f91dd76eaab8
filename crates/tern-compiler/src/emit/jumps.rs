//! Loop bookkeeping for `break` and `continue`.
//!
//! Both statements jump forward to a position that is not known yet, and
//! both must first drop every variable declared inside the loop so the
//! stack has the same shape at every iteration.

use super::JumpLabel;

/// Tracks a stack of loop contexts, innermost last.
#[derive(Debug, Default)]
pub struct JumpManager {
    loops: Vec<LoopContext>,
}

#[derive(Debug, Default)]
struct LoopContext {
    /// Variables declared inside the loop that are still live.
    vars: usize,
    continue_labels: Vec<JumpLabel>,
    break_labels: Vec<JumpLabel>,
}

impl JumpManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self) {
        self.loops.push(LoopContext::default());
    }

    /// Leave the innermost loop and return its pending break jumps.
    pub fn exit_loop(&mut self) -> Vec<JumpLabel> {
        self.loops
            .pop()
            .map(|ctx| ctx.break_labels)
            .unwrap_or_default()
    }

    /// Take the innermost loop's pending continue jumps.
    pub fn take_continues(&mut self) -> Vec<JumpLabel> {
        self.loops
            .last_mut()
            .map(|ctx| std::mem::take(&mut ctx.continue_labels))
            .unwrap_or_default()
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Live variables declared inside the innermost loop.
    pub fn loop_vars(&self) -> Option<usize> {
        self.loops.last().map(|ctx| ctx.vars)
    }

    pub fn var_declared(&mut self) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.vars += 1;
        }
    }

    pub fn vars_popped(&mut self, count: usize) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.vars = ctx.vars.saturating_sub(count);
        }
    }

    pub fn add_break(&mut self, label: JumpLabel) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.break_labels.push(label);
        }
    }

    pub fn add_continue(&mut self, label: JumpLabel) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.continue_labels.push(label);
        }
    }
}
