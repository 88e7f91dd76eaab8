//! The fixed-capacity value stack.

use tern_core::{RuntimeError, Value};

/// Default number of stack slots.
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Operand stack and variable storage in one.
///
/// Variables live in absolute slots at the bottom, temporaries above them.
/// Pushing past the capacity is a recoverable error. Popping an empty stack
/// or touching a slot above the top means the bytecode is broken, so those
/// panic.
#[derive(Debug)]
pub struct ValueStack {
    values: Vec<Value>,
    capacity: usize,
}

impl ValueStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.values.len() >= self.capacity {
            return Err(RuntimeError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    #[inline]
    pub fn pop(&mut self) -> Value {
        match self.values.pop() {
            Some(value) => value,
            None => panic!("value stack underflow"),
        }
    }

    #[inline]
    pub fn peek(&self) -> &Value {
        match self.values.last() {
            Some(value) => value,
            None => panic!("peek on an empty value stack"),
        }
    }

    #[inline]
    pub fn get(&self, slot: usize) -> &Value {
        &self.values[slot]
    }

    /// Replace the value in `slot`, releasing the old one.
    #[inline]
    pub fn set(&mut self, slot: usize, value: Value) {
        self.values[slot] = value;
    }

    /// Remove the top `count` values, oldest first.
    pub fn split_top(&mut self, count: usize) -> Vec<Value> {
        let len = self.values.len();
        assert!(count <= len, "value stack underflow");
        self.values.split_off(len - count)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every value, releasing the strings they hold.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for ValueStack {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_CAPACITY)
    }
}
