//! The stack virtual machine.
//!
//! Bytecode comes from the compiler and is trusted: operand kinds were
//! checked statically, so the interpreter only reports stack overflow as an
//! error and panics on anything else that does not add up.

mod stack;

pub use stack::{DEFAULT_STACK_CAPACITY, ValueStack};

use tern_compiler::{OpCode, Program};
use tern_core::{RuntimeError, Value};
use tern_registry::{CallContext, Registry};

/// Executes one [`Program`] against the registry it was compiled with.
pub struct Vm<'a> {
    program: &'a Program,
    registry: &'a Registry,
    stack: ValueStack,
    pc: usize,
}

impl<'a> Vm<'a> {
    pub fn new(program: &'a Program, registry: &'a Registry, stack_capacity: usize) -> Self {
        Self {
            program,
            registry,
            stack: ValueStack::new(stack_capacity),
            pc: 0,
        }
    }

    /// Run to the end of the program.
    ///
    /// Returns the script's result value, or `null` when the last statement
    /// leaves nothing behind. The stack is empty afterwards either way.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        self.pc = 0;
        let outcome = self.execute();
        let result = match outcome {
            Ok(()) => {
                let result = if self.program.yields_value() {
                    self.stack.pop()
                } else {
                    Value::Null
                };
                debug_assert_eq!(
                    self.stack.len(),
                    self.program.globals(),
                    "stack depth does not match the live globals"
                );
                Ok(result)
            }
            Err(error) => Err(error),
        };
        self.stack.clear();
        result
    }

    /// Current stack depth. Zero outside of [`Vm::run`].
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn execute(&mut self) -> Result<(), RuntimeError> {
        let code_len = self.program.chunk().len();
        while self.pc < code_len {
            self.execute_instruction()?;
        }
        Ok(())
    }

    fn execute_instruction(&mut self) -> Result<(), RuntimeError> {
        let offset = self.pc;
        let op = self.read_op();
        tracing::trace!(offset, op = op.name(), depth = self.stack.len(), "execute");

        match op {
            // Literals
            OpCode::PushNull => self.stack.push(Value::Null)?,
            OpCode::PushNumber => {
                let n = self.read_f64();
                self.stack.push(Value::Number(n))?;
            }
            OpCode::PushTrue => self.stack.push(Value::Boolean(true))?,
            OpCode::PushFalse => self.stack.push(Value::Boolean(false))?,
            OpCode::PushString => {
                let index = self.read_u16();
                let string = match self.program.chunk().string(index) {
                    Some(string) => string.clone(),
                    None => panic!("string index {index} out of range"),
                };
                self.stack.push(Value::String(string))?;
            }

            // Stack and variables
            OpCode::Copy => {
                let top = self.stack.peek().reference();
                self.stack.push(top)?;
            }
            OpCode::Pop => self.stack.pop().release(),
            OpCode::Load => {
                let slot = self.read_u8() as usize;
                let value = self.stack.get(slot).reference();
                self.stack.push(value)?;
            }
            OpCode::Store => {
                let slot = self.read_u8() as usize;
                let value = self.stack.peek().reference();
                self.stack.set(slot, value);
            }

            OpCode::NativeCall => {
                let index = self.read_u8();
                let argc = self.read_u8() as usize;
                let Some(function) = self.registry.get(index) else {
                    panic!("native function {index} is not registered");
                };
                let args = self.stack.split_top(argc);
                let result = function.call(&CallContext::new(&args));
                drop(args);
                // void calls leave nothing behind
                if !function.return_type().is_void() {
                    self.stack.push(result)?;
                }
            }

            // Operators
            OpCode::Negate => {
                let n = number(self.stack.pop());
                self.stack.push(Value::Number(-n))?;
            }
            OpCode::Not => {
                let b = boolean(self.stack.pop());
                self.stack.push(Value::Boolean(!b))?;
            }
            OpCode::Add => self.arithmetic(|a, b| a + b)?,
            OpCode::Subtract => self.arithmetic(|a, b| a - b)?,
            OpCode::Multiply => self.arithmetic(|a, b| a * b)?,
            OpCode::Divide => self.arithmetic(|a, b| a / b)?,
            OpCode::Concat => {
                let rhs = self.stack.pop();
                let lhs = self.stack.pop();
                let joined = match (&lhs, &rhs) {
                    (Value::String(a), Value::String(b)) => a.concat(b),
                    _ => panic!("concat on {} and {}", lhs.kind().name(), rhs.kind().name()),
                };
                self.stack.push(Value::String(joined))?;
            }
            OpCode::Equal => {
                let rhs = self.stack.pop();
                let lhs = self.stack.pop();
                self.stack.push(Value::Boolean(lhs == rhs))?;
            }
            OpCode::NotEqual => {
                let rhs = self.stack.pop();
                let lhs = self.stack.pop();
                self.stack.push(Value::Boolean(lhs != rhs))?;
            }
            OpCode::Less => self.comparison(|a, b| a < b)?,
            OpCode::LessEqual => self.comparison(|a, b| a <= b)?,
            OpCode::Greater => self.comparison(|a, b| a > b)?,
            OpCode::GreaterEqual => self.comparison(|a, b| a >= b)?,

            // Control flow
            OpCode::Jump => {
                let distance = self.read_u16() as usize;
                self.pc += distance;
            }
            OpCode::JumpBack => {
                let distance = self.read_u16() as usize;
                self.pc -= distance;
            }
            OpCode::JumpIfFalse => {
                let distance = self.read_u16() as usize;
                if !boolean(self.stack.pop()) {
                    self.pc += distance;
                }
            }
            OpCode::JumpIfTrue => {
                let distance = self.read_u16() as usize;
                if boolean(self.stack.pop()) {
                    self.pc += distance;
                }
            }
            OpCode::JumpIfFalseRetain => {
                let distance = self.read_u16() as usize;
                if boolean_ref(self.stack.peek()) {
                    self.stack.pop();
                } else {
                    self.pc += distance;
                }
            }
            OpCode::JumpIfTrueRetain => {
                let distance = self.read_u16() as usize;
                if boolean_ref(self.stack.peek()) {
                    self.pc += distance;
                } else {
                    self.stack.pop();
                }
            }
        }
        Ok(())
    }

    fn arithmetic(&mut self, f: impl FnOnce(f64, f64) -> f64) -> Result<(), RuntimeError> {
        let rhs = number(self.stack.pop());
        let lhs = number(self.stack.pop());
        self.stack.push(Value::Number(f(lhs, rhs)))
    }

    fn comparison(&mut self, f: impl FnOnce(f64, f64) -> bool) -> Result<(), RuntimeError> {
        let rhs = number(self.stack.pop());
        let lhs = number(self.stack.pop());
        self.stack.push(Value::Boolean(f(lhs, rhs)))
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    fn read_op(&mut self) -> OpCode {
        let Some(op) = self.program.chunk().read_op(self.pc) else {
            panic!("invalid opcode at offset {}", self.pc);
        };
        self.pc += 1;
        op
    }

    fn read_u8(&mut self) -> u8 {
        let Some(value) = self.program.chunk().read_u8(self.pc) else {
            panic!("operand past the end of code at offset {}", self.pc);
        };
        self.pc += 1;
        value
    }

    fn read_u16(&mut self) -> u16 {
        let Some(value) = self.program.chunk().read_u16(self.pc) else {
            panic!("operand past the end of code at offset {}", self.pc);
        };
        self.pc += 2;
        value
    }

    fn read_f64(&mut self) -> f64 {
        let Some(value) = self.program.chunk().read_f64(self.pc) else {
            panic!("operand past the end of code at offset {}", self.pc);
        };
        self.pc += 8;
        value
    }
}

fn number(value: Value) -> f64 {
    match value {
        Value::Number(n) => n,
        other => panic!("expected a number, found {}", other.kind().name()),
    }
}

fn boolean(value: Value) -> bool {
    boolean_ref(&value)
}

fn boolean_ref(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        other => panic!("expected a bool, found {}", other.kind().name()),
    }
}
