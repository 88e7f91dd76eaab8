//! Bytecode operation codes.
//!
//! Each opcode is a single byte with its operands following inline.
//! Multi-byte operands are little-endian.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bytecode operation codes.
///
/// The VM is a stack machine. Binary operators pop the right operand first,
/// then the left one, and push the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Literals
    // =========================================================================
    PushNull = 0,
    /// Operand: f64
    PushNumber,
    PushTrue,
    PushFalse,
    /// Push a new reference to a pooled string.
    /// Operand: u16 string pool index
    PushString,

    // =========================================================================
    // Stack and variables
    // =========================================================================
    /// Duplicate the top value.
    Copy,
    /// Pop and release the top value.
    Pop,
    /// Push a copy of an absolute stack slot.
    /// Operand: u8 slot
    Load,
    /// Overwrite a slot with a copy of the top value, which stays in place.
    /// Operand: u8 slot
    Store,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Pop the arguments, call the native function, push its result.
    /// Operands: u8 function index, u8 argument count
    NativeCall,

    // =========================================================================
    // Operators
    // =========================================================================
    Negate,
    Not,
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Join two strings into a new one.
    Concat,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Operand: u16 forward distance from the end of the instruction
    Jump,
    /// Operand: u16 backward distance from the end of the instruction
    JumpBack,
    /// Pop the condition and jump if it is false.
    /// Operand: u16 forward distance
    JumpIfFalse,
    /// Pop the condition and jump if it is true.
    /// Operand: u16 forward distance
    JumpIfTrue,
    /// Jump keeping the condition if it is false, otherwise pop it.
    /// Operand: u16 forward distance
    JumpIfFalseRetain,
    /// Jump keeping the condition if it is true, otherwise pop it.
    /// Operand: u16 forward distance
    JumpIfTrueRetain,
}

impl OpCode {
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::PushNumber => 8,
            OpCode::PushString
            | OpCode::NativeCall
            | OpCode::Jump
            | OpCode::JumpBack
            | OpCode::JumpIfFalse
            | OpCode::JumpIfTrue
            | OpCode::JumpIfFalseRetain
            | OpCode::JumpIfTrueRetain => 2,
            OpCode::Load | OpCode::Store => 1,
            OpCode::PushNull
            | OpCode::PushTrue
            | OpCode::PushFalse
            | OpCode::Copy
            | OpCode::Pop
            | OpCode::Negate
            | OpCode::Not
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::Concat
            | OpCode::Equal
            | OpCode::NotEqual
            | OpCode::Less
            | OpCode::LessEqual
            | OpCode::Greater
            | OpCode::GreaterEqual => 0,
        }
    }

    /// Whether the operand is a forward jump distance.
    pub fn is_forward_jump(&self) -> bool {
        matches!(
            self,
            OpCode::Jump
                | OpCode::JumpIfFalse
                | OpCode::JumpIfTrue
                | OpCode::JumpIfFalseRetain
                | OpCode::JumpIfTrueRetain
        )
    }

    /// Mnemonic used in disassembly.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::PushNull => "push_null",
            OpCode::PushNumber => "push_number",
            OpCode::PushTrue => "push_true",
            OpCode::PushFalse => "push_false",
            OpCode::PushString => "push_string",
            OpCode::Copy => "copy",
            OpCode::Pop => "pop",
            OpCode::Load => "load",
            OpCode::Store => "store",
            OpCode::NativeCall => "native_call",
            OpCode::Negate => "negate",
            OpCode::Not => "not",
            OpCode::Add => "add",
            OpCode::Subtract => "subtract",
            OpCode::Multiply => "multiply",
            OpCode::Divide => "divide",
            OpCode::Concat => "concat",
            OpCode::Equal => "equal",
            OpCode::NotEqual => "not_equal",
            OpCode::Less => "less",
            OpCode::LessEqual => "less_equal",
            OpCode::Greater => "greater",
            OpCode::GreaterEqual => "greater_equal",
            OpCode::Jump => "jump",
            OpCode::JumpBack => "jump_back",
            OpCode::JumpIfFalse => "jump_if_false",
            OpCode::JumpIfTrue => "jump_if_true",
            OpCode::JumpIfFalseRetain => "jump_if_false_retain",
            OpCode::JumpIfTrueRetain => "jump_if_true_retain",
        }
    }
}
