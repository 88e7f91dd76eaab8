//! Static value types.
//!
//! Every expression has a [`TypeDef`] resolved at compile time. Nothing is
//! checked again at run time, so the compatibility rules here are what keep
//! the virtual machine from ever seeing a value of the wrong kind.

use std::fmt;

/// The kind of value an expression produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value, only valid as a native function return type.
    Void,
    Null,
    Number,
    Boolean,
    String,
    /// Produced by the type parser for unknown names.
    Error,
}

impl ValueKind {
    /// Look up a kind by its source name.
    pub fn from_name(name: &str) -> Option<ValueKind> {
        match name {
            "void" => Some(ValueKind::Void),
            "null" => Some(ValueKind::Null),
            "number" => Some(ValueKind::Number),
            "bool" => Some(ValueKind::Boolean),
            "string" => Some(ValueKind::String),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Null => "null",
            ValueKind::Number => "number",
            ValueKind::Boolean => "bool",
            ValueKind::String => "string",
            ValueKind::Error => "<error>",
        }
    }
}

/// A value kind plus the optional (`?`) modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDef {
    pub kind: ValueKind,
    /// Whether `null` may stand in for a value of `kind`.
    pub optional: bool,
}

impl TypeDef {
    pub const VOID: TypeDef = TypeDef::new(ValueKind::Void);
    pub const NULL: TypeDef = TypeDef::new(ValueKind::Null);
    pub const NUMBER: TypeDef = TypeDef::new(ValueKind::Number);
    pub const BOOLEAN: TypeDef = TypeDef::new(ValueKind::Boolean);
    pub const STRING: TypeDef = TypeDef::new(ValueKind::String);
    pub const ERROR: TypeDef = TypeDef::new(ValueKind::Error);

    /// A non-optional type of the given kind.
    pub const fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// The optional variant of this type.
    pub const fn optional(self) -> Self {
        Self {
            kind: self.kind,
            optional: true,
        }
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.kind == ValueKind::Void
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == ValueKind::Error
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.kind == ValueKind::Null
    }

    /// A number that can never be `null`.
    #[inline]
    pub fn is_number(&self) -> bool {
        *self == TypeDef::NUMBER
    }

    /// A boolean that can never be `null`.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        *self == TypeDef::BOOLEAN
    }

    /// A string that can never be `null`.
    #[inline]
    pub fn is_string(&self) -> bool {
        *self == TypeDef::STRING
    }

    /// Whether a value of type `value` may be stored where `self` is expected.
    ///
    /// `null` fits any optional target. Otherwise the kinds must match and an
    /// optional value only fits an optional target: `number` does not accept
    /// `number?`. Nothing is checked at run time, so letting a possibly-null
    /// value into a definite slot would hand `null` to arithmetic or to a
    /// native expecting a value.
    pub fn accepts(&self, value: TypeDef) -> bool {
        if value.is_void() || value.is_error() {
            return false;
        }
        if value.is_null() {
            return self.optional || self.is_null();
        }
        self.kind == value.kind && (self.optional || !value.optional)
    }

    /// Whether `==` and `!=` are defined between the two types.
    ///
    /// Matching kinds always compare. `null` only compares with `null` or
    /// an optional type.
    pub fn comparable(lhs: TypeDef, rhs: TypeDef) -> bool {
        if lhs.is_void() || rhs.is_void() || lhs.is_error() || rhs.is_error() {
            return false;
        }
        if lhs.kind == rhs.kind {
            return true;
        }
        (lhs.is_null() && rhs.optional) || (rhs.is_null() && lhs.optional)
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}
