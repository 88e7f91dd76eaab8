//! Run-time values.
//!
//! Scalars are plain copies. Strings live in shared, reference-counted
//! buffers: cloning a [`Value`] acquires a reference and dropping it releases
//! one, so a buffer is freed exactly when the last value pointing at it goes
//! away.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::{TypeDef, ValueKind};

thread_local! {
    static LIVE_STRINGS: Cell<usize> = const { Cell::new(0) };
}

/// Number of string buffers currently alive on this thread.
pub fn live_strings() -> usize {
    LIVE_STRINGS.with(Cell::get)
}

struct StringBuffer {
    text: Box<str>,
}

impl StringBuffer {
    fn new(text: Box<str>) -> Self {
        LIVE_STRINGS.with(|live| live.set(live.get() + 1));
        Self { text }
    }
}

impl Drop for StringBuffer {
    fn drop(&mut self) {
        LIVE_STRINGS.with(|live| live.set(live.get() - 1));
    }
}

/// An immutable string shared between values.
#[derive(Clone)]
pub struct ScriptString(Rc<StringBuffer>);

impl ScriptString {
    /// Allocate a new buffer holding a copy of `text`.
    pub fn new(text: &str) -> Self {
        Self(Rc::new(StringBuffer::new(text.into())))
    }

    /// Allocate a new buffer holding `self` followed by `other`.
    pub fn concat(&self, other: &ScriptString) -> Self {
        let mut text = String::with_capacity(self.len() + other.len());
        text.push_str(self.as_str());
        text.push_str(other.as_str());
        Self(Rc::new(StringBuffer::new(text.into_boxed_str())))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.text.is_empty()
    }

    /// Number of values currently sharing this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Whether both strings share one buffer.
    #[inline]
    pub fn ptr_eq(&self, other: &ScriptString) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ScriptString {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.as_str() == other.as_str()
    }
}

impl Eq for ScriptString {}

impl fmt::Debug for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for ScriptString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ScriptString {
    fn from(text: &str) -> Self {
        ScriptString::new(text)
    }
}

/// A value on the virtual machine stack.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Boolean(bool),
    String(ScriptString),
}

impl Value {
    /// Allocate a string value.
    pub fn string(text: &str) -> Self {
        Value::String(ScriptString::new(text))
    }

    /// Acquire another reference to this value.
    #[inline]
    pub fn reference(&self) -> Value {
        self.clone()
    }

    /// Release this reference, freeing a string buffer when it was the last.
    #[inline]
    pub fn release(self) {
        drop(self)
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
        }
    }

    /// The static type of a literal holding this value.
    pub fn type_def(&self) -> TypeDef {
        TypeDef::new(self.kind())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&ScriptString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_string().map(ScriptString::as_str)
    }
}

/// Script equality: same kind and same contents. Values of different kinds
/// are never equal, and `null` equals only `null`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s.as_str()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::string(text)
    }
}

impl From<ScriptString> for Value {
    fn from(s: ScriptString) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_and_release_balance() {
        let baseline = live_strings();
        let value = Value::string("shared");
        assert_eq!(live_strings(), baseline + 1);

        let copy = value.reference();
        assert_eq!(copy.as_string().unwrap().ref_count(), 2);

        copy.release();
        assert_eq!(value.as_string().unwrap().ref_count(), 1);
        assert_eq!(live_strings(), baseline + 1);

        value.release();
        assert_eq!(live_strings(), baseline);
    }

    #[test]
    fn concat_allocates_fresh_buffer() {
        let baseline = live_strings();
        let a = ScriptString::new("foo");
        let b = ScriptString::new("bar");
        let joined = a.concat(&b);
        assert_eq!(joined.as_str(), "foobar");
        assert!(!joined.ptr_eq(&a));
        assert_eq!(live_strings(), baseline + 3);
        drop((a, b, joined));
        assert_eq!(live_strings(), baseline);
    }

    #[test]
    fn equality_follows_kinds() {
        assert_eq!(Value::Null, Value::Null);
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_ne!(Value::string("a"), Value::string("b"));
        assert_ne!(Value::Number(0.0), Value::Boolean(false));
        assert_ne!(Value::Null, Value::Number(0.0));
    }

    #[test]
    fn display_matches_script_syntax() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::string("hi").to_string(), "hi");
    }

    #[test]
    fn literal_types() {
        assert_eq!(Value::Number(1.0).type_def(), TypeDef::NUMBER);
        assert_eq!(Value::Null.type_def(), TypeDef::NULL);
        assert_eq!(Value::string("").type_def(), TypeDef::STRING);
    }
}
