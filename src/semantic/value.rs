use std::fmt;

/// A literal value: constant definitions, literal nodes, case labels.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Str(String),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Negated copy of a numeric value; strings are returned unchanged.
    pub fn negated(&self) -> Value {
        match self {
            Value::Integer(value) => Value::Integer(-value),
            Value::Real(value) => Value::Real(-value),
            Value::Str(value) => Value::Str(value.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Real(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "'{}'", value),
        }
    }
}
