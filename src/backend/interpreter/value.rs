use std::fmt;

/// Runtime value model used by the tree-walking interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn zero() -> Self {
        Value::Number(0.0)
    }

    pub(super) fn from_bool(value: bool) -> Self {
        Value::Number(if value { 1.0 } else { 0.0 })
    }

    /// Numeric view used by arithmetic and comparisons. Strings read as `0`;
    /// there is no runtime type check.
    pub(super) fn as_number(&self) -> f64 {
        match self {
            Value::Number(value) => *value,
            Value::String(_) => 0.0,
        }
    }

    pub(super) fn is_truthy(&self) -> bool {
        match self {
            Value::Number(value) => *value != 0.0,
            Value::String(value) => !value.is_empty(),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::zero()
    }
}

impl fmt::Display for Value {
    /// Numbers use the shortest form that round-trips (`120`, `2.5`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(120.0).to_string(), "120");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
    }

    #[test]
    fn truthiness() {
        assert!(Value::Number(-1.0).is_truthy());
        assert!(!Value::zero().is_truthy());
        assert!(Value::String("x".to_string()).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
    }

    #[test]
    fn strings_read_as_zero() {
        assert_eq!(Value::String("42".to_string()).as_number(), 0.0);
    }
}
