use std::collections::HashSet;
use std::fmt;

use crate::ast::{Expression, FunctionDecl};

/// C++ type chosen for a function result, parameter or class field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Text,
    Numeric,
}

impl TargetType {
    pub fn cpp_name(self) -> &'static str {
        match self {
            TargetType::Text => "std::string",
            TargetType::Numeric => "int",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cpp_name())
    }
}

/// Decides the static C++ types of untyped program entities.
///
/// Every parameter of one function shares a single type.
pub trait TypePolicy {
    fn return_type(&self, function: &FunctionDecl) -> TargetType;
    fn parameter_type(&self, function: &FunctionDecl) -> TargetType;
    fn field_type(&self, initializer: &Expression) -> TargetType;
}

/// Name-based policy: functions on the text lists get `std::string`,
/// everything else is `int`.
#[derive(Debug, Clone)]
pub struct NameListPolicy {
    text_functions: HashSet<String>,
    text_parameters: HashSet<String>,
}

impl NameListPolicy {
    /// A policy with empty allow-lists: every function and parameter is numeric.
    pub fn empty() -> Self {
        Self {
            text_functions: HashSet::new(),
            text_parameters: HashSet::new(),
        }
    }

    /// Functions whose return type is text.
    pub fn with_text_function(mut self, name: impl Into<String>) -> Self {
        self.text_functions.insert(name.into());
        self
    }

    /// Functions whose parameters are all text.
    pub fn with_text_parameters(mut self, name: impl Into<String>) -> Self {
        self.text_parameters.insert(name.into());
        self
    }
}

impl Default for NameListPolicy {
    fn default() -> Self {
        Self::empty()
            .with_text_function("greet")
            .with_text_function("setName")
            .with_text_function("bark")
            .with_text_parameters("setName")
    }
}

impl TypePolicy for NameListPolicy {
    fn return_type(&self, function: &FunctionDecl) -> TargetType {
        if self.text_functions.contains(&function.name) {
            TargetType::Text
        } else {
            TargetType::Numeric
        }
    }

    fn parameter_type(&self, function: &FunctionDecl) -> TargetType {
        if self.text_parameters.contains(&function.name) {
            TargetType::Text
        } else {
            TargetType::Numeric
        }
    }

    fn field_type(&self, initializer: &Expression) -> TargetType {
        match initializer {
            Expression::String(_) => TargetType::Text,
            _ => TargetType::Numeric,
        }
    }
}
