//! File I/O built-ins available to programs under both backends.
//!
//! The interpreter calls these directly; generated C++ links against the
//! equivalent `Builtins.cpp` emitted by the code generator.
use std::fs;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    ReadFile,
    WriteFile,
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "readFile" => Some(Self::ReadFile),
            "writeFile" => Some(Self::WriteFile),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ReadFile => "readFile",
            Self::WriteFile => "writeFile",
        }
    }

    /// Number of string arguments the built-in requires.
    pub fn arity(self) -> usize {
        match self {
            Self::ReadFile => 1,
            Self::WriteFile => 2,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuiltinError {
    #[error("Could not open file: {path} ({reason})")]
    Read { path: String, reason: String },
    #[error("Could not write to file: {path} ({reason})")]
    Write { path: String, reason: String },
}

/// Reads the whole file. Bytes that are not valid UTF-8 become U+FFFD
/// instead of failing, so only an unopenable file is an error.
pub fn read_file(path: impl AsRef<Path>) -> Result<String, BuiltinError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|error| BuiltinError::Read {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_file(path: impl AsRef<Path>, content: &str) -> Result<(), BuiltinError> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|error| BuiltinError::Write {
        path: path.display().to_string(),
        reason: error.to_string(),
    })
}
