use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Unknown statement type in class body of '{class}': {kind}")]
    InvalidClassMember { class: String, kind: &'static str },
    #[error("Unsupported statement in code generator: nested {kind}")]
    UnsupportedStatement { kind: &'static str },
}
