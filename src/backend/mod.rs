use anyhow::Result;

use crate::ast::Program;

pub mod codegen;
pub mod interpreter;

/// Common interface over the two AST consumers.
///
/// `run` returns the text a backend produces for a program: the captured
/// console output for the interpreter, the C++ translation for the code
/// generator.
pub trait Backend {
    fn name(&self) -> &'static str;
    fn run(&mut self, program: &Program) -> Result<String>;
}

pub fn backends() -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(interpreter::Interpreter::capturing()),
        Box::new(codegen::CodeGenerator::new()),
    ]
}
