use std::collections::HashMap;
use std::io::{self, Write};

use anyhow::Result;

use crate::ast::{Program, Statement};
use crate::backend::Backend;

mod error;
mod runtime;
mod value;

pub use error::RuntimeError;
pub use value::Value;

use runtime::{Environment, ExecResult, InterpreterRuntime};

/// AST-walking backend that executes programs directly.
///
/// `print` output goes to `W` as soon as it is produced, so a failing
/// program leaves everything printed before the failure in the sink.
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter<Vec<u8>> {
    /// An interpreter that collects program output in memory.
    pub fn capturing() -> Self {
        Self::with_output(Vec::new())
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Self {
            environment: Environment::new(),
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Looks up a binding in the global scope left by the last run.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.environment.global(name)
    }

    /// Runs `program` from a fresh global scope.
    ///
    /// Execution pipeline:
    /// interpret -> exec_statement (top level) -> eval_expression -> eval_call
    /// -> call_function -> exec_block (function body).
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.environment = Environment::new();

        // Register every top-level function first so calls may precede declarations.
        let functions: HashMap<&str, _> = program
            .statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Function(function) => Some((function.name.as_str(), function)),
                _ => None,
            })
            .collect();
        tracing::debug!(functions = functions.len(), "registered functions");

        let mut runtime = InterpreterRuntime {
            environment: &mut self.environment,
            functions,
            output: &mut self.output,
        };
        for statement in &program.statements {
            if matches!(statement, Statement::Function(_)) {
                continue;
            }
            match runtime.exec_statement(statement)? {
                ExecResult::Continue => {}
                ExecResult::Return(_) => return Err(RuntimeError::ReturnOutsideFunction),
            }
        }
        self.output.flush().map_err(|error| RuntimeError::Output {
            reason: error.to_string(),
        })
    }

    #[cfg(test)]
    fn scope_depth(&self) -> usize {
        self.environment.depth()
    }
}

impl Backend for Interpreter<Vec<u8>> {
    fn name(&self) -> &'static str {
        "interpreter"
    }

    fn run(&mut self, program: &Program) -> Result<String> {
        self.output.clear();
        self.interpret(program)?;
        Ok(String::from_utf8(std::mem::take(&mut self.output))?)
    }
}
