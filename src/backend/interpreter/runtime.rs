use std::collections::HashMap;
use std::io::Write;

use crate::ast::{BinaryOperator, Block, Expression, FunctionDecl, Statement, UnaryOperator};
use crate::builtins::{self, BuiltinFunction};

use super::{RuntimeError, Value};

/// Control-flow marker for statement execution.
pub(super) enum ExecResult {
    Continue,
    Return(Value),
}

/// Stack of lexical scopes. The bottom entry is the global scope and is
/// never popped.
#[derive(Debug)]
pub(super) struct Environment {
    scopes: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub(super) fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub(super) fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub(super) fn global(&self, name: &str) -> Option<&Value> {
        self.scopes.first().and_then(|scope| scope.get(name))
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn declare(&mut self, name: String, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, value);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
            })?;
        *slot = value;
        Ok(())
    }
}

/// Per-run executor: borrows the scope stack and output sink from the owning
/// interpreter and the function bodies from the program being run.
pub(super) struct InterpreterRuntime<'p, 'i, W: Write> {
    pub(super) environment: &'i mut Environment,
    pub(super) functions: HashMap<&'p str, &'p FunctionDecl>,
    pub(super) output: &'i mut W,
}

impl<'p, 'i, W: Write> InterpreterRuntime<'p, 'i, W> {
    /// Runs a block in a fresh scope. The scope is popped whether the block
    /// completes, returns, or fails.
    pub(super) fn exec_block(&mut self, block: &'p Block) -> Result<ExecResult, RuntimeError> {
        self.environment.push_scope();
        let result = self.exec_statements(&block.statements);
        self.environment.pop_scope();
        result
    }

    fn exec_statements(&mut self, statements: &'p [Statement]) -> Result<ExecResult, RuntimeError> {
        for statement in statements {
            if let ExecResult::Return(value) = self.exec_statement(statement)? {
                return Ok(ExecResult::Return(value));
            }
        }
        Ok(ExecResult::Continue)
    }

    pub(super) fn exec_statement(
        &mut self,
        statement: &'p Statement,
    ) -> Result<ExecResult, RuntimeError> {
        match statement {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value)?;
                self.environment.declare(name.clone(), value);
                Ok(ExecResult::Continue)
            }
            Statement::Print(expr) => {
                let value = self.eval_expression(expr)?;
                writeln!(self.output, "{value}").map_err(|error| RuntimeError::Output {
                    reason: error.to_string(),
                })?;
                Ok(ExecResult::Continue)
            }
            Statement::Expr(expr) => {
                self.eval_expression(expr)?;
                Ok(ExecResult::Continue)
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Value::zero(),
                };
                Ok(ExecResult::Return(value))
            }
            Statement::Block(block) => self.exec_block(block),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.exec_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(ExecResult::Continue)
                }
            }
            Statement::While { condition, body } => {
                while self.eval_expression(condition)?.is_truthy() {
                    if let ExecResult::Return(value) = self.exec_block(body)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                Ok(ExecResult::Continue)
            }
            // Top-level functions are registered before execution starts;
            // nested ones are never callable.
            Statement::Function(_) => Ok(ExecResult::Continue),
            Statement::Class(_) => Err(RuntimeError::UnknownStatement {
                kind: statement.kind_name(),
            }),
        }
    }

    fn eval_expression(&mut self, expr: &'p Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Number(value) => Ok(Value::Number(*value)),
            Expression::String(value) => Ok(Value::String(value.clone())),
            Expression::Identifier(name) => self.environment.lookup(name).cloned().ok_or_else(|| {
                RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                }
            }),
            Expression::Assign { name, value } => {
                let value = self.eval_expression(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expression::Binary { left, op, right } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                Ok(eval_binary(*op, &left, &right))
            }
            Expression::Unary { op, operand } => {
                let operand = self.eval_expression(operand)?;
                match op {
                    UnaryOperator::Negate => Ok(Value::Number(-operand.as_number())),
                }
            }
            Expression::Call { callee, args } => self.eval_call(callee, args),
            Expression::Member { .. } | Expression::New { .. } => {
                Err(RuntimeError::UnknownExpression {
                    kind: expr.kind_name(),
                })
            }
        }
    }

    fn eval_call(
        &mut self,
        callee: &'p Expression,
        args: &'p [Expression],
    ) -> Result<Value, RuntimeError> {
        let Expression::Identifier(name) = callee else {
            return Err(RuntimeError::InvalidCallee {
                kind: callee.kind_name(),
            });
        };

        let mut evaluated_args = Vec::with_capacity(args.len());
        for arg in args {
            evaluated_args.push(self.eval_expression(arg)?);
        }

        if let Some(builtin) = BuiltinFunction::from_name(name) {
            return call_builtin(builtin, evaluated_args);
        }

        let function = self.functions.get(name.as_str()).copied().ok_or_else(|| {
            RuntimeError::UndefinedFunction {
                name: name.to_string(),
            }
        })?;
        self.call_function(function, evaluated_args)
    }

    fn call_function(
        &mut self,
        function: &'p FunctionDecl,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        tracing::trace!(function = %function.name, args = args.len(), "call");
        self.environment.push_scope();
        // Missing trailing arguments default to zero; extra ones are dropped.
        let mut args = args.into_iter();
        for param in &function.params {
            self.environment
                .declare(param.clone(), args.next().unwrap_or_default());
        }
        let result = self.exec_block(&function.body);
        self.environment.pop_scope();

        match result? {
            ExecResult::Continue => Ok(Value::zero()),
            ExecResult::Return(value) => Ok(value),
        }
    }
}

fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> Value {
    let (lhs, rhs) = (left.as_number(), right.as_number());
    match op {
        BinaryOperator::Add => match (left, right) {
            (Value::Number(lhs), Value::Number(rhs)) => Value::Number(lhs + rhs),
            _ => Value::String(format!("{left}{right}")),
        },
        BinaryOperator::Sub => Value::Number(lhs - rhs),
        BinaryOperator::Mul => Value::Number(lhs * rhs),
        BinaryOperator::Div => Value::Number(lhs / rhs),
        BinaryOperator::Less => Value::from_bool(lhs < rhs),
        BinaryOperator::LessEqual => Value::from_bool(lhs <= rhs),
        BinaryOperator::Greater => Value::from_bool(lhs > rhs),
        BinaryOperator::GreaterEqual => Value::from_bool(lhs >= rhs),
    }
}

fn call_builtin(builtin: BuiltinFunction, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let arity_mismatch = || RuntimeError::BuiltinArityMismatch {
        name: builtin.name(),
        expected: builtin.arity(),
        found: args.len(),
    };
    if args.len() != builtin.arity() {
        return Err(arity_mismatch());
    }

    let mut strings = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        match arg {
            Value::String(value) => strings.push(value.as_str()),
            Value::Number(_) => {
                return Err(RuntimeError::BuiltinArgumentType {
                    name: builtin.name(),
                    position: index + 1,
                });
            }
        }
    }

    match (builtin, strings.as_slice()) {
        (BuiltinFunction::ReadFile, [path]) => Ok(Value::String(builtins::read_file(path)?)),
        (BuiltinFunction::WriteFile, [path, content]) => {
            builtins::write_file(path, content)?;
            Ok(Value::zero())
        }
        _ => Err(arity_mismatch()),
    }
}
