use anyhow::Result;

use crate::ast::{BinaryOperator, Block, ClassDecl, Expression, FunctionDecl, Program, Statement};
use crate::backend::Backend;

pub mod cpp_runtime;
mod error;
mod type_policy;

pub use error::GenerationError;
pub use type_policy::{NameListPolicy, TargetType, TypePolicy};

use cpp_runtime::PREAMBLE;

/// Translates a program into a single C++ translation unit.
///
/// Top-level functions become free functions with forward prototypes, classes
/// become C++ classes with public members, and every other top-level
/// statement lands in `main`. The output links against the files in
/// [`cpp_runtime`].
pub struct CodeGenerator<P: TypePolicy = NameListPolicy> {
    policy: P,
}

impl CodeGenerator<NameListPolicy> {
    pub fn new() -> Self {
        Self::with_policy(NameListPolicy::default())
    }
}

impl Default for CodeGenerator<NameListPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TypePolicy> CodeGenerator<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn generate(&self, program: &Program) -> Result<String, GenerationError> {
        let mut functions = Vec::new();
        let mut classes = Vec::new();
        let mut main_statements = Vec::new();
        for statement in &program.statements {
            match statement {
                Statement::Function(function) => functions.push(function),
                Statement::Class(class) => classes.push(class),
                _ => main_statements.push(statement),
            }
        }
        tracing::debug!(
            functions = functions.len(),
            classes = classes.len(),
            main = main_statements.len(),
            "split program"
        );

        let mut output = String::from(PREAMBLE);

        for function in &functions {
            output.push_str(&self.signature(function));
            output.push_str(";\n");
        }
        output.push('\n');

        for class in &classes {
            self.emit_class(class, &mut output)?;
            output.push('\n');
        }

        for function in &functions {
            self.emit_function(function, 0, &mut output)?;
            output.push('\n');
        }

        output.push_str("int main() {\n");
        for statement in main_statements {
            self.emit_statement(statement, 1, &mut output)?;
        }
        output.push_str("    return 0;\n");
        output.push_str("}\n");

        Ok(output)
    }

    fn signature(&self, function: &FunctionDecl) -> String {
        let parameter_type = self.policy.parameter_type(function);
        let params = function
            .params
            .iter()
            .map(|param| format!("{parameter_type} {param}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} {}({params})",
            self.policy.return_type(function),
            function.name
        )
    }

    fn emit_class(&self, class: &ClassDecl, output: &mut String) -> Result<(), GenerationError> {
        let header = match &class.base {
            Some(base) => format!("class {} : public {base} {{", class.name),
            None => format!("class {} {{", class.name),
        };
        push_line(output, 0, &header);
        push_line(output, 0, "public:");
        for member in &class.body.statements {
            match member {
                Statement::Let { name, value } => {
                    let field_type = self.policy.field_type(value);
                    let value = emit_expression(value);
                    push_line(output, 1, &format!("{field_type} {name} = {value};"));
                }
                Statement::Function(method) => self.emit_function(method, 1, output)?,
                other => {
                    return Err(GenerationError::InvalidClassMember {
                        class: class.name.clone(),
                        kind: other.kind_name(),
                    });
                }
            }
        }
        push_line(output, 0, "};");
        Ok(())
    }

    fn emit_function(
        &self,
        function: &FunctionDecl,
        indent: usize,
        output: &mut String,
    ) -> Result<(), GenerationError> {
        push_line(output, indent, &format!("{} {{", self.signature(function)));
        self.emit_body(&function.body, indent + 1, output)?;
        push_line(output, indent, "}");
        Ok(())
    }

    fn emit_body(
        &self,
        block: &Block,
        indent: usize,
        output: &mut String,
    ) -> Result<(), GenerationError> {
        for statement in &block.statements {
            self.emit_statement(statement, indent, output)?;
        }
        Ok(())
    }

    fn emit_statement(
        &self,
        statement: &Statement,
        indent: usize,
        output: &mut String,
    ) -> Result<(), GenerationError> {
        match statement {
            Statement::Let { name, value } => {
                let value = emit_expression(value);
                push_line(output, indent, &format!("auto {name} = {value};"));
            }
            Statement::Print(expr) => {
                let expr = emit_expression(expr);
                push_line(output, indent, &format!("std::cout << {expr} << std::endl;"));
            }
            Statement::Expr(expr) => {
                let expr = emit_expression(expr);
                push_line(output, indent, &format!("{expr};"));
            }
            Statement::Return(value) => {
                let expr = value
                    .as_ref()
                    .map(emit_expression)
                    .unwrap_or_else(|| "0".to_string());
                push_line(output, indent, &format!("return {expr};"));
            }
            Statement::Block(block) => {
                push_line(output, indent, "{");
                self.emit_body(block, indent + 1, output)?;
                push_line(output, indent, "}");
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = emit_expression(condition);
                push_line(output, indent, &format!("if ({condition}) {{"));
                self.emit_body(then_branch, indent + 1, output)?;
                if let Some(else_branch) = else_branch {
                    push_line(output, indent, "} else {");
                    self.emit_body(else_branch, indent + 1, output)?;
                }
                push_line(output, indent, "}");
            }
            Statement::While { condition, body } => {
                let condition = emit_expression(condition);
                push_line(output, indent, &format!("while ({condition}) {{"));
                self.emit_body(body, indent + 1, output)?;
                push_line(output, indent, "}");
            }
            Statement::Function(_) | Statement::Class(_) => {
                return Err(GenerationError::UnsupportedStatement {
                    kind: statement.kind_name(),
                });
            }
        }
        Ok(())
    }
}

fn emit_expression(expr: &Expression) -> String {
    match expr {
        // `f64` display drops the fraction of integral values.
        Expression::Number(value) => format!("{value}"),
        Expression::String(value) => format!("\"{value}\""),
        Expression::Identifier(name) => name.clone(),
        Expression::Assign { name, value } => format!("{name} = {}", emit_expression(value)),
        Expression::Binary { left, op, right } => {
            let left = emit_expression(left);
            let right = emit_expression(right);
            if *op == BinaryOperator::Add && is_quoted(&left) {
                format!("std::string({left}) + {right}")
            } else {
                format!("({left} {} {right})", op.symbol())
            }
        }
        Expression::Unary { op, operand } => {
            format!("({}{})", op.symbol(), emit_expression(operand))
        }
        Expression::Call { callee, args } => {
            format!("{}({})", emit_expression(callee), emit_arguments(args))
        }
        Expression::Member { object, member } => {
            format!("{}->{member}", emit_expression(object))
        }
        Expression::New { class_name, args } => {
            format!("new {class_name}({})", emit_arguments(args))
        }
    }
}

fn emit_arguments(args: &[Expression]) -> String {
    args.iter()
        .map(emit_expression)
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

fn push_line(output: &mut String, indent: usize, line: &str) {
    for _ in 0..indent {
        output.push_str("    ");
    }
    output.push_str(line);
    output.push('\n');
}

impl<P: TypePolicy> Backend for CodeGenerator<P> {
    fn name(&self) -> &'static str {
        "codegen"
    }

    fn run(&mut self, program: &Program) -> Result<String> {
        Ok(self.generate(program)?)
    }
}
