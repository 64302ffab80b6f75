//! MiniLang front end: lexer, parser, a tree-walking interpreter and a C++
//! code generator sharing one AST.
pub mod ast;
pub mod backend;
pub mod builtins;
pub mod lexer;
pub mod parser;

use anyhow::Result;

use crate::ast::Program;

/// Lexes and parses `source` into a program.
pub fn parse_source(source: &str) -> Result<Program> {
    let tokens = lexer::tokenize(source)?;
    Ok(parser::parse_tokens(tokens)?)
}
