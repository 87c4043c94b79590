//! SQL parser module
//!
//! Parses raw DDL strings into a structured Abstract Syntax Tree (AST) for the
//! analyzer. Only the statements the analyzer understands are recognized.

pub mod ast;
mod lexer;
mod parser;

use crate::error::Result;

pub use lexer::{Keyword, Lexer, Token};
pub use parser::Parser;

pub use ast::Statement;

/// Parse a SQL statement string into an AST
pub fn parse_sql(sql: &str) -> Result<Statement> {
    Parser::parse(sql)
}
