//! Literal parser module
//!
//! Numeric, string, boolean and null literals.

use super::super::{Keyword, Token};
use super::token_helper::TokenHelper;
use crate::error::{Error, Result};
use crate::parsing::ast::{Expression, Literal};

/// Parser trait for literal values
pub trait LiteralParser: TokenHelper {
    /// Parse a literal value from a token, or None if the token isn't one.
    fn parse_literal(&mut self, token: &Token) -> Result<Option<Expression>> {
        Ok(match token {
            Token::Number(n) if n.chars().all(|c| c.is_ascii_digit()) => Some(
                Literal::Integer(
                    n.parse()
                        .map_err(|e| Error::ParseError(format!("invalid integer {}: {}", n, e)))?,
                )
                .into(),
            ),
            Token::Number(n) => Some(
                Literal::Float(
                    n.parse()
                        .map_err(|e| Error::ParseError(format!("invalid float {}: {}", n, e)))?,
                )
                .into(),
            ),
            Token::String(s) => Some(Literal::String(s.clone()).into()),
            Token::Keyword(Keyword::True) => Some(Literal::Boolean(true).into()),
            Token::Keyword(Keyword::False) => Some(Literal::Boolean(false).into()),
            Token::Keyword(Keyword::Null) => Some(Literal::Null.into()),
            _ => None,
        })
    }
}
