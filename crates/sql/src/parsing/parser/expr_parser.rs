//! Value expression parser module
//!
//! DDL values are literals, placeholders, array literals, or a negated value.
//! There are no operators beyond unary sign.

use super::super::Token;
use super::literal_parser::LiteralParser;
use crate::error::{Error, Result};
use crate::parsing::ast::{Expression, Literal};

/// Parser trait for value expressions
pub trait ExpressionParser: LiteralParser {
    /// Allocates the position of the next `?` placeholder.
    fn increment_param_count(&mut self) -> usize;

    /// Parses a value expression.
    fn parse_expression(&mut self) -> Result<Expression> {
        let token = self.next()?;
        match token {
            Token::Question => Ok(Expression::Parameter(self.increment_param_count())),
            Token::Placeholder(position) => Ok(Expression::Parameter(position - 1)),
            Token::OpenBracket => {
                let mut items = Vec::new();
                if !self.next_is(Token::CloseBracket) {
                    loop {
                        items.push(self.parse_expression()?);
                        if !self.next_is(Token::Comma) {
                            break;
                        }
                    }
                    self.expect(Token::CloseBracket)?;
                }
                Ok(Expression::ArrayLiteral(items))
            }
            Token::Plus => self.parse_expression(),
            Token::Minus => Ok(match self.parse_expression()? {
                Expression::Literal(Literal::Integer(i)) => Literal::Integer(-i).into(),
                Expression::Literal(Literal::Float(f)) => Literal::Float(-f).into(),
                other => Expression::Negate(Box::new(other)),
            }),
            token => self.parse_literal(&token)?.ok_or_else(|| {
                Error::ParseError(format!("expected value, found {}", token))
            }),
        }
    }
}
