//! Value expressions appearing in DDL clauses

use std::fmt;

/// Expressions allowed where DDL takes a value: property values, shard
/// counts and partition values.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A literal value.
    Literal(Literal),
    /// A parameter placeholder, with its position (0-indexed).
    Parameter(usize),
    /// Array literal: [1, 2, 3]
    ArrayLiteral(Vec<Expression>),
    /// Unary minus applied to a non-literal, e.g. `-?`.
    Negate(Box<Expression>),
}

/// Expression literal values.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Literal(literal)
    }
}

impl Expression {
    /// Walk the expression and collect every placeholder position it uses.
    pub fn collect_parameters(&self, positions: &mut Vec<usize>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Parameter(idx) => positions.push(*idx),
            Expression::ArrayLiteral(items) => {
                for item in items {
                    item.collect_parameters(positions);
                }
            }
            Expression::Negate(inner) => inner.collect_parameters(positions),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Literal::Null) => write!(f, "NULL"),
            Expression::Literal(Literal::Boolean(b)) => write!(f, "{}", b),
            Expression::Literal(Literal::Integer(i)) => write!(f, "{}", i),
            Expression::Literal(Literal::Float(fl)) => write!(f, "{}", fl),
            Expression::Literal(Literal::String(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expression::Parameter(idx) => write!(f, "${}", idx + 1),
            Expression::ArrayLiteral(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expression::Negate(inner) => write!(f, "-{}", inner),
        }
    }
}
