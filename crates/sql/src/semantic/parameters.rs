//! Parameter binding
//!
//! Parameters are passed separately from the statement: either one argument
//! row, or a batch of rows for bulk execution. The statement itself is never
//! rewritten; placeholders are resolved against a row when a value is needed.

use std::collections::BTreeMap;

use strata_value::{Row, RowN, Value};

use crate::error::{Error, Result};
use crate::parsing::ast::{Expression, GenericProperties, Literal};

/// Arguments for one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterContext {
    row: RowN,
    bulk: Vec<RowN>,
}

impl ParameterContext {
    /// A single argument row, or an empty row plus bulk rows.
    pub fn new(row: RowN, bulk: Vec<RowN>) -> Result<Self> {
        if !row.is_empty() && !bulk.is_empty() {
            return Err(Error::InvalidBulkArguments(
                "cannot mix a parameter row with bulk parameter rows".into(),
            ));
        }
        if let Some(first) = bulk.first() {
            if let Some((index, row)) = bulk
                .iter()
                .enumerate()
                .find(|(_, row)| row.size() != first.size())
            {
                return Err(Error::InvalidBulkArguments(format!(
                    "row {} has {} arguments, expected {}",
                    index,
                    row.size(),
                    first.size()
                )));
            }
        }
        Ok(Self { row, bulk })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(row: RowN) -> Self {
        Self {
            row,
            bulk: Vec::new(),
        }
    }

    pub fn bulk(rows: Vec<RowN>) -> Result<Self> {
        Self::new(RowN::EMPTY, rows)
    }

    pub fn is_bulk(&self) -> bool {
        !self.bulk.is_empty()
    }

    pub fn row(&self) -> &RowN {
        &self.row
    }

    pub fn bulk_rows(&self) -> &[RowN] {
        &self.bulk
    }
}

/// Resolves expressions against one argument row.
#[derive(Debug, Clone, Copy)]
pub struct Binder<'a> {
    row: &'a RowN,
}

impl<'a> Binder<'a> {
    pub fn new(row: &'a RowN) -> Self {
        Self { row }
    }

    /// Evaluate an expression to a value.
    pub fn bind(&self, expr: &Expression) -> Result<Value> {
        match expr {
            Expression::Literal(literal) => Ok(literal_value(literal)),
            Expression::Parameter(index) => {
                self.row
                    .get(*index)
                    .cloned()
                    .ok_or(Error::ParameterOutOfRange {
                        position: index + 1,
                        provided: self.row.size(),
                    })
            }
            Expression::ArrayLiteral(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| self.bind(item))
                    .collect::<Result<_>>()?,
            )),
            Expression::Negate(inner) => negate(self.bind(inner)?),
        }
    }

    /// Evaluate every property value, keeping the sorted key order.
    pub fn bind_properties(&self, properties: &GenericProperties) -> Result<BTreeMap<String, Value>> {
        properties
            .iter()
            .map(|(name, expr)| Ok((name.clone(), self.bind(expr)?)))
            .collect()
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Integer(i) => Value::I64(*i),
        Literal::Float(f) => Value::F64(*f),
        Literal::String(s) => Value::Str(s.clone()),
    }
}

fn negate(value: Value) -> Result<Value> {
    let overflow = || Error::InvalidArgument("integer overflow in negation".into());
    Ok(match value {
        Value::Null => Value::Null,
        Value::I8(i) => Value::I8(i.checked_neg().ok_or_else(overflow)?),
        Value::I16(i) => Value::I16(i.checked_neg().ok_or_else(overflow)?),
        Value::I32(i) => Value::I32(i.checked_neg().ok_or_else(overflow)?),
        Value::I64(i) => Value::I64(i.checked_neg().ok_or_else(overflow)?),
        Value::F32(f) => Value::F32(-f),
        Value::F64(f) => Value::F64(-f),
        other => {
            return Err(Error::InvalidArgument(format!(
                "cannot negate a value of type {}",
                other.type_name()
            )));
        }
    })
}
