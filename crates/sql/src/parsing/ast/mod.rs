//! Abstract Syntax Tree (AST) for DDL statements

pub mod ddl;
pub mod expressions;

pub use ddl::{
    AlterOperation, ClusteredBy, Column, DdlStatement, GenericProperties, IndexMethod, TableName,
};
pub use expressions::{Expression, Literal};

/// SQL statements represented as an Abstract Syntax Tree (AST).
/// Built from raw SQL by the parser, passed to the analyzer which binds it
/// against the catalog and the caller's parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Ddl(DdlStatement),
}

impl Statement {
    /// Highest placeholder position used plus one, i.e. the number of
    /// arguments a parameter row must at least carry.
    pub fn parameter_count(&self) -> usize {
        let mut positions = Vec::new();
        let Statement::Ddl(ddl) = self;
        match ddl {
            DdlStatement::CreateTable {
                clustered,
                properties,
                ..
            } => {
                if let Some(shards) = clustered.as_ref().and_then(|c| c.number_of_shards.as_ref()) {
                    shards.collect_parameters(&mut positions);
                }
                properties
                    .values()
                    .for_each(|e| e.collect_parameters(&mut positions));
            }
            DdlStatement::CreateBlobTable {
                number_of_shards,
                properties,
                ..
            } => {
                if let Some(shards) = number_of_shards {
                    shards.collect_parameters(&mut positions);
                }
                properties
                    .values()
                    .for_each(|e| e.collect_parameters(&mut positions));
            }
            DdlStatement::DropTable { .. } => {}
            DdlStatement::AlterTable {
                partition,
                operation,
                ..
            } => {
                for (_, value) in partition.iter().flatten() {
                    value.collect_parameters(&mut positions);
                }
                if let AlterOperation::Set(properties) = operation {
                    properties
                        .values()
                        .for_each(|e| e.collect_parameters(&mut positions));
                }
            }
        }
        positions.into_iter().max().map_or(0, |max| max + 1)
    }
}
