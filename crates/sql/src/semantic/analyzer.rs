//! Statement analyzer
//!
//! Turns a parsed statement into an [`AnalyzedStatement`] bound against the
//! catalog, the session and the caller's parameters. The analyzer holds only
//! read-only state, so one instance can serve many threads at once.

use std::collections::HashMap;
use std::sync::Arc;

use strata_value::RowN;
use tracing::{debug, trace};

use super::ddl::{
    AnalysisContext, Prepared, PreparedAlterTable, PreparedCreateBlobTable, PreparedDropTable,
};
use super::ddl::create_table::CreateTable;
use super::parameters::ParameterContext;
use super::statement::AnalyzedStatement;
use crate::config::AnalyzerConfig;
use crate::error::{Error, Result};
use crate::metadata::Catalog;
use crate::parsing::ast::{DdlStatement, Statement};
use crate::session::SessionContext;

/// Rows of a bulk batch that bound to the same statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkGroup {
    /// Indexes into the bulk rows, ascending.
    pub rows: Vec<usize>,
    pub statement: AnalyzedStatement,
}

/// Result of analyzing a statement against bulk parameter rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAnalysis {
    statements: Vec<AnalyzedStatement>,
    groups: Vec<BulkGroup>,
}

impl BulkAnalysis {
    /// Every statement must come from the same prepared statement, so only
    /// their bound parts are compared.
    fn new(statements: Vec<AnalyzedStatement>) -> Self {
        let groups = {
            let mut groups: Vec<BulkGroup> = Vec::new();
            let mut by_key = HashMap::new();
            for (row, statement) in statements.iter().enumerate() {
                let group = *by_key.entry(statement.bound_key()).or_insert_with(|| {
                    groups.push(BulkGroup {
                        rows: Vec::new(),
                        statement: statement.clone(),
                    });
                    groups.len() - 1
                });
                groups[group].rows.push(row);
            }
            groups
        };
        Self { statements, groups }
    }

    /// One statement per bulk row, in row order.
    pub fn statements(&self) -> &[AnalyzedStatement] {
        &self.statements
    }

    pub fn statement(&self, row: usize) -> Option<&AnalyzedStatement> {
        self.statements.get(row)
    }

    /// Distinct statements, in order of first appearance.
    pub fn groups(&self) -> &[BulkGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Outcome of [`Analyzer::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Single(AnalyzedStatement),
    Bulk(BulkAnalysis),
}

impl Analysis {
    pub fn into_single(self) -> Option<AnalyzedStatement> {
        match self {
            Analysis::Single(statement) => Some(statement),
            Analysis::Bulk(_) => None,
        }
    }

    pub fn into_bulk(self) -> Option<BulkAnalysis> {
        match self {
            Analysis::Single(_) => None,
            Analysis::Bulk(bulk) => Some(bulk),
        }
    }

    /// Every bound statement: the single one, or one per bulk row.
    pub fn statements(&self) -> &[AnalyzedStatement] {
        match self {
            Analysis::Single(statement) => std::slice::from_ref(statement),
            Analysis::Bulk(bulk) => bulk.statements(),
        }
    }
}

/// Analyzes DDL statements against a catalog snapshot.
pub struct Analyzer {
    catalog: Arc<dyn Catalog>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self::with_config(catalog, AnalyzerConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn Catalog>, config: AnalyzerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a statement.
    ///
    /// With bulk parameters the statement is prepared once and bound once
    /// per row. A row that fails to bind fails the whole analysis, reported
    /// with its row index.
    pub fn analyze(
        &self,
        statement: &Statement,
        session: &SessionContext,
        params: &ParameterContext,
    ) -> Result<Analysis> {
        let ctx = AnalysisContext {
            catalog: self.catalog.as_ref(),
            session,
            config: &self.config,
        };
        let prepared = prepare(&ctx, statement)?;
        debug!(
            kind = %prepared.kind(),
            bulk = params.is_bulk(),
            user = session.user(),
            "analyzing statement"
        );

        if !params.is_bulk() {
            let analyzed = prepared.bind(&ctx, params.row())?;
            log_outcome(&analyzed);
            return Ok(Analysis::Single(analyzed));
        }

        let statements = params
            .bulk_rows()
            .iter()
            .enumerate()
            .map(|(index, row)| bind_row(&ctx, &prepared, index, row))
            .collect::<Result<Vec<_>>>()?;
        let bulk = BulkAnalysis::new(statements);
        debug!(
            rows = bulk.len(),
            groups = bulk.groups().len(),
            "grouped bulk rows"
        );
        Ok(Analysis::Bulk(bulk))
    }

    /// Analyze with a single argument row and return the one statement.
    pub fn analyze_single(
        &self,
        statement: &Statement,
        session: &SessionContext,
        row: RowN,
    ) -> Result<AnalyzedStatement> {
        match self.analyze(statement, session, &ParameterContext::single(row))? {
            Analysis::Single(statement) => Ok(statement),
            Analysis::Bulk(_) => Err(Error::InvalidBulkArguments(
                "single-row analysis produced a bulk result".into(),
            )),
        }
    }
}

fn prepare<'s>(ctx: &AnalysisContext<'_>, statement: &'s Statement) -> Result<Prepared<'s>> {
    let Statement::Ddl(ddl) = statement;
    Ok(match ddl {
        DdlStatement::CreateTable {
            name,
            columns,
            primary_key,
            clustered,
            partitioned_by,
            properties,
            if_not_exists,
        } => Prepared::CreateTable(
            CreateTable {
                name,
                columns,
                primary_key,
                clustered: clustered.as_ref(),
                partitioned_by,
                properties,
                if_not_exists: *if_not_exists,
            }
            .prepare(ctx)?,
        ),
        DdlStatement::CreateBlobTable {
            name,
            number_of_shards,
            properties,
            if_not_exists,
        } => Prepared::CreateBlobTable(PreparedCreateBlobTable::prepare(
            ctx,
            name,
            number_of_shards.as_ref(),
            properties,
            *if_not_exists,
        )?),
        DdlStatement::DropTable {
            name,
            blob,
            if_exists,
        } => Prepared::DropTable(PreparedDropTable::prepare(ctx, name, *blob, *if_exists)?),
        DdlStatement::AlterTable {
            name,
            blob,
            only,
            partition,
            operation,
        } => Prepared::AlterTable(PreparedAlterTable::prepare(
            ctx,
            name,
            *blob,
            *only,
            partition.as_deref(),
            operation,
        )?),
    })
}

fn bind_row(
    ctx: &AnalysisContext<'_>,
    prepared: &Prepared<'_>,
    index: usize,
    row: &RowN,
) -> Result<AnalyzedStatement> {
    let analyzed = prepared
        .bind(ctx, row)
        .map_err(|err| Error::BulkArgumentRow {
            row: index,
            source: Box::new(err),
        })?;
    trace!(row = index, table = %analyzed.table_ident(), "bound bulk row");
    Ok(analyzed)
}

fn log_outcome(analyzed: &AnalyzedStatement) {
    if analyzed.is_no_op() {
        debug!(
            kind = %analyzed.kind(),
            table = %analyzed.table_ident(),
            "statement is a no-op"
        );
    }
}
