//! DDL statement analysis
//!
//! Each statement is analyzed in two steps. `prepare` does everything that
//! doesn't depend on parameters: name resolution, existence checks and the
//! structural checks of the statement. The prepared form keeps references
//! into the syntax tree for the parameter-dependent parts, and `bind` turns
//! it into an [`AnalyzedStatement`] for one argument row. Bulk execution
//! prepares once and binds once per row.

pub mod alter_table;
pub mod create_blob_table;
pub mod create_table;
pub mod drop_table;

use strata_value::RowN;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::metadata::Catalog;
use crate::semantic::resolver::TableResolver;
use crate::semantic::statement::{AnalyzedStatement, StatementKind};
use crate::session::SessionContext;

pub use alter_table::PreparedAlterTable;
pub use create_blob_table::PreparedCreateBlobTable;
pub use create_table::PreparedCreateTable;
pub use drop_table::PreparedDropTable;

/// Read-only inputs shared by every step of one analysis.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub session: &'a SessionContext,
    pub config: &'a AnalyzerConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn resolver(&self) -> TableResolver<'a> {
        TableResolver::new(self.catalog, self.session)
    }
}

/// A statement after structural analysis, ready to bind argument rows.
#[derive(Debug)]
pub enum Prepared<'s> {
    CreateTable(PreparedCreateTable<'s>),
    CreateBlobTable(PreparedCreateBlobTable<'s>),
    DropTable(PreparedDropTable),
    AlterTable(PreparedAlterTable<'s>),
}

impl Prepared<'_> {
    pub fn kind(&self) -> StatementKind {
        match self {
            Prepared::CreateTable(_) => StatementKind::CreateTable,
            Prepared::CreateBlobTable(_) => StatementKind::CreateBlobTable,
            Prepared::DropTable(p) => p.kind(),
            Prepared::AlterTable(p) => p.kind(),
        }
    }

    pub fn bind(&self, ctx: &AnalysisContext<'_>, row: &RowN) -> Result<AnalyzedStatement> {
        match self {
            Prepared::CreateTable(p) => p.bind(ctx, row),
            Prepared::CreateBlobTable(p) => p.bind(ctx, row),
            Prepared::DropTable(p) => Ok(p.bind()),
            Prepared::AlterTable(p) => p.bind(row),
        }
    }
}
