//! Shard recovery state and its `recovery` object column

use strata_value::Value;

use super::unassigned::UnassignedShard;
use crate::expression::reference::{ObjectFields, ReferenceImplementation, RowContextObjectExpression};

/// Stage a recovering shard is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    Init,
    Index,
    VerifyIndex,
    Translog,
    Finalize,
    Done,
}

impl RecoveryStage {
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryStage::Init => "INIT",
            RecoveryStage::Index => "INDEX",
            RecoveryStage::VerifyIndex => "VERIFY_INDEX",
            RecoveryStage::Translog => "TRANSLOG",
            RecoveryStage::Finalize => "FINALIZE",
            RecoveryStage::Done => "DONE",
        }
    }
}

/// Where a shard recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryType {
    Gateway,
    Snapshot,
    Replica,
    Relocation,
}

impl RecoveryType {
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryType::Gateway => "GATEWAY",
            RecoveryType::Snapshot => "SNAPSHOT",
            RecoveryType::Replica => "REPLICA",
            RecoveryType::Relocation => "RELOCATION",
        }
    }
}

/// File and byte counters of the index recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryIndex {
    pub total_files: u64,
    pub reused_files: u64,
    pub recovered_files: u64,
    pub total_bytes: u64,
    pub reused_bytes: u64,
    pub recovered_bytes: u64,
}

impl RecoveryIndex {
    pub fn recovered_files_percent(&self) -> f32 {
        percent(self.total_files, self.reused_files, self.recovered_files)
    }

    pub fn recovered_bytes_percent(&self) -> f32 {
        percent(self.total_bytes, self.reused_bytes, self.recovered_bytes)
    }
}

/// Share of the units that had to be recovered which are done. Reused units
/// never need recovery.
fn percent(total: u64, reused: u64, recovered: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let to_recover = total.saturating_sub(reused);
    if to_recover == 0 || recovered >= to_recover {
        return 100.0;
    }
    (recovered as f64 * 100.0 / to_recover as f64) as f32
}

/// Progress of a shard recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryState {
    pub stage: RecoveryStage,
    pub recovery_type: RecoveryType,
    /// Elapsed time in milliseconds.
    pub total_time: i64,
    pub index: RecoveryIndex,
}

fn counter(n: u64) -> Value {
    Value::I64(i64::try_from(n).unwrap_or(i64::MAX))
}

fn recovery_fields() -> ObjectFields<RecoveryState> {
    ObjectFields::<RecoveryState>::new()
        .leaf("total_time", |r| Value::I64(r.total_time))
        .leaf("stage", |r| Value::from(r.stage.name()))
        .leaf("type", |r| Value::from(r.recovery_type.name()))
        .object(
            "size",
            ObjectFields::<RecoveryState>::new()
                .leaf("used", |r| counter(r.index.total_bytes))
                .leaf("reused", |r| counter(r.index.reused_bytes))
                .leaf("recovered", |r| counter(r.index.recovered_bytes))
                .leaf("percent", |r| Value::F32(r.index.recovered_bytes_percent())),
        )
        .object(
            "files",
            ObjectFields::<RecoveryState>::new()
                .leaf("used", |r| counter(r.index.total_files))
                .leaf("reused", |r| counter(r.index.reused_files))
                .leaf("recovered", |r| counter(r.index.recovered_files))
                .leaf("percent", |r| Value::F32(r.index.recovered_files_percent())),
        )
}

/// The `recovery` column of an unassigned shard row. Absent entirely while
/// the shard isn't recovering.
pub struct ShardRecoveryExpression {
    inner: RowContextObjectExpression<UnassignedShard, RecoveryState>,
}

impl ShardRecoveryExpression {
    pub fn new() -> Self {
        Self {
            inner: RowContextObjectExpression::new(recovery_fields(), |shard: &UnassignedShard| {
                shard.recovery().cloned()
            }),
        }
    }

    pub fn set_next_row(&mut self, shard: &UnassignedShard) {
        self.inner.set_next_row(shard);
    }

    /// Whether a dotted path below `recovery` names a field.
    pub fn has_path(&self, path: &str) -> bool {
        self.inner.fields().has_path(path)
    }
}

impl Default for ShardRecoveryExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceImplementation for ShardRecoveryExpression {
    fn value(&self) -> Option<Value> {
        self.inner.value()
    }

    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        self.inner.child(name)
    }
}
