//! `sys.shards` rows for shards that aren't started anywhere

pub mod recovery;
pub mod row_context;
pub mod unassigned;

pub use recovery::{RecoveryIndex, RecoveryStage, RecoveryState, RecoveryType, ShardRecoveryExpression};
pub use row_context::UnassignedShardRowContext;
pub use unassigned::{ShardState, UnassignedShard};
