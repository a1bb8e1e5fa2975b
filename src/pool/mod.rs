pub mod calculator;
pub mod snapshot;

pub use snapshot::LiquiditySnapshotProvider;
