pub mod storage;
pub mod types;

pub use storage::{load_season_data, supersede_reuploads};
pub use types::{MemberIndicatorRecord, Season, SeasonData, Snapshot, SnapshotData};
