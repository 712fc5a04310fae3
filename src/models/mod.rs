pub mod run;
pub mod serialization;
pub mod stage;
pub mod step;

pub use run::RunSnapshot;
pub use stage::{StageRecord, StageState, StageType};
pub use step::StepRecord;
