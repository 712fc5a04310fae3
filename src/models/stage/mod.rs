mod methods;
mod types;


pub use types::{StageRecord, StageState, StageType};
