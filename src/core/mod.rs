pub mod etl;
pub mod output;
pub mod pipeline;
pub mod roster;
pub mod stats;

pub use crate::domain::model::{Roster, StatsReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
