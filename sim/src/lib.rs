pub mod config;
pub mod pilot;
pub mod report;

pub use config::{Args, init_tracing};
pub use pilot::{Pilot, pilot_system};
pub use report::{RunReport, report_system};
