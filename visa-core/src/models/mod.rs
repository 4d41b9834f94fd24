mod estimator_input;
mod estimator_output;
mod fee_schedule;
mod household;
mod theme;

pub use estimator_input::EstimatorInput;
pub use estimator_output::EstimatorOutput;
pub use fee_schedule::{FeeSchedule, FeeScheduleError};
pub use household::Household;
pub use theme::Theme;
