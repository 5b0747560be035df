//! Stats module - typed frames and correlation

mod calculator;
mod frame;

pub use calculator::{CorrelationMatrix, StatsCalculator};
pub use frame::{Frame, FrameError};
