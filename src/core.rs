pub mod clock;
pub mod error;
#[cfg(test)]
pub mod fixtures;
pub mod record;
pub mod series;
pub mod status;
pub mod summary;
pub mod window;

pub use self::{
    clock::ClockTime,
    error::InvalidInput,
    record::{Column, HourlyRecord},
    status::Status,
    summary::DailySummary,
    window::ActivityWindow,
};
