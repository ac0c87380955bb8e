pub mod balance;
pub mod config;
mod error;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod sampling;
pub mod table;


pub use config::{BalanceConfig, ProcessConfig};
pub use error::{DatasetError, Result};
