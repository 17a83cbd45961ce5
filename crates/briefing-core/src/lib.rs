pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod sectors;

pub use config::{BriefingConfig, NewsCategory};
pub use error::{BriefingError, Result};
pub use models::*;
