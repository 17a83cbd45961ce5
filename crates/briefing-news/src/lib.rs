//! Briefing News — feed fetching, article text, and limit-up heuristics.

pub mod article;
pub mod briefing;
pub mod error;
pub mod feed;
pub mod heuristics;
pub mod http;
pub mod source;

pub use briefing::{build_briefing, build_news_section, collect_limit_up};
pub use error::{NewsError, Result};
pub use source::{GoogleNewsClient, HeadlineSource};
