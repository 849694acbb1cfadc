//! Research grounding: when to search and what a search hit looks like.

pub mod gate;
pub mod source;

pub use gate::{MAX_RESEARCH_RESULTS, RESEARCH_KEYWORDS, research_query, should_research};
pub use source::ResearchSource;
