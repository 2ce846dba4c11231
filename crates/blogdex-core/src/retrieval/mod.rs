mod engine;
mod planner;

pub use engine::{
    MatchPolicy, PhaseTiming, prefix_range, search, search_with_timing, substring_match,
};
pub use planner::{plan_query, split_tags, split_terms};
