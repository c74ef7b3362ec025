//! Request shaping: wire bodies, URIs and the request planner

pub mod body;
pub mod planner;
pub mod uri;

pub use body::{SearchRequestBody, SuggestRequestBody};
pub use planner::{plan, plan_suggest, QueryPlan, SearchPlan, SuggestPlan};
pub use uri::{search_uri, suggest_uri};
