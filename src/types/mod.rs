//! Public types for the reelsearch API.

mod filters;
mod movie;
mod request;

pub use filters::{
    DEFAULT_RESULT_SIZE, HybridWeights, NO_OP_YEAR_FLOOR, RatingBound, SearchFilters, SearchMode,
    SearchParams, YearRange,
};
pub use movie::{Movie, TextList};
pub use request::{
    BackendFilters, HybridSearchRequest, KeywordSearchRequest, SemanticSearchRequest,
    SummaryRequest, SummaryResponse, VoteAverageBound, YearBounds,
};
