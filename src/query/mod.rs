pub mod builder;
pub mod filter;
pub mod pagination;

pub use builder::{build_filter, build_query, result_order, MosqueQuery, ResultOrder};
pub use filter::{Bounds, Field, FilterExpression, Scalar};
pub use pagination::{Page, Pagination, DEFAULT_PAGE_SIZE};
