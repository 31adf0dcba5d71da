#![forbid(unsafe_code)]

mod error;
mod parser;
mod spec;

pub use error::QuerySpecError;
pub use parser::{
    parse_filter, parse_query_pairs, parse_query_spec, parse_sort, parse_view, request_path,
    PARAM_FILTER, PARAM_PAGE, PARAM_PAGE_SIZE, PARAM_SORT, PARAM_VIEW,
};
pub use spec::{
    FilterOperator, FilterPredicate, QuerySpec, Scalar, SortDirection, SortField, ViewSpec,
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

pub const CRATE_NAME: &str = "bijux-probe-query";
