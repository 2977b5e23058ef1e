mod error;
mod query;
mod result;

pub use self::error::{PathSegment, QueryError, QueryExecutionError, ResponsePath};
pub use self::query::{Query, QueryVariables};
pub use self::result::QueryResult;
