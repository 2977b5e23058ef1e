/// Common data types: runtime values, queries, results, errors.
pub mod data;

/// The schema registry: object types, field descriptors, and the validated builder.
pub mod schema;

/// Utilities for executing GraphQL.
mod execution;

/// Utilities for executing GraphQL queries and working with query ASTs.
pub mod query;

/// Utilities for working with GraphQL values.
mod values;

/// The in-memory tutorial store and the demo schema wired to it.
pub mod store;

/// Utilities.
pub mod util;

/// Prelude that exports the most important traits and types.
pub mod prelude {
    pub use std::sync::Arc;

    pub use slog::{self, crit, debug, error, info, o, trace, warn, Logger};

    pub use crate::data::graphql::{object_value, q, IntoValue, TryFromValue, ValueMap};
    pub use crate::data::query::{
        PathSegment, Query, QueryError, QueryExecutionError, QueryResult, QueryVariables,
        ResponsePath,
    };
    pub use crate::data::value as r;
    pub use crate::execution::ExecutionContext;
    pub use crate::query::{execute_query, QueryExecutionOptions};
    pub use crate::schema::{
        Field, InputValue, ObjectType, ResolverParams, ScalarType, Schema, SchemaBuilder,
        SchemaError, SchemaValidationError, Type, TypeHandle,
    };
    pub use crate::store::{api_schema, TutorialStore};
    pub use crate::values::MaybeCoercible;
}
