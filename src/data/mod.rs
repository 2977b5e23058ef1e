/// Data types for dealing with GraphQL queries.
pub mod query;

/// Data types for dealing with GraphQL values.
pub mod graphql;

/// The runtime value space query results are built from.
pub mod value;
