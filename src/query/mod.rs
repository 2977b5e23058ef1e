use std::time::Instant;

use graphql_parser::Style;
use slog::{info, o, Logger};
use uuid::Uuid;

use crate::data::graphql::q;
use crate::data::query::{Query, QueryExecutionError, QueryResult};
use crate::data::value as r;
use crate::execution::*;
use crate::query::ast as qast;

/// Utilities for working with GraphQL query ASTs.
pub mod ast;

/// Options available for query execution.
pub struct QueryExecutionOptions<C> {
    /// The logger to use during query execution.
    pub logger: Logger,

    /// The context value handed to every resolver.
    pub context: C,

    /// The value the root selection set starts from. Root fields without
    /// a resolver read their values off this object.
    pub root_value: r::Value,

    /// Time at which the query times out.
    pub deadline: Option<Instant>,
}

/// Executes a query and returns a result.
///
/// The operation to run is picked through the query's operation name;
/// a document with a single operation needs no name. Queries run against
/// the schema's root query type and mutations against its root mutation
/// type, with the root fields of a mutation executing in the order the
/// document lists them.
pub fn execute_query<C>(query: Query<C>, options: QueryExecutionOptions<C>) -> QueryResult {
    let query_id = Uuid::new_v4().to_string();
    let query_logger = options.logger.new(o!(
        "query_id" => query_id
    ));

    // Obtain the operation to execute (fail if the name picks out no
    // operation, or if there are several and no name)
    let operation = match qast::get_operation(&query.document, query.operation_name.as_deref()) {
        Ok(op) => op,
        Err(e) => return QueryResult::from(e),
    };

    // Parse variable values
    let coerced_variable_values = match coerce_variable_values(operation, &query.variables) {
        Ok(values) => values,
        Err(errors) => return QueryResult::from(errors),
    };

    // Create a fresh execution context
    let ctx = ExecutionContext {
        logger: query_logger.clone(),
        schema: query.schema.as_ref(),
        document: &query.document,
        context: &options.context,
        variable_values: coerced_variable_values,
        deadline: options.deadline,
    };

    let (root_type, selection_set) = match operation {
        // Execute top-level `query { ... }` and `{ ... }` expressions
        // against the root query type.
        q::OperationDefinition::Query(q::Query { selection_set, .. })
        | q::OperationDefinition::SelectionSet(selection_set) => {
            match ctx.schema.query_type() {
                Some(root_type) => (root_type, selection_set),
                None => return QueryResult::from(QueryExecutionError::NoRootQueryObjectType),
            }
        }

        // Execute mutations against the root mutation type.
        q::OperationDefinition::Mutation(mutation) => match ctx.schema.mutation_type() {
            Some(root_type) => (root_type, &mutation.selection_set),
            None => return QueryResult::from(QueryExecutionError::NoRootMutationObjectType),
        },

        q::OperationDefinition::Subscription(_) => {
            return QueryResult::from(QueryExecutionError::NotSupported(
                "Subscriptions are not supported".to_owned(),
            ));
        }
    };

    let start = Instant::now();
    let result = execute_root_selection_set(&ctx, selection_set, root_type, &options.root_value);
    info!(
        query_logger,
        "Query timing (GraphQL)";
        "query" => query.document.format(&Style::default().indent(0)).replace('\n', " "),
        "variables" => serde_json::to_string(&query.variables).unwrap_or_default(),
        "query_time_ms" => start.elapsed().as_millis(),
    );

    result
}
