use serde_derive::Serialize;

use crate::data::query::{QueryError, QueryExecutionError};
use crate::data::value as r;

/// The result of running a query: the data tree, if any of it could be
/// produced, plus the errors collected along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<r::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<QueryError>>,
}

impl QueryResult {
    pub fn new(data: Option<r::Value>) -> Self {
        QueryResult { data, errors: None }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}

impl From<QueryError> for QueryResult {
    fn from(e: QueryError) -> Self {
        QueryResult {
            data: None,
            errors: Some(vec![e]),
        }
    }
}

impl From<Vec<QueryError>> for QueryResult {
    fn from(errors: Vec<QueryError>) -> Self {
        QueryResult {
            data: None,
            errors: if errors.is_empty() {
                None
            } else {
                Some(errors)
            },
        }
    }
}

impl From<QueryExecutionError> for QueryResult {
    fn from(e: QueryExecutionError) -> Self {
        QueryResult::from(QueryError::from(e))
    }
}

impl From<Vec<QueryExecutionError>> for QueryResult {
    fn from(errors: Vec<QueryExecutionError>) -> Self {
        QueryResult::from(
            errors
                .into_iter()
                .map(QueryError::from)
                .collect::<Vec<_>>(),
        )
    }
}

impl From<r::Object> for QueryResult {
    fn from(object: r::Object) -> Self {
        QueryResult::new(Some(r::Value::Object(object)))
    }
}

#[cfg(test)]
mod tests {
    use super::QueryResult;
    use crate::data::query::{QueryError, QueryExecutionError, ResponsePath};
    use crate::data::value as r;
    use graphql_parser::Pos;

    #[test]
    fn serializes_data_and_errors() {
        let mut object = r::Object::new();
        object.insert("tutorial".to_owned(), r::Value::Null);
        let mut path = ResponsePath::new();
        path.push_field("tutorial");
        path.push_field("Title");
        let result = QueryResult {
            data: Some(r::Value::Object(object)),
            errors: Some(vec![QueryError::at_path(
                QueryExecutionError::NonNullError(Pos { line: 2, column: 9 }, "Title".to_owned()),
                path,
            )]),
        };

        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "data": { "tutorial": null },
                "errors": [{
                    "message": "Null value resolved for non-null field: Title",
                    "locations": [{ "line": 2, "column": 9 }],
                    "path": ["tutorial", "Title"],
                }]
            })
        );
    }

    #[test]
    fn omits_data_for_request_errors() {
        let result = QueryResult::from(QueryExecutionError::OperationNameRequired);

        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "errors": [{ "message": "Operation name required" }]
            })
        );
    }
}
