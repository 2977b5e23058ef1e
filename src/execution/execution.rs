use std::cmp;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use indexmap::IndexMap;
use slog::{debug, Logger};

use crate::data::graphql::q;
use crate::data::query::{
    QueryError, QueryExecutionError, QueryResult, QueryVariables, ResponsePath,
};
use crate::data::value as r;
use crate::query::ast as qast;
use crate::schema::ast as sast;
use crate::schema::{Field, ObjectType, ResolverParams, Schema, Type};
use crate::values::coercion;

/// Contextual information passed around during query execution.
pub struct ExecutionContext<'a, C> {
    /// The logger to use.
    pub logger: Logger,

    /// The schema to execute the query against.
    pub schema: &'a Schema<C>,

    /// The query to execute.
    pub document: &'a q::Document,

    /// The context value handed to resolvers.
    pub context: &'a C,

    /// Variable values, validated against the operation's variable
    /// definitions.
    pub variable_values: HashMap<String, q::Value>,

    /// Time at which the query times out.
    pub deadline: Option<Instant>,
}

/// Executes the root selection set of an operation against the given
/// root type.
///
/// Field errors never abort execution as a whole: they are recorded
/// together with the response path where they occurred, and the response
/// keeps the data of every field that did resolve. When a non-null field
/// fails, null propagates to the nearest nullable enclosing position, up
/// to the response root.
pub fn execute_root_selection_set<'a, C>(
    ctx: &ExecutionContext<'a, C>,
    selection_set: &'a q::SelectionSet,
    root_type: &ObjectType<C>,
    root_value: &r::Value,
) -> QueryResult {
    let mut errors = Vec::new();
    let mut path = ResponsePath::new();

    let data = execute_selection_set(
        ctx,
        selection_set,
        root_type,
        root_value,
        &mut path,
        &mut errors,
    )
    .unwrap_or(r::Value::Null);

    QueryResult {
        data: Some(data),
        errors: if errors.is_empty() {
            None
        } else {
            Some(errors)
        },
    }
}

/// Executes a selection set against an object type, using the given
/// value as the parent of its fields.
///
/// Returns `None` when a non-null field of the set failed; the error has
/// already been recorded at that point and null keeps propagating until
/// it reaches a nullable position.
fn execute_selection_set<'a, C>(
    ctx: &ExecutionContext<'a, C>,
    selection_set: &'a q::SelectionSet,
    object_type: &ObjectType<C>,
    object_value: &r::Value,
    path: &mut ResponsePath,
    errors: &mut Vec<QueryError>,
) -> Option<r::Value> {
    let mut result = r::Object::new();
    let mut timed_out = false;

    // Group fields with the same response key so they execute together
    let grouped_field_set = collect_fields(ctx, object_type, selection_set, &mut HashSet::new());

    // Process all field groups in order
    for (response_key, fields) in grouped_field_set {
        if !timed_out {
            if let Some(deadline) = ctx.deadline {
                if deadline < Instant::now() {
                    timed_out = true;
                    record_timeout(ctx, path, errors);
                }
            }
        }

        path.push_field(response_key);

        // Once the deadline has passed, remaining fields are nulled out
        // without running their resolvers.
        if timed_out {
            result.insert(response_key.to_owned(), r::Value::Null);
            path.pop();
            continue;
        }

        match sast::get_field(object_type, &fields[0].name) {
            Some(field) => {
                match execute_field(ctx, object_value, fields[0], field, &fields, path, errors) {
                    Some(value) => {
                        result.insert(response_key.to_owned(), value);
                    }
                    None if sast::is_non_null_type(&field.field_type) => {
                        // The failure replaces this whole selection set.
                        path.pop();
                        return None;
                    }
                    None => {
                        result.insert(response_key.to_owned(), r::Value::Null);
                    }
                }
            }
            None => {
                // An undefined field nulls its own key and leaves the
                // sibling fields intact.
                errors.push(QueryError::at_path(
                    QueryExecutionError::UnknownField(
                        fields[0].position,
                        object_type.name.clone(),
                        fields[0].name.clone(),
                    ),
                    path.clone(),
                ));
                result.insert(response_key.to_owned(), r::Value::Null);
            }
        }

        path.pop();
    }

    Some(r::Value::Object(result))
}

/// Records a single timeout error for the whole response.
fn record_timeout<C>(
    ctx: &ExecutionContext<'_, C>,
    path: &ResponsePath,
    errors: &mut Vec<QueryError>,
) {
    if !errors
        .iter()
        .any(|e| matches!(e.error, QueryExecutionError::Timeout))
    {
        debug!(ctx.logger, "Query timed out"; "response_path" => path.to_string());
        errors.push(QueryError::at_path(
            QueryExecutionError::Timeout,
            path.clone(),
        ));
    }
}

/// Collects the fields of a selection set into groups by response key,
/// in the order the query names them. Fragment spreads and inline
/// fragments are flattened into the groups of the selection set that
/// spreads them.
fn collect_fields<'a, C>(
    ctx: &ExecutionContext<'a, C>,
    object_type: &ObjectType<C>,
    selection_set: &'a q::SelectionSet,
    visited_fragments: &mut HashSet<&'a str>,
) -> IndexMap<&'a str, Vec<&'a q::Field>> {
    let mut grouped_fields: IndexMap<_, Vec<_>> = IndexMap::new();

    // Only consider selections that are not skipped and should be included
    let selections = selection_set
        .items
        .iter()
        .filter(|selection| !qast::skip_selection(selection, &ctx.variable_values))
        .filter(|selection| qast::include_selection(selection, &ctx.variable_values));

    for selection in selections {
        match selection {
            q::Selection::Field(field) => {
                let response_key = qast::get_response_key(field);
                grouped_fields.entry(response_key).or_default().push(field);
            }

            q::Selection::FragmentSpread(spread) => {
                // Only consider the fragment if it hasn't already been
                // included, as would be the case if the same fragment
                // spread appeared twice in the same selection set
                if visited_fragments.insert(spread.fragment_name.as_str()) {
                    let fragment = qast::get_fragment(ctx.document, &spread.fragment_name)
                        .filter(|fragment| {
                            does_fragment_type_apply(object_type, &fragment.type_condition)
                        });

                    if let Some(fragment) = fragment {
                        let fragment_grouped_field_set = collect_fields(
                            ctx,
                            object_type,
                            &fragment.selection_set,
                            visited_fragments,
                        );
                        merge_field_groups(&mut grouped_fields, fragment_grouped_field_set);
                    }
                }
            }

            q::Selection::InlineFragment(fragment) => {
                let applies = match &fragment.type_condition {
                    Some(type_condition) => {
                        does_fragment_type_apply(object_type, type_condition)
                    }
                    // An inline fragment without a type condition always
                    // applies.
                    None => true,
                };

                if applies {
                    let fragment_grouped_field_set = collect_fields(
                        ctx,
                        object_type,
                        &fragment.selection_set,
                        visited_fragments,
                    );
                    merge_field_groups(&mut grouped_fields, fragment_grouped_field_set);
                }
            }
        };
    }

    grouped_fields
}

/// Adds all items from each of the fragment's field groups to the group
/// with the corresponding response key.
fn merge_field_groups<'a>(
    grouped_fields: &mut IndexMap<&'a str, Vec<&'a q::Field>>,
    fragment_grouped_field_set: IndexMap<&'a str, Vec<&'a q::Field>>,
) {
    for (response_key, mut fragment_group) in fragment_grouped_field_set {
        grouped_fields
            .entry(response_key)
            .or_default()
            .append(&mut fragment_group);
    }
}

/// Determines whether a fragment applies to the given object type.
fn does_fragment_type_apply<C>(
    object_type: &ObjectType<C>,
    fragment_type: &q::TypeCondition,
) -> bool {
    // TypeCondition only has a single `On` variant.
    let q::TypeCondition::On(name) = fragment_type;
    name == &object_type.name
}

/// Executes a field by resolving its value and completing that value
/// against the field's declared type.
fn execute_field<'a, C>(
    ctx: &ExecutionContext<'a, C>,
    object_value: &r::Value,
    field: &'a q::Field,
    field_definition: &Field<C>,
    fields: &[&'a q::Field],
    path: &mut ResponsePath,
    errors: &mut Vec<QueryError>,
) -> Option<r::Value> {
    let argument_values = match coerce_argument_values(ctx, field_definition, field) {
        Ok(argument_values) => argument_values,
        Err(argument_errors) => {
            for e in argument_errors {
                errors.push(QueryError::at_path(e, path.clone()));
            }
            return None;
        }
    };

    let resolved_value =
        match resolve_field_value(ctx, object_value, field, field_definition, &argument_values) {
            Ok(resolved_value) => resolved_value,
            Err(e) => {
                errors.push(QueryError::at_path(e, path.clone()));
                return None;
            }
        };

    complete_value(
        ctx,
        field,
        &field_definition.field_type,
        fields,
        resolved_value,
        path,
        errors,
    )
}

/// Resolves the value of a field, either through its bound resolver or,
/// when none is bound, by reading the attribute with the field's name
/// off the parent object value.
fn resolve_field_value<C>(
    ctx: &ExecutionContext<'_, C>,
    object_value: &r::Value,
    field: &q::Field,
    field_definition: &Field<C>,
    argument_values: &HashMap<String, r::Value>,
) -> Result<r::Value, QueryExecutionError> {
    match &field_definition.resolver {
        Some(resolver) => resolver(ResolverParams {
            parent: object_value,
            arguments: argument_values,
            context: ctx.context,
        })
        .map_err(|e| {
            QueryExecutionError::ResolverError(field.position, field.name.clone(), e.to_string())
        }),

        None => match object_value {
            r::Value::Object(object) => Ok(object
                .get(&field.name)
                .cloned()
                .unwrap_or(r::Value::Null)),
            _ => Ok(r::Value::Null),
        },
    }
}

/// Ensures that a resolved value matches the field's declared type,
/// recursing into lists and objects.
///
/// Returns `None` when a field error was recorded and null has to
/// propagate to the nearest nullable position.
fn complete_value<'a, C>(
    ctx: &ExecutionContext<'a, C>,
    field: &'a q::Field,
    field_type: &Type,
    fields: &[&'a q::Field],
    resolved_value: r::Value,
    path: &mut ResponsePath,
    errors: &mut Vec<QueryError>,
) -> Option<r::Value> {
    match field_type {
        // Fail if the field type is non-null but the value is null. A
        // `None` from the inner completion already carries its own error
        // and passes through unchanged.
        Type::NonNull(inner_type) => {
            match complete_value(ctx, field, inner_type, fields, resolved_value, path, errors)? {
                r::Value::Null => {
                    errors.push(QueryError::at_path(
                        QueryExecutionError::NonNullError(field.position, field.name.clone()),
                        path.clone(),
                    ));
                    None
                }
                v => Some(v),
            }
        }

        // If the resolved value is null, return null
        _ if resolved_value.is_null() => Some(resolved_value),

        // Complete list values individually
        Type::List(inner_type) => match resolved_value {
            r::Value::List(values) => {
                let inner_non_null = sast::is_non_null_type(inner_type);
                let mut out = Vec::with_capacity(values.len());

                for (index, value) in values.into_iter().enumerate() {
                    path.push_index(index);
                    let completed =
                        complete_value(ctx, field, inner_type, fields, value, path, errors);
                    path.pop();

                    match completed {
                        Some(value) => out.push(value),
                        // A failed element is nulled in place unless the
                        // element type is non-null, in which case the
                        // failure replaces the whole list.
                        None if inner_non_null => return None,
                        None => out.push(r::Value::Null),
                    }
                }

                Some(r::Value::List(out))
            }

            // Return a field error if the resolved value for the list
            // field is not a list
            _ => {
                errors.push(QueryError::at_path(
                    QueryExecutionError::ListValueError(field.position, field.name.clone()),
                    path.clone(),
                ));
                None
            }
        },

        // Check scalar values against the declared scalar type. Resolved
        // values are not trusted to already have the right shape.
        Type::Scalar(scalar_type) => match resolved_value.coerce_scalar(*scalar_type) {
            Ok(value) => Some(value),
            Err(value) => {
                errors.push(QueryError::at_path(
                    QueryExecutionError::ScalarCoercionError(
                        field.position,
                        field.name.clone(),
                        value,
                        scalar_type.name().to_owned(),
                    ),
                    path.clone(),
                ));
                None
            }
        },

        // Complete object values by recursing into the merged selection
        // sets of all fields in the group
        Type::Object(name) => {
            let object_type = match ctx.schema.object_type(name) {
                Some(object_type) => object_type,
                None => {
                    errors.push(QueryError::at_path(
                        QueryExecutionError::NamedTypeError(name.clone()),
                        path.clone(),
                    ));
                    return None;
                }
            };

            let selection_set = merge_selection_sets(fields);
            if selection_set.items.is_empty() {
                errors.push(QueryError::at_path(
                    QueryExecutionError::EmptySelectionSet(
                        field.position,
                        field.name.clone(),
                        object_type.name.clone(),
                    ),
                    path.clone(),
                ));
                return None;
            }

            execute_selection_set(
                ctx,
                &selection_set,
                object_type,
                &resolved_value,
                path,
                errors,
            )
        }
    }
}

/// Merges the selection sets of several fields into a single selection
/// set.
fn merge_selection_sets(fields: &[&q::Field]) -> q::SelectionSet {
    let mut span = None;
    let mut items = Vec::new();

    for field in fields {
        // The overall span is the min/max of all merged selection sets
        span = match span {
            None => Some(field.selection_set.span),
            Some((start, end)) => Some((
                cmp::min(start, field.selection_set.span.0),
                cmp::max(end, field.selection_set.span.1),
            )),
        };
        items.extend_from_slice(&field.selection_set.items);
    }

    q::SelectionSet {
        span: span.unwrap_or_default(),
        items,
    }
}

/// Coerces the provided argument values of a field against the field's
/// declared arguments.
fn coerce_argument_values<C>(
    ctx: &ExecutionContext<'_, C>,
    field_definition: &Field<C>,
    field: &q::Field,
) -> Result<HashMap<String, r::Value>, Vec<QueryExecutionError>> {
    let mut coerced_values = HashMap::new();
    let mut errors = vec![];

    for argument_def in &field_definition.arguments {
        let value = qast::get_argument_value(&field.arguments, &argument_def.name).cloned();
        match coercion::coerce_input_value(value, argument_def, &ctx.variable_values, field.position)
        {
            Ok(Some(value)) => {
                coerced_values.insert(argument_def.name.clone(), value);
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(coerced_values)
    } else {
        Err(errors)
    }
}

/// Coerces variable values for an operation against its variable
/// definitions. Values stay in document form so that argument coercion
/// can substitute them wherever the query names the variable.
pub fn coerce_variable_values(
    operation: &q::OperationDefinition,
    variables: &Option<QueryVariables>,
) -> Result<HashMap<String, q::Value>, Vec<QueryExecutionError>> {
    let mut coerced_values = HashMap::new();
    let mut errors = vec![];

    // Variables may not refer to other variables.
    let no_variables = HashMap::new();

    for variable_def in qast::get_variable_definitions(operation)
        .into_iter()
        .flatten()
    {
        // Reject the variable if its declared type is not an input type
        let var_type = match coercion::declared_input_type(&variable_def.var_type) {
            Ok(var_type) => var_type,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };

        let value = variables
            .as_ref()
            .and_then(|vars| vars.get(&variable_def.name));

        let value = match value.or(variable_def.default_value.as_ref()) {
            // No variable value provided and no default for a non-null
            // type, fail
            None => {
                if sast::is_non_null_type(&var_type) {
                    errors.push(QueryExecutionError::MissingVariableError(
                        variable_def.position,
                        variable_def.name.clone(),
                    ));
                }
                continue;
            }
            Some(value) => value,
        };

        // Validate the value against the declared type, then keep it in
        // document form for argument substitution later
        match coercion::coerce_value(value, &var_type, &no_variables) {
            Some(coerced) => {
                coerced_values.insert(variable_def.name.clone(), q::Value::from(coerced));
            }
            None => errors.push(QueryExecutionError::InvalidArgumentError(
                variable_def.position,
                variable_def.name.clone(),
                value.clone(),
            )),
        }
    }

    if errors.is_empty() {
        Ok(coerced_values)
    } else {
        Err(errors)
    }
}
