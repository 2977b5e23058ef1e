use std::sync::Arc;

use crate::data::graphql::ValueMap;
use crate::data::value as r;
use crate::schema::{Field, InputValue, ResolverParams, Schema, SchemaBuilder, SchemaError, Type};

use super::TutorialStore;

/// Builds the tutorial API schema. Resolvers reach the store through the
/// context of the execution, so one schema value serves any number of
/// stores.
pub fn api_schema() -> Result<Schema<Arc<TutorialStore>>, SchemaError> {
    let mut schema: SchemaBuilder<Arc<TutorialStore>> = SchemaBuilder::new();

    let query = schema.define_object_type("RootQuery")?;
    let mutation = schema.define_object_type("RootMutation")?;
    let tutorial = schema.define_object_type("Tutorial")?;
    let author = schema.define_object_type("Author")?;
    let comment = schema.define_object_type("Comment")?;

    // Domain types resolve their fields off the parent value.
    schema.define_field(tutorial, Field::new("ID", Type::int()))?;
    schema.define_field(tutorial, Field::new("Title", Type::string()))?;
    schema.define_field(tutorial, Field::new("Author", Type::object("Author")))?;
    schema.define_field(
        tutorial,
        Field::new("Comments", Type::list(Type::object("Comment"))),
    )?;

    schema.define_field(author, Field::new("Name", Type::string()))?;
    schema.define_field(author, Field::new("Tutorials", Type::list(Type::int())))?;

    schema.define_field(comment, Field::new("Body", Type::string()))?;

    schema.define_field(
        query,
        Field::new("tutorial", Type::object("Tutorial"))
            .description("Get tutorial by ID")
            .argument(InputValue::new("id", Type::int()))
            .resolver(|params: ResolverParams<'_, Arc<TutorialStore>>| {
                Ok(match params.arguments.get_optional::<i32>("id")? {
                    Some(id) => params
                        .context
                        .find(id)
                        .as_ref()
                        .map(r::Value::from)
                        .unwrap_or(r::Value::Null),
                    None => r::Value::Null,
                })
            }),
    )?;

    schema.define_field(
        query,
        Field::new("list", Type::list(Type::object("Tutorial")))
            .description("Get tutorial list")
            .resolver(|params: ResolverParams<'_, Arc<TutorialStore>>| {
                let tutorials = params.context.list();
                Ok(r::Value::List(
                    tutorials.iter().map(r::Value::from).collect(),
                ))
            }),
    )?;

    schema.define_field(
        mutation,
        Field::new("create", Type::object("Tutorial"))
            .description("Create a new tutorial")
            .argument(InputValue::new("Title", Type::non_null(Type::string())))
            .resolver(|params: ResolverParams<'_, Arc<TutorialStore>>| {
                let title: String = params.arguments.get_required("Title")?;
                Ok(r::Value::from(&params.context.create(title)))
            }),
    )?;

    schema.build("RootQuery", Some("RootMutation"))
}

#[cfg(test)]
mod tests {
    use super::api_schema;

    #[test]
    fn the_tutorial_schema_builds() {
        let schema = api_schema().unwrap();
        assert!(schema.query_type().is_some());
        assert!(schema.mutation_type().is_some());
        assert!(schema.object_type("Tutorial").is_some());
    }
}
