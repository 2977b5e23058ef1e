/// Builders for runtime value objects.
pub mod object_macro;

/// Serializable wrapper around a parser AST value.
mod serialization;

/// Typed extraction of runtime values, for use inside resolvers.
pub mod values;

pub use self::object_macro::{object_value, IntoValue};
pub use self::serialization::SerializableValue;
pub use self::values::{TryFromValue, ValueMap};

/// Aliases for `graphql_parser` query AST types instantiated over owned
/// strings, the only form the executor works with.
pub mod q {
    pub use graphql_parser::query::{parse_query, Number, ParseError};
    pub use graphql_parser::Pos;

    pub type Definition = graphql_parser::query::Definition<'static, String>;
    pub type Directive = graphql_parser::query::Directive<'static, String>;
    pub type Document = graphql_parser::query::Document<'static, String>;
    pub type Field = graphql_parser::query::Field<'static, String>;
    pub type FragmentDefinition = graphql_parser::query::FragmentDefinition<'static, String>;
    pub type InlineFragment = graphql_parser::query::InlineFragment<'static, String>;
    pub type OperationDefinition = graphql_parser::query::OperationDefinition<'static, String>;
    pub type Query = graphql_parser::query::Query<'static, String>;
    pub type Selection = graphql_parser::query::Selection<'static, String>;
    pub type SelectionSet = graphql_parser::query::SelectionSet<'static, String>;
    pub type Type = graphql_parser::query::Type<'static, String>;
    pub type TypeCondition = graphql_parser::query::TypeCondition<'static, String>;
    pub type Value = graphql_parser::query::Value<'static, String>;
    pub type VariableDefinition = graphql_parser::query::VariableDefinition<'static, String>;
}
