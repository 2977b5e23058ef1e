/// Coercion of query values into runtime values.
pub mod coercion;

pub use self::coercion::MaybeCoercible;
