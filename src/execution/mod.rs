mod execution;

pub use self::execution::*;
