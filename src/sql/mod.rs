pub mod error;
pub mod filter;
pub mod filter_where;
pub mod partial_update;
pub mod types;

pub use error::SqlError;
pub use filter::{FilterInstance, FilterKind, FilterRegistry};
pub use filter_where::sql_for_filter;
pub use partial_update::sql_for_partial_update;
pub use types::{SetClause, ValueKind, WhereClause};
