//! # sql-builder
//!
//! SQL construction for minorm: keyword filters to predicates, SELECT,
//! INSERT, UPDATE and DELETE statements with `%s` placeholders.
//! Nothing here talks to a database.

pub mod descriptor;
pub mod errors;
pub mod predicate;
pub mod prelude;
pub mod query_builder;
pub mod validation;

pub use indexmap;
pub use serde_json;

pub use descriptor::{ModelDescriptor, DEFAULT_PER_PAGE};
pub use errors::{DatastoreError, DatastoreErrorKind, OrmError, OrmResult};
pub use predicate::{Fields, Predicate, Statement};
pub use query_builder::{
    and_, columns_sql, join_, or_, set_, where_, Combiner, CompareOp, JoinDescriptor, Pagination,
    PredicateBuilder, QueryBuilder, Selection, SqlGenerator,
};
pub use validation::{ValidatedFieldName, ValidatedTableName, ValidationError};
