//! Common imports for building statements

pub use crate::descriptor::ModelDescriptor;
pub use crate::errors::{OrmError, OrmResult};
pub use crate::fields;
pub use crate::predicate::{Fields, Predicate, Statement};
pub use crate::query_builder::{and_, join_, or_, set_, where_, QueryBuilder, SqlGenerator};
