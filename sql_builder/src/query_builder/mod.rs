//! Query builder utilities
//!
//! Keyword filters become predicates, predicates become statements.

pub mod builder;
pub mod clauses;
pub mod filter;
pub mod join;
pub mod mutation;
pub mod pagination;
pub mod sql_generation;

#[cfg(test)]
mod tests;


pub use builder::{QueryBuilder, Selection};
pub use clauses::{and_, columns_sql, join_, or_, set_, where_};
pub use filter::{Combiner, CompareOp, FilterKey, PredicateBuilder};
pub use join::JoinDescriptor;
pub use pagination::Pagination;
pub use sql_generation::SqlGenerator;
