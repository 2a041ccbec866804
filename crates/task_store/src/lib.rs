//! Task storage for the tasks service.
//!
//! This crate provides the [`TaskStore`] abstraction and its backends: an
//! in-memory store, a DynamoDB document store and a PostgreSQL relational
//! store. Backends are chosen once at startup; handlers only see the trait.

mod error;
mod memory;
mod traits;

#[cfg(feature = "dynamodb")]
mod dynamo;
#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(feature = "postgres")]
mod postgres;

pub use error::*;
pub use memory::*;
pub use traits::*;

#[cfg(feature = "dynamodb")]
pub use dynamo::*;
#[cfg(any(test, feature = "mock"))]
pub use mock::*;
#[cfg(feature = "postgres")]
pub use postgres::*;

pub use entities::Task;
