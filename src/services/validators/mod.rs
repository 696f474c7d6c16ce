pub mod schema;
pub mod types;

pub use schema::SchemaValidators;
pub use types::{Validators, Verdict};
