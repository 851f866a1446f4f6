pub mod schema;

pub use schema::{ResponseSchema, SchemaHandle};
