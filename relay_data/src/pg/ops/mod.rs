pub mod exchange;
pub mod schema;
