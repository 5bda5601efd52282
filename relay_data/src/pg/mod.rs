pub mod convert;
pub mod models;
pub mod ops;
