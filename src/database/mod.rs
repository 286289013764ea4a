pub mod models;
pub mod pool;

pub use pool::DatabaseError;
