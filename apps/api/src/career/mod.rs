// Shared Career State: models, the write-through store, and its HTTP handlers.

pub mod handlers;
pub mod models;
pub mod store;
