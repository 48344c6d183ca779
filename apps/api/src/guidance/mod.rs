// Recommendation Client and the guidance submission endpoints.

pub mod client;
pub mod handlers;
