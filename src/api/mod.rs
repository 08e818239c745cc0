pub mod client;
pub mod types;

pub use client::{create_client, ApiClient, AuthError};
pub use types::{Company, EsgRecord};
