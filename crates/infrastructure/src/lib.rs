//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod api_client;
mod credential_store;
mod http_auth_gateway;
mod http_collection_gateway;
mod in_memory_collection_gateway;

pub use credential_store::{FileCredentialStore, InMemoryCredentialStore};
pub use http_auth_gateway::HttpAuthGateway;
pub use http_collection_gateway::HttpCollectionGateway;
pub use in_memory_collection_gateway::InMemoryCollectionGateway;
