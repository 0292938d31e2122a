//! Adapters behind the domain ports: the HTTP transport and an in-memory page.

pub mod http;
pub mod in_memory;
