//! gridtree API Server module
//!
//! HTTP REST API for decode and encode. Run with `gridtree-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig};
