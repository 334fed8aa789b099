#![doc = "The `taskguard` library crate."]
#![doc = ""]
#![doc = "A task tracking API whose interesting part is the authentication and authorization"]
#![doc = "core: password credentials, stateless signed tokens, role checks, and an ownership"]
#![doc = "policy that is pushed down into every storage query. The binary (`main.rs`) wires"]
#![doc = "these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
