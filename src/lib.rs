#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Multi-tenant task management API: registration and login with bcrypt"]
#![doc = "credentials and JWT bearer tokens, ownership-scoped task CRUD with an"]
#![doc = "admin role that can view and delete any task. The binary (`main.rs`)"]
#![doc = "wires these modules into an actix-web server; integration tests build"]
#![doc = "the same composition with `test::init_service`."]

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod repo;
pub mod routes;
pub mod security;
pub mod services;
