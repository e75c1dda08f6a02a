//! Kill Switch - remote maintenance switch for client storefronts
//!
//! The registry service owns store records and answers the public status
//! check that storefront snippets poll. The admin client drives the
//! registry's write endpoints and generates those snippets.

pub mod admin;
pub mod app;
pub mod config;
pub mod http;
pub mod registry;
pub mod store;
