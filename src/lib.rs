//! formflow - application tracking over a BPM workflow engine
//!
//! Applications are submitted form instances. Each is created under the form
//! process mapper registered for its form, persisted, and then handed to the
//! workflow engine. Queries are scoped by the forms a credential is
//! authorized for, by creator, by group membership or by form.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod service;
pub mod store;
