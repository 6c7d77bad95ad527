//! Core library for TaskHub
//!
//! This crate contains the shared domain logic for the gateway and the
//! internal services, including:
//! - Task, project and user models with their repositories
//! - The request principal and the internal identity-header contract
//! - Pagination envelopes for collection reads

pub mod error;
pub mod page;
pub mod principal;
pub mod project;
pub mod task;
pub mod user;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
