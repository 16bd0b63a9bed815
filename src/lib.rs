//! Curation reports and bulk edits against a Dataverse installation's native API.

pub mod api;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod format;
pub mod harvest;
pub mod join;
pub mod locks;
pub mod progress;
pub mod publications;
pub mod replace;
pub mod rows;
pub mod search;
pub mod writer;

pub use error::{Error, Result};
