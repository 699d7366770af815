//! Faktura Core — entity model, validation rules, error taxonomy, and
//! repository trait definitions.
//!
//! This crate has no I/O. Persistence lives behind the repository traits
//! in [`repository`]; password hashing lives in `faktura-auth`.

pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod validation;

pub use error::{FakturaError, FakturaResult};
