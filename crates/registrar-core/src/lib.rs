//! registrar-core: enrollment, grading and academic record engine.
//!
//! This crate defines the data model, the enrollment and grading rules, and
//! the registry with its sorted and searchable views. It is synchronous and
//! keeps everything in memory.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod model;
pub mod rating;
pub mod record;
pub mod registry;
pub mod report;
pub mod roster;
pub mod search;

pub use config::RegistrarConfig;
pub use error::{RegistryError, Result};
pub use model::{Account, Course, CourseId, Level, Role, User, UserId};
pub use registry::Registry;
