//! Projects Module
//!
//! Enhancement of repository records and the list views built on them.

pub mod catalog;
pub mod enhance;
pub mod loader;

pub use catalog::{
    browse, filter_projects, showcase, sort_projects, LanguageCategory, ProjectSort, Showcase,
};
pub use enhance::{project_slug, ProbeResult, ProjectEnhancer};
pub use loader::ProjectLoader;
