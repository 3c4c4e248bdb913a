//! DTO modules that bridge services with templates.

pub mod dashboard;
pub mod site;
