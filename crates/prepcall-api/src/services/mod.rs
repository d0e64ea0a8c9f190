//! Service layer for the prepcall API.

pub mod brief_service;

pub use brief_service::BriefService;
