// src/core/mod.rs
//! Core services shared by the CLI and the service layer

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;

pub use config_manager::{ConfigManager, ServiceConfig};
pub use database::{Database, UserRepository, VacancyRepository};
pub use fs_ops::FsOps;
pub use service_client::ExtractionClient;
