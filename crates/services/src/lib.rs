#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod export;
pub mod progress_service;

pub use practice_core::Clock;

pub use app_services::AppServices;
pub use error::ProgressServiceError;
pub use export::progress_csv;
pub use progress_service::{ProblemStatus, ProgressService};
