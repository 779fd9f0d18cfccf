pub mod http;
pub mod server;

pub use http::{ApiClientConfig, ApiError};
pub use server::{FileDescriptor, PingReport, ServerClient, SettingsRecord};
