// Sekisho API Gateway Client Library

pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod middleware;
pub mod monitor;
pub mod response;
pub mod retry;

pub use gateway::{Gateway, RequestOptions};
pub use response::{ApiErrorInfo, ApiResponse};
