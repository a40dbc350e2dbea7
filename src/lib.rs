//! Edge responder serving a links list and a personalized, streamed-rewrite
//! profile page.

// Core subsystems
pub mod config;
pub mod http;
pub mod rewrite;
pub mod routing;
pub mod site;
pub mod upstream;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;

pub use config::SiteConfig;
pub use error::AppError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
