//! Infrastructure configuration modules.

pub mod api;
pub mod bulk;
pub mod list;
pub mod logging;
pub mod settings;

pub use api::ApiConfig;
pub use bulk::BulkConfig;
pub use list::ListConfig;
pub use logging::LoggingConfig;
pub use settings::Config;
