pub mod app;
pub mod config;
pub mod error;
pub mod feeds;
pub mod refresh;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::QueryError;
pub use feeds::gemini::GeminiClient;
pub use feeds::{NewsBatch, NewsFetcher};
