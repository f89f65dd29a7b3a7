pub mod app;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod pollinations;
pub mod state;
pub mod storage;
pub mod workflow;

pub use app::App;
pub use config::GeneratorConfig;
pub use error::{PixgenError, Result};
pub use models::*;
pub use pollinations::{
    ImageClient, ImageFetcher, ImageLoader, ModelClient, ModelSource, PollinationsClient,
};
pub use state::{reduce, Action, AppState, Route};
pub use storage::{FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore};
pub use workflow::GenerationWorkflow;
