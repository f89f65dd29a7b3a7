pub mod favorites;
pub mod file;
pub mod memory;
pub mod traits;

use crate::{config::GeneratorConfig, error::Result};
use std::sync::Arc;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Open the favorites list backed by files under `config.data_dir`.
pub fn open_favorites(config: &GeneratorConfig) -> Result<FavoritesStore> {
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.data_dir)?);
    Ok(FavoritesStore::restore(store))
}
