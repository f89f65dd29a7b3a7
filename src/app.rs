use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    config::GeneratorConfig,
    error::{PixgenError, Result},
    models::{BatchResult, FavoriteImage, GeneratedImage},
    pollinations::{ImageFetcher, ImageLoader, ModelSource, PollinationsClient},
    state::{reduce, Action, AppState},
    storage::{self, FavoritesStore},
    workflow::GenerationWorkflow,
};

/// Owns the application state and drives the workflow and favorites from
/// user actions.
///
/// Every mutating method takes `&mut self`, so at most one batch can be in
/// flight per controller.
pub struct App {
    config: GeneratorConfig,
    state: AppState,
    workflow: GenerationWorkflow,
    favorites: FavoritesStore,
    models: Arc<dyn ModelSource>,
    fetcher: Arc<dyn ImageFetcher>,
}

impl App {
    /// Build against the live endpoint with file-backed favorites.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let client = PollinationsClient::new(&config)?;
        let favorites = storage::open_favorites(&config)?;
        let image = Arc::new(client.image().clone());
        let models = Arc::new(client.models().clone());

        Ok(Self::with_parts(config, image.clone(), image, models, favorites))
    }

    pub fn with_parts(
        config: GeneratorConfig,
        loader: Arc<dyn ImageLoader>,
        fetcher: Arc<dyn ImageFetcher>,
        models: Arc<dyn ModelSource>,
        favorites: FavoritesStore,
    ) -> Self {
        let workflow = GenerationWorkflow::new(loader, &config);
        let mut state = AppState::default();
        state.params.model = config.default_model.clone();

        Self {
            config,
            state,
            workflow,
            favorites,
            models,
            fetcher,
        }
    }

    /// Swap in a different workflow, e.g. one with a fixed seed source.
    pub fn with_workflow(mut self, workflow: GenerationWorkflow) -> Self {
        self.workflow = workflow;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Load the model list. Failure only sets the warning banner.
    pub async fn load_models(&mut self) {
        let catalog = self.models.fetch_models().await;
        self.dispatch(Action::ModelsLoaded(catalog));
    }

    /// Generate a batch from the current parameters.
    ///
    /// A blank prompt does nothing and returns `Ok(None)`. Other failures
    /// are reflected in the banner and returned.
    pub async fn submit(&mut self) -> Result<Option<BatchResult>> {
        if !self.state.params.has_prompt() {
            return Ok(None);
        }

        self.dispatch(Action::BatchStarted);
        let outcome = self.workflow.generate(&self.state.params).await;
        match outcome {
            Ok(Some(batch)) => {
                self.dispatch(Action::BatchFinished(batch.clone()));
                Ok(Some(batch))
            }
            Ok(None) => {
                self.dispatch(Action::BatchSkipped);
                Ok(None)
            }
            Err(e) => {
                self.dispatch(Action::BatchFailed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Save the image at `index` of the current results.
    pub async fn download_index(&mut self, index: usize) -> Result<PathBuf> {
        let image = self.state.images.get(index).cloned().ok_or_else(|| {
            PixgenError::InvalidParameters(format!("no image at index {}", index))
        })?;
        self.download(&image).await
    }

    /// Re-fetch the image bytes, write `ai-image-{seed}.jpg` to the download
    /// directory and add the image to favorites.
    pub async fn download(&mut self, image: &GeneratedImage) -> Result<PathBuf> {
        match self.try_download(image).await {
            Ok(path) => Ok(path),
            Err(e) => {
                self.dispatch(Action::DownloadFailed(e.to_string()));
                Err(match e {
                    PixgenError::DownloadFailure(reason) => PixgenError::DownloadFailure(reason),
                    other => PixgenError::DownloadFailure(other.to_string()),
                })
            }
        }
    }

    async fn try_download(&self, image: &GeneratedImage) -> Result<PathBuf> {
        let favorite = FavoriteImage::try_from(image.clone())?;
        let bytes = self.fetcher.fetch_bytes(&favorite.url).await?;

        tokio::fs::create_dir_all(&self.config.download_dir).await?;
        let path = self.config.download_dir.join(image.file_name());
        tokio::fs::write(&path, &bytes).await?;

        // A file without its favorite entry is a half-finished download.
        if let Err(e) = self.favorites.add(favorite) {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                log::warn!("Could not remove {}: {}", path.display(), cleanup);
            }
            return Err(e);
        }

        log::info!("💾 Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
