//! Application state and its transitions. `reduce` is pure; the
//! controller in `app` owns the only `AppState`.

use serde::{Deserialize, Serialize};

use crate::models::{AspectRatio, BatchResult, GeneratedImage, GenerationParameters, ModelCatalog};

pub const GENERATION_FAILED: &str = "Failed to generate images. Please try again.";
pub const DOWNLOAD_FAILED: &str = "Failed to download image. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Create,
    Downloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub params: GenerationParameters,
    pub images: Vec<GeneratedImage>,
    pub loading: bool,
    /// Banner shown above the results.
    pub error: Option<String>,
    /// Blocking alert, cleared with `DismissAlert`.
    pub alert: Option<String>,
    pub models: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let catalog = ModelCatalog::default();
        Self {
            route: Route::Create,
            params: GenerationParameters::default(),
            images: Vec::new(),
            loading: false,
            error: None,
            alert: None,
            models: catalog.models,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Navigate(Route),
    SetPrompt(String),
    SelectModel(String),
    SetWidth(u32),
    SetHeight(u32),
    ApplyPreset(AspectRatio),
    ModelsLoaded(ModelCatalog),
    BatchStarted,
    BatchFinished(BatchResult),
    /// The workflow declined to run; nothing was fetched.
    BatchSkipped,
    BatchFailed(String),
    DownloadFailed(String),
    DismissAlert,
}

pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Navigate(route) => state.route = route,
        Action::SetPrompt(prompt) => state.params.prompt = prompt,
        Action::SelectModel(model) => state.params.model = model,
        Action::SetWidth(width) => state.params.width = width,
        Action::SetHeight(height) => state.params.height = height,
        Action::ApplyPreset(ratio) => state.params.apply_preset(ratio),
        Action::ModelsLoaded(catalog) => {
            if !catalog.contains(&state.params.model) {
                if let Some(first) = catalog.models.first() {
                    state.params.model = first.clone();
                }
            }
            if let Some(warning) = catalog.warning {
                state.error = Some(warning);
            }
            state.models = catalog.models;
        }
        Action::BatchStarted => {
            state.loading = true;
            state.error = None;
            state.images.clear();
        }
        Action::BatchFinished(batch) => {
            state.loading = false;
            state.params.seed = batch.base_seed;
            state.images = batch.images;
        }
        Action::BatchSkipped => state.loading = false,
        Action::BatchFailed(reason) => {
            log::error!("Error generating images: {}", reason);
            state.loading = false;
            state.error = Some(GENERATION_FAILED.to_string());
        }
        Action::DownloadFailed(reason) => {
            log::error!("Error downloading image: {}", reason);
            state.alert = Some(DOWNLOAD_FAILED.to_string());
        }
        Action::DismissAlert => state.alert = None,
    }
    state
}
