//! Batch generation: one prompt fanned out into `batch_size` seeded
//! variants, each fetched under its own deadline, joined with settle-all
//! semantics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::{
    config::GeneratorConfig,
    error::{PixgenError, Result},
    logger,
    models::{random_seed, BatchResult, GeneratedImage, GenerationParameters, LOAD_FAILURE_REASON},
    pollinations::{image_url, ImageLoader},
};

pub type SeedSource = Arc<dyn Fn() -> u64 + Send + Sync>;

pub struct GenerationWorkflow {
    loader: Arc<dyn ImageLoader>,
    base_url: String,
    timeout: Duration,
    batch_size: usize,
    busy: AtomicBool,
    seed_source: SeedSource,
}

impl GenerationWorkflow {
    pub fn new(loader: Arc<dyn ImageLoader>, config: &GeneratorConfig) -> Self {
        Self {
            loader,
            base_url: config.base_url.clone(),
            timeout: config.image_timeout,
            batch_size: config.batch_size,
            busy: AtomicBool::new(false),
            seed_source: Arc::new(random_seed),
        }
    }

    /// Replace the random base-seed draw, e.g. to reproduce a batch.
    ///
    /// Seeds within `batch_size - 1` of `u64::MAX` are rejected by
    /// `generate` with `InvalidParameters`.
    pub fn with_seed_source(mut self, source: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        self.seed_source = Arc::new(source);
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run one batch.
    ///
    /// Returns `Ok(None)` without touching the network when the prompt is
    /// blank, and `Err(Busy)` while another batch is in flight. Otherwise
    /// every variant gets a slot in the result, in seed order, whether its
    /// fetch succeeded or not.
    pub async fn generate(&self, params: &GenerationParameters) -> Result<Option<BatchResult>> {
        if !params.has_prompt() {
            log::debug!("Ignoring generate request with an empty prompt");
            return Ok(None);
        }
        params.validate_dimensions()?;

        let _guard = BusyGuard::acquire(&self.busy)?;
        let _timer = logger::timer("generation batch");

        let base_seed = (self.seed_source)();
        let last_offset = self.batch_size.saturating_sub(1) as u64;
        if base_seed.checked_add(last_offset).is_none() {
            return Err(PixgenError::InvalidParameters(format!(
                "base seed {} leaves no room for {} variants",
                base_seed, self.batch_size
            )));
        }
        let batch_stamp = Utc::now().timestamp_millis();

        log::info!(
            "🎨 Generating {} images for '{}' with {} at {}x{} (seed {})",
            self.batch_size,
            params.prompt,
            params.model,
            params.width,
            params.height,
            base_seed
        );

        let fetches = (0..self.batch_size).map(|offset| {
            let seed = base_seed + offset as u64;
            let url = image_url(&self.base_url, params, seed);
            async move { (seed, self.fetch_with_deadline(&url).await) }
        });

        let outcomes = join_all(fetches).await;

        let images = outcomes
            .into_iter()
            .enumerate()
            .map(|(offset, (seed, outcome))| {
                let id = format!("{}-{}", batch_stamp, offset);
                let (url, error) = match outcome {
                    Ok(url) => (Some(url), None),
                    Err(e) => {
                        log::warn!("Image {} (seed {}) failed: {}", offset, seed, e);
                        (None, Some(LOAD_FAILURE_REASON.to_string()))
                    }
                };
                GeneratedImage {
                    id,
                    url,
                    prompt: params.prompt.clone(),
                    seed,
                    model: params.model.clone(),
                    width: params.width,
                    height: params.height,
                    error,
                }
            })
            .collect();

        let batch = BatchResult { base_seed, images };
        logger::log_batch_summary(&batch);
        Ok(Some(batch))
    }

    async fn fetch_with_deadline(&self, url: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.loader.load(url)).await {
            Ok(Ok(loaded)) => Ok(loaded),
            Ok(Err(PixgenError::ImageLoadFailure(reason))) => {
                Err(PixgenError::ImageLoadFailure(reason))
            }
            Ok(Err(e)) => Err(PixgenError::ImageLoadFailure(e.to_string())),
            Err(_) => Err(PixgenError::ImageTimeout(self.timeout)),
        }
    }
}

/// Holds the busy flag for the lifetime of a batch.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PixgenError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
