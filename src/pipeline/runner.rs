//! [`GenerationPipeline`] — fans a request out into one image call per
//! `(token, variant)` and aggregates the results.
//!
//! # Pipeline flow
//!
//! ```text
//! start(request e)
//!   └─▶ publish Generating([])
//!       spawn driver(e)
//!         ├─ JoinSet: tokens × variants calls ── ImageGenerator::images(prompt, style, 1)
//!         │     ├─ Ok(image)        → Produced(Remote)
//!         │     ├─ Err(Unavailable) → Produced(FallbackGenerator)
//!         │     ├─ Err(other)       → Failed(kind)
//!         │     └─ empty stream     → Exhausted
//!         │            │
//!         │            └──── mpsc ────▶ Aggregate (single writer)
//!         │                                 └─▶ publish Generating(partial)   if e is current
//!         └─ all calls resolved ─────────────▶ publish Completed / Failed      if e is current
//! ```
//!
//! Publication goes through the same mutex `start` takes to move the epoch
//! forward, so a superseded driver can never overwrite a newer state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::{GenerationConfig, SchedulerConfig};
use crate::fallback::FallbackGenerator;
use crate::request::{Epoch, EpochClock, GenerationRequest};
use crate::scheduler::runner::lock;
use crate::service::{ErrorKind, ImageGenerator, ImageStyle, ServiceError};

use super::artifact::{group_by_token, GeneratedArtifact};
use super::state::PipelineState;

/// Prompt sent to the image service for one `(token, variant)` call.
///
/// ```
/// use emoji_translate::pipeline::prompt_for;
///
/// assert_eq!(
///     prompt_for("🐶", 1),
///     "Create a high-quality illustration inspired by the emoji 🐶, style variant 1."
/// );
/// ```
pub fn prompt_for(token: &str, variant_index: usize) -> String {
    format!("Create a high-quality illustration inspired by the emoji {token}, style variant {variant_index}.")
}

// ---------------------------------------------------------------------------
// Call reports and aggregation
// ---------------------------------------------------------------------------

/// What one call sends to its epoch's aggregator.
#[derive(Debug)]
enum CallReport {
    Produced(GeneratedArtifact),
    Failed(ErrorKind),
    /// The stream ended without yielding anything.
    Exhausted,
}

/// Single-writer accumulator for one epoch.
struct Aggregate {
    tokens: Vec<String>,
    total: usize,
    resolved: usize,
    partial: Vec<GeneratedArtifact>,
    seen: HashSet<(String, usize)>,
    first_error: Option<ErrorKind>,
    exhausted: usize,
}

impl Aggregate {
    fn new(request: &GenerationRequest) -> Self {
        Self {
            tokens: request.tokens().to_vec(),
            total: request.call_count(),
            resolved: 0,
            partial: Vec::with_capacity(request.call_count()),
            seen: HashSet::new(),
            first_error: None,
            exhausted: 0,
        }
    }

    /// Record one report.  Returns `true` when the partial set grew.
    fn apply(&mut self, report: CallReport) -> bool {
        self.resolved += 1;
        match report {
            CallReport::Produced(artifact) => {
                let key = (artifact.token.clone(), artifact.variant_index);
                if self.seen.insert(key) {
                    self.partial.push(artifact);
                    return true;
                }
                log::debug!(
                    "pipeline: duplicate artifact for {} v{} ignored",
                    artifact.token,
                    artifact.variant_index
                );
            }
            CallReport::Failed(kind) => {
                self.first_error.get_or_insert(kind);
            }
            CallReport::Exhausted => self.exhausted += 1,
        }
        false
    }

    fn finish(self) -> PipelineState {
        if self.resolved < self.total {
            log::warn!(
                "pipeline: only {}/{} calls reported back",
                self.resolved,
                self.total
            );
        }

        if !self.partial.is_empty() || self.exhausted > 0 || self.total == 0 {
            return PipelineState::Completed(group_by_token(&self.tokens, &self.partial));
        }

        PipelineState::Failed(
            self.first_error
                .unwrap_or_else(|| ErrorKind::Service("generation task aborted".into())),
        )
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Current {
    epoch: Epoch,
    driver: Option<JoinHandle<()>>,
}

struct Shared {
    current: Mutex<Current>,
    state_tx: watch::Sender<PipelineState>,
}

impl Shared {
    /// Publish `state` if `epoch` is still current.  Returns `false` once the
    /// epoch has been superseded.
    fn publish(&self, epoch: Epoch, state: PipelineState) -> bool {
        let current = lock(&self.current);
        if current.epoch != epoch {
            log::debug!(
                "pipeline: discarding {} for {epoch}, current is {}",
                state.label(),
                current.epoch
            );
            return false;
        }
        self.state_tx.send_replace(state);
        true
    }
}

/// Everything one call needs; cloned into each spawned task.
#[derive(Clone)]
struct CallContext {
    generator: Arc<dyn ImageGenerator>,
    fallback: FallbackGenerator,
    style: ImageStyle,
}

// ---------------------------------------------------------------------------
// GenerationPipeline
// ---------------------------------------------------------------------------

/// Generates images for a set of emoji tokens, falling back to locally drawn
/// placeholders when the image service is unavailable.
///
/// `start` must be called from within a tokio runtime.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use emoji_translate::pipeline::GenerationPipeline;
/// use emoji_translate::service::UnsupportedImageGenerator;
///
/// # async fn example() {
/// let pipeline = GenerationPipeline::new(Arc::new(UnsupportedImageGenerator));
/// let mut states = pipeline.observe();
///
/// pipeline.start(pipeline.request(["😀", "🐶", "🌸"]));
///
/// let done = states.wait_for(|s| s.is_terminal()).await.unwrap();
/// println!("{} artifacts", done.artifact_count());
/// # }
/// ```
pub struct GenerationPipeline {
    context: CallContext,
    variants_per_token: usize,
    abort_superseded: bool,
    clock: EpochClock,
    shared: Arc<Shared>,
}

impl GenerationPipeline {
    /// Pipeline with default generation and scheduler settings.
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self::from_config(
            generator,
            &GenerationConfig::default(),
            &SchedulerConfig::default(),
        )
    }

    pub fn from_config(
        generator: Arc<dyn ImageGenerator>,
        generation: &GenerationConfig,
        scheduler: &SchedulerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(PipelineState::Idle);
        Self {
            context: CallContext {
                generator,
                fallback: FallbackGenerator::new(generation.fallback_canvas),
                style: generation.style,
            },
            variants_per_token: generation.variants_per_token,
            abort_superseded: scheduler.abort_superseded,
            clock: EpochClock::new(),
            shared: Arc::new(Shared {
                current: Mutex::new(Current {
                    epoch: Epoch::ZERO,
                    driver: None,
                }),
                state_tx,
            }),
        }
    }

    pub fn clock(&self) -> &EpochClock {
        &self.clock
    }

    /// Build a request for `tokens` with the configured variant count,
    /// stamped with this pipeline's next epoch.
    pub fn request<I, S>(&self, tokens: I) -> GenerationRequest
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GenerationRequest::new(&self.clock, tokens, self.variants_per_token)
    }

    /// Start the epoch described by `request`.
    ///
    /// Publishes `Generating([])` before returning.  A request that is not
    /// newer than the current epoch is dropped.
    pub fn start(&self, request: GenerationRequest) {
        let epoch = request.epoch();
        let mut current = lock(&self.shared.current);

        if !epoch.is_newer_than(current.epoch) {
            log::debug!(
                "pipeline: dropping stale request {epoch}, current is {}",
                current.epoch
            );
            return;
        }

        if let Some(previous) = current.driver.take() {
            if self.abort_superseded {
                previous.abort();
            }
        }

        log::info!(
            "pipeline: {epoch} started, {} tokens × {} variants",
            request.tokens().len(),
            request.variants_per_token()
        );
        current.epoch = epoch;
        self.shared
            .state_tx
            .send_replace(PipelineState::Generating(Vec::new()));

        current.driver = Some(tokio::spawn(drive(
            Arc::clone(&self.shared),
            self.context.clone(),
            request,
            self.abort_superseded,
        )));
    }

    /// Subscribe to state changes.  The receiver starts at the latest state.
    pub fn observe(&self) -> watch::Receiver<PipelineState> {
        self.shared.state_tx.subscribe()
    }

    /// Snapshot of the latest state.
    pub fn state(&self) -> PipelineState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn current_epoch(&self) -> Epoch {
        lock(&self.shared.current).epoch
    }
}

impl Drop for GenerationPipeline {
    fn drop(&mut self) {
        if let Some(driver) = lock(&self.shared.current).driver.take() {
            driver.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

async fn drive(
    shared: Arc<Shared>,
    context: CallContext,
    request: GenerationRequest,
    abort_superseded: bool,
) {
    let epoch = request.epoch();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut calls = JoinSet::new();
    for (token, variant_index) in request.calls() {
        calls.spawn(run_call(
            context.clone(),
            token.to_string(),
            variant_index,
            tx.clone(),
        ));
    }
    drop(tx);

    let mut aggregate = Aggregate::new(&request);
    while let Some(report) = rx.recv().await {
        if aggregate.apply(report)
            && !shared.publish(epoch, PipelineState::Generating(aggregate.partial.clone()))
        {
            if !abort_superseded {
                calls.detach_all();
            }
            return;
        }
    }

    let state = aggregate.finish();
    match &state {
        PipelineState::Failed(kind) => log::error!("pipeline: {epoch} failed: {kind}"),
        other => log::info!(
            "pipeline: {epoch} completed with {} artifacts",
            other.artifact_count()
        ),
    }
    shared.publish(epoch, state);
}

async fn run_call(
    context: CallContext,
    token: String,
    variant_index: usize,
    tx: mpsc::UnboundedSender<CallReport>,
) {
    let prompt = prompt_for(&token, variant_index);
    let mut images = context.generator.images(&prompt, context.style, 1);

    let report = match images.next().await {
        Some(Ok(image)) => {
            CallReport::Produced(GeneratedArtifact::remote(&token, variant_index, image))
        }
        Some(Err(ServiceError::Unavailable)) => {
            log::warn!("pipeline: image service unavailable for {token} v{variant_index}, drawing fallback");
            CallReport::Produced(context.fallback.generate(&token, variant_index))
        }
        Some(Err(err)) => {
            log::warn!("pipeline: call for {token} v{variant_index} failed: {err}");
            CallReport::Failed(err.kind())
        }
        None => {
            log::debug!("pipeline: no image returned for {token} v{variant_index}");
            CallReport::Exhausted
        }
    };

    // The aggregator is gone once its epoch was superseded.
    let _ = tx.send(report);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
