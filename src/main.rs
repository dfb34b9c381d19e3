//! Command-line demo — emoji-translate.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Pick emoji: the command-line arguments, or a random draw from the
//!    built-in catalog, capped by `generation.max_selection`.
//! 4. Prepare and run the translation through a [`TaskScheduler`].
//! 5. Illustrate the selection with a [`GenerationPipeline`], printing every
//!    state it publishes.
//!
//! ```text
//! emoji-translate              # random picks
//! emoji-translate 🐶 🌸 😀     # explicit picks
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use tokio::sync::watch;

use emoji_translate::{
    config::AppConfig,
    emoji::{display_name, EmojiCatalog, Selection},
    pipeline::{GenerationPipeline, PipelineState},
    request::LanguagePair,
    scheduler::{TaskOutcome, TaskRunner, TaskScheduler},
    service::{
        ApiImageGenerator, ApiTranslator, ImageGenerator, Translator, UnsupportedImageGenerator,
    },
    translation::{PrepareTask, TranslationTask},
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wait until `rx` holds a terminal outcome and return it.
async fn settle<T: Clone>(rx: &mut watch::Receiver<TaskOutcome<T>>) -> Result<TaskOutcome<T>> {
    let outcome = rx.wait_for(TaskOutcome::is_terminal).await?;
    Ok(TaskOutcome::clone(&outcome))
}

/// Run `runner` once for `tokens` and wait for its outcome.
async fn run_once<R: TaskRunner>(
    runner: R,
    config: &AppConfig,
    tokens: &[String],
    pair: &LanguagePair,
) -> Result<TaskOutcome<R::Output>> {
    let scheduler = TaskScheduler::with_config(runner, &config.scheduler);
    let mut outcomes = scheduler.observe();
    scheduler.submit(scheduler.configure(tokens.iter().cloned(), pair.clone()));
    settle(&mut outcomes).await
}

fn pick(config: &AppConfig) -> Selection {
    let mut selection = Selection::new(config.generation.max_selection);
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        let catalog = EmojiCatalog::builtin();
        let mut rng = rand::thread_rng();
        let grid = catalog.sample(config.catalog.display_count, &mut rng);
        log::info!("Picker grid: {}", grid.concat());
        for emoji in grid.choose_multiple(&mut rng, selection.max()) {
            selection.toggle(emoji);
        }
    } else {
        for emoji in &args {
            if !selection.toggle(emoji) {
                log::warn!("Ignoring {emoji}: at most {} emoji can be picked", selection.max());
            }
        }
    }
    selection
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("emoji-translate starting up");

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let selection = pick(&config);
    if selection.is_empty() {
        return Err(anyhow!("no emoji selected"));
    }
    let tokens = selection.tokens().to_vec();
    for token in &tokens {
        println!("{token}  {}", display_name(token));
    }

    // --- Translation -------------------------------------------------------
    let target = config
        .translation
        .default_target()
        .ok_or_else(|| anyhow!("no target languages configured"))?;
    let pair = LanguagePair::new(config.translation.source_language.clone(), target.id.clone());
    println!("\nTranslating into {} …", target.name);

    let translator: Arc<dyn Translator> = Arc::new(ApiTranslator::from_config(&config.translation));

    match run_once(PrepareTask::new(Arc::clone(&translator)), &config, &tokens, &pair).await? {
        TaskOutcome::Failed(_, kind) => println!("{}", kind.translation_message()),
        _ => {
            let task = TranslationTask::new(translator, config.translation.languages.clone());
            match run_once(task, &config, &tokens, &pair).await? {
                TaskOutcome::Succeeded(_, translation) => {
                    println!("{}", translation.text);
                    for (token, text) in translation.spoken_parts() {
                        println!("  {token}  {text}  [{}]", translation.voice);
                    }
                }
                TaskOutcome::Failed(_, kind) => println!("{}", kind.translation_message()),
                _ => {}
            }
        }
    }

    // --- Image generation --------------------------------------------------
    let generator: Arc<dyn ImageGenerator> = if config.generation.uses_remote() {
        Arc::new(ApiImageGenerator::from_config(&config.generation))
    } else {
        log::info!("Image generation disabled or no API key set; drawing placeholders");
        Arc::new(UnsupportedImageGenerator)
    };
    let pipeline = GenerationPipeline::from_config(generator, &config.generation, &config.scheduler);
    let mut states = pipeline.observe();

    println!("\nGenerating images …");
    pipeline.start(pipeline.request(tokens));

    loop {
        states.changed().await?;
        let state = states.borrow_and_update().clone();
        match &state {
            PipelineState::Generating(partial) => {
                println!("  {} ({} ready)", state.label(), partial.len());
            }
            PipelineState::Completed(groups) => {
                for group in groups {
                    println!("{}", group.token);
                    for artifact in &group.artifacts {
                        println!(
                            "  v{} {:?} {} ({} bytes)",
                            artifact.variant_index,
                            artifact.origin,
                            artifact.payload.media_type,
                            artifact.payload.bytes.len()
                        );
                    }
                }
                break;
            }
            PipelineState::Failed(kind) => {
                println!("{}", kind.generation_message());
                break;
            }
            PipelineState::Idle => {}
        }
    }

    Ok(())
}
