use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Context;
use party_core::{
    Effect, Hint, MatchConfig, MatchEvent, MatchEventHandler, PointerEvent, Stroke,
    StrokeRecorder, TurnScheduler,
};
use party_persistence::{PartySettings, SettingsRepository, connect_and_migrate};
use party_types::{
    BankId, Difficulty, MatchError, MatchState, Phase, PromptPlan, Signal, WordSource,
};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::HostConfig;
use crate::prompt_source::{HttpPromptSource, PromptSource, StaticPromptSource};

const CHANNEL_CAPACITY: usize = 256;

/// Out-of-band messages for whoever drives the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostNotice {
    /// Match start refused; the selected bank needs more words
    BankNeedsWords { usable_words: usize, required: usize },
    SettingsNotSaved { reason: String },
}

/// Forwards scheduler events onto the host's broadcast channel
struct BroadcastForwarder {
    sender: broadcast::Sender<MatchEvent>,
}

impl MatchEventHandler for BroadcastForwarder {
    fn handle_event(&mut self, event: MatchEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

struct HostInner {
    scheduler: RwLock<TurnScheduler>,
    settings: RwLock<PartySettings>,
    repository: Option<SettingsRepository>,
    prompt_source: Arc<dyn PromptSource>,
    canvas: Mutex<StrokeRecorder>,
    countdown: Mutex<Option<JoinHandle<()>>>,
    prompt_fetch: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
    events: broadcast::Sender<MatchEvent>,
    notices: broadcast::Sender<HostNotice>,
}

/// Async runtime around a [`TurnScheduler`].
///
/// All signals go through [`MatchHost::dispatch`], which runs the
/// transition under the scheduler lock and then carries out the returned
/// effects: the countdown task, the prompt fetch task, and the canvas.
#[derive(Clone)]
pub struct MatchHost {
    inner: Arc<HostInner>,
}

impl MatchHost {
    pub fn new(
        match_config: MatchConfig,
        tick_interval: Duration,
        prompt_source: Arc<dyn PromptSource>,
        settings: PartySettings,
        repository: Option<SettingsRepository>,
    ) -> Result<Self, MatchError> {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (notices, _) = broadcast::channel(CHANNEL_CAPACITY);

        let mut scheduler = TurnScheduler::new(match_config)?;
        scheduler
            .event_bus_mut()
            .add_handler(Box::new(BroadcastForwarder {
                sender: events.clone(),
            }));

        Ok(Self {
            inner: Arc::new(HostInner {
                scheduler: RwLock::new(scheduler),
                settings: RwLock::new(settings),
                repository,
                prompt_source,
                canvas: Mutex::new(StrokeRecorder::default()),
                countdown: Mutex::new(None),
                prompt_fetch: Mutex::new(None),
                tick_interval,
                events,
                notices,
            }),
        })
    }

    /// Wire up a host from configuration: open the settings database, load
    /// stored settings and pick the prompt generator.
    pub async fn from_config(config: &HostConfig) -> anyhow::Result<Self> {
        let db = connect_and_migrate(&config.database_url).await?;
        let repository = SettingsRepository::new(db);
        let settings = repository.load().await?;

        let prompt_source: Arc<dyn PromptSource> = match &config.prompt_api_url {
            Some(url) => {
                info!("Using prompt generator at {}", url);
                Arc::new(
                    HttpPromptSource::new(url.clone(), config.prompt_api_timeout)
                        .context("Failed to build prompt generator client")?,
                )
            }
            None => {
                info!("No prompt generator configured, using the static list");
                Arc::new(StaticPromptSource)
            }
        };

        Ok(Self::new(
            config.match_config.clone(),
            config.tick_interval,
            prompt_source,
            settings,
            Some(repository),
        )?)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MatchEvent> {
        self.inner.events.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<HostNotice> {
        self.inner.notices.subscribe()
    }

    /// Handle one signal and apply its effects. Effects are applied before
    /// the scheduler lock is released, so they never interleave with a
    /// later transition.
    pub async fn dispatch(&self, signal: Signal) -> Result<Vec<Effect>, MatchError> {
        let mut scheduler = self.inner.scheduler.write().await;
        let effects = scheduler.handle(signal)?;
        self.after_transition(scheduler.state().phase, &effects);
        Ok(effects)
    }

    /// Start a match using the saved word source: generated prompts, or
    /// the active bank's words.
    pub async fn start_match(&self) -> Result<Vec<Effect>, MatchError> {
        let plan = {
            let settings = self.inner.settings.read().await;
            match settings.source {
                WordSource::Ai => PromptPlan::Generated,
                WordSource::Custom => PromptPlan::Bank {
                    prompts: settings.catalog.active_pool(),
                },
            }
        };
        self.dispatch(Signal::StartMatch { plan }).await
    }

    pub async fn snapshot(&self) -> MatchState {
        self.inner.scheduler.read().await.state().clone()
    }

    pub async fn phase(&self) -> Phase {
        self.inner.scheduler.read().await.state().phase
    }

    pub async fn hint(&self) -> Option<Hint> {
        self.inner.scheduler.read().await.hint()
    }

    /// Abort any running background task
    pub fn shutdown(&self) {
        abort_slot(&self.inner.countdown);
        abort_slot(&self.inner.prompt_fetch);
    }

    // Canvas

    pub fn pointer(&self, event: PointerEvent) -> bool {
        lock(&self.inner.canvas).handle_pointer(event)
    }

    pub fn set_brush(&self, color: &str, width: f32) {
        lock(&self.inner.canvas).set_brush(color, width);
    }

    pub fn resize_canvas(&self, width: u32, height: u32) -> bool {
        lock(&self.inner.canvas).resize(width, height)
    }

    pub fn clear_canvas(&self) {
        lock(&self.inner.canvas).clear();
    }

    pub fn strokes(&self) -> Vec<Stroke> {
        lock(&self.inner.canvas).strokes().to_vec()
    }

    // Settings. Every change is written back to the store.

    pub async fn settings(&self) -> PartySettings {
        self.inner.settings.read().await.clone()
    }

    pub async fn set_word_source(&self, source: WordSource) -> Result<(), MatchError> {
        self.update_settings(|settings| {
            settings.source = source;
            Ok(())
        })
        .await
    }

    pub async fn create_bank(&self, name: &str) -> Result<BankId, MatchError> {
        self.update_settings(|settings| settings.catalog.create(name))
            .await
    }

    pub async fn select_bank(&self, bank_id: &str) -> Result<(), MatchError> {
        self.update_settings(|settings| settings.catalog.select(bank_id))
            .await
    }

    pub async fn rename_bank(&self, bank_id: &str, name: &str) -> Result<(), MatchError> {
        self.update_settings(|settings| settings.catalog.rename(bank_id, name))
            .await
    }

    pub async fn delete_bank(&self, bank_id: &str) -> Result<bool, MatchError> {
        self.update_settings(|settings| settings.catalog.delete(bank_id))
            .await
    }

    pub async fn set_bank_words(
        &self,
        bank_id: &str,
        difficulty: Difficulty,
        text: &str,
    ) -> Result<usize, MatchError> {
        self.update_settings(|settings| settings.catalog.set_words(bank_id, difficulty, text))
            .await
    }

    async fn update_settings<T>(
        &self,
        change: impl FnOnce(&mut PartySettings) -> Result<T, MatchError>,
    ) -> Result<T, MatchError> {
        let (result, snapshot) = {
            let mut settings = self.inner.settings.write().await;
            let result = change(&mut *settings)?;
            (result, settings.clone())
        };
        self.persist(&snapshot).await;
        Ok(result)
    }

    async fn persist(&self, settings: &PartySettings) {
        let Some(repository) = &self.inner.repository else {
            return;
        };
        if let Err(e) = repository.save(settings).await {
            warn!("Failed to save settings: {:#}", e);
            let _ = self.inner.notices.send(HostNotice::SettingsNotSaved {
                reason: e.to_string(),
            });
        }
    }

    fn after_transition(&self, phase: Phase, effects: &[Effect]) {
        for effect in effects {
            self.apply_effect(effect);
        }
        lock(&self.inner.canvas).set_active(phase == Phase::Drawing);
    }

    fn apply_effect(&self, effect: &Effect) {
        match effect {
            Effect::StartCountdown { epoch } => self.spawn_countdown(*epoch),
            Effect::StopCountdown => {
                if abort_slot(&self.inner.countdown) {
                    debug!("Countdown stopped");
                }
            }
            Effect::FetchPrompts { count } => self.spawn_prompt_fetch(*count),
            Effect::CancelPromptFetch => {
                if abort_slot(&self.inner.prompt_fetch) {
                    info!("Prompt fetch cancelled");
                }
            }
            Effect::ClearCanvas => lock(&self.inner.canvas).clear(),
            Effect::OpenBankEditor {
                usable_words,
                required,
            } => {
                let _ = self.inner.notices.send(HostNotice::BankNeedsWords {
                    usable_words: *usable_words,
                    required: *required,
                });
            }
        }
    }

    /// One tick per interval, tagged with `epoch`. The loop ends on its own
    /// once a tick leaves `Drawing` or a newer countdown takes over.
    fn spawn_countdown(&self, epoch: u32) {
        let host = self.clone();
        let period = self.inner.tick_interval;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                let mut scheduler = host.inner.scheduler.write().await;
                let live = match scheduler.handle(Signal::Tick { epoch }) {
                    Ok(effects) => {
                        let state = scheduler.state();
                        if !effects.is_empty() {
                            host.after_transition(state.phase, &effects);
                        }
                        state.phase == Phase::Drawing && state.countdown_epoch == epoch
                    }
                    Err(e) => {
                        warn!("Countdown tick rejected: {}", e);
                        false
                    }
                };
                if !live {
                    break;
                }
            }
            debug!("Countdown {} finished", epoch);
        });

        if let Some(previous) = lock(&self.inner.countdown).replace(handle) {
            previous.abort();
        }
        debug!("Countdown {} armed", epoch);
    }

    fn spawn_prompt_fetch(&self, count: usize) {
        let host = self.clone();
        let source = self.inner.prompt_source.clone();
        let handle = tokio::spawn(async move {
            let prompts = source.fetch_prompts(count).await;
            let mut scheduler = host.inner.scheduler.write().await;
            match scheduler.handle(Signal::PromptsLoaded { prompts }) {
                Ok(effects) => host.after_transition(scheduler.state().phase, &effects),
                Err(e) => debug!("Discarding prompt batch: {}", e),
            }
        });

        if let Some(previous) = lock(&self.inner.prompt_fetch).replace(handle) {
            previous.abort();
        }
        info!("Fetching {} prompts", count);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Abort the task in `slot`, returning whether one was still running
fn abort_slot(slot: &Mutex<Option<JoinHandle<()>>>) -> bool {
    match lock(slot).take() {
        Some(handle) => {
            let running = !handle.is_finished();
            handle.abort();
            running
        }
        None => false,
    }
}
