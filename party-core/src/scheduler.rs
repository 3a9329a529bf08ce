use party_types::{
    MatchError, MatchState, Phase, PlayerId, PoolOrigin, Prompt, PromptPlan, Signal, TurnContext,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    CHOICES_PER_TURN, Hint, MatchConfig, MatchEvent, MatchEventBus, PromptPicker, RandomPicker,
    ScoringEngine, choose_prompts, fallback_prompts,
};

/// Side effects the host must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPrompts { count: usize },
    CancelPromptFetch,
    /// Arm a fresh 1-second tick loop tagged with `epoch`
    StartCountdown { epoch: u32 },
    StopCountdown,
    ClearCanvas,
    /// Match start refused: the selected bank has too few words
    OpenBankEditor { usable_words: usize, required: usize },
}

/// Owns the match state and is the only thing allowed to change it.
///
/// Every input arrives as a [`Signal`] through [`TurnScheduler::handle`],
/// which applies at most one transition and returns the effects the host
/// has to perform (arming or tearing down the countdown, fetching prompts).
/// A signal that makes no sense in the current phase is rejected with
/// [`MatchError::InvalidTransition`] and leaves the state untouched.
#[derive(Debug)]
pub struct TurnScheduler<P = RandomPicker> {
    state: MatchState,
    config: MatchConfig,
    picker: P,
    event_bus: MatchEventBus,
}

impl TurnScheduler<RandomPicker> {
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        Self::with_picker(config, RandomPicker::from_os_rng())
    }
}

impl<P: PromptPicker> TurnScheduler<P> {
    pub fn with_picker(config: MatchConfig, picker: P) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            state: MatchState::new(Uuid::new_v4(), config.max_rounds, config.turn_seconds),
            config,
            picker,
            event_bus: MatchEventBus::new(),
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn event_bus_mut(&mut self) -> &mut MatchEventBus {
        &mut self.event_bus
    }

    /// Current hint for guessers, while a prompt is on the canvas
    pub fn hint(&self) -> Option<Hint> {
        if !matches!(self.state.phase, Phase::Drawing | Phase::ConfirmingScore) {
            return None;
        }
        let prompt = self.state.turn.current_prompt.as_ref()?;
        Some(
            self.config
                .hints
                .hint(&prompt.word, prompt.difficulty, self.state.turn.timer),
        )
    }

    pub fn handle(&mut self, signal: Signal) -> Result<Vec<Effect>, MatchError> {
        match (self.state.phase, signal) {
            (Phase::Setup, Signal::AddPlayer { name }) => self.add_player(&name),
            (Phase::Setup, Signal::RemovePlayer { player_id }) => self.remove_player(player_id),
            (_, Signal::AddPlayer { .. } | Signal::RemovePlayer { .. }) => {
                Err(MatchError::RosterLocked)
            }
            (Phase::Setup, Signal::StartMatch { plan }) => self.start_match(plan),
            (Phase::Loading, Signal::PromptsLoaded { prompts }) => self.prompts_loaded(prompts),
            (Phase::PreTurn, Signal::Ready) => {
                self.set_phase(Phase::ChoosingPrompt);
                Ok(Vec::new())
            }
            (Phase::ChoosingPrompt, Signal::ChoosePrompt { index }) => self.choose_prompt(index),
            (_, Signal::Tick { epoch }) => Ok(self.tick(epoch)),
            (Phase::Drawing, Signal::MarkCorrect) => {
                self.state.selected_guessers.clear();
                self.set_phase(Phase::ConfirmingScore);
                Ok(vec![Effect::StopCountdown])
            }
            (Phase::Drawing, Signal::Skip) => {
                self.finish_unsolved(false);
                Ok(vec![Effect::StopCountdown])
            }
            (Phase::ConfirmingScore, Signal::ToggleGuesser { player_id }) => {
                self.toggle_guesser(player_id)
            }
            (Phase::ConfirmingScore, Signal::CancelConfirm) => {
                let epoch = self.next_epoch();
                self.set_phase(Phase::Drawing);
                Ok(vec![Effect::StartCountdown { epoch }])
            }
            (Phase::ConfirmingScore, Signal::SubmitScore) => {
                self.submit_score();
                Ok(Vec::new())
            }
            (Phase::PostTurn, Signal::NextTurn) => {
                self.next_turn();
                Ok(Vec::new())
            }
            (Phase::RoundLeaderboard, Signal::ContinueFromLeaderboard) => {
                self.continue_from_leaderboard();
                Ok(Vec::new())
            }
            (phase, Signal::EndEarly) if phase.is_in_match() => Ok(self.end_early()),
            (Phase::GameOver, Signal::NewMatch) => {
                self.reset(false);
                Ok(vec![Effect::ClearCanvas])
            }
            (Phase::GameOver, Signal::Exit) => {
                self.reset(true);
                Ok(vec![Effect::ClearCanvas])
            }
            (phase, signal) => {
                debug!("Rejected {} during {:?}", signal.name(), phase);
                Err(MatchError::InvalidTransition {
                    phase,
                    signal: signal.name().to_string(),
                })
            }
        }
    }

    fn add_player(&mut self, name: &str) -> Result<Vec<Effect>, MatchError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MatchError::EmptyPlayerName);
        }
        self.state.players.push(party_types::Player::new(name));
        debug!("Added player '{}' ({} total)", name, self.state.players.len());
        Ok(Vec::new())
    }

    fn remove_player(&mut self, player_id: PlayerId) -> Result<Vec<Effect>, MatchError> {
        let index = self
            .state
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| unknown_player(player_id))?;
        self.state.players.remove(index);
        Ok(Vec::new())
    }

    fn start_match(&mut self, plan: PromptPlan) -> Result<Vec<Effect>, MatchError> {
        let player_count = self.state.players.len();
        if player_count < self.config.min_players {
            debug!(
                "Ignoring start with {} players (need {})",
                player_count, self.config.min_players
            );
            return Ok(Vec::new());
        }

        if let PromptPlan::Bank { prompts } = &plan {
            if prompts.len() < CHOICES_PER_TURN {
                info!(
                    "Selected bank has {} usable words, need {}",
                    prompts.len(),
                    CHOICES_PER_TURN
                );
                return Ok(vec![Effect::OpenBankEditor {
                    usable_words: prompts.len(),
                    required: CHOICES_PER_TURN,
                }]);
            }
        }

        self.state.turn = TurnContext::new(self.config.max_rounds, self.config.turn_seconds);
        self.state.history.clear();
        self.state.selected_guessers.clear();
        self.set_phase(Phase::Loading);
        self.event_bus.publish(MatchEvent::MatchStarted {
            match_id: self.state.id,
            player_count,
            max_rounds: self.config.max_rounds,
        });

        match plan {
            PromptPlan::Generated => {
                self.state.pool_origin = PoolOrigin::Generated;
                Ok(vec![Effect::FetchPrompts {
                    count: self.config.prompt_batch_size(player_count),
                }])
            }
            PromptPlan::Bank { prompts } => {
                self.state.pool_origin = PoolOrigin::Bank;
                self.prompts_loaded(prompts)
            }
        }
    }

    fn prompts_loaded(&mut self, prompts: Vec<Prompt>) -> Result<Vec<Effect>, MatchError> {
        let mut pool: Vec<Prompt> = prompts
            .into_iter()
            .filter(|p| !p.word.trim().is_empty())
            .collect();
        if pool.is_empty() {
            warn!("Prompt batch was empty, using the fallback list");
            pool = fallback_prompts();
            self.state.pool_origin = PoolOrigin::Generated;
        }

        debug!("Loaded {} prompts", pool.len());
        self.state.prompt_pool = pool;
        self.begin_turn(0);
        Ok(Vec::new())
    }

    /// Fresh turn context for the player at `index`, with a new prompt offer
    fn begin_turn(&mut self, index: usize) {
        let turn = &mut self.state.turn;
        turn.current_player_index = index;
        turn.current_prompt = None;
        turn.timer = self.config.turn_seconds;
        turn.prompt_choices = choose_prompts(
            &self.state.prompt_pool,
            self.state.pool_origin,
            &mut self.picker,
        );
        self.state.selected_guessers.clear();
        self.set_phase(Phase::PreTurn);
    }

    fn choose_prompt(&mut self, index: usize) -> Result<Vec<Effect>, MatchError> {
        let available = self.state.turn.prompt_choices.len();
        let prompt = self
            .state
            .turn
            .prompt_choices
            .get(index)
            .cloned()
            .ok_or(MatchError::InvalidPromptChoice { index, available })?;

        self.state.turn.current_prompt = Some(prompt.clone());
        self.state.turn.timer = self.config.turn_seconds;
        let epoch = self.next_epoch();
        self.set_phase(Phase::Drawing);

        if let Some(drawer) = self.state.drawer() {
            let drawer = drawer.id;
            self.event_bus.publish(MatchEvent::PromptChosen {
                match_id: self.state.id,
                drawer,
                prompt,
            });
        }
        Ok(vec![Effect::ClearCanvas, Effect::StartCountdown { epoch }])
    }

    /// One countdown second. The final tick appends the timeout entry and
    /// leaves `Drawing` in the same update, so `timer == 0` is never
    /// observable while still drawing.
    fn tick(&mut self, epoch: u32) -> Vec<Effect> {
        if self.state.phase != Phase::Drawing || epoch != self.state.countdown_epoch {
            debug!(
                "Ignoring stale tick (epoch {}, current {}, phase {:?})",
                epoch, self.state.countdown_epoch, self.state.phase
            );
            return Vec::new();
        }

        if self.state.turn.timer > 1 {
            self.state.turn.timer -= 1;
            return Vec::new();
        }

        self.state.turn.timer = 0;
        self.finish_unsolved(true);
        vec![Effect::StopCountdown]
    }

    fn finish_unsolved(&mut self, timed_out: bool) {
        let drawer = self.state.players.get(self.state.turn.current_player_index);
        let entry = ScoringEngine::unsolved_entry(drawer, self.state.turn.current_prompt.as_ref());
        info!(
            "Turn by '{}' ended unsolved ({})",
            entry.player_name,
            if timed_out { "timeout" } else { "skipped" }
        );
        self.state.history.push(entry.clone());
        self.set_phase(Phase::PostTurn);
        self.event_bus.publish(MatchEvent::TurnCompleted {
            match_id: self.state.id,
            entry,
            deltas: Vec::new(),
            timed_out,
        });
    }

    fn toggle_guesser(&mut self, player_id: PlayerId) -> Result<Vec<Effect>, MatchError> {
        if self.state.player(player_id).is_none() {
            return Err(unknown_player(player_id));
        }
        if self.state.drawer().is_some_and(|d| d.id == player_id) {
            return Err(MatchError::DrawerCannotGuess);
        }

        let selected = &mut self.state.selected_guessers;
        if let Some(position) = selected.iter().position(|id| *id == player_id) {
            selected.remove(position);
        } else {
            selected.push(player_id);
        }
        Ok(Vec::new())
    }

    fn submit_score(&mut self) {
        if self.state.turn.current_prompt.is_none() {
            warn!("Scoring a turn without a prompt, using the easy tier");
        }

        let score = ScoringEngine::score_turn(
            &self.state.players,
            self.state.turn.current_player_index,
            self.state.turn.current_prompt.as_ref(),
            self.state.turn.timer,
            &self.state.selected_guessers,
            self.config.speed_bonus_seconds,
        );
        ScoringEngine::apply(&mut self.state.players, &score.deltas);
        info!(
            "Turn by '{}' scored: {} winner(s){}",
            score.entry.player_name,
            score.entry.winners.len(),
            if score.speed_bonus { " with speed bonus" } else { "" }
        );

        self.state.history.push(score.entry.clone());
        self.state.selected_guessers.clear();
        self.set_phase(Phase::PostTurn);
        self.event_bus.publish(MatchEvent::TurnCompleted {
            match_id: self.state.id,
            entry: score.entry,
            deltas: score.deltas,
            timed_out: false,
        });
    }

    fn next_turn(&mut self) {
        let player_count = self.state.players.len();
        let next = (self.state.turn.current_player_index + 1) % player_count.max(1);

        if next == 0 {
            self.state.turn.current_player_index = 0;
            self.state.turn.current_prompt = None;
            self.set_phase(Phase::RoundLeaderboard);
            self.event_bus.publish(MatchEvent::RoundCompleted {
                match_id: self.state.id,
                round: self.state.turn.round,
            });
        } else {
            self.begin_turn(next);
        }
    }

    fn continue_from_leaderboard(&mut self) {
        if self.state.turn.round >= self.state.turn.max_rounds {
            self.set_phase(Phase::GameOver);
            self.event_bus.publish(MatchEvent::MatchEnded {
                match_id: self.state.id,
                early: false,
            });
            return;
        }
        self.state.turn.round += 1;
        self.begin_turn(0);
    }

    fn end_early(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::StopCountdown];
        if self.state.phase == Phase::Loading {
            effects.push(Effect::CancelPromptFetch);
        }
        // Any tick already in flight now carries a stale epoch
        self.next_epoch();
        self.state.selected_guessers.clear();
        self.set_phase(Phase::GameOver);
        self.event_bus.publish(MatchEvent::MatchEnded {
            match_id: self.state.id,
            early: true,
        });
        effects
    }

    /// Back to `Setup`. Scores and history always reset; the roster
    /// survives unless `clear_roster` is set.
    fn reset(&mut self, clear_roster: bool) {
        let mut players = std::mem::take(&mut self.state.players);
        if clear_roster {
            players.clear();
        }
        for player in &mut players {
            player.score = 0;
        }

        let epoch = self.state.countdown_epoch;
        self.state = MatchState::new(
            Uuid::new_v4(),
            self.config.max_rounds,
            self.config.turn_seconds,
        );
        self.state.players = players;
        self.state.countdown_epoch = epoch;
        self.state.phase = Phase::GameOver;
        self.set_phase(Phase::Setup);
    }

    fn next_epoch(&mut self) -> u32 {
        self.state.countdown_epoch = self.state.countdown_epoch.wrapping_add(1);
        self.state.countdown_epoch
    }

    fn set_phase(&mut self, phase: Phase) {
        let from = self.state.phase;
        self.state.phase = phase;
        info!("Match {} phase {:?} -> {:?}", self.state.id, from, phase);
        self.event_bus.publish(MatchEvent::PhaseChanged {
            match_id: self.state.id,
            from,
            to: phase,
        });
    }
}

fn unknown_player(player_id: PlayerId) -> MatchError {
    MatchError::UnknownPlayer {
        player_id: player_id.to_string(),
    }
}
