//! Core game logic and state management
//!
//! This module contains the [`Game`] store: the single owner of the board,
//! the scores, the presentation cursor, the Daily Double wager dialog and the
//! final round. Every interaction, whether a click, a key press, a host
//! button or an alarm firing, is applied through [`Game::receive_message`]
//! or [`Game::receive_alarm`] and runs to completion before the next one.

use std::fmt::Debug;

use enum_map::EnumMap;
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    AlarmMessage,
    board::{
        self, Activation, Board, TileView,
        config::BoardConfig,
        tile::{TileKey, WrongAnswer},
        wager::{self, WagerModal, WagerModalMessage},
    },
    constants::{daily_double, final_round::DEFAULT_COUNTDOWN_SECONDS},
    final_round,
    presentation::{Command, Cursor},
    scores::{Scoreboard, Team},
    session::Tunnel,
    sound::{self, Cue, Speaker},
};

/// Which screen the room is looking at
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// The category grid
    #[default]
    Board,
    /// Final Jeopardy
    FinalRound,
}

type ValidationResult = garde::Result;

fn validate_splash(val: &web_time::Duration, _ctx: &()) -> ValidationResult {
    let bounds = daily_double::MIN_SPLASH_SECONDS..=daily_double::MAX_SPLASH_SECONDS;
    if bounds.contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "splash is outside of the bounds [{},{}]",
            daily_double::MIN_SPLASH_SECONDS,
            daily_double::MAX_SPLASH_SECONDS,
        )))
    }
}

/// Tunable game options
#[serde_with::serde_as]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Options {
    /// How many Daily Doubles to hide on the board
    #[garde(range(max = daily_double::MAX_COUNT))]
    daily_doubles: usize,
    /// How long the Daily Double splash shows before the wager dialog
    #[garde(custom(validate_splash))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    splash: web_time::Duration,
    /// Length of the Final Jeopardy countdown in seconds
    #[garde(range(
        min = crate::constants::final_round::MIN_COUNTDOWN_SECONDS,
        max = crate::constants::final_round::MAX_COUNTDOWN_SECONDS
    ))]
    countdown_seconds: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            daily_doubles: daily_double::DEFAULT_COUNT,
            splash: web_time::Duration::from_millis(daily_double::DEFAULT_SPLASH_MILLIS),
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
        }
    }
}

impl Options {
    /// Sets the number of Daily Doubles
    #[must_use]
    pub fn with_daily_doubles(self, daily_doubles: usize) -> Self {
        Self {
            daily_doubles,
            ..self
        }
    }

    /// Sets the splash duration
    #[must_use]
    pub fn with_splash(self, splash: web_time::Duration) -> Self {
        Self { splash, ..self }
    }

    /// Sets the countdown length
    #[must_use]
    pub fn with_countdown_seconds(self, countdown_seconds: u32) -> Self {
        Self {
            countdown_seconds,
            ..self
        }
    }
}

/// Input arriving from the host's devices
#[derive(Debug, Deserialize, Clone)]
pub enum IncomingMessage {
    /// Pointer click on a tile
    Click {
        /// Category column
        category: usize,
        /// Row, 0 being the cheapest
        row: usize,
    },
    /// A key press, named as `KeyboardEvent.key`
    Key(String),
    /// A host control button
    Host(IncomingHostMessage),
    /// Interaction with the Daily Double wager dialog
    Wager(IncomingWagerMessage),
    /// Interaction with the final round screen
    FinalRound(final_round::IncomingMessage),
}

/// Host control buttons next to the board
#[derive(Debug, Deserialize, Clone, Copy)]
pub enum IncomingHostMessage {
    /// Start over: all tiles, scores and wagers
    ResetBoard,
    /// Turn every unfinished tile face down
    HideAll,
    /// Switch to keyboard driven presentation mode
    EnterPresentation,
    /// Switch to the final round screen
    StartFinalRound,
    /// Sound check for a single cue
    TestCue(Cue),
    /// Silence the think music
    StopThink,
}

/// Interaction with the wager dialog
#[derive(Debug, Deserialize, Clone)]
pub enum IncomingWagerMessage {
    /// The input field changed
    Input(String),
    /// Lock in the wager and reveal the question
    Confirm,
    /// Close the dialog without revealing
    Cancel,
}

/// Presentation mode heads-up display
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HudMessage {
    /// Highlighted tile
    pub active: TileKey,
    /// Title of the highlighted tile's category
    pub category: String,
    /// Team scored by Enter and `w`
    pub selected_team: Option<Team>,
    /// Teams locked out of the highlighted tile
    pub locked_out: Vec<Team>,
}

/// Incremental board updates
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// A tile changed what it shows
    Tile(TileView),
    /// Scores changed
    Scores(EnumMap<Team, i64>),
    /// Cursor, selected team or lockouts changed
    Hud(HudMessage),
    /// Presentation mode was entered or left
    PresentationMode(bool),
    /// Show or hide the full screen Daily Double splash
    DailyDoubleSplash(bool),
    /// Open, update or close the wager dialog
    WagerModal(Option<WagerModalMessage>),
}

/// The whole board screen
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
pub struct BoardSnapshot {
    /// Category titles
    pub categories: Vec<String>,
    /// Tiles, one row per face value
    pub rows: Vec<Vec<TileView>>,
    /// Team scores
    pub scores: EnumMap<Team, i64>,
    /// Whether presentation mode is on
    pub presentation_mode: bool,
    /// Heads-up display, present while presentation mode is on
    pub hud: Option<HudMessage>,
    /// Team highlighted on the scoreboard
    pub selected_team: Option<Team>,
    /// Whether the Daily Double splash is showing
    pub daily_double_splash: bool,
    /// The wager dialog, if open
    pub wager_modal: Option<WagerModalMessage>,
}

/// Snapshot messages for the board screen
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The whole board screen
    Board(Box<BoardSnapshot>),
}

/// The quiz board session
///
/// A `Game` lives for as long as the board is on screen. Daily Doubles are
/// drawn once, when it is created.
pub struct Game {
    board: Board,
    scores: Scoreboard,
    cursor: Cursor,
    selected_team: Option<Team>,
    presentation_mode: bool,
    daily_double_splash: bool,
    wager_modal: Option<WagerModal>,
    screen: Screen,
    final_round: final_round::State,
    options: Options,
}

impl Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("screen", &self.screen)
            .field("scores", &self.scores)
            .field("presentation_mode", &self.presentation_mode)
            .finish_non_exhaustive()
    }
}

// Accessors
impl Game {
    /// The board store
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Team scores
    pub fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    /// Presentation cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Team that Enter and `w` would score
    pub fn selected_team(&self) -> Option<Team> {
        self.selected_team
    }

    /// Whether presentation mode is on
    pub fn presentation_mode(&self) -> bool {
        self.presentation_mode
    }

    /// Whether the Daily Double splash is showing
    pub fn daily_double_splash(&self) -> bool {
        self.daily_double_splash
    }

    /// The open wager dialog
    pub fn wager_modal(&self) -> Option<&WagerModal> {
        self.wager_modal.as_ref()
    }

    /// Current screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Final round state
    pub fn final_round(&self) -> &final_round::State {
        &self.final_round
    }

    fn active_key(&self) -> Option<TileKey> {
        self.board
            .config()
            .key_at(self.cursor.category(), self.cursor.row())
    }

    fn overlay_open(&self) -> bool {
        self.daily_double_splash || self.wager_modal.is_some()
    }

    fn wager_cap(&self, key: TileKey) -> i64 {
        wager::wager_cap(
            self.selected_team.map(|team| self.scores.score(team)),
            key.value(),
        )
    }

    fn hud_message(&self) -> Option<HudMessage> {
        let active = self.active_key()?;
        Some(HudMessage {
            active,
            category: self
                .board
                .config()
                .category_title(active.category())
                .unwrap_or_default()
                .to_owned(),
            selected_team: self.selected_team,
            locked_out: self
                .board
                .tile(active)
                .map(|tile| tile.locked_out().collect_vec())
                .unwrap_or_default(),
        })
    }

    fn wager_modal_message(&self) -> Option<WagerModalMessage> {
        self.wager_modal
            .as_ref()
            .map(|modal| modal.message(self.wager_cap(modal.key())))
    }

    fn board_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            categories: self.board.config().categories().to_vec(),
            rows: self.board.rows(),
            scores: *self.scores.scores(),
            presentation_mode: self.presentation_mode,
            hud: if self.presentation_mode {
                self.hud_message()
            } else {
                None
            },
            selected_team: self.selected_team,
            daily_double_splash: self.daily_double_splash,
            wager_modal: self.wager_modal_message(),
        }
    }

    /// Full snapshot of what should currently be on screen
    pub fn state_message(&self) -> crate::SyncMessage {
        match self.screen {
            Screen::Board => SyncMessage::Board(Box::new(self.board_snapshot())).into(),
            Screen::FinalRound => self
                .final_round
                .state_message(self.board.config().final_clue(), &self.scores)
                .into(),
        }
    }
}

// Announcements
impl Game {
    fn announce_tile<T: Tunnel>(&self, key: TileKey, tunnel: &T) {
        if let Some(view) = self.board.tile_view(key) {
            tunnel.send_message(&UpdateMessage::Tile(view).into());
        }
    }

    fn announce_scores<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_message(&UpdateMessage::Scores(*self.scores.scores()).into());
    }

    fn announce_hud<T: Tunnel>(&self, tunnel: &T) {
        if !self.presentation_mode {
            return;
        }
        if let Some(hud) = self.hud_message() {
            tunnel.send_message(&UpdateMessage::Hud(hud).into());
        }
    }

    fn announce_wager_modal<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_message(&UpdateMessage::WagerModal(self.wager_modal_message()).into());
    }

    fn announce_state<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message());
    }
}

impl Game {
    /// Creates a new game on `config` and draws its Daily Doubles
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jeopardy::board::config::BoardConfig;
    /// use jeopardy::game::{Game, Options};
    ///
    /// let game = Game::new(BoardConfig::demo(), Options::default());
    /// assert_eq!(game.board().daily_doubles().len(), 2);
    /// ```
    pub fn new(config: BoardConfig, options: Options) -> Self {
        Self::with_rng(config, options, &mut fastrand::Rng::new())
    }

    /// Creates a new game drawing its Daily Doubles from `rng`
    pub fn with_rng(config: BoardConfig, options: Options, rng: &mut fastrand::Rng) -> Self {
        Self {
            board: Board::new(config, options.daily_doubles, rng),
            scores: Scoreboard::default(),
            cursor: Cursor::default(),
            selected_team: None,
            presentation_mode: false,
            daily_double_splash: false,
            wager_modal: None,
            screen: Screen::Board,
            final_round: final_round::State::default(),
            options,
        }
    }

    /// Handles input from the host
    ///
    /// # Arguments
    ///
    /// * `message` - The incoming input
    /// * `schedule_message` - Function to schedule delayed alarms
    /// * `tunnel` - Surface to render on
    /// * `speaker` - Output for sound cues
    ///
    /// # Type Parameters
    ///
    /// * `T` - Type implementing the Tunnel trait for the render surface
    /// * `P` - Type implementing the Speaker trait for sound cues
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_message<
        T: Tunnel,
        P: Speaker + ?Sized,
        S: FnMut(AlarmMessage, web_time::Duration),
    >(
        &mut self,
        message: IncomingMessage,
        mut schedule_message: S,
        tunnel: &T,
        speaker: &P,
    ) {
        match message {
            IncomingMessage::FinalRound(message) => {
                if self.screen != Screen::FinalRound {
                    return;
                }
                let done = self.final_round.receive_message(
                    &message,
                    self.board.config().final_clue(),
                    &self.scores,
                    self.options.countdown_seconds,
                    schedule_message,
                    tunnel,
                    speaker,
                );
                if done {
                    tracing::info!("left final round");
                    self.screen = Screen::Board;
                    self.announce_state(tunnel);
                }
            }
            _ if self.screen == Screen::FinalRound => {
                tracing::trace!("board input ignored during final round");
            }
            IncomingMessage::Click { category, row } => {
                if self.presentation_mode || self.overlay_open() {
                    return;
                }
                if let Some(key) = self.board.config().key_at(category, row) {
                    self.activate_tile(key, &mut schedule_message, tunnel, speaker);
                }
            }
            IncomingMessage::Key(key) => {
                self.receive_key(&key, &mut schedule_message, tunnel, speaker);
            }
            IncomingMessage::Host(message) => {
                if self.presentation_mode {
                    return;
                }
                self.receive_host_message(message, tunnel, speaker);
            }
            IncomingMessage::Wager(message) => self.receive_wager_message(message, tunnel),
        }
    }

    /// Handles an alarm scheduled by an earlier message
    ///
    /// # Type Parameters
    ///
    /// * `T` - Type implementing the Tunnel trait for the render surface
    /// * `P` - Type implementing the Speaker trait for sound cues
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_alarm<
        T: Tunnel,
        P: Speaker + ?Sized,
        S: FnMut(AlarmMessage, web_time::Duration),
    >(
        &mut self,
        message: &AlarmMessage,
        schedule_message: S,
        tunnel: &T,
        speaker: &P,
    ) {
        match message {
            // The splash captured its tile key and cannot be cancelled, so the
            // dialog opens even if the board changed in the meantime.
            AlarmMessage::Board(board::AlarmMessage::OpenWager { key }) => {
                self.daily_double_splash = false;
                tunnel.send_message(&UpdateMessage::DailyDoubleSplash(false).into());
                self.wager_modal = Some(WagerModal::new(*key));
                tracing::debug!(%key, "opened wager dialog");
                self.announce_wager_modal(tunnel);
            }
            AlarmMessage::FinalRound(message) => {
                self.final_round
                    .receive_alarm(message, schedule_message, tunnel, speaker);
            }
        }
    }

    /// Clears tiles, scores, wagers and the selected team, and closes the
    /// wager dialog
    ///
    /// The Daily Double draw, the cursor and presentation mode are kept.
    pub fn reset_board(&mut self) {
        tracing::info!("board reset");
        self.board.reset();
        self.scores.reset();
        self.wager_modal = None;
        self.selected_team = None;
    }

    fn activate_tile<T: Tunnel, P: Speaker + ?Sized, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        key: TileKey,
        schedule_message: &mut S,
        tunnel: &T,
        speaker: &P,
    ) {
        let activation = self.board.activate(key);
        tracing::debug!(%key, ?activation, "tile activated");

        match activation {
            Activation::Ignored => {}
            Activation::DailyDouble => {
                sound::play_cue(speaker, Cue::DailyDouble);
                self.daily_double_splash = true;
                tunnel.send_message(&UpdateMessage::DailyDoubleSplash(true).into());
                schedule_message(
                    board::AlarmMessage::OpenWager { key }.into(),
                    self.options.splash,
                );
            }
            Activation::Revealed => {
                sound::play_cue(speaker, Cue::RevealQuestion);
                self.announce_tile(key, tunnel);
                self.announce_hud(tunnel);
            }
            Activation::AnswerShown => {
                sound::play_cue(speaker, Cue::RevealAnswer);
                self.announce_tile(key, tunnel);
            }
            Activation::Completed => {
                sound::play_cue(speaker, Cue::Incorrect);
                self.selected_team = None;
                self.announce_tile(key, tunnel);
                self.announce_hud(tunnel);
            }
        }
    }

    fn receive_key<T: Tunnel, P: Speaker + ?Sized, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        key: &str,
        schedule_message: &mut S,
        tunnel: &T,
        speaker: &P,
    ) {
        if !self.presentation_mode || self.wager_modal.is_some() {
            return;
        }
        let Some(command) = Command::from_key(key) else {
            return;
        };

        match command {
            Command::Move(direction) => {
                let config = self.board.config();
                if self
                    .cursor
                    .step(direction, config.row_count(), config.category_count())
                {
                    self.announce_hud(tunnel);
                }
            }
            Command::SelectTeam(team) => {
                self.selected_team = Some(team);
                self.announce_hud(tunnel);
            }
            Command::Activate => {
                if let Some(key) = self.active_key() {
                    self.activate_tile(key, schedule_message, tunnel, speaker);
                }
            }
            Command::Correct => {
                let (Some(key), Some(team)) = (self.active_key(), self.selected_team) else {
                    return;
                };
                if let Some(award) = self.board.mark_correct(key, team, &mut self.scores) {
                    tracing::debug!(%key, %team, award, "correct answer");
                    sound::play_cue(speaker, Cue::Correct);
                    self.selected_team = None;
                    self.announce_scores(tunnel);
                    self.announce_tile(key, tunnel);
                    self.announce_hud(tunnel);
                }
            }
            Command::Wrong => {
                let (Some(key), Some(team)) = (self.active_key(), self.selected_team) else {
                    return;
                };
                let outcome = self.board.mark_wrong(key, team, &mut self.scores);
                if outcome == WrongAnswer::Ignored {
                    return;
                }
                tracing::debug!(%key, %team, ?outcome, "wrong answer");
                sound::play_cue(speaker, Cue::Incorrect);
                if outcome == WrongAnswer::Completed {
                    self.selected_team = None;
                    self.announce_tile(key, tunnel);
                }
                self.announce_scores(tunnel);
                self.announce_hud(tunnel);
            }
            Command::Exit => {
                self.presentation_mode = false;
                tunnel.send_message(&UpdateMessage::PresentationMode(false).into());
            }
        }
    }

    fn receive_host_message<T: Tunnel, P: Speaker + ?Sized>(
        &mut self,
        message: IncomingHostMessage,
        tunnel: &T,
        speaker: &P,
    ) {
        match message {
            IncomingHostMessage::ResetBoard => {
                self.reset_board();
                self.announce_state(tunnel);
            }
            IncomingHostMessage::HideAll => {
                self.board.hide_all();
                self.announce_state(tunnel);
            }
            IncomingHostMessage::EnterPresentation => {
                self.presentation_mode = true;
                tunnel.send_message(&UpdateMessage::PresentationMode(true).into());
                self.announce_hud(tunnel);
            }
            IncomingHostMessage::StartFinalRound => {
                tracing::info!("entered final round");
                self.screen = Screen::FinalRound;
                self.announce_state(tunnel);
            }
            IncomingHostMessage::TestCue(cue) => sound::play_cue(speaker, cue),
            IncomingHostMessage::StopThink => sound::stop_cue(speaker, Cue::FinalThink),
        }
    }

    fn receive_wager_message<T: Tunnel>(&mut self, message: IncomingWagerMessage, tunnel: &T) {
        let Some(key) = self.wager_modal.as_ref().map(WagerModal::key) else {
            return;
        };

        match message {
            IncomingWagerMessage::Input(input) => {
                let cap = self.wager_cap(key);
                if let Some(modal) = &mut self.wager_modal {
                    modal.enter(&input, cap);
                }
                self.announce_wager_modal(tunnel);
            }
            IncomingWagerMessage::Confirm => {
                let Some(modal) = self.wager_modal.take() else {
                    return;
                };
                let amount = modal.resolve();
                tracing::debug!(%key, amount, "daily double wager placed");
                self.board.place_wager(key, amount);
                self.announce_wager_modal(tunnel);
                self.announce_tile(key, tunnel);
                self.announce_hud(tunnel);
            }
            IncomingWagerMessage::Cancel => {
                self.wager_modal = None;
                self.announce_wager_modal(tunnel);
            }
        }
    }
}
