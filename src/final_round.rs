//! Final Jeopardy
//!
//! The final round replaces the board with its own screen. Teams with a
//! positive score enter a wager, the host reveals the question, optionally
//! runs the countdown, and finally reveals the answer. Scoring is left to
//! the host: nothing here touches the scoreboard.

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{
    board::{config::FinalClue, wager::parse_amount},
    constants::final_round::TICK_MILLIS,
    scores::{Scoreboard, Team},
    session::Tunnel,
    sound::{self, Cue, Speaker},
};

/// Progress through the final round
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Teams are entering wagers, the question is hidden
    #[default]
    WagerEntry,
    /// Wagers are locked and the question is showing
    QuestionRevealed,
    /// The correct response is showing
    AnswerRevealed,
}

/// Host controls on the final round screen
#[derive(Debug, Clone, Deserialize)]
pub enum IncomingMessage {
    /// Raw wager input for a team
    Wager {
        /// The wagering team
        team: Team,
        /// Text typed by the host
        input: String,
    },
    /// Lock the wagers and reveal the question
    LockWagers,
    /// Start, or restart, the countdown
    StartTimer,
    /// Reveal the correct response
    RevealAnswer,
    /// Leave the final round and return to the board
    Exit,
}

/// Alarm messages for the countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// One second of the countdown has elapsed
    Tick {
        /// Countdown run that scheduled this tick
        epoch: u64,
    },
}

/// Incremental final round updates
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// A team's wager changed
    Wager {
        /// The wagering team
        team: Team,
        /// The clamped wager
        wager: i64,
    },
    /// Wagers are locked, show the question
    QuestionAnnouncement {
        /// The final question
        question: String,
    },
    /// Seconds left on the countdown
    Countdown(u32),
    /// Show the correct response
    AnswerAnnouncement {
        /// The correct response
        answer: String,
    },
}

/// One team's line on the final round screen
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TeamWager {
    /// The team
    pub team: Team,
    /// Score carried in from the board
    pub score: i64,
    /// Current wager, always 0 for eliminated teams
    pub wager: i64,
    /// Whether the team finished the board at or below zero
    pub eliminated: bool,
}

/// Complete final round screen
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
pub struct Snapshot {
    /// Final category
    pub category: String,
    /// Current phase
    pub phase: Phase,
    /// Every team's score and wager
    pub teams: Vec<TeamWager>,
    /// The question, once wagers are locked
    pub question: Option<String>,
    /// Seconds left, once the countdown has been started
    pub countdown: Option<u32>,
    /// The correct response, once revealed
    pub answer: Option<String>,
}

/// Snapshot messages for the final round screen
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The whole screen
    Screen(Snapshot),
}

/// Whether a team may not wager because its score is not positive
pub fn is_eliminated(score: i64) -> bool {
    score <= 0
}

/// Coerces host input into a legal final wager for a team with `score`
///
/// Eliminated teams always wager 0. Non-numeric input counts as 0.
pub fn final_wager(input: &str, score: i64) -> i64 {
    if is_eliminated(score) {
        return 0;
    }
    parse_amount(input).unwrap_or(0).clamp(0, score)
}

/// Runtime state of the final round
#[derive(Debug, Clone, Default)]
pub struct State {
    phase: Phase,
    wagers: EnumMap<Team, i64>,
    countdown: Option<u32>,
    epoch: u64,
}

impl State {
    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Wager of a team, 0 for eliminated teams
    pub fn wager(&self, team: Team, scores: &Scoreboard) -> i64 {
        if is_eliminated(scores.score(team)) {
            0
        } else {
            self.wagers[team]
        }
    }

    /// Seconds left, if the countdown was started
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    /// Builds the snapshot of the final round screen
    pub fn state_message(&self, clue: &FinalClue, scores: &Scoreboard) -> SyncMessage {
        let question_visible = self.phase != Phase::WagerEntry;
        SyncMessage::Screen(Snapshot {
            category: clue.category.clone(),
            phase: self.phase,
            teams: Team::ALL
                .into_iter()
                .map(|team| TeamWager {
                    team,
                    score: scores.score(team),
                    wager: self.wager(team, scores),
                    eliminated: is_eliminated(scores.score(team)),
                })
                .collect_vec(),
            question: question_visible.then(|| clue.question.clone()),
            countdown: self.countdown,
            answer: (self.phase == Phase::AnswerRevealed).then(|| clue.answer.clone()),
        })
    }

    /// Handles a host control on the final round screen
    ///
    /// # Arguments
    ///
    /// * `message` - The host control
    /// * `clue` - The final clue
    /// * `scores` - Scores carried in from the board
    /// * `countdown_seconds` - Length of the countdown
    /// * `schedule_message` - Function to schedule countdown ticks
    /// * `tunnel` - Surface to render on
    /// * `speaker` - Output for sound cues
    ///
    /// # Returns
    ///
    /// `true` if the host left the final round; the state is already reset
    pub fn receive_message<
        T: Tunnel,
        P: Speaker + ?Sized,
        S: FnMut(crate::AlarmMessage, web_time::Duration),
    >(
        &mut self,
        message: &IncomingMessage,
        clue: &FinalClue,
        scores: &Scoreboard,
        countdown_seconds: u32,
        mut schedule_message: S,
        tunnel: &T,
        speaker: &P,
    ) -> bool {
        match message {
            IncomingMessage::Wager { team, input } => {
                if self.phase != Phase::WagerEntry {
                    return false;
                }
                let score = scores.score(*team);
                if is_eliminated(score) {
                    tracing::trace!(%team, score, "ignoring wager from eliminated team");
                    return false;
                }
                let wager = final_wager(input, score);
                self.wagers[*team] = wager;
                tunnel.send_message(&UpdateMessage::Wager { team: *team, wager }.into());
            }
            IncomingMessage::LockWagers => {
                if self.phase != Phase::WagerEntry {
                    return false;
                }
                self.phase = Phase::QuestionRevealed;
                tracing::info!("final wagers locked");
                tunnel.send_message(
                    &UpdateMessage::QuestionAnnouncement {
                        question: clue.question.clone(),
                    }
                    .into(),
                );
            }
            IncomingMessage::StartTimer => {
                if self.phase == Phase::WagerEntry {
                    return false;
                }
                self.start_timer(countdown_seconds, &mut schedule_message, tunnel, speaker);
            }
            IncomingMessage::RevealAnswer => {
                if self.phase != Phase::QuestionRevealed {
                    return false;
                }
                self.phase = Phase::AnswerRevealed;
                tunnel.send_message(
                    &UpdateMessage::AnswerAnnouncement {
                        answer: clue.answer.clone(),
                    }
                    .into(),
                );
            }
            IncomingMessage::Exit => {
                self.exit(speaker);
                return true;
            }
        }

        false
    }

    /// Handles a countdown tick
    ///
    /// Ticks from an earlier countdown run, or from before an exit, are
    /// ignored.
    pub fn receive_alarm<
        T: Tunnel,
        P: Speaker + ?Sized,
        S: FnMut(crate::AlarmMessage, web_time::Duration),
    >(
        &mut self,
        message: &AlarmMessage,
        mut schedule_message: S,
        tunnel: &T,
        speaker: &P,
    ) {
        let AlarmMessage::Tick { epoch } = message;
        if *epoch != self.epoch {
            tracing::trace!(epoch, current = self.epoch, "ignoring stale countdown tick");
            return;
        }
        let Some(remaining) = self.countdown.filter(|remaining| *remaining > 0) else {
            return;
        };

        let remaining = remaining - 1;
        self.countdown = Some(remaining);
        tunnel.send_message(&UpdateMessage::Countdown(remaining).into());

        if remaining == 0 {
            tracing::info!("final countdown finished");
            sound::stop_cue(speaker, Cue::FinalThink);
        } else {
            schedule_message(
                AlarmMessage::Tick { epoch: self.epoch }.into(),
                web_time::Duration::from_millis(TICK_MILLIS),
            );
        }
    }

    /// Resets everything and silences the think music
    pub fn exit<P: Speaker + ?Sized>(&mut self, speaker: &P) {
        sound::stop_cue(speaker, Cue::FinalThink);
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::default()
        };
    }

    fn start_timer<T: Tunnel, P: Speaker + ?Sized, S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        seconds: u32,
        schedule_message: &mut S,
        tunnel: &T,
        speaker: &P,
    ) {
        sound::play_cue(speaker, Cue::FinalThink);
        self.epoch += 1;
        self.countdown = Some(seconds);
        sound::play_cue(speaker, Cue::TimerBeep);
        tracing::info!(seconds, "final countdown started");

        tunnel.send_message(&UpdateMessage::Countdown(seconds).into());
        if seconds == 0 {
            sound::stop_cue(speaker, Cue::FinalThink);
            return;
        }
        schedule_message(
            AlarmMessage::Tick { epoch: self.epoch }.into(),
            web_time::Duration::from_millis(TICK_MILLIS),
        );
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::testing::{RecordingSpeaker, RecordingTunnel, Scheduled};

    fn clue() -> FinalClue {
        FinalClue {
            category: "Finale".to_string(),
            question: "The last question".to_string(),
            answer: "What is the end?".to_string(),
        }
    }

    fn scores() -> Scoreboard {
        let mut scores = Scoreboard::default();
        scores.award(Team::One, 1000);
        scores.award(Team::Two, 300);
        scores.deduct(Team::Four, 200);
        scores
    }

    fn send(
        state: &mut State,
        message: IncomingMessage,
        scheduled: &Scheduled,
        tunnel: &RecordingTunnel,
        speaker: &RecordingSpeaker,
    ) -> bool {
        state.receive_message(
            &message,
            &clue(),
            &scores(),
            45,
            scheduled.scheduler(),
            tunnel,
            speaker,
        )
    }

    fn wager(team: Team, input: &str) -> IncomingMessage {
        IncomingMessage::Wager {
            team,
            input: input.to_string(),
        }
    }

    fn tick(state: &mut State, scheduled: &Scheduled, tunnel: &RecordingTunnel, speaker: &RecordingSpeaker) {
        let alarm = scheduled.pop_final_tick().expect("a tick was scheduled");
        state.receive_alarm(&alarm, scheduled.scheduler(), tunnel, speaker);
    }

    #[test]
    fn test_final_wager_clamps() {
        assert_eq!(final_wager("500", 1000), 500);
        assert_eq!(final_wager("5000", 1000), 1000);
        assert_eq!(final_wager("-5", 1000), 0);
        assert_eq!(final_wager("nope", 1000), 0);
        assert_eq!(final_wager("500", 0), 0);
        assert_eq!(final_wager("500", -100), 0);
    }

    #[test]
    fn test_eliminated_team_cannot_wager() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();

        send(&mut state, wager(Team::Three, "100"), &scheduled, &tunnel, &speaker);
        send(&mut state, wager(Team::Four, "100"), &scheduled, &tunnel, &speaker);

        assert_eq!(state.wager(Team::Three, &scores()), 0);
        assert_eq!(state.wager(Team::Four, &scores()), 0);
        assert!(tunnel.messages().is_empty());
    }

    #[test]
    fn test_wagers_only_during_entry() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();

        send(&mut state, wager(Team::One, "600"), &scheduled, &tunnel, &speaker);
        send(&mut state, wager(Team::Two, "9999"), &scheduled, &tunnel, &speaker);
        assert_eq!(state.wager(Team::One, &scores()), 600);
        assert_eq!(state.wager(Team::Two, &scores()), 300);

        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        assert_eq!(state.phase(), Phase::QuestionRevealed);

        send(&mut state, wager(Team::One, "10"), &scheduled, &tunnel, &speaker);
        assert_eq!(state.wager(Team::One, &scores()), 600);
    }

    #[test]
    fn test_timer_requires_question() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();

        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), None);
        assert!(scheduled.is_empty());
        assert!(speaker.played().is_empty());
    }

    #[test]
    fn test_countdown_runs_to_zero() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();

        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(45));
        assert_eq!(speaker.played(), vec![Cue::FinalThink, Cue::TimerBeep]);
        assert_eq!(
            scheduled.durations(),
            vec![web_time::Duration::from_millis(TICK_MILLIS)]
        );

        let mut previous = 45;
        while !scheduled.is_empty() {
            tick(&mut state, &scheduled, &tunnel, &speaker);
            let current = state.countdown().unwrap();
            assert_eq!(current, previous - 1);
            previous = current;
        }

        assert_eq!(state.countdown(), Some(0));
        assert_eq!(speaker.stopped(), vec![Cue::FinalThink]);
    }

    #[test]
    fn test_countdown_never_negative() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();
        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);

        let alarm = AlarmMessage::Tick { epoch: state.epoch };
        for _ in 0..100 {
            state.receive_alarm(&alarm, |_, _| {}, &tunnel, &speaker);
        }
        assert_eq!(state.countdown(), Some(0));
    }

    #[test]
    fn test_zero_second_countdown_stops_think_music() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();
        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        state.receive_message(
            &IncomingMessage::StartTimer,
            &clue(),
            &scores(),
            0,
            scheduled.scheduler(),
            &tunnel,
            &speaker,
        );

        assert_eq!(state.countdown(), Some(0));
        assert!(scheduled.is_empty());
        assert_eq!(speaker.stopped(), vec![Cue::FinalThink]);
    }

    #[test]
    fn test_restart_ignores_old_ticks() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();
        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        tick(&mut state, &scheduled, &tunnel, &speaker);
        tick(&mut state, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(43));
        let stale = scheduled.pop_final_tick().unwrap();

        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(45));

        state.receive_alarm(&stale, |_, _| {}, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(45));

        tick(&mut state, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(44));
    }

    #[test]
    fn test_reveal_answer_independent_of_timer() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();

        send(&mut state, IncomingMessage::RevealAnswer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.phase(), Phase::WagerEntry);

        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::RevealAnswer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.phase(), Phase::AnswerRevealed);
        assert_eq!(state.countdown(), None);

        let SyncMessage::Screen(snapshot) = state.state_message(&clue(), &scores());
        assert_eq!(snapshot.answer.as_deref(), Some("What is the end?"));
        assert_eq!(snapshot.question.as_deref(), Some("The last question"));

        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        assert_eq!(state.countdown(), Some(45));
    }

    #[test]
    fn test_snapshot_hides_question_during_entry() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();
        send(&mut state, wager(Team::One, "250"), &scheduled, &tunnel, &speaker);

        let SyncMessage::Screen(snapshot) = state.state_message(&clue(), &scores());
        assert_eq!(snapshot.category, "Finale");
        assert_eq!(snapshot.question, None);
        assert_eq!(snapshot.answer, None);
        assert_eq!(
            snapshot.teams,
            vec![
                TeamWager { team: Team::One, score: 1000, wager: 250, eliminated: false },
                TeamWager { team: Team::Two, score: 300, wager: 0, eliminated: false },
                TeamWager { team: Team::Three, score: 0, wager: 0, eliminated: true },
                TeamWager { team: Team::Four, score: -200, wager: 0, eliminated: true },
            ]
        );
    }

    #[test]
    fn test_exit_resets_everything() {
        let mut state = State::default();
        let (scheduled, tunnel, speaker) = Default::default();
        send(&mut state, wager(Team::One, "250"), &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::LockWagers, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::StartTimer, &scheduled, &tunnel, &speaker);
        send(&mut state, IncomingMessage::RevealAnswer, &scheduled, &tunnel, &speaker);
        let pending = scheduled.pop_final_tick().unwrap();

        assert!(send(&mut state, IncomingMessage::Exit, &scheduled, &tunnel, &speaker));

        assert_eq!(state.phase(), Phase::WagerEntry);
        assert_eq!(state.countdown(), None);
        assert_eq!(state.wager(Team::One, &scores()), 0);
        assert_eq!(speaker.stopped(), vec![Cue::FinalThink]);

        state.receive_alarm(&pending, scheduled.scheduler(), &tunnel, &speaker);
        assert_eq!(state.countdown(), None);
        assert!(scheduled.is_empty());
    }
}
