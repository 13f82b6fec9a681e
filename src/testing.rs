//! Recording collaborators shared by the unit tests

use std::{cell::RefCell, collections::VecDeque};

use crate::{
    AlarmMessage, SyncMessage, UpdateMessage, final_round,
    session::Tunnel,
    sound::{self, Cue, Speaker},
};

/// Alarms handed to the scheduler, oldest first
#[derive(Debug, Default)]
pub struct Scheduled {
    alarms: RefCell<VecDeque<(AlarmMessage, web_time::Duration)>>,
}

impl Scheduled {
    pub fn scheduler(&self) -> impl FnMut(AlarmMessage, web_time::Duration) + '_ {
        |alarm, duration| self.alarms.borrow_mut().push_back((alarm, duration))
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.borrow().is_empty()
    }

    pub fn durations(&self) -> Vec<web_time::Duration> {
        self.alarms.borrow().iter().map(|(_, d)| *d).collect()
    }

    pub fn pop(&self) -> Option<AlarmMessage> {
        self.alarms.borrow_mut().pop_front().map(|(alarm, _)| alarm)
    }

    pub fn pop_final_tick(&self) -> Option<final_round::AlarmMessage> {
        match self.pop()? {
            AlarmMessage::FinalRound(alarm) => Some(alarm),
            AlarmMessage::Board(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingTunnel {
    messages: RefCell<Vec<UpdateMessage>>,
    states: RefCell<Vec<SyncMessage>>,
}

impl RecordingTunnel {
    pub fn messages(&self) -> Vec<UpdateMessage> {
        self.messages.borrow().clone()
    }

    pub fn states(&self) -> Vec<SyncMessage> {
        self.states.borrow().clone()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
        self.states.borrow_mut().clear();
    }
}

impl Tunnel for RecordingTunnel {
    fn send_message(&self, message: &UpdateMessage) {
        self.messages.borrow_mut().push(message.clone());
    }

    fn send_state(&self, state: &SyncMessage) {
        self.states.borrow_mut().push(state.clone());
    }
}

/// Records cues; when `broken`, every call also fails
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    pub broken: bool,
    played: RefCell<Vec<Cue>>,
    stopped: RefCell<Vec<Cue>>,
}

impl RecordingSpeaker {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }

    pub fn stopped(&self) -> Vec<Cue> {
        self.stopped.borrow().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn play(&self, cue: Cue) -> Result<(), sound::Error> {
        self.played.borrow_mut().push(cue);
        if self.broken {
            Err(sound::Error::Blocked(cue))
        } else {
            Ok(())
        }
    }

    fn stop(&self, cue: Cue) -> Result<(), sound::Error> {
        self.stopped.borrow_mut().push(cue);
        if self.broken {
            Err(sound::Error::Blocked(cue))
        } else {
            Ok(())
        }
    }
}
