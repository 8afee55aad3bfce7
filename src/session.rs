//! Coordinator-side session state machine.
//!
//! Holds the only copies of the join and ready counts; the transport runner
//! feeds it one event at a time and performs whatever action it returns.
//! Both counts are sets of distinct peers, so duplicate or stray messages
//! can never meet a quorum early or release a barrier twice.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Transport-level identity of a connected peer, assigned at accept time.
pub type PeerId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Collecting joins until the quorum is met.
    AwaitingJoins,
    /// Assignment broadcast; collecting per-round ready signals.
    BarrierWait,
}

/// What the runner must do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Send the assignment to every joined peer. Emitted exactly once.
    Broadcast,
    /// Send the advance signal to every joined peer.
    ReleaseBarrier,
}

pub struct Session {
    expected: usize,
    state: SessionState,
    joined: HashSet<PeerId>,
    ready: HashSet<PeerId>,
    rounds: usize,
}

impl Session {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            state: SessionState::AwaitingJoins,
            joined: HashSet::new(),
            ready: HashSet::new(),
            rounds: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn joined_count(&self) -> usize {
        self.joined.len()
    }

    pub fn is_joined(&self, peer: PeerId) -> bool {
        self.joined.contains(&peer)
    }

    /// Completed barrier rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.joined.iter().copied()
    }

    pub fn handle_join(&mut self, peer: PeerId) -> Result<Action> {
        if self.state != SessionState::AwaitingJoins {
            return Err(Error::LateJoin { peer });
        }
        if !self.joined.insert(peer) {
            return Err(Error::Protocol(format!("duplicate join from peer {}", peer)));
        }
        info!(
            peer,
            joined = self.joined.len(),
            expected = self.expected,
            "worker joined"
        );
        if self.joined.len() == self.expected {
            self.state = SessionState::BarrierWait;
            info!("join quorum met, broadcasting assignment");
            return Ok(Action::Broadcast);
        }
        Ok(Action::None)
    }

    pub fn handle_ready(&mut self, peer: PeerId) -> Result<Action> {
        if !self.joined.contains(&peer) {
            return Err(Error::UnknownPeer { peer });
        }
        if self.state != SessionState::BarrierWait {
            return Err(Error::Protocol(format!(
                "ready from peer {} before the session started",
                peer
            )));
        }
        if !self.ready.insert(peer) {
            debug!(peer, "duplicate ready this round, ignoring");
            return Ok(Action::None);
        }
        if self.ready.len() == self.expected {
            self.ready.clear();
            self.rounds += 1;
            debug!(round = self.rounds, "all workers ready, releasing barrier");
            return Ok(Action::ReleaseBarrier);
        }
        Ok(Action::None)
    }
}
