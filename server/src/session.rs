//! Authoritative round state.
//!
//! `Session` owns the draw pool, the draw history, the player registry and
//! the winner, and is the only thing that mutates them. Every handler takes
//! `&mut self`, applies one action, and returns the packets that should go
//! out as a result. Handlers never call each other and never touch the
//! network, so the whole state machine can be driven directly from tests.
//!
//! ```text
//!            start                 claim (valid)
//!   Idle ─────────────▶ Running ─────────────────▶ Won
//!    ▲                  │  ▲ │                      │
//!    │                  │  └─┘ tick / bad claim     │
//!    │                  │ pool empty                │
//!    │                  ▼                           │
//!    │              Exhausted                       │
//!    │                  │                           │
//!    └──── reset ───────┴───────────────────────────┘
//! ```
//!
//! `start` is also accepted from `Won` and `Exhausted` and always begins a
//! fresh round.

use crate::draw::{DrawHistory, DrawPool};
use crate::error::GameError;
use crate::registry::{anonymous_name, PlayerRegistry};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{has_win, Card, ClaimRejection, GamePhase, InitialState, Packet, MAX_NUMBER};

/// Outgoing packet addressed by client id.
#[derive(Debug, Clone, PartialEq)]
pub enum GameMessage {
    SendPacket { packet: Packet, client_id: u32 },
    BroadcastPacket { packet: Packet, exclude: Option<u32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub client_id: u32,
    pub name: String,
}

pub struct Session {
    phase: GamePhase,
    pool: DrawPool,
    history: DrawHistory,
    registry: PlayerRegistry,
    winner: Option<Winner>,
    round: u64,
    rng: StdRng,
}

fn send(client_id: u32, packet: Packet) -> GameMessage {
    GameMessage::SendPacket { packet, client_id }
}

fn broadcast(packet: Packet) -> GameMessage {
    GameMessage::BroadcastPacket {
        packet,
        exclude: None,
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic draws, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: GamePhase::Idle,
            pool: DrawPool::new(),
            history: DrawHistory::new(),
            registry: PlayerRegistry::new(),
            winner: None,
            round: 0,
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of rounds started so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn pool(&self) -> &DrawPool {
        &self.pool
    }

    pub fn history(&self) -> &DrawHistory {
        &self.history
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    /// Everything a fresh connection needs to catch up.
    pub fn initial_state(&self) -> InitialState {
        InitialState {
            history: self.history.snapshot(),
            last_drawn: self.history.last(),
            phase: self.phase,
            running: self.phase.is_running(),
            winner: self.winner.as_ref().map(|w| w.name.clone()),
            players: self.registry.names_snapshot(),
        }
    }

    /// Reconciliation for a newly accepted connection.
    pub fn connect(&self, client_id: u32) -> Vec<GameMessage> {
        debug!(
            "Sending initial state to client {} ({} numbers drawn, phase {})",
            client_id,
            self.history.len(),
            self.phase
        );
        vec![send(client_id, Packet::InitialState(self.initial_state()))]
    }

    pub fn join(
        &mut self,
        client_id: u32,
        name: Option<String>,
        card: Option<Card>,
    ) -> Vec<GameMessage> {
        match self
            .registry
            .set_or_update(client_id, name.as_deref(), card)
        {
            Ok(registration) => {
                // Renames are announced through the player list only.
                let mut messages = Vec::with_capacity(2);
                if self.registry.acknowledge(client_id) {
                    messages.push(send(
                        client_id,
                        Packet::Joined {
                            name: registration.name,
                        },
                    ));
                }
                if registration.names_changed {
                    messages.push(self.player_list());
                }
                messages
            }
            Err(err) => self.reject(client_id, err),
        }
    }

    /// Replaces the client's card. Allowed in every phase; a late card is
    /// judged against the live history when its owner claims.
    pub fn submit_card(&mut self, client_id: u32, card: Card) -> Vec<GameMessage> {
        match self.registry.set_or_update(client_id, None, Some(card)) {
            Ok(registration) => {
                debug!("Client {} submitted a card", client_id);
                if registration.names_changed {
                    vec![self.player_list()]
                } else {
                    Vec::new()
                }
            }
            Err(err) => self.reject(client_id, err),
        }
    }

    pub fn disconnect(&mut self, client_id: u32) -> Vec<GameMessage> {
        match self.registry.remove(client_id) {
            Some(_) => vec![self.player_list()],
            None => Vec::new(),
        }
    }

    /// Begins a fresh round unless one is already running.
    pub fn start(&mut self) -> Vec<GameMessage> {
        if self.phase.is_running() {
            debug!("Start requested while round {} is running", self.round);
            return Vec::new();
        }

        if self.phase.is_terminal() {
            debug!("Round {} ended {}, starting a new one", self.round, self.phase);
        }

        self.pool.initialize();
        self.history.clear();
        self.winner = None;
        self.round += 1;
        self.phase = GamePhase::Running;
        info!("Round {} started", self.round);

        vec![broadcast(Packet::PhaseChanged { running: true })]
    }

    /// One timer firing: draw a number, or end the round if none are left.
    pub fn tick(&mut self) -> Vec<GameMessage> {
        if !self.phase.is_running() {
            debug!("Skipping draw tick in phase {}", self.phase);
            return Vec::new();
        }

        match self.pool.draw_random(&mut self.rng) {
            Ok(number) => {
                self.history.append(number);
                info!(
                    "Round {}: drew {} ({} left)",
                    self.round,
                    shared::card::label(number).unwrap_or_else(|| number.to_string()),
                    self.pool.len()
                );
                vec![broadcast(Packet::NumberDrawn { number })]
            }
            Err(err) => {
                debug!("Round {}: {}", self.round, err);
                self.exhaust()
            }
        }
    }

    fn exhaust(&mut self) -> Vec<GameMessage> {
        self.phase = GamePhase::Exhausted;
        info!("Round {} exhausted without a winner", self.round);

        vec![
            broadcast(Packet::RoundExhausted {
                message: format!("All {} numbers were drawn without a winner", MAX_NUMBER),
            }),
            broadcast(Packet::PhaseChanged { running: false }),
        ]
    }

    /// Checks a claim without changing anything.
    ///
    /// Eligibility is decided first; the card is only looked at while a round
    /// is running and still has no winner.
    pub fn evaluate_claim(&self, client_id: u32) -> Result<(), ClaimRejection> {
        if !self.phase.is_running() || self.winner.is_some() {
            return Err(ClaimRejection::NotEligible);
        }

        let card = self
            .registry
            .card_of(client_id)
            .ok_or(ClaimRejection::NoCard)?;

        if has_win(card, self.history.drawn_set()) {
            Ok(())
        } else {
            Err(ClaimRejection::NoWin)
        }
    }

    pub fn claim(&mut self, client_id: u32) -> Vec<GameMessage> {
        if let Err(reason) = self.evaluate_claim(client_id) {
            warn!("Rejected claim from client {}: {}", client_id, reason);
            return vec![send(client_id, Packet::ClaimRejected { reason })];
        }

        let name = self
            .registry
            .name_of(client_id)
            .map(str::to_string)
            .unwrap_or_else(|| anonymous_name(client_id));

        self.phase = GamePhase::Won;
        self.winner = Some(Winner {
            client_id,
            name: name.clone(),
        });
        info!(
            "Round {} won by {} after {} draws",
            self.round,
            name,
            self.history.len()
        );

        vec![
            broadcast(Packet::RoundWon {
                message: format!("{} got BINGO!", name),
                winner_name: name,
            }),
            broadcast(Packet::PhaseChanged { running: false }),
        ]
    }

    /// Returns to `Idle` from any phase. Names survive, cards do not.
    pub fn reset(&mut self) -> Vec<GameMessage> {
        let was_running = self.phase.is_running();

        self.pool.initialize();
        self.history.clear();
        self.winner = None;
        self.registry.clear_cards();
        self.phase = GamePhase::Idle;
        info!("Session reset after round {}", self.round);

        let mut messages = Vec::with_capacity(2);
        if was_running {
            messages.push(broadcast(Packet::PhaseChanged { running: false }));
        }
        messages.push(broadcast(Packet::RoundReset));
        messages
    }

    fn player_list(&self) -> GameMessage {
        broadcast(Packet::PlayerList {
            names: self.registry.names_snapshot(),
        })
    }

    fn reject(&self, client_id: u32, err: GameError) -> Vec<GameMessage> {
        warn!("Rejected input from client {}: {}", client_id, err);
        vec![send(
            client_id,
            Packet::Rejected {
                reason: err.to_string(),
            },
        )]
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
