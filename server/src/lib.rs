//! # Bingo Server Library
//!
//! This library provides the authoritative server for the multiplayer bingo
//! game. It draws numbers from a shared pool on a timer, broadcasts each draw
//! to every connected client, and decides win claims against the cards the
//! players submitted.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Round State
//! The server holds the only copy of the draw pool, the draw history and the
//! winner. Clients mark their cards from broadcasts, but a claim is always
//! re-checked here against the canonical history.
//!
//! ### Client Management
//! Handles the lifecycle of client connections:
//! - Connection establishment and id assignment
//! - Player registration (display name, card)
//! - Disconnection and timeout cleanup
//!
//! ### Reconciliation
//! Every new connection receives the full draw history, the current phase and
//! the player list before any other packet, so a client joining mid-round
//! marks exactly the numbers drawn so far.
//!
//! ## Architecture Design
//!
//! ### Single-Consumer Event Loop
//! Incoming packets and draw-timer ticks are handled one at a time by a
//! single task that owns the [`session::Session`]. No lock guards the round
//! state and every mutation has a well-defined order.
//!
//! ### Explicit Phases
//! A round is `Idle`, `Running`, `Won` or `Exhausted`. The draw timer is
//! armed only while the phase is `Running` and is dropped in the same loop
//! iteration that leaves it.
//!
//! ## Module Organization
//!
//! - `draw`: draw pool and draw history
//! - `registry`: players keyed by connection id
//! - `session`: the round state machine
//! - `timer`: the automatic draw timer
//! - `client_manager`: socket address to client id mapping and timeouts
//! - `network`: UDP transport and the main loop
//! - `config`, `error`: server settings and per-action failures
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default().with_draw_interval(Duration::from_secs(5));
//!     let mut server = Server::new("127.0.0.1:8080", config).await?;
//!
//!     // Runs until shut down:
//!     // - Accepts connections and sends each one the initial state
//!     // - Applies joins, cards, starts, claims and resets in arrival order
//!     // - Draws a number every interval while a round is running
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod draw;
pub mod error;
pub mod network;
pub mod registry;
pub mod session;
pub mod timer;
