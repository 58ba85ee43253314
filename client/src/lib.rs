//! # Bingo Client Library
//!
//! A terminal client for the multiplayer bingo server. It keeps a local card,
//! marks it from the server's draws and sends the player's commands.
//!
//! ## Reconciliation
//! On connect the server sends the full draw history before anything else.
//! The client applies that history as a batch of ordinary marks, so a player
//! who joins mid-round ends up with exactly the same marks as one who saw
//! every draw live.
//!
//! ## Module Organization
//!
//! - `game`: local mirror of the round and the player's card
//! - `input`: parsing of typed commands
//! - `network`: UDP connection, heartbeats and the main loop
//!
//! The client only hints at a win; the server re-checks every claim against
//! its own history.

pub mod game;
pub mod input;
pub mod network;
