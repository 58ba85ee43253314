use crate::game::ClientGameState;
use crate::input::{parse_command, Command, HELP};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{card::label, Card, Number, Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::time::interval;

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    client_id: Option<u32>,
    connected: bool,
    name: Option<String>,
    heartbeat: Duration,

    game_state: ClientGameState,
}

fn describe(number: Number) -> String {
    label(number).unwrap_or_else(|| number.to_string())
}

impl Client {
    pub async fn new(
        server_addr: &str,
        name: Option<String>,
        heartbeat: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;
        let card = Card::generate(&mut rand::thread_rng());

        Ok(Client {
            socket,
            server_addr,
            client_id: None,
            connected: false,
            name,
            heartbeat,
            game_state: ClientGameState::new(card),
        })
    }

    pub fn game_state(&self) -> &ClientGameState {
        &self.game_state
    }

    async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to {}...", self.server_addr);
        let packet = Packet::Connect {
            client_version: PROTOCOL_VERSION,
        };
        self.send_packet(&packet).await
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    async fn send_join(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let packet = Packet::Join {
            name: self.name.clone(),
            card: Some(self.game_state.card().clone()),
        };
        self.send_packet(&packet).await?;
        self.game_state.set_registered(true);
        Ok(())
    }

    async fn submit_new_card(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let card = self.game_state.regenerate_card(&mut rand::thread_rng());
        info!(
            "New card, {} numbers already drawn",
            self.game_state.marked_numbers().len()
        );
        self.send_packet(&Packet::SubmitCard { card }).await?;
        self.game_state.set_registered(true);
        Ok(())
    }

    async fn handle_packet(&mut self, packet: Packet) -> Result<(), Box<dyn std::error::Error>> {
        match packet {
            Packet::Connected { client_id } => {
                info!("Connected! Client ID: {}", client_id);
                self.client_id = Some(client_id);
                self.connected = true;
                if self.name.is_some() {
                    self.send_join().await?;
                } else {
                    info!("Type `join <name>` to enter the game");
                }
            }

            Packet::InitialState(state) => {
                let running = state.running;
                self.game_state.apply_initial_state(state);
                info!(
                    "Caught up: {} drawn (last {}), round {}, players: {}",
                    self.game_state.history().len(),
                    self.game_state
                        .last_drawn()
                        .map(describe)
                        .unwrap_or_else(|| "-".to_string()),
                    if running { "running" } else { "not running" },
                    self.game_state.players().join(", ")
                );
            }

            Packet::Joined { name } => {
                info!("Playing as {}", name);
                self.name = Some(name);
            }

            Packet::PlayerList { names } => {
                info!("Players online: {}", names.join(", "));
                self.game_state.apply_player_list(names);
            }

            Packet::PhaseChanged { running } => {
                self.game_state.apply_phase_changed(running);
                if running {
                    info!("Round started, numbers incoming");
                }
            }

            Packet::NumberDrawn { number } => {
                let on_card = self.game_state.apply_number_drawn(number);
                info!(
                    "Drawn: {}{}",
                    describe(number),
                    if on_card { "  (marked)" } else { "" }
                );
                if on_card && self.game_state.has_bingo() {
                    info!("You have a line! Type `bingo` to claim it");
                }
            }

            Packet::RoundWon {
                winner_name,
                message,
            } => {
                info!("Game over! {}", message);
                self.game_state.apply_round_won(winner_name);
            }

            Packet::RoundExhausted { message } => {
                info!("Game over! {}", message);
                self.game_state.apply_round_exhausted();
            }

            Packet::ClaimRejected { reason } => {
                warn!("Claim rejected: {}", reason);
            }

            Packet::RoundReset => {
                info!("Round reset");
                if self.game_state.apply_reset() {
                    self.submit_new_card().await?;
                }
            }

            Packet::Rejected { reason } => {
                warn!("Server rejected request: {}", reason);
            }

            Packet::Disconnected { reason } => {
                warn!("Disconnected: {}", reason);
                self.connected = false;
                self.client_id = None;
                self.game_state.set_registered(false);
            }

            _ => {
                warn!("Unexpected packet type");
            }
        }

        Ok(())
    }

    /// Returns false when the player asked to quit.
    async fn handle_command(&mut self, command: Command) -> Result<bool, Box<dyn std::error::Error>> {
        match command {
            Command::Join(name) => {
                self.name = Some(name);
                self.send_join().await?;
            }
            Command::NewCard => self.submit_new_card().await?,
            Command::Start => self.send_packet(&Packet::StartRound).await?,
            Command::Bingo => {
                if !self.game_state.has_bingo() {
                    warn!("No complete line on your card yet, claiming anyway");
                }
                self.send_packet(&Packet::ClaimWin).await?;
            }
            Command::Reset => self.send_packet(&Packet::ResetRound).await?,
            Command::Status => {
                let state = &self.game_state;
                info!(
                    "Phase {}, {} drawn, marked {:?}, winner {}",
                    state.phase(),
                    state.history().len(),
                    state.marked_numbers(),
                    state.winner().unwrap_or("-")
                );
            }
            Command::Help => info!("{}", HELP),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await?;

        let mut heartbeat_interval = interval(self.heartbeat);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut buffer = [0u8; 2048];

        info!("{}", HELP);

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(packet) => {
                                if let Err(e) = self.handle_packet(packet).await {
                                    error!("Error handling packet: {}", e);
                                }
                            }
                            Err(e) => warn!("Failed to deserialize packet: {}", e),
                        },
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    match parse_command(&line) {
                        Ok(command) => {
                            if !self.handle_command(command).await? {
                                break;
                            }
                        }
                        Err(e) => warn!("{}", e),
                    }
                },

                _ = heartbeat_interval.tick() => {
                    if self.connected {
                        self.send_packet(&Packet::Heartbeat).await?;
                    }
                },
            }
        }

        if self.connected {
            let _ = self.send_packet(&Packet::Disconnect).await;
        }

        Ok(())
    }
}
