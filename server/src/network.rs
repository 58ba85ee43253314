//! Server network layer: UDP transport around the single-consumer game loop

use crate::client_manager::ClientManager;
use crate::config::ServerConfig;
use crate::session::{GameMessage, Session};
use crate::timer::DrawTimer;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};

const RECV_BUFFER_SIZE: usize = 2048;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ClientTimeout { client_id: u32, addr: SocketAddr },
    Shutdown,
}

/// A packet resolved to its recipients, queued for the sender task
#[derive(Debug)]
pub struct OutgoingPacket {
    pub packet: Packet,
    pub recipients: Vec<SocketAddr>,
}

/// Main server coordinating networking and the bingo session
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: Session,
    config: ServerConfig,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    out_tx: mpsc::UnboundedSender<OutgoingPacket>,
    out_rx: Option<mpsc::UnboundedReceiver<OutgoingPacket>>,
}

impl Server {
    pub async fn new(addr: &str, config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_session(addr, config, Session::new()).await
    }

    /// Builds a server around an existing session, e.g. a seeded one.
    pub async fn with_session(
        addr: &str,
        config: ServerConfig,
        session: Session,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(config.max_clients))),
            session,
            config,
            server_tx,
            server_rx,
            out_tx,
            out_rx: Some(out_rx),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Handle for stopping the loop from outside.
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; RECV_BUFFER_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => match deserialize::<Packet>(&buffer[0..len]) {
                        Ok(packet) => {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Failed to deserialize packet from {}: {}", addr, e),
                    },
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that drains the outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let Some(mut out_rx) = self.out_rx.take() else {
            warn!("Network sender already running");
            return;
        };

        tokio::spawn(async move {
            while let Some(OutgoingPacket { packet, recipients }) = out_rx.recv().await {
                let data = match serialize(&packet) {
                    Ok(data) => data,
                    Err(e) => {
                        error!("Failed to serialize {:?}: {}", packet, e);
                        continue;
                    }
                };

                for addr in recipients {
                    if let Err(e) = socket.send_to(&data, addr).await {
                        error!("Failed to send packet to {}: {}", addr, e);
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();
        let timeout = self.config.client_timeout;

        // Short timeouts are checked more often than once a second.
        let period = timeout
            .min(Duration::from_secs(1))
            .max(Duration::from_millis(10));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts(timeout)
                };

                for (client_id, addr) in timed_out {
                    if server_tx
                        .send(ServerMessage::ClientTimeout { client_id, addr })
                        .is_err()
                    {
                        // Main loop is gone.
                        return;
                    }
                }
            }
        });
    }

    fn send_to_addr(&self, packet: Packet, addr: SocketAddr) {
        self.queue(OutgoingPacket {
            packet,
            recipients: vec![addr],
        });
    }

    fn queue(&self, outgoing: OutgoingPacket) {
        if let Err(e) = self.out_tx.send(outgoing) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    /// Resolves session output to addresses and queues it.
    ///
    /// Recipients are fixed here, in loop order, so a connection never sees a
    /// broadcast that was produced before its initial state.
    async fn dispatch(&self, messages: Vec<GameMessage>) {
        if messages.is_empty() {
            return;
        }

        let clients = self.clients.read().await;
        for message in messages {
            match message {
                GameMessage::SendPacket { packet, client_id } => match clients.addr_of(client_id) {
                    Some(addr) => self.send_to_addr(packet, addr),
                    None => debug!("Dropping packet for departed client {}", client_id),
                },
                GameMessage::BroadcastPacket { packet, exclude } => {
                    let recipients = clients
                        .get_client_addrs()
                        .into_iter()
                        .filter(|(id, _)| Some(*id) != exclude)
                        .map(|(_, addr)| addr)
                        .collect::<Vec<_>>();
                    if !recipients.is_empty() {
                        self.queue(OutgoingPacket { packet, recipients });
                    }
                }
            }
        }
    }

    async fn drop_client(&mut self, client_id: u32) {
        let removed = {
            let mut clients = self.clients.write().await;
            clients.remove_client(&client_id)
        };
        if removed {
            debug!("Client {} removed from connection table", client_id);
        }
        let messages = self.session.disconnect(client_id);
        self.dispatch(messages).await;
    }

    async fn handle_connect(&mut self, client_version: u32, addr: SocketAddr) {
        info!(
            "Client connecting from {} (version: {})",
            addr, client_version
        );

        if client_version != PROTOCOL_VERSION {
            self.send_to_addr(
                Packet::Disconnected {
                    reason: "Protocol version mismatch".to_string(),
                },
                addr,
            );
            return;
        }

        // A second Connect from the same address is a reconnect.
        let existing_client_id = {
            let clients = self.clients.read().await;
            clients.find_client_by_addr(addr)
        };
        if let Some(existing_id) = existing_client_id {
            info!("Replacing existing client {} from {}", existing_id, addr);
            self.drop_client(existing_id).await;
        }

        let client_id = {
            let mut clients = self.clients.write().await;
            clients.add_client(addr)
        };

        match client_id {
            Some(client_id) => {
                self.send_to_addr(Packet::Connected { client_id }, addr);
                let messages = self.session.connect(client_id);
                self.dispatch(messages).await;
            }
            None => {
                warn!("Rejecting {}: server full", addr);
                self.send_to_addr(
                    Packet::Disconnected {
                        reason: "Server full".to_string(),
                    },
                    addr,
                );
            }
        }
    }

    /// Processes one incoming packet against the session
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        if let Packet::Connect { client_version } = packet {
            self.handle_connect(client_version, addr).await;
            return;
        }

        let client_id = {
            let mut clients = self.clients.write().await;
            clients.touch(addr)
        };
        let Some(client_id) = client_id else {
            warn!("Packet from unknown address {}", addr);
            if packet != Packet::Disconnect {
                self.send_to_addr(
                    Packet::Disconnected {
                        reason: "Not connected".to_string(),
                    },
                    addr,
                );
            }
            return;
        };

        let messages = match packet {
            Packet::Join { name, card } => self.session.join(client_id, name, card),
            Packet::StartRound => self.session.start(),
            Packet::SubmitCard { card } => self.session.submit_card(client_id, card),
            Packet::ClaimWin => self.session.claim(client_id),
            Packet::ResetRound => self.session.reset(),
            Packet::Heartbeat => Vec::new(),
            Packet::Disconnect => {
                self.drop_client(client_id).await;
                Vec::new()
            }
            _ => {
                warn!("Unexpected packet type from client {}", client_id);
                Vec::new()
            }
        };

        self.dispatch(messages).await;
    }

    /// Main server loop
    ///
    /// Network events and draw ticks are handled one at a time in arrival
    /// order; the draw timer is re-synced with the session after each one.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        let mut draw_timer = DrawTimer::new(self.config.draw_interval);

        info!(
            "Server started successfully, drawing every {:?} while a round runs",
            draw_timer.period()
        );

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id, addr }) => {
                            info!("Client {} timed out", client_id);
                            self.send_to_addr(
                                Packet::Disconnected {
                                    reason: "Timed out".to_string(),
                                },
                                addr,
                            );
                            self.drop_client(client_id).await;
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = draw_timer.tick() => {
                    let messages = self.session.tick();
                    self.dispatch(messages).await;
                },
            }

            draw_timer.sync(self.session.phase(), self.session.round());
        }

        Ok(())
    }
}
