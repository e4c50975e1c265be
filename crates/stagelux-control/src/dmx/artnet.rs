//! Art-Net protocol implementation
//!
//! ArtDMX encoding plus a connection-tracking UDP sender. The sender is a
//! small state machine so the rest of the engine can keep ticking while the
//! node is unplugged: a disconnected sender fails fast and never blocks the
//! control path.

use std::net::{SocketAddr, UdpSocket};

use stagelux_core::DMX_CHANNELS;

use crate::{error::ControlError, Result};

/// Standard Art-Net UDP port.
pub const ARTNET_PORT: u16 = 6454;

/// Default node address (Art-Net primary 2.x.x.x range).
pub const DEFAULT_TARGET: &str = "2.0.0.15:6454";

/// Encode one ArtDMX packet: 18-byte header + 512 data bytes.
pub fn encode_artdmx(sequence: u8, universe: u16, channels: &[u8; DMX_CHANNELS]) -> Vec<u8> {
    let mut packet = vec![0u8; 18 + DMX_CHANNELS];

    // Header: "Art-Net\0"
    packet[0..8].copy_from_slice(b"Art-Net\0");

    // OpCode: OpDmx (0x5000, little-endian)
    packet[8..10].copy_from_slice(&0x5000u16.to_le_bytes());

    // Protocol version (14, big-endian)
    packet[10..12].copy_from_slice(&14u16.to_be_bytes());

    packet[12] = sequence;

    // Physical port (informational, always 0)
    packet[13] = 0;

    // Universe (Port-Address, little-endian)
    packet[14..16].copy_from_slice(&universe.to_le_bytes());

    // Length (512 channels, big-endian)
    packet[16..18].copy_from_slice(&(DMX_CHANNELS as u16).to_be_bytes());

    packet[18..].copy_from_slice(channels);

    packet
}

/// Connection state of the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Link down: no socket open, or the last send failed.
    Disconnected,
    /// Socket open, nothing sent yet.
    Connected,
    /// Socket open and the last send succeeded.
    Sending,
}

/// Art-Net sender for outputting DMX data
pub struct ArtNetSender {
    socket: Option<UdpSocket>,
    target: SocketAddr,
    universe: u16,
    sequence: u8,
    state: LinkState,
}

impl ArtNetSender {
    /// Create a new sender. Validates the target address and universe but
    /// opens no socket; call [`connect`](Self::connect) before sending.
    pub fn new(universe: u16, target: &str) -> Result<Self> {
        // Port-Address is 15 bits.
        if universe > 0x7FFF {
            return Err(ControlError::InvalidParameter(format!(
                "Art-Net universe {universe} out of range (0-32767)"
            )));
        }
        let target: SocketAddr = target
            .parse()
            .map_err(|e| ControlError::DmxError(format!("invalid Art-Net target address: {e}")))?;

        Ok(Self {
            socket: None,
            target,
            universe,
            sequence: 0,
            state: LinkState::Disconnected,
        })
    }

    /// Open the UDP socket (any local port, broadcast-capable,
    /// non-blocking). Reconnecting an open sender is a no-op.
    pub fn connect(&mut self) -> Result<()> {
        if self.socket.is_some() {
            return Ok(());
        }
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_broadcast(true)?;
        socket.set_nonblocking(true)?;
        self.socket = Some(socket);
        self.state = LinkState::Connected;

        tracing::info!(universe = self.universe, node = %self.target, "Art-Net sender connected");
        Ok(())
    }

    /// Close the socket. The sequence counter is kept so a reconnect
    /// continues the stream where it left off.
    pub fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            tracing::info!(node = %self.target, "Art-Net sender disconnected");
        }
        self.state = LinkState::Disconnected;
    }

    /// Send one DMX frame as an ArtDMX packet.
    ///
    /// The sequence counter advances only after a successful send, so a
    /// receiver sees no gaps for frames that never left the machine. A
    /// transport error marks the link down but keeps the socket: the next
    /// call simply retries, so the output recovers on its own when the
    /// node comes back.
    pub fn send_frame(&mut self, channels: &[u8; DMX_CHANNELS]) -> Result<()> {
        let socket = self.socket.as_ref().ok_or(ControlError::NotConnected)?;

        let packet = encode_artdmx(self.sequence, self.universe, channels);
        match socket.send_to(&packet, self.target) {
            Ok(_) => {
                self.sequence = self.sequence.wrapping_add(1);
                self.state = LinkState::Sending;
                tracing::trace!(universe = self.universe, seq = self.sequence, "sent ArtDMX frame");
                Ok(())
            }
            Err(e) => {
                if self.state != LinkState::Disconnected {
                    tracing::warn!(node = %self.target, error = %e, "ArtDMX send failed, will retry");
                }
                self.state = LinkState::Disconnected;
                Err(e.into())
            }
        }
    }

    /// Whether a socket is currently open.
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Get the current universe
    pub fn universe(&self) -> u16 {
        self.universe
    }

    /// Set the universe
    pub fn set_universe(&mut self, universe: u16) {
        self.universe = universe;
    }

    /// The configured target address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}
