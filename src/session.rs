// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::emulator::{Attachment, EmulatorId, GuestMemory, HostOs, ReadWidth};
use crate::memory::{host_backend, MemoryError, ProcessBackend};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected(String),
    Failed(String),
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Not connected"),
            ConnectionStatus::Connecting => write!(f, "Attempting connection..."),
            ConnectionStatus::Connected(name) => write!(f, "Connected to {}", name),
            ConnectionStatus::Failed(reason) => write!(f, "Connection failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Idle,
    Waiting,
    Connected,
    ConnectFailed,
    Polled,
    Lost,
}

/// The one connection slot. Holds at most one attachment; a new connect always
/// drops the previous one (and its OS handle) first.
pub struct Session {
    backend: Box<dyn ProcessBackend>,
    host: HostOs,
    order: Vec<EmulatorId>,
    connect_delay_ticks: u32,
    attachment: Option<Attachment>,
    pending_connect: Option<u32>,
    status: ConnectionStatus,
}

impl Session {
    pub fn new(backend: Box<dyn ProcessBackend>, order: Vec<EmulatorId>) -> Self {
        Self {
            backend,
            host: HostOs::current(),
            order,
            connect_delay_ticks: 1,
            attachment: None,
            pending_connect: None,
            status: ConnectionStatus::Disconnected,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(host_backend(), config.emulator_order.clone())
            .with_connect_delay(config.connect_delay_ticks)
    }

    pub fn with_connect_delay(mut self, ticks: u32) -> Self {
        self.connect_delay_ticks = ticks;
        self
    }

    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Tries every emulator in order; the first that attaches wins.
    pub fn connect(&mut self) -> Result<&Attachment, MemoryError> {
        self.disconnect_quietly();
        self.pending_connect = None;
        log::debug!("Attempting to connect to any available emulator...");

        let mut last_error = None;
        for id in self.order.clone() {
            match Attachment::establish_on(self.backend.as_ref(), id.profile(), self.host) {
                Ok(attachment) => return Ok(self.install(attachment)),
                Err(e) => {
                    log::debug!("{}: {}", id.profile().display_name, e);
                    last_error = Some(e);
                }
            }
        }

        let tried = self.order.iter().map(|id| id.profile().display_name).unique().join(", ");
        if let Some(e) = last_error {
            log::debug!("Last connect error: {}", e);
        }
        log::info!("No supported emulator found running");
        self.status = ConnectionStatus::Failed("No emulator found".to_string());
        Err(MemoryError::NoEmulatorFound(tried))
    }

    /// Connects to one specific emulator, surfacing its own error.
    pub fn connect_to(&mut self, id: EmulatorId) -> Result<&Attachment, MemoryError> {
        self.disconnect_quietly();
        self.pending_connect = None;

        match Attachment::establish_on(self.backend.as_ref(), id.profile(), self.host) {
            Ok(attachment) => Ok(self.install(attachment)),
            Err(e) => {
                self.status = ConnectionStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn install(&mut self, attachment: Attachment) -> &Attachment {
        let name = attachment.profile().display_name;
        log::info!("Connected to {}", name);
        log::debug!("Process name: {}", attachment.process().name);
        log::debug!("Memory offset: 0x{:08X}", attachment.guest_ram_base());
        self.status = ConnectionStatus::Connected(name.to_string());
        self.attachment.insert(attachment)
    }

    pub fn disconnect(&mut self) {
        self.pending_connect = None;
        if self.disconnect_quietly() {
            log::info!("Disconnected");
        }
    }

    fn disconnect_quietly(&mut self) -> bool {
        self.status = ConnectionStatus::Disconnected;
        match self.attachment.take() {
            Some(mut attachment) => {
                attachment.close();
                true
            }
            None => false,
        }
    }

    /// Marks a connect to run on a later tick instead of blocking now.
    pub fn request_connect(&mut self) {
        self.status = ConnectionStatus::Connecting;
        self.pending_connect = Some(self.connect_delay_ticks);
    }

    pub fn tick(&mut self) -> TickEvent {
        if let Some(remaining) = self.pending_connect {
            if remaining > 0 {
                self.pending_connect = Some(remaining - 1);
                return TickEvent::Waiting;
            }
            return match self.connect() {
                Ok(_) => TickEvent::Connected,
                Err(_) => TickEvent::ConnectFailed,
            };
        }

        let exited = match &self.attachment {
            Some(attachment) if !self.backend.is_alive(attachment.process().pid) => {
                Some(attachment.process().name.clone())
            }
            Some(_) => None,
            None => return TickEvent::Idle,
        };

        match exited {
            Some(name) => {
                log::warn!("{} exited", name);
                self.disconnect();
                TickEvent::Lost
            }
            None => TickEvent::Polled,
        }
    }
}

impl GuestMemory for Session {
    fn read(&self, guest_address: u32, width: ReadWidth) -> Result<u32, MemoryError> {
        match &self.attachment {
            Some(attachment) => attachment.read(guest_address, width),
            None => Err(MemoryError::NotConnected),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disconnect_quietly();
    }
}
