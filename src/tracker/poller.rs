// Fri Oct 16 2026 - Alex

use crate::session::{Session, TickEvent};
use crate::tracker::{validate_connection, Change, ConnectionCheck, PollOutcome, Tracker};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum PollerEvent {
    Connecting,
    Connected { emulator: &'static str, check: ConnectionCheck },
    ConnectFailed,
    Lost,
    Paused { game_mode: u8 },
    Changes(Vec<Change>),
    ReadFailed(String),
}

/// Fixed-rate loop: ticks the session, reconnects when idle, polls the tracker.
pub struct Poller {
    session: Session,
    tracker: Tracker,
    interval: Duration,
    reconnect_ticks: u32,
    idle_ticks: u32,
    last_paused: Option<u8>,
}

impl Poller {
    pub fn new(session: Session, interval: Duration) -> Self {
        Self {
            session,
            tracker: Tracker::new(),
            interval,
            reconnect_ticks: 20,
            idle_ticks: 0,
            last_paused: None,
        }
    }

    /// Idle ticks to wait before retrying a failed connect.
    pub fn with_reconnect_ticks(mut self, ticks: u32) -> Self {
        self.reconnect_ticks = ticks;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Runs one tick and returns what happened, if anything worth reporting.
    pub fn step(&mut self) -> Option<PollerEvent> {
        match self.session.tick() {
            TickEvent::Idle => {
                if self.idle_ticks == 0 {
                    self.session.request_connect();
                    self.idle_ticks = self.reconnect_ticks;
                    return Some(PollerEvent::Connecting);
                }
                self.idle_ticks -= 1;
                None
            }
            TickEvent::Waiting => None,
            TickEvent::ConnectFailed => Some(PollerEvent::ConnectFailed),
            TickEvent::Connected => {
                self.tracker.reset();
                self.last_paused = None;
                let attachment = self.session.attachment()?;
                let check = validate_connection(attachment);
                Some(PollerEvent::Connected {
                    emulator: attachment.profile().display_name,
                    check,
                })
            }
            TickEvent::Lost => {
                self.idle_ticks = 0;
                Some(PollerEvent::Lost)
            }
            TickEvent::Polled => match self.tracker.poll(&self.session) {
                Ok(PollOutcome::Paused { game_mode }) => {
                    if self.last_paused == Some(game_mode) {
                        return None;
                    }
                    self.last_paused = Some(game_mode);
                    Some(PollerEvent::Paused { game_mode })
                }
                Ok(PollOutcome::Updated(changes)) => {
                    self.last_paused = None;
                    (!changes.is_empty()).then_some(PollerEvent::Changes(changes))
                }
                Err(e) => Some(PollerEvent::ReadFailed(e.to_string())),
            },
        }
    }

    /// Steps until `ticks` have elapsed (forever when `None`), sleeping out each interval.
    pub fn run<F>(&mut self, ticks: Option<u64>, mut on_event: F)
    where
        F: FnMut(&PollerEvent),
    {
        let mut elapsed = 0u64;
        while ticks.map_or(true, |limit| elapsed < limit) {
            let started = Instant::now();
            if let Some(event) = self.step() {
                on_event(&event);
            }
            elapsed += 1;

            if let Some(rest) = self.interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::{EmulatorId, RAM_SIGNATURE, SIGNATURE_OFFSET};
    use crate::memory::{ImageBackend, MemoryImage};
    use crate::tracker::memory_map::{COUNT_STRUCT_POINTER, GAME_MODE, MEMORY_POINTER};

    const RDRAM: usize = 0x80_0000;

    fn poke_guest_u8(image: &mut MemoryImage, ram: u64, guest: u32, value: u8) {
        let host = ram + ((guest & 0x7FFF_FFFF) ^ 3) as u64;
        image.poke(host, &[value]);
    }

    fn poke_guest_u32(image: &mut MemoryImage, ram: u64, guest: u32, value: u32) {
        image.poke_u32(ram + (guest & 0x7FFF_FFFF) as u64, value);
    }

    fn playing_image() -> (MemoryImage, u64) {
        let ram = EmulatorId::Project64.profile().scan_low;
        let mut image = MemoryImage::new().with_zeroed(ram, RDRAM);
        image.poke_u32(ram + SIGNATURE_OFFSET, RAM_SIGNATURE);
        poke_guest_u32(&mut image, ram, MEMORY_POINTER, 0x8040_1000);
        poke_guest_u32(&mut image, ram, COUNT_STRUCT_POINTER, 0x8040_0000);
        poke_guest_u8(&mut image, ram, GAME_MODE, 6);
        poke_guest_u8(&mut image, ram, 0x8040_000C, 5);
        (image, ram)
    }

    fn poller(image: MemoryImage) -> Poller {
        let backend = ImageBackend::new().with_process("Project64.exe", 3_999_999, image);
        let session = Session::new(Box::new(backend), vec![EmulatorId::Project64]);
        Poller::new(session, Duration::ZERO)
    }

    #[test]
    fn test_connects_then_tracks() {
        let (image, _) = playing_image();
        let mut poller = poller(image);

        assert_eq!(poller.step(), Some(PollerEvent::Connecting));
        assert_eq!(poller.step(), None);
        assert_eq!(
            poller.step(),
            Some(PollerEvent::Connected {
                emulator: "Project64",
                check: ConnectionCheck::MemoryPointer(0x8040_1000),
            })
        );

        match poller.step() {
            Some(PollerEvent::Changes(changes)) => {
                let crowns = changes.iter().find(|c| c.name == "Crowns").unwrap();
                assert_eq!(crowns.new, 5);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(poller.step(), None);
        assert_eq!(poller.tracker().snapshot().get("Crowns"), Some(5));
    }

    #[test]
    fn test_paused_reported_once() {
        let (mut image, ram) = playing_image();
        poke_guest_u8(&mut image, ram, GAME_MODE, 2);
        let mut poller = poller(image);

        let mut events = Vec::new();
        poller.run(Some(6), |event| events.push(event.clone()));
        let paused = events
            .iter()
            .filter(|e| matches!(e, PollerEvent::Paused { game_mode: 2 }))
            .count();
        assert_eq!(paused, 1);
        assert!(poller.session().is_connected());
    }

    #[test]
    fn test_failed_connect_backs_off() {
        let backend = ImageBackend::new();
        let session = Session::new(Box::new(backend), vec![EmulatorId::Project64]);
        let mut poller = Poller::new(session, Duration::ZERO).with_reconnect_ticks(3);

        let mut events = Vec::new();
        poller.run(Some(12), |event| events.push(event.clone()));
        let attempts = events.iter().filter(|e| **e == PollerEvent::ConnectFailed).count();
        assert_eq!(attempts, 2);
    }
}
