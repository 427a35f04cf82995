// Fri Oct 16 2026 - Alex

pub mod items;
pub mod memory_map;
pub mod poller;
pub mod snapshot;

pub use items::{count_struct_base, find_item, Item, ItemCategory, ItemSource, CATALOG};
pub use poller::{Poller, PollerEvent};
pub use snapshot::{Change, Snapshot};

use crate::emulator::GuestMemory;
use crate::memory::MemoryError;
use memory_map::{GAME_MODE, GAME_MODE_PLAYING, MAP_INDEX, MEMORY_POINTER};

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The game is not in play; values were left as they were.
    Paused { game_mode: u8 },
    Updated(Vec<Change>),
}

/// Result of the sanity reads done right after connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionCheck {
    MemoryPointer(u32),
    MapIndex(u32),
    Partial,
}

impl ConnectionCheck {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionCheck::MemoryPointer(_) => "full",
            ConnectionCheck::MapIndex(_) => "basic",
            ConnectionCheck::Partial => "partial",
        }
    }
}

pub fn validate_connection(memory: &dyn GuestMemory) -> ConnectionCheck {
    match memory.read_u32(MEMORY_POINTER) {
        Ok(pointer) => {
            log::debug!("Memory pointer read successful: 0x{:08X}", pointer);
            return ConnectionCheck::MemoryPointer(pointer);
        }
        Err(e) => log::debug!("Memory pointer read failed: {}", e),
    }

    match memory.read_u32(MAP_INDEX) {
        Ok(map_index) => {
            log::debug!("Basic connection test successful - map index: {}", map_index);
            ConnectionCheck::MapIndex(map_index)
        }
        Err(e) => {
            log::warn!("Basic connection test also failed: {}", e);
            ConnectionCheck::Partial
        }
    }
}

pub struct Tracker {
    items: &'static [Item],
    snapshot: Snapshot,
}

impl Tracker {
    pub fn new() -> Self {
        Self::with_items(CATALOG)
    }

    pub fn with_items(items: &'static [Item]) -> Self {
        Self { items, snapshot: Snapshot::new() }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Forget all values, e.g. after the emulator changed.
    pub fn reset(&mut self) {
        self.snapshot = Snapshot::new();
    }

    /// Reads every item once. An item whose read fails keeps its previous value.
    pub fn poll(&mut self, memory: &dyn GuestMemory) -> Result<PollOutcome, MemoryError> {
        let game_mode = memory.read_u8(GAME_MODE)?;
        if game_mode != GAME_MODE_PLAYING {
            return Ok(PollOutcome::Paused { game_mode });
        }

        let count_struct = count_struct_base(memory)?;
        let mut next = self.snapshot.clone();
        let mut failed = 0usize;

        for item in self.items {
            match item.read(memory, count_struct) {
                Ok(value) => next.set(item.name, value),
                Err(e) => {
                    failed += 1;
                    log::trace!("{}: {}", item.name, e);
                }
            }
        }

        if failed > 0 {
            log::debug!("{} of {} items could not be read", failed, self.items.len());
        }

        let changes = next.changes_since(&self.snapshot);
        self.snapshot = next;
        Ok(PollOutcome::Updated(changes))
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::items::tests::FakeGuest;
    use crate::tracker::memory_map::{kong_base, FLAG_BLOCK, COUNT_STRUCT_POINTER};

    fn playing_guest() -> FakeGuest {
        let mut guest = FakeGuest::default();
        guest.set_u8(GAME_MODE, GAME_MODE_PLAYING);
        guest.populate_count_struct(0x8040_0000);
        for offset in 0..0x20 {
            guest.set_u8(0x8040_0000 + offset, 0);
        }
        for kong in 0..5 {
            for offset in 0..5 {
                guest.set_u8(kong_base(kong) + offset, 0);
            }
        }
        for offset in 0..0x80 {
            guest.set_u8(FLAG_BLOCK + offset, 0);
        }
        guest
    }

    #[test]
    fn test_paused_outside_gameplay() {
        let mut guest = playing_guest();
        guest.set_u8(GAME_MODE, 3);
        let mut tracker = Tracker::new();
        assert_eq!(tracker.poll(&guest).unwrap(), PollOutcome::Paused { game_mode: 3 });
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_first_poll_reports_all_then_only_changes() {
        let mut guest = playing_guest();
        let mut tracker = Tracker::new();

        match tracker.poll(&guest).unwrap() {
            PollOutcome::Updated(changes) => assert_eq!(changes.len(), CATALOG.len()),
            other => panic!("unexpected {:?}", other),
        }

        guest.set_u8(0x8040_000E, 9);
        guest.set_u8(kong_base(0) + 1, 2);
        match tracker.poll(&guest).unwrap() {
            PollOutcome::Updated(changes) => {
                let names: Vec<_> = changes.iter().map(|c| c.name).collect();
                assert_eq!(names, vec!["Slam", "Medals"]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(tracker.snapshot().get("Medals"), Some(9));
    }

    #[test]
    fn test_unpopulated_count_struct_reads_zero() {
        let mut guest = playing_guest();
        guest.set_u8(0x8040_000E, 9);
        guest.set_u32(COUNT_STRUCT_POINTER, 0);
        let mut tracker = Tracker::new();
        tracker.poll(&guest).unwrap();
        assert_eq!(tracker.snapshot().get("Medals"), Some(0));
    }

    #[test]
    fn test_unreadable_game_mode_is_an_error() {
        let mut tracker = Tracker::new();
        assert!(tracker.poll(&FakeGuest::default()).is_err());
    }

    #[test]
    fn test_validate_connection_falls_back() {
        let mut guest = FakeGuest::default();
        assert_eq!(validate_connection(&guest), ConnectionCheck::Partial);
        guest.set_u32(MAP_INDEX, 0x22);
        assert_eq!(validate_connection(&guest), ConnectionCheck::MapIndex(0x22));
        guest.set_u32(MEMORY_POINTER, 0x8040_0000);
        assert_eq!(validate_connection(&guest), ConnectionCheck::MemoryPointer(0x8040_0000));
    }
}
