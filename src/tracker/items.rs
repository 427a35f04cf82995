// Fri Oct 16 2026 - Alex

use crate::emulator::{GuestMemory, ReadWidth};
use crate::memory::MemoryError;
use crate::tracker::memory_map::{
    flag_location, kong_base, COUNT_STRUCT_POINTER, COUNT_STRUCT_POPULATED,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Kongs,
    Moves,
    Guns,
    Instruments,
    KongMoves,
    Keys,
    Blueprints,
    TurnIns,
    Shopkeepers,
    Collectibles,
}

impl ItemCategory {
    pub fn label(self) -> &'static str {
        match self {
            ItemCategory::Kongs => "Kongs",
            ItemCategory::Moves => "Moves",
            ItemCategory::Guns => "Guns",
            ItemCategory::Instruments => "Instruments",
            ItemCategory::KongMoves => "Kong Moves",
            ItemCategory::Keys => "Keys",
            ItemCategory::Blueprints => "Blueprints",
            ItemCategory::TurnIns => "Turn-Ins",
            ItemCategory::Shopkeepers => "Shopkeepers",
            ItemCategory::Collectibles => "Collectibles",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// Field of the count struct, whose address lives at `COUNT_STRUCT_POINTER`.
    CountStruct { offset: u32, width: ReadWidth, bit: Option<u8> },
    /// Field of one kong's block.
    KongBase { kong: u8, offset: u32, width: ReadWidth, bit: Option<u8> },
    /// One bit of the permanent flag block.
    Flag { index: u16 },
}

impl ItemSource {
    /// `count_struct` is the resolved count struct address, or `None` while the
    /// game has not populated it yet (count struct items then read 0).
    pub fn read(&self, memory: &dyn GuestMemory, count_struct: Option<u32>) -> Result<u32, MemoryError> {
        match *self {
            ItemSource::CountStruct { offset, width, bit } => match count_struct {
                Some(base) => Ok(select_bit(memory.read(base.wrapping_add(offset), width)?, bit)),
                None => Ok(0),
            },
            ItemSource::KongBase { kong, offset, width, bit } => {
                Ok(select_bit(memory.read(kong_base(kong) + offset, width)?, bit))
            }
            ItemSource::Flag { index } => {
                let (address, bit) = flag_location(index);
                Ok(select_bit(memory.read_u8(address)? as u32, Some(bit)))
            }
        }
    }
}

fn select_bit(value: u32, bit: Option<u8>) -> u32 {
    match bit {
        Some(bit) => (value >> bit) & 1,
        None => value,
    }
}

/// Address of the count struct, once the game has filled the pointer in.
pub fn count_struct_base(memory: &dyn GuestMemory) -> Result<Option<u32>, MemoryError> {
    if memory.read_u8(COUNT_STRUCT_POINTER)? != COUNT_STRUCT_POPULATED {
        return Ok(None);
    }
    memory.read_u32(COUNT_STRUCT_POINTER).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub name: &'static str,
    pub category: ItemCategory,
    pub source: ItemSource,
}

impl Item {
    pub fn read(&self, memory: &dyn GuestMemory, count_struct: Option<u32>) -> Result<u32, MemoryError> {
        self.source.read(memory, count_struct)
    }

    /// Flag and bitfield items are owned/not owned; the rest are counters.
    pub fn is_toggle(&self) -> bool {
        match self.source {
            ItemSource::CountStruct { bit, .. } | ItemSource::KongBase { bit, .. } => bit.is_some(),
            ItemSource::Flag { .. } => true,
        }
    }
}

const fn counted(name: &'static str, category: ItemCategory, offset: u32, bit: Option<u8>) -> Item {
    Item {
        name,
        category,
        source: ItemSource::CountStruct { offset, width: ReadWidth::Byte, bit },
    }
}

const fn kong(name: &'static str, category: ItemCategory, kong: u8, offset: u32, bit: Option<u8>) -> Item {
    Item {
        name,
        category,
        source: ItemSource::KongBase { kong, offset, width: ReadWidth::Byte, bit },
    }
}

const fn flag(name: &'static str, category: ItemCategory, index: u16) -> Item {
    Item { name, category, source: ItemSource::Flag { index } }
}

use ItemCategory::*;

pub static CATALOG: &[Item] = &[
    counted("Donkey Kong", Kongs, 0xB, Some(0)),
    counted("Diddy Kong", Kongs, 0xB, Some(1)),
    counted("Lanky Kong", Kongs, 0xB, Some(2)),
    counted("Tiny Kong", Kongs, 0xB, Some(3)),
    counted("Chunky Kong", Kongs, 0xB, Some(4)),

    counted("Barrel Throwing", Moves, 0x18, Some(5)),
    counted("Orange Throwing", Moves, 0x18, Some(6)),
    counted("Vine Swinging", Moves, 0x18, Some(4)),
    counted("Diving", Moves, 0x18, Some(7)),
    flag("Climbing", Moves, 0x29F),
    flag("Camera", Moves, 0x2FD),
    flag("Shockwave", Moves, 0x179),
    kong("Slam", Moves, 0, 1, None),
    kong("Homing", Moves, 0, 2, Some(1)),
    kong("Sniper", Moves, 0, 2, Some(2)),

    kong("Coconut", Guns, 0, 2, Some(0)),
    kong("Peanut", Guns, 1, 2, Some(0)),
    kong("Grape", Guns, 2, 2, Some(0)),
    kong("Feather", Guns, 3, 2, Some(0)),
    kong("Pineapple", Guns, 4, 2, Some(0)),

    kong("Bongos", Instruments, 0, 4, Some(0)),
    kong("Guitar", Instruments, 1, 4, Some(0)),
    kong("Trombone", Instruments, 2, 4, Some(0)),
    kong("Sax", Instruments, 3, 4, Some(0)),
    kong("Triangle", Instruments, 4, 4, Some(0)),

    kong("Blast", KongMoves, 0, 0, Some(0)),
    kong("Charge", KongMoves, 1, 0, Some(0)),
    kong("Orangstand", KongMoves, 2, 0, Some(0)),
    kong("Mini", KongMoves, 3, 0, Some(0)),
    kong("Hunky", KongMoves, 4, 0, Some(0)),
    kong("Strong", KongMoves, 0, 0, Some(1)),
    kong("Rocket", KongMoves, 1, 0, Some(1)),
    kong("Balloon", KongMoves, 2, 0, Some(1)),
    kong("Twirl", KongMoves, 3, 0, Some(1)),
    kong("Punch", KongMoves, 4, 0, Some(1)),
    kong("Grab", KongMoves, 0, 0, Some(2)),
    kong("Spring", KongMoves, 1, 0, Some(2)),
    kong("Sprint", KongMoves, 2, 0, Some(2)),
    kong("Port", KongMoves, 3, 0, Some(2)),
    kong("Gone", KongMoves, 4, 0, Some(2)),

    counted("Key 1", Keys, 0xA, Some(0)),
    counted("Key 2", Keys, 0xA, Some(1)),
    counted("Key 3", Keys, 0xA, Some(2)),
    counted("Key 4", Keys, 0xA, Some(3)),
    counted("Key 5", Keys, 0xA, Some(4)),
    counted("Key 6", Keys, 0xA, Some(5)),
    counted("Key 7", Keys, 0xA, Some(6)),
    counted("Key 8", Keys, 0xA, Some(7)),

    counted("DK Blueprints", Blueprints, 0x0, None),
    counted("Diddy Blueprints", Blueprints, 0x1, None),
    counted("Lanky Blueprints", Blueprints, 0x2, None),
    counted("Tiny Blueprints", Blueprints, 0x3, None),
    counted("Chunky Blueprints", Blueprints, 0x4, None),
    counted("DK Turn-Ins", TurnIns, 0x19, None),
    counted("Diddy Turn-Ins", TurnIns, 0x1A, None),
    counted("Lanky Turn-Ins", TurnIns, 0x1B, None),
    counted("Tiny Turn-Ins", TurnIns, 0x1C, None),
    counted("Chunky Turn-Ins", TurnIns, 0x1D, None),

    flag("Cranky", Shopkeepers, 0x3C2),
    flag("Funky", Shopkeepers, 0x3C3),
    flag("Candy", Shopkeepers, 0x3C4),
    flag("Snide", Shopkeepers, 0x3C5),

    counted("Bean", Collectibles, 0xD, Some(5)),
    counted("Nintendo Coin", Collectibles, 0xD, Some(7)),
    counted("Rareware Coin", Collectibles, 0xD, Some(6)),
    counted("Crowns", Collectibles, 0xC, None),
    counted("Medals", Collectibles, 0xE, None),
    counted("Pearls", Collectibles, 0xF, None),
    counted("Fairies", Collectibles, 0x10, None),
    counted("Rainbow Coins", Collectibles, 0x11, None),
];

pub fn find_item(name: &str) -> Option<&'static Item> {
    CATALOG.iter().find(|item| item.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::emulator::GUEST_SEGMENT_MASK;
    use crate::tracker::memory_map::{FLAG_BLOCK, KONG_BASE};
    use std::collections::HashMap;

    /// Guest memory as the console sees it: big-endian, byte addressed.
    #[derive(Default)]
    pub(crate) struct FakeGuest {
        bytes: HashMap<u32, u8>,
    }

    impl FakeGuest {
        pub(crate) fn set_u8(&mut self, address: u32, value: u8) {
            self.bytes.insert(address & GUEST_SEGMENT_MASK, value);
        }

        pub(crate) fn set_u32(&mut self, address: u32, value: u32) {
            for (i, b) in value.to_be_bytes().iter().enumerate() {
                self.set_u8(address + i as u32, *b);
            }
        }

        pub(crate) fn populate_count_struct(&mut self, base: u32) {
            self.set_u32(COUNT_STRUCT_POINTER, base);
        }
    }

    impl GuestMemory for FakeGuest {
        fn read(&self, guest_address: u32, width: ReadWidth) -> Result<u32, MemoryError> {
            let start = guest_address & GUEST_SEGMENT_MASK;
            (0..width.bytes() as u32).try_fold(0u32, |acc, i| {
                self.bytes
                    .get(&(start + i))
                    .map(|b| (acc << 8) | *b as u32)
                    .ok_or_else(|| MemoryError::read(start as u64, width.bytes()))
            })
        }
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|i| i.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 70);
    }

    #[test]
    fn test_count_struct_reads_zero_until_populated() {
        let mut guest = FakeGuest::default();
        guest.set_u32(COUNT_STRUCT_POINTER, 0x0000_0000);
        assert_eq!(count_struct_base(&guest).unwrap(), None);

        let crowns = find_item("crowns").unwrap();
        assert_eq!(crowns.read(&guest, None).unwrap(), 0);

        guest.populate_count_struct(0x8040_0000);
        guest.set_u8(0x8040_000C, 4);
        let base = count_struct_base(&guest).unwrap();
        assert_eq!(base, Some(0x8040_0000));
        assert_eq!(crowns.read(&guest, base).unwrap(), 4);
    }

    #[test]
    fn test_count_struct_bitfields() {
        let mut guest = FakeGuest::default();
        guest.populate_count_struct(0x8040_0000);
        guest.set_u8(0x8040_000A, 0b1000_0101);
        let base = count_struct_base(&guest).unwrap();

        let owned: Vec<_> = CATALOG
            .iter()
            .filter(|i| i.category == ItemCategory::Keys)
            .filter(|i| i.read(&guest, base).unwrap() == 1)
            .map(|i| i.name)
            .collect();
        assert_eq!(owned, vec!["Key 1", "Key 3", "Key 8"]);
    }

    #[test]
    fn test_kong_base_items() {
        let mut guest = FakeGuest::default();
        for kong in 0..5u32 {
            for offset in 0..5u32 {
                guest.set_u8(KONG_BASE + 0x5E * kong + offset, 0);
            }
        }
        guest.set_u8(KONG_BASE + 1, 3);
        guest.set_u8(KONG_BASE + 0x5E * 2 + 4, 1);
        guest.set_u8(KONG_BASE + 0x5E * 3, 0b100);

        assert_eq!(find_item("Slam").unwrap().read(&guest, None).unwrap(), 3);
        assert_eq!(find_item("Trombone").unwrap().read(&guest, None).unwrap(), 1);
        assert_eq!(find_item("Guitar").unwrap().read(&guest, None).unwrap(), 0);
        assert_eq!(find_item("Port").unwrap().read(&guest, None).unwrap(), 1);
        assert_eq!(find_item("Mini").unwrap().read(&guest, None).unwrap(), 0);
    }

    #[test]
    fn test_flag_items() {
        let mut guest = FakeGuest::default();
        guest.set_u8(FLAG_BLOCK + 0x78, 0b0000_1100);
        assert_eq!(find_item("Cranky").unwrap().read(&guest, None).unwrap(), 1);
        assert_eq!(find_item("Funky").unwrap().read(&guest, None).unwrap(), 1);
        assert_eq!(find_item("Candy").unwrap().read(&guest, None).unwrap(), 0);
        assert!(find_item("Camera").unwrap().read(&guest, None).is_err());
    }

    #[test]
    fn test_toggle_classification() {
        assert!(find_item("Climbing").unwrap().is_toggle());
        assert!(find_item("Homing").unwrap().is_toggle());
        assert!(!find_item("Slam").unwrap().is_toggle());
        assert!(!find_item("Rainbow Coins").unwrap().is_toggle());
    }
}
