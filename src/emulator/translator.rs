// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, RemoteMemory};

/// Guest virtual addresses carry the KSEG bit; host offsets never do.
pub const GUEST_SEGMENT_MASK: u32 = 0x7FFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadWidth {
    Byte = 1,
    Half = 2,
    Word = 4,
}

impl ReadWidth {
    pub fn bytes(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for ReadWidth {
    type Error = MemoryError;

    fn try_from(width: usize) -> Result<Self, Self::Error> {
        match width {
            1 => Ok(ReadWidth::Byte),
            2 => Ok(ReadWidth::Half),
            4 => Ok(ReadWidth::Word),
            other => Err(MemoryError::UnsupportedWidth(other)),
        }
    }
}

/// Emulators keep RDRAM as host-endian 32-bit words, so sub-word guest
/// accesses land on the mirrored lane inside the word.
pub fn fix_guest_address(address: u32, width: ReadWidth) -> u32 {
    let address = address & GUEST_SEGMENT_MASK;
    match width {
        ReadWidth::Byte => match address % 4 {
            0 => address + 3,
            1 => address + 1,
            2 => address - 1,
            _ => address - 3,
        },
        ReadWidth::Half => match address % 4 {
            0 | 1 => address + 2,
            _ => address - 2,
        },
        ReadWidth::Word => address,
    }
}

pub fn host_address(guest_ram_base: u64, guest_address: u32, width: ReadWidth) -> Address {
    Address::new(guest_ram_base).offset(fix_guest_address(guest_address, width) as u64)
}

/// The guest stores floats in its own byte order.
pub fn guest_f32(raw: u32) -> f32 {
    if raw == 0 {
        return 0.0;
    }
    f32::from_be_bytes(raw.to_be_bytes())
}

/// Typed guest reads. Implemented by anything that can reach guest RAM.
pub trait GuestMemory {
    fn read(&self, guest_address: u32, width: ReadWidth) -> Result<u32, MemoryError>;

    fn read_u8(&self, guest_address: u32) -> Result<u8, MemoryError> {
        Ok(self.read(guest_address, ReadWidth::Byte)? as u8)
    }

    fn read_u16(&self, guest_address: u32) -> Result<u16, MemoryError> {
        Ok(self.read(guest_address, ReadWidth::Half)? as u16)
    }

    fn read_u32(&self, guest_address: u32) -> Result<u32, MemoryError> {
        self.read(guest_address, ReadWidth::Word)
    }

    fn read_f32(&self, guest_address: u32) -> Result<f32, MemoryError> {
        Ok(guest_f32(self.read_u32(guest_address)?))
    }

    fn read_width(&self, guest_address: u32, width: usize) -> Result<u32, MemoryError> {
        self.read(guest_address, ReadWidth::try_from(width)?)
    }
}

pub struct GuestAddressTranslator<'a> {
    memory: &'a dyn RemoteMemory,
    guest_ram_base: u64,
}

impl<'a> GuestAddressTranslator<'a> {
    pub fn new(memory: &'a dyn RemoteMemory, guest_ram_base: u64) -> Self {
        Self { memory, guest_ram_base }
    }

    pub fn guest_ram_base(&self) -> u64 {
        self.guest_ram_base
    }

    pub fn resolve(&self, guest_address: u32, width: ReadWidth) -> Address {
        host_address(self.guest_ram_base, guest_address, width)
    }
}

impl GuestMemory for GuestAddressTranslator<'_> {
    fn read(&self, guest_address: u32, width: ReadWidth) -> Result<u32, MemoryError> {
        let host = self.resolve(guest_address, width);
        let bytes = self
            .memory
            .read_bytes(host, width.bytes())
            .map_err(|e| e.with_guest_address(guest_address))?;

        Ok(match width {
            ReadWidth::Byte => bytes[0] as u32,
            ReadWidth::Half => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
            ReadWidth::Word => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        })
    }
}
