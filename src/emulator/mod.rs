// Wed Oct 14 2026 - Alex

pub mod attachment;
pub mod probe;
pub mod profile;
pub mod translator;

pub use attachment::Attachment;
pub use probe::{AttachmentProbe, ModuleBase, ProbeOutcome};
pub use profile::{
    profile_by_key, profiles, EmulatorId, EmulatorProfile, HostOs, BIZHAWK_FALLBACK_BASE,
    RAM_SIGNATURE, SIGNATURE_OFFSET,
};
pub use translator::{
    fix_guest_address, guest_f32, GuestAddressTranslator, GuestMemory, ReadWidth, GUEST_SEGMENT_MASK,
};
