// Wed Oct 14 2026 - Alex

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// "RAMB" read as a little-endian word.
pub const RAM_SIGNATURE: u32 = 0x5241_4D42;

/// Where the signature lives relative to the start of guest RAM.
pub const SIGNATURE_OFFSET: u64 = 0x0075_9290;

/// BizHawk's mupen64plus base when the module list does not show it.
/// Found empirically against one BizHawk build; expect it to break on others.
pub const BIZHAWK_FALLBACK_BASE: u64 = 2_024_407_040;

pub const DEFAULT_SCAN_STEP: u64 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmulatorId {
    #[serde(rename = "project64")]
    Project64,
    #[serde(rename = "project64_v4")]
    Project64V4,
    #[serde(rename = "bizhawk")]
    BizHawk,
    #[serde(rename = "rmg")]
    Rmg,
    #[serde(rename = "simple64")]
    Simple64,
    #[serde(rename = "parallel_launcher")]
    ParallelLauncher,
    #[serde(rename = "retroarch")]
    RetroArch,
    #[serde(rename = "parallel_launcher_903")]
    ParallelLauncher903,
}

impl EmulatorId {
    pub const ALL: [EmulatorId; 8] = [
        EmulatorId::Project64,
        EmulatorId::Project64V4,
        EmulatorId::BizHawk,
        EmulatorId::Rmg,
        EmulatorId::Simple64,
        EmulatorId::ParallelLauncher,
        EmulatorId::RetroArch,
        EmulatorId::ParallelLauncher903,
    ];

    /// Order tried by a plain connect. Project64 4.x goes before the legacy layout.
    pub const CONNECT_ORDER: [EmulatorId; 8] = [
        EmulatorId::Rmg,
        EmulatorId::Project64V4,
        EmulatorId::Project64,
        EmulatorId::BizHawk,
        EmulatorId::Simple64,
        EmulatorId::RetroArch,
        EmulatorId::ParallelLauncher,
        EmulatorId::ParallelLauncher903,
    ];

    pub fn key(self) -> &'static str {
        match self {
            EmulatorId::Project64 => "project64",
            EmulatorId::Project64V4 => "project64_v4",
            EmulatorId::BizHawk => "bizhawk",
            EmulatorId::Rmg => "rmg",
            EmulatorId::Simple64 => "simple64",
            EmulatorId::ParallelLauncher => "parallel_launcher",
            EmulatorId::RetroArch => "retroarch",
            EmulatorId::ParallelLauncher903 => "parallel_launcher_903",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn profile(self) -> &'static EmulatorProfile {
        &PROFILES[self as usize]
    }
}

impl fmt::Display for EmulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Linux,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else if cfg!(any(target_os = "linux", target_os = "android")) {
            HostOs::Linux
        } else {
            HostOs::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorProfile {
    pub id: EmulatorId,
    pub display_name: &'static str,
    pub process_prefix: &'static str,
    pub requires_module: bool,
    pub dll_name: Option<&'static str>,
    pub linux_dll_name: Option<&'static str>,
    /// The scan window holds a pointer to guest RAM rather than guest RAM itself.
    pub uses_indirect_pointer: bool,
    pub scan_low: u64,
    pub scan_high: u64,
    pub scan_step: u64,
    pub extra_offset: u64,
}

impl EmulatorProfile {
    pub fn primary_module_name(&self, os: HostOs) -> Option<&'static str> {
        match (os, self.linux_dll_name) {
            (HostOs::Linux, Some(name)) => Some(name),
            _ => self.dll_name,
        }
    }

    /// Names to try, most specific first. Linux also gets the `.so` and
    /// `lib`-prefixed spellings of the Windows library name.
    pub fn module_candidates(&self, os: HostOs) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        };

        if let Some(primary) = self.primary_module_name(os) {
            push(primary.to_string());
        }

        if let (HostOs::Linux, Some(dll)) = (os, self.dll_name) {
            if let Some(stem) = dll.strip_suffix(".dll") {
                push(format!("{}.so", stem));
            }
            if !dll.starts_with("lib") {
                let lib_name = format!("lib{}", dll);
                if let Some(stem) = lib_name.strip_suffix(".dll") {
                    let lib_so = format!("{}.so", stem);
                    push(lib_name.clone());
                    push(lib_so);
                } else {
                    push(lib_name);
                }
            }
        }

        names
    }

    pub fn scan_offsets(&self) -> impl Iterator<Item = u64> {
        (self.scan_low..self.scan_high).step_by(self.scan_step.max(1) as usize)
    }

    pub fn scan_steps(&self) -> u64 {
        let step = self.scan_step.max(1);
        self.scan_high.saturating_sub(self.scan_low).div_ceil(step)
    }
}

const fn profile(
    id: EmulatorId,
    display_name: &'static str,
    process_prefix: &'static str,
    dll_name: Option<&'static str>,
    linux_dll_name: Option<&'static str>,
    uses_indirect_pointer: bool,
    scan_low: u64,
    scan_high: u64,
) -> EmulatorProfile {
    EmulatorProfile {
        id,
        display_name,
        process_prefix,
        requires_module: dll_name.is_some(),
        dll_name,
        linux_dll_name,
        uses_indirect_pointer,
        scan_low,
        scan_high,
        scan_step: DEFAULT_SCAN_STEP,
        extra_offset: 0,
    }
}

/// Indexed by `EmulatorId as usize`.
pub static PROFILES: [EmulatorProfile; 8] = [
    profile(EmulatorId::Project64, "Project64", "project64", None, None, false, 0xDFD0_0000, 0xE01F_FFFF),
    profile(EmulatorId::Project64V4, "Project64", "project64", None, None, false, 0xFDD0_0000, 0xFE1F_FFFF),
    profile(
        EmulatorId::BizHawk,
        "Bizhawk",
        "emuhawk",
        Some("mupen64plus.dll"),
        Some("libmupen64plus.so"),
        false,
        0x5_A000,
        0x56_58DF,
    ),
    EmulatorProfile {
        extra_offset: 0x8000_0000,
        ..profile(
            EmulatorId::Rmg,
            "Rosalie's Mupen GUI",
            "rmg",
            Some("mupen64plus.dll"),
            Some("libmupen64plus.so"),
            true,
            0x29C_15D8,
            0x2FC_15D8,
        )
    },
    profile(
        EmulatorId::Simple64,
        "simple64",
        "simple64-gui",
        Some("libmupen64plus.dll"),
        Some("libmupen64plus.so"),
        true,
        0x138_0000,
        0x29C_95D8,
    ),
    profile(
        EmulatorId::ParallelLauncher,
        "Parallel Launcher (<9.0.2)",
        "retroarch",
        Some("parallel_n64_next_libretro.dll"),
        Some("parallel_n64_next_libretro.so"),
        true,
        0x84_5000,
        0xD5_6000,
    ),
    EmulatorProfile {
        scan_step: 4,
        ..profile(
            EmulatorId::RetroArch,
            "RetroArch",
            "retroarch",
            Some("mupen64plus_next_libretro.dll"),
            Some("mupen64plus_next_libretro.so"),
            true,
            0,
            0xFF_FFFF,
        )
    },
    profile(
        EmulatorId::ParallelLauncher903,
        "Parallel Launcher (9.0.3+)",
        "retroarch",
        Some("parallel_n64_next_libretro.dll"),
        Some("parallel_n64_next_libretro.so"),
        true,
        0x140_0000,
        0x180_0000,
    ),
];

static BY_KEY: Lazy<IndexMap<&'static str, &'static EmulatorProfile>> =
    Lazy::new(|| PROFILES.iter().map(|p| (p.id.key(), p)).collect());

pub fn profiles() -> impl Iterator<Item = &'static EmulatorProfile> {
    BY_KEY.values().copied()
}

pub fn profile_by_key(key: &str) -> Option<&'static EmulatorProfile> {
    EmulatorId::from_key(key).and_then(|id| BY_KEY.get(id.key()).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_id() {
        for id in EmulatorId::ALL {
            assert_eq!(id.profile().id, id);
        }
    }

    #[test]
    fn test_serde_names_match_keys() {
        for id in EmulatorId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.key()));
            let back: EmulatorId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
            assert_eq!(EmulatorId::from_key(id.key()), Some(id));
        }
    }

    #[test]
    fn test_table_constants() {
        let rmg = EmulatorId::Rmg.profile();
        assert_eq!(rmg.extra_offset, 0x8000_0000);
        assert!(rmg.uses_indirect_pointer);
        assert_eq!(EmulatorId::RetroArch.profile().scan_step, 4);
        assert!(!EmulatorId::Project64.profile().requires_module);
        assert!(!EmulatorId::BizHawk.profile().uses_indirect_pointer);
        assert_eq!(BIZHAWK_FALLBACK_BASE, 0x78AA_0000);
    }

    #[test]
    fn test_windows_candidates_are_just_the_dll() {
        let names = EmulatorId::BizHawk.profile().module_candidates(HostOs::Windows);
        assert_eq!(names, vec!["mupen64plus.dll"]);
        assert!(EmulatorId::Project64.profile().module_candidates(HostOs::Windows).is_empty());
    }

    #[test]
    fn test_linux_candidates_add_variants() {
        let names = EmulatorId::BizHawk.profile().module_candidates(HostOs::Linux);
        assert_eq!(names, vec!["libmupen64plus.so", "mupen64plus.so", "libmupen64plus.dll"]);

        let names = EmulatorId::Simple64.profile().module_candidates(HostOs::Linux);
        assert_eq!(names, vec!["libmupen64plus.so"]);

        let names = EmulatorId::RetroArch.profile().module_candidates(HostOs::Linux);
        assert_eq!(
            names,
            vec![
                "mupen64plus_next_libretro.so",
                "libmupen64plus_next_libretro.dll",
                "libmupen64plus_next_libretro.so",
            ]
        );
    }

    #[test]
    fn test_lookup_by_key() {
        assert_eq!(profile_by_key("RMG").unwrap().id, EmulatorId::Rmg);
        assert_eq!(profile_by_key("parallel-launcher-903").unwrap().id, EmulatorId::ParallelLauncher903);
        assert!(profile_by_key("dolphin").is_none());
        assert_eq!(profiles().count(), 8);
    }

    #[test]
    fn test_scan_offsets_respect_step_and_bound() {
        let profile = EmulatorProfile {
            scan_low: 0x100,
            scan_high: 0x140,
            ..EmulatorId::BizHawk.profile().clone()
        };
        let offsets: Vec<u64> = profile.scan_offsets().collect();
        assert_eq!(offsets, vec![0x100, 0x110, 0x120, 0x130]);
        assert_eq!(profile.scan_steps(), 4);
    }
}
