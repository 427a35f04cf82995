// Sat Oct 17 2026 - Alex

pub mod logging;

pub use logging::LoggingUtils;

use std::num::ParseIntError;
use std::time::{Duration, Instant};

pub fn measure_time<F, T>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();

    if total_secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if total_secs < 1.0 {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.2}s", total_secs)
    }
}

/// Accepts `807FC950`, `0x807FC950`, `0X807fc950` or with `_` separators.
pub fn parse_hex_u32(text: &str) -> Result<u32, ParseIntError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
        .replace('_', "");
    u32::from_str_radix(&digits, 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u32("0x807FC950").unwrap(), 0x807F_C950);
        assert_eq!(parse_hex_u32("807f_c950").unwrap(), 0x807F_C950);
        assert_eq!(parse_hex_u32(" 0X10 ").unwrap(), 0x10);
        assert!(parse_hex_u32("0x1_0000_0000").is_err());
        assert!(parse_hex_u32("zz").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
