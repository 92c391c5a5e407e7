//! Heuristic UTF-8 detection used by the `Auto` encoding.
//!
//! This is a small state machine over raw bytes. The state is the number of
//! the lead-byte class currently waiting for continuation bytes; combining it
//! with the next byte as `state * 0x100 + byte` selects the transition.
//!
//! Unlike a plain UTF-8 validator it rejects ASCII control characters other
//! than tab, line feed and carriage return, so text containing them falls
//! back to Windows-1250.

/// Accepting state; every other state still expects continuation bytes.
const BOUNDARY: u16 = 0;

/// Returns `true` if `bytes` should be decoded as UTF-8.
pub fn looks_like_utf8(bytes: &[u8]) -> bool {
    let mut state = BOUNDARY;
    for &byte in bytes {
        match next_state(state, byte) {
            Some(next) => state = next,
            None => return false,
        }
    }
    state == BOUNDARY
}

fn next_state(state: u16, byte: u8) -> Option<u16> {
    let c = state * 0x100 + u16::from(byte);
    let next = match c {
        0x09 | 0x0A | 0x0D | 0x20..=0x7E => 0,
        // two-byte lead
        0xC2..=0xDF => 1,
        // three-byte leads; E0 and ED narrow the range of the next byte
        0xE0 => 2,
        0xE1..=0xEC | 0xEE | 0xEF => 3,
        0xED => 4,
        // four-byte leads; F0 and F4 narrow the range of the next byte
        0xF0 => 5,
        0xF1..=0xF3 => 6,
        0xF4 => 7,
        // continuation bytes
        0x180..=0x1BF => 0,
        0x2A0..=0x2BF => 1,
        0x380..=0x3BF => 1,
        0x480..=0x49F => 1,
        0x590..=0x5BF => 3,
        0x680..=0x6BF => 3,
        0x780..=0x78F => 3,
        _ => return None,
    };
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_utf8() {
        assert!(looks_like_utf8(b"Hello World"));
        assert!(looks_like_utf8(b"tab\tand\r\nnewline"));
        assert!(looks_like_utf8(b""));
    }

    #[test]
    fn test_multibyte_sequences() {
        assert!(looks_like_utf8("Żółć".as_bytes()));
        assert!(looks_like_utf8("日本語".as_bytes()));
        assert!(looks_like_utf8("🎤".as_bytes()));
        assert!(looks_like_utf8("\u{D7FF}".as_bytes()));
        assert!(looks_like_utf8("\u{10FFFF}".as_bytes()));
    }

    #[test]
    fn test_windows_1250_text_is_rejected() {
        // "Żółć" in Windows-1250
        assert!(!looks_like_utf8(&[0xAF, 0xF3, 0xB3, 0xE6]));
    }

    #[test]
    fn test_truncated_sequence_is_rejected() {
        assert!(!looks_like_utf8(&[0x41, 0xC3]));
        assert!(!looks_like_utf8(&[0xE2, 0x82]));
    }

    #[test]
    fn test_restricted_second_bytes() {
        // E0 requires A0..BF (no overlong forms)
        assert!(!looks_like_utf8(&[0xE0, 0x80, 0x80]));
        assert!(looks_like_utf8(&[0xE0, 0xA0, 0x80]));
        // ED requires 80..9F (no surrogates)
        assert!(!looks_like_utf8(&[0xED, 0xA0, 0x80]));
        assert!(looks_like_utf8(&[0xED, 0x9F, 0xBF]));
        // F0 requires 90..BF, F4 requires 80..8F
        assert!(!looks_like_utf8(&[0xF0, 0x80, 0x80, 0x80]));
        assert!(!looks_like_utf8(&[0xF4, 0x90, 0x80, 0x80]));
    }

    #[test]
    fn test_invalid_lead_bytes() {
        assert!(!looks_like_utf8(&[0xC0, 0x80]));
        assert!(!looks_like_utf8(&[0xF5, 0x80, 0x80, 0x80]));
        assert!(!looks_like_utf8(&[0x80]));
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert!(!looks_like_utf8(b"bell\x07"));
        assert!(!looks_like_utf8(b"\x00"));
        assert!(!looks_like_utf8(b"del\x7F"));
    }
}
