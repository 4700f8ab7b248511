//! Frame codec for host → device messages.
//!
//! Wire format:
//! ```text
//! [JSON object, ASCII bytes only][0x0A 0x0D]
//! ```
//! One frame per [`HostEvent`], written as a single contiguous buffer.  The
//! delimiter is `\n` followed by `\r` — the deployed firmware splits the
//! stream on that exact pair, so the order must not be "corrected" to CRLF.
//!
//! Window titles may contain arbitrary Unicode, but the firmware reads the
//! stream as ASCII.  The encoder therefore escapes every non-ASCII character
//! as `\uXXXX` (UTF-16 surrogate pairs for code points above U+FFFF), which
//! any JSON parser on the device side turns back into the original text.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use thiserror::Error;

use crate::protocol::events::HostEvent;

/// Two-byte frame terminator: `\n` then `\r`.
pub const FRAME_DELIMITER: [u8; 2] = *b"\n\r";

/// Errors that can occur while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The event could not be serialized to JSON.
    #[error("failed to serialize event: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The byte slice does not end with the `\n\r` delimiter.
    #[error("frame does not end with the \\n\\r delimiter")]
    MissingDelimiter,

    /// The frame body is not a valid event object.
    #[error("malformed frame body: {0}")]
    Parse(#[source] serde_json::Error),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`HostEvent`] into one delimited ASCII frame.
///
/// # Errors
///
/// Returns [`CodecError::Serialize`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use macropad_core::protocol::codec::{decode_frame, encode_frame};
/// use macropad_core::protocol::events::HostEvent;
///
/// let event = HostEvent::SyncTime { timestamp: 1_700_000_000 };
/// let frame = encode_frame(&event).unwrap();
/// assert!(frame.ends_with(b"\n\r"));
/// assert_eq!(decode_frame(&frame).unwrap(), event);
/// ```
pub fn encode_frame(event: &HostEvent) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(96);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiFormatter);
    event.serialize(&mut ser).map_err(CodecError::Serialize)?;
    buf.extend_from_slice(&FRAME_DELIMITER);
    Ok(buf)
}

/// Decodes one delimited frame back into a [`HostEvent`].
///
/// The host never reads from the device, so this exists for tests and for
/// tooling that replays captured traffic.
///
/// # Errors
///
/// Returns [`CodecError::MissingDelimiter`] if the trailing `\n\r` pair is
/// absent, or [`CodecError::Parse`] if the body is not a valid event object.
pub fn decode_frame(bytes: &[u8]) -> Result<HostEvent, CodecError> {
    let body = bytes
        .strip_suffix(&FRAME_DELIMITER)
        .ok_or(CodecError::MissingDelimiter)?;
    serde_json::from_slice(body).map_err(CodecError::Parse)
}

// ── ASCII formatter ───────────────────────────────────────────────────────────

/// Compact JSON formatter that escapes all non-ASCII characters.
///
/// `serde_json` only escapes control characters by default and writes other
/// string content as UTF-8.  Overriding `write_string_fragment` is enough to
/// change that: the default trait methods already produce compact output, and
/// control/quote/backslash escaping still goes through `write_char_escape`.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            // Flush the ASCII run before this character, then escape it as
            // one or two UTF-16 units.
            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_frame_has_expected_bytes() {
        // Arrange
        let event = HostEvent::Connect {
            host_name: "HOST1".to_string(),
            host_os: "win32".to_string(),
        };

        // Act
        let frame = encode_frame(&event).expect("encode");

        // Assert: the exact byte sequence the firmware parses.
        assert_eq!(
            frame,
            b"{\"event\":\"connect\",\"host_name\":\"HOST1\",\"host_os\":\"win32\"}\n\r"
        );
    }

    #[test]
    fn test_delimiter_is_newline_then_carriage_return() {
        let frame = encode_frame(&HostEvent::SyncTime { timestamp: 0 }).expect("encode");
        // \n before \r — the firmware's framing order, not CRLF.
        assert_eq!(frame[frame.len() - 2], b'\n');
        assert_eq!(frame[frame.len() - 1], b'\r');
    }

    #[test]
    fn test_non_ascii_title_is_escaped_to_pure_ascii() {
        // An em-dash (U+2014) is common in editor window titles.
        let event = HostEvent::UpdateActiveWindow {
            active_window: "Editor \u{2014} file.txt".to_string(),
        };

        let frame = encode_frame(&event).expect("encode");

        assert!(frame.is_ascii(), "frame must contain only ASCII bytes");
        let text = std::str::from_utf8(&frame).expect("ascii is valid utf-8");
        assert!(text.contains("\\u2014"), "em-dash must be escaped: {text}");
    }

    #[test]
    fn test_astral_characters_escape_as_surrogate_pairs() {
        // U+1F600 requires a UTF-16 surrogate pair, like Python's ensure_ascii.
        let event = HostEvent::UpdateActiveWindow {
            active_window: "chat \u{1F600}".to_string(),
        };

        let frame = encode_frame(&event).expect("encode");
        let text = std::str::from_utf8(&frame).expect("ascii is valid utf-8");

        assert!(
            text.contains("\\ud83d\\ude00"),
            "expected surrogate pair escape, got: {text}"
        );
        assert_eq!(
            decode_frame(&frame).expect("decode"),
            event,
            "escaping must round-trip"
        );
    }

    #[test]
    fn test_every_event_kind_round_trips() {
        let events = [
            HostEvent::Connect {
                host_name: "HOST1".to_string(),
                host_os: "darwin".to_string(),
            },
            HostEvent::SyncTime {
                timestamp: 1_700_000_000,
            },
            HostEvent::UpdateActiveWindow {
                active_window: "Terminal".to_string(),
            },
        ];

        for event in events {
            let frame = encode_frame(&event).expect("encode");
            let decoded = decode_frame(&frame).expect("decode");
            assert_eq!(decoded, event);
        }
    }

    #[test]
    fn test_sync_time_body_contains_only_event_and_timestamp() {
        // Arrange
        let frame = encode_frame(&HostEvent::SyncTime {
            timestamp: 1_700_000_000,
        })
        .expect("encode");

        // Act: parse the body as loose JSON to inspect the key set.
        let body = &frame[..frame.len() - FRAME_DELIMITER.len()];
        let value: serde_json::Value = serde_json::from_slice(body).expect("parse");
        let object = value.as_object().expect("object");

        // Assert
        assert_eq!(object.len(), 2, "exactly two keys: {object:?}");
        assert_eq!(object["event"], "sync_time");
        assert_eq!(object["timestamp"], 1_700_000_000);
    }

    #[test]
    fn test_decode_without_delimiter_is_rejected() {
        let mut frame = encode_frame(&HostEvent::SyncTime { timestamp: 5 }).expect("encode");
        frame.truncate(frame.len() - FRAME_DELIMITER.len());

        let result = decode_frame(&frame);
        assert!(matches!(result, Err(CodecError::MissingDelimiter)));
    }

    #[test]
    fn test_decode_rejects_malformed_body() {
        let result = decode_frame(b"{not json\n\r");
        assert!(matches!(result, Err(CodecError::Parse(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_event_tag() {
        let result = decode_frame(b"{\"event\":\"reboot\"}\n\r");
        assert!(matches!(result, Err(CodecError::Parse(_))));
    }
}
