// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-width string fields.
//!
//! Printers write strings into zero-padded fixed-width slots, either as
//! UTF-8 or, on older firmware, as Windows-1251.

const REPLACEMENT: char = '\u{FFFD}';

/// Decodes a zero-padded string slot.
///
/// The slot ends at the first NUL byte; surrounding whitespace is trimmed.
/// Returns `None` if nothing remains.
pub(crate) fn decode_text(raw: &[u8], utf8: bool) -> Option<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let raw = &raw[..end];

    let text = if utf8 {
        String::from_utf8_lossy(raw).into_owned()
    } else {
        raw.iter().map(|&b| cp1251_char(b)).collect()
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Encodes `text` into a zero-padded slot of `width` bytes.
///
/// Text that does not fit is truncated on a character boundary.
pub(crate) fn encode_text(text: &str, width: usize, utf8: bool) -> Vec<u8> {
    let mut slot = Vec::with_capacity(width);
    for c in text.chars() {
        let mut buf = [0u8; 4];
        let bytes: &[u8] = if utf8 {
            c.encode_utf8(&mut buf).as_bytes()
        } else {
            buf[0] = cp1251_byte(c);
            &buf[..1]
        };
        if slot.len() + bytes.len() > width {
            break;
        }
        slot.extend_from_slice(bytes);
    }
    slot.resize(width, 0);
    slot
}

/// Windows-1251 characters for bytes `0x80..=0xBF`; 0x98 is unassigned.
#[rustfmt::skip]
const CP1251_HIGH: [char; 64] = [
    'Ђ', 'Ѓ', '‚', 'ѓ', '„', '…', '†', '‡', '€', '‰', 'Љ', '‹', 'Њ', 'Ќ', 'Ћ', 'Џ',
    'ђ', '‘', '’', '“', '”', '•', '–', '—', REPLACEMENT, '™', 'љ', '›', 'њ', 'ќ', 'ћ', 'џ',
    '\u{00A0}', 'Ў', 'ў', 'Ј', '¤', 'Ґ', '¦', '§', 'Ё', '©', 'Є', '«', '¬', '\u{00AD}', '®', 'Ї',
    '°', '±', 'І', 'і', 'ґ', 'µ', '¶', '·', 'ё', '№', 'є', '»', 'ј', 'Ѕ', 'ѕ', 'ї',
];

fn cp1251_char(byte: u8) -> char {
    match byte {
        0x00..=0x7F => char::from(byte),
        0x80..=0xBF => CP1251_HIGH[usize::from(byte - 0x80)],
        0xC0..=0xFF => char::from_u32(0x0410 + u32::from(byte - 0xC0)).unwrap_or(REPLACEMENT),
    }
}

fn cp1251_byte(c: char) -> u8 {
    let code = u32::from(c);
    if code < 0x80 {
        return u8::try_from(code).unwrap_or(b'?');
    }
    if ('\u{0410}'..='\u{044F}').contains(&c) {
        return u8::try_from(code - 0x0410 + 0xC0).unwrap_or(b'?');
    }
    CP1251_HIGH
        .iter()
        .position(|&high| high == c && c != REPLACEMENT)
        .and_then(|i| u8::try_from(0x80 + i).ok())
        .unwrap_or(b'?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_nul_and_trims() {
        assert_eq!(
            decode_text(b"  benchy.gcode \0garbage", true).as_deref(),
            Some("benchy.gcode")
        );
    }

    #[test]
    fn blank_slot_is_none() {
        assert_eq!(decode_text(&[0; 16], true), None);
        assert_eq!(decode_text(b"   \0\0", false), None);
    }

    #[test]
    fn windows_1251_cyrillic() {
        // "Привет" in Windows-1251
        let raw = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2, 0x00];
        assert_eq!(decode_text(&raw, false).as_deref(), Some("Привет"));
        assert_eq!(decode_text(&[0xA8, 0xB8], false).as_deref(), Some("Ёё"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let decoded = decode_text(&[b'a', 0xFF, b'b'], true);
        assert_eq!(decoded.as_deref(), Some("a\u{FFFD}b"));
    }

    #[test]
    fn encode_pads_and_truncates() {
        assert_eq!(encode_text("ab", 4, true), vec![b'a', b'b', 0, 0]);
        // 'П' takes two bytes in UTF-8 and does not fit after "abc"
        assert_eq!(encode_text("abcП", 4, true), vec![b'a', b'b', b'c', 0]);
        assert_eq!(encode_text("abcП", 4, false), vec![b'a', b'b', b'c', 0xCF]);
    }

    #[test]
    fn windows_1251_upper_half() {
        let raw = [0xB9, b'5', b' ', 0xB3, 0xBF, b' ', 0xAB, b'x', 0xBB, b' ', 0x96];
        assert_eq!(decode_text(&raw, false).as_deref(), Some("№5 ії «x» –"));
        assert_eq!(decode_text(&[0xAA, 0xBA, 0xA5, 0xB4, 0x97], false).as_deref(), Some("ЄєҐґ—"));
        assert_eq!(decode_text(&[b'a', 0x98, b'b'], false).as_deref(), Some("a\u{FFFD}b"));
    }

    #[test]
    fn windows_1251_covers_every_assigned_byte() {
        for byte in (0u8..=0xFF).filter(|&b| b != 0x98) {
            let c = cp1251_char(byte);
            assert_ne!(c, REPLACEMENT, "byte {byte:#04X}");
            assert_eq!(cp1251_byte(c), byte, "byte {byte:#04X} ({c:?})");
        }
        assert_eq!(cp1251_byte(REPLACEMENT), b'?');
        assert_eq!(cp1251_byte('漢'), b'?');
    }

    #[test]
    fn windows_1251_encode_matches_decode() {
        let slot = encode_text("Дракон ёж №3 «ї»", 24, false);
        assert_eq!(decode_text(&slot, false).as_deref(), Some("Дракон ёж №3 «ї»"));
    }
}
