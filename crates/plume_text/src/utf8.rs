//! UTF-8 decoding for the text emitters
//!
//! Text APIs accept raw bytes as well as `&str`. Rather than signalling a bad
//! sequence with a magic code point, the decoder reports it explicitly and the
//! caller decides to stop.

/// Result of decoding one code point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Utf8Decode {
    /// A scalar value and the number of bytes it occupied
    Char(char, usize),
    /// The bytes at the cursor do not form a valid sequence
    Invalid,
    /// No input left
    End,
}

/// Decode the code point at the start of `bytes`
pub fn decode_utf8(bytes: &[u8]) -> Utf8Decode {
    let Some(&b0) = bytes.first() else {
        return Utf8Decode::End;
    };

    // ascii fast path
    if b0 < 0x80 {
        return Utf8Decode::Char(b0 as char, 1);
    }

    let (len, init) = match b0 {
        0xC2..=0xDF => (2, (b0 & 0x1F) as u32),
        0xE0..=0xEF => (3, (b0 & 0x0F) as u32),
        0xF0..=0xF4 => (4, (b0 & 0x07) as u32),
        _ => return Utf8Decode::Invalid,
    };
    if bytes.len() < len {
        return Utf8Decode::Invalid;
    }

    let mut cp = init;
    for &b in &bytes[1..len] {
        if b & 0xC0 != 0x80 {
            return Utf8Decode::Invalid;
        }
        cp = (cp << 6) | (b & 0x3F) as u32;
    }

    // reject overlong encodings
    let min = match len {
        2 => 0x80,
        3 => 0x800,
        _ => 0x10000,
    };
    if cp < min {
        return Utf8Decode::Invalid;
    }

    match char::from_u32(cp) {
        Some(c) => Utf8Decode::Char(c, len),
        None => Utf8Decode::Invalid,
    }
}

/// Iterate over the code points of `bytes`, stopping at the first invalid sequence
pub fn chars_lossy(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    let mut offset = 0;
    std::iter::from_fn(move || match decode_utf8(&bytes[offset..]) {
        Utf8Decode::Char(c, len) => {
            offset += len;
            Some(c)
        }
        Utf8Decode::Invalid => {
            tracing::trace!("malformed utf-8 at byte {}, truncating text", offset);
            None
        }
        Utf8Decode::End => None,
    })
}
