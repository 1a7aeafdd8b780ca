//! Codec for the embedded default font
//!
//! The font ships as base85 text wrapping a small LZ stream. The stream starts
//! with a 16-byte header (magic, big-endian output length) followed by 1-6 byte
//! tokens that are either literal runs or back-references into the output, and
//! ends with `05 FA` plus a big-endian Adler-32 of the decompressed bytes.

use thiserror::Error;

const MAGIC: u32 = 0x57bC_0000;
const HEADER_LEN: usize = 16;
const ADLER_MOD: u32 = 65521;
const ADLER_BLOCK: usize = 5552;

/// Errors from [`decompress`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    #[error("bad stream magic")]
    BadMagic,

    #[error("stream too large")]
    TooLarge,

    #[error("truncated stream at byte {0}")]
    Truncated(usize),

    #[error("unknown token {token:#04x} at byte {offset}")]
    UnknownToken { token: u8, offset: usize },

    #[error("back-reference distance {distance} exceeds output length {available}")]
    BadDistance { distance: usize, available: usize },

    #[error("decompressed length {actual} does not match header length {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("checksum {actual:#010x} does not match {expected:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

fn decode85_byte(c: u8) -> u32 {
    if c >= b'\\' {
        (c - 36) as u32
    } else {
        (c - 35) as u32
    }
}

/// Decode base85 text into bytes, five characters per little-endian word
pub fn decode85(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len().div_ceil(5) * 4);
    for chunk in src.chunks_exact(5) {
        let word = decode85_byte(chunk[0])
            + 85 * (decode85_byte(chunk[1])
                + 85 * (decode85_byte(chunk[2])
                    + 85 * (decode85_byte(chunk[3]) + 85 * decode85_byte(chunk[4]))));
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// Adler-32 checksum, continuing from `adler`
pub fn adler32(adler: u32, data: &[u8]) -> u32 {
    let mut s1 = adler & 0xffff;
    let mut s2 = adler >> 16;
    for block in data.chunks(ADLER_BLOCK) {
        for &b in block {
            s1 += b as u32;
            s2 += s1;
        }
        s1 %= ADLER_MOD;
        s2 %= ADLER_MOD;
    }
    (s2 << 16) | s1
}

fn be_u32(bytes: &[u8], at: usize) -> Result<u32, DecompressError> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(DecompressError::Truncated(at))
}

struct Decoder<'a> {
    input: &'a [u8],
    out: Vec<u8>,
}

impl Decoder<'_> {
    fn byte(&self, at: usize) -> Result<usize, DecompressError> {
        self.input
            .get(at)
            .map(|&b| b as usize)
            .ok_or(DecompressError::Truncated(at))
    }

    fn in2(&self, at: usize) -> Result<usize, DecompressError> {
        Ok((self.byte(at)? << 8) | self.byte(at + 1)?)
    }

    fn in3(&self, at: usize) -> Result<usize, DecompressError> {
        Ok((self.byte(at)? << 16) | (self.byte(at + 1)? << 8) | self.byte(at + 2)?)
    }

    fn copy_match(&mut self, distance: usize, len: usize) -> Result<(), DecompressError> {
        if distance == 0 || distance > self.out.len() {
            return Err(DecompressError::BadDistance {
                distance,
                available: self.out.len(),
            });
        }
        // byte-wise: source and destination may overlap
        let start = self.out.len() - distance;
        for i in 0..len {
            let b = self.out[start + i];
            self.out.push(b);
        }
        Ok(())
    }

    fn copy_literal(&mut self, at: usize, len: usize) -> Result<(), DecompressError> {
        let bytes = self
            .input
            .get(at..at + len)
            .ok_or(DecompressError::Truncated(at))?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    /// Decode the token at `at`; returns the offset of the next token, or
    /// `None` when `at` holds the end marker
    fn token(&mut self, at: usize) -> Result<Option<usize>, DecompressError> {
        let t = self.byte(at)?;
        let next = if t >= 0x80 {
            self.copy_match(self.byte(at + 1)? + 1, t - 0x80 + 1)?;
            at + 2
        } else if t >= 0x40 {
            self.copy_match(self.in2(at)? - 0x4000 + 1, self.byte(at + 2)? + 1)?;
            at + 3
        } else if t >= 0x20 {
            let len = t - 0x20 + 1;
            self.copy_literal(at + 1, len)?;
            at + 1 + len
        } else if t >= 0x18 {
            self.copy_match(self.in3(at)? - 0x18_0000 + 1, self.byte(at + 3)? + 1)?;
            at + 4
        } else if t >= 0x10 {
            self.copy_match(self.in3(at)? - 0x10_0000 + 1, self.in2(at + 3)? + 1)?;
            at + 5
        } else if t >= 0x08 {
            let len = self.in2(at)? - 0x0800 + 1;
            self.copy_literal(at + 2, len)?;
            at + 2 + len
        } else if t == 0x07 {
            let len = self.in2(at + 1)? + 1;
            self.copy_literal(at + 3, len)?;
            at + 3 + len
        } else if t == 0x06 {
            self.copy_match(self.in3(at + 1)? + 1, self.byte(at + 4)? + 1)?;
            at + 5
        } else if t == 0x04 {
            self.copy_match(self.in3(at + 1)? + 1, self.in2(at + 4)? + 1)?;
            at + 6
        } else if t == 0x05 && self.byte(at + 1)? == 0xfa {
            return Ok(None);
        } else {
            return Err(DecompressError::UnknownToken {
                token: t as u8,
                offset: at,
            });
        };
        Ok(Some(next))
    }
}

/// Decompress a stream, verifying its length and Adler-32 checksum
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, DecompressError> {
    if be_u32(input, 0)? != MAGIC {
        return Err(DecompressError::BadMagic);
    }
    if be_u32(input, 4)? != 0 {
        return Err(DecompressError::TooLarge);
    }
    let expected = be_u32(input, 8)? as usize;

    let mut decoder = Decoder {
        input,
        out: Vec::with_capacity(expected),
    };
    let mut at = HEADER_LEN;
    while let Some(next) = decoder.token(at)? {
        at = next;
        if decoder.out.len() > expected {
            return Err(DecompressError::LengthMismatch {
                expected,
                actual: decoder.out.len(),
            });
        }
    }

    if decoder.out.len() != expected {
        return Err(DecompressError::LengthMismatch {
            expected,
            actual: decoder.out.len(),
        });
    }
    let stored = be_u32(input, at + 2)?;
    let actual = adler32(1, &decoder.out);
    if stored != actual {
        return Err(DecompressError::ChecksumMismatch {
            expected: stored,
            actual,
        });
    }
    Ok(decoder.out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a stream by hand: literal "abc", match (distance 3, len 6), end
    fn handmade_stream(payload_checksum: u32) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&MAGIC.to_be_bytes());
        s.extend_from_slice(&0u32.to_be_bytes());
        s.extend_from_slice(&9u32.to_be_bytes());
        s.extend_from_slice(&0u32.to_be_bytes());
        s.extend_from_slice(&[0x22, b'a', b'b', b'c']);
        s.extend_from_slice(&[0x85, 0x02]);
        s.extend_from_slice(&[0x05, 0xfa]);
        s.extend_from_slice(&payload_checksum.to_be_bytes());
        s
    }

    #[test]
    fn test_adler32_known_value() {
        assert_eq!(adler32(1, b"Wikipedia"), 0x11E6_0398);
        assert_eq!(adler32(1, b""), 1);
    }

    #[test]
    fn test_decompress_literal_and_overlapping_match() {
        let expected = b"abcabcabc";
        let stream = handmade_stream(adler32(1, expected));
        assert_eq!(decompress(&stream).unwrap(), expected);
    }

    #[test]
    fn test_decompress_checksum_mismatch() {
        let stream = handmade_stream(0xDEAD_BEEF);
        assert!(matches!(
            decompress(&stream),
            Err(DecompressError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_decompress_bad_magic() {
        let mut stream = handmade_stream(0);
        stream[0] = 0;
        assert_eq!(decompress(&stream), Err(DecompressError::BadMagic));
    }

    #[test]
    fn test_decode85_word() {
        // "#####" is all zero digits
        assert_eq!(decode85(b"#####"), vec![0, 0, 0, 0]);
        // '$' is digit 1 in the lowest position
        assert_eq!(decode85(b"$####"), vec![1, 0, 0, 0]);
    }
}
