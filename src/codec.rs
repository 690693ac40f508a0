//! Reversible blob transform for embedded file content
//!
//! Turns raw file bytes into a text-safe blob that can live inside a source
//! literal, and back. The pipeline is fixed by the artifact wire format:
//!
//! - Compress: gzip (DEFLATE) at maximum level, zero header mtime so the
//!   output is deterministic for a given input.
//! - Encode: radix-85 over the ascii85 digit alphabet (`!`..`u`), with the
//!   `z` shorthand for an all-zero group.
//! - Escape: the one character the target literal syntax reserves is
//!   substituted with a placeholder the alphabet never produces
//!   ([`EscapeRule`]), so the swap is lossless.
//! - Wrap: hard line break every 80 columns. Purely cosmetic; decoding
//!   strips all ASCII whitespace first.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{CartonError, Result};

/// First and last radix-85 digit characters (`!` = 0, `u` = 84).
const DIGIT_LO: u8 = b'!';
const DIGIT_HI: u8 = b'u';

/// Shorthand for a group of four zero bytes.
const ZERO_GROUP: u8 = b'z';

/// Column at which encoded blobs are wrapped.
const WRAP_COLUMNS: usize = 80;

/// Substitution of a character reserved by the target literal syntax.
///
/// The placeholder must be a character the encoding never emits, so the
/// substitution can be reversed without further bookkeeping. For Rust
/// raw-string literals the reserved character is `"` (a legitimate radix-85
/// digit) and the placeholder is `~`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeRule {
    reserved: u8,
    placeholder: u8,
}

impl EscapeRule {
    /// Escape rule for Rust `r"..."` literals: `"` becomes `~`.
    pub const fn rust_raw_string() -> Self {
        EscapeRule {
            reserved: b'"',
            placeholder: b'~',
        }
    }

    /// Create an escape rule for another target syntax.
    ///
    /// Fails if the placeholder is something the encoder can emit (a radix-85
    /// digit, the `z` shorthand, or whitespace used for wrapping), since the
    /// substitution would then be ambiguous on decode.
    pub fn new(reserved: char, placeholder: char) -> Result<Self> {
        if !placeholder.is_ascii() || !reserved.is_ascii() {
            return Err(CartonError::InvalidEscapeRule(placeholder));
        }
        let p = placeholder as u8;
        let produced_by_encoder =
            (DIGIT_LO..=DIGIT_HI).contains(&p) || p == ZERO_GROUP || p.is_ascii_whitespace();
        if produced_by_encoder || placeholder == reserved {
            return Err(CartonError::InvalidEscapeRule(placeholder));
        }
        Ok(EscapeRule {
            reserved: reserved as u8,
            placeholder: p,
        })
    }
}

/// Encoder/decoder pair implementing the embedded-content wire format.
#[derive(Debug, Clone)]
pub struct Codec {
    escape: EscapeRule,
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new(EscapeRule::rust_raw_string())
    }
}

impl Codec {
    /// Create a codec targeting the literal syntax described by `escape`.
    pub fn new(escape: EscapeRule) -> Self {
        Codec { escape }
    }

    /// Compress and encode `data` into a wrapped text-safe blob.
    pub fn encode(&self, data: &[u8]) -> Result<String> {
        let mut gz = GzEncoder::new(Vec::new(), Compression::best());
        gz.write_all(data)?;
        let compressed = gz.finish()?;

        let mut encoded = radix85_encode(&compressed);
        for b in &mut encoded {
            if *b == self.escape.reserved {
                *b = self.escape.placeholder;
            }
        }

        let mut out = String::with_capacity(encoded.len() + encoded.len() / WRAP_COLUMNS + 1);
        for (i, &b) in encoded.iter().enumerate() {
            if i > 0 && i % WRAP_COLUMNS == 0 {
                out.push('\n');
            }
            out.push(b as char);
        }
        Ok(out)
    }

    /// Reverse [`Codec::encode`]: unwrap, unescape, decode, decompress.
    ///
    /// Any malformed text or truncated/corrupted compressed stream surfaces
    /// as [`CartonError::Decode`].
    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let cleaned: Vec<u8> = text
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| {
                if b == self.escape.placeholder {
                    self.escape.reserved
                } else {
                    b
                }
            })
            .collect();

        let compressed = radix85_decode(&cleaned)?;

        let mut gz = GzDecoder::new(compressed.as_slice());
        let mut out = Vec::new();
        gz.read_to_end(&mut out)
            .map_err(|e| CartonError::Decode(format!("decompression failed: {e}")))?;
        Ok(out)
    }
}

/// Encode bytes as radix-85 text.
///
/// Each 4-byte group becomes five digits over `!`..`u`; an all-zero group
/// collapses to `z`. A trailing group of n bytes is zero-padded, encoded,
/// and truncated to n + 1 digits.
fn radix85_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 * 5 + 5);
    let mut iter = data.chunks_exact(4);
    for chunk in &mut iter {
        let v = u32::from(chunk[0]) << 24
            | u32::from(chunk[1]) << 16
            | u32::from(chunk[2]) << 8
            | u32::from(chunk[3]);
        if v == 0 {
            out.push(ZERO_GROUP);
        } else {
            push_group(&mut out, v, 5);
        }
    }
    let rem = iter.remainder();
    if !rem.is_empty() {
        let mut padded = [0u8; 4];
        padded[..rem.len()].copy_from_slice(rem);
        let v = u32::from(padded[0]) << 24
            | u32::from(padded[1]) << 16
            | u32::from(padded[2]) << 8
            | u32::from(padded[3]);
        push_group(&mut out, v, rem.len() + 1);
    }
    out
}

fn push_group(out: &mut Vec<u8>, value: u32, count: usize) {
    let mut v = value;
    let mut digits = [0u8; 5];
    for d in digits.iter_mut().rev() {
        *d = (v % 85) as u8 + DIGIT_LO;
        v /= 85;
    }
    out.extend_from_slice(&digits[..count]);
}

/// Decode radix-85 text back to bytes.
///
/// Accepts the `z` shorthand between groups. The input must contain only
/// digit characters and `z` (whitespace is the caller's problem).
fn radix85_decode(text: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() / 5 * 4 + 4);
    let mut group = [0u8; 5];
    let mut len = 0;

    for &b in text {
        if b == ZERO_GROUP {
            if len != 0 {
                return Err(CartonError::Decode(
                    "zero-group shorthand inside a digit group".into(),
                ));
            }
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        if !(DIGIT_LO..=DIGIT_HI).contains(&b) {
            return Err(CartonError::Decode(format!(
                "invalid radix-85 digit {:?}",
                b as char
            )));
        }
        group[len] = b - DIGIT_LO;
        len += 1;
        if len == 5 {
            let v = combine_group(&group)?;
            out.extend_from_slice(&v.to_be_bytes());
            len = 0;
        }
    }

    match len {
        0 => {}
        1 => {
            return Err(CartonError::Decode(
                "truncated radix-85 data: single trailing digit".into(),
            ))
        }
        n => {
            // Pad the final group with the maximum digit; the padding cannot
            // carry into the n - 1 bytes the encoder actually emitted.
            for d in group.iter_mut().skip(n) {
                *d = DIGIT_HI - DIGIT_LO;
            }
            let v = combine_group(&group)?;
            out.extend_from_slice(&v.to_be_bytes()[..n - 1]);
        }
    }
    Ok(out)
}

fn combine_group(digits: &[u8; 5]) -> Result<u32> {
    let mut v: u64 = 0;
    for &d in digits {
        v = v * 85 + u64::from(d);
    }
    u32::try_from(v).map_err(|_| CartonError::Decode("radix-85 group out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn radix85_known_vectors() {
        // 4-byte group, no shorthand
        assert_eq!(radix85_encode(b"easy"), b"ARTY*".to_vec());
        // all-zero group collapses
        assert_eq!(radix85_encode(&[0, 0, 0, 0]), b"z".to_vec());
        // partial groups emit n + 1 digits
        assert_eq!(radix85_encode(b"a").len(), 2);
        assert_eq!(radix85_encode(b"ab").len(), 3);
        assert_eq!(radix85_encode(b"abc").len(), 4);
        assert_eq!(radix85_encode(b"").len(), 0);
    }

    #[test]
    fn radix85_round_trip_partial_groups() {
        for len in 0..=9 {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let encoded = radix85_encode(&data);
            assert_eq!(radix85_decode(&encoded).unwrap(), data, "len {len}");
        }
    }

    #[test]
    fn radix85_accepts_zero_shorthand() {
        let decoded = radix85_decode(b"z").unwrap();
        assert_eq!(decoded, vec![0, 0, 0, 0]);
    }

    #[test]
    fn radix85_rejects_bad_input() {
        assert!(radix85_decode(b"w").is_err());
        assert!(radix85_decode(b"A").is_err()); // single trailing digit
        assert!(radix85_decode(b"uuuuu").is_err()); // group above u32::MAX
        assert!(radix85_decode(b"ABzCD").is_err()); // z inside a group
    }

    #[test]
    fn escape_rule_rejects_alphabet_collisions() {
        assert!(EscapeRule::new('"', 'u').is_err());
        assert!(EscapeRule::new('"', 'z').is_err());
        assert!(EscapeRule::new('"', '\n').is_err());
        assert!(EscapeRule::new('"', '"').is_err());
        assert!(EscapeRule::new('"', '~').is_ok());
        assert!(EscapeRule::new('`', '~').is_ok());
    }

    #[test]
    fn encode_never_emits_reserved_character() {
        let codec = Codec::default();
        // Dense enough that every digit value shows up in the encoding.
        let data: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
        let blob = codec.encode(&data).unwrap();
        assert!(!blob.contains('"'));
        assert_eq!(codec.decode(&blob).unwrap(), data);
    }

    #[test]
    fn encode_wraps_at_80_columns() {
        let codec = Codec::default();
        let blob = codec.encode(&[0xAB; 1024]).unwrap();
        assert!(blob.lines().all(|line| line.len() <= 80));
        assert!(blob.lines().count() > 1);
    }

    #[test]
    fn decode_ignores_whitespace_placement() {
        let codec = Codec::default();
        let blob = codec.encode(b"whitespace should not matter").unwrap();
        let mangled: String = blob
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .enumerate()
            .flat_map(|(i, c)| {
                if i % 7 == 0 {
                    vec!['\n', c, ' ']
                } else {
                    vec![c]
                }
            })
            .collect();
        assert_eq!(
            codec.decode(&mangled).unwrap(),
            b"whitespace should not matter"
        );
    }

    #[test]
    fn empty_input_round_trips() {
        let codec = Codec::default();
        let blob = codec.encode(b"").unwrap();
        assert_eq!(codec.decode(&blob).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn encode_is_deterministic() {
        let codec = Codec::default();
        let data = b"same bytes in, same blob out".repeat(64);
        assert_eq!(codec.encode(&data).unwrap(), codec.encode(&data).unwrap());
    }

    #[test]
    fn corrupted_blob_fails_to_decode() {
        let codec = Codec::default();
        let blob = codec.encode(b"some content worth protecting").unwrap();

        // Invalid digit: rejected by the radix-85 layer.
        let mut bad = blob.clone();
        bad.replace_range(4..5, "w");
        assert!(matches!(codec.decode(&bad), Err(CartonError::Decode(_))));

        // Valid digit, wrong value: rejected by the gzip layer.
        let target = blob
            .char_indices()
            .find(|(_, c)| !c.is_ascii_whitespace() && *c != '!')
            .map(|(i, _)| i)
            .unwrap();
        let mut flipped = blob.clone();
        flipped.replace_range(target..target + 1, "!");
        assert!(matches!(
            codec.decode(&flipped),
            Err(CartonError::Decode(_))
        ));
    }

    #[test]
    fn decode_interoperates_with_other_implementations() {
        // Blob produced by CPython: gzip level 9 (mtime 0) + base64.a85encode
        // + '"' -> '~' substitution + 80-column wrap, for the plaintext below.
        // Any conforming DEFLATE stream must decode, not just our own.
        let blob = "+,^C)z!X$Wi.nM>801[Ze9ZkT$/?)T>bH**@/P>++!(8ei+rL@\\!!";
        let codec = Codec::default();
        assert_eq!(
            codec.decode(blob).unwrap(),
            b"interoperability fixture\n".to_vec()
        );
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let codec = Codec::default();
            let blob = codec.encode(&data).unwrap();
            prop_assert_eq!(codec.decode(&blob).unwrap(), data);
        }
    }
}
