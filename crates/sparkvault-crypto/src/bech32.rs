//! Bech32 (BIP173) and Bech32m (BIP350) checksum codec.
//!
//! Both variants share the same BCH code over GF(32) and differ only in
//! the constant XORed into the final polymod value. Strings are
//! `hrp || '1' || data || checksum`, where `data` and the six-symbol
//! checksum are drawn from a 32-character alphabet.
//!
//! This module works on 5-bit symbols. Byte payloads are regrouped with
//! [`convert_bits`]; segwit and Spark address rules live in
//! [`crate::address`].

use sparkvault_types::{Result, WalletError};

/// The 32-symbol data alphabet.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// BCH generator coefficients.
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Maximum total string length accepted by [`decode`].
pub const MAX_LEN: usize = 90;

/// Number of checksum symbols.
const CHECKSUM_LEN: usize = 6;

/// Checksum variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Variant {
    /// BIP173 Bech32 (final constant 1).
    Bech32,
    /// BIP350 Bech32m (final constant 0x2bc830a3).
    Bech32m,
}

impl Variant {
    fn constant(self) -> u32 {
        match self {
            Self::Bech32 => 1,
            Self::Bech32m => 0x2bc8_30a3,
        }
    }

    fn from_constant(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Bech32),
            0x2bc8_30a3 => Some(Self::Bech32m),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Checksum core
// ---------------------------------------------------------------------------

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// High bits of each HRP char, a zero separator, then the low bits.
fn hrp_expand(hrp: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(hrp.len() * 2 + 1);
    out.extend(hrp.iter().map(|c| c >> 5));
    out.push(0);
    out.extend(hrp.iter().map(|c| c & 0x1f));
    out
}

fn create_checksum(hrp: &[u8], data: &[u8], variant: Variant) -> [u8; CHECKSUM_LEN] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let pm = polymod(values) ^ variant.constant();

    let mut out = [0u8; CHECKSUM_LEN];
    for (i, symbol) in out.iter_mut().enumerate() {
        *symbol = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

// ---------------------------------------------------------------------------
// Encode / Decode
// ---------------------------------------------------------------------------

/// Encodes `hrp` and 5-bit `data` symbols with the given checksum variant.
///
/// The HRP is lowercased; output is always lowercase.
///
/// # Errors
///
/// Returns [`WalletError::Bech32ChecksumError`] if the HRP is empty or
/// contains characters outside 33..=126, a data value exceeds 31, or
/// the result would exceed [`MAX_LEN`].
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
    let hrp = hrp.to_ascii_lowercase();
    check_hrp(hrp.as_bytes())?;

    if let Some(bad) = data.iter().find(|&&v| v > 31) {
        return Err(WalletError::Bech32ChecksumError {
            reason: format!("data value {bad} is not a 5-bit symbol"),
        });
    }

    let total = hrp.len() + 1 + data.len() + CHECKSUM_LEN;
    if total > MAX_LEN {
        return Err(WalletError::Bech32ChecksumError {
            reason: format!("encoded length {total} exceeds {MAX_LEN}"),
        });
    }

    let checksum = create_checksum(hrp.as_bytes(), data, variant);
    let mut out = String::with_capacity(total);
    out.push_str(&hrp);
    out.push('1');
    for &v in data.iter().chain(checksum.iter()) {
        out.push(char::from(CHARSET[usize::from(v)]));
    }
    Ok(out)
}

/// Decodes a Bech32 or Bech32m string into `(hrp, data, variant)`.
///
/// The returned HRP is lowercase and `data` excludes the checksum.
///
/// # Errors
///
/// Returns [`WalletError::Bech32ChecksumError`] for mixed case, a
/// missing separator, HRP characters outside 33..=126, data characters
/// outside the alphabet, strings longer than [`MAX_LEN`], or a checksum
/// matching neither variant.
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant)> {
    if s.len() > MAX_LEN {
        return Err(WalletError::Bech32ChecksumError {
            reason: format!("string length {} exceeds {MAX_LEN}", s.len()),
        });
    }

    let bytes = s.as_bytes();
    let has_lower = bytes.iter().any(u8::is_ascii_lowercase);
    let has_upper = bytes.iter().any(u8::is_ascii_uppercase);
    if has_lower && has_upper {
        return Err(WalletError::Bech32ChecksumError {
            reason: "mixed-case string".into(),
        });
    }

    let lower = s.to_ascii_lowercase();
    let sep = lower.rfind('1').ok_or_else(|| WalletError::Bech32ChecksumError {
        reason: "missing separator '1'".into(),
    })?;

    let (hrp, rest) = lower.split_at(sep);
    let data_part = &rest.as_bytes()[1..];
    check_hrp(hrp.as_bytes())?;

    if data_part.len() < CHECKSUM_LEN {
        return Err(WalletError::Bech32ChecksumError {
            reason: "data part shorter than checksum".into(),
        });
    }

    let mut data = Vec::with_capacity(data_part.len());
    for &c in data_part {
        let value = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| WalletError::Bech32ChecksumError {
                reason: format!("invalid data character '{}'", char::from(c)),
            })?;
        data.push(value as u8);
    }

    let mut values = hrp_expand(hrp.as_bytes());
    values.extend_from_slice(&data);
    let variant = Variant::from_constant(polymod(values)).ok_or_else(|| {
        WalletError::Bech32ChecksumError {
            reason: "checksum mismatch".into(),
        }
    })?;

    data.truncate(data.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), data, variant))
}

fn check_hrp(hrp: &[u8]) -> Result<()> {
    if hrp.is_empty() {
        return Err(WalletError::Bech32ChecksumError {
            reason: "empty human-readable part".into(),
        });
    }
    if let Some(&bad) = hrp.iter().find(|c| !(33..=126).contains(*c)) {
        return Err(WalletError::Bech32ChecksumError {
            reason: format!("invalid human-readable part character 0x{bad:02x}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bit regrouping
// ---------------------------------------------------------------------------

/// Regroups a sequence of `from`-bit values into `to`-bit values.
///
/// With `pad`, trailing bits are zero-padded into a final group. Without
/// it, leftover bits must be fewer than `from` and all zero.
///
/// # Errors
///
/// Returns [`WalletError::InvalidAddress`] when an input value does not
/// fit in `from` bits or non-zero padding is left over.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_out: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return Err(WalletError::InvalidAddress {
                reason: format!("value {v} does not fit in {from} bits"),
            });
        }
        acc = ((acc << from) | v) & 0x00ff_ffff;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_out) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_out) as u8);
        }
    } else if bits >= from || (acc << (to - bits)) & max_out != 0 {
        return Err(WalletError::InvalidAddress {
            reason: "invalid padding in bit conversion".into(),
        });
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
