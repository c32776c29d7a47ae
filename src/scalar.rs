// Copyright 2023-2024, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE

//! The scalar codec (spec Component C): pure functions packing and
//! unpacking the handful of scalar types a single [`Value`](crate::Value)
//! slot can hold into a 32-byte word.
//!
//! These are plain encode/decode pairs over [`B256`], independent of any
//! [`Host`](crate::host::Host) — the word has already been read or is about
//! to be written by the caller.

use alloy_primitives::{Address, FixedBytes, B256, I256, U256};

/// Decodes a boolean: any non-zero word is `true`.
///
/// The original source's `SetBool` inverts this (`true` writes the zero
/// word) — a confirmed bug, not an intentional convention (see
/// `SPEC_FULL.md` §10.6). This crate fixes it: `true` encodes to a non-zero
/// word, per the spec's preferred resolution.
pub fn decode_bool(word: B256) -> bool {
    word != B256::ZERO
}

/// Encodes a boolean as the word `0x00..01` for `true`, the zero word for
/// `false`.
pub fn encode_bool(value: bool) -> B256 {
    if value {
        let mut word = [0u8; 32];
        word[31] = 1;
        B256::from(word)
    } else {
        B256::ZERO
    }
}

/// Decodes a right-aligned 20-byte address; the upper 12 bytes are ignored.
pub fn decode_address(word: B256) -> Address {
    Address::from_slice(&word[12..])
}

/// Encodes an address right-aligned in the word, zeroing the upper 12
/// bytes.
pub fn encode_address(value: Address) -> B256 {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(value.as_slice());
    B256::from(word)
}

/// Decodes a 256-bit unsigned integer: the word interpreted directly as
/// big-endian.
pub fn decode_big_uint(word: B256) -> U256 {
    U256::from_be_bytes(word.0)
}

/// Encodes a 256-bit unsigned integer as a big-endian word.
pub fn encode_big_uint(value: U256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// Decodes a 256-bit signed two's-complement integer.
pub fn decode_big_int(word: B256) -> I256 {
    I256::from_be_bytes(word.0)
}

/// Encodes a 256-bit signed integer as a two's-complement big-endian word.
pub fn encode_big_int(value: I256) -> B256 {
    B256::from(value.to_be_bytes::<32>())
}

/// Decodes the low 8 bytes of a word as an unsigned 64-bit integer.
pub fn decode_u64(word: B256) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    u64::from_be_bytes(buf)
}

/// Encodes an unsigned 64-bit integer right-aligned in the word.
pub fn encode_u64(value: u64) -> B256 {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    B256::from(word)
}

/// Decodes the low 8 bytes of a word as a signed 64-bit integer,
/// sign-extending from the 64-bit width (not the 256-bit word width).
pub fn decode_i64(word: B256) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    i64::from_be_bytes(buf)
}

/// Encodes a signed 64-bit integer as a two's-complement word, sign-extended
/// from 64 bits up to the full 256-bit width.
pub fn encode_i64(value: i64) -> B256 {
    let word: [u8; 32] = encode_signed_be(&value.to_be_bytes(), 32)
        .try_into()
        .expect("encode_signed_be(_, 32) always returns 32 bytes");
    B256::from(word)
}

/// Decodes a left-aligned, pad-right fixed-size byte string of width `N`
/// from the word (§4.3's "bytesN" convention for whole-slot scalars).
pub fn decode_fixed_bytes<const N: usize>(word: B256) -> FixedBytes<N> {
    FixedBytes::from_slice(&word[..N])
}

/// Encodes a fixed-size byte string left-aligned in the word, padding the
/// remainder on the right with zero.
pub fn encode_fixed_bytes<const N: usize>(value: FixedBytes<N>) -> B256 {
    let mut word = [0u8; 32];
    word[..N].copy_from_slice(value.as_slice());
    B256::from(word)
}

/// Sign-extends a big-endian two's-complement byte slice of its own true
/// width up to a full 32-byte word.
///
/// This replaces the original source's `decode_int`, whose sign-extension
/// loop was dead code (it iterated `for i := len(data); i < size` where
/// `data` is always already `size` bytes long, so the loop body never ran
/// — see `SPEC_FULL.md` §10.6). The correct operation: if the slice's top
/// bit is set, the value is negative, and every byte above the slice's
/// width must read as `0xFF` rather than `0x00`.
pub fn sign_extend_be(data: &[u8]) -> [u8; 32] {
    let negative = !data.is_empty() && (data[0] & 0x80 != 0);
    let mut word = [if negative { 0xFF } else { 0x00 }; 32];
    word[32 - data.len()..].copy_from_slice(data);
    word
}

/// Encodes a signed value already in big-endian two's-complement form,
/// re-deriving the high-order fill byte from the true sign rather than
/// trusting the caller's buffer width, then truncates/extends to `size`
/// bytes (mirrors `codec.go`'s `EncodeInt`, used by [`Record`](crate::Record)
/// fields).
pub fn encode_signed_be(data: &[u8], size: usize) -> Vec<u8> {
    let negative = !data.is_empty() && (data[0] & 0x80 != 0);
    let mut buf = vec![if negative { 0xFF } else { 0x00 }; size];
    let copy_len = data.len().min(size);
    buf[size - copy_len..].copy_from_slice(&data[data.len() - copy_len..]);
    buf
}
