// Cachette, a simple tool for ChaCha stream encryption
// Copyright (C) 2025 A. Russon
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::{
    ChaCha,
    Dialect,
    Error,
    Result
};

// constant row "expand 32-byte k" as little-endian words
const SIGMA: [u32; 4] = [0x61707865, 0x3320646e, 0x79622d32, 0x6b206574];

// constant row "expand 16-byte k" for the short key
const TAU: [u32; 4] = [0x61707865, 0x3120646e, 0x79622d36, 0x6b206574];

/// Lays out the 4x4 template state: constants, key words, zeroed counter
/// words, then nonce words. A 16-byte key fills its two rows twice.
pub(crate) fn build_state(key: &[u8], nonce: &[u8], dialect: Dialect) -> Result<[u32; 16]> {
    let constants = match key.len() {
        ChaCha::KEY_LENGTH => &SIGMA,
        ChaCha::SHORT_KEY_LENGTH => &TAU,
        len => return Err(Error::InvalidKeyLength(len)),
    };
    if nonce.len() != dialect.nonce_length() {
        return Err(Error::InvalidNonceLength(nonce.len()));
    }

    let mut state = [0u32; 16];
    state[..4].copy_from_slice(constants);
    for (word, chunk) in state[4..12].iter_mut().zip(key.chunks_exact(4).cycle()) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    let nonce_row = 12 + dialect.counter_words();
    for (word, chunk) in state[nonce_row..].iter_mut().zip(nonce.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    Ok(state)
}

/// Writes the counter into an owned block state, split into one or two
/// little-endian words. Template states are cloned first, never aliased.
pub(crate) fn set_counter(state: &mut [u32; 16], counter: u64, dialect: Dialect) -> Result<()> {
    if counter > dialect.max_counter() {
        return Err(Error::CounterOverflow);
    }
    state[12] = counter as u32;
    if dialect.counter_words() == 2 {
        state[13] = (counter >> 32) as u32;
    }
    Ok(())
}
