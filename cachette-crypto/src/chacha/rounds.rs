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

use zeroize::Zeroize;

use super::ChaCha;
use super::trace::Trace;

const COLUMNS: [[usize; 4]; 4] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15]
];

const DIAGONALS: [[usize; 4]; 4] = [
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14]
];

/// One ARX quarterround applied in place to four state words.
/// The rotation amounts 16, 12, 8, 7 are fixed by the cipher definition.
pub(crate) fn quarter_round(state: &mut [u32; 16], [i, j, k, l]: [usize; 4]) {
    state[i] = state[i].wrapping_add(state[j]);
    state[l] ^= state[i];
    state[l] = state[l].rotate_left(16);

    state[k] = state[k].wrapping_add(state[l]);
    state[j] ^= state[k];
    state[j] = state[j].rotate_left(12);

    state[i] = state[i].wrapping_add(state[j]);
    state[l] ^= state[i];
    state[l] = state[l].rotate_left(8);

    state[k] = state[k].wrapping_add(state[l]);
    state[j] ^= state[k];
    state[j] = state[j].rotate_left(7);
}

/// Hashes one block state into 64 keystream bytes: `rounds / 2` pairs of
/// column and diagonal rounds, feed-forward addition of the initial state,
/// then little-endian word serialization. The input state is left intact.
pub(crate) fn hash(
    initial: &[u32; 16],
    rounds: usize,
    counter: u64,
    trace: &mut dyn Trace
) -> [u8; ChaCha::BLOCK_SIZE] {
    let mut state = *initial;

    for double_round in 0..rounds / 2 {
        for quad in COLUMNS {
            quarter_round(&mut state, quad);
            trace.quarter_round(quad, &state);
        }
        trace.round(2 * double_round + 1, &state);
        for quad in DIAGONALS {
            quarter_round(&mut state, quad);
            trace.quarter_round(quad, &state);
        }
        trace.round(2 * double_round + 2, &state);
    }

    // feed-forward keeps the round function one-way
    let mut mixed = state;
    for (word, &init) in state.iter_mut().zip(initial.iter()) {
        *word = word.wrapping_add(init);
    }

    let mut block = [0u8; ChaCha::BLOCK_SIZE];
    for (chunk, word) in block.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    trace.block(counter, initial, &mixed, &block);

    mixed.zeroize();
    state.zeroize();
    block
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use crate::chacha::NullTrace;
    use super::{
        hash,
        quarter_round
    };

    #[test]
    fn test_quarter_round() {
        // source: https://datatracker.ietf.org/doc/html/rfc7539#section-2.1.1
        let mut state = [0u32; 16];
        state[0] = 0x11111111;
        state[1] = 0x01020304;
        state[2] = 0x9b8d6f43;
        state[3] = 0x01234567;

        quarter_round(&mut state, [0, 1, 2, 3]);

        assert_eq!(state[0], 0xea2a92f4);
        assert_eq!(state[1], 0xcb1cf8ce);
        assert_eq!(state[2], 0x4581472e);
        assert_eq!(state[3], 0x5881c4bb);
    }

    #[test]
    fn test_block_function() {
        // source: https://datatracker.ietf.org/doc/html/rfc7539#section-2.3.2
        let initial: [u32; 16] = [
            0x61707865, 0x3320646e, 0x79622d32, 0x6b206574,
            0x03020100, 0x07060504, 0x0b0a0908, 0x0f0e0d0c,
            0x13121110, 0x17161514, 0x1b1a1918, 0x1f1e1d1c,
            0x00000001, 0x09000000, 0x4a000000, 0x00000000
        ];
        let expected: [u8; 64] = hex!(
            "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e"
            "d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e"
        );

        let block = hash(&initial, 20, 1, &mut NullTrace);
        assert_eq!(block, expected);
    }

    #[test]
    fn test_input_state_untouched() {
        let initial: [u32; 16] = core::array::from_fn(|i| i as u32);
        let copy = initial;

        let block = hash(&initial, 20, 0, &mut NullTrace);
        assert_eq!(initial, copy);

        // with no rounds only the doubled state comes back
        let doubled = hash(&initial, 0, 0, &mut NullTrace);
        assert_ne!(block, doubled);
        for (chunk, word) in doubled.chunks_exact(4).zip(initial.iter()) {
            assert_eq!(chunk, word.wrapping_add(*word).to_le_bytes().as_slice());
        }
    }
}
