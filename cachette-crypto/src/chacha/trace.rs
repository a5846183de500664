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

use super::ChaCha;

/// Observation hooks into the block computation, for callers that want to
/// replay intermediate states (debuggers, teaching front-ends). Every
/// method defaults to a no-op and tracing never changes cipher output.
pub trait Trace {
    /// Called after each quarterround with the four indices it touched.
    fn quarter_round(&mut self, _indices: [usize; 4], _state: &[u32; 16]) {}

    /// Called after each column or diagonal round; `n` counts from 1 up
    /// to the configured number of rounds.
    fn round(&mut self, _n: usize, _state: &[u32; 16]) {}

    /// Called once per block with the initial state, the state after all
    /// rounds (before feed-forward), and the serialized keystream.
    fn block(
        &mut self,
        _counter: u64,
        _initial: &[u32; 16],
        _mixed: &[u32; 16],
        _keystream: &[u8; ChaCha::BLOCK_SIZE]
    ) {
    }
}

/// Sink used by the untraced paths.
pub struct NullTrace;

impl Trace for NullTrace {}
