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

/// The two published layouts of the last state row.
///
/// The counter and the nonce share the last four state words (128 bits):
/// the IETF variant (RFC 7539) spends one word on the counter and three on
/// the nonce, the original DJB variant spends two on each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Ietf,
    Djb,
}

impl Dialect {
    pub const fn counter_bits(self) -> u32 {
        match self {
            Self::Ietf => 32,
            Self::Djb => 64,
        }
    }

    pub const fn counter_words(self) -> usize {
        match self {
            Self::Ietf => 1,
            Self::Djb => 2,
        }
    }

    /// Nonce length in bytes (12 for IETF, 8 for DJB).
    pub const fn nonce_length(self) -> usize {
        match self {
            Self::Ietf => 12,
            Self::Djb => 8,
        }
    }

    /// Counter value of the first keystream block in the reference
    /// documents (RFC 7539 starts encryption at 1, DJB at 0).
    pub const fn initial_counter(self) -> u64 {
        match self {
            Self::Ietf => 1,
            Self::Djb => 0,
        }
    }

    /// Largest counter value that fits the dialect's counter width.
    pub const fn max_counter(self) -> u64 {
        match self {
            Self::Ietf => u32::MAX as u64,
            Self::Djb => u64::MAX,
        }
    }
}
