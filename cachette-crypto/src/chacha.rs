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

mod dialect;
mod rounds;
mod state;
mod trace;

use zeroize::Zeroize;

pub use dialect::Dialect;
pub use trace::{
    NullTrace,
    Trace
};

use rounds::hash;
use state::{
    build_state,
    set_counter
};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidKeyLength(usize),
    InvalidNonceLength(usize),
    InvalidRounds(usize),
    CounterOverflow,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeyLength(len) => write!(
                f, "ChaCha: invalid key length {len} (16 or 32 bytes expected)."
            ),
            Self::InvalidNonceLength(len) => write!(
                f, "ChaCha: invalid nonce length {len} for the selected dialect."
            ),
            Self::InvalidRounds(rounds) => write!(
                f, "ChaCha: invalid number of rounds {rounds} (positive even number expected)."
            ),
            Self::CounterOverflow => write!(
                f, "ChaCha: block counter exceeds the dialect's counter width."
            ),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

/// A configured cipher instance: template state, dialect and round count.
///
/// The template is built once from key and nonce with the counter words
/// zeroed; every block clones it, writes its own counter and hashes the
/// copy. Nothing is mutated between calls, so one instance can be shared
/// across threads and blocks can be computed in any order.
#[derive(Debug)]
pub struct ChaCha {
    template: [u32; 16],
    dialect: Dialect,
    rounds: usize,
}

impl ChaCha {
    pub const BLOCK_SIZE: usize = 64;
    pub const KEY_LENGTH: usize = 32;
    pub const SHORT_KEY_LENGTH: usize = 16;
    pub const DEFAULT_ROUNDS: usize = 20;

    /// Validates key length (16 or 32 bytes), nonce length (dialect
    /// dependent) and rounds (positive even number), then builds the
    /// template state.
    pub fn new(key: &[u8], nonce: &[u8], dialect: Dialect, rounds: usize) -> Result<Self> {
        if rounds == 0 || rounds % 2 != 0 {
            return Err(Error::InvalidRounds(rounds));
        }
        Ok(Self {
            template: build_state(key, nonce, dialect)?,
            dialect,
            rounds,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The state matrix a block starts from: the template with `counter`
    /// written into the counter words.
    pub fn initial_state(&self, counter: u64) -> Result<[u32; 16]> {
        let mut state = self.template;
        set_counter(&mut state, counter, self.dialect)?;
        Ok(state)
    }

    /// One 64-byte keystream block for the given counter value.
    pub fn keystream_block(&self, counter: u64) -> Result<[u8; Self::BLOCK_SIZE]> {
        let mut state = self.initial_state(counter)?;
        let block = hash(&state, self.rounds, counter, &mut NullTrace);
        state.zeroize();
        Ok(block)
    }

    /// XORs the keystream starting at block `counter` into `data` and
    /// returns the result. Encryption and decryption are the same
    /// operation.
    pub fn apply_keystream(&self, counter: u64, data: &[u8]) -> Result<Vec<u8>> {
        self.apply_keystream_traced(counter, data, &mut NullTrace)
    }

    /// Same as [`apply_keystream`](Self::apply_keystream) with observation
    /// hooks invoked for every block.
    pub fn apply_keystream_traced(
        &self,
        counter: u64,
        data: &[u8],
        trace: &mut dyn Trace
    ) -> Result<Vec<u8>> {
        self.check_span(counter, data.len())?;
        let mut out = vec![0u8; data.len()];
        for (offset, (cchunk, pchunk)) in out.chunks_mut(Self::BLOCK_SIZE)
            .zip(data.chunks(Self::BLOCK_SIZE))
            .enumerate()
        {
            let block_counter = counter + offset as u64;
            let mut state = self.initial_state(block_counter)?;
            let mut block = hash(&state, self.rounds, block_counter, trace);
            xor(cchunk, &block, pchunk);
            state.zeroize();
            block.zeroize();
        }
        Ok(out)
    }

    /// In-place variant of [`apply_keystream`](Self::apply_keystream).
    pub fn apply_keystream_in_place(&self, counter: u64, data: &mut [u8]) -> Result<()> {
        self.check_span(counter, data.len())?;
        for (offset, chunk) in data.chunks_mut(Self::BLOCK_SIZE).enumerate() {
            let block_counter = counter + offset as u64;
            let mut state = self.initial_state(block_counter)?;
            let mut block = hash(&state, self.rounds, block_counter, &mut NullTrace);
            xor_in_place(chunk, &block);
            state.zeroize();
            block.zeroize();
        }
        Ok(())
    }

    // rejects the whole span before any keystream byte is produced
    fn check_span(&self, counter: u64, length: usize) -> Result<()> {
        if counter > self.dialect.max_counter() {
            return Err(Error::CounterOverflow);
        }
        let blocks = length.div_ceil(Self::BLOCK_SIZE) as u64;
        if blocks == 0 {
            return Ok(());
        }
        let last = counter.checked_add(blocks - 1).ok_or(Error::CounterOverflow)?;
        if last > self.dialect.max_counter() {
            return Err(Error::CounterOverflow);
        }
        Ok(())
    }
}

fn xor(res: &mut [u8], buf1: &[u8], buf2: &[u8]) {
    for (r, (&a, &b)) in res.iter_mut().zip(buf1.iter().zip(buf2.iter())) {
        *r = a ^ b;
    }
}

fn xor_in_place(out: &mut [u8], buf: &[u8]) {
    for (a, &b) in out.iter_mut().zip(buf.iter()) {
        *a ^= b;
    }
}

impl Drop for ChaCha {
    fn drop(&mut self) {
        self.template.zeroize();
    }
}
