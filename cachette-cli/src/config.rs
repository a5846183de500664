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

use std::fs::File;
use std::io::{BufRead, BufReader};

use cachette_crypto::chacha::{ChaCha, Dialect};

use crate::{CachetteError, Result};

#[cfg(target_family="unix")]
const CONFIGURATION_FILE: &str = ".cachette/cachette.conf";
#[cfg(target_family="windows")]
const CONFIGURATION_FILE: &str = "Documents/cachette/cachette.conf";

pub(crate) const SUPPORTED_ROUNDS: [usize; 3] = [8, 12, 20];

pub(crate) fn parse_dialect(name: &str) -> Option<Dialect> {
    match name.to_ascii_lowercase().as_str() {
        "ietf" => Some(Dialect::Ietf),
        "djb" => Some(Dialect::Djb),
        _ => None
    }
}

pub(crate) struct Config {
    dialect: Dialect,
    rounds: usize,
}

impl Config {
    const DIALECT: &str = "dialect";
    const ROUNDS: &str = "rounds";

    #[allow(clippy::new_without_default)]
    pub(crate) fn new() -> Self {
        Self {
            dialect: Dialect::Ietf,
            rounds: ChaCha::DEFAULT_ROUNDS,
        }
    }

    pub(crate) fn load_config_file() -> Result<Self> {
        let mut config = Self::new();
        let Some(home_path) = dirs::home_dir() else {
            return Ok(config);
        };
        if let Ok(file) = File::open(home_path.join(CONFIGURATION_FILE)) {
            let lines = BufReader::new(file).lines();
            for line in lines {
                let line = line?;
                config.parse_config_line(&line)?;
            }
        }
        Ok(config)
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub(crate) fn rounds(&self) -> usize {
        self.rounds
    }

    fn parse_config_line(&mut self, line: &str) -> Result<()> {
        // comment or blank line
        if line.trim().is_empty() || line.trim_start().starts_with("#") {
            return Ok(())
        }

        // key = value
        let split = line.splitn(2, "=").collect::<Vec<&str>>();
        if split.len() != 2 {
            return Err(CachetteError::Config("bad configuration line"));
        }

        let key = split[0].trim();
        let value = split[1].trim().trim_matches('"');
        if key == Self::DIALECT {
            match parse_dialect(value) {
                Some(dialect) => self.dialect = dialect,
                None => return Err(
                    CachetteError::Config("unknown dialect (\"ietf\" or \"djb\" expected)")
                )
            }
        }
        else if key == Self::ROUNDS {
            match value.parse::<usize>() {
                Ok(rounds) if SUPPORTED_ROUNDS.contains(&rounds) => self.rounds = rounds,
                _ => return Err(
                    CachetteError::Config("bad number of rounds (8, 12 or 20 expected)")
                )
            }
        }
        else {
            return Err(CachetteError::Config("unknown configuration key"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cachette_crypto::chacha::Dialect;
    use super::Config;

    #[test]
    fn test_parse_config_lines() {
        let mut config = Config::new();
        assert_eq!(config.dialect(), Dialect::Ietf);
        assert_eq!(config.rounds(), 20);

        config.parse_config_line("# a comment").unwrap();
        config.parse_config_line("").unwrap();
        config.parse_config_line("dialect = \"djb\"").unwrap();
        config.parse_config_line("rounds = 12").unwrap();
        assert_eq!(config.dialect(), Dialect::Djb);
        assert_eq!(config.rounds(), 12);

        assert!(config.parse_config_line("rounds = 10").is_err());
        assert!(config.parse_config_line("dialect = rfc").is_err());
        assert!(config.parse_config_line("colour = blue").is_err());
        assert!(config.parse_config_line("no equal sign").is_err());

        // failed lines leave the previous values in place
        assert_eq!(config.dialect(), Dialect::Djb);
        assert_eq!(config.rounds(), 12);
    }
}
