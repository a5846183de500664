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

mod config;

use std::path::PathBuf;

use cachette_crypto::chacha::{
    self,
    ChaCha,
    Dialect
};

use rpassword::prompt_password;
use secrecy::{ExposeSecret, SecretString};
use rand::RngCore;

use clap::{
    Arg,
    ArgAction,
    ArgMatches,
    Command,
    value_parser,
};

use config::Config;

const CACHETTE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
enum CachetteError {
    Io(std::io::Error),
    Cipher(chacha::Error),
    Hex(hex::FromHexError),
    Cli(&'static str),
    Config(&'static str),
    FileNotFound(PathBuf),
    FileAlreadyExists(PathBuf),
}

impl From<std::io::Error> for CachetteError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chacha::Error> for CachetteError {
    fn from(value: chacha::Error) -> Self {
        Self::Cipher(value)
    }
}

impl From<hex::FromHexError> for CachetteError {
    fn from(value: hex::FromHexError) -> Self {
        Self::Hex(value)
    }
}

impl std::fmt::Display for CachetteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Cipher(e) => write!(f, "{e}"),
            Self::Hex(e) => write!(f, "Invalid hexadecimal input ({e})."),
            Self::Cli(s) => write!(f, "{s}"),
            Self::Config(s) => write!(f, "Configuration: {s}."),
            Self::FileNotFound(p) => write!(f, "File \"{}\" not found.", p.display()),
            Self::FileAlreadyExists(p) => write!(
                f, "File \"{}\" already exists.", p.display()
            ),
        }
    }
}

type Result<T> = core::result::Result<T, CachetteError>;

fn key_arg() -> Arg {
    Arg::new("key")
        .help("Path to a file holding the key in hexadecimal (prompted if absent)")
        .long("key")
        .short('k')
        .value_parser(value_parser!(PathBuf))
}

fn nonce_arg() -> Arg {
    Arg::new("nonce")
        .help("Nonce in hexadecimal (12 bytes for IETF, 8 bytes for DJB)")
        .long("nonce")
        .short('n')
}

fn counter_arg() -> Arg {
    Arg::new("counter")
        .help("Initial block counter (default: 1 for IETF, 0 for DJB)")
        .long("counter")
        .short('c')
        .value_parser(value_parser!(u64))
}

fn dialect_arg() -> Arg {
    Arg::new("dialect")
        .help("Dialect: \"ietf\" (96-bit nonce, 32-bit counter) or \"djb\" (64-bit nonce, 64-bit counter)")
        .long("dialect")
        .short('d')
}

fn rounds_arg() -> Arg {
    Arg::new("rounds")
        .help("Number of rounds: 8, 12 or 20")
        .long("rounds")
        .short('r')
        .value_parser(value_parser!(usize))
}

fn output_arg() -> Arg {
    Arg::new("output")
        .help("Output file path")
        .long("output")
        .short('o')
        .value_parser(value_parser!(PathBuf))
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .value_parser(value_parser!(PathBuf))
        .required(true)
}

fn main() {
    let mut cmd = Command::new("cachette")
        .version(CACHETTE_VERSION)
        .about(format!(
            "Cachette: simple tool for ChaCha stream encryption (version {CACHETTE_VERSION})\n\
            Copyright (C) 2025 A. Russon"))
        .subcommand(
            Command::new("encrypt")
                .about("Encrypt a file (a fresh nonce is generated if none is given)")
                .arg(input_arg())
                .arg(output_arg())
                .arg(key_arg())
                .arg(nonce_arg())
                .arg(counter_arg())
                .arg(dialect_arg())
                .arg(rounds_arg())
        )
        .subcommand(
            Command::new("decrypt")
                .about("Decrypt a file")
                .arg(input_arg())
                .arg(output_arg())
                .arg(key_arg())
                .arg(nonce_arg().required(true))
                .arg(counter_arg())
                .arg(dialect_arg())
                .arg(rounds_arg())
        )
        .subcommand(
            Command::new("keystream")
                .about("Print keystream blocks for inspection")
                .arg(key_arg())
                .arg(nonce_arg().required(true))
                .arg(counter_arg())
                .arg(dialect_arg())
                .arg(rounds_arg())
                .arg(
                    Arg::new("blocks")
                        .help("Number of blocks to print (default: 1)")
                        .long("blocks")
                        .short('b')
                        .value_parser(value_parser!(u64))
                )
                .arg(
                    Arg::new("show state")
                        .help("Also print the initial 4x4 state matrix of each block")
                        .long("show-state")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("keygen")
                .about("Generate a random key and nonce")
                .arg(
                    Arg::new("short")
                        .help("Generate a 16-byte key instead of 32 bytes")
                        .long("short")
                        .action(ArgAction::SetTrue)
                )
                .arg(dialect_arg())
                .arg(output_arg())
        );

    let help = cmd.render_long_help();
    let mut matches = cmd.get_matches();

    // read configuration file
    let config = match Config::load_config_file() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("[!] {err} (using default parameters)");
            Config::new()
        }
    };

    if let Some((cmd_name, mut matches)) = matches.remove_subcommand() {
        let res = if cmd_name.eq("encrypt") || cmd_name.eq("decrypt") {
            run_cipher(&mut matches, &config)
        }
        else if cmd_name.eq("keystream") {
            print_keystream(&mut matches, &config)
        }
        else {
            // only "keygen" remains
            keygen(&matches, &config)
        };

        if let Err(err) = res {
            eprintln!("[!] {err}");
        }
    }
    else {
        eprintln!("{}", &help.ansi());
    }
}

fn get_dialect(matches: &ArgMatches, config: &Config) -> Result<Dialect> {
    match matches.get_one::<String>("dialect") {
        Some(name) => config::parse_dialect(name)
            .ok_or(CachetteError::Cli("unknown dialect (\"ietf\" or \"djb\" expected)")),
        None => Ok(config.dialect())
    }
}

fn get_rounds(matches: &ArgMatches, config: &Config) -> Result<usize> {
    match matches.get_one::<usize>("rounds") {
        Some(rounds) if config::SUPPORTED_ROUNDS.contains(rounds) => Ok(*rounds),
        Some(_) => Err(CachetteError::Cli("bad number of rounds (8, 12 or 20 expected)")),
        None => Ok(config.rounds())
    }
}

fn get_key(matches: &mut ArgMatches) -> Result<Vec<u8>> {
    let key_hex = match matches.remove_one::<PathBuf>("key") {
        Some(path) => {
            if !path.is_file() {
                return Err(CachetteError::FileNotFound(path));
            }
            SecretString::from(std::fs::read_to_string(&path)?)
        },
        None => SecretString::from(prompt_password("Key (hex): ")?)
    };
    Ok(hex::decode(key_hex.expose_secret().trim())?)
}

fn get_counter(matches: &mut ArgMatches, dialect: Dialect) -> u64 {
    matches.remove_one::<u64>("counter")
        .unwrap_or_else(|| dialect.initial_counter())
}

// encryption and decryption are the same keystream XOR
fn run_cipher(matches: &mut ArgMatches, config: &Config) -> Result<()> {
    let dialect = get_dialect(matches, config)?;
    let rounds = get_rounds(matches, config)?;

    // get input path (required argument)
    let input = matches.remove_one::<PathBuf>("input").unwrap();
    if !input.is_file() {
        return Err(CachetteError::FileNotFound(input));
    }

    let output = match matches.remove_one::<PathBuf>("output") {
        Some(output) => output,
        None => {
            let mut output_default = input.clone().into_os_string();
            output_default.push(".cct");
            PathBuf::from(output_default)
        }
    };
    if output.exists() {
        return Err(CachetteError::FileAlreadyExists(output));
    }

    // "nonce" is required for decrypt; a missing one on encrypt gets a
    // fresh random value that is echoed for the peer
    let nonce = match matches.remove_one::<String>("nonce") {
        Some(nonce_hex) => hex::decode(nonce_hex)?,
        None => {
            let mut nonce = vec![0u8; dialect.nonce_length()];
            rand::rng().fill_bytes(&mut nonce);
            println!("Nonce: {}", hex::encode(&nonce));
            nonce
        }
    };

    let counter = get_counter(matches, dialect);
    let key = get_key(matches)?;
    let cipher = ChaCha::new(&key, &nonce, dialect, rounds)?;

    let mut data = std::fs::read(&input)?;
    cipher.apply_keystream_in_place(counter, &mut data)?;
    std::fs::write(&output, &data)?;
    Ok(())
}

fn print_keystream(matches: &mut ArgMatches, config: &Config) -> Result<()> {
    let dialect = get_dialect(matches, config)?;
    let rounds = get_rounds(matches, config)?;

    // "nonce" is a required argument
    let nonce = hex::decode(matches.remove_one::<String>("nonce").unwrap())?;
    let start = get_counter(matches, dialect);
    let blocks = matches.remove_one::<u64>("blocks").unwrap_or(1);
    let show_state = matches.get_flag("show state");

    let key = get_key(matches)?;
    let cipher = ChaCha::new(&key, &nonce, dialect, rounds)?;

    for offset in 0..blocks {
        let counter = start.checked_add(offset)
            .ok_or(CachetteError::Cipher(chacha::Error::CounterOverflow))?;
        if show_state {
            println!("Block {counter} initial state:");
            print_state(&cipher.initial_state(counter)?);
        }
        println!("Block {counter}: {}", hex::encode(cipher.keystream_block(counter)?));
    }
    Ok(())
}

// words shown most-significant byte first, the usual display convention
fn print_state(state: &[u32; 16]) {
    for row in state.chunks_exact(4) {
        println!(
            "  {} {} {} {}",
            hex::encode(row[0].to_be_bytes()),
            hex::encode(row[1].to_be_bytes()),
            hex::encode(row[2].to_be_bytes()),
            hex::encode(row[3].to_be_bytes())
        );
    }
}

fn keygen(matches: &ArgMatches, config: &Config) -> Result<()> {
    let dialect = get_dialect(matches, config)?;
    let key_length = match matches.get_flag("short") {
        true => ChaCha::SHORT_KEY_LENGTH,
        false => ChaCha::KEY_LENGTH
    };

    let mut key = vec![0u8; key_length];
    rand::rng().fill_bytes(&mut key);
    let mut nonce = vec![0u8; dialect.nonce_length()];
    rand::rng().fill_bytes(&mut nonce);

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            if path.exists() {
                return Err(CachetteError::FileAlreadyExists(path.clone()));
            }
            std::fs::write(path, format!("{}\n", hex::encode(&key)))?;
            println!("Key written to \"{}\".", path.display());
        },
        None => println!("Key: {}", hex::encode(&key))
    }
    println!("Nonce: {}", hex::encode(&nonce));
    Ok(())
}
