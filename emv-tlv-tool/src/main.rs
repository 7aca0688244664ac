//! emv-tlv: decode EMV TLV payloads to JSON and encode JSON back to TLV
//!
//! ```text
//! emv-tlv decode 6F025A01FF
//! echo '{"5A":{"value":"ff"}}' | emv-tlv encode -
//! ```
//!
//! Logging goes to stderr; `RUST_LOG` or `-v`/`-vv` select the level.

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use emv_tlv::{Codec, Tree, Value};
use log::{LevelFilter, debug};

/// EMV BER-TLV decoder and encoder
#[derive(Parser, Debug)]
#[command(name = "emv-tlv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decode EMV TLV payloads to JSON and back", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a hex payload into a JSON tree
    Decode {
        /// Hex payload, or `-` to read it from stdin
        payload: String,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,

        /// Leave tag names empty
        #[arg(long)]
        no_names: bool,
    },
    /// Encode a JSON tree or node into a hex payload
    Encode {
        /// JSON document, or `-` to read it from stdin
        structure: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let codec = Codec::new();
    let output = match cli.command {
        Command::Decode {
            payload,
            compact,
            no_names,
        } => decode(&codec, &read_input(payload)?, compact, no_names)?,
        Command::Encode { structure } => encode(&codec, &read_input(structure)?)?,
    };

    println!("{}", output);
    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if verbose == 0 {
        builder.parse_default_env();
    }
    builder.init();
}

/// Use the argument as-is, or read stdin when it is `-`
fn read_input(arg: String) -> Result<String> {
    if arg != "-" {
        return Ok(arg);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

fn decode(codec: &Codec, payload: &str, compact: bool, no_names: bool) -> Result<String> {
    let payload: String = payload.split_whitespace().collect();
    let mut tree = codec
        .unserialize(&payload)
        .context("cannot decode payload")?;
    debug!("decoded {} top-level elements", tree.len());

    if no_names {
        clear_names(&mut tree);
    }

    let json = if compact {
        serde_json::to_string(&tree)
    } else {
        serde_json::to_string_pretty(&tree)
    };
    json.context("cannot render tree as JSON")
}

fn encode(codec: &Codec, structure: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(structure).context("input is not valid JSON")?;
    codec
        .serialize_json(&json)
        .context("cannot encode structure")
}

fn clear_names(tree: &mut Tree) {
    for node in tree.values_mut() {
        node.name.clear();
        if let Value::Constructed(nested) = &mut node.value {
            clear_names(nested);
        }
    }
}
