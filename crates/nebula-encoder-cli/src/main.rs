// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! nebula-encoder CLI
//!
//! Computes partitions, storage keys and encoded rows against a JSON catalog.
//! Keys and rows are printed as lowercase hex, one per line. Vids are taken
//! as UTF-8 text unless `--hex-vids` is given.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use nebula_encoder::{ByteOrder, Catalog, MemoryCatalog, NebulaEncoder, RowTimestamp, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Nebula storage key and row encoder")]
struct Args {
    /// JSON catalog describing spaces, tags and edges
    #[arg(long)]
    catalog: PathBuf,
    /// Byte order of key fields and row scalars; overrides the catalog
    #[arg(long)]
    byte_order: Option<ByteOrder>,
    /// Row write timestamp: omit, now, or microseconds; overrides the catalog
    #[arg(long, allow_negative_numbers = true)]
    row_timestamp: Option<RowTimestamp>,
    /// Read vid arguments as hex-encoded bytes
    #[arg(long)]
    hex_vids: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Print the partition a vertex id hashes to
    Partition { space: String, vid: String },
    /// Print the hex key of a vertex's tag row
    VertexKey {
        space: String,
        vid: String,
        tag: String,
    },
    /// Print the hex key of an edge row
    EdgeKey {
        space: String,
        src: String,
        edge: String,
        #[arg(allow_negative_numbers = true)]
        rank: i64,
        dst: String,
    },
    /// Print the hex row of a tag from name=value pairs
    EncodeTag {
        space: String,
        tag: String,
        /// Properties as name=value; values are JSON scalars or bare strings
        props: Vec<String>,
    },
    /// Print the hex row of an edge from name=value pairs
    EncodeEdge {
        space: String,
        edge: String,
        /// Properties as name=value; values are JSON scalars or bare strings
        props: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let raw = std::fs::read(&args.catalog)
        .with_context(|| format!("read catalog {}", args.catalog.display()))?;
    let catalog = Catalog::from_json_slice(&raw)
        .with_context(|| format!("parse catalog {}", args.catalog.display()))?;
    let meta = MemoryCatalog::from_catalog(&catalog).context("load catalog")?;

    let mut options = catalog.options;
    if let Some(byte_order) = args.byte_order {
        options.byte_order = byte_order;
    }
    if let Some(row_timestamp) = args.row_timestamp {
        options.row_timestamp = row_timestamp;
    }
    debug!(
        byte_order = %options.byte_order,
        row_timestamp = %options.row_timestamp,
        spaces = meta.len(),
        "catalog loaded"
    );
    let encoder = NebulaEncoder::with_options(meta, options);

    let vids = VidInput { hex: args.hex_vids };
    let line = run(&encoder, vids, args.cmd)?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}

/// How vid arguments turn into bytes.
#[derive(Clone, Copy, Debug)]
struct VidInput {
    hex: bool,
}

impl VidInput {
    fn bytes(self, vid: &str) -> Result<Vec<u8>> {
        if self.hex {
            hex::decode(vid).with_context(|| format!("vid `{vid}` is not valid hex"))
        } else {
            Ok(vid.as_bytes().to_vec())
        }
    }
}

fn run(encoder: &NebulaEncoder<MemoryCatalog>, vids: VidInput, cmd: Command) -> Result<String> {
    Ok(match cmd {
        Command::Partition { space, vid } => encoder
            .partition_of(&space, &vids.bytes(&vid)?)?
            .to_string(),
        Command::VertexKey { space, vid, tag } => {
            hex::encode(encoder.vertex_key(&space, &vids.bytes(&vid)?, &tag)?)
        }
        Command::EdgeKey {
            space,
            src,
            edge,
            rank,
            dst,
        } => hex::encode(encoder.edge_key(
            &space,
            &vids.bytes(&src)?,
            &edge,
            rank,
            &vids.bytes(&dst)?,
        )?),
        Command::EncodeTag { space, tag, props } => {
            let (names, values) = parse_props(&props)?;
            hex::encode(encoder.encode_tag(&space, &tag, &names, &values)?)
        }
        Command::EncodeEdge { space, edge, props } => {
            let (names, values) = parse_props(&props)?;
            hex::encode(encoder.encode_edge(&space, &edge, &names, &values)?)
        }
    })
}

fn parse_props(props: &[String]) -> Result<(Vec<String>, Vec<Value>)> {
    let mut names = Vec::with_capacity(props.len());
    let mut values = Vec::with_capacity(props.len());
    for prop in props {
        let (name, raw) = prop
            .split_once('=')
            .ok_or_else(|| anyhow!("property `{prop}` is not name=value"))?;
        names.push(name.to_owned());
        values.push(parse_value(raw)?);
    }
    Ok((names, values))
}

fn parse_value(raw: &str) -> Result<Value> {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) else {
        return Ok(Value::Str(raw.to_owned()));
    };
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(
                    n.as_f64()
                        .ok_or_else(|| anyhow!("number `{raw}` is out of range"))?,
                )
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            return Err(anyhow!("value `{raw}` is not a scalar"))
        }
    })
}
