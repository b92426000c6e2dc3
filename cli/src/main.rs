//! abicodec CLI: encode and decode contract ABI data from the terminal.
//!
//! # Commands
//! ```
//! abicodec encode-call    --abi <path.json> --function <name> --args <json>
//! abicodec decode-call    --abi <path.json> --calldata <hex> [--function <name>]
//! abicodec decode-result  --abi <path.json> --function <name> --data <hex>
//! abicodec decode-log     --abi <path.json> --topics <hex>... --data <hex>
//! abicodec decode-receipt --abi <path.json> --receipt <path.json>
//! abicodec decode-revert  --data <hex>
//! abicodec selector       --abi <path.json> --function <name>
//! abicodec topic          --abi <path.json> --event <name>
//! abicodec parse-type     <type-string>
//! abicodec info
//! ```

use abicodec_core::{types::ParamType, value::Value};
use abicodec_registry::{ContractCodec, TransactionReceipt};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "abicodec",
    about = "Contract ABI encoder/decoder",
    long_about = "
abicodec: encode function calls, decode calldata, return data, event logs
and receipt logs against a standard contract ABI JSON file.

Set RUST_LOG to control diagnostics (e.g. RUST_LOG=abicodec_registry=debug).
",
    version
)]
struct Cli {
    /// Enable verbose diagnostics (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a function call to calldata
    #[command(name = "encode-call")]
    EncodeCall {
        /// Path to the ABI JSON file
        #[arg(long)]
        abi: String,
        /// Function name
        #[arg(long)]
        function: String,
        /// JSON array of arguments, e.g. '["0xabc...", "1000000"]'
        #[arg(long)]
        args: String,
    },

    /// Decode function calldata (selector + arguments)
    #[command(name = "decode-call")]
    DecodeCall {
        #[arg(long)]
        abi: String,
        /// Raw calldata (0x-prefixed hex)
        #[arg(long)]
        calldata: String,
        /// Expected function name; the selector is matched against the
        /// whole ABI when omitted
        #[arg(long)]
        function: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a function's return data
    #[command(name = "decode-result")]
    DecodeResult {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        function: String,
        /// Return data (0x-prefixed hex)
        #[arg(long)]
        data: String,
        #[arg(long)]
        json: bool,
    },

    /// Decode an event log from topics + data
    #[command(name = "decode-log")]
    DecodeLog {
        #[arg(long)]
        abi: String,
        /// topics[0] = event signature hash, topics[1..] = indexed params
        #[arg(long, num_args = 1..)]
        topics: Vec<String>,
        /// Non-indexed params (0x-prefixed hex)
        #[arg(long, default_value = "0x")]
        data: String,
        /// Event name; looked up by topics[0] when omitted
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Decode all known logs in a transaction receipt
    #[command(name = "decode-receipt")]
    DecodeReceipt {
        #[arg(long)]
        abi: String,
        /// Path to a receipt JSON file (with a `logs` array)
        #[arg(long)]
        receipt: String,
        #[arg(long)]
        json: bool,
    },

    /// Decode revert data (Error(string) / Panic(uint256))
    #[command(name = "decode-revert")]
    DecodeRevert {
        /// Revert data (0x-prefixed hex, selector included)
        #[arg(long)]
        data: String,
    },

    /// Print the 4-byte selector of a function
    Selector {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        function: String,
    },

    /// Print the 32-byte topic hash of an event
    Topic {
        #[arg(long)]
        abi: String,
        #[arg(long)]
        event: String,
    },

    /// Parse a type string and report its canonical form and layout
    #[command(name = "parse-type")]
    ParseType {
        /// Type string, e.g. '(uint256,address[])'
        type_string: String,
    },

    /// Show build and capability info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::EncodeCall { abi, function, args } => cmd_encode_call(&abi, &function, &args),
        Commands::DecodeCall { abi, calldata, function, json } => {
            cmd_decode_call(&abi, &calldata, function.as_deref(), json)
        }
        Commands::DecodeResult { abi, function, data, json } => {
            cmd_decode_result(&abi, &function, &data, json)
        }
        Commands::DecodeLog { abi, topics, data, event, json } => {
            cmd_decode_log(&abi, &topics, &data, event.as_deref(), json)
        }
        Commands::DecodeReceipt { abi, receipt, json } => {
            cmd_decode_receipt(&abi, &receipt, json)
        }
        Commands::DecodeRevert { data } => cmd_decode_revert(&data),
        Commands::Selector { abi, function } => cmd_selector(&abi, &function),
        Commands::Topic { abi, event } => cmd_topic(&abi, &event),
        Commands::ParseType { type_string } => cmd_parse_type(&type_string),
        Commands::Info => cmd_info(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

// ─── Command implementations ─────────────────────────────────────────────────

fn load_codec(abi_path: &str) -> Result<ContractCodec> {
    let abi_json = std::fs::read_to_string(abi_path)
        .with_context(|| format!("read ABI file '{abi_path}'"))?;
    ContractCodec::from_json(&abi_json)
        .with_context(|| format!("parse ABI file '{abi_path}'"))
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim().strip_prefix("0x").unwrap_or(s.trim()))
        .with_context(|| format!("invalid hex '{s}'"))
}

fn cmd_encode_call(abi_path: &str, function: &str, args_json: &str) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let func = codec
        .registry()
        .function(function)
        .with_context(|| format!("function '{function}' not found in ABI"))?
        .clone();

    let raw_args: Vec<serde_json::Value> =
        serde_json::from_str(args_json).context("parse args JSON")?;
    if raw_args.len() != func.inputs.len() {
        bail!(
            "argument count mismatch: ABI has {}, got {}",
            func.inputs.len(),
            raw_args.len()
        );
    }
    let values: Result<Vec<Value>, _> = func
        .inputs
        .iter()
        .zip(raw_args.iter())
        .map(|(param, raw)| Value::coerce(&param.ty, raw))
        .collect();

    let call_data = codec.encode_function(function, &values?)?;
    println!("0x{}", hex::encode(&call_data));
    Ok(())
}

fn cmd_decode_call(
    abi_path: &str,
    calldata: &str,
    function: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let bytes = decode_hex(calldata)?;

    let (name, values) = match function {
        Some(name) => (name.to_string(), codec.decode_function(name, &bytes)?),
        None => codec.decode_call(&bytes)?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({
            "function": name,
            "inputs": values,
        }))?);
    } else {
        println!("Function: {name}");
        let func = codec.registry().function(&name);
        for (i, value) in values.iter().enumerate() {
            let label = func
                .and_then(|f| f.inputs.get(i))
                .map(|p| p.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("arg{i}"));
            println!("  {label}: {value}");
        }
    }
    Ok(())
}

fn cmd_decode_result(abi_path: &str, function: &str, data: &str, as_json: bool) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let bytes = decode_hex(data)?;
    let values = codec.decode_function_result(function, &bytes)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for value in &values {
            println!("{value}");
        }
    }
    Ok(())
}

fn cmd_decode_log(
    abi_path: &str,
    topics: &[String],
    data: &str,
    event: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let bytes = decode_hex(data)?;
    let decoded = codec.decode_log(&bytes, topics, event)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        println!("Event: {}", decoded.name);
        for (name, value) in &decoded.params {
            println!("  {name}: {value}");
        }
    }
    Ok(())
}

fn cmd_decode_receipt(abi_path: &str, receipt_path: &str, as_json: bool) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let receipt_json = std::fs::read_to_string(receipt_path)
        .with_context(|| format!("read receipt file '{receipt_path}'"))?;
    let receipt: TransactionReceipt =
        serde_json::from_str(&receipt_json).context("parse receipt JSON")?;

    let decoded = codec.decode_receipt_logs(&receipt);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        println!("Decoded {} of {} logs", decoded.len(), receipt.logs.len());
        for entry in &decoded {
            println!("  {} @ {}", entry.event.name, entry.address);
            for (name, value) in &entry.event.params {
                println!("    {name}: {value}");
            }
        }
    }
    Ok(())
}

fn cmd_decode_revert(data: &str) -> Result<()> {
    let bytes = decode_hex(data)?;
    if let Some(message) = abicodec_evm::decode_error_string(&bytes) {
        println!("Error(string): {message:?}");
    } else if let Some((code, meaning)) = abicodec_evm::decode_panic(&bytes) {
        println!("Panic(uint256): 0x{code:02x} ({meaning})");
    } else {
        bail!("data is neither an Error(string) nor a Panic(uint256) payload");
    }
    Ok(())
}

fn cmd_selector(abi_path: &str, function: &str) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let selector = codec.function_selector(function)?;
    println!("0x{}", hex::encode(selector));
    Ok(())
}

fn cmd_topic(abi_path: &str, event: &str) -> Result<()> {
    let codec = load_codec(abi_path)?;
    let topic = codec.event_topic(event)?;
    println!("0x{}", hex::encode(topic));
    Ok(())
}

fn cmd_parse_type(type_string: &str) -> Result<()> {
    let ty: ParamType = type_string.parse()?;
    println!("Canonical:  {ty}");
    println!("Dynamic:    {}", ty.is_dynamic());
    println!("Head width: {} bytes", ty.head_width());
    println!("Depth:      {}", ty.depth());
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("abicodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  - Call-data encode/decode      (head/tail ABI layout)");
    println!("  - Return-data decode");
    println!("  - Event log decode             (indexed topics + data block)");
    println!("  - Receipt log filtering        (known topics only)");
    println!("  - Revert payloads              (Error(string), Panic(uint256))");
    println!("  - Selector / topic computation (keccak-256 of canonical signature)");
    println!();
    println!("Input format:                    standard contract ABI JSON");
    Ok(())
}
