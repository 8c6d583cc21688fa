//! nldump - decode hex-encoded netlink messages.
//!
//! Reads hex from the command line or stdin and prints one line per message,
//! or a JSON array with `--json`.

use std::io::Read;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use nlwire::{ByteOrder, NetlinkMessage, NetlinkMessages, Protocol};

#[derive(Parser)]
#[command(name = "nldump", version, about = "Netlink message decoder")]
struct Cli {
    /// Netlink family the messages belong to.
    #[arg(short = 'P', long, default_value = "route")]
    protocol: Protocol,

    /// Byte order of the dump.
    #[arg(short = 'o', long, value_enum, default_value_t = Order::Native)]
    order: Order,

    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Show the decoded header under each message.
    #[arg(short = 'd', long)]
    details: bool,

    /// Hex bytes. Read from stdin when empty.
    hex: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Native,
    Little,
    Big,
}

impl From<Order> for ByteOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Native => ByteOrder::Native,
            Order::Little => ByteOrder::Little,
            Order::Big => ByteOrder::Big,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = if cli.hex.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        cli.hex.join(" ")
    };
    let data = parse_hex(&text)?;
    if data.is_empty() {
        bail!("no input bytes");
    }

    let messages: Vec<_> =
        NetlinkMessages::new(&data, cli.protocol, cli.order.into()).collect();
    let failed = messages.iter().filter(|m| m.is_err()).count();

    if cli.json {
        print_json(&messages, cli.pretty)?;
    } else {
        for msg in &messages {
            match msg {
                Ok(msg) => {
                    println!("{msg}");
                    if cli.details {
                        println!("    {}", msg.header().describe(cli.protocol));
                    }
                }
                Err(e) => println!("! {e}"),
            }
        }
    }

    if failed > 0 {
        bail!("{failed} message(s) failed to decode");
    }
    Ok(())
}

fn print_json(messages: &[nlwire::Result<NetlinkMessage>], pretty: bool) -> anyhow::Result<()> {
    let values = messages
        .iter()
        .map(|msg| match msg {
            Ok(msg) => serde_json::to_value(msg),
            Err(e) => Ok(serde_json::json!({ "error": e.to_string() })),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let out = if pretty {
        serde_json::to_string_pretty(&values)?
    } else {
        serde_json::to_string(&values)?
    };
    println!("{out}");
    Ok(())
}

/// Parse hex text, ignoring whitespace, `:` and `,` separators and `0x` prefixes.
fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let mut digits = String::with_capacity(text.len());
    for token in text.split(|c: char| c.is_whitespace() || c == ':' || c == ',') {
        let token = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        digits.push_str(token);
    }

    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", digits.len());
    }

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).context("non-ASCII input")?;
            u8::from_str_radix(s, 16).with_context(|| format!("invalid hex byte '{s}'"))
        })
        .collect()
}
