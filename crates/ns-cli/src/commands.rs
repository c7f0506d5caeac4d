use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use ns_registry::{CodecRegistry, Envelope, NameServiceApp, Receipt, ReceiptResult, Whois};
use ns_store::InMemoryKvStore;
use ns_types::{Address, Amount};

use crate::cli::*;
use crate::config::AppConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Apply(args) => cmd_apply(args, &cli.format),
        Command::SignBytes(args) => cmd_sign_bytes(args),
        Command::Address(args) => cmd_address(args, &cli.format),
    }
}

fn cmd_apply(args: ApplyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let envelopes = read_envelopes(&args.ops)?;
    let accounts = args
        .balance
        .iter()
        .map(|s| s.parse::<Address>().with_context(|| format!("invalid address {s:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let codec = CodecRegistry::with_nameservice();
    let mut app = NameServiceApp::with_genesis(
        &codec,
        config.registry,
        &config.genesis,
        InMemoryKvStore::new(),
    )?;

    let receipts = app.deliver_block(&envelopes);

    let query = app.query();
    let whois = args
        .whois
        .iter()
        .map(|name| query.whois(name))
        .collect::<Result<Vec<_>, _>>()?;
    let balances = accounts
        .iter()
        .map(|account| app.balance(account).map(|amount| (*account, amount)))
        .collect::<Result<Vec<(Address, Amount)>, _>>()?;

    match format {
        OutputFormat::Json => {
            let balances: Vec<_> = balances
                .iter()
                .map(|(address, amount)| json!({ "address": address, "amount": amount }))
                .collect();
            let out = json!({
                "receipts": receipts,
                "whois": whois,
                "balances": balances,
                "reserve": app.reserve()?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for receipt in &receipts {
                print_receipt(receipt);
            }
            let accepted = receipts.iter().filter(|r| r.is_ok()).count();
            println!(
                "\n{} applied, {} rejected",
                accepted.to_string().green().bold(),
                (receipts.len() - accepted).to_string().red().bold()
            );
            if !whois.is_empty() {
                println!();
                for entry in &whois {
                    print_whois(entry);
                }
            }
            if !balances.is_empty() {
                println!();
                for (address, amount) in &balances {
                    println!("  {}  {}", address.to_string().cyan(), amount.to_string().bold());
                }
                println!("  {}  {}", "reserve".dimmed(), app.reserve()?);
            }
        }
    }
    Ok(())
}

fn cmd_sign_bytes(args: SignBytesArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.op)
        .with_context(|| format!("reading {}", args.op.display()))?;
    let codec = CodecRegistry::with_nameservice();
    let op = codec.decode_json(&text)?;
    let bytes = op.sign_bytes()?;
    debug!(kind = %op.kind(), len = bytes.len(), "sign bytes computed");
    if args.hex {
        println!("{}", hex::encode(&bytes));
    } else {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
    Ok(())
}

fn cmd_address(args: AddressArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let address = match &args.seed {
        Some(seed) => Address::derive(seed.as_bytes()),
        None => Address::random(),
    };
    match format {
        OutputFormat::Json => println!("{}", json!({ "seed": args.seed, "address": address })),
        OutputFormat::Text => println!("{address}"),
    }
    Ok(())
}

fn read_envelopes(path: &Path) -> anyhow::Result<Vec<Envelope>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let envelopes: Vec<Envelope> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of envelopes", path.display()))?;
    debug!(count = envelopes.len(), path = %path.display(), "envelopes loaded");
    Ok(envelopes)
}

fn print_receipt(receipt: &Receipt) {
    let kind = receipt.kind.map(|k| k.to_string()).unwrap_or_else(|| "?".into());
    let name = receipt.name.as_deref().unwrap_or("-");
    match &receipt.result {
        ReceiptResult::Ok { events } => {
            let detail = events
                .iter()
                .flat_map(|e| e.attributes.iter())
                .filter(|(key, _)| key.as_str() != "name")
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "{} #{} {} {}  {}",
                "✓".green().bold(),
                receipt.seq,
                kind.cyan(),
                name.bold(),
                detail.dimmed()
            );
        }
        ReceiptResult::Err { code, message } => {
            println!(
                "{} #{} {} {}  {}: {}",
                "✗".red().bold(),
                receipt.seq,
                kind.cyan(),
                name.bold(),
                code.red(),
                message
            );
        }
    }
}

fn print_whois(entry: &Whois) {
    println!("{}", entry.name.bold());
    println!(
        "  Owner: {}",
        entry
            .owner
            .map(|o| o.to_string().cyan().to_string())
            .unwrap_or_else(|| "(none)".dimmed().to_string())
    );
    println!("  Price: {}", entry.price.to_string().yellow());
    println!(
        "  Value: {}",
        entry.value.as_deref().unwrap_or("(unset)")
    );
}
