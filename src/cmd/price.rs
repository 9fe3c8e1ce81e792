//! Offline price helpers: `price convert/format/parse`.

use anyhow::{Context, Result};
use serde_json::json;

use agency_desk::currency::{Currency, convert_currency, format_currency, parse_price_string};
use agency_desk::ui::OutputMode;

use super::super::PriceCommands;
use super::print_json;

fn currency(code: &str) -> Result<Currency> {
    code.parse::<Currency>().map_err(|e| {
        let options: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
        anyhow::anyhow!("{} (expected one of: {})", e, options.join(", "))
    })
}

pub fn cmd_price(command: PriceCommands, output: &str) -> Result<()> {
    let json = OutputMode::parse(output) == OutputMode::Json;

    match command {
        PriceCommands::Convert { amount, to } => {
            let to = currency(&to)?;
            let converted = convert_currency(amount, to);
            let formatted = format_currency(converted, to);
            if json {
                return print_json(&json!({
                    "amount_zar": amount,
                    "currency": to,
                    "amount": converted,
                    "formatted": formatted,
                }));
            }
            println!("{}", formatted);
        }
        PriceCommands::Format { amount, currency: code } => {
            let code = currency(&code)?;
            let formatted = format_currency(amount, code);
            if json {
                return print_json(&json!({ "currency": code, "formatted": formatted }));
            }
            println!("{}", formatted);
        }
        PriceCommands::Parse { text } => {
            let amount = parse_price_string(&text)
                .with_context(|| format!("No amount found in '{}'", text))?;
            if json {
                return print_json(&json!({ "input": text, "amount": amount }));
            }
            println!("{}", amount);
        }
    }
    Ok(())
}
