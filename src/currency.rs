//! Price conversion and formatting.
//!
//! All prices on the backend are quoted in South African rand; the display
//! currency is chosen per user. Rates are fixed tables, not live quotes.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Zar,
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Zar, Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Zar => "ZAR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Zar => "R",
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ZAR" => Ok(Self::Zar),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            _ => Err(format!("Unsupported currency: {}", s)),
        }
    }
}

/// ZAR → target multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeRates {
    pub zar: f64,
    pub usd: f64,
    pub eur: f64,
    pub gbp: f64,
}

impl ExchangeRates {
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Zar => self.zar,
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Gbp => self.gbp,
        }
    }
}

pub const EXCHANGE_RATES: ExchangeRates = ExchangeRates {
    zar: 1.0,
    usd: 0.055,
    eur: 0.051,
    gbp: 0.044,
};

/// Convert a rand amount into `currency`.
pub fn convert_currency(amount: f64, currency: Currency) -> f64 {
    amount * EXCHANGE_RATES.rate(currency)
}

/// Format with the currency symbol, thousands separators and two decimals,
/// e.g. `R1,234.50` or `-$55.00`.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, currency.symbol(), grouped, frac)
}

/// Convert from rand and format in one step.
pub fn display_price(amount_zar: f64, currency: Currency) -> String {
    format_currency(convert_currency(amount_zar, currency), currency)
}

/// An optional sign and currency symbol, then one amount. Spaces or commas
/// may only separate three-digit groups, so "5,000 12 months" stops at 5,000.
static PRICE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-)?(?:[R$€£]\s?)?(\d{1,3}(?:[ ,]\d{3})+|\d+)(\.\d+)?").unwrap()
});

/// Extract the first number from a price string such as `"R1,234.50"`,
/// `"$ 5 000"` or `"From R5,000 - R10,000"`.
pub fn parse_price_string(input: &str) -> Option<f64> {
    let caps = PRICE_NUMBER.captures(input)?;
    let mut cleaned: String = caps[2]
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if let Some(fraction) = caps.get(3) {
        cleaned.push_str(fraction.as_str());
    }
    let amount = cleaned.parse::<f64>().ok()?;
    Some(if caps.get(1).is_some() { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_uses_rate_table() {
        assert_eq!(
            convert_currency(1000.0, Currency::Usd),
            1000.0 * EXCHANGE_RATES.usd
        );
        assert_eq!(convert_currency(250.0, Currency::Zar), 250.0);
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_currency(1234.5, Currency::Zar), "R1,234.50");
        assert_eq!(format_currency(1_000_000.0, Currency::Usd), "$1,000,000.00");
        assert_eq!(format_currency(999.999, Currency::Gbp), "£1,000.00");
        assert_eq!(format_currency(0.0, Currency::Eur), "€0.00");
    }

    #[test]
    fn test_format_negative_amount() {
        assert_eq!(format_currency(-55.0, Currency::Usd), "-$55.00");
    }

    #[test]
    fn test_parse_recovers_formatted_zar() {
        for amount in [0.0, 12.34, 1500.0, 98_765.43, 1_250_000.5] {
            let formatted = format_currency(amount, Currency::Zar);
            let parsed = parse_price_string(&formatted).unwrap();
            assert!((parsed - amount).abs() < 0.005, "{} -> {} -> {}", amount, formatted, parsed);
        }
    }

    #[test]
    fn test_parse_handles_spaces_and_ranges() {
        assert_eq!(parse_price_string("R 5 000"), Some(5000.0));
        assert_eq!(parse_price_string("From R5,000 - R10,000"), Some(5000.0));
        assert_eq!(parse_price_string("€12.5"), Some(12.5));
        assert_eq!(parse_price_string("$ 5 000"), Some(5000.0));
    }

    #[test]
    fn test_parse_stops_at_first_amount() {
        assert_eq!(parse_price_string("R5,000 12 months"), Some(5000.0));
        assert_eq!(parse_price_string("Budget 1500 for 3 pages"), Some(1500.0));
    }

    #[test]
    fn test_parse_keeps_sign_before_symbol() {
        assert_eq!(parse_price_string("-R55.00"), Some(-55.0));
        assert_eq!(parse_price_string("-12.5"), Some(-12.5));
        assert_eq!(parse_price_string("R1,000 - R2,000"), Some(1000.0));
    }

    #[test]
    fn test_parse_rejects_text_without_digits() {
        assert_eq!(parse_price_string("Contact us"), None);
        assert_eq!(parse_price_string(""), None);
    }

    #[test]
    fn test_currency_from_str_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert!("JPY".parse::<Currency>().is_err());
    }
}
