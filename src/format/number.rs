/// Separator and currency placement rules for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    /// Inserted between groups of three integer digits.
    pub grouping: char,
    /// Separates the integer and fraction parts.
    pub decimal: char,
    /// Currency symbol goes before the amount when `true`.
    pub symbol_first: bool,
    /// A space sits between the currency symbol and the amount.
    pub symbol_space: bool,
}

impl NumberLocale {
    /// Indonesian: `Rp 10.000,00`.
    pub const ID_ID: Self = Self {
        grouping: '.',
        decimal: ',',
        symbol_first: true,
        symbol_space: true,
    };

    /// US English: `$10,000.00`.
    pub const EN_US: Self = Self {
        grouping: ',',
        decimal: '.',
        symbol_first: true,
        symbol_space: false,
    };

    /// German: `10.000,00 €`.
    pub const DE_DE: Self = Self {
        grouping: '.',
        decimal: ',',
        symbol_first: false,
        symbol_space: true,
    };
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::ID_ID
    }
}

/// Format `n` with exactly `decimals` fraction digits and grouped thousands.
///
/// Ties round away from zero, so `2.5` becomes `3`.
pub fn format_number(n: f64, decimals: usize, locale: &NumberLocale) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-∞".to_owned() } else { "∞".to_owned() };
    }

    let digits = rounded_digits(n.abs(), decimals);
    let (integer, fraction) = digits.split_at(digits.len() - decimals);

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if n < 0.0 {
        out.push('-');
    }
    out.push_str(&group_digits(integer, locale.grouping));
    if !fraction.is_empty() {
        out.push(locale.decimal);
        out.push_str(fraction);
    }
    out
}

/// All digits of `abs` rounded to `decimals` places, without the decimal
/// point and with at least one integer digit.
fn rounded_digits(abs: f64, decimals: usize) -> String {
    let scaled = i32::try_from(decimals)
        .ok()
        .map(|exp| (abs * 10f64.powi(exp)).round())
        .filter(|scaled| scaled.is_finite());

    match scaled {
        Some(scaled) => format!("{:0>width$.0}", scaled, width = decimals + 1),
        // Too many places to scale exactly; let the formatter round.
        None => format!("{:.*}", decimals, abs).replace('.', ""),
    }
}

/// Format `amount` as money in the ISO 4217 currency `code`.
///
/// Known codes use their symbol (`IDR` is `Rp`). Unknown codes are printed
/// as is and always set apart from the amount by a space.
pub fn format_currency(amount: f64, locale: &NumberLocale, code: &str) -> String {
    let (symbol, known) = match currency_symbol(code) {
        Some(symbol) => (symbol, true),
        None => (code, false),
    };
    let number = format_number(amount.abs(), currency_decimals(code), locale);
    let sign = if amount < 0.0 { "-" } else { "" };
    let space = if locale.symbol_space || !known { " " } else { "" };

    if locale.symbol_first {
        format!("{sign}{symbol}{space}{number}")
    } else {
        format!("{sign}{number}{space}{symbol}")
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code.to_ascii_uppercase().as_str() {
        "IDR" => "Rp",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "KRW" => "₩",
        "INR" => "₹",
        "SGD" => "S$",
        "MYR" => "RM",
        _ => return None,
    };
    Some(symbol)
}

fn currency_decimals(code: &str) -> usize {
    match code.to_ascii_uppercase().as_str() {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
