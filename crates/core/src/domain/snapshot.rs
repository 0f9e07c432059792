use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One fetched set of fundamental/price fields for a single symbol.
///
/// Every field is optional: the provider routinely omits fields or ships
/// non-numeric garbage in them, and "absent" must stay distinguishable from
/// zero all the way into the scorers. A snapshot is immutable after
/// construction and carries no identity beyond the symbol it was fetched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub fetched_at: DateTime<Utc>,
    pub price: Option<f64>,
    pub eps: Option<f64>,
    pub book_value: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_capital_employed: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub profit_margins: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl Snapshot {
    /// Build a snapshot from the provider's flat key-value info payload.
    ///
    /// Field names follow the provider's camelCase vocabulary as-is; a key
    /// with a different casing simply reads as unknown.
    pub fn from_info(symbol: &str, info: &Value) -> Self {
        Self {
            symbol: symbol.to_string(),
            fetched_at: Utc::now(),
            price: numeric_field(info, "currentPrice"),
            eps: numeric_field(info, "trailingEps"),
            book_value: numeric_field(info, "bookValue"),
            return_on_equity: numeric_field(info, "returnOnEquity"),
            return_on_capital_employed: numeric_field(info, "returnOnCapitalEmployed"),
            debt_to_equity: numeric_field(info, "debtToEquity"),
            revenue_growth: numeric_field(info, "revenueGrowth"),
            profit_margins: numeric_field(info, "profitMargins"),
            trailing_pe: numeric_field(info, "trailingPE"),
            fifty_two_week_high: numeric_field(info, "fiftyTwoWeekHigh"),
            fifty_two_week_low: numeric_field(info, "fiftyTwoWeekLow"),
        }
    }

    /// Whether the payload yielded at least one usable field.
    ///
    /// An all-empty snapshot counts as a failed fetch attempt for retry
    /// purposes, same as a transport error.
    pub fn is_usable(&self) -> bool {
        [
            self.price,
            self.eps,
            self.book_value,
            self.return_on_equity,
            self.return_on_capital_employed,
            self.debt_to_equity,
            self.revenue_growth,
            self.profit_margins,
            self.trailing_pe,
            self.fifty_two_week_high,
            self.fifty_two_week_low,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// Read a named field as a finite number, tolerating numeric strings.
///
/// null, booleans, objects, non-numeric strings, NaN and infinities all read
/// as unknown (`None`), never as zero.
fn numeric_field(info: &Value, key: &str) -> Option<f64> {
    let v = info.get(key)?;
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
