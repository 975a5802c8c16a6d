// src/reconcile.rs
//
// Pure progress (utilization) and margin reconciliation over a demand's
// figures. The zero-division conventions here are deliberate policy, not
// error cases: a zero budget counts as fully used once anything is logged,
// and a zero sale price yields a 0% margin rather than a division error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Attention bucket derived from utilization. Ties at exactly 80 and 100
/// belong to the lower bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub consumed: Decimal,
    /// May be negative: the demand has overrun its budget.
    pub remaining: Decimal,
    pub utilization_pct: Decimal,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginReport {
    pub internal_cost: Decimal,
    pub gross_profit: Decimal,
    pub margin_pct: Decimal,
}

/// Reconciles a demand's hour budget against the hours logged so far.
/// `logged_hours` is taken verbatim; the caller sums it from live entries.
pub fn progress(estimated_hours: Decimal, logged_hours: Decimal) -> ProgressReport {
    let consumed = logged_hours;
    let remaining = estimated_hours - consumed;
    let utilization_pct = if estimated_hours > Decimal::ZERO {
        consumed / estimated_hours * dec!(100)
    } else if consumed > Decimal::ZERO {
        dec!(100)
    } else {
        Decimal::ZERO
    };
    let severity = if utilization_pct > dec!(100) {
        Severity::Critical
    } else if utilization_pct > dec!(80) {
        Severity::Warning
    } else {
        Severity::Normal
    };
    ProgressReport {
        consumed,
        remaining,
        utilization_pct,
        severity,
    }
}

/// Reconciles a demand's financials. Internal cost is computed against the
/// estimated (cost-side) hours, not the sold hours: this models "cost to
/// deliver" versus "what we promised to sell".
pub fn margin(
    sale_price: Decimal,
    estimated_hours: Decimal,
    internal_hourly_cost: Decimal,
) -> MarginReport {
    let internal_cost = estimated_hours * internal_hourly_cost;
    let gross_profit = sale_price - internal_cost;
    let margin_pct = if sale_price == Decimal::ZERO {
        Decimal::ZERO
    } else {
        gross_profit / sale_price * dec!(100)
    };
    MarginReport {
        internal_cost,
        gross_profit,
        margin_pct,
    }
}
