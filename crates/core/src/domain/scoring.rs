use crate::domain::recommendation::Recommendation;
use crate::domain::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

/// The five pillar sub-scores, each already clamped to `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarScores {
    pub intrinsic: f64,
    pub growth: f64,
    pub risk: f64,
    pub valuation: f64,
    pub momentum: f64,
}

impl PillarScores {
    /// Mean of the five pillars. Non-finite pillars count as 0 so the
    /// aggregate can never poison the final score.
    pub fn mean(&self) -> f64 {
        let sum: f64 = [
            self.intrinsic,
            self.growth,
            self.risk,
            self.valuation,
            self.momentum,
        ]
        .iter()
        .map(|p| if p.is_finite() { *p } else { 0.0 })
        .sum();
        sum / 5.0
    }
}

/// Full scoring output for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub pillars: PillarScores,
    pub final_score: f64,
    pub recommendation: Recommendation,
}

/// Score a snapshot. Pure, deterministic, and never fails: every missing or
/// degenerate input resolves to the documented per-pillar fallback.
pub fn score_snapshot(snapshot: &Snapshot) -> ScoreResult {
    let pillars = PillarScores {
        intrinsic: intrinsic_score(snapshot),
        growth: growth_score(snapshot),
        risk: risk_score(snapshot),
        valuation: valuation_score(snapshot),
        momentum: momentum_score(snapshot),
    };

    let final_score = round2(pillars.mean());
    ScoreResult {
        pillars,
        final_score,
        recommendation: Recommendation::classify(final_score),
    }
}

/// Margin-of-safety ratio against a naive intrinsic-value proxy
/// (`book + 15 * eps`, Graham-style), relative to twice the price.
/// Requires positive price, earnings, and book value; otherwise 0.
fn intrinsic_score(s: &Snapshot) -> f64 {
    let raw = match (s.price, s.eps, s.book_value) {
        (Some(price), Some(eps), Some(book)) if price > 0.0 && eps > 0.0 && book > 0.0 => {
            ((book + eps * 15.0) / (2.0 * price)) * 10.0
        }
        _ => 0.0,
    };
    clamp_pillar(raw)
}

/// Sum of ROE, ROCE, revenue growth and net margin, each as a percentage,
/// divided by 20. A missing input contributes 0: no data is read as no
/// growth evidence, not as unknown.
fn growth_score(s: &Snapshot) -> f64 {
    let pct = |v: Option<f64>| v.unwrap_or(0.0) * 100.0;
    let raw = (pct(s.return_on_equity)
        + pct(s.return_on_capital_employed)
        + pct(s.revenue_growth)
        + pct(s.profit_margins))
        / 20.0;
    clamp_pillar(raw)
}

/// `10 - debtToEquity * 5`, missing D/E treated as 0 (debt-free).
///
/// The formula assumes a fractional ratio (roughly 0..2). Some providers
/// report D/E already percentage-scaled (150 meaning 150%); those values
/// floor this pillar at 0. Known calibration ambiguity: the literal
/// formula is kept and the input is not rescaled.
fn risk_score(s: &Snapshot) -> f64 {
    let de = s.debt_to_equity.unwrap_or(0.0);
    clamp_pillar(10.0 - de * 5.0)
}

/// Discount of the stock's P/E against an assumed industry P/E of 1.15x
/// its own P/E (a fixed assumption, not a real industry lookup). With a
/// known positive P/E this evaluates to the constant `10 * (1 - 1/1.15)`,
/// about 1.30; without one it is 0.
fn valuation_score(s: &Snapshot) -> f64 {
    let raw = match s.trailing_pe {
        Some(pe) if pe > 0.0 => {
            let industry_pe = pe * 1.15;
            ((industry_pe - pe) / industry_pe) * 10.0
        }
        _ => 0.0,
    };
    clamp_pillar(raw)
}

/// Position of the current price inside the 52-week range. Needs both
/// bounds, a positive price, and a non-degenerate range; otherwise 0.
fn momentum_score(s: &Snapshot) -> f64 {
    let raw = match (s.fifty_two_week_high, s.fifty_two_week_low, s.price) {
        (Some(high), Some(low), Some(price)) if price > 0.0 && high != low => {
            ((price - low) / (high - low)) * 10.0
        }
        _ => 0.0,
    };
    clamp_pillar(raw)
}

/// Shared clamp rule: non-finite raw values collapse to 0, everything else
/// lands in `[0, 10]`.
fn clamp_pillar(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 10.0)
    } else {
        0.0
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
