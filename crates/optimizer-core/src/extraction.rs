//! Reply extraction: turns the agent's prose into an [`OptimizationResult`].
//!
//! Each figure is resolved through layers, first hit wins:
//!
//! | Figure | Layers |
//! |--------|--------|
//! | monthly cost | `$N per month` → `monthly … $N` → largest `$N ≥ 100` → baseline |
//! | cost per request | `$N per request` / `N cents per request` → `per request … $N` → monthly ÷ (daily × 30) → baseline |
//! | efficiency | `%` near efficiency/accuracy → baseline |
//! | savings | `%` near save/reduce/cut → baseline |
//!
//! Models and workflow roles are keyword hits against [`crate::catalog`].
//! Nothing here fails: unparsable numbers are skipped and the baseline fills gaps.

use crate::catalog::{self, AgentRole, ModelProfile, MODEL_CATALOG};
use crate::planner::{self, Figures, DAYS_PER_MONTH};
use crate::schema::{OptimizationInput, OptimizationResult, ResultSource};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// At most this many models are recommended from one reply.
pub const MAX_MODELS: usize = 4;
/// Reply prefix kept on the result for display.
pub const INSIGHTS_CHARS: usize = 600;
/// Bare dollar amounts below this are not treated as a monthly total.
const MIN_BARE_MONTHLY: f64 = 100.0;

const AMOUNT: &str = r"\$\s?(?P<num>\d[\d,]*(?:\.\d+)?|\.\d+)(?:\s*(?P<suffix>k|thousand|million|m)\b)?";
const PER: &str = r"\s*(?:/\s*|per\s+|a\s+|an\s+|each\s+|every\s+)";
const REQUEST_UNIT: &str = r"(?:request|req|call|query|conversation|interaction|message)s?\b";

static DOLLAR: Lazy<Regex> = Lazy::new(|| compile(&format!("(?i){}", AMOUNT)));

static MONTHLY_EXPLICIT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i){amount}(?:{per}(?:month|mo)\b|\s+monthly\b)",
        amount = AMOUNT,
        per = PER
    ))
});

static MONTHLY_CONTEXT: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\bmonth(?:ly)?\b[^$\n]{{0,60}}?{}", AMOUNT)));

/// Text right after an amount that marks it as something other than a monthly total.
static NON_MONTHLY_TAIL: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)^(?:{per}(?:year|yr|annum|day|week|hour|user|seat|token|1k|1,?000|million\s+tokens|{unit})|\s*(?:annually|yearly|daily|weekly|one[-\s]time|upfront))",
        per = PER,
        unit = REQUEST_UNIT
    ))
});

static PER_REQUEST_EXPLICIT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i){amount}{per}{unit}",
        amount = AMOUNT,
        per = PER,
        unit = REQUEST_UNIT
    ))
});

static PER_REQUEST_CENTS: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?P<cents>\d+(?:\.\d+)?)\s*(?:cents?|¢){per}{unit}",
        per = PER,
        unit = REQUEST_UNIT
    ))
});

static PER_REQUEST_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?:per|each|every|a)\s+{unit}[^$\n]{{0,40}}?{amount}",
        unit = REQUEST_UNIT,
        amount = AMOUNT
    ))
});

static EFFICIENCY: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(?:efficien\w*|accura\w*)[^%\n]{0,40}?\b(?P<pct>\d{1,3}(?:\.\d+)?)\s*%|\b(?P<pct2>\d{1,3}(?:\.\d+)?)\s*%\s*(?:efficien|accura)",
    )
});

static SAVINGS: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)(?:\bsav\w*|\breduc\w*|\bcut\w*|\blower\w*|\bcheaper)[^%\n]{0,40}?\b(?P<pct>\d{1,3}(?:\.\d+)?)\s*%|\b(?P<pct2>\d{1,3}(?:\.\d+)?)\s*%\s*(?:in\s+|of\s+)?(?:savings?|reduction|cheaper|less|lower)",
    )
});

static MODEL_PATTERNS: Lazy<Vec<(&'static ModelProfile, Regex)>> = Lazy::new(|| {
    MODEL_CATALOG
        .iter()
        .map(|p| (p, compile(&format!("(?i)(?:{})", p.pattern))))
        .collect()
});

static ROLE_PATTERNS: Lazy<Vec<(AgentRole, Regex)>> = Lazy::new(|| {
    AgentRole::ALL
        .iter()
        .map(|r| (*r, compile(&format!("(?i)(?:{})", r.pattern()))))
        .collect()
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {:?} must compile: {}", pattern, e))
}

/// Which layer produced a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Amount directly tied to its unit ("$450 per month").
    Explicit,
    /// Amount found shortly after a keyword ("monthly spend of about $450").
    Contextual,
    /// Bare amount picked by magnitude.
    Inferred,
    /// Computed from other extracted figures.
    Derived,
    Fallback,
}

/// Everything pulled out of one reply, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub figures: Figures,
    pub monthly_layer: Layer,
    pub per_request_layer: Layer,
    pub efficiency_layer: Layer,
    pub savings_layer: Layer,
    pub models: Vec<&'static ModelProfile>,
    pub roles: Vec<AgentRole>,
}

impl Extracted {
    /// True when nothing at all was recognized in the reply.
    pub fn is_empty(&self) -> bool {
        self.monthly_layer == Layer::Fallback
            && self.per_request_layer == Layer::Fallback
            && self.efficiency_layer == Layer::Fallback
            && self.savings_layer == Layer::Fallback
            && self.models.is_empty()
            && self.roles.is_empty()
    }
}

/// Scan a reply and build the full result, filling gaps from the baseline plan.
pub fn extract(reply: &str, input: &OptimizationInput) -> OptimizationResult {
    let found = scan(reply, input);
    tracing::debug!(
        monthly = ?found.monthly_layer,
        per_request = ?found.per_request_layer,
        efficiency = ?found.efficiency_layer,
        savings = ?found.savings_layer,
        models = found.models.len(),
        roles = found.roles.len(),
        "[EXTRACTION] reply scanned"
    );

    let models = if found.models.is_empty() {
        catalog::baseline_profiles()
    } else {
        found.models.clone()
    };

    let mut result = planner::assemble(input, found.figures, &models, &found.roles, ResultSource::Agent);
    result.insights = insights(reply);
    result
}

/// Run every extraction layer over `reply`.
pub fn scan(reply: &str, input: &OptimizationInput) -> Extracted {
    let base = Figures::baseline(input);

    let (monthly_cost, monthly_layer) =
        monthly_cost(reply).unwrap_or((base.monthly_cost, Layer::Fallback));

    let (cost_per_request, per_request_layer) = match cost_per_request(reply) {
        Some(found) => found,
        None if monthly_layer != Layer::Fallback => {
            let monthly_requests = input.daily_requests_or_default() as f64 * DAYS_PER_MONTH;
            (monthly_cost / monthly_requests, Layer::Derived)
        }
        None => (base.cost_per_request, Layer::Fallback),
    };

    let (efficiency, efficiency_layer) = first_percentage(&EFFICIENCY, reply, |p| p > 0.0 && p <= 100.0)
        .map(|p| (p, Layer::Contextual))
        .unwrap_or((base.efficiency, Layer::Fallback));

    let (savings_percentage, savings_layer) = first_percentage(&SAVINGS, reply, |p| p > 0.0 && p < 100.0)
        .map(|p| (p, Layer::Contextual))
        .unwrap_or((base.savings_percentage, Layer::Fallback));

    Extracted {
        figures: Figures {
            monthly_cost,
            cost_per_request,
            efficiency,
            savings_percentage,
        },
        monthly_layer,
        per_request_layer,
        efficiency_layer,
        savings_layer,
        models: mentioned_models(reply),
        roles: mentioned_roles(reply),
    }
}

fn monthly_cost(text: &str) -> Option<(f64, Layer)> {
    if let Some(v) = MONTHLY_EXPLICIT
        .captures_iter(text)
        .filter_map(|c| amount(&c))
        .find(|v| *v > 0.0)
    {
        return Some((v, Layer::Explicit));
    }

    if let Some(v) = MONTHLY_CONTEXT
        .captures_iter(text)
        .filter(|c| !has_non_monthly_tail(text, c))
        .filter_map(|c| amount(&c))
        .find(|v| *v >= 1.0)
    {
        return Some((v, Layer::Contextual));
    }

    DOLLAR
        .captures_iter(text)
        .filter(|c| !has_non_monthly_tail(text, c))
        .filter_map(|c| amount(&c))
        .filter(|v| *v >= MIN_BARE_MONTHLY)
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        .map(|v| (v, Layer::Inferred))
}

fn cost_per_request(text: &str) -> Option<(f64, Layer)> {
    let explicit = PER_REQUEST_EXPLICIT
        .captures_iter(text)
        .filter_map(|c| amount(&c).map(|v| (c.get(0).map_or(0, |m| m.start()), v)))
        .find(|(_, v)| *v > 0.0);
    let cents = PER_REQUEST_CENTS
        .captures_iter(text)
        .filter_map(|c| {
            let start = c.get(0).map_or(0, |m| m.start());
            c.name("cents")
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(|v| (start, v / 100.0))
        })
        .find(|(_, v)| *v > 0.0);

    // Whichever is mentioned first.
    let earliest = match (explicit, cents) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };
    if let Some((_, v)) = earliest {
        return Some((v, Layer::Explicit));
    }

    PER_REQUEST_CONTEXT
        .captures_iter(text)
        .filter_map(|c| amount(&c))
        .find(|v| *v > 0.0)
        .map(|v| (v, Layer::Contextual))
}

fn has_non_monthly_tail(text: &str, caps: &Captures<'_>) -> bool {
    let end = caps.get(0).map_or(text.len(), |m| m.end());
    NON_MONTHLY_TAIL.is_match(&text[end..])
}

/// Parse the `num`/`suffix` groups of [`AMOUNT`] into dollars.
fn amount(caps: &Captures<'_>) -> Option<f64> {
    let raw = caps.name("num")?.as_str().replace(',', "");
    let base: f64 = raw.parse().ok()?;
    let scale = match caps.name("suffix").map(|m| m.as_str().to_ascii_lowercase()) {
        Some(s) if s == "k" || s == "thousand" => 1_000.0,
        Some(s) if s == "m" || s == "million" => 1_000_000.0,
        _ => 1.0,
    };
    let v = base * scale;
    v.is_finite().then_some(v)
}

fn first_percentage(re: &Regex, text: &str, accept: impl Fn(f64) -> bool) -> Option<f64> {
    re.captures_iter(text)
        .filter_map(|c| {
            c.name("pct")
                .or_else(|| c.name("pct2"))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .find(|p| accept(*p))
}

/// Known models in order of first mention. Overlapping hits go to the
/// earlier (more specific) catalog entry.
pub fn mentioned_models(text: &str) -> Vec<&'static ModelProfile> {
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut hits: Vec<(usize, &'static ModelProfile)> = Vec::new();

    for (profile, re) in MODEL_PATTERNS.iter() {
        let mut first: Option<usize> = None;
        for m in re.find_iter(text) {
            let overlaps = claimed.iter().any(|(s, e)| m.start() < *e && *s < m.end());
            if overlaps {
                continue;
            }
            claimed.push((m.start(), m.end()));
            first.get_or_insert(m.start());
        }
        if let Some(pos) = first {
            hits.push((pos, *profile));
        }
    }

    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, p)| p).take(MAX_MODELS).collect()
}

/// Specialized workflow roles the reply talks about.
pub fn mentioned_roles(text: &str) -> Vec<AgentRole> {
    ROLE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(role, _)| *role)
        .collect()
}

fn insights(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(INSIGHTS_CHARS).collect())
}
