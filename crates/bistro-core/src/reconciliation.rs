//! # Reconciliation Engine
//!
//! Compares what the point of sale says was sold with what the inventory
//! counts say left the shelf.
//!
//! ## Per-Product Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Coffee beans (kg)                                                      │
//! │                                                                         │
//! │  opening  1.000 ─┐                                                      │
//! │  received 0.000 ─┼─► expected = opening + received − closing = 0.180    │
//! │  closing  0.820 ─┘                                                      │
//! │                                                                         │
//! │  sales    5 × Latte    (0.018 each) ─┐                                  │
//! │           3 × Espresso (0.018 each) ─┴─► recorded = 0.144               │
//! │                                                                         │
//! │  discrepancy = expected − recorded = 0.036                              │
//! │  share       = 0.036 / max(0.180, 0.144) = 20.00%  (2000 bps)           │
//! │  status      = shortage (tolerance 5%)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Missing-Sale Suggestions
//! Shortages are often sales that never got rung up. The engine looks for
//! menu items that would explain the unexplained stock and proposes them
//! greedily, never proposing more than the shortages can cover.
//!
//! All arithmetic is integer ([`Quantity`] thousandths, [`Money`] cents).

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{RecipeComponent, Unit};
use crate::DEFAULT_TOLERANCE_BPS;

// =============================================================================
// Input
// =============================================================================

/// Product facts the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    pub unit: Unit,
    pub cost_cents: i64,
}

/// Sales item facts the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesItemInfo {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub is_active: bool,
}

/// A recorded sale, reduced to what reconciliation uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub sales_item_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Everything recorded for one business day.
///
/// Quantity maps are keyed by product id. Receipts are already summed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationInput {
    pub products: Vec<ProductInfo>,
    pub opening: HashMap<String, Quantity>,
    pub closing: HashMap<String, Quantity>,
    pub receipts: HashMap<String, Quantity>,
    /// Sales item id → recipe components.
    pub recipes: HashMap<String, Vec<RecipeComponent>>,
    pub sales_items: Vec<SalesItemInfo>,
    pub sales: Vec<SaleLine>,
    pub tolerance_bps: i64,
}

impl Default for ReconciliationInput {
    fn default() -> Self {
        ReconciliationInput {
            products: Vec::new(),
            opening: HashMap::new(),
            closing: HashMap::new(),
            receipts: HashMap::new(),
            recipes: HashMap::new(),
            sales_items: Vec::new(),
            sales: Vec::new(),
            tolerance_bps: DEFAULT_TOLERANCE_BPS,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Verdict for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// Within tolerance.
    Ok,
    /// More stock left the shelf than sales explain.
    Shortage,
    /// Sales recorded beyond what the counts show.
    Surplus,
    /// No closing count; excluded from the math.
    Uncounted,
}

impl LineStatus {
    pub fn is_flagged(&self) -> bool {
        matches!(self, LineStatus::Shortage | LineStatus::Surplus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationLine {
    pub product_id: String,
    pub product_name: String,
    pub unit: Unit,
    pub opening: Quantity,
    pub received: Quantity,
    pub closing: Option<Quantity>,
    /// Inventory-implied consumption; `None` when uncounted.
    pub expected_consumption: Option<Quantity>,
    pub recorded_consumption: Quantity,
    pub discrepancy: Option<Quantity>,
    pub discrepancy_bps: Option<i64>,
    pub discrepancy_cost: Money,
    pub status: LineStatus,
}

/// A sale that would explain part of the shortages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MissingSaleSuggestion {
    pub sales_item_id: String,
    pub name: String,
    pub suggested_quantity: i64,
    pub unit_price: Money,
    pub estimated_revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationTotals {
    pub recorded_revenue: Money,
    pub suggested_revenue: Money,
    /// Cost of stock missing beyond tolerance.
    pub shortage_cost: Money,
    /// Cost of stock recorded as sold beyond what was counted (positive).
    pub surplus_cost: Money,
    pub lines_flagged: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationReport {
    pub lines: Vec<ReconciliationLine>,
    pub suggestions: Vec<MissingSaleSuggestion>,
    pub totals: ReconciliationTotals,
    pub tolerance_bps: i64,
    /// True when no line is flagged.
    pub balanced: bool,
}

// =============================================================================
// Engine
// =============================================================================

/// Reconciles one business day.
///
/// ## Example
/// ```rust
/// use bistro_core::reconciliation::{reconcile, ReconciliationInput};
///
/// let report = reconcile(&ReconciliationInput::default());
/// assert!(report.balanced);
/// assert!(report.lines.is_empty());
/// ```
pub fn reconcile(input: &ReconciliationInput) -> ReconciliationReport {
    let tolerance_bps = input.tolerance_bps;
    let recorded = recorded_consumption(input);

    // Products in any count, receipt, or recipe of a sold item
    let mut involved: BTreeSet<&str> = BTreeSet::new();
    involved.extend(input.opening.keys().map(String::as_str));
    involved.extend(input.closing.keys().map(String::as_str));
    involved.extend(input.receipts.keys().map(String::as_str));
    involved.extend(recorded.keys().copied());

    let products: HashMap<&str, &ProductInfo> =
        input.products.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut lines: Vec<ReconciliationLine> = involved
        .into_iter()
        .map(|product_id| {
            let recorded = recorded.get(product_id).copied().unwrap_or_default();
            build_line(input, products.get(product_id).copied(), product_id, recorded)
        })
        .collect();

    lines.sort_by(|a, b| {
        a.product_name
            .cmp(&b.product_name)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    let suggestions = suggest_missing_sales(input, &lines);

    let mut totals = ReconciliationTotals {
        recorded_revenue: input
            .sales
            .iter()
            .map(|s| Money::from_cents(s.unit_price_cents) * s.quantity)
            .sum(),
        suggested_revenue: suggestions.iter().map(|s| s.estimated_revenue).sum(),
        ..Default::default()
    };
    for line in &lines {
        match line.status {
            LineStatus::Shortage => totals.shortage_cost += line.discrepancy_cost,
            LineStatus::Surplus => totals.surplus_cost += line.discrepancy_cost.abs(),
            LineStatus::Ok | LineStatus::Uncounted => {}
        }
        if line.status.is_flagged() {
            totals.lines_flagged += 1;
        }
    }

    ReconciliationReport {
        balanced: totals.lines_flagged == 0,
        lines,
        suggestions,
        totals,
        tolerance_bps,
    }
}

/// Σ sale quantity × component quantity, per product.
fn recorded_consumption(input: &ReconciliationInput) -> HashMap<&str, Quantity> {
    let mut recorded: HashMap<&str, Quantity> = HashMap::new();
    for sale in input.sales.iter().filter(|s| s.quantity > 0) {
        let Some(components) = input.recipes.get(&sale.sales_item_id) else {
            continue;
        };
        for component in components.iter().filter(|c| c.quantity_milli > 0) {
            *recorded.entry(component.product_id.as_str()).or_default() +=
                component.quantity() * sale.quantity;
        }
    }
    recorded
}

fn build_line(
    input: &ReconciliationInput,
    product: Option<&ProductInfo>,
    product_id: &str,
    recorded: Quantity,
) -> ReconciliationLine {
    let opening = input.opening.get(product_id).copied().unwrap_or_default();
    let received = input.receipts.get(product_id).copied().unwrap_or_default();
    let closing = input.closing.get(product_id).copied();
    let cost = product.map(|p| Money::from_cents(p.cost_cents)).unwrap_or_default();

    let mut line = ReconciliationLine {
        product_id: product_id.to_string(),
        product_name: product.map(|p| p.name.clone()).unwrap_or_else(|| product_id.to_string()),
        unit: product.map(|p| p.unit).unwrap_or_default(),
        opening,
        received,
        closing,
        expected_consumption: None,
        recorded_consumption: recorded,
        discrepancy: None,
        discrepancy_bps: None,
        discrepancy_cost: Money::zero(),
        status: LineStatus::Uncounted,
    };

    let Some(closing) = closing else {
        return line;
    };

    let expected = opening + received - closing;
    let discrepancy = expected - recorded;
    let denominator = expected.abs().max(recorded);
    let bps = discrepancy.ratio_bps(denominator).unwrap_or(0);

    line.expected_consumption = Some(expected);
    line.discrepancy = Some(discrepancy);
    line.discrepancy_bps = Some(bps);
    line.discrepancy_cost = cost.times_quantity(discrepancy);
    line.status = if bps.abs() <= input.tolerance_bps {
        LineStatus::Ok
    } else if discrepancy.is_positive() {
        LineStatus::Shortage
    } else {
        LineStatus::Surplus
    };
    line
}

// =============================================================================
// Suggestions
// =============================================================================

struct Candidate<'a> {
    item: &'a SalesItemInfo,
    components: Vec<&'a RecipeComponent>,
}

impl Candidate<'_> {
    /// How many units the remaining pool can still explain.
    fn count(&self, pool: &HashMap<&str, Quantity>) -> i64 {
        self.components
            .iter()
            .map(|c| {
                pool.get(c.product_id.as_str())
                    .copied()
                    .unwrap_or_default()
                    .div_floor(c.quantity())
            })
            .min()
            .unwrap_or(0)
    }
}

/// Greedy missing-sale search over the shortage lines.
///
/// ```text
///   pool = { beans: 0.036, milk: 0.400 }
///
///   Latte    (beans 0.018, milk 0.200) → min(2, 2) = 2   ◄ picked (2 components)
///   Espresso (beans 0.018)             → 2
///
///   pool after Latte × 2 = { beans: 0, milk: 0 } → Espresso = 0 → stop
/// ```
fn suggest_missing_sales(
    input: &ReconciliationInput,
    lines: &[ReconciliationLine],
) -> Vec<MissingSaleSuggestion> {
    let mut pool: HashMap<&str, Quantity> = lines
        .iter()
        .filter(|l| l.status == LineStatus::Shortage)
        .filter_map(|l| l.discrepancy.map(|d| (l.product_id.as_str(), d)))
        .collect();

    if pool.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Candidate<'_>> = input
        .sales_items
        .iter()
        .filter(|item| item.is_active)
        .filter_map(|item| {
            let components: Vec<&RecipeComponent> = input
                .recipes
                .get(&item.id)?
                .iter()
                .filter(|c| c.quantity_milli > 0)
                .collect();
            let explains = !components.is_empty()
                && components
                    .iter()
                    .all(|c| pool.contains_key(c.product_id.as_str()));
            explains.then_some(Candidate { item, components })
        })
        .collect();

    let mut suggestions = Vec::new();

    loop {
        let best = candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| (idx, c.count(&pool)))
            .filter(|(_, count)| *count >= 1)
            .max_by(|(a_idx, a_count), (b_idx, b_count)| {
                let a = &candidates[*a_idx];
                let b = &candidates[*b_idx];
                a_count
                    .cmp(b_count)
                    .then(a.components.len().cmp(&b.components.len()))
                    .then(a.item.price_cents.cmp(&b.item.price_cents))
                    .then_with(|| Reverse(&a.item.name).cmp(&Reverse(&b.item.name)))
            });

        let Some((idx, count)) = best else {
            break;
        };
        let candidate = candidates.swap_remove(idx);

        for component in &candidate.components {
            if let Some(remaining) = pool.get_mut(component.product_id.as_str()) {
                *remaining -= component.quantity() * count;
            }
        }

        let unit_price = Money::from_cents(candidate.item.price_cents);
        suggestions.push(MissingSaleSuggestion {
            sales_item_id: candidate.item.id.clone(),
            name: candidate.item.name.clone(),
            suggested_quantity: count,
            unit_price,
            estimated_revenue: unit_price * count,
        });
    }

    suggestions
}

// =============================================================================
// Unit Tests
// =============================================================================
