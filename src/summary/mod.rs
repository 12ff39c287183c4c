use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Expense;

/// Label shown instead of a percentage once spending exceeds the budget.
pub(crate) const OVER_BUDGET_LABEL: &str = "Over Budget!";

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const HEALTHY_ABOVE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const WARNING_ABOVE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Qualitative budget health, derived from the remaining percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Healthy,
    Warning,
    Critical,
    OverBudget,
}

impl Tier {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::OverBudget => "over-budget",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) budget: Decimal,
    pub(crate) total: Decimal,
    pub(crate) remaining: Decimal,
    /// Share of the budget still available, within `[0, 100]`.
    pub(crate) percentage: Decimal,
    pub(crate) tier: Tier,
}

impl Summary {
    /// Totals saturate at the `Decimal` range, so oversized amounts read as
    /// over budget rather than failing.
    pub(crate) fn compute(expenses: &[Expense], budget: Decimal) -> Self {
        let total = expenses
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
            .unwrap_or(Decimal::MAX);
        let remaining = budget.checked_sub(total).unwrap_or(Decimal::MIN);

        // Nothing left means 0%, and skipping the division keeps a huge
        // deficit over a tiny budget in range.
        let percentage = if budget > Decimal::ZERO && remaining >= Decimal::ZERO {
            remaining
                .checked_div(budget)
                .and_then(|r| r.checked_mul(ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO)
                .clamp(Decimal::ZERO, ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        let tier = if remaining < Decimal::ZERO {
            Tier::OverBudget
        } else if percentage > HEALTHY_ABOVE {
            Tier::Healthy
        } else if percentage > WARNING_ABOVE {
            Tier::Warning
        } else {
            Tier::Critical
        };

        Self {
            budget,
            total,
            remaining,
            percentage,
            tier,
        }
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        self.tier == Tier::OverBudget
    }

    /// Progress label: whole percent (`"50%"`), or the fixed over-budget marker.
    pub(crate) fn label(&self) -> String {
        if self.is_over_budget() {
            return OVER_BUDGET_LABEL.to_string();
        }
        let whole = self
            .percentage
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("{whole}%")
    }

    /// Gauge fill ratio in `[0.0, 1.0]`.
    pub(crate) fn ratio(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.percentage / ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests;
