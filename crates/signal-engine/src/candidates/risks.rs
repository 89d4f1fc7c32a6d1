use scenario_core::{Ordinal, StateBand};

use super::{at_least, burn_rising, growth_drop_score, margin_weakening, risk_jump_score, runway_loss_score};
use crate::bands::ArrGrowthBand;
use crate::config::Triggers;
use crate::context::SignalContext;
use crate::selector::Concern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskTemplate {
    pub title: &'static str,
    pub driver: &'static str,
    pub impact: &'static str,
}

impl RiskTemplate {
    /// Severity implied by a candidate score.
    pub fn severity_for(score: u8) -> StateBand {
        match score {
            0 => StateBand::Stable,
            1 => StateBand::Moderate,
            2 => StateBand::Elevated,
            _ => StateBand::High,
        }
    }
}

/// Emitted alone when no risk concern triggers.
pub const NO_DOMINANT_RISK: RiskTemplate = RiskTemplate {
    title: "No dominant risk concentration",
    driver: "Core operating metrics are holding within their planned ranges",
    impact: "The current plan remains executable without corrective action",
};

pub static RISKS: &[Concern<RiskTemplate>] = &[
    Concern {
        key: "runway_compression",
        category: "liquidity",
        priority: 1,
        text: RiskTemplate {
            title: "Runway compression",
            driver: "Cash is being consumed faster than the plan can replenish it",
            impact: "Financing decisions move forward and negotiating leverage weakens",
        },
        evaluate: runway_compressing,
    },
    Concern {
        key: "burn_acceleration",
        category: "burn",
        priority: 2,
        text: RiskTemplate {
            title: "Burn acceleration",
            driver: "Monthly spend is climbing ahead of revenue",
            impact: "Each additional month of elevated spend shortens the path to the next milestone",
        },
        evaluate: burn_rising,
    },
    Concern {
        key: "execution_risk",
        category: "execution",
        priority: 3,
        text: RiskTemplate {
            title: "Execution risk",
            driver: "The composite risk score points to delivery and concentration exposure",
            impact: "Missed milestones would compound the financial pressure already in the plan",
        },
        evaluate: execution_exposed,
    },
    Concern {
        key: "growth_stall",
        category: "growth",
        priority: 4,
        text: RiskTemplate {
            title: "Growth stall",
            driver: "Recurring revenue is expanding more slowly than the plan requires",
            impact: "Revenue targets that justify current spending may slip out of reach",
        },
        evaluate: growth_stalling,
    },
    Concern {
        key: "margin_erosion",
        category: "margin",
        priority: 5,
        text: RiskTemplate {
            title: "Margin erosion",
            driver: "Cost of delivery is absorbing a larger share of revenue",
            impact: "Less of each new dollar of revenue is available to extend runway",
        },
        evaluate: margin_weakening,
    },
    Concern {
        key: "cash_drawdown",
        category: "liquidity",
        priority: 6,
        text: RiskTemplate {
            title: "Cash drawdown",
            driver: "The cash balance has fallen sharply against the baseline",
            impact: "Reserves available for contingencies are thinner than planned",
        },
        evaluate: cash_drawing_down,
    },
];

fn runway_compressing(ctx: &SignalContext<'_>) -> Option<u8> {
    let short = at_least(ctx.bands.runway, StateBand::Elevated);
    let losing = ctx.deltas.runway <= -Triggers::RUNWAY_LOSS;
    if !short && !losing {
        return None;
    }
    Some(ctx.bands.runway.rank().max(runway_loss_score(ctx)))
}

fn execution_exposed(ctx: &SignalContext<'_>) -> Option<u8> {
    let exposed = at_least(ctx.bands.risk, StateBand::Moderate);
    let jumped = ctx.deltas.risk >= Triggers::RISK_JUMP;
    if !exposed && !jumped {
        return None;
    }
    Some(ctx.bands.risk.rank().max(risk_jump_score(ctx)))
}

fn growth_stalling(ctx: &SignalContext<'_>) -> Option<u8> {
    let band_score = match ctx.bands.growth {
        ArrGrowthBand::Contracting => 3,
        ArrGrowthBand::Weak => 1,
        _ => return None,
    };
    Some(band_score.max(growth_drop_score(ctx)))
}

fn cash_drawing_down(ctx: &SignalContext<'_>) -> Option<u8> {
    match ctx.deltas.cash_ratio {
        Some(ratio) if ratio <= Triggers::CASH_DRAWDOWN_SEVERE => Some(2),
        Some(ratio) if ratio <= Triggers::CASH_DRAWDOWN => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::fixtures;
    use crate::config::BandThresholds;
    use crate::selector::{generate, select_top};
    use scenario_core::MetricSnapshot;

    #[test]
    fn test_stress_top_three() {
        let (current, baseline) = (fixtures::stressed(), fixtures::baseline());
        let ctx = SignalContext::new(&BandThresholds::STANDARD, &current, &baseline);
        let picked = select_top(generate(RISKS, &ctx), 3);
        let keys: Vec<_> = picked.iter().map(|c| c.key).collect();
        // burn and execution score 3; growth, margin and runway tie at 2
        assert_eq!(keys, vec!["burn_acceleration", "execution_risk", "runway_compression"]);
        assert_eq!(RiskTemplate::severity_for(picked[0].score), StateBand::High);
    }

    #[test]
    fn test_cash_drawdown_shares_liquidity_category() {
        let baseline = MetricSnapshot::nominal();
        let current = MetricSnapshot {
            cash_position: baseline.cash_position * 0.5,
            runway_months: 8.0,
            ..baseline
        };
        let ctx = SignalContext::new(&BandThresholds::STANDARD, &current, &baseline);
        let candidates = generate(RISKS, &ctx);
        assert!(candidates.iter().any(|c| c.key == "cash_drawdown"));
        let picked = select_top(candidates, 3);
        let liquidity: Vec<_> = picked.iter().filter(|c| c.category == "liquidity").collect();
        assert_eq!(liquidity.len(), 1);
        assert_eq!(liquidity[0].key, "runway_compression");
    }

    #[test]
    fn test_nominal_has_no_risks() {
        let snapshot = MetricSnapshot::nominal();
        let ctx = SignalContext::new(&BandThresholds::STANDARD, &snapshot, &snapshot);
        assert!(generate(RISKS, &ctx).is_empty());
    }
}
