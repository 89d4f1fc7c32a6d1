use scenario_core::{Ordinal, StateBand};

use super::{at_least, burn_rising, growth_unreported, growth_weakening};
use crate::bands::{ArrGrowthBand, BurnPressure, MarginBand};
use crate::config::Triggers;
use crate::context::SignalContext;
use crate::selector::Concern;

pub static STRENGTHS: &[Concern<&str>] = &[
    Concern {
        key: "runway_cushion",
        category: "runway",
        priority: 1,
        text: "Runway provides a comfortable cushion to execute the current plan.",
        evaluate: runway_cushion,
    },
    Concern {
        key: "burn_control",
        category: "burn",
        priority: 2,
        text: "Spending is holding at or below its planned level.",
        evaluate: burn_controlled,
    },
    Concern {
        key: "growth_momentum",
        category: "growth",
        priority: 3,
        text: "Recurring revenue continues to grow at a healthy pace.",
        evaluate: growth_momentum,
    },
    Concern {
        key: "margin_headroom",
        category: "margin",
        priority: 4,
        text: "Gross margin leaves room to reinvest in growth.",
        evaluate: margin_headroom,
    },
    Concern {
        key: "risk_contained",
        category: "risk",
        priority: 5,
        text: "Execution risk remains contained across the plan.",
        evaluate: risk_contained,
    },
];

pub static STRENGTH_FILLERS: &[&str] = &[
    "Baseline metrics remain available for side by side scenario comparison.",
    "The plan retains room to adjust spending before conditions tighten.",
    "No single metric dominates the current outlook.",
];

pub static VULNERABILITIES: &[Concern<&str>] = &[
    Concern {
        key: "thin_runway",
        category: "runway",
        priority: 1,
        text: "Runway is short enough that financing timing now shapes the plan.",
        evaluate: thin_runway,
    },
    Concern {
        key: "rising_burn",
        category: "burn",
        priority: 2,
        text: "Burn is rising faster than the plan anticipated.",
        evaluate: burn_rising,
    },
    Concern {
        key: "slowing_growth",
        category: "growth",
        priority: 3,
        text: "Growth has slowed relative to the baseline scenario.",
        evaluate: growth_weakening,
    },
    Concern {
        key: "margin_pressure",
        category: "margin",
        priority: 4,
        text: "Gross margin is under pressure from delivery costs.",
        evaluate: margin_pressure,
    },
    Concern {
        key: "elevated_risk",
        category: "risk",
        priority: 5,
        text: "The risk profile has moved into an elevated range.",
        evaluate: elevated_risk,
    },
    Concern {
        key: "growth_visibility",
        category: "growth",
        priority: 6,
        text: "Growth data is incomplete, which limits visibility into revenue momentum.",
        evaluate: growth_unreported,
    },
];

pub static VULNERABILITY_FILLERS: &[&str] = &[
    "No further structural weaknesses stand out in this snapshot.",
    "Remaining metrics sit within their expected ranges.",
    "Watch for early movement in burn and growth before the next review.",
];

fn runway_cushion(ctx: &SignalContext<'_>) -> Option<u8> {
    if ctx.bands.runway != StateBand::Stable {
        return None;
    }
    let deep = ctx.current.runway_months >= Triggers::RUNWAY_DEEP;
    let gained = ctx.deltas.runway >= Triggers::RUNWAY_GAIN;
    Some(if deep || gained { 2 } else { 1 })
}

fn burn_controlled(ctx: &SignalContext<'_>) -> Option<u8> {
    // a Flat band from a degenerate baseline says nothing about spending
    ctx.deltas.burn_ratio?;
    match ctx.bands.burn {
        BurnPressure::Down => Some(2),
        BurnPressure::Flat => Some(1),
        _ => None,
    }
}

fn growth_momentum(ctx: &SignalContext<'_>) -> Option<u8> {
    let band_score = match ctx.bands.growth {
        ArrGrowthBand::Strong => 2,
        ArrGrowthBand::Healthy => 1,
        _ => return None,
    };
    let accelerating = ctx
        .deltas
        .arr_growth
        .map(|d| d >= Triggers::GROWTH_GAIN)
        .unwrap_or(false);
    Some(if accelerating { 2 } else { band_score })
}

fn margin_headroom(ctx: &SignalContext<'_>) -> Option<u8> {
    match ctx.bands.margin {
        MarginBand::Strong => Some(2),
        MarginBand::Stable => Some(1),
        _ => None,
    }
}

fn risk_contained(ctx: &SignalContext<'_>) -> Option<u8> {
    if ctx.bands.risk != StateBand::Stable {
        return None;
    }
    Some(if ctx.deltas.risk <= -Triggers::RISK_RELIEF { 2 } else { 1 })
}

fn thin_runway(ctx: &SignalContext<'_>) -> Option<u8> {
    at_least(ctx.bands.runway, StateBand::Elevated).then(|| ctx.bands.runway.rank())
}

fn margin_pressure(ctx: &SignalContext<'_>) -> Option<u8> {
    match ctx.bands.margin {
        MarginBand::Weak => Some(2),
        MarginBand::Elevated => Some(1),
        _ => None,
    }
}

fn elevated_risk(ctx: &SignalContext<'_>) -> Option<u8> {
    at_least(ctx.bands.risk, StateBand::Elevated).then(|| ctx.bands.risk.rank())
}
