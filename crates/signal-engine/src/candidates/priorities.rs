use scenario_core::{Ordinal, StateBand};

use super::{
    at_least, burn_rising, growth_unreported, growth_weakening, margin_weakening, risk_jump_score,
    runway_loss_score,
};
use crate::config::Triggers;
use crate::context::SignalContext;
use crate::selector::Concern;

pub static PRIORITIES: &[Concern<&str>] = &[
    Concern {
        key: "protect_runway",
        category: "runway",
        priority: 1,
        text: "Protect runway by sequencing discretionary spend behind confirmed revenue.",
        evaluate: protect_runway,
    },
    Concern {
        key: "contain_burn",
        category: "burn",
        priority: 2,
        text: "Bring monthly burn back in line with the approved budget.",
        evaluate: burn_rising,
    },
    Concern {
        key: "restore_growth",
        category: "growth",
        priority: 3,
        text: "Rebuild growth momentum in the channels that still convert efficiently.",
        evaluate: growth_weakening,
    },
    Concern {
        key: "defend_margin",
        category: "margin",
        priority: 4,
        text: "Review delivery costs to defend gross margin.",
        evaluate: margin_weakening,
    },
    Concern {
        key: "reduce_risk",
        category: "risk",
        priority: 5,
        text: "Reduce execution risk by narrowing the number of concurrent initiatives.",
        evaluate: reduce_risk,
    },
    Concern {
        key: "clarify_growth",
        category: "growth",
        priority: 6,
        text: "Close the gaps in growth reporting before the next planning cycle.",
        evaluate: growth_unreported,
    },
];

pub static PRIORITY_FILLERS: &[&str] = &[
    "Keep reviewing runway and burn against plan every month.",
    "Revisit growth assumptions at the next planning cycle.",
    "Confirm cost commitments before expanding headcount.",
];

fn protect_runway(ctx: &SignalContext<'_>) -> Option<u8> {
    let tight = at_least(ctx.bands.runway, StateBand::Moderate);
    let losing = ctx.deltas.runway <= -Triggers::RUNWAY_LOSS;
    if !tight && !losing {
        return None;
    }
    Some(ctx.bands.runway.rank().max(runway_loss_score(ctx)))
}

fn reduce_risk(ctx: &SignalContext<'_>) -> Option<u8> {
    let exposed = at_least(ctx.bands.risk, StateBand::Moderate);
    let jumped = ctx.deltas.risk >= Triggers::RISK_JUMP;
    if !exposed && !jumped {
        return None;
    }
    Some(ctx.bands.risk.rank().max(risk_jump_score(ctx)))
}
