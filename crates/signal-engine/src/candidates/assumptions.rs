use super::{burn_rising, growth_weakening, margin_weakening, risk_escalating, runway_short};
use crate::bands::ArrGrowthBand;
use crate::context::SignalContext;
use crate::selector::Concern;

pub static ASSUMPTION_FLAGS: &[Concern<&str>] = &[
    Concern {
        key: "growth_trajectory",
        category: "growth",
        priority: 1,
        text: "The plan assumes growth will return to its prior pace, but current momentum does not yet support that.",
        evaluate: growth_weakening,
    },
    Concern {
        key: "burn_baseline",
        category: "burn",
        priority: 2,
        text: "Spending plans assume burn holds near its baseline level, while recent movement shows it rising.",
        evaluate: burn_rising,
    },
    Concern {
        key: "runway_horizon",
        category: "runway",
        priority: 3,
        text: "Runway projections assume financing arrives on the original schedule; a delay would leave little room to adjust.",
        evaluate: runway_short,
    },
    Concern {
        key: "margin_stability",
        category: "margin",
        priority: 4,
        text: "Unit economics assume gross margin holds steady even as delivery costs move against it.",
        evaluate: margin_weakening,
    },
    Concern {
        key: "risk_tolerance",
        category: "risk",
        priority: 5,
        text: "Execution plans assume the current risk level stays contained without added mitigation.",
        evaluate: risk_escalating,
    },
    Concern {
        key: "growth_inputs_missing",
        category: "growth",
        priority: 6,
        text: "Growth inputs are incomplete, so any plan that leans on revenue expansion rests on an unverified assumption.",
        evaluate: growth_unknown,
    },
];

fn growth_unknown(ctx: &SignalContext<'_>) -> Option<u8> {
    (ctx.bands.growth == ArrGrowthBand::Unknown).then_some(1)
}
