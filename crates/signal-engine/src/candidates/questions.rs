use super::{burn_score, growth_weakening, margin_drop_score, risk_escalating, runway_short};
use crate::bands::{BurnPressure, MarginBand};
use crate::config::Triggers;
use crate::context::SignalContext;
use crate::selector::Concern;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTemplate {
    pub question: &'static str,
    pub answer: &'static str,
}

pub static STRATEGIC_QUESTIONS: &[Concern<QuestionTemplate>] = &[
    Concern {
        key: "growth_durability",
        category: "growth",
        priority: 1,
        text: QuestionTemplate {
            question: "Is the current growth trajectory sustainable without additional acquisition spend?",
            answer: "Growth has slowed against the prior plan. Confirm which channels still compound before committing to expansion hiring.",
        },
        evaluate: growth_weakening,
    },
    Concern {
        key: "runway_extension",
        category: "runway",
        priority: 2,
        text: QuestionTemplate {
            question: "What would it take to extend runway before the next financing window?",
            answer: "Runway has tightened enough that timing matters. Model which cost levers buy the most time without stalling revenue.",
        },
        evaluate: runway_short,
    },
    Concern {
        key: "burn_discipline",
        category: "burn",
        priority: 3,
        text: QuestionTemplate {
            question: "Which spending increases are producing a measurable return?",
            answer: "Burn is climbing faster than planned. Separate investments with a clear payback from costs that simply crept upward.",
        },
        evaluate: burn_accelerating,
    },
    Concern {
        key: "risk_concentration",
        category: "risk",
        priority: 4,
        text: QuestionTemplate {
            question: "Which single exposure is driving the risk profile, and can it be hedged or sequenced?",
            answer: "The risk profile has moved into an elevated range. Identify the dominant driver before adding new commitments.",
        },
        evaluate: risk_escalating,
    },
    Concern {
        key: "margin_quality",
        category: "margin",
        priority: 5,
        text: QuestionTemplate {
            question: "Is margin pressure structural or tied to a temporary cost?",
            answer: "Gross margin has fallen into a weak range. Distinguish lasting delivery costs from one-off spend before repricing.",
        },
        evaluate: margin_structural,
    },
];

fn burn_accelerating(ctx: &SignalContext<'_>) -> Option<u8> {
    matches!(ctx.bands.burn, BurnPressure::UpElevated | BurnPressure::UpHigh)
        .then(|| burn_score(ctx.bands.burn))
}

fn margin_structural(ctx: &SignalContext<'_>) -> Option<u8> {
    let weak = ctx.bands.margin == MarginBand::Weak;
    let severe_drop = ctx.deltas.margin <= -Triggers::MARGIN_DROP_SEVERE;
    if !weak && !severe_drop {
        return None;
    }
    let band_score = if weak { 2 } else { 0 };
    Some(band_score.max(margin_drop_score(ctx)))
}
