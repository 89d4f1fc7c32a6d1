//! Candidate Generator
//!
//! One rule table per concern family. Each row gates on the signal context
//! and scores 0 to 3, taking the maximum over every sub-condition that holds.
//! Template text is fixed prose; nothing here interpolates numbers.

pub mod assumptions;
pub mod observations;
pub mod priorities;
pub mod questions;
pub mod risks;

use scenario_core::{Ordinal, StateBand};

use crate::bands::{ArrGrowthBand, BurnPressure, MarginBand};
use crate::config::Triggers;
use crate::context::SignalContext;

pub use assumptions::ASSUMPTION_FLAGS;
pub use observations::{STRENGTHS, STRENGTH_FILLERS, VULNERABILITIES, VULNERABILITY_FILLERS};
pub use priorities::{PRIORITIES, PRIORITY_FILLERS};
pub use questions::{QuestionTemplate, STRATEGIC_QUESTIONS};
pub use risks::{RiskTemplate, NO_DOMINANT_RISK, RISKS};

fn at_least(band: StateBand, floor: StateBand) -> bool {
    band.rank() >= floor.rank()
}

fn burn_score(burn: BurnPressure) -> u8 {
    match burn {
        BurnPressure::UpHigh => 3,
        BurnPressure::UpElevated => 2,
        BurnPressure::UpModerate => 1,
        BurnPressure::Flat | BurnPressure::Down => 0,
    }
}

fn growth_drop_score(ctx: &SignalContext<'_>) -> u8 {
    let drop = ctx.deltas.arr_growth_drop();
    if drop >= Triggers::GROWTH_DROP_SEVERE {
        2
    } else if drop >= Triggers::GROWTH_DROP {
        1
    } else {
        0
    }
}

/// Lagging band or a meaningful drop against baseline.
fn growth_weakening(ctx: &SignalContext<'_>) -> Option<u8> {
    let band_score = match ctx.bands.growth {
        ArrGrowthBand::Contracting => 3,
        ArrGrowthBand::Weak => 1,
        _ => 0,
    };
    let dropped = ctx.deltas.arr_growth_drop() >= Triggers::GROWTH_DROP;
    if !ctx.bands.growth.is_lagging() && !dropped {
        return None;
    }
    Some(band_score.max(growth_drop_score(ctx)))
}

fn runway_loss_score(ctx: &SignalContext<'_>) -> u8 {
    if ctx.deltas.runway <= -Triggers::RUNWAY_LOSS_SEVERE {
        2
    } else if ctx.deltas.runway <= -Triggers::RUNWAY_LOSS {
        1
    } else {
        0
    }
}

fn margin_drop_score(ctx: &SignalContext<'_>) -> u8 {
    if ctx.deltas.margin <= -Triggers::MARGIN_DROP_SEVERE {
        2
    } else if ctx.deltas.margin <= -Triggers::MARGIN_DROP {
        1
    } else {
        0
    }
}

/// Pressured margin band or a meaningful drop against baseline.
fn margin_weakening(ctx: &SignalContext<'_>) -> Option<u8> {
    let band_score = match ctx.bands.margin {
        MarginBand::Weak => 2,
        MarginBand::Elevated => 1,
        _ => 0,
    };
    let dropped = ctx.deltas.margin <= -Triggers::MARGIN_DROP;
    if !ctx.bands.margin.is_pressured() && !dropped {
        return None;
    }
    Some(band_score.max(margin_drop_score(ctx)))
}

fn risk_jump_score(ctx: &SignalContext<'_>) -> u8 {
    if ctx.deltas.risk >= Triggers::RISK_JUMP_SEVERE {
        2
    } else if ctx.deltas.risk >= Triggers::RISK_JUMP {
        1
    } else {
        0
    }
}

/// Runway in a short band or a severe loss of months against baseline.
fn runway_short(ctx: &SignalContext<'_>) -> Option<u8> {
    let short = at_least(ctx.bands.runway, StateBand::Elevated);
    let severe_loss = ctx.deltas.runway <= -Triggers::RUNWAY_LOSS_SEVERE;
    if !short && !severe_loss {
        return None;
    }
    Some(ctx.bands.runway.rank().max(runway_loss_score(ctx)))
}

/// Risk in an elevated band or a severe jump against baseline.
fn risk_escalating(ctx: &SignalContext<'_>) -> Option<u8> {
    let elevated = at_least(ctx.bands.risk, StateBand::Elevated);
    let jumped = ctx.deltas.risk >= Triggers::RISK_JUMP_SEVERE;
    if !elevated && !jumped {
        return None;
    }
    Some(ctx.bands.risk.rank().max(risk_jump_score(ctx)))
}

/// Growth figures missing from the snapshot.
fn growth_unreported(ctx: &SignalContext<'_>) -> Option<u8> {
    (ctx.bands.growth == ArrGrowthBand::Unknown).then_some(0)
}

fn burn_rising(ctx: &SignalContext<'_>) -> Option<u8> {
    ctx.bands.burn.is_rising().then(|| burn_score(ctx.bands.burn))
}
