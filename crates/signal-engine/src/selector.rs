//! Selector
//!
//! Category-deduplicated top-K selection shared by every concern family.

use std::cmp::Ordering;

use crate::config::Bounds;
use crate::context::SignalContext;

/// A rule row: a named concern with its trigger and fixed template.
pub struct Concern<T: 'static> {
    /// Stable identity
    pub key: &'static str,
    pub category: &'static str,
    /// Tie-break among equal scores; lower wins
    pub priority: u8,
    pub text: T,
    /// `None` when the concern does not apply, otherwise a score from 0 to 3
    pub evaluate: fn(&SignalContext<'_>) -> Option<u8>,
}

/// A triggered concern awaiting selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    pub key: &'static str,
    pub category: &'static str,
    pub priority: u8,
    pub score: u8,
    pub text: T,
}

/// Evaluate every concern in `table` and keep the triggered ones.
pub fn generate<T: Clone>(table: &[Concern<T>], ctx: &SignalContext<'_>) -> Vec<Candidate<T>> {
    table
        .iter()
        .filter_map(|concern| {
            (concern.evaluate)(ctx).map(|score| Candidate {
                key: concern.key,
                category: concern.category,
                priority: concern.priority,
                score: score.min(3),
                text: concern.text.clone(),
            })
        })
        .collect()
}

fn rank_order<T>(a: &Candidate<T>, b: &Candidate<T>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(a.priority.cmp(&b.priority))
        .then(a.key.cmp(&b.key))
}

/// Highest scoring candidates, at most one per category, at most `cap`.
pub fn select_top<T>(mut candidates: Vec<Candidate<T>>, cap: usize) -> Vec<Candidate<T>> {
    candidates.sort_by(rank_order);

    let mut seen: Vec<&'static str> = Vec::new();
    let mut selected = Vec::with_capacity(cap);
    for candidate in candidates {
        if selected.len() >= cap {
            break;
        }
        if seen.contains(&candidate.category) {
            continue;
        }
        seen.push(candidate.category);
        selected.push(candidate);
    }
    selected
}

/// Run selection for one family and return the chosen texts.
pub fn select_texts<T: Clone>(
    table: &[Concern<T>],
    ctx: &SignalContext<'_>,
    bounds: Bounds,
) -> Vec<T> {
    select_top(generate(table, ctx), bounds.max)
        .into_iter()
        .map(|c| c.text)
        .collect()
}

/// Top `items` up to `min` with fillers not already present, in order.
pub fn pad_with_fillers<T, F>(items: &mut Vec<T>, min: usize, fillers: &[F])
where
    T: PartialEq<F>,
    F: Clone + Into<T>,
{
    for filler in fillers {
        if items.len() >= min {
            break;
        }
        if !items.iter().any(|item| item == filler) {
            items.push(filler.clone().into());
        }
    }
}
