use super::AllocOptions;
use rand::Rng;
use std::collections::HashSet;

/// Contexte de notation d'une date : qui a travaillé ce matin, qui a travaillé la veille.
#[derive(Debug, Default)]
pub(super) struct DayContext {
    pub(super) morning: HashSet<usize>,
    pub(super) previous_day: HashSet<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Candidate {
    pub(super) idx: usize,
    pub(super) score: u64,
}

/// Score d'un candidat (plus bas = prioritaire).
pub(super) fn score<R: Rng>(
    idx: usize,
    total_assignments: u32,
    ctx: &DayContext,
    opts: &AllocOptions,
    rng: &mut R,
) -> u64 {
    let mut score = u64::from(total_assignments).saturating_mul(opts.workload_weight);
    if ctx.morning.contains(&idx) {
        score = score.saturating_add(opts.same_day_penalty);
    }
    if ctx.previous_day.contains(&idx) {
        score = score.saturating_add(opts.previous_day_penalty);
    }
    if opts.jitter_span > 0 {
        score = score.saturating_add(rng.random_range(0..opts.jitter_span));
    }
    score
}
