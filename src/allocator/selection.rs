use super::scoring::{self, Candidate, DayContext};
use super::util::Departments;
use super::{AllocError, AllocOptions, RunState};
use crate::model::DutyRole;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Sélectionne jusqu'à `count` enseignants pour un rôle sur une demi-journée.
///
/// Retourne les positions dans le roster, dans l'ordre de sélection. Chaque
/// sélection incrémente le compteur du run. Si le vivier s'épuise, la liste
/// est simplement plus courte que demandé ; seul un compteur saturé est une erreur.
pub(super) fn allocate_session<R: Rng>(
    state: &mut RunState<'_>,
    role: DutyRole,
    count: usize,
    exclude: &HashSet<usize>,
    ctx: &DayContext,
    rng: &mut R,
) -> Result<Vec<usize>, AllocError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut pool: Vec<Candidate> = state
        .roster
        .iter()
        .enumerate()
        .filter(|(idx, m)| m.active && role.accepts(m) && !exclude.contains(idx))
        .map(|(idx, _)| Candidate {
            idx,
            score: scoring::score(idx, state.ledger.total(idx), ctx, state.opts, rng),
        })
        .collect();
    // tri stable : à score égal, l'ordre du roster est conservé
    pool.sort_by_key(|c| c.score);

    let mut taken: HashMap<usize, usize> = HashMap::new();
    let mut selected = Vec::with_capacity(count.min(pool.len()));

    while selected.len() < count && !pool.is_empty() {
        let pos = pick_position(&pool, &taken, &state.departments, state.opts);
        let chosen = pool.remove(pos);
        if state.ledger.bump(chosen.idx).is_none() {
            let id = state.roster[chosen.idx].id.as_str().to_string();
            return Err(AllocError::WorkloadOverflow(id));
        }
        *taken.entry(state.departments.of(chosen.idx)).or_default() += 1;
        selected.push(chosen.idx);
    }

    Ok(selected)
}

/// Choisit le meilleur candidat restant en tenant compte du plafond par département.
///
/// Le plafond est indicatif : il ne l'emporte que si l'alternative est à
/// égalité (écart < `tie_threshold`) avec le meilleur score.
fn pick_position(
    pool: &[Candidate],
    taken: &HashMap<usize, usize>,
    departments: &Departments,
    opts: &AllocOptions,
) -> usize {
    let is_full = |idx: usize| {
        let dept = departments.of(idx);
        taken.get(&dept).copied().unwrap_or(0) >= departments.cap(dept, opts.dept_cap_ratio)
    };

    let best = pool[0];
    if !is_full(best.idx) {
        return 0;
    }

    match pool.iter().enumerate().skip(1).find(|(_, c)| !is_full(c.idx)) {
        Some((pos, alt)) if alt.score.saturating_sub(best.score) < opts.tie_threshold => pos,
        _ => 0,
    }
}
