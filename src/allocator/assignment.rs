use super::scoring::DayContext;
use super::selection::allocate_session;
use super::{AllocError, AllocOptions, AllocationRun, RunState};
use super::util::{Departments, Ledger};
use crate::model::{
    AllocationResult, DayAllocation, DutyRole, ExamPlan, FacultyId, FacultyMember, Session,
    SessionAllocation,
};
use chrono::NaiveDate;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

pub(super) fn allocate<R: Rng>(
    opts: &AllocOptions,
    prior: &BTreeMap<FacultyId, u32>,
    plan: &ExamPlan,
    roster: &[FacultyMember],
    rng: &mut R,
) -> Result<AllocationRun, AllocError> {
    opts.validate()?;

    let mut ledger = Ledger::from_roster(roster)?;
    ledger.seed(prior);
    let mut state = RunState {
        roster,
        opts,
        ledger,
        departments: Departments::from_roster(roster),
    };

    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, dates = plan.len(), roster = roster.len(), "allocation started");

    let mut result = AllocationResult::default();

    // BTreeMap : ordre chronologique, les dates précédentes sont déjà calculées
    for (date, day_plan) in &plan.days {
        let mut ctx = DayContext {
            morning: HashSet::new(),
            previous_day: date
                .pred_opt()
                .and_then(|prev| result.day(prev))
                .map(|day| workers(&state, day.morning.iter().chain(day.afternoon.iter())))
                .unwrap_or_default(),
        };
        let rpd = opts.rooms_per_deputy;

        let am_deputies = select(
            &mut state,
            *date,
            Session::Morning,
            DutyRole::Deputy,
            day_plan.morning.deputies_needed(rpd),
            &HashSet::new(),
            &ctx,
            rng,
        )?;
        let mut busy: HashSet<usize> = am_deputies.iter().copied().collect();
        let am_invigilators = select(
            &mut state,
            *date,
            Session::Morning,
            DutyRole::Invigilator,
            day_plan.morning.invigilators_needed(),
            &busy,
            &ctx,
            rng,
        )?;
        busy.extend(am_invigilators.iter().copied());
        ctx.morning = busy.clone();

        // quiconque a travaillé le matin est exclu de l'après-midi
        let pm_deputies = select(
            &mut state,
            *date,
            Session::Afternoon,
            DutyRole::Deputy,
            day_plan.afternoon.deputies_needed(rpd),
            &busy,
            &ctx,
            rng,
        )?;
        busy.extend(pm_deputies.iter().copied());
        let pm_invigilators = select(
            &mut state,
            *date,
            Session::Afternoon,
            DutyRole::Invigilator,
            day_plan.afternoon.invigilators_needed(),
            &busy,
            &ctx,
            rng,
        )?;

        let day = DayAllocation {
            morning: SessionAllocation {
                deputies: ids(roster, &am_deputies),
                invigilators: ids(roster, &am_invigilators),
            },
            afternoon: SessionAllocation {
                deputies: ids(roster, &pm_deputies),
                invigilators: ids(roster, &pm_invigilators),
            },
        };
        tracing::debug!(
            %date,
            am_deputies = day.morning.deputies.len(),
            am_invigilators = day.morning.invigilators.len(),
            pm_deputies = day.afternoon.deputies.len(),
            pm_invigilators = day.afternoon.invigilators.len(),
            "date allocated"
        );
        result.days.insert(*date, day);
    }

    let workload = state.ledger.into_map(roster);
    tracing::info!(
        %run_id,
        total_workload = workload.values().map(|v| u64::from(*v)).sum::<u64>(),
        "allocation finished"
    );

    Ok(AllocationRun {
        run_id,
        result,
        workload,
    })
}

#[allow(clippy::too_many_arguments)]
fn select<R: Rng>(
    state: &mut RunState<'_>,
    date: NaiveDate,
    session: Session,
    role: DutyRole,
    count: usize,
    exclude: &HashSet<usize>,
    ctx: &DayContext,
    rng: &mut R,
) -> Result<Vec<usize>, AllocError> {
    let selected = allocate_session(state, role, count, exclude, ctx, rng)?;
    tracing::debug!(
        %date,
        %session,
        %role,
        requested = count,
        selected = selected.len(),
        "session allocated"
    );
    if selected.len() < count {
        tracing::warn!(
            %date,
            %session,
            %role,
            requested = count,
            selected = selected.len(),
            "eligible pool exhausted"
        );
    }
    Ok(selected)
}

fn workers<'a>(
    state: &RunState<'_>,
    ids: impl Iterator<Item = &'a FacultyId>,
) -> HashSet<usize> {
    ids.filter_map(|id| state.ledger.position(id)).collect()
}

fn ids(roster: &[FacultyMember], positions: &[usize]) -> Vec<FacultyId> {
    positions.iter().map(|&idx| roster[idx].id.clone()).collect()
}
