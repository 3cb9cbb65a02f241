use super::AllocError;
use crate::model::{find_member, AllocationResult, DutyRole, FacultyId, FacultyMember, Session};
use chrono::NaiveDate;

pub(super) fn reassign(
    result: &mut AllocationResult,
    roster: &[FacultyMember],
    date: NaiveDate,
    session: Session,
    role: DutyRole,
    from: &FacultyId,
    to: &FacultyId,
) -> Result<(), AllocError> {
    let target = find_member(roster, to)
        .ok_or_else(|| AllocError::UnknownFaculty(to.as_str().to_string()))?;
    if !target.active {
        return Err(AllocError::ReassignInvalid("target faculty is inactive"));
    }
    if !role.accepts(target) {
        return Err(AllocError::ReassignInvalid("target rank does not match role"));
    }

    let Some(day) = result.day_mut(date) else {
        return Err(AllocError::UnknownDate(date));
    };
    let Some(pos) = day
        .session(session)
        .list(role)
        .iter()
        .position(|id| id == from)
    else {
        return Err(AllocError::ReassignInvalid("faculty not assigned to this duty"));
    };
    if from == to {
        return Ok(());
    }

    let prev = std::mem::replace(&mut day.session_mut(session).list_mut(role)[pos], to.clone());

    // une seule convocation par date pour la cible
    let occurrences = Session::ALL
        .iter()
        .flat_map(|s| day.session(*s).iter())
        .filter(|id| *id == to)
        .count();
    if occurrences > 1 {
        day.session_mut(session).list_mut(role)[pos] = prev; // rollback
        return Err(AllocError::ReassignInvalid("introduces same-day double booking"));
    }

    tracing::info!(%date, %session, %role, %from, %to, "duty reassigned");
    Ok(())
}
