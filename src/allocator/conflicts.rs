use super::{AllocOptions, Conflict, ConflictKind};
use crate::model::{
    find_member, AllocationResult, DayAllocation, DutyRole, ExamPlan, FacultyId, FacultyMember,
    Session,
};
use chrono::NaiveDate;
use std::collections::HashSet;

const ROLES: [DutyRole; 2] = [DutyRole::Deputy, DutyRole::Invigilator];

pub(super) fn detect_conflicts(
    opts: &AllocOptions,
    plan: &ExamPlan,
    roster: &[FacultyMember],
    result: &AllocationResult,
) -> Vec<Conflict> {
    let mut out = Vec::new();
    let empty = DayAllocation::default();

    for (date, day_plan) in &plan.days {
        let day = result.day(*date).unwrap_or(&empty);
        for session in Session::ALL {
            let needs = day_plan.session(session);
            let wanted = [
                needs.deputies_needed(opts.rooms_per_deputy),
                needs.invigilators_needed(),
            ];
            for (role, wanted) in ROLES.into_iter().zip(wanted) {
                if day.session(session).list(role).len() < wanted {
                    out.push(Conflict {
                        date: *date,
                        session,
                        role: Some(role),
                        faculty: None,
                        kind: ConflictKind::Shortfall,
                    });
                }
            }
        }
    }

    for (date, day) in &result.days {
        for session in Session::ALL {
            session_conflicts(*date, session, day, roster, &mut out);
        }

        for id in unique(day.morning.iter()) {
            if day.afternoon.contains(id) {
                out.push(Conflict {
                    date: *date,
                    session: Session::Afternoon,
                    role: None,
                    faculty: Some(id.clone()),
                    kind: ConflictKind::SameDayDouble,
                });
            }
        }
    }

    out
}

fn session_conflicts(
    date: NaiveDate,
    session: Session,
    day: &DayAllocation,
    roster: &[FacultyMember],
    out: &mut Vec<Conflict>,
) {
    let alloc = day.session(session);
    let conflict = |role: Option<DutyRole>, id: &FacultyId, kind| Conflict {
        date,
        session,
        role,
        faculty: Some(id.clone()),
        kind,
    };

    for role in ROLES {
        let list = alloc.list(role);
        let mut seen = HashSet::new();
        for id in list {
            if !seen.insert(id) {
                out.push(conflict(Some(role), id, ConflictKind::DuplicateInList));
                continue;
            }
            let eligible = find_member(roster, id).is_some_and(|m| m.active && role.accepts(m));
            if !eligible {
                out.push(conflict(Some(role), id, ConflictKind::Ineligible));
            }
        }
    }

    for id in unique(alloc.deputies.iter()) {
        if alloc.invigilators.contains(id) {
            out.push(conflict(None, id, ConflictKind::RoleOverlap));
        }
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a FacultyId>) -> Vec<&'a FacultyId> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyPlan, SessionAllocation, SessionPlan};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn roster() -> Vec<FacultyMember> {
        let mut gone = FacultyMember::new("gone", "Maths", "Lecturer");
        gone.active = false;
        vec![
            FacultyMember::new("prof", "Maths", "Professor"),
            FacultyMember::new("lec", "Maths", "Lecturer"),
            FacultyMember::new("asst", "Physics", "Assistant Professor"),
            gone,
        ]
    }

    fn ids(raw: &[&str]) -> Vec<FacultyId> {
        raw.iter().map(FacultyId::new).collect()
    }

    fn plan(rooms: u32) -> ExamPlan {
        let mut plan = ExamPlan::default();
        plan.insert(
            date(),
            DailyPlan {
                morning: SessionPlan::new(rooms, 0),
                afternoon: SessionPlan::default(),
            },
        );
        plan
    }

    fn result(day: DayAllocation) -> AllocationResult {
        let mut result = AllocationResult::default();
        result.days.insert(date(), day);
        result
    }

    #[test]
    fn clean_day_has_no_conflicts() {
        let day = DayAllocation {
            morning: SessionAllocation {
                deputies: ids(&["prof"]),
                invigilators: ids(&["lec", "asst"]),
            },
            afternoon: SessionAllocation::default(),
        };
        let found = detect_conflicts(&AllocOptions::default(), &plan(2), &roster(), &result(day));
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn reports_shortfall_and_missing_dates() {
        let found = detect_conflicts(
            &AllocOptions::default(),
            &plan(2),
            &roster(),
            &AllocationResult::default(),
        );
        let kinds: Vec<_> = found.iter().map(|c| (c.role, c.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (Some(DutyRole::Deputy), ConflictKind::Shortfall),
                (Some(DutyRole::Invigilator), ConflictKind::Shortfall),
            ]
        );
    }

    #[test]
    fn reports_overlap_same_day_and_eligibility() {
        let day = DayAllocation {
            morning: SessionAllocation {
                deputies: ids(&["prof", "lec"]),
                invigilators: ids(&["lec", "gone", "gone"]),
            },
            afternoon: SessionAllocation {
                deputies: Vec::new(),
                invigilators: ids(&["lec"]),
            },
        };
        let found = detect_conflicts(&AllocOptions::default(), &plan(3), &roster(), &result(day));
        let has = |kind, who: &str| {
            found
                .iter()
                .any(|c| c.kind == kind && c.faculty.as_ref().map(|f| f.as_str()) == Some(who))
        };
        assert!(has(ConflictKind::Ineligible, "lec")); // lecturer en deputy
        assert!(has(ConflictKind::Ineligible, "gone"));
        assert!(has(ConflictKind::DuplicateInList, "gone"));
        assert!(has(ConflictKind::RoleOverlap, "lec"));
        assert!(has(ConflictKind::SameDayDouble, "lec"));
        assert!(!has(ConflictKind::SameDayDouble, "prof"));
    }
}
