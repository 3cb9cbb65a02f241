use crate::model::{AllocationResult, DutyRole, FacultyId, FacultyMember, Session};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Charge d'un enseignant sur une répartition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkloadRow {
    pub id: FacultyId,
    pub department: String,
    pub deputy: u32,
    pub invigilator: u32,
}

impl WorkloadRow {
    pub fn total(&self) -> u32 {
        self.deputy + self.invigilator
    }
}

/// Une ligne par membre du roster, triée par département puis identifiant.
pub fn workload_summary(roster: &[FacultyMember], result: &AllocationResult) -> Vec<WorkloadRow> {
    let mut counts: HashMap<(&FacultyId, DutyRole), u32> = HashMap::new();
    for day in result.days.values() {
        for session in Session::ALL {
            let alloc = day.session(session);
            for role in [DutyRole::Deputy, DutyRole::Invigilator] {
                for id in alloc.list(role) {
                    *counts.entry((id, role)).or_default() += 1;
                }
            }
        }
    }

    let mut rows: Vec<WorkloadRow> = roster
        .iter()
        .map(|m| WorkloadRow {
            id: m.id.clone(),
            department: m.department.clone(),
            deputy: counts.get(&(&m.id, DutyRole::Deputy)).copied().unwrap_or(0),
            invigilator: counts.get(&(&m.id, DutyRole::Invigilator)).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| a.department.cmp(&b.department).then_with(|| a.id.cmp(&b.id)));
    rows
}

/// Tableau texte à largeur fixe.
pub fn render_text(rows: &[WorkloadRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<16} {:>6} {:>11} {:>5}",
        "faculty", "department", "deputy", "invigilator", "total"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<12} {:<16} {:>6} {:>11} {:>5}",
            row.id.as_str(),
            row.department,
            row.deputy,
            row.invigilator,
            row.total()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayAllocation, SessionAllocation};
    use chrono::NaiveDate;

    #[test]
    fn counts_roles_separately() {
        let roster = vec![
            FacultyMember::new("p1", "Physics", "Professor"),
            FacultyMember::new("l1", "Maths", "Lecturer"),
            FacultyMember::new("l2", "Maths", "Lecturer"),
        ];
        let mut result = AllocationResult::default();
        let day = DayAllocation {
            morning: SessionAllocation {
                deputies: vec![FacultyId::new("p1")],
                invigilators: vec![FacultyId::new("l1")],
            },
            afternoon: SessionAllocation {
                deputies: Vec::new(),
                invigilators: vec![FacultyId::new("l2")],
            },
        };
        result.days.insert(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), day.clone());
        result.days.insert(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(), day);

        let rows = workload_summary(&roster, &result);
        let order: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, ["l1", "l2", "p1"]);
        assert_eq!((rows[2].deputy, rows[2].invigilator, rows[2].total()), (2, 0, 2));
        assert_eq!(rows[0].total(), 2);
    }
}
