use super::AllocError;
use crate::model::{FacultyId, FacultyMember};
use std::collections::{BTreeMap, HashMap};

/// Compteurs `total_assignments` du run, indexés comme le roster.
#[derive(Debug)]
pub(super) struct Ledger {
    index: HashMap<FacultyId, usize>,
    totals: Vec<u32>,
}

impl Ledger {
    pub(super) fn from_roster(roster: &[FacultyMember]) -> Result<Self, AllocError> {
        let mut index = HashMap::with_capacity(roster.len());
        for (idx, member) in roster.iter().enumerate() {
            if index.insert(member.id.clone(), idx).is_some() {
                return Err(AllocError::DuplicateFaculty(member.id.as_str().to_string()));
            }
        }
        Ok(Self {
            index,
            totals: vec![0; roster.len()],
        })
    }

    /// Reprise de compteurs fournis par l'appelant ; les ids inconnus sont ignorés.
    pub(super) fn seed(&mut self, prior: &BTreeMap<FacultyId, u32>) {
        for (id, count) in prior {
            match self.index.get(id) {
                Some(&idx) => self.totals[idx] = *count,
                None => {
                    tracing::debug!(faculty = %id, "prior workload for unknown faculty ignored")
                }
            }
        }
    }

    pub(super) fn position(&self, id: &FacultyId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(super) fn total(&self, idx: usize) -> u32 {
        self.totals[idx]
    }

    /// Incrémente le compteur ; `None` (compteur inchangé) s'il est déjà à `u32::MAX`.
    pub(super) fn bump(&mut self, idx: usize) -> Option<u32> {
        let next = self.totals[idx].checked_add(1)?;
        self.totals[idx] = next;
        Some(next)
    }

    pub(super) fn into_map(self, roster: &[FacultyMember]) -> BTreeMap<FacultyId, u32> {
        roster
            .iter()
            .zip(self.totals)
            .map(|(m, total)| (m.id.clone(), total))
            .collect()
    }
}

/// Départements du roster complet (actifs et inactifs confondus).
#[derive(Debug)]
pub(super) struct Departments {
    of_member: Vec<usize>,
    sizes: Vec<usize>,
}

impl Departments {
    pub(super) fn from_roster(roster: &[FacultyMember]) -> Self {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let mut sizes = Vec::new();
        let of_member = roster
            .iter()
            .map(|m| {
                let next = ids.len();
                let dept = *ids.entry(m.department.as_str()).or_insert(next);
                if dept == sizes.len() {
                    sizes.push(0);
                }
                sizes[dept] += 1;
                dept
            })
            .collect();
        Self { of_member, sizes }
    }

    pub(super) fn of(&self, idx: usize) -> usize {
        self.of_member[idx]
    }

    pub(super) fn cap(&self, dept: usize, ratio: f64) -> usize {
        department_cap(self.sizes[dept], ratio)
    }
}

/// `max(1, ceil(size × ratio))`
pub(super) fn department_cap(size: usize, ratio: f64) -> usize {
    ((size as f64 * ratio).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_rounds_up_with_floor_of_one() {
        assert_eq!(department_cap(4, 0.65), 3);
        assert_eq!(department_cap(20, 0.65), 13);
        assert_eq!(department_cap(1, 0.65), 1);
        assert_eq!(department_cap(0, 0.65), 1);
    }

    #[test]
    fn departments_count_whole_roster() {
        let mut inactive = FacultyMember::new("c", "Physics", "Lecturer");
        inactive.active = false;
        let roster = vec![
            FacultyMember::new("a", "Physics", "Professor"),
            FacultyMember::new("b", "Maths", "Professor"),
            inactive,
        ];
        let depts = Departments::from_roster(&roster);
        assert_eq!(depts.of(0), depts.of(2));
        assert_ne!(depts.of(0), depts.of(1));
        assert_eq!(depts.cap(depts.of(0), 0.65), 2);
    }

    #[test]
    fn ledger_rejects_duplicate_ids() {
        let roster = vec![
            FacultyMember::new("a", "Physics", "Professor"),
            FacultyMember::new("a", "Maths", "Lecturer"),
        ];
        assert!(matches!(
            Ledger::from_roster(&roster),
            Err(AllocError::DuplicateFaculty(id)) if id == "a"
        ));
    }

    #[test]
    fn bump_stops_at_counter_limit() {
        let roster = vec![FacultyMember::new("a", "Physics", "Professor")];
        let mut ledger = Ledger::from_roster(&roster).unwrap();
        ledger.seed(&BTreeMap::from([(FacultyId::new("a"), u32::MAX - 1)]));
        assert_eq!(ledger.bump(0), Some(u32::MAX));
        assert_eq!(ledger.bump(0), None);
        assert_eq!(ledger.total(0), u32::MAX);
    }
}
