mod assignment;
mod conflicts;
mod mutate;
mod scoring;
mod selection;
mod types;
mod util;

pub use types::{AllocError, AllocOptions, AllocationRun, Conflict, ConflictKind};

use crate::model::{AllocationResult, DutyRole, ExamPlan, FacultyId, FacultyMember, Session};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use util::{Departments, Ledger};

/// État privé d'un run : copie de travail des compteurs, jamais partagée.
struct RunState<'a> {
    roster: &'a [FacultyMember],
    opts: &'a AllocOptions,
    ledger: Ledger,
    departments: Departments,
}

/// Allocator : politique de répartition + reprise éventuelle de compteurs
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    opts: AllocOptions,
    prior: BTreeMap<FacultyId, u32>,
}

impl Allocator {
    pub fn new(opts: AllocOptions) -> Self {
        Self {
            opts,
            prior: BTreeMap::new(),
        }
    }

    pub fn options(&self) -> &AllocOptions {
        &self.opts
    }

    /// Compteurs de départ (ex. charge reportée d'une session d'examens précédente).
    pub fn with_prior_workload(mut self, prior: BTreeMap<FacultyId, u32>) -> Self {
        self.prior = prior;
        self
    }

    /// Répartit toutes les dates de `plan`, dans l'ordre chronologique.
    ///
    /// Le roster de l'appelant n'est jamais modifié ; les compteurs du run
    /// sont renvoyés dans [`AllocationRun::workload`].
    pub fn allocate<R: Rng>(
        &self,
        plan: &ExamPlan,
        roster: &[FacultyMember],
        rng: &mut R,
    ) -> Result<AllocationRun, AllocError> {
        assignment::allocate(&self.opts, &self.prior, plan, roster, rng)
    }

    /// Comme [`Allocator::allocate`], avec un générateur initialisé par `seed`.
    pub fn allocate_seeded(
        &self,
        plan: &ExamPlan,
        roster: &[FacultyMember],
        seed: u64,
    ) -> Result<AllocationRun, AllocError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.allocate(plan, roster, &mut rng)
    }

    pub fn detect_conflicts(
        &self,
        plan: &ExamPlan,
        roster: &[FacultyMember],
        result: &AllocationResult,
    ) -> Vec<Conflict> {
        conflicts::detect_conflicts(&self.opts, plan, roster, result)
    }
}

/// Remplace `from` par `to` dans une liste du résultat, sans introduire de conflit.
pub fn reassign(
    result: &mut AllocationResult,
    roster: &[FacultyMember],
    date: NaiveDate,
    session: Session,
    role: DutyRole,
    from: &FacultyId,
    to: &FacultyId,
) -> Result<(), AllocError> {
    mutate::reassign(result, roster, date, session, role, from, to)
}
