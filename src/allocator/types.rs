use crate::model::{AllocationResult, DutyRole, FacultyId, Session};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Paramètres de la politique de répartition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocOptions {
    /// Poids d'une convocation déjà comptée
    pub workload_weight: u64,
    /// Pénalité si déjà convoqué le matin de la même date
    pub same_day_penalty: u64,
    /// Pénalité si convoqué la veille (date calendaire précédente)
    pub previous_day_penalty: u64,
    /// Bruit de départage tiré dans [0, jitter_span) ; 0 désactive le tirage
    pub jitter_span: u64,
    /// Écart de score sous lequel deux candidats sont considérés à égalité
    pub tie_threshold: u64,
    /// Part max d'un département dans une même sélection
    pub dept_cap_ratio: f64,
    pub rooms_per_deputy: u32,
}

impl Default for AllocOptions {
    fn default() -> Self {
        Self {
            workload_weight: 1000,
            same_day_penalty: 50_000,
            previous_day_penalty: 500,
            jitter_span: 900,
            tie_threshold: 500,
            dept_cap_ratio: 0.65,
            rooms_per_deputy: 7,
        }
    }
}

impl AllocOptions {
    pub fn validate(&self) -> Result<(), AllocError> {
        if !self.dept_cap_ratio.is_finite()
            || self.dept_cap_ratio <= 0.0
            || self.dept_cap_ratio > 1.0
        {
            return Err(AllocError::InvalidPolicy("dept_cap_ratio must be in (0, 1]"));
        }
        if self.rooms_per_deputy == 0 {
            return Err(AllocError::InvalidPolicy("rooms_per_deputy must be > 0"));
        }
        // le bruit ne doit jamais masquer une convocation d'écart
        if self.jitter_span > self.workload_weight {
            return Err(AllocError::InvalidPolicy(
                "jitter_span must not exceed workload_weight",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    RoleOverlap,     // deputy et invigilator sur la même demi-journée
    SameDayDouble,   // matin et après-midi de la même date
    DuplicateInList, // deux fois dans la même liste
    Ineligible,      // inconnu, inactif ou grade incompatible
    Shortfall,       // moins de convocations que demandé
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::RoleOverlap => "role-overlap",
            ConflictKind::SameDayDouble => "same-day",
            ConflictKind::DuplicateInList => "duplicate",
            ConflictKind::Ineligible => "ineligible",
            ConflictKind::Shortfall => "shortfall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub date: NaiveDate,
    pub session: Session,
    pub role: Option<DutyRole>,
    pub faculty: Option<FacultyId>,
    pub kind: ConflictKind,
}

/// Sortie d'un run : la répartition et les compteurs finaux par enseignant
#[derive(Debug, Clone)]
pub struct AllocationRun {
    pub run_id: Uuid,
    pub result: AllocationResult,
    pub workload: BTreeMap<FacultyId, u32>,
}

#[derive(Error, Debug)]
pub enum AllocError {
    #[error("duplicate faculty id in roster: {0}")]
    DuplicateFaculty(String),
    #[error("unknown faculty: {0}")]
    UnknownFaculty(String),
    #[error("no allocation for date {0}")]
    UnknownDate(NaiveDate),
    #[error("workload counter overflow for faculty: {0}")]
    WorkloadOverflow(String),
    #[error("invalid policy: {0}")]
    InvalidPolicy(&'static str),
    #[error("reassign invalid: {0}")]
    ReassignInvalid(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
