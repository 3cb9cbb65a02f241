#![forbid(unsafe_code)]
//! Invigilation — répartition des surveillances d'examens (sans BD).
//!
//! - Roster d'enseignants et planning par date/demi-journée (CSV/JSON).
//! - Allocation gloutonne : charge cumulée, pénalités veille/même jour, bruit de départage.
//! - Plafond indicatif par département, vérification de conflits, réaffectation sûre.
//! - Dates ISO `YYYY-MM-DD`, traitées dans l'ordre chronologique.

pub mod allocator;
pub mod io;
pub mod model;
pub mod report;
pub mod storage;

pub use allocator::{
    reassign, AllocError, AllocOptions, AllocationRun, Allocator, Conflict, ConflictKind,
};
pub use model::{
    AllocationResult, Assignment, DailyPlan, DayAllocation, DutyRole, ExamPlan, FacultyId,
    FacultyMember, Session, SessionAllocation, SessionPlan,
};
pub use report::{render_text, workload_summary, WorkloadRow};
pub use storage::{AllocationRecord, JsonStorage, Storage};
