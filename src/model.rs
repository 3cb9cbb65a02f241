use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifiant fort pour un enseignant (opaque, fourni par l'appelant)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacultyId(String);

impl FacultyId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enseignant pouvant être convoqué
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyMember {
    pub id: FacultyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub department: String,
    /// Libellé du grade tel que fourni ("Professor", "Assistant Professor"...)
    pub rank: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl FacultyMember {
    pub fn new<I: AsRef<str>, D: Into<String>, R: Into<String>>(
        id: I,
        department: D,
        rank: R,
    ) -> Self {
        Self {
            id: FacultyId::new(id),
            name: None,
            department: department.into(),
            rank: rank.into(),
            active: true,
        }
    }

    /// Grade "Professor" plein : contient "professor", sans "assistant" ni "associate".
    pub fn is_senior_professor(&self) -> bool {
        let rank = self.rank.to_ascii_lowercase();
        rank.contains("professor") && !rank.contains("assistant") && !rank.contains("associate")
    }
}

/// Demi-journée d'examens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Morning,
    Afternoon,
}

impl Session {
    pub const ALL: [Session; 2] = [Session::Morning, Session::Afternoon];

    pub fn as_str(self) -> &'static str {
        match self {
            Session::Morning => "morning",
            Session::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" | "am" => Ok(Session::Morning),
            "afternoon" | "pm" => Ok(Session::Afternoon),
            other => Err(format!("unknown session: {other}")),
        }
    }
}

/// Rôle de surveillance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DutyRole {
    /// Responsable d'un bloc de salles, réservé aux professeurs
    Deputy,
    /// Surveillant de salle ou relève, tous les autres grades
    Invigilator,
}

impl DutyRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DutyRole::Deputy => "deputy",
            DutyRole::Invigilator => "invigilator",
        }
    }

    /// Le grade de `member` correspond-il à ce rôle ?
    pub fn accepts(self, member: &FacultyMember) -> bool {
        match self {
            DutyRole::Deputy => member.is_senior_professor(),
            DutyRole::Invigilator => !member.is_senior_professor(),
        }
    }
}

impl fmt::Display for DutyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DutyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deputy" => Ok(DutyRole::Deputy),
            "invigilator" => Ok(DutyRole::Invigilator),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Besoins d'une demi-journée
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    #[serde(default)]
    pub room_count: u32,
    #[serde(default)]
    pub reliever_count: u32,
}

impl SessionPlan {
    pub fn new(room_count: u32, reliever_count: u32) -> Self {
        Self {
            room_count,
            reliever_count,
        }
    }

    /// `ceil(room_count / rooms_per_deputy)` ; 0 si `rooms_per_deputy == 0`.
    pub fn deputies_needed(&self, rooms_per_deputy: u32) -> usize {
        if rooms_per_deputy == 0 {
            return 0;
        }
        self.room_count.div_ceil(rooms_per_deputy) as usize
    }

    pub fn invigilators_needed(&self) -> usize {
        self.room_count as usize + self.reliever_count as usize
    }
}

/// Besoins d'une date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    #[serde(default)]
    pub morning: SessionPlan,
    #[serde(default)]
    pub afternoon: SessionPlan,
}

impl DailyPlan {
    pub fn session(&self, session: Session) -> &SessionPlan {
        match session {
            Session::Morning => &self.morning,
            Session::Afternoon => &self.afternoon,
        }
    }
}

/// Planning d'examens, trié chronologiquement par date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamPlan {
    pub days: BTreeMap<NaiveDate, DailyPlan>,
}

impl ExamPlan {
    pub fn insert(&mut self, date: NaiveDate, day: DailyPlan) -> Option<DailyPlan> {
        self.days.insert(date, day)
    }
    pub fn get(&self, date: NaiveDate) -> Option<&DailyPlan> {
        self.days.get(&date)
    }
    pub fn len(&self) -> usize {
        self.days.len()
    }
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Résultat d'une demi-journée (ordre = ordre de sélection)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAllocation {
    pub deputies: Vec<FacultyId>,
    pub invigilators: Vec<FacultyId>,
}

impl SessionAllocation {
    pub fn list(&self, role: DutyRole) -> &[FacultyId] {
        match role {
            DutyRole::Deputy => &self.deputies,
            DutyRole::Invigilator => &self.invigilators,
        }
    }
    pub fn list_mut(&mut self, role: DutyRole) -> &mut Vec<FacultyId> {
        match role {
            DutyRole::Deputy => &mut self.deputies,
            DutyRole::Invigilator => &mut self.invigilators,
        }
    }
    pub fn contains(&self, id: &FacultyId) -> bool {
        self.deputies.contains(id) || self.invigilators.contains(id)
    }
    pub fn iter(&self) -> impl Iterator<Item = &FacultyId> {
        self.deputies.iter().chain(self.invigilators.iter())
    }
}

/// Résultat d'une date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAllocation {
    pub morning: SessionAllocation,
    pub afternoon: SessionAllocation,
}

impl DayAllocation {
    pub fn session(&self, session: Session) -> &SessionAllocation {
        match session {
            Session::Morning => &self.morning,
            Session::Afternoon => &self.afternoon,
        }
    }
    pub fn session_mut(&mut self, session: Session) -> &mut SessionAllocation {
        match session {
            Session::Morning => &mut self.morning,
            Session::Afternoon => &mut self.afternoon,
        }
    }
}

/// Une convocation unitaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub date: NaiveDate,
    pub session: Session,
    pub role: DutyRole,
    pub faculty: FacultyId,
}

/// Répartition complète : date → demi-journée → listes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationResult {
    pub days: BTreeMap<NaiveDate, DayAllocation>,
}

impl AllocationResult {
    pub fn day(&self, date: NaiveDate) -> Option<&DayAllocation> {
        self.days.get(&date)
    }
    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut DayAllocation> {
        self.days.get_mut(&date)
    }

    /// Aplatissement date / demi-journée / rôle / ordre de sélection.
    pub fn assignments(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        for (date, day) in &self.days {
            for session in Session::ALL {
                let alloc = day.session(session);
                for role in [DutyRole::Deputy, DutyRole::Invigilator] {
                    out.extend(alloc.list(role).iter().map(|id| Assignment {
                        date: *date,
                        session,
                        role,
                        faculty: id.clone(),
                    }));
                }
            }
        }
        out
    }

    /// Nombre total de convocations de `id` dans le résultat.
    pub fn count_for(&self, id: &FacultyId) -> usize {
        self.days
            .values()
            .flat_map(|d| d.morning.iter().chain(d.afternoon.iter()))
            .filter(|f| *f == id)
            .count()
    }
}

/// Recherche d'un enseignant par identifiant
pub fn find_member<'a>(roster: &'a [FacultyMember], id: &FacultyId) -> Option<&'a FacultyMember> {
    roster.iter().find(|m| &m.id == id)
}
