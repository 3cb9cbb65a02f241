use crate::model::{AllocationResult, DailyPlan, ExamPlan, FacultyMember, SessionPlan};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import du roster depuis CSV: header `id,department,rank[,active][,name]`
pub fn import_roster_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<FacultyMember>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let department = rec.get(1).context("missing department")?.trim();
        let rank = rec.get(2).context("missing rank")?.trim();
        if id.is_empty() || department.is_empty() || rank.is_empty() {
            bail!("invalid roster row (empty)");
        }
        let mut member = FacultyMember::new(id, department, rank);
        if let Some(flag) = rec.get(3) {
            let flag = flag.trim();
            if !flag.is_empty() {
                member.active = parse_bool(flag)
                    .with_context(|| format!("invalid active value for id {id}"))?;
            }
        }
        if let Some(name) = rec.get(4) {
            let name = name.trim();
            if !name.is_empty() {
                member.name = Some(name.to_string());
            }
        }
        out.push(member);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Import du planning: header `date,am_rooms,am_relievers,pm_rooms,pm_relievers`
pub fn import_plan_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ExamPlan> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut plan = ExamPlan::default();
    for rec in rdr.records() {
        let rec = rec?;
        let raw_date = rec.get(0).context("missing date")?.trim();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {raw_date}"))?;
        let count = |idx: usize, field: &str| -> anyhow::Result<u32> {
            let raw = rec.get(idx).with_context(|| format!("missing {field}"))?.trim();
            parse_count(raw).with_context(|| format!("invalid {field} for {date}"))
        };
        let day = DailyPlan {
            morning: SessionPlan::new(count(1, "am_rooms")?, count(2, "am_relievers")?),
            afternoon: SessionPlan::new(count(3, "pm_rooms")?, count(4, "pm_relievers")?),
        };
        if plan.insert(date, day).is_some() {
            bail!("duplicate plan date {date}");
        }
    }
    Ok(plan)
}

fn parse_count(raw: &str) -> anyhow::Result<u32> {
    if raw.is_empty() {
        return Ok(0);
    }
    let value: i64 = raw.parse().context("expected integer")?;
    if value < 0 {
        bail!("count must be >= 0 (got {value})");
    }
    u32::try_from(value).context("count too large")
}

/// Export CSV des convocations: header `date,session,role,faculty_id,department`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    roster: &[FacultyMember],
    result: &AllocationResult,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "session", "role", "faculty_id", "department"])?;
    for a in result.assignments() {
        let department = roster
            .iter()
            .find(|m| m.id == a.faculty)
            .map(|m| m.department.as_str())
            .unwrap_or("");
        let date = a.date.format("%Y-%m-%d").to_string();
        w.write_record([
            date.as_str(),
            a.session.as_str(),
            a.role.as_str(),
            a.faculty.as_str(),
            department,
        ])?;
    }
    w.flush()?;
    Ok(())
}
