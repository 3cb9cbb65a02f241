#![forbid(unsafe_code)]
use chrono::NaiveDate;
use invigilation::{
    io, render_text, workload_summary, AllocOptions, AllocationRecord, Allocator, FacultyId,
    JsonStorage, Storage,
};
use std::fs;
use tempfile::tempdir;

const ROSTER: &str = "id,department,rank,active,name
p1,Maths,Professor,,Ada
p2,Physics,Professor,yes
l1,Maths,Lecturer,true
l2,Physics,Assistant Professor,1
l3,Physics,Associate Professor,no
";

const PLAN: &str = "date,am_rooms,am_relievers,pm_rooms,pm_relievers
2025-06-03,1,0,1,0
2025-06-02,2,1,0,0
";

#[test]
fn roster_csv_import() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, ROSTER).unwrap();

    let roster = io::import_roster_csv(&path).unwrap();
    assert_eq!(roster.len(), 5);
    assert_eq!(roster[0].name.as_deref(), Some("Ada"));
    assert!(roster[0].active);
    assert!(roster[0].is_senior_professor());
    assert!(!roster[3].is_senior_professor());
    assert!(!roster[4].active);
}

#[test]
fn roster_csv_rejects_bad_flag() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, "id,department,rank,active\np1,Maths,Professor,maybe\n").unwrap();
    assert!(io::import_roster_csv(&path).is_err());
}

#[test]
fn plan_csv_import_sorts_dates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plan.csv");
    fs::write(&path, PLAN).unwrap();

    let plan = io::import_plan_csv(&path).unwrap();
    let dates: Vec<_> = plan.days.keys().map(|d| d.to_string()).collect();
    assert_eq!(dates, ["2025-06-02", "2025-06-03"]);
    let first = plan.get(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()).unwrap();
    assert_eq!(first.morning.invigilators_needed(), 3);
}

#[test]
fn plan_csv_rejects_negative_and_duplicate_rows() {
    let dir = tempdir().unwrap();
    let negative = dir.path().join("neg.csv");
    fs::write(
        &negative,
        "date,am_rooms,am_relievers,pm_rooms,pm_relievers\n2025-06-02,-1,0,0,0\n",
    )
    .unwrap();
    let err = io::import_plan_csv(&negative).unwrap_err();
    assert!(format!("{err:#}").contains(">= 0"));

    let dup = dir.path().join("dup.csv");
    fs::write(
        &dup,
        "date,am_rooms,am_relievers,pm_rooms,pm_relievers\n\
         2025-06-02,1,0,0,0\n\
         2025-06-02,2,0,0,0\n",
    )
    .unwrap();
    assert!(io::import_plan_csv(&dup).is_err());
}

#[test]
fn record_roundtrip_and_csv_export() {
    let dir = tempdir().unwrap();
    let roster_path = dir.path().join("roster.csv");
    let plan_path = dir.path().join("plan.csv");
    fs::write(&roster_path, ROSTER).unwrap();
    fs::write(&plan_path, PLAN).unwrap();
    let roster = io::import_roster_csv(&roster_path).unwrap();
    let plan = io::import_plan_csv(&plan_path).unwrap();

    let opts = AllocOptions::default();
    let run = Allocator::new(opts).allocate_seeded(&plan, &roster, 17).unwrap();
    let total: u32 = run.workload.values().sum();

    let csv_path = dir.path().join("assignments.csv");
    io::export_assignments_csv(&csv_path, &roster, &run.result).unwrap();
    let csv = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("date,session,role,faculty_id,department"));
    assert_eq!(lines.count() as u32, total);

    let storage = JsonStorage::open(dir.path().join("allocation.json")).unwrap();
    let record = AllocationRecord::from_run(run, plan.clone(), opts, Some(17));
    storage.save(&record).unwrap();
    let loaded = storage.load().unwrap();
    assert_eq!(loaded.run_id, record.run_id);
    assert_eq!(loaded.plan, plan);
    assert_eq!(loaded.result, record.result);
    assert_eq!(loaded.policy, opts);
    assert_eq!(loaded.seed, Some(17));
}

#[test]
fn partial_policy_json_keeps_defaults() {
    let opts: AllocOptions =
        serde_json::from_str(r#"{"dept_cap_ratio": 0.5, "jitter_span": 0}"#).unwrap();
    assert_eq!(opts.dept_cap_ratio, 0.5);
    assert_eq!(opts.jitter_span, 0);
    assert_eq!(opts.tie_threshold, 500);
    assert_eq!(opts.rooms_per_deputy, 7);
    assert!(opts.validate().is_ok());
}

#[test]
fn workload_table_snapshot() {
    let dir = tempdir().unwrap();
    let roster_path = dir.path().join("roster.csv");
    fs::write(&roster_path, ROSTER).unwrap();
    let roster = io::import_roster_csv(&roster_path).unwrap();

    let mut result = invigilation::AllocationResult::default();
    let mut day = invigilation::DayAllocation::default();
    day.morning.deputies.push(FacultyId::new("p1"));
    day.morning.invigilators.push(FacultyId::new("l1"));
    day.afternoon.deputies.push(FacultyId::new("p2"));
    day.afternoon.invigilators.push(FacultyId::new("l2"));
    result.days.insert(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), day);

    let text = render_text(&workload_summary(&roster, &result));
    insta::assert_snapshot!(text, @r"
    faculty      department       deputy invigilator total
    l1           Maths                 0           1     1
    p1           Maths                 1           0     1
    l2           Physics               0           1     1
    l3           Physics               0           0     0
    p2           Physics               1           0     1
    ");
}
