#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use invigilation::{
    allocator::{reassign, AllocOptions, Allocator},
    io,
    model::{DutyRole, FacultyId, Session},
    report::{render_text, workload_summary},
    storage::{AllocationRecord, JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de répartition des surveillances d'examens (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'allocation (lecture/écriture)
    #[arg(long, global = true, default_value = "allocation.json")]
    record: String,

    /// Roster CSV `id,department,rank[,active][,name]`
    #[arg(long, global = true, default_value = "roster.csv")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer une répartition complète
    Allocate {
        /// Planning CSV `date,am_rooms,am_relievers,pm_rooms,pm_relievers`
        #[arg(long)]
        plan: String,
        /// Graine du départage aléatoire (tirée au hasard sinon)
        #[arg(long)]
        seed: Option<u64>,
        /// Politique JSON (champs partiels acceptés)
        #[arg(long)]
        policy: Option<String>,
        /// Export CSV des convocations (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les conflits d'une allocation
    Check {
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Afficher la charge par enseignant
    Workload {
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Remplacer un enseignant sur une convocation
    Reassign {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// morning | afternoon
        #[arg(long)]
        session: String,
        /// deputy | invigilator
        #[arg(long)]
        role: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

fn load_policy(path: Option<&str>) -> Result<AllocOptions> {
    let Some(path) = path else {
        return Ok(AllocOptions::default());
    };
    let data = std::fs::read(path).with_context(|| format!("reading policy {path}"))?;
    let opts: AllocOptions =
        serde_json::from_slice(&data).with_context(|| format!("parsing policy {path}"))?;
    opts.validate()?;
    Ok(opts)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.record)?;
    let roster = io::import_roster_csv(&cli.roster)
        .with_context(|| format!("importing roster {}", cli.roster))?;

    let code = match cli.cmd {
        Commands::Allocate {
            plan,
            seed,
            policy,
            out_csv,
        } => {
            let plan =
                io::import_plan_csv(&plan).with_context(|| format!("importing plan {plan}"))?;
            let opts = load_policy(policy.as_deref())?;
            let seed = seed.unwrap_or_else(rand::random);
            let run = Allocator::new(opts).allocate_seeded(&plan, &roster, seed)?;
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &roster, &run.result)?;
            }
            let record = AllocationRecord::from_run(run, plan, opts, Some(seed));
            storage.save(&record)?;
            println!(
                "Allocation {} written to {} ({} date(s), seed {})",
                record.run_id,
                cli.record,
                record.result.days.len(),
                seed
            );
            0
        }
        Commands::Check { report } => {
            let record = storage.load()?;
            let conflicts = Allocator::new(record.policy).detect_conflicts(
                &record.plan,
                &roster,
                &record.result,
            );
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["date", "session", "role", "faculty_id", "kind"])?;
                    for c in &conflicts {
                        let date = c.date.format("%Y-%m-%d").to_string();
                        w.write_record([
                            date.as_str(),
                            c.session.as_str(),
                            c.role.map(DutyRole::as_str).unwrap_or(""),
                            c.faculty.as_ref().map(FacultyId::as_str).unwrap_or(""),
                            c.kind.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Workload { out_json } => {
            let record = storage.load()?;
            let rows = workload_summary(&roster, &record.result);
            if let Some(path) = out_json {
                std::fs::write(path, serde_json::to_string_pretty(&rows)?)?;
            }
            print!("{}", render_text(&rows));
            0
        }
        Commands::Reassign {
            date,
            session,
            role,
            from,
            to,
        } => {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("invalid date: {date}"))?;
            let session: Session = session.parse().map_err(anyhow::Error::msg)?;
            let role: DutyRole = role.parse().map_err(anyhow::Error::msg)?;
            let mut record = storage.load()?;
            reassign(
                &mut record.result,
                &roster,
                date,
                session,
                role,
                &FacultyId::new(&from),
                &FacultyId::new(&to),
            )?;
            storage.save(&record)?;
            println!("{from} replaced by {to} ({date} {session} {role})");
            0
        }
    };

    std::process::exit(code);
}
