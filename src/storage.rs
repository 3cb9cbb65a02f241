use crate::allocator::{AllocOptions, AllocationRun};
use crate::model::{AllocationResult, ExamPlan};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Trace persistée d'un run : de quoi le rejouer et le vérifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub policy: AllocOptions,
    pub plan: ExamPlan,
    pub result: AllocationResult,
}

impl AllocationRecord {
    pub fn from_run(
        run: AllocationRun,
        plan: ExamPlan,
        policy: AllocOptions,
        seed: Option<u64>,
    ) -> Self {
        Self {
            run_id: run.run_id,
            generated_at: Utc::now(),
            seed,
            policy,
            plan,
            result: run.result,
        }
    }
}

pub trait Storage {
    /// Charge un enregistrement depuis un support.
    fn load(&self) -> anyhow::Result<AllocationRecord>;
    /// Sauvegarde de manière atomique.
    fn save(&self, record: &AllocationRecord) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<AllocationRecord> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let record: AllocationRecord = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(record)
    }

    fn save(&self, record: &AllocationRecord) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(record)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
