// file.rs — JsonFileStore: RecordStore backed by JSON files on disk.
//
// Layout under the store root:
//   profiles/<owner>.json
//   goals/<owner>/<YYYY-MM>.json
//   plans/<owner>/<YYYY-MM-DD>.json
//   plan-index/<plan_id>.json   (owner + date of the plan with that id)
//
// Every write goes to a `.tmp` sibling first and is renamed into place, so a
// reader never observes a half-written record. Writes are serialized through
// a single lock so read-modify-write updates of plan counters don't interleave.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::{ActivityType, BusinessProfile, DailyPlan, MonthKey, MonthlyGoal, OwnerId};
use crate::store::RecordStore;

/// File-based record store. One JSON file per record.
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

/// Where the plan with a given id lives on disk.
#[derive(Debug, Serialize, Deserialize)]
struct PlanPointer {
    owner: OwnerId,
    date: NaiveDate,
}

impl JsonFileStore {
    /// Create a new store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|source| io_error(&root, source))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn profile_file(&self, owner: &OwnerId) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join("profiles")
            .join(format!("{}.json", owner_segment(owner)?)))
    }

    fn goal_file(&self, owner: &OwnerId, month: MonthKey) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join("goals")
            .join(owner_segment(owner)?)
            .join(format!("{}.json", month)))
    }

    fn plan_file(&self, owner: &OwnerId, date: NaiveDate) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join("plans")
            .join(owner_segment(owner)?)
            .join(format!("{}.json", date.format("%Y-%m-%d"))))
    }

    fn index_file(&self, plan_id: Uuid) -> PathBuf {
        self.root
            .join("plan-index")
            .join(format!("{}.json", plan_id))
    }

    /// Locate a plan by id. Caller must hold the write lock.
    ///
    /// The index pointer is tried first. A missing, unreadable, or stale
    /// pointer falls back to scanning the plans tree, and a plan found that
    /// way gets its pointer rewritten.
    async fn find_plan(&self, plan_id: Uuid) -> Result<Option<(PathBuf, DailyPlan)>, StoreError> {
        let index = self.index_file(plan_id);
        match read_record::<PlanPointer>(&index).await {
            Ok(Some(pointer)) => {
                let path = self.plan_file(&pointer.owner, pointer.date)?;
                if let Some(plan) = read_record::<DailyPlan>(&path).await? {
                    if plan.plan_id == plan_id {
                        return Ok(Some((path, plan)));
                    }
                }
                tracing::warn!(%plan_id, path = %path.display(), "stale plan index entry, scanning plans");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%plan_id, error = %e, "unreadable plan index entry, scanning plans");
            }
        }

        let found = self.scan_for_plan(plan_id).await?;
        if let Some((_, plan)) = &found {
            write_record(
                &index,
                &PlanPointer {
                    owner: plan.owner.clone(),
                    date: plan.date,
                },
            )
            .await?;
        }
        Ok(found)
    }

    /// Walk every owner's plans looking for `plan_id`. Files that fail to
    /// parse are skipped.
    async fn scan_for_plan(
        &self,
        plan_id: Uuid,
    ) -> Result<Option<(PathBuf, DailyPlan)>, StoreError> {
        let plans_dir = self.root.join("plans");
        let Some(mut owners) = read_dir_if_exists(&plans_dir).await? else {
            return Ok(None);
        };

        while let Some(owner_dir) = owners
            .next_entry()
            .await
            .map_err(|source| io_error(&plans_dir, source))?
        {
            let owner_path = owner_dir.path();
            let is_dir = owner_dir
                .file_type()
                .await
                .map_err(|source| io_error(&owner_path, source))?
                .is_dir();
            if !is_dir {
                continue;
            }
            let Some(mut files) = read_dir_if_exists(&owner_path).await? else {
                continue;
            };
            while let Some(entry) = files
                .next_entry()
                .await
                .map_err(|source| io_error(&owner_path, source))?
            {
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                match read_record::<DailyPlan>(&path).await {
                    Ok(Some(plan)) if plan.plan_id == plan_id => return Ok(Some((path, plan))),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable plan file");
                    }
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn get_profile(&self, owner: &OwnerId) -> Result<Option<BusinessProfile>, StoreError> {
        read_record(&self.profile_file(owner)?).await
    }

    async fn upsert_profile(&self, profile: &BusinessProfile) -> Result<(), StoreError> {
        let path = self.profile_file(&profile.owner)?;
        let _guard = self.write_lock.lock().await;
        write_record(&path, profile).await
    }

    async fn get_goal(
        &self,
        owner: &OwnerId,
        month: MonthKey,
    ) -> Result<Option<MonthlyGoal>, StoreError> {
        read_record(&self.goal_file(owner, month)?).await
    }

    async fn upsert_goal(&self, goal: &MonthlyGoal) -> Result<(), StoreError> {
        let path = self.goal_file(&goal.owner, goal.month)?;
        let _guard = self.write_lock.lock().await;
        write_record(&path, goal).await
    }

    async fn get_plan(
        &self,
        owner: &OwnerId,
        date: NaiveDate,
    ) -> Result<Option<DailyPlan>, StoreError> {
        read_record(&self.plan_file(owner, date)?).await
    }

    async fn insert_plan(&self, plan: &DailyPlan) -> Result<(), StoreError> {
        let path = self.plan_file(&plan.owner, plan.date)?;
        let _guard = self.write_lock.lock().await;
        let exists = fs::try_exists(&path)
            .await
            .map_err(|source| io_error(&path, source))?;
        if exists {
            return Err(StoreError::PlanConflict {
                owner: plan.owner.clone(),
                date: plan.date,
            });
        }
        write_record(&path, plan).await?;

        let pointer = PlanPointer {
            owner: plan.owner.clone(),
            date: plan.date,
        };
        if let Err(e) = write_record(&self.index_file(plan.plan_id), &pointer).await {
            tracing::warn!(plan_id = %plan.plan_id, error = %e, "plan saved without index entry");
        }
        Ok(())
    }

    async fn update_plan_field(
        &self,
        plan_id: Uuid,
        activity: ActivityType,
        delta: u32,
    ) -> Result<Option<DailyPlan>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some((path, mut plan)) = self.find_plan(plan_id).await? else {
            return Ok(None);
        };
        let counter = plan.completed_mut(activity);
        *counter = counter.saturating_add(delta);
        write_record(&path, &plan).await?;
        tracing::debug!(%plan_id, field = activity.completed_field(), delta, "plan counter updated");
        Ok(Some(plan))
    }
}

/// Owner ids become path segments, so they must not escape the store root.
fn owner_segment(owner: &OwnerId) -> Result<&str, StoreError> {
    let id = owner.as_str();
    if id.is_empty()
        || id.starts_with('.')
        || id.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidKey(format!("owner id '{}'", id)));
    }
    Ok(id)
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(path, source)),
    }
}

async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| io_error(parent, source))?;
    }
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .await
        .map_err(|source| io_error(&tmp, source))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|source| io_error(path, source))?;
    Ok(())
}

async fn read_dir_if_exists(dir: &Path) -> Result<Option<fs::ReadDir>, StoreError> {
    match fs::read_dir(dir).await {
        Ok(entries) => Ok(Some(entries)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(dir, source)),
    }
}

fn io_error(path: &Path, source: io::Error) -> StoreError {
    StoreError::IoError {
        path: path.display().to_string(),
        source,
    }
}
