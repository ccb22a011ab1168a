//! Prompt record store
//!
//! Single source of truth for durable prompt data. Each prompt is persisted
//! under its own `prompt:<id>` key and the `prompts_index` key holds the
//! ordered list of ids, most-recent-first. Keeping records individually
//! addressed avoids rewriting every prompt whenever one changes.
//!
//! There is no cross-key atomicity. Operations order their writes so that a
//! crash between the record write and the index write leaves at worst an
//! orphan record (recoverable), never an index entry pointing at nothing.
//! `get_prompts` still tolerates dangling index entries by skipping them
//! with a warning.

use crate::error::{Result, StorageError};
use crate::kv::KeyValueStore;
use crate::types::{NewPrompt, Prompt, PromptId, PromptPatch, Settings, SidebarState};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const PROMPT_KEY_PREFIX: &str = "prompt:";
const INDEX_KEY: &str = "prompts_index";
const SETTINGS_KEY: &str = "settings";
const SIDEBAR_KEY: &str = "sidebar";
/// Pre-per-record layout: a single JSON array of all prompts.
const LEGACY_PROMPTS_KEY: &str = "prompts";

/// Diagnostic storage counters, not used for quota enforcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Number of ids in the index
    pub count: usize,
    /// Summed serialized length of all records, in bytes
    pub total_size: usize,
}

/// Store for prompt records and their ordering index
pub struct PromptStore {
    kv: Arc<dyn KeyValueStore>,
}

impl PromptStore {
    /// Create a store over the given key-value backend
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    fn record_key(id: &PromptId) -> String {
        format!("{PROMPT_KEY_PREFIX}{id}")
    }

    async fn read_index(&self) -> Result<Vec<PromptId>> {
        match self.kv.get(INDEX_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_index(&self, index: &[PromptId]) -> Result<()> {
        let raw = serde_json::to_string(index)?;
        self.kv.set(INDEX_KEY, &raw).await
    }

    async fn write_record(&self, prompt: &Prompt) -> Result<()> {
        let raw = serde_json::to_string(prompt)?;
        self.kv.set(&Self::record_key(&prompt.id), &raw).await
    }

    /// Read one record. Absence is `None`, not an error.
    pub async fn get_prompt(&self, id: &PromptId) -> Result<Option<Prompt>> {
        match self.kv.get(&Self::record_key(id)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read every indexed record, most recently created first.
    ///
    /// Index entries whose record is missing or unparseable are skipped with
    /// a warning rather than failing the whole read; that state arises from a
    /// torn multi-key write and heals on the next successful write of the id.
    pub async fn get_prompts(&self) -> Result<Vec<Prompt>> {
        let index = self.read_index().await?;
        let mut prompts = Vec::with_capacity(index.len());

        for id in &index {
            match self.kv.get(&Self::record_key(id)).await? {
                Some(raw) => match serde_json::from_str::<Prompt>(&raw) {
                    Ok(prompt) => prompts.push(prompt),
                    Err(e) => {
                        warn!(id = %id, error = %e, "skipping unparseable prompt record");
                    }
                },
                None => {
                    warn!(id = %id, "index entry without a record, skipping");
                }
            }
        }

        prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prompts)
    }

    /// All prompts that are not soft-deleted
    pub async fn get_active_prompts(&self) -> Result<Vec<Prompt>> {
        Ok(self
            .get_prompts()
            .await?
            .into_iter()
            .filter(|p| !p.is_deleted)
            .collect())
    }

    /// The trash: soft-deleted prompts awaiting restore or purge
    pub async fn get_deleted_prompts(&self) -> Result<Vec<Prompt>> {
        Ok(self
            .get_prompts()
            .await?
            .into_iter()
            .filter(|p| p.is_deleted)
            .collect())
    }

    /// Create a prompt: fresh unique id, `created_at = now`, record written,
    /// id prepended to the index.
    pub async fn add_prompt(&self, new: NewPrompt) -> Result<Prompt> {
        if new.title.trim().is_empty() {
            return Err(StorageError::invalid("title cannot be empty"));
        }
        if new.content.trim().is_empty() {
            return Err(StorageError::invalid("content cannot be empty"));
        }

        let mut index = self.read_index().await?;

        let mut id = PromptId::generate();
        while index.contains(&id) {
            id = PromptId::generate();
        }

        let now = Utc::now();
        let prompt = Prompt {
            id: id.clone(),
            title: new.title,
            content: new.content,
            tags: new.tags,
            is_pinned: new.is_pinned,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };

        // Record before index: a crash in between leaves an orphan record,
        // never a dangling index pointer.
        self.write_record(&prompt).await?;
        index.insert(0, id);
        self.write_index(&index).await?;

        Ok(prompt)
    }

    /// Merge a patch into an existing record and bump `updated_at`.
    ///
    /// Fails with [`StorageError::NotFound`] when no record exists for `id`.
    /// The index is untouched.
    pub async fn update_prompt(&self, id: &PromptId, patch: PromptPatch) -> Result<Prompt> {
        let mut prompt = self
            .get_prompt(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(StorageError::invalid("title cannot be empty"));
            }
            prompt.title = title;
        }
        if let Some(content) = patch.content {
            if content.trim().is_empty() {
                return Err(StorageError::invalid("content cannot be empty"));
            }
            prompt.content = content;
        }
        if let Some(tags) = patch.tags {
            prompt.tags = tags;
        }
        if let Some(pinned) = patch.is_pinned {
            prompt.is_pinned = pinned;
        }
        if let Some(deleted) = patch.is_deleted {
            prompt.is_deleted = deleted;
        }
        if let Some(deleted_at) = patch.deleted_at {
            prompt.deleted_at = deleted_at;
        }
        prompt.updated_at = Utc::now();

        self.write_record(&prompt).await?;
        Ok(prompt)
    }

    /// Mark a prompt deleted without removing it; restorable via [`Self::restore`]
    pub async fn soft_delete(&self, id: &PromptId) -> Result<Prompt> {
        let patch = PromptPatch::default()
            .deleted(true)
            .deleted_at(Some(Utc::now()));
        self.update_prompt(id, patch).await
    }

    /// Clear the soft-delete markers on a prompt
    pub async fn restore(&self, id: &PromptId) -> Result<Prompt> {
        let patch = PromptPatch::default().deleted(false).deleted_at(None);
        self.update_prompt(id, patch).await
    }

    /// Flip `is_pinned` on a record.
    ///
    /// Unlike [`Self::update_prompt`], a missing record is a silent no-op:
    /// pin toggles fire from transient UI and must not crash a render path.
    pub async fn toggle_pin(&self, id: &PromptId) -> Result<Option<Prompt>> {
        let Some(mut prompt) = self.get_prompt(id).await? else {
            debug!(id = %id, "toggle_pin on a missing prompt, ignoring");
            return Ok(None);
        };

        prompt.is_pinned = !prompt.is_pinned;
        prompt.updated_at = Utc::now();
        self.write_record(&prompt).await?;
        Ok(Some(prompt))
    }

    /// Permanently remove a record and its index entry. Irreversible.
    pub async fn delete_prompt(&self, id: &PromptId) -> Result<()> {
        self.kv.remove(&Self::record_key(id)).await?;

        let mut index = self.read_index().await?;
        index.retain(|entry| entry != id);
        self.write_index(&index).await
    }

    /// Import a batch of prompts, never overwriting existing records.
    ///
    /// Items whose id already exists in the index (or collides within the
    /// batch) are assigned a fresh id and a fresh `created_at`. The whole
    /// batch is prepended to the index with import order preserved.
    pub async fn import_prompts(&self, items: Vec<Prompt>) -> Result<Vec<Prompt>> {
        let mut index = self.read_index().await?;
        let mut taken: HashSet<PromptId> = index.iter().cloned().collect();
        let mut imported = Vec::with_capacity(items.len());

        for mut item in items {
            if item.id.as_str().is_empty() || taken.contains(&item.id) {
                item.id = PromptId::generate();
                item.created_at = Utc::now();
                item.updated_at = item.created_at;
            }
            taken.insert(item.id.clone());

            self.write_record(&item).await?;
            imported.push(item);
        }

        let mut new_index: Vec<PromptId> = imported.iter().map(|p| p.id.clone()).collect();
        new_index.append(&mut index);
        self.write_index(&new_index).await?;

        debug!(count = imported.len(), "imported prompt batch");
        Ok(imported)
    }

    /// Bootstrap the store with seed prompts, only when it is empty.
    ///
    /// Returns whether the seed was applied. Idempotent: a populated store
    /// (even by a previous seeding) is never clobbered.
    pub async fn initialize_with_seed_data(&self, seed: Vec<NewPrompt>) -> Result<bool> {
        let index = self.read_index().await?;
        if !index.is_empty() {
            debug!("store already has prompts, skipping seed");
            return Ok(false);
        }

        // Reverse so the first seed entry ends up most recent
        for item in seed.into_iter().rev() {
            self.add_prompt(item).await?;
        }
        Ok(true)
    }

    /// Delete every indexed record, then the index itself
    pub async fn clear_all(&self) -> Result<()> {
        let index = self.read_index().await?;
        for id in &index {
            self.kv.remove(&Self::record_key(id)).await?;
        }
        self.kv.remove(INDEX_KEY).await
    }

    /// Diagnostic counters: index length and summed record sizes
    pub async fn storage_stats(&self) -> Result<StorageStats> {
        let index = self.read_index().await?;
        let mut total_size = 0;
        for id in &index {
            if let Some(raw) = self.kv.get(&Self::record_key(id)).await? {
                total_size += raw.len();
            }
        }
        Ok(StorageStats {
            count: index.len(),
            total_size,
        })
    }

    /// Fan a legacy single-blob prompt array out into per-id records plus
    /// the index, then delete the legacy key.
    ///
    /// Safe to call repeatedly: a no-op when the legacy key is absent.
    /// Where a legacy entry collides with an existing record, the existing
    /// per-record data wins.
    pub async fn migrate_legacy_format(&self) -> Result<usize> {
        let Some(raw) = self.kv.get(LEGACY_PROMPTS_KEY).await? else {
            return Ok(0);
        };

        let legacy: Vec<Prompt> = match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "legacy prompt blob is unparseable, leaving it in place");
                return Ok(0);
            }
        };

        let mut index = self.read_index().await?;
        let mut existing: HashSet<PromptId> = index.iter().cloned().collect();
        let mut migrated = 0;

        for prompt in &legacy {
            // Legacy ids were wall-clock timestamps, so the blob itself can
            // repeat an id; the set keeps the index duplicate-free either way.
            if !existing.insert(prompt.id.clone()) {
                continue;
            }
            self.write_record(prompt).await?;
            index.push(prompt.id.clone());
            migrated += 1;
        }

        self.write_index(&index).await?;
        self.kv.remove(LEGACY_PROMPTS_KEY).await?;

        debug!(migrated, "migrated legacy prompt blob to per-record storage");
        Ok(migrated)
    }

    /// Load user settings, merging defaults for missing fields
    pub async fn settings(&self) -> Result<Settings> {
        match self.kv.get(SETTINGS_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => Ok(settings),
                Err(e) => {
                    warn!(error = %e, "settings record is unparseable, using defaults");
                    Ok(Settings::default())
                }
            },
            None => Ok(Settings::default()),
        }
    }

    /// Persist user settings
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.kv.set(SETTINGS_KEY, &raw).await
    }

    /// Load sidebar state, merging defaults for missing fields
    pub async fn sidebar_state(&self) -> Result<SidebarState> {
        match self.kv.get(SIDEBAR_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(error = %e, "sidebar record is unparseable, using defaults");
                    Ok(SidebarState::default())
                }
            },
            None => Ok(SidebarState::default()),
        }
    }

    /// Persist sidebar state
    pub async fn save_sidebar_state(&self, state: &SidebarState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.kv.set(SIDEBAR_KEY, &raw).await
    }
}
