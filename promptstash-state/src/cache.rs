//! PromptCache — in-memory mirror of the prompt record store
//!
//! UI surfaces read the cached list synchronously while every mutation goes
//! through the store first. Single-record operations splice the returned
//! record into the list; wide-blast-radius operations (import, clear)
//! reconcile with a full reload. The persisted store always wins: whenever
//! the cache and store disagree, the cache resynchronizes from the store.
//!
//! Failures never propagate to the caller as panics or errors. They land in
//! the `error` field of the read model, the in-memory list stays untouched,
//! and the UI decides how to surface and clear the message.

use promptstash_storage::{NewPrompt, Prompt, PromptId, PromptPatch, PromptStore};
use tracing::warn;

/// Read model and mutation front-end over a [`PromptStore`].
///
/// Methods take `&mut self`; concurrent mutations interleave only at await
/// points. The store level accepts last-write-wins on the index, so callers
/// should serialize mutations per prompt id (e.g. disable the control while
/// a request for that id is in flight).
pub struct PromptCache {
    store: PromptStore,
    prompts: Vec<Prompt>,
    loading: bool,
    error: Option<String>,
    initialized: bool,
}

impl PromptCache {
    /// Create a cache over the given store. Call [`Self::initialize`] before reading.
    pub fn new(store: PromptStore) -> Self {
        Self {
            store,
            prompts: Vec::new(),
            loading: false,
            error: None,
            initialized: false,
        }
    }

    // --- Read model ---

    /// All cached prompts, most recently created first, including trash
    pub fn all_prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Active (not soft-deleted) prompts
    pub fn prompts(&self) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| !p.is_deleted).collect()
    }

    /// Soft-deleted prompts awaiting restore or purge
    pub fn deleted_prompts(&self) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| p.is_deleted).collect()
    }

    /// Whether a request is currently in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last failure message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether [`Self::initialize`] has completed successfully
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Clear the failure message before a retry
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // --- Lifecycle ---

    /// Run legacy migration, optional seeding, then a full load.
    ///
    /// Idempotent: a no-op when the cache is already initialized.
    pub async fn initialize(&mut self, seed: Option<Vec<NewPrompt>>) {
        if self.initialized {
            return;
        }
        self.loading = true;

        match self.initialize_inner(seed).await {
            Ok(prompts) => {
                self.prompts = prompts;
                self.initialized = true;
                self.error = None;
            }
            Err(e) => self.fail("failed to initialize prompt store", e),
        }
        self.loading = false;
    }

    async fn initialize_inner(
        &self,
        seed: Option<Vec<NewPrompt>>,
    ) -> promptstash_storage::Result<Vec<Prompt>> {
        self.store.migrate_legacy_format().await?;
        if let Some(seed) = seed {
            self.store.initialize_with_seed_data(seed).await?;
        }
        self.store.get_prompts().await
    }

    /// Reload the whole list from the store
    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.store.get_prompts().await {
            Ok(prompts) => {
                self.prompts = prompts;
                self.error = None;
            }
            Err(e) => self.fail("failed to reload prompts", e),
        }
        self.loading = false;
    }

    // --- Single-record mutations (splice reconciliation) ---

    /// Create a prompt; returns its id on success
    pub async fn add_prompt(&mut self, new: NewPrompt) -> Option<PromptId> {
        self.loading = true;
        let result = match self.store.add_prompt(new).await {
            Ok(prompt) => {
                let id = prompt.id.clone();
                self.prompts.insert(0, prompt);
                self.error = None;
                Some(id)
            }
            Err(e) => {
                self.fail("failed to add prompt", e);
                None
            }
        };
        self.loading = false;
        result
    }

    /// Merge a patch into a prompt; returns whether it succeeded
    pub async fn update_prompt(&mut self, id: &PromptId, patch: PromptPatch) -> bool {
        self.loading = true;
        let ok = match self.store.update_prompt(id, patch).await {
            Ok(updated) => {
                self.splice(updated);
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&format!("failed to update prompt {id}"), e);
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Move a prompt to the trash
    pub async fn soft_delete(&mut self, id: &PromptId) -> bool {
        self.loading = true;
        let ok = match self.store.soft_delete(id).await {
            Ok(deleted) => {
                self.splice(deleted);
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&format!("failed to delete prompt {id}"), e);
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Bring a prompt back from the trash
    pub async fn restore(&mut self, id: &PromptId) -> bool {
        self.loading = true;
        let ok = match self.store.restore(id).await {
            Ok(restored) => {
                self.splice(restored);
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&format!("failed to restore prompt {id}"), e);
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Flip a prompt's pin. A missing record drops any stale cache entry
    /// instead of failing, mirroring the store's no-op semantics.
    pub async fn toggle_pin(&mut self, id: &PromptId) {
        self.loading = true;
        match self.store.toggle_pin(id).await {
            Ok(Some(updated)) => {
                self.splice(updated);
                self.error = None;
            }
            Ok(None) => {
                // Store has no such record; the store wins
                self.prompts.retain(|p| &p.id != id);
            }
            Err(e) => self.fail(&format!("failed to toggle pin on {id}"), e),
        }
        self.loading = false;
    }

    /// Permanently delete a prompt
    pub async fn permanently_delete(&mut self, id: &PromptId) -> bool {
        self.loading = true;
        let ok = match self.store.delete_prompt(id).await {
            Ok(()) => {
                self.prompts.retain(|p| &p.id != id);
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&format!("failed to permanently delete prompt {id}"), e);
                false
            }
        };
        self.loading = false;
        ok
    }

    // --- Batch mutations (full-reload reconciliation) ---

    /// Import a batch of prompts, then reload the list from the store
    pub async fn import_prompts(&mut self, items: Vec<Prompt>) -> bool {
        self.loading = true;
        let ok = match self.store.import_prompts(items).await {
            Ok(_) => self.reload_after_batch("import").await,
            Err(e) => {
                self.fail("failed to import prompts", e);
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Delete everything, then reload (to an empty list) from the store
    pub async fn clear_all(&mut self) -> bool {
        self.loading = true;
        let ok = match self.store.clear_all().await {
            Ok(()) => self.reload_after_batch("clear").await,
            Err(e) => {
                self.fail("failed to clear prompts", e);
                false
            }
        };
        self.loading = false;
        ok
    }

    // --- Internal ---

    /// Replace the cached copy of a record, or adopt it if the cache lost
    /// track of it. The persisted store is the source of truth.
    fn splice(&mut self, updated: Prompt) {
        if let Some(slot) = self.prompts.iter_mut().find(|p| p.id == updated.id) {
            *slot = updated;
        } else {
            self.prompts.push(updated);
            self.prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
    }

    async fn reload_after_batch(&mut self, operation: &str) -> bool {
        match self.store.get_prompts().await {
            Ok(prompts) => {
                self.prompts = prompts;
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&format!("failed to reload prompts after {operation}"), e);
                false
            }
        }
    }

    fn fail(&mut self, context: &str, error: promptstash_storage::StorageError) {
        warn!(%error, "{context}");
        self.error = Some(format!("{context}: {error}"));
    }
}
