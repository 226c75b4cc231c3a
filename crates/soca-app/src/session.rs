//! Per-user session: the current batch of results, its progress, and the
//! generated text derived from it.

use std::collections::HashMap;

use soca_core::models::record::ResultRecord;

// ── Batch state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Processing {
        completed: usize,
        total: usize,
    },
    Completed,
}

impl BatchState {
    /// Fraction of the batch handled so far, `None` outside a batch.
    pub fn progress(&self) -> Option<f32> {
        match *self {
            BatchState::Processing { completed, total } if total > 0 => {
                Some(completed as f32 / total as f32)
            }
            BatchState::Processing { .. } => Some(0.0),
            _ => None,
        }
    }
}

// ── Result cache ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSummary {
    pub text: String,
    /// `false` when the text is a placeholder (e.g. the missing-credentials
    /// warning) and generation should be attempted again.
    pub generated: bool,
}

/// Generated text for the current batch.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    summary: Option<CachedSummary>,
    followups: HashMap<String, String>,
}

impl ResultCache {
    pub fn summary(&self) -> Option<&CachedSummary> {
        self.summary.as_ref()
    }

    pub fn store_summary(&mut self, text: impl Into<String>, generated: bool) {
        self.summary = Some(CachedSummary {
            text: text.into(),
            generated,
        });
    }

    pub fn evict_summary(&mut self) {
        self.summary = None;
    }

    pub fn followups(&self, name: &str) -> Option<&str> {
        self.followups.get(name).map(String::as_str)
    }

    pub fn store_followups(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.followups.insert(name.into(), text.into());
    }

    pub fn evict_followups(&mut self, name: &str) {
        self.followups.remove(name);
    }

    pub fn invalidate_all(&mut self) {
        self.summary = None;
        self.followups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.followups.is_empty()
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Session {
    state: BatchState,
    results: Vec<ResultRecord>,
    cache: ResultCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn record(&self, name: &str) -> Option<&ResultRecord> {
        self.results.iter().find(|r| r.name() == name)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ResultCache {
        &mut self.cache
    }

    /// Start a new batch, discarding the previous results and everything
    /// generated from them.
    pub fn begin_batch(&mut self, total: usize) {
        self.results.clear();
        self.cache.invalidate_all();
        self.state = BatchState::Processing {
            completed: 0,
            total,
        };
        tracing::info!(total, "batch started");
    }

    /// Mark one document as handled, storing its record if it produced
    /// one. Returns the progress fraction after this document.
    pub fn advance(&mut self, record: Option<ResultRecord>) -> f32 {
        if let Some(record) = record {
            self.results.push(record);
        }
        if let BatchState::Processing { completed, total } = &mut self.state {
            *completed = (*completed + 1).min(*total);
        }
        self.state.progress().unwrap_or(1.0)
    }

    pub fn complete(&mut self) {
        self.state = BatchState::Completed;
        tracing::info!(results = self.results.len(), "batch completed");
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.cache.invalidate_all();
        self.state = BatchState::Idle;
    }

    /// A display name not yet used in this batch: `name`, or `name (2)`,
    /// `name (3)` and so on.
    pub fn unique_name(&self, name: &str) -> String {
        if self.record(name).is_none() {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| self.record(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }
}
