use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::db::Database;
use crate::services::draft::DocumentDraft;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no document is open in the editor")]
    NoOpenDraft,
    #[error("state lock poisoned")]
    LockPoisoned,
}

// All mutations are synchronous and applied to the single in-memory draft
// before the next render; the store itself is last-writer-wins.
pub struct AppState {
    db: Mutex<Database>,
    draft: Mutex<Option<DocumentDraft>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            db: Mutex::new(db),
            draft: Mutex::new(None),
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Database>, StateError> {
        self.db.lock().map_err(|_| StateError::LockPoisoned)
    }

    pub fn set_draft(&self, draft: DocumentDraft) -> Result<(), StateError> {
        let mut guard = self.draft.lock().map_err(|_| StateError::LockPoisoned)?;
        *guard = Some(draft);
        Ok(())
    }

    pub fn with_draft<T>(
        &self,
        f: impl FnOnce(&mut DocumentDraft) -> T,
    ) -> Result<T, StateError> {
        let mut guard = self.draft.lock().map_err(|_| StateError::LockPoisoned)?;
        let draft = guard.as_mut().ok_or(StateError::NoOpenDraft)?;
        Ok(f(draft))
    }
}
