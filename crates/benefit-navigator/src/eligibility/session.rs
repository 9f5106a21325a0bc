use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::context::{EligibilityThresholds, EvaluationContext};
use super::domain::FormData;
use super::progress::FormProgress;
use super::registry::{CycleResult, EligibilityRegistry, RegistryState};
use super::store::{AnswerStore, StoreError, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's pass through the questionnaire.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    pub user_id: Option<UserId>,
    pub state: RegistryState,
    pub cycles: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub answers: FormData,
    #[serde(default)]
    pub prefill: Option<FormData>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl RefreshRequest {
    pub fn new(answers: FormData) -> Self {
        Self {
            answers,
            prefill: None,
            today: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    #[serde(flatten)]
    pub cycle: CycleResult,
    pub progress: FormProgress,
}

/// Owns the registry state of every open session and serializes cycles per session.
pub struct EligibilitySessionService<S> {
    registry: EligibilityRegistry,
    store: Arc<S>,
    thresholds: EligibilityThresholds,
    sessions: Mutex<HashMap<SessionId, Arc<Mutex<FormSession>>>>,
    sequence: AtomicU64,
}

impl<S> EligibilitySessionService<S>
where
    S: AnswerStore + 'static,
{
    pub fn new(registry: EligibilityRegistry, store: Arc<S>) -> Self {
        Self::with_thresholds(registry, store, EligibilityThresholds::default())
    }

    pub fn with_thresholds(
        registry: EligibilityRegistry,
        store: Arc<S>,
        thresholds: EligibilityThresholds,
    ) -> Self {
        Self {
            registry,
            store,
            thresholds,
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn registry(&self) -> &EligibilityRegistry {
        &self.registry
    }

    pub fn create_session(&self, user_id: Option<UserId>) -> SessionId {
        let id = SessionId(format!(
            "session-{:06}",
            self.sequence.fetch_add(1, Ordering::Relaxed)
        ));
        let session = FormSession {
            user_id,
            ..FormSession::default()
        };

        self.lock_sessions()
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// Run one evaluation cycle for `id`.
    ///
    /// A cycle already running on the same session makes this call fail with
    /// [`SessionError::Busy`] instead of waiting.
    pub fn refresh(
        &self,
        id: &SessionId,
        request: RefreshRequest,
    ) -> Result<RefreshOutcome, SessionError> {
        let handle = self.handle(id).ok_or(SessionError::NotFound)?;
        let mut session = match handle.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(SessionError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let RefreshRequest {
            answers,
            prefill,
            today,
        } = request;

        let prefill = match prefill {
            Some(prefill) => Some(prefill),
            None => match &session.user_id {
                Some(user) => self.stored_answers(user)?,
                None => None,
            },
        };

        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let context = EvaluationContext::with_thresholds(today, self.thresholds.clone());

        let (state, cycle) =
            self.registry
                .evaluate(&session.state, &answers, prefill.as_ref(), &context);
        session.state = state;
        session.cycles += 1;

        let progress = FormProgress::from_cycle(&cycle, &answers.merged(&cycle.prefilled_fields));

        info!(
            session = %id,
            cycle = session.cycles,
            eligible = cycle.eligible.len(),
            incomplete = cycle.incomplete.len(),
            sections = cycle.visible_sections.len(),
            progress = progress.percent,
            "eligibility cycle settled"
        );

        Ok(RefreshOutcome { cycle, progress })
    }

    pub fn end_session(&self, id: &SessionId) -> Result<(), SessionError> {
        self.lock_sessions()
            .remove(id)
            .map(|_| ())
            .ok_or(SessionError::NotFound)
    }

    pub fn load_answers(&self, user: &UserId) -> Result<FormData, SessionError> {
        Ok(self.store.load(user)?.ok_or(StoreError::NotFound)?)
    }

    pub fn save_answers(&self, user: &UserId, answers: &FormData) -> Result<(), SessionError> {
        self.store.save(user, answers)?;
        Ok(())
    }

    fn stored_answers(&self, user: &UserId) -> Result<Option<FormData>, SessionError> {
        match self.store.load(user) {
            Ok(answers) => Ok(answers),
            Err(StoreError::NotFound) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }

    pub(crate) fn handle(&self, id: &SessionId) -> Option<Arc<Mutex<FormSession>>> {
        self.lock_sessions().get(id).cloned()
    }

    fn lock_sessions(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<SessionId, Arc<Mutex<FormSession>>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,
    #[error("an evaluation cycle is already running for this session")]
    Busy,
    #[error(transparent)]
    Store(#[from] StoreError),
}
