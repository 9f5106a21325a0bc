use benefit_navigator::eligibility::{AnswerStore, FormData, StoreError, UserId};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnswerStore {
    answers: Arc<Mutex<HashMap<UserId, FormData>>>,
}

impl AnswerStore for InMemoryAnswerStore {
    fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError> {
        let guard = self.answers.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(user).cloned())
    }

    fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError> {
        let mut guard = self.answers.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(user.clone(), answers.clone());
        Ok(())
    }
}

/// One pretty-printed JSON document per user inside `root`.
#[derive(Debug, Clone)]
pub(crate) struct FileAnswerStore {
    root: PathBuf,
}

impl FileAnswerStore {
    pub(crate) fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, user: &UserId) -> PathBuf {
        let file_name: String = user
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

impl AnswerStore for FileAnswerStore {
    fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError> {
        let bytes = match fs::read(self.path_for(user)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Unavailable(err.to_string())),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| StoreError::Unavailable(format!("corrupt answers for {user}: {err}")))
    }

    fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(answers)
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        fs::write(self.path_for(user), payload)
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

/// Store selected at startup from `APP_ANSWER_STORE_DIR`.
#[derive(Clone)]
pub(crate) enum ConfiguredAnswerStore {
    Memory(InMemoryAnswerStore),
    File(FileAnswerStore),
}

impl ConfiguredAnswerStore {
    pub(crate) fn from_dir(dir: Option<&Path>) -> std::io::Result<Self> {
        match dir {
            Some(dir) => Ok(Self::File(FileAnswerStore::open(dir)?)),
            None => Ok(Self::Memory(InMemoryAnswerStore::default())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => store.root().display().to_string(),
        }
    }
}

impl AnswerStore for ConfiguredAnswerStore {
    fn load(&self, user: &UserId) -> Result<Option<FormData>, StoreError> {
        match self {
            Self::Memory(store) => store.load(user),
            Self::File(store) => store.load(user),
        }
    }

    fn save(&self, user: &UserId, answers: &FormData) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.save(user, answers),
            Self::File(store) => store.save(user, answers),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
