//! Mapping between wizard state and Persisted Store keys.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::completion::CompletionSet;
use crate::models::advice::CareerAdviceResponse;
use crate::models::session::{Level, SessionContext};
use crate::store::{
    KeyValueStore, StoreError, StoreWrite, ADVICE_KEY, COMPLETED_WEEKS_KEY, LEVEL_KEY, ROLE_KEY,
    WIZARD_KEYS,
};

/// Persisted data failed to decode. Recovered by discarding the whole store.
#[derive(Debug, Error)]
#[error("persisted key '{key}' is corrupt: {reason}")]
pub struct CorruptStateError {
    pub key: &'static str,
    pub reason: String,
}

/// Everything the store holds for the wizard, decoded.
#[derive(Debug, Default)]
pub struct PersistedWizard {
    pub session: SessionContext,
    pub advice: Option<CareerAdviceResponse>,
    pub completed: Option<CompletionSet>,
}

pub fn load(store: &dyn KeyValueStore) -> Result<PersistedWizard, CorruptStateError> {
    let role: Option<String> = decode(store, ROLE_KEY)?;
    let level: Option<Level> = decode(store, LEVEL_KEY)?;
    let advice = decode::<CareerAdviceResponse>(store, ADVICE_KEY)?
        .map(|advice| {
            advice.validated().map_err(|e| CorruptStateError {
                key: ADVICE_KEY,
                reason: e.to_string(),
            })
        })
        .transpose()?;
    let completed = decode(store, COMPLETED_WEEKS_KEY)?;

    Ok(PersistedWizard {
        session: SessionContext {
            role: role.filter(|r| !r.trim().is_empty()),
            level,
        },
        advice,
        completed,
    })
}

fn decode<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
) -> Result<Option<T>, CorruptStateError> {
    store
        .get(key)
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|e| CorruptStateError {
                key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<StoreWrite, StoreError> {
    Ok(StoreWrite::set(key, serde_json::to_string(value)?))
}

pub fn session_writes(session: &SessionContext) -> Result<Vec<StoreWrite>, StoreError> {
    let role = match &session.role {
        Some(role) => encode(ROLE_KEY, role)?,
        None => StoreWrite::remove(ROLE_KEY),
    };
    let level = match &session.level {
        Some(level) => encode(LEVEL_KEY, level)?,
        None => StoreWrite::remove(LEVEL_KEY),
    };
    Ok(vec![role, level])
}

/// New advice and an empty completion set, written together.
pub fn advice_writes(advice: &CareerAdviceResponse) -> Result<Vec<StoreWrite>, StoreError> {
    Ok(vec![
        encode(ADVICE_KEY, advice)?,
        encode(COMPLETED_WEEKS_KEY, &CompletionSet::new())?,
    ])
}

pub fn write_completion(
    store: &mut dyn KeyValueStore,
    completed: &CompletionSet,
) -> Result<(), StoreError> {
    store.set(COMPLETED_WEEKS_KEY, serde_json::to_string(completed)?)
}

pub fn reset_writes() -> Vec<StoreWrite> {
    WIZARD_KEYS.iter().map(|key| StoreWrite::remove(key)).collect()
}
