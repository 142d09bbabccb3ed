//! Service state
//!
//! Each service moves `Uninitialized → Ready` exactly once, at startup.
//! A `ModelSlot` is a write-once cell; after `main` fills it, nothing
//! ever writes to it again.

use std::sync::{Arc, OnceLock};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::inference::{HeartClassifier, SymptomClassifier, TumorClassifier};

/// Loaded artifact plus where and when it came from
struct Loaded<T> {
    model: Arc<T>,
    source: String,
    loaded_at: DateTime<Utc>,
}

/// Write-once readiness slot for one service
pub struct ModelSlot<T> {
    name: &'static str,
    inner: Arc<OnceLock<Loaded<T>>>,
}

impl<T> Clone for ModelSlot<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Slot status for `/health`
#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub ready: bool,
    pub source: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl<T> ModelSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(OnceLock::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Move the slot to `Ready`; a second call is an error
    pub fn fill(&self, model: T, source: impl Into<String>) -> anyhow::Result<()> {
        let loaded = Loaded {
            model: Arc::new(model),
            source: source.into(),
            loaded_at: Utc::now(),
        };
        self.inner
            .set(loaded)
            .map_err(|_| anyhow::anyhow!("{} model already loaded", self.name))?;

        tracing::info!("{} service ready", self.name);
        Ok(())
    }

    /// The loaded model, or `NotReadyError`
    pub fn ready(&self) -> AppResult<Arc<T>> {
        self.inner
            .get()
            .map(|l| Arc::clone(&l.model))
            .ok_or(AppError::NotReadyError(self.name))
    }

    pub fn status(&self) -> SlotStatus {
        match self.inner.get() {
            Some(l) => SlotStatus {
                ready: true,
                source: Some(l.source.clone()),
                loaded_at: Some(l.loaded_at),
            },
            None => SlotStatus { ready: false, source: None, loaded_at: None },
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tumor: ModelSlot<TumorClassifier>,
    pub heart: ModelSlot<HeartClassifier>,
    pub symptoms: ModelSlot<SymptomClassifier>,
}

impl AppState {
    /// All services `Uninitialized`
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tumor: ModelSlot::new("tumor"),
            heart: ModelSlot::new("heart"),
            symptoms: ModelSlot::new("symptom"),
        }
    }

    /// Load every configured artifact. Blocking; call before serving.
    ///
    /// Unconfigured services stay `Uninitialized`. A configured artifact
    /// that fails to load is fatal.
    pub fn load_models(&self) -> anyhow::Result<()> {
        let config = &self.config;

        match &config.tumor_model_path {
            Some(path) => {
                let model = TumorClassifier::load(
                    path,
                    config.tumor_class_names.clone(),
                    config.tumor_image_size,
                )
                .with_context(|| format!("Model initialization error: {}", path.display()))?;
                let source = model.source().to_string();
                self.tumor.fill(model, source)?;
            }
            None => tracing::warn!("TUMOR_MODEL_PATH not set, /predict will answer 503"),
        }

        match &config.heart_model_dir {
            Some(dir) => {
                let model = HeartClassifier::load(dir)
                    .with_context(|| format!("Model initialization error: {}", dir.display()))?;
                let source = model.source().to_string();
                self.heart.fill(model, source)?;
            }
            None => tracing::warn!("HEART_MODEL_DIR not set, /hd will answer 503"),
        }

        match &config.symptom_model_dir {
            Some(dir) => {
                let model = SymptomClassifier::load(dir)
                    .with_context(|| format!("Model initialization error: {}", dir.display()))?;
                let source = model.source().to_string();
                self.symptoms.fill(model, source)?;
            }
            None => tracing::warn!("SYMPTOM_MODEL_DIR not set, /model will answer 503"),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_transitions_once() {
        let slot: ModelSlot<u32> = ModelSlot::new("demo");
        assert!(matches!(slot.ready(), Err(AppError::NotReadyError("demo"))));
        assert!(!slot.status().ready);

        slot.fill(7, "memory").unwrap();
        assert_eq!(*slot.ready().unwrap(), 7);
        assert_eq!(slot.status().source.as_deref(), Some("memory"));

        assert!(slot.fill(8, "again").is_err());
        assert_eq!(*slot.ready().unwrap(), 7);
    }

    #[test]
    fn test_clones_share_readiness() {
        let slot: ModelSlot<&str> = ModelSlot::new("demo");
        let clone = slot.clone();
        slot.fill("x", "memory").unwrap();
        assert!(clone.ready().is_ok());
    }

    #[test]
    fn test_unconfigured_state_loads_nothing() {
        let state = AppState::new(Config::default());
        state.load_models().unwrap();
        assert!(state.tumor.ready().is_err());
        assert!(state.heart.ready().is_err());
        assert!(state.symptoms.ready().is_err());
    }

    #[test]
    fn test_bad_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            heart_model_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let state = AppState::new(config);

        let err = state.load_models().unwrap_err();
        assert!(err.to_string().contains("Model initialization error"));
        assert!(state.heart.ready().is_err());
    }
}
