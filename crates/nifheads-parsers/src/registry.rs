//! Decoder registry for scene-file format discovery.
//!
//! The registry maps file extensions to decoders so the pipeline can pick a
//! decoder per scene file without knowing the concrete formats. New decoders
//! are added by registering them, without touching the pipeline.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::warn;

use crate::dump::SceneDumpDecoder;
use crate::traits::{SceneDecoder, SharedDecoder};

/// Registration entry for a decoder
pub struct DecoderRegistration {
    /// Unique identifier for this decoder
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this decoder handles
    pub description: String,
    /// File extensions handled (lowercase)
    pub extensions: Vec<String>,
    /// Priority for extension conflicts (higher = preferred)
    pub priority: i32,
    /// Decoder instance
    pub decoder: SharedDecoder,
}

/// Registry of available scene decoders
pub struct DecoderRegistry {
    /// Map of decoder ID to registration
    decoders: RwLock<HashMap<String, DecoderRegistration>>,
    /// Map of extensions to decoder IDs (sorted by priority)
    extension_map: RwLock<HashMap<String, Vec<String>>>,
}

impl DecoderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            decoders: RwLock::new(HashMap::new()),
            extension_map: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry holding every built-in decoder
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        register_builtin_decoders(&registry);
        registry
    }

    /// Register a new decoder
    pub fn register(&self, registration: DecoderRegistration) -> Result<(), RegistryError> {
        let id = registration.id.clone();

        let mut decoders = self.decoders.write().map_err(|_| RegistryError::LockPoisoned)?;
        if decoders.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }

        let mut ext_map = self.extension_map.write().map_err(|_| RegistryError::LockPoisoned)?;
        let priority = registration.priority;

        for ext in &registration.extensions {
            let ids = ext_map.entry(ext.to_lowercase()).or_default();
            ids.push(id.clone());

            // Sort by priority (descending)
            ids.sort_by_key(|other| {
                let p = if *other == id {
                    priority
                } else {
                    decoders.get(other).map(|d| d.priority).unwrap_or(0)
                };
                std::cmp::Reverse(p)
            });
        }

        decoders.insert(id, registration);
        Ok(())
    }

    /// Unregister a decoder by ID
    pub fn unregister(&self, id: &str) -> Result<(), RegistryError> {
        let mut decoders = self.decoders.write().map_err(|_| RegistryError::LockPoisoned)?;
        let mut ext_map = self.extension_map.write().map_err(|_| RegistryError::LockPoisoned)?;

        let registration = decoders
            .remove(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        for ext in &registration.extensions {
            if let Some(ids) = ext_map.get_mut(&ext.to_lowercase()) {
                ids.retain(|i| i != id);
            }
        }

        Ok(())
    }

    /// Get a decoder by ID
    pub fn get(&self, id: &str) -> Result<SharedDecoder, RegistryError> {
        let decoders = self.decoders.read().map_err(|_| RegistryError::LockPoisoned)?;
        decoders
            .get(id)
            .map(|r| Arc::clone(&r.decoder))
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Get a decoder for a file extension
    pub fn get_for_extension(&self, ext: &str) -> Result<SharedDecoder, RegistryError> {
        let ext_lower = ext.trim_start_matches('.').to_lowercase();

        let id = {
            let ext_map = self.extension_map.read().map_err(|_| RegistryError::LockPoisoned)?;
            ext_map
                .get(&ext_lower)
                .and_then(|ids| ids.first())
                .cloned()
                .ok_or(RegistryError::NoDecoderForExtension(ext_lower))?
        };

        self.get(&id)
    }

    /// Get a decoder for a file path
    pub fn get_for_path(&self, path: &Path) -> Result<SharedDecoder, RegistryError> {
        if let Some(ext) = path.extension() {
            if let Ok(decoder) = self.get_for_extension(&ext.to_string_lossy()) {
                return Ok(decoder);
            }
        }

        // Fall back to asking every decoder
        let decoders = self.decoders.read().map_err(|_| RegistryError::LockPoisoned)?;
        let mut candidates: Vec<_> = decoders.values().collect();
        candidates.sort_by_key(|r| std::cmp::Reverse(r.priority));

        candidates
            .into_iter()
            .find(|r| r.decoder.can_decode(path))
            .map(|r| Arc::clone(&r.decoder))
            .ok_or_else(|| RegistryError::NoDecoderForPath(path.to_path_buf()))
    }

    /// List all registered decoders
    pub fn list(&self) -> Result<Vec<DecoderInfo>, RegistryError> {
        let decoders = self.decoders.read().map_err(|_| RegistryError::LockPoisoned)?;

        let mut infos: Vec<_> = decoders
            .values()
            .map(|d| DecoderInfo {
                id: d.id.clone(),
                name: d.name.clone(),
                description: d.description.clone(),
                extensions: d.extensions.clone(),
                priority: d.priority,
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(infos)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Decoder information for display
#[derive(Debug, Clone)]
pub struct DecoderInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub extensions: Vec<String>,
    pub priority: i32,
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Decoder with ID '{0}' already registered")]
    DuplicateId(String),

    #[error("Decoder with ID '{0}' not found")]
    NotFound(String),

    #[error("No decoder available for extension '.{0}'")]
    NoDecoderForExtension(String),

    #[error("No decoder available for path: {0}")]
    NoDecoderForPath(std::path::PathBuf),

    #[error("Invalid registration: {0}")]
    InvalidRegistration(&'static str),

    #[error("Registry lock poisoned")]
    LockPoisoned,
}

/// Register all built-in decoders
fn register_builtin_decoders(registry: &DecoderRegistry) {
    let dump = DecoderRegistrationBuilder::new()
        .id("scene-dump")
        .name("Scene Dump Decoder")
        .description("Reads YAML/JSON dumps of NIF scene graphs")
        .extensions(&["yaml", "yml", "json"])
        .priority(100)
        .decoder(SceneDumpDecoder::new())
        .build()
        .and_then(|registration| registry.register(registration));

    if let Err(e) = dump {
        warn!("Failed to register built-in scene-dump decoder: {e}");
    }
}

/// Builder for decoder registration
pub struct DecoderRegistrationBuilder {
    id: Option<String>,
    name: Option<String>,
    description: String,
    extensions: Vec<String>,
    priority: i32,
    decoder: Option<SharedDecoder>,
}

impl DecoderRegistrationBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            description: String::new(),
            extensions: Vec::new(),
            priority: 0,
            decoder: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn extensions(mut self, exts: &[&str]) -> Self {
        self.extensions = exts.iter().map(|s| s.to_lowercase()).collect();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn decoder<D: SceneDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Some(Arc::new(decoder));
        self
    }

    pub fn build(self) -> Result<DecoderRegistration, RegistryError> {
        let id = self.id.ok_or(RegistryError::InvalidRegistration("ID is required"))?;
        let decoder = self
            .decoder
            .ok_or(RegistryError::InvalidRegistration("Decoder is required"))?;

        Ok(DecoderRegistration {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            description: self.description,
            extensions: self.extensions,
            priority: self.priority,
            decoder,
        })
    }
}

impl Default for DecoderRegistrationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
