use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use soca_client::backend::BackendConfig;
use soca_client::criteria::DEFAULT_CRITERIA_BLOB;
use soca_client::openai::OpenAiConfig;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_USER_ID: &str = "soca_user";
pub const DEFAULT_CONVERSATION_FLOW: &str = "hr_insights";
pub const DEFAULT_DEPLOYMENT_NAME: &str = "gpt-4o";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocaConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    pub config_version: u32,
    /// Renamed from `api_url` in v1.
    pub api_base_url: String,
    pub username: String,
    pub password: String,
    pub revision_id: String,
    pub user_id: String,
    pub conversation_flow: String,
    pub azure_openai: OpenAiConfig,
    /// Container (or blob) SAS URL the criteria document is uploaded to.
    pub blob_storage_url: String,
    pub criteria_blob: String,
}

impl Default for SocaConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
            revision_id: String::new(),
            user_id: DEFAULT_USER_ID.to_string(),
            conversation_flow: DEFAULT_CONVERSATION_FLOW.to_string(),
            azure_openai: OpenAiConfig {
                deployment_name: DEFAULT_DEPLOYMENT_NAME.to_string(),
                ..OpenAiConfig::default()
            },
            blob_storage_url: String::new(),
            criteria_blob: DEFAULT_CRITERIA_BLOB.to_string(),
        }
    }
}

impl SocaConfig {
    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.api_base_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            revision_id: self.revision_id.clone(),
            user_id: self.user_id.clone(),
            conversation_flow: self.conversation_flow.clone(),
        }
    }

    pub fn openai(&self) -> &OpenAiConfig {
        &self.azure_openai
    }

    /// Apply environment overrides. Unset or empty variables leave the
    /// file value in place.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides: [(&str, &mut String); 8] = [
            ("API_BASE_URL", &mut self.api_base_url),
            ("API_USERNAME", &mut self.username),
            ("API_PASSWORD", &mut self.password),
            ("REVISION_ID", &mut self.revision_id),
            ("AZURE_OPENAI_ENDPOINT", &mut self.azure_openai.endpoint),
            ("AZURE_OPENAI_KEY", &mut self.azure_openai.api_key),
            (
                "AZURE_OPENAI_DEPLOYMENT_NAME",
                &mut self.azure_openai.deployment_name,
            ),
            ("AZURE_BLOB_STORAGE_URL", &mut self.blob_storage_url),
        ];

        for (var, field) in overrides {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(var, "config value overridden from environment");
                *field = value;
            }
        }
    }
}

/// Redacted config view, safe to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigInfo {
    pub api_base_url: String,
    pub username: String,
    pub password_set: bool,
    pub revision_id: String,
    pub user_id: String,
    pub conversation_flow: String,
    pub openai_endpoint: String,
    pub openai_deployment: String,
    pub openai_key_hint: Option<String>,
    pub blob_storage_url: Option<String>,
    pub criteria_blob: String,
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.soca.app"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config from the default location, then layer the process
/// environment on top.
pub fn load_config() -> eyre::Result<SocaConfig> {
    load_config_at(&config_path()?)
}

/// Load the config at `path` (defaults if it does not exist yet), then
/// layer the process environment on top.
pub fn load_config_at(path: &Path) -> eyre::Result<SocaConfig> {
    let mut config = load_or_default(path)?;
    config.apply_env(|var| std::env::var(var).ok());
    Ok(config)
}

/// The config stored at `path`, or the defaults when no file exists.
pub fn load_or_default(path: &Path) -> eyre::Result<SocaConfig> {
    if path.exists() {
        load_config_from(path)
    } else {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        Ok(SocaConfig::default())
    }
}

pub fn load_config_from(path: &Path) -> eyre::Result<SocaConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(v) => u32::try_from(v).map_err(|_| {
            eyre::eyre!(
                "config_version {v} is newer than this build supports ({CURRENT_VERSION}). \
                 Please update soca."
            )
        })?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: SocaConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update soca."
        ));
    }

    // v0 → v1: api_url was renamed to api_base_url
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(url) = obj.remove("api_url") {
            obj.entry("api_base_url").or_insert(url);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (renamed api_url)");
    }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &SocaConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    // The file holds the backend password and the OpenAI key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn config_info(config: &SocaConfig) -> ConfigInfo {
    let key = &config.azure_openai.api_key;
    ConfigInfo {
        api_base_url: config.api_base_url.clone(),
        username: config.username.clone(),
        password_set: !config.password.is_empty(),
        revision_id: config.revision_id.clone(),
        user_id: config.user_id.clone(),
        conversation_flow: config.conversation_flow.clone(),
        openai_endpoint: config.azure_openai.endpoint.clone(),
        openai_deployment: config.azure_openai.deployment_name.clone(),
        openai_key_hint: (!key.is_empty()).then(|| redact_secret(key)),
        blob_storage_url: (!config.blob_storage_url.is_empty())
            .then(|| redact_sas(&config.blob_storage_url)),
        criteria_blob: config.criteria_blob.clone(),
    }
}

fn redact_secret(key: &str) -> String {
    if key.len() <= 8 || !key.is_ascii() {
        return "****".to_string();
    }
    let prefix = &key[..4];
    let suffix = &key[key.len() - 4..];
    format!("{prefix}...{suffix}")
}

/// Drop the SAS query string, which is the credential.
fn redact_sas(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?****"),
        None => url.to_string(),
    }
}
