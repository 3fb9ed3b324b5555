use serde::{Deserialize, Serialize};

/// Configuration from journal.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    pub journal: JournalInfo,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalInfo {
    pub name: String,
    /// Stamped as `creator_id` on every record this journal creates
    #[serde(default = "default_owner_id")]
    pub owner_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Idle gap before an edited document is saved
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            autosave_ms: default_autosave_ms(),
        }
    }
}

/// Settings for the chat-completions endpoint used by `wl summarize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        SummaryConfig {
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write rotating log files here instead of stderr (relative to the journal dir)
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_owner_id() -> u64 {
    1
}

fn default_autosave_ms() -> u64 {
    800
}

fn default_api_url() -> String {
    "https://api.deepseek.com/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_api_key_env() -> String {
    "DEEPSEEK_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "warn".to_string()
}
