use std::fs;
use std::path::Path;

use crate::io::recovery::atomic_write;
use crate::io::store::StoreError;
use crate::model::config::JournalConfig;

pub const CONFIG_FILE: &str = "journal.toml";

const CONFIG_TEMPLATE: &str = r##"[journal]
name = {name}
owner_id = 1

[editor]
# Idle time in milliseconds before an edited document is saved
autosave_ms = 800

# --- Weekly reports ---
# Any OpenAI-compatible chat-completions endpoint works. The API key is read
# from the environment variable named by api_key_env.
#
# [summary]
# api_url = "https://api.deepseek.com/chat/completions"
# model = "deepseek-chat"
# api_key_env = "DEEPSEEK_API_KEY"
# temperature = 0.7
# max_tokens = 2000
# timeout_secs = 60

[log]
# off, error, warn, info, debug, trace (WORKLOG_LOG overrides)
level = "warn"
# Rotating log files instead of stderr, relative to journal/
# dir = "logs"
"##;

/// The `journal.toml` written by `wl init`
pub fn default_config_text(name: &str) -> String {
    CONFIG_TEMPLATE.replace("{name}", &toml_edit::Value::from(name).to_string())
}

/// Read the journal config, returning both the parsed config and the raw
/// toml_edit document for formatting-preserving edits.
pub fn read_config(journal_dir: &Path) -> Result<(JournalConfig, toml_edit::DocumentMut), StoreError> {
    let path = journal_dir.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|source| StoreError::ReadError {
        path: path.clone(),
        source,
    })?;
    let config: JournalConfig = toml::from_str(&text)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Validate and write the config document back, preserving formatting
pub fn write_config(journal_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<JournalConfig, StoreError> {
    let text = doc.to_string();
    let config: JournalConfig = toml::from_str(&text)?;
    let path = journal_dir.join(CONFIG_FILE);
    atomic_write(&path, text.as_bytes())
        .map_err(|source| StoreError::WriteError { path, source })?;
    Ok(config)
}

/// Look up a dotted key such as `summary.model`
pub fn get_value(doc: &toml_edit::DocumentMut, key: &str) -> Option<String> {
    let (section, field) = key.split_once('.')?;
    let item = doc.get(section)?.get(field)?;
    let value = item.as_value()?;
    Some(match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string().trim().to_string(),
    })
}

/// Set a dotted key, creating the section when missing. The raw value is
/// stored as a bool or number when it parses as one, otherwise as a string.
pub fn set_value(doc: &mut toml_edit::DocumentMut, key: &str, raw: &str) -> Option<()> {
    let (section, field) = key.split_once('.')?;
    if section.is_empty() || field.is_empty() {
        return None;
    }
    if !doc.contains_key(section) {
        doc[section] = toml_edit::table();
    }
    let value = if let Ok(b) = raw.parse::<bool>() {
        toml_edit::value(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        toml_edit::value(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        toml_edit::value(f)
    } else {
        toml_edit::value(raw)
    };
    doc[section][field] = value;
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"# my journal
[journal]
name = "work"   # shown in listings
owner_id = 1

[summary]
model = "deepseek-chat"
"#;

    #[test]
    fn test_round_trip_preserves_formatting() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), SAMPLE).unwrap();

        let (config, doc) = read_config(tmp.path()).unwrap();
        assert_eq!(config.journal.name, "work");
        write_config(tmp.path(), &doc).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(), SAMPLE);
    }

    #[test]
    fn test_default_config_parses() {
        let config: JournalConfig = toml::from_str(&default_config_text("notes")).unwrap();
        assert_eq!(config.journal.name, "notes");
        assert_eq!(config.editor.autosave_ms, 800);
        assert_eq!(config.summary.model, "deepseek-chat");

        let quoted: JournalConfig = toml::from_str(&default_config_text("Bob's \"work\"")).unwrap();
        assert_eq!(quoted.journal.name, "Bob's \"work\"");
    }

    #[test]
    fn test_set_and_get_values() {
        let mut doc: toml_edit::DocumentMut = SAMPLE.parse().unwrap();
        set_value(&mut doc, "summary.temperature", "0.2").unwrap();
        set_value(&mut doc, "log.level", "debug").unwrap();
        set_value(&mut doc, "summary.max_tokens", "1500").unwrap();

        assert_eq!(get_value(&doc, "summary.model").as_deref(), Some("deepseek-chat"));
        assert_eq!(get_value(&doc, "summary.max_tokens").as_deref(), Some("1500"));
        assert_eq!(get_value(&doc, "log.level").as_deref(), Some("debug"));
        assert!(get_value(&doc, "summary.missing").is_none());
        assert!(set_value(&mut doc, "nodot", "x").is_none());

        let text = doc.to_string();
        assert!(text.contains("name = \"work\"   # shown in listings"));
        let config: JournalConfig = toml::from_str(&text).unwrap();
        assert!((config.summary.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_value_is_rejected_on_write() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), SAMPLE).unwrap();
        let (_, mut doc) = read_config(tmp.path()).unwrap();
        set_value(&mut doc, "editor.autosave_ms", "soon").unwrap();
        assert!(matches!(
            write_config(tmp.path(), &doc),
            Err(StoreError::ConfigParseError(_))
        ));
        assert_eq!(fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(), SAMPLE);
    }
}
