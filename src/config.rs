use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_CHAT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Process-wide settings, read once at startup and handed to each service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub vision_api_key: String,
    pub chat_api_key: String,
    pub base_url: String,
    pub vision_model: String,
    pub chat_model: String,
    pub upload_dir: PathBuf,
    pub bind_addr: String,
    /// `None` leaves external calls unbounded.
    pub request_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Keys are not validated here; a missing key surfaces as an auth error on first use
        let vision_api_key = lookup("GROQ_VISION").unwrap_or_else(|| {
            log::warn!("⚠️ GROQ_VISION not set, image extraction will fail");
            String::new()
        });
        let chat_api_key = lookup("GROQ_LLM").unwrap_or_else(|| {
            log::warn!("⚠️ GROQ_LLM not set, explanation requests will fail");
            String::new()
        });

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS").and_then(|raw| {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    log::warn!("⚠️ Ignoring invalid REQUEST_TIMEOUT_SECS: {}", raw);
                    None
                }
            }
        });

        let max_upload_bytes = lookup("MAX_UPLOAD_BYTES")
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(bytes) => Some(bytes),
                Err(_) => {
                    log::warn!("⚠️ Ignoring invalid MAX_UPLOAD_BYTES: {}", raw);
                    None
                }
            })
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            vision_api_key,
            chat_api_key,
            base_url: lookup("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            vision_model: lookup("VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            upload_dir: lookup("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_FOLDER)),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            request_timeout,
            max_upload_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = config_from(&[]);

        assert_eq!(config.vision_api_key, "");
        assert_eq!(config.chat_api_key, "");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.vision_model, DEFAULT_VISION_MODEL);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert!(config.request_timeout.is_none());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_reads_keys_and_overrides() {
        let config = config_from(&[
            ("GROQ_VISION", "vision-key"),
            ("GROQ_LLM", "chat-key"),
            ("CHAT_MODEL", "other-model"),
            ("UPLOAD_FOLDER", "/tmp/reports"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ]);

        assert_eq!(config.vision_api_key, "vision-key");
        assert_eq!(config.chat_api_key, "chat-key");
        assert_eq!(config.chat_model, "other-model");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[
            ("REQUEST_TIMEOUT_SECS", "soon"),
            ("MAX_UPLOAD_BYTES", "-5"),
        ]);

        assert!(config.request_timeout.is_none());
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }
}
