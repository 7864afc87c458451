use wasm_bindgen::JsValue;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_DELETE_DELAY_MS: u32 = 1000;
const DEFAULT_UPDATE_DELAY_MS: u32 = 500;

/// Untyped values as found on `window.ENV`.
#[derive(Clone, Debug, Default)]
pub(crate) struct RawEnv {
    pub api_url: Option<String>,
    pub delete_delay_ms: Option<String>,
    pub update_delay_ms: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,

    /// How long a confirmed delete waits before leaving the rendered list.
    pub delete_delay_ms: u32,
    /// How long a confirmed update waits before being merged into the rendered list.
    pub update_delay_ms: u32,

    pub log_level: log::Level,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::from_raw(Self::read_window_env())
    }

    pub fn from_raw(raw: RawEnv) -> Self {
        let parse_ms = |v: Option<String>, default: u32| {
            v.and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        Self {
            api_url: raw
                .api_url
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            delete_delay_ms: parse_ms(raw.delete_delay_ms, DEFAULT_DELETE_DELAY_MS),
            update_delay_ms: parse_ms(raw.update_delay_ms, DEFAULT_UPDATE_DELAY_MS),
            log_level: raw
                .log_level
                .and_then(|s| s.trim().parse::<log::Level>().ok())
                .unwrap_or(log::Level::Info),
        }
    }

    // Both `window.ENV.API_URL` and the lowercase `window.ENV.api_url` are honoured.
    fn read_window_env() -> RawEnv {
        let Some(env) = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .map(JsValue::from)
            .filter(|env| !env.is_undefined() && env.is_object())
        else {
            return RawEnv::default();
        };

        let read = |keys: &[&str]| {
            keys.iter().find_map(|k| {
                let v = js_sys::Reflect::get(&env, &JsValue::from_str(k)).ok()?;
                v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
            })
        };

        RawEnv {
            api_url: read(&["API_URL", "api_url"]),
            delete_delay_ms: read(&["DELETE_DELAY_MS", "delete_delay_ms"]),
            update_delay_ms: read(&["UPDATE_DELAY_MS", "update_delay_ms"]),
            log_level: read(&["LOG_LEVEL", "log_level"]),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_raw(RawEnv::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EnvConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:5000/api");
        assert_eq!(cfg.delete_delay_ms, 1000);
        assert_eq!(cfg.update_delay_ms, 500);
        assert_eq!(cfg.log_level, log::Level::Info);
    }

    #[test]
    fn test_overrides() {
        let cfg = EnvConfig::from_raw(RawEnv {
            api_url: Some("https://museum.example/api".to_string()),
            delete_delay_ms: Some(" 250 ".to_string()),
            update_delay_ms: Some("0".to_string()),
            log_level: Some("debug".to_string()),
        });
        assert_eq!(cfg.api_url, "https://museum.example/api");
        assert_eq!(cfg.delete_delay_ms, 250);
        assert_eq!(cfg.update_delay_ms, 0);
        assert_eq!(cfg.log_level, log::Level::Debug);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = EnvConfig::from_raw(RawEnv {
            api_url: Some("   ".to_string()),
            delete_delay_ms: Some("soon".to_string()),
            update_delay_ms: Some("-5".to_string()),
            log_level: Some("loud".to_string()),
        });
        assert_eq!(cfg, EnvConfig::default());
    }
}
