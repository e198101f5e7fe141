use std::time::Duration;

const API_KEY_VAR: &str = "CHATGPT_API_KEY";
const TIMEOUT_VAR: &str = "QUIZ_API_TIMEOUT_SECS";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` sends every provider call straight to its fallback.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Reads the process environment. `.env` is loaded by `main` beforehand
    /// so that it can also carry `RUST_LOG` and `TELOXIDE_TOKEN`.
    pub fn from_env() -> Self {
        let api_key = parse_api_key(std::env::var(API_KEY_VAR).ok());
        if api_key.is_none() {
            log::warn!("{} is not set, quizzes will use the built-in fallback", API_KEY_VAR);
        }

        Self {
            api_key,
            request_timeout: parse_timeout(std::env::var(TIMEOUT_VAR).ok().as_deref()),
        }
    }
}

fn parse_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    match raw.map(str::trim) {
        None | Some("") => DEFAULT_TIMEOUT,
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                log::warn!(
                    "Invalid {} value {:?}, using {}s",
                    TIMEOUT_VAR,
                    value,
                    DEFAULT_TIMEOUT.as_secs()
                );
                DEFAULT_TIMEOUT
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        assert_eq!(parse_api_key(None), None);
        assert_eq!(parse_api_key(Some("   ".to_string())), None);
        assert_eq!(
            parse_api_key(Some(" sk-test \n".to_string())),
            Some("sk-test".to_string())
        );
    }

    #[test]
    fn timeout_defaults_and_overrides() {
        assert_eq!(parse_timeout(None), DEFAULT_TIMEOUT);
        assert_eq!(parse_timeout(Some("30")), Duration::from_secs(30));
        assert_eq!(parse_timeout(Some("soon")), DEFAULT_TIMEOUT);
        assert_eq!(parse_timeout(Some("0")), DEFAULT_TIMEOUT);
    }
}
