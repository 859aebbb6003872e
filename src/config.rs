use crate::game::betting::ClosureRule;
use std::net::SocketAddr;

/// Server settings, read once at startup from the environment (with
/// `.env` support). Every field has a sensible default so a bare
/// `cargo run` comes up on 0.0.0.0:3001 with 10/20 blinds.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub small_blind: i64,
    pub big_blind: i64,
    pub turn_time_secs: i64,
    pub debug_roles_enabled: bool,
    pub closure_rule: ClosureRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            small_blind: 10,
            big_blind: 20,
            turn_time_secs: 30,
            debug_roles_enabled: false,
            closure_rule: ClosureRule::Coarse,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let closure_rule = match std::env::var("CLOSURE_RULE").ok().as_deref() {
            Some("strict") => ClosureRule::Strict,
            Some("coarse") | None => ClosureRule::Coarse,
            Some(other) => {
                tracing::warn!("unknown CLOSURE_RULE {:?}, using coarse", other);
                ClosureRule::Coarse
            }
        };

        Self {
            host: env_or("SERVER_HOST", defaults.host),
            port: env_or("SERVER_PORT", defaults.port),
            small_blind: env_or("SMALL_BLIND", defaults.small_blind),
            big_blind: env_or("BIG_BLIND", defaults.big_blind),
            turn_time_secs: env_or("TURN_TIME_SECS", defaults.turn_time_secs),
            debug_roles_enabled: env_or("DEBUG_ROLES_ENABLED", false),
            closure_rule,
        }
    }

    pub fn server_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("could not parse {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.small_blind, 10);
        assert_eq!(config.big_blind, 20);
        assert!(!config.debug_roles_enabled);
        assert_eq!(config.closure_rule, ClosureRule::Coarse);
    }

    #[test]
    fn test_server_addr_parses() {
        let config = Config::default();
        let addr = config.server_addr().unwrap();
        assert_eq!(addr.port(), 3001);
    }
}
