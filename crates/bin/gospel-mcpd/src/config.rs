use clap::{Parser, builder::BoolishValueParser};
use gospel_core::planner::LibraryLimits;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DB_NAMESPACE: &str = "gospel";
const DEFAULT_DB_NAME: &str = "library";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_MAX_VERSE_RANGE: u32 = 50;
const DEFAULT_TALK_RESULT_CAP: usize = 20;
const IN_MEMORY_ENDPOINT: &str = "mem://";

#[derive(Parser, Debug)]
#[command(name = "gospel-mcpd", version, about = "Gospel library MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(long, env = "GOSPEL_DB_URI")]
    db_uri: Option<String>,

    #[arg(long, env = "GOSPEL_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "GOSPEL_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(long, env = "GOSPEL_DB_USERNAME")]
    db_username: Option<String>,

    #[arg(long, env = "GOSPEL_DB_PASSWORD")]
    db_password: Option<String>,

    #[arg(long, env = "GOSPEL_CORPUS_PATH")]
    corpus_path: Option<PathBuf>,

    #[arg(
        long = "stdio",
        env = "GOSPEL_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "GOSPEL_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "GOSPEL_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "GOSPEL_MCP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateful: bool,

    #[arg(long, env = "GOSPEL_MAX_VERSE_RANGE", default_value_t = DEFAULT_MAX_VERSE_RANGE)]
    max_verse_range: u32,

    #[arg(
        long,
        env = "GOSPEL_STRICT_REFERENCES",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    strict_references: bool,

    #[arg(long, env = "GOSPEL_TALK_RESULT_CAP", default_value_t = DEFAULT_TALK_RESULT_CAP)]
    talk_result_cap: usize,

    #[arg(
        long,
        env = "GOSPEL_DEBUG",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct GospelConfig {
    pub db_uri: Option<String>,
    pub db_namespace: String,
    pub db_name: String,
    pub db_username: Option<String>,
    pub db_password: Option<String>,
    pub corpus_path: Option<PathBuf>,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub mcp_stateful: bool,
    pub limits: LibraryLimits,
    pub debug: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
    NoTransport,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::NoTransport => write!(
                f,
                "no transport enabled: set GOSPEL_ENABLE_STDIO or GOSPEL_MCP_SERVE"
            ),
        }
    }
}

impl Error for ConfigError {}

impl GospelConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Endpoint handed to the SurrealDB connector.
    pub fn db_endpoint(&self) -> &str {
        self.db_uri.as_deref().unwrap_or(IN_MEMORY_ENDPOINT)
    }
}

impl TryFrom<CliArgs> for GospelConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let db_uri = args.db_uri.filter(|value| !value.trim().is_empty());
        let db_username = args.db_username.filter(|value| !value.trim().is_empty());
        let db_password = args.db_password.filter(|value| !value.trim().is_empty());
        let in_memory = db_uri
            .as_deref()
            .is_none_or(|uri| uri.starts_with(IN_MEMORY_ENDPOINT));

        if !in_memory {
            match (&db_username, &db_password) {
                (Some(_), None) => return Err(ConfigError::MissingSetting("GOSPEL_DB_PASSWORD")),
                (None, Some(_)) => return Err(ConfigError::MissingSetting("GOSPEL_DB_USERNAME")),
                _ => {}
            }
            if let Some(path) = args.corpus_path.as_ref() {
                return Err(ConfigError::InvalidSetting {
                    name: "GOSPEL_CORPUS_PATH",
                    value: format!("{} (corpus seeding needs an in-memory store)", path.display()),
                });
            }
        }

        if args.db_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "GOSPEL_DB_NAMESPACE",
                value: args.db_namespace,
            });
        }
        if args.db_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "GOSPEL_DB_NAME",
                value: args.db_name,
            });
        }
        if args.max_verse_range == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "GOSPEL_MAX_VERSE_RANGE",
                value: args.max_verse_range.to_string(),
            });
        }
        if args.talk_result_cap == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "GOSPEL_TALK_RESULT_CAP",
                value: args.talk_result_cap.to_string(),
            });
        }
        if !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::NoTransport);
        }

        let limits = LibraryLimits::default()
            .with_max_verse_range(args.max_verse_range)
            .with_require_positive(args.strict_references)
            .with_talk_max_limit(args.talk_result_cap);

        Ok(Self {
            db_uri,
            db_namespace: args.db_namespace,
            db_name: args.db_name,
            db_username,
            db_password,
            corpus_path: args.corpus_path,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            mcp_stateful: args.mcp_stateful,
            limits,
            debug: args.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            db_uri: None,
            db_namespace: DEFAULT_DB_NAMESPACE.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_username: None,
            db_password: None,
            corpus_path: None,
            enable_stdio: false,
            mcp_serve: true,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            mcp_stateful: true,
            max_verse_range: DEFAULT_MAX_VERSE_RANGE,
            strict_references: true,
            talk_result_cap: DEFAULT_TALK_RESULT_CAP,
            debug: false,
        }
    }

    #[test]
    fn defaults_to_in_memory_when_db_uri_missing() {
        let mut args = base_args();
        args.db_uri = Some("  ".to_string());

        let config = GospelConfig::try_from(args).expect("config should parse");

        assert_eq!(config.db_endpoint(), "mem://");
        assert_eq!(config.limits, LibraryLimits::default());
    }

    #[test]
    fn remote_store_needs_both_credentials() {
        let mut args = base_args();
        args.db_uri = Some("ws://127.0.0.1:8000".to_string());
        args.db_username = Some("root".to_string());

        let err = GospelConfig::try_from(args).err();
        assert!(matches!(err, Some(ConfigError::MissingSetting("GOSPEL_DB_PASSWORD"))));

        let mut args = base_args();
        args.db_uri = Some("ws://127.0.0.1:8000".to_string());
        let config = GospelConfig::try_from(args).expect("anonymous remote is allowed");
        assert_eq!(config.db_endpoint(), "ws://127.0.0.1:8000");
    }

    #[test]
    fn corpus_seeding_requires_memory_store() {
        let mut args = base_args();
        args.db_uri = Some("wss://library.example:8000".to_string());
        args.corpus_path = Some(PathBuf::from("corpus.json"));

        let err = GospelConfig::try_from(args).err();
        assert!(matches!(
            err,
            Some(ConfigError::InvalidSetting { name: "GOSPEL_CORPUS_PATH", .. })
        ));
    }

    #[test]
    fn rejects_zero_limits_and_empty_names() {
        let mut args = base_args();
        args.max_verse_range = 0;
        assert!(GospelConfig::try_from(args).is_err());

        let mut args = base_args();
        args.talk_result_cap = 0;
        assert!(GospelConfig::try_from(args).is_err());

        let mut args = base_args();
        args.db_name = " ".to_string();
        assert!(GospelConfig::try_from(args).is_err());
    }

    #[test]
    fn requires_a_transport() {
        let mut args = base_args();
        args.mcp_serve = false;
        assert!(matches!(GospelConfig::try_from(args), Err(ConfigError::NoTransport)));
    }

    #[test]
    fn limits_follow_settings() {
        let mut args = base_args();
        args.max_verse_range = 10;
        args.strict_references = false;
        args.talk_result_cap = 5;

        let config = GospelConfig::try_from(args).expect("config should parse");

        assert_eq!(config.limits.max_verse_range, 10);
        assert!(!config.limits.require_positive);
        assert_eq!(config.limits.talk_max_limit, 5);
    }
}
