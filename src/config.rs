//! Runtime configuration read from environment variables.
//!
//! Serverless deployments have no config files; everything a function
//! needs is set on the project as environment variables. All variables are
//! optional and fall back to the values the site was first deployed with.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::CounterError;
use crate::event::MethodPath;
use crate::models::counter::DEFAULT_COUNTER_KEY;

pub const ENV_BACKEND: &str = "VIEW_COUNTER_BACKEND";
pub const ENV_TABLE: &str = "VIEW_COUNTER_TABLE";
pub const ENV_KEY: &str = "VIEW_COUNTER_KEY";
pub const ENV_WRITE_MODE: &str = "VIEW_COUNTER_WRITE_MODE";
pub const ENV_METHOD_POLICY: &str = "VIEW_COUNTER_METHOD_POLICY";
pub const ENV_METHOD_PATHS: &str = "VIEW_COUNTER_METHOD_PATHS";
pub const ENV_DYNAMODB_ENDPOINT: &str = "VIEW_COUNTER_DYNAMODB_ENDPOINT";

/// Table the counter has always lived in.
pub const DEFAULT_TABLE: &str = "Cloudresume-test";

/// Which store implementation backs the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    DynamoDb,
    /// Process-local; the count resets with the process.
    Memory,
}

/// How a view is written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Read, add one, overwrite. Concurrent invocations can lose updates.
    #[default]
    Overwrite,
    /// Single atomic increment in the store.
    Atomic,
}

/// What to do with methods other than GET and OPTIONS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodPolicy {
    /// Count the view, as for GET.
    #[default]
    Lenient,
    /// Answer 405.
    Strict,
}

#[derive(Debug, Clone)]
pub struct CounterConfig {
    pub backend: Backend,
    pub table: String,
    pub counter_key: String,
    pub write_mode: WriteMode,
    pub method_policy: MethodPolicy,
    pub method_paths: Vec<MethodPath>,
    /// Custom DynamoDB endpoint, e.g. `http://localhost:8000` for DynamoDB Local.
    pub dynamodb_endpoint: Option<String>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        CounterConfig {
            backend: Backend::DynamoDb,
            table: DEFAULT_TABLE.to_string(),
            counter_key: DEFAULT_COUNTER_KEY.to_string(),
            write_mode: WriteMode::default(),
            method_policy: MethodPolicy::default(),
            method_paths: MethodPath::defaults(),
            dynamodb_endpoint: None,
        }
    }
}

impl CounterConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, CounterError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CounterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = CounterConfig::default();

        Ok(CounterConfig {
            backend: get(ENV_BACKEND)
                .map(|v| v.parse::<Backend>())
                .transpose()?
                .unwrap_or(defaults.backend),
            table: get(ENV_TABLE).unwrap_or(defaults.table),
            counter_key: get(ENV_KEY).unwrap_or(defaults.counter_key),
            write_mode: get(ENV_WRITE_MODE)
                .map(|v| v.parse::<WriteMode>())
                .transpose()?
                .unwrap_or(defaults.write_mode),
            method_policy: get(ENV_METHOD_POLICY)
                .map(|v| v.parse::<MethodPolicy>())
                .transpose()?
                .unwrap_or(defaults.method_policy),
            method_paths: get(ENV_METHOD_PATHS)
                .map(|v| MethodPath::parse_list(&v))
                .transpose()?
                .unwrap_or(defaults.method_paths),
            dynamodb_endpoint: get(ENV_DYNAMODB_ENDPOINT),
        })
    }
}

impl FromStr for Backend {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(Backend::DynamoDb),
            "memory" => Ok(Backend::Memory),
            other => Err(CounterError::Config(format!("unknown backend '{other}'"))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::DynamoDb => write!(f, "dynamodb"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for WriteMode {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(WriteMode::Overwrite),
            "atomic" => Ok(WriteMode::Atomic),
            other => Err(CounterError::Config(format!("unknown write mode '{other}'"))),
        }
    }
}

impl FromStr for MethodPolicy {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(MethodPolicy::Lenient),
            "strict" => Ok(MethodPolicy::Strict),
            other => Err(CounterError::Config(format!("unknown method policy '{other}'"))),
        }
    }
}
