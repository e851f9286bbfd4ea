use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub server_port: u16,
    pub api_key: Option<String>,
    pub use_tls: bool,
    /// Key under which the trust anchor is stored. Falls back to `host:port`.
    pub server_identity: Option<String>,
    pub state_dir: PathBuf,
    pub request_timeout: Duration,
    /// Entries the server appends to every write transaction on top of the
    /// submitted ones.
    pub bookkeeping_entries_per_write: u32,
    /// When false, a cold trust store fails with `BootstrapRequired` instead
    /// of accepting the first verified answer.
    pub trust_on_first_use: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "localhost".to_string(),
            server_port: 3322,
            api_key: None,
            use_tls: true,
            server_identity: None,
            state_dir: PathBuf::from("./ledger_trust_state"),
            request_timeout: Duration::from_secs(10),
            bookkeeping_entries_per_write: 1,
            trust_on_first_use: true,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `LEDGER_TRUST_*` environment variables.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup("LEDGER_TRUST_URL") {
            cfg.server_url = url;
        }
        if let Some(port) = parse(&lookup, "LEDGER_TRUST_PORT") {
            cfg.server_port = port;
        }
        if let Some(key) = lookup("LEDGER_TRUST_API_KEY") {
            cfg.api_key = Some(key);
        }
        if let Some(tls) = parse(&lookup, "LEDGER_TRUST_USE_TLS") {
            cfg.use_tls = tls;
        }
        if let Some(identity) = lookup("LEDGER_TRUST_IDENTITY") {
            cfg.server_identity = Some(identity);
        }
        if let Some(dir) = lookup("LEDGER_TRUST_STATE_DIR") {
            cfg.state_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse::<u64, _>(&lookup, "LEDGER_TRUST_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(tofu) = parse(&lookup, "LEDGER_TRUST_TOFU") {
            cfg.trust_on_first_use = tofu;
        }

        cfg
    }

    pub fn server_identity(&self) -> String {
        self.server_identity
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.server_url, self.server_port))
    }

    pub fn base_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.server_url, self.server_port)
    }
}

fn parse<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", name, raw);
            None
        }
    }
}
