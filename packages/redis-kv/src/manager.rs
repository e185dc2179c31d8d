//! Connection management: dial settings and the r2d2 glue.

use std::time::Duration;

use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

const DEFAULT_PORT: u16 = 6379;
const DEFAULT_MAX_CONNECTIONS: u32 = 1000;
const DEFAULT_WARM_IDLE: u32 = 2;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(240);
const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Limits and connection details for one named pool.
///
/// The defaults keep a small warm set of idle connections while allowing a
/// large burst of concurrent borrows.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// `host:port` of the Redis server.
    pub endpoint: String,
    /// Password sent during the handshake, if the server requires one.
    pub credential: Option<String>,
    /// Database index selected after connecting.
    pub database: i64,
    /// Upper bound on connections a pool may hold, idle or borrowed.
    pub max_connections: u32,
    /// Idle connections the pool keeps ready between borrows.
    pub warm_idle: u32,
    /// Idle connections older than this are closed.
    pub idle_timeout: Duration,
    /// How long a borrow waits for a free slot or a successful dial before
    /// failing.
    pub checkout_timeout: Duration,
}

impl PoolSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: None,
            database: 0,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            warm_idle: DEFAULT_WARM_IDLE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_database(mut self, database: i64) -> Self {
        self.database = database;
        self
    }

    pub fn with_warm_idle(mut self, warm_idle: u32) -> Self {
        self.warm_idle = warm_idle;
        self
    }

    pub fn with_checkout_timeout(mut self, checkout_timeout: Duration) -> Self {
        self.checkout_timeout = checkout_timeout;
        self
    }
}

/// Dials Redis connections for a pool and probes them before reuse.
///
/// The dial is one atomic setup step: open the transport connection,
/// authenticate when a credential is configured, select the database. Any
/// step failing fails the whole dial; the pool retries until the checkout
/// timeout is exhausted. Borrowed connections are health-checked with PING
/// first, so a connection severed while idle is discarded and replaced
/// instead of being handed out.
pub struct ConnectionManager {
    info: ConnectionInfo,
}

impl ConnectionManager {
    pub fn new(settings: &PoolSettings) -> Self {
        let (host, port) = split_endpoint(&settings.endpoint);
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(host, port),
            redis: RedisConnectionInfo {
                db: settings.database,
                username: None,
                password: settings.credential.clone(),
                ..Default::default()
            },
        };
        Self { info }
    }
}

impl r2d2::ManageConnection for ConnectionManager {
    type Connection = redis::Connection;
    type Error = redis::RedisError;

    fn connect(&self) -> Result<redis::Connection, redis::RedisError> {
        let client = redis::Client::open(self.info.clone())?;
        client.get_connection()
    }

    fn is_valid(&self, conn: &mut redis::Connection) -> Result<(), redis::RedisError> {
        redis::cmd("PING").query(conn)
    }

    fn has_broken(&self, _conn: &mut redis::Connection) -> bool {
        false
    }
}

/// Lenient `host:port` split. A missing or unparseable port falls back to the
/// default Redis port; a nonsense endpoint then simply fails at dial time.
fn split_endpoint(endpoint: &str) -> (String, u16) {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host.to_string(), port),
            Err(_) => (endpoint.to_string(), DEFAULT_PORT),
        },
        None => (endpoint.to_string(), DEFAULT_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = PoolSettings::new("127.0.0.1:6379");
        assert_eq!(settings.max_connections, 1000);
        assert_eq!(settings.warm_idle, 2);
        assert_eq!(settings.idle_timeout, Duration::from_secs(240));
        assert_eq!(settings.credential, None);
        assert_eq!(settings.database, 0);
    }

    #[test]
    fn settings_builders() {
        let settings = PoolSettings::new("127.0.0.1:6379")
            .with_credential("sesame")
            .with_database(5)
            .with_warm_idle(0)
            .with_checkout_timeout(Duration::from_millis(300));
        assert_eq!(settings.credential.as_deref(), Some("sesame"));
        assert_eq!(settings.database, 5);
        assert_eq!(settings.warm_idle, 0);
        assert_eq!(settings.checkout_timeout, Duration::from_millis(300));
    }

    #[test]
    fn endpoint_with_port() {
        assert_eq!(
            split_endpoint("10.0.0.1:6390"),
            ("10.0.0.1".to_string(), 6390)
        );
    }

    #[test]
    fn endpoint_without_port_gets_default() {
        assert_eq!(split_endpoint("localhost"), ("localhost".to_string(), 6379));
    }

    #[test]
    fn endpoint_with_bad_port_gets_default() {
        assert_eq!(
            split_endpoint("localhost:whoops"),
            ("localhost:whoops".to_string(), 6379)
        );
    }
}
