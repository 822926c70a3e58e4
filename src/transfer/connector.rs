use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use ssh2::{Session, Sftp};

use crate::config::{ServiceConfig, TransferConfig};
use crate::constants::{
    ERROR_AUTHENTICATION_FAILED, ERROR_FAILED_TO_CONNECT, ERROR_FAILED_TO_CREATE_REMOTE,
    ERROR_FAILED_TO_CREATE_SESSION, ERROR_FAILED_TO_CREATE_SFTP, ERROR_FAILED_TO_HANDSHAKE,
    ERROR_FAILED_TO_CLOSE_REMOTE, ERROR_FAILED_TO_WRITE_FILE,
};
use crate::error::RelayError;
use crate::transfer::auth::{AuthMethod, SecretResponder};

/// An open file-transfer session.
///
/// Implementations release the session and its transport when dropped.
pub trait RemoteSession {
    /// Create `remote_path` (truncating any existing file) and write
    /// `contents` to it. The remote handle is closed before returning.
    fn write_file(&mut self, remote_path: &str, contents: &[u8]) -> Result<()>;
}

/// Opens [`RemoteSession`]s.
#[cfg_attr(test, mockall::automock)]
pub trait Connector: Send + Sync {
    /// Dial, authenticate with the first accepted method, and start the
    /// file-transfer subsystem. Every failure is a `RelayError::Connection`.
    fn connect(
        &self,
        config: &TransferConfig,
        methods: &[AuthMethod],
    ) -> Result<Box<dyn RemoteSession>, RelayError>;
}

/// SSH/SFTP connector backed by libssh2.
#[derive(Clone, Debug)]
pub struct SshConnector {
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl SshConnector {
    pub fn new(connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            io_timeout,
        }
    }

    pub fn from_service_config(settings: &ServiceConfig) -> Self {
        Self::new(settings.connect_timeout(), settings.io_timeout())
    }

    /// Create a new SSH session
    fn create_session(&self, config: &TransferConfig, methods: &[AuthMethod]) -> Result<Session> {
        let addr = resolve_addr(&config.host, config.port)?;

        // Create TCP connection
        let tcp = TcpStream::connect_timeout(&addr, self.connect_timeout)
            .context(format!("{} {}", ERROR_FAILED_TO_CONNECT, addr))?;

        tcp.set_read_timeout(Some(self.connect_timeout))
            .context("Failed to set read timeout")?;
        tcp.set_write_timeout(Some(self.connect_timeout))
            .context("Failed to set write timeout")?;

        let mut session = Session::new().context(ERROR_FAILED_TO_CREATE_SESSION)?;
        session.set_timeout(millis(self.connect_timeout));
        session.set_tcp_stream(tcp);
        session.handshake().context(ERROR_FAILED_TO_HANDSHAKE)?;

        authenticate(&session, &config.username, methods)?;

        // From here on each blocking call is bounded by the I/O timeout
        session.set_timeout(millis(self.io_timeout));
        Ok(session)
    }
}

impl Connector for SshConnector {
    fn connect(
        &self,
        config: &TransferConfig,
        methods: &[AuthMethod],
    ) -> Result<Box<dyn RemoteSession>, RelayError> {
        let endpoint = config.endpoint();
        debug!("Connecting to sftp://{}@{}", config.username, endpoint);

        let open = || -> Result<SshSession> {
            let session = self.create_session(config, methods)?;
            let sftp = session.sftp().context(ERROR_FAILED_TO_CREATE_SFTP)?;
            Ok(SshSession {
                sftp: Some(sftp),
                session,
            })
        };

        match open() {
            Ok(session) => {
                info!("SFTP session established with {}", endpoint);
                Ok(Box::new(session))
            }
            Err(e) => Err(RelayError::Connection {
                endpoint,
                reason: format!("{:#}", e),
            }),
        }
    }
}

/// The authentication calls a login attempt needs from an SSH session.
#[cfg_attr(test, mockall::automock)]
pub trait UserAuth {
    fn keyboard_interactive(&self, username: &str, secret: &str) -> Result<()>;
    fn password(&self, username: &str, secret: &str) -> Result<()>;
    fn authenticated(&self) -> bool;
}

impl UserAuth for Session {
    fn keyboard_interactive(&self, username: &str, secret: &str) -> Result<()> {
        let mut responder = SecretResponder::new(secret);
        self.userauth_keyboard_interactive(username, &mut responder)?;
        Ok(())
    }

    fn password(&self, username: &str, secret: &str) -> Result<()> {
        self.userauth_password(username, secret)?;
        Ok(())
    }

    fn authenticated(&self) -> bool {
        Session::authenticated(self)
    }
}

/// Offer each method in order and stop at the first one accepted.
fn authenticate(auth: &dyn UserAuth, username: &str, methods: &[AuthMethod]) -> Result<()> {
    let mut rejected = Vec::new();

    for method in methods {
        let attempt = match method {
            AuthMethod::KeyboardInteractive(secret) => auth.keyboard_interactive(username, secret),
            AuthMethod::Password(secret) => auth.password(username, secret),
        };

        match attempt {
            Ok(()) if auth.authenticated() => {
                debug!("Authenticated {} using {}", username, method.name());
                return Ok(());
            }
            Ok(()) => rejected.push(format!("{}: not accepted", method.name())),
            Err(e) => {
                debug!("{} authentication rejected: {}", method.name(), e);
                rejected.push(format!("{}: {}", method.name(), e));
            }
        }
    }

    Err(anyhow!("{} ({})", ERROR_AUTHENTICATION_FAILED, rejected.join("; ")))
}

fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .context(format!("Failed to resolve {}:{}", host, port))?
        .next()
        .ok_or_else(|| anyhow!("No address found for {}:{}", host, port))
}

fn millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// SFTP channel plus the SSH session it runs on. Both go away together.
pub struct SshSession {
    sftp: Option<Sftp>,
    session: Session,
}

impl RemoteSession for SshSession {
    fn write_file(&mut self, remote_path: &str, contents: &[u8]) -> Result<()> {
        let sftp = self
            .sftp
            .as_ref()
            .ok_or_else(|| anyhow!("SFTP session already closed"))?;

        let mut remote_file = sftp
            .create(Path::new(remote_path))
            .context(format!("{}: {}", ERROR_FAILED_TO_CREATE_REMOTE, remote_path))?;

        remote_file
            .write_all(contents)
            .context(format!("{}: {}", ERROR_FAILED_TO_WRITE_FILE, remote_path))?;

        // Drop ignores the close status
        remote_file
            .close()
            .context(format!("{}: {}", ERROR_FAILED_TO_CLOSE_REMOTE, remote_path))?;

        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        // The SFTP channel must close before the session disconnects
        drop(self.sftp.take());
        if let Err(e) = self.session.disconnect(None, "relay job finished", None) {
            warn!("Failed to disconnect SSH session cleanly: {}", e);
        } else {
            debug!("SSH session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::auth::auth_methods;
    use std::net::TcpListener;

    fn config_for(port: u16) -> TransferConfig {
        TransferConfig {
            source_dir: "/unused".into(),
            host: "127.0.0.1".to_string(),
            port,
            username: "relay".to_string(),
            password: "secret".to_string(),
            destination_dir: "/in".to_string(),
        }
    }

    #[test]
    fn test_refused_connection_is_connection_error() {
        // Bind then drop to find a port nobody is listening on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let connector = SshConnector::new(Duration::from_secs(2), Duration::from_secs(2));
        let result = connector.connect(&config_for(port), &auth_methods("secret"));

        match result {
            Err(RelayError::Connection { endpoint, .. }) => {
                assert_eq!(endpoint, format!("127.0.0.1:{}", port));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("connection should have failed"),
        }
    }

    #[test]
    fn test_silent_server_times_out() {
        // Accepts TCP but never speaks SSH; handshake must give up
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let connector = SshConnector::new(Duration::from_millis(300), Duration::from_millis(300));
        let result = connector.connect(&config_for(port), &auth_methods("secret"));

        assert!(matches!(result, Err(RelayError::Connection { .. })));
        drop(listener);
    }

    #[test]
    fn test_keyboard_interactive_accepted_skips_password() {
        let mut auth = MockUserAuth::new();
        auth.expect_keyboard_interactive()
            .withf(|user, secret| user == "relay" && secret == "secret")
            .times(1)
            .returning(|_, _| Ok(()));
        auth.expect_authenticated().return_const(true);
        auth.expect_password().times(0);

        authenticate(&auth, "relay", &auth_methods("secret")).unwrap();
    }

    #[test]
    fn test_falls_back_to_password() {
        let mut auth = MockUserAuth::new();
        auth.expect_keyboard_interactive()
            .times(1)
            .returning(|_, _| Err(anyhow!("method not supported")));
        auth.expect_password()
            .withf(|user, secret| user == "relay" && secret == "secret")
            .times(1)
            .returning(|_, _| Ok(()));
        auth.expect_authenticated().return_const(true);

        authenticate(&auth, "relay", &auth_methods("secret")).unwrap();
    }

    #[test]
    fn test_ok_without_authenticated_session_is_not_accepted() {
        let mut auth = MockUserAuth::new();
        auth.expect_keyboard_interactive().returning(|_, _| Ok(()));
        auth.expect_password().times(1).returning(|_, _| Ok(()));
        auth.expect_authenticated().times(2).return_const(false);

        let err = authenticate(&auth, "relay", &auth_methods("secret")).unwrap_err();
        assert!(err.to_string().contains("keyboard-interactive: not accepted"));
    }

    #[test]
    fn test_all_methods_rejected() {
        let mut auth = MockUserAuth::new();
        auth.expect_keyboard_interactive()
            .returning(|_, _| Err(anyhow!("challenge failed")));
        auth.expect_password()
            .returning(|_, _| Err(anyhow!("bad password")));
        auth.expect_authenticated().times(0);

        let message = authenticate(&auth, "relay", &auth_methods("secret"))
            .unwrap_err()
            .to_string();
        assert!(message.starts_with(ERROR_AUTHENTICATION_FAILED));
        assert!(message.contains("challenge failed"));
        assert!(message.contains("bad password"));
        assert!(!message.contains("secret"));
    }

    #[test]
    fn test_from_service_config() {
        let settings = ServiceConfig {
            connect_timeout_secs: 7,
            io_timeout_secs: 9,
            ..Default::default()
        };
        let connector = SshConnector::from_service_config(&settings);
        assert_eq!(connector.connect_timeout, Duration::from_secs(7));
        assert_eq!(connector.io_timeout, Duration::from_secs(9));
    }
}
