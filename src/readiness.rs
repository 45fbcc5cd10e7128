use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn is_ready(&self) -> bool;
}

/// Treats the Server as up once its port is taken.
///
/// The probe only tries to bind the port itself and never connects, so the
/// Server does not see a stray client before the real one arrives.
pub struct PortProbe {
    pub port: u16,
}

#[async_trait]
impl ReadinessProbe for PortProbe {
    async fn is_ready(&self) -> bool {
        match TcpListener::bind(("0.0.0.0", self.port)).await {
            Ok(_listener) => false,
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => true,
            Err(e) => {
                debug!(port = self.port, error = %e, "readiness probe bind failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready { waited: Duration },
    TimedOut { waited: Duration },
    /// Polling disabled, only the fixed delay was applied.
    Skipped { waited: Duration },
}

impl Readiness {
    pub fn waited(&self) -> Duration {
        match *self {
            Readiness::Ready { waited }
            | Readiness::TimedOut { waited }
            | Readiness::Skipped { waited } => waited,
        }
    }
}

/// Sleeps `min_delay`, then polls `probe` until it reports ready or
/// `ready_timeout` has elapsed since the call. Never fails: a timeout only
/// means the caller goes ahead without confirmation.
pub async fn wait_for_server(
    probe: &dyn ReadinessProbe,
    min_delay: Duration,
    ready_timeout: Duration,
) -> Readiness {
    let start = Instant::now();
    sleep(min_delay).await;

    if ready_timeout <= min_delay {
        return Readiness::Skipped {
            waited: start.elapsed(),
        };
    }

    // A timeout too large to represent means waiting for as long as it takes.
    let deadline = start.checked_add(ready_timeout);
    loop {
        if probe.is_ready().await {
            let waited = start.elapsed();
            debug!(?waited, "server is listening");
            return Readiness::Ready { waited };
        }
        let now = Instant::now();
        let step = match deadline {
            Some(deadline) if now >= deadline => {
                let waited = now - start;
                warn!(?waited, "server did not start listening in time, launching client anyway");
                return Readiness::TimedOut { waited };
            }
            Some(deadline) => POLL_INTERVAL.min(deadline - now),
            None => POLL_INTERVAL,
        };
        sleep(step).await;
    }
}
