//! Test server wrapper that starts the demo app on a random port

use std::net::SocketAddr;

use gatehouse_core::Environment;
use gatehouse_recover::{ErrorRecovery, RecoveryConfig};
use gatehouse_validate::{RequestValidator, record_previous_url};
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// A running demo site with the full middleware stack installed
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    server: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start with the stock validator
    pub async fn start(environment: Environment) -> anyhow::Result<Self> {
        Self::start_with(environment, RequestValidator::new()).await
    }

    /// Start with a customized validator
    ///
    /// Binds to port 0 for automatic port assignment. The client keeps
    /// cookies (session round-trips) and never follows redirects, so
    /// tests can assert on `Location` headers.
    pub async fn start_with(
        environment: Environment,
        validator: RequestValidator,
    ) -> anyhow::Result<Self> {
        init_tracing();

        let recovery = ErrorRecovery::new(RecoveryConfig {
            environment,
            debug: false,
        });
        let sessions = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

        // Outermost last: report > catch panics > sessions > URL recorder
        let reporter = recovery.clone();
        let app = super::app::router(&validator)
            .layer(axum::middleware::from_fn(record_previous_url))
            .layer(sessions)
            .layer(recovery.catch_panics())
            .layer(axum::middleware::from_fn(move |request, next| {
                let reporter = reporter.clone();
                async move { reporter.report(request, next).await }
            }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { addr, client, server })
    }

    /// Absolute URL for a path on the running server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
