mod config;
mod dispatch_lease;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpConfig, UserDirectoryConfig};
pub use dispatch_lease::{DispatchLease, DispatchLeaseGuard};
pub use repos::{IAppointmentRepo, ICategoryRepo, IReminderRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys};

#[derive(Clone)]
pub struct AppointerContext {
    pub repos: Repos,
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Shared by every clone of this context, see `DispatchLease`
    pub dispatch_lease: DispatchLease,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl AppointerContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let config = Config::new();
        let repos = Repos::create_postgres(&params.postgres_connection_string).await?;
        let services = Services::create(&config)?;
        Ok(Self {
            repos,
            services,
            config,
            sys: Arc::new(RealSys {}),
            dispatch_lease: DispatchLease::new(),
        })
    }

    /// Context with inmemory repositories and services. Used for testing.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            services: Services::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            dispatch_lease: DispatchLease::new(),
        }
    }
}

/// Creates inmemory and postgres contexts when `DATABASE_URL` is set,
/// otherwise only the inmemory one
#[cfg(test)]
pub(crate) async fn create_contexts() -> Vec<AppointerContext> {
    let mut contexts = vec![AppointerContext::create_inmemory()];
    if let Ok(connection_string) = get_psql_connection_string() {
        let mut ctx = AppointerContext::create_inmemory();
        ctx.repos = Repos::create_postgres(&connection_string)
            .await
            .expect("To connect to postgres");
        contexts.push(ctx);
    }
    contexts
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<AppointerContext> {
    AppointerContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string()?,
    })
    .await
}

fn get_psql_connection_string() -> anyhow::Result<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .map_err(|_| anyhow::anyhow!("{} env var to be present.", PSQL_CONNECTION_STRING))
}
