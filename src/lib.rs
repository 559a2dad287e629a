//! healthguard - dependency health monitoring with circuit breakers
//!
//! This library checks external dependencies (databases, e-mail providers,
//! analytics services, ...) through per-service circuit breakers and reduces
//! the results to one system-wide health status.
//!
//! # Example
//!
//! ```no_run
//! use healthguard::health::{probe_fn, ServiceHealth};
//! use healthguard::system::{BreakerProfiles, ServiceDefinition, SystemHealthChecker};
//!
//! # async fn run() {
//! let database = probe_fn(|| async { Ok(ServiceHealth::healthy("database")) });
//! let checker = SystemHealthChecker::new(
//!     vec![ServiceDefinition::new("database", database, true)],
//!     BreakerProfiles::default(),
//! );
//!
//! let health = checker.check_system_health(None).await;
//! println!("{}", health.overall);
//! # }
//! ```

pub mod circuit_breaker;
pub mod cli;
pub mod config;
pub mod health;
pub mod logging;
pub mod probes;
pub mod system;
