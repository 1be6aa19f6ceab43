//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: start and shutdown, with the final entry count
//! - **Lookups**: cache hits, joins and locator requests at `debug`, cache
//!   stores at `info`, locator failures at `warn`
//! - **Invalidation**: applied at `info`, stale or redundant reports at `debug`
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=locator_resolver::resolver=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug`, two callers racing on a cold key look like:
//!
//! ```text
//! DEBUG Locator request started key=object:o1 generation_to_produce=1
//! DEBUG Joined pending resolution key=object:o1 waiters=2
//! INFO  Cached key=object:o1 generation=1 value=tcp -h localhost -p 12010 size=1
//! DEBUG Released waiters key=object:o1 delivered=2
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
