use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "smarty_core=info";

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default
/// filter; an already-installed subscriber is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt().with_env_filter(filter).try_init();
    });
}
