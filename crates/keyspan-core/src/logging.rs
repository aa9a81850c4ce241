//! Tracing initialization for the `keyspan` binary.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "KEYSPAN_LOG";
pub const DEFAULT_FILTER: &str = "keyspan=info,_keyspan_core=info";
pub const VERBOSE_FILTER: &str = "keyspan=debug,_keyspan_core=debug";

static INIT: Once = Once::new();

/// Install a stderr fmt subscriber.
///
/// `KEYSPAN_LOG` takes precedence (e.g. `KEYSPAN_LOG=_keyspan_core::pipeline=debug`);
/// otherwise `verbose` picks between the debug and info defaults. Only the
/// first call has any effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .try_init();
    });
}
