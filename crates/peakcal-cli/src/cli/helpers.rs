use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub(super) const LOG_ENV_VAR: &str = "PEAKCAL_LOG";

/// Installs the stderr subscriber. `PEAKCAL_LOG` takes a standard filter
/// directive; `--verbose` forces debug output from the core.
pub(super) fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("peakcal_core=debug,info")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

pub(super) fn format_coefficient_row(energy_kev: f64, coefficient: f64) -> String {
    format!("{energy_kev:>12.4} keV  {coefficient:>14.6e} cm2/g")
}
