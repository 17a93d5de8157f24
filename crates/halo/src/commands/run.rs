use halo_core::{config, log};

/// Runs the overlay engine in the foreground until Ctrl+C.
pub fn execute() {
    let config = config::load();
    if let Some(path) = log::init(&config.logging) {
        eprintln!("Logging to {}", path.display());
    }

    run(&config);
}

#[cfg(windows)]
fn run(config: &config::Config) {
    if let Err(e) = halo_windows::daemon::run(config) {
        halo_core::log_error!("engine error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn run(_config: &config::Config) {
    super::unsupported("run");
}
