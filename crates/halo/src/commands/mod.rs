pub mod init;
pub mod list;
pub mod run;

/// Exits with an error on platforms without an overlay backend.
#[cfg(not(windows))]
pub(crate) fn unsupported(command: &str) -> ! {
    eprintln!(
        "Error: `halo {command}` is not supported on {}; only Windows is supported.",
        std::env::consts::OS
    );
    std::process::exit(1);
}
