/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `halo init` to create a starter config file that users can
/// immediately edit.
pub fn generate_config() -> String {
    r##"# Halo configuration
# Location: ~/.config/halo/config.toml

[border]
# Frame color as a hex string. Pure black is the transparency key and
# is drawn as #010101.
color = "#ffa500"
# Gap in pixels between a window's frame and the outside of its overlay.
margin = 3
# Stroke width at 100% display scale. Scaled by the monitor DPI.
thickness = 2.0
# Corner radius of the frame. 0 draws a plain rectangle.
corner_radius = 0.0
# Keep overlays above every window. When false, each overlay sits
# directly below the window it outlines and only the margin shows.
topmost = true
# Also paint the caption bar of every outlined window (Windows 11).
# The system color is restored when Halo exits.
# caption_color = "#ffa500"

[engine]
# How often each overlay re-checks its window's position, in ms.
refresh_interval_ms = 100
# How often all top-level windows are enumerated, in seconds.
enumerate_interval_secs = 10

[logging]
# Enable file logging to ~/.config/halo/logs/halo.log.
enabled = false
# Minimum log level: "debug", "info", "warn", or "error".
level = "info"
# Maximum log file size in MB before rotation.
max_file_mb = 10
"##
    .to_string()
}
