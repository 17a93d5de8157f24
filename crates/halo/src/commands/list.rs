/// Prints every window of the enumeration feed with the engine's view
/// of it.
#[cfg(windows)]
pub fn execute() {
    halo_windows::dpi::enable_dpi_awareness();

    let windows = match halo_windows::describe_windows() {
        Ok(windows) => windows,
        Err(e) => {
            eprintln!("Error: failed to enumerate windows: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{:<12} {:>8} {:>8} {:<9} {:<8} TITLE",
        "HWND", "WIDTH", "HEIGHT", "RESIDENT", "OUTLINE"
    );
    for window in &windows {
        let (width, height) = window.frame.map_or((0, 0), |f| (f.width, f.height));
        println!(
            "{:<12} {:>8} {:>8} {:<9} {:<8} {}",
            format!("0x{:X}", window.hwnd),
            width,
            height,
            if window.resident { "yes" } else { "no" },
            if window.eligible() { "yes" } else { "no" },
            window.title
        );
    }

    let outlined = windows.iter().filter(|w| w.eligible()).count();
    println!("\n{} windows found, {outlined} would be outlined", windows.len());
}

#[cfg(not(windows))]
pub fn execute() {
    super::unsupported("list");
}
