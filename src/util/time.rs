/// Milliseconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn epoch_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64() * 1000.0)
        .unwrap_or_default()
}

/// Milliseconds since the UNIX epoch, from the page's performance clock
#[cfg(target_arch = "wasm32")]
pub fn epoch_millis() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.time_origin() + perf.now())
        .unwrap_or(0.0)
}

/// Whole seconds since the UNIX epoch, used for record timestamps
pub fn timestamp_secs() -> u64 {
    (epoch_millis() / 1000.0) as u64
}

/// Timestamp for export file names, e.g. `edit-1718000000123.png`
pub fn export_file_name() -> String {
    format!("edit-{}.png", epoch_millis() as u64)
}
