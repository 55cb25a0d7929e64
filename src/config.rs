use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Ordocare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loopback address the console API binds to.
pub const BIND_ADDR: &str = "127.0.0.1:8420";

pub fn default_log_filter() -> &'static str {
    "ordocare=info"
}

/// Get the application data directory
/// ~/Ordocare/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Ordocare")
}

/// Persisted session records (the local-storage analog).
pub fn sessions_file() -> PathBuf {
    app_data_dir().join("sessions.json")
}

/// Where generated ordonnance PDFs land when saved to disk.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Ordocare"));
    }

    #[test]
    fn sessions_file_under_app_data() {
        let file = sessions_file();
        assert!(file.starts_with(app_data_dir()));
        assert!(file.ends_with("sessions.json"));
    }

    #[test]
    fn exports_dir_under_app_data() {
        let dir = exports_dir();
        assert!(dir.starts_with(app_data_dir()));
        assert!(dir.ends_with("exports"));
    }
}
