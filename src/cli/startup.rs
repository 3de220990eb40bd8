//! Startup banner for the interactive session

use crate::config::AppConfig;

/// Lines describing the effective settings of a session
pub fn settings_banner(config: &AppConfig) -> Vec<String> {
    let mut lines = vec![
        "(use 'q' to quit)".to_string(),
        String::new(),
        "CURRENT SETTINGS:".to_string(),
        format!("     telescope: {}", config.archive.telescope),
        format!("     server: {}", config.archive.server),
        format!("     output directory: {}", config.download.output_root.display()),
    ];

    if config.download.max_concurrent_downloads > 0 {
        lines.push(format!(
            "     concurrent downloads: {}",
            config.download.max_concurrent_downloads
        ));
    }

    lines.push(String::new());
    lines
}

/// Print the settings banner to stdout
pub fn show_settings(config: &AppConfig) {
    for line in settings_banner(config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_lists_settings() {
        let config = AppConfig::default();
        let lines = settings_banner(&config);

        assert_eq!(lines[0], "(use 'q' to quit)");
        assert!(lines.contains(&"CURRENT SETTINGS:".to_string()));
        assert!(lines.contains(&"     telescope: JWST".to_string()));
        assert!(lines.iter().any(|l| l.ends_with("mastFiles")));
        assert!(!lines.iter().any(|l| l.contains("concurrent")));
    }

    #[test]
    fn test_banner_shows_download_cap() {
        let mut config = AppConfig::default();
        config.download.max_concurrent_downloads = 4;

        let lines = settings_banner(&config);
        assert!(lines.contains(&"     concurrent downloads: 4".to_string()));
    }
}
