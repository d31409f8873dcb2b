//! Tests for logger types and routing

#[cfg(test)]
mod tests {
    use super::super::*;
    use tempfile::TempDir;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("outer failure")]
    struct OuterError {
        #[source]
        cause: std::io::Error,
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_log_level_from_str_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("critical".parse::<LogLevel>().unwrap(), LogLevel::Critical);
    }

    #[test]
    fn test_log_level_from_str_rejects_unknown() {
        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
        assert!(err.to_string().contains("debug"));
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_config_validation() {
        let config = LoggerConfig {
            log_name: String::new(),
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LoggerConfig {
            rotation_size: 0,
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(LoggerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_format_line_contains_level_and_message() {
        let line = Logger::format_line(LogLevel::Info, "hello");
        assert!(line.contains("INFO"));
        assert!(line.ends_with("hello"));
    }

    #[test]
    fn test_error_report_walks_source_chain() {
        let err = OuterError {
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "file missing"),
        };

        let report = ErrorReport::from_error(&err);
        assert_eq!(report.kind, "OuterError");
        assert_eq!(report.message, "outer failure");
        assert_eq!(report.chain, vec!["file missing".to_string()]);
    }

    #[test]
    fn test_short_type_name_strips_path() {
        assert_eq!(short_type_name::<std::io::Error>(), "Error");
        assert_eq!(short_type_name::<OuterError>(), "OuterError");
    }

    #[tokio::test]
    async fn test_logger_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "app".to_string(),
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        assert!(logger.ingress_path().ends_with("app_ingress.log"));
        assert!(logger.general_path().ends_with("app_general.log"));
        assert!(logger.error_path().ends_with("app_error.log"));

        logger.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_records_below_minimum_level_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "filtered".to_string(),
            level: LogLevel::Warning,
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        logger.debug("dropped debug").await.unwrap();
        logger.info("dropped info").await.unwrap();
        logger.warning("kept warning").await.unwrap();
        logger.close().await.unwrap();

        let content = tokio::fs::read_to_string(logger.general_path())
            .await
            .unwrap();
        assert!(!content.contains("dropped debug"));
        assert!(!content.contains("dropped info"));
        assert!(content.contains("kept warning"));
    }

    #[tokio::test]
    async fn test_console_mirroring_sink_presence() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "console".to_string(),
            enable_console: true,
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        // General and error streams carry a file sink plus a console
        // mirror; ingress is never mirrored
        assert_eq!(logger.general.sinks.len(), 2);
        assert_eq!(logger.error.sinks.len(), 2);
        assert_eq!(logger.ingress.sinks.len(), 1);

        // Mirroring does not replace the file sink
        logger.info("mirrored message").await.unwrap();
        logger.close().await.unwrap();

        let general = tokio::fs::read_to_string(logger.general_path())
            .await
            .unwrap();
        assert!(general.contains("mirrored message"));
    }

    #[tokio::test]
    async fn test_console_disabled_leaves_file_sink_only() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "plain".to_string(),
            enable_console: false,
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        assert_eq!(logger.general.sinks.len(), 1);
        assert_eq!(logger.error.sinks.len(), 1);
        assert_eq!(logger.ingress.sinks.len(), 1);

        logger.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_rapid_rotations_keep_distinct_backups() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "rapid".to_string(),
            rotation_size: 64,
            backup_count: 10,
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        // Every write after the first triggers a rotation; back-to-back
        // rotations share a timestamp tick, so names must not collide
        for i in 0..6 {
            let message = format!("{:0>100}", i);
            logger.info(&message).await.unwrap();
        }
        logger.close().await.unwrap();

        let mut rotated = 0;
        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("rapid_general.") && name != "rapid_general.log" {
                rotated += 1;
            }
        }

        assert_eq!(rotated, 5, "each rotation must produce its own backup");
    }

    #[tokio::test]
    async fn test_rotation_prunes_old_backups() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(LoggerConfig {
            log_dir: temp_dir.path().to_path_buf(),
            log_name: "rotating".to_string(),
            rotation_size: 64,
            backup_count: 2,
            ..LoggerConfig::default()
        })
        .await
        .unwrap();

        // Each line exceeds the threshold, forcing a rotation per write
        for i in 0..6 {
            let message = format!("{:0>100}", i);
            logger.info(&message).await.unwrap();
        }
        logger.close().await.unwrap();

        let mut rotated = 0;
        let mut entries = tokio::fs::read_dir(temp_dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("rotating_general.") && name != "rotating_general.log" {
                rotated += 1;
            }
        }

        assert!(rotated <= 2, "expected at most 2 backups, found {rotated}");
        assert!(rotated > 0, "expected at least one rotated file");
    }
}
