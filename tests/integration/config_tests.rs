//! Configuration loading tests

#[cfg(test)]
mod tests {
    use fanout_gateway::Config;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_example_config_parses() {
        let content = include_str!("../../config/gateway.yaml.example");
        let config = Config::from_yaml_str(content).expect("example config should be valid");

        assert_eq!(config.server().port, 1234);
        assert_eq!(config.dispatch().concurrency_limit(), Some(64));
        assert_eq!(config.dispatch().item_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.dispatch().batch_timeout(), None);
        assert!(!config.dispatch().keep_alive);
        assert!(!config.storage().database.enabled);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 8088\ndispatch:\n  max_concurrency: 0\n  batch_timeout_ms: 1500"
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.server().port, 8088);
        assert_eq!(config.dispatch().concurrency_limit(), None);
        assert_eq!(
            config.dispatch().batch_timeout(),
            Some(Duration::from_millis(1500))
        );
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/gateway.yaml").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_yaml_str("dispatch:\n  item_timeout_ms: 0\n").is_err());
        assert!(Config::from_yaml_str("server:\n  port: 0\n").is_err());
    }
}
