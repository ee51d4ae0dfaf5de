use std::time::Duration;
use tempfile::TempDir;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(base: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str, base_currency: &str) -> String {
        let config_path = dir.join("config.yaml");
        let data_path = dir.join("data");
        let config_content = format!(
            r#"
provider:
  base_url: "{}"
  timeout_secs: 2
base_currency: "{}"
data_path: "{}"
"#,
            base_url,
            base_currency,
            data_path.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_str().unwrap().to_string()
    }
}

const USD_RATES: &str = r#"{
    "base": "USD",
    "rates": {"USD": 1, "IDR": 15000, "EUR": 0.92, "JPY": 150}
}"#;

#[test_log::test(tokio::test)]
async fn test_convert_flow_records_history() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: 1.0,
            from: "USD".to_string(),
            to: "IDR".to_string(),
            swap: false,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: 15000.0,
            from: "USD".to_string(),
            to: "IDR".to_string(),
            swap: true,
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Swapped convert failed with: {:?}", result.err());

    let config = fxc::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let controller = fxc::build_controller(&config).unwrap();
    let records: Vec<_> = controller.history().list().cloned().collect();
    info!(?records, "Persisted history");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_currency, "IDR");
    assert_eq!(records[0].target_currency, "USD");
    assert!((records[0].target_amount - 1.0).abs() < 1e-9);
    assert_eq!(records[1].source_currency, "USD");
    assert_eq!(records[1].target_amount, 15000.0);
}

#[test_log::test(tokio::test)]
async fn test_history_clear_persists() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");

    fxc::run_command(
        fxc::AppCommand::Convert {
            amount: 10.0,
            from: "EUR".to_string(),
            to: "JPY".to_string(),
            swap: false,
        },
        Some(&config_path),
    )
    .await
    .unwrap();

    fxc::run_command(fxc::AppCommand::History { clear: false }, Some(&config_path))
        .await
        .unwrap();
    fxc::run_command(fxc::AppCommand::History { clear: true }, Some(&config_path))
        .await
        .unwrap();

    let config = fxc::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let controller = fxc::build_controller(&config).unwrap();
    assert!(controller.history().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_rejected_without_history() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: 1_000_000_001.0,
            from: "USD".to_string(),
            to: "IDR".to_string(),
            swap: false,
        },
        Some(&config_path),
    )
    .await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Amount must not exceed 1,000,000,000");

    let config = fxc::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let controller = fxc::build_controller(&config).unwrap();
    assert!(controller.history().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_provider_outage_surfaces_generic_failure() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: 5.0,
            from: "USD".to_string(),
            to: "EUR".to_string(),
            swap: false,
        },
        Some(&config_path),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Conversion failed, please try again"
    );

    let rates = fxc::run_command(fxc::AppCommand::Rates, Some(&config_path)).await;
    assert!(rates.is_err());
}

#[test_log::test(tokio::test)]
async fn test_slow_provider_times_out() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(USD_RATES)
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");
    let config = fxc::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let mut controller = fxc::build_controller(&config).unwrap();

    let start = std::time::Instant::now();
    let result = controller.force_refresh().await;
    let elapsed = start.elapsed();

    assert!(result.is_err());
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(10));
    assert_eq!(controller.stats().error_count, 1);
    assert!(
        controller.engine().state().errors()[0]
            .message
            .contains("timed out")
    );
}

#[test_log::test(tokio::test)]
async fn test_rates_and_stats_commands() {
    let mock_server = test_utils::create_mock_server("USD", USD_RATES).await;
    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri(), "USD");

    for command in [
        fxc::AppCommand::Rates,
        fxc::AppCommand::Stats,
        fxc::AppCommand::Currencies,
    ] {
        let result = fxc::run_command(command.clone(), Some(&config_path)).await;
        assert!(result.is_ok(), "{command:?} failed with: {:?}", result.err());
    }
}

#[test]
fn test_unsupported_base_currency_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), "http://127.0.0.1:9", "XYZ");
    let config = fxc::core::config::AppConfig::load_from_path(&config_path).unwrap();

    let result = fxc::build_controller(&config);
    assert!(result.is_err());
    assert!(
        result
            .err()
            .unwrap()
            .to_string()
            .contains("Unsupported base currency")
    );
}
