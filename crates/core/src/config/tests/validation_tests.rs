use crate::config::models::{AppConfig, MessageQueueType};

#[test]
fn test_invalid_database_url() {
    let mut config = AppConfig::default();
    config.database.url = "mysql://localhost/beacon".to_string();
    assert!(config.validate().is_err());

    config.database.url = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_connection_bounds() {
    let mut config = AppConfig::default();
    config.database.min_connections = 20;
    config.database.max_connections = 10;
    assert!(config.validate().is_err());
}

#[test]
fn test_rabbitmq_url_must_be_amqp() {
    let mut config = AppConfig::default();
    config.message_queue.url = "redis://localhost:6379".to_string();
    assert!(config.validate().is_err());

    // 内存队列不检查URL
    config.message_queue.r#type = MessageQueueType::InMemory;
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_values_rejected() {
    let mut config = AppConfig::default();
    config.message_queue.publish_timeout_seconds = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.dispatcher.claim_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.api.request_timeout_seconds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_observability() {
    let mut config = AppConfig::default();
    config.observability.log_level = "verbose".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.observability.log_format = "xml".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.observability.metrics_endpoint = "metrics".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_bind_address() {
    let mut config = AppConfig::default();
    config.api.bind_address = "localhost".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_publish_timeout_below_request_timeout() {
    let mut config = AppConfig::default();
    config.api.request_timeout_seconds = 10;
    config.message_queue.publish_timeout_seconds = 10;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("消息发布超时"));

    config.message_queue.publish_timeout_seconds = 30;
    assert!(config.validate().is_err());

    config.message_queue.publish_timeout_seconds = 9;
    assert!(config.validate().is_ok());
}
