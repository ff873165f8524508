//! Common test utilities for tenant-billing-service integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use service_core::config::Config as CommonConfig;
use service_core::observability::init_test_tracing;
use tenant_billing_service::config::{BillingConfig, BillingDefaults};
use tenant_billing_service::models::Locale;
use tenant_billing_service::startup::Application;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn test_config(locale: Locale) -> BillingConfig {
    BillingConfig {
        common: CommonConfig { port: 0 },
        service_name: "tenant-billing-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        billing: BillingDefaults {
            locale,
            ..BillingDefaults::default()
        },
    }
}

pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_locale(Locale::English).await
    }

    pub async fn spawn_with_locale(locale: Locale) -> Self {
        init_test_tracing("info,tenant_billing_service=debug");

        let app = Application::build(test_config(locale))
            .await
            .expect("Failed to build test application");

        let http_port = app.http_port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", http_address);
        let mut attempts = 0;
        loop {
            match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => break,
                _ if attempts < 20 => {
                    attempts += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                }
                _ => panic!("Test server did not become ready after 20 attempts"),
            }
        }

        Self {
            http_address,
            http_port,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.http_address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
