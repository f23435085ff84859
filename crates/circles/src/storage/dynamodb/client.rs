//! AWS SDK client setup.

use aws_sdk_dynamodb::Client;

use crate::config::Config;

/// Creates a DynamoDB client for the configured region and endpoint.
///
/// Build it once per process and share it; the client is cheap to clone and
/// reuses its connection pool.
pub async fn create_client(config: &Config) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Returns a display string for the target environment.
pub fn target_display(config: &Config) -> String {
    match &config.endpoint_url {
        Some(url) => format!("Local DynamoDB ({url})"),
        None => format!("AWS DynamoDB (region: {})", config.region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint_url: Option<&str>) -> Config {
        Config {
            table_name: "circles".to_string(),
            gsi1_name: "gsi1".to_string(),
            gsi2_name: "gsi2".to_string(),
            root_uri: "http://localhost/".to_string(),
            endpoint_url: endpoint_url.map(str::to_string),
            region: "eu-west-1".to_string(),
        }
    }

    #[test]
    fn test_target_display() {
        assert_eq!(
            target_display(&config(Some("http://localhost:8000"))),
            "Local DynamoDB (http://localhost:8000)"
        );
        assert_eq!(
            target_display(&config(None)),
            "AWS DynamoDB (region: eu-west-1)"
        );
    }
}
