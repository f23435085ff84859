use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// DynamoDB table holding every record (default: "circles")
    pub table_name: String,
    /// Index resolving circle names (default: "gsi1")
    pub gsi1_name: String,
    /// Index resolving user mail addresses (default: "gsi2")
    pub gsi2_name: String,
    /// Base of `location` headers, always ending in `/` (default: "http://localhost/")
    pub root_uri: String,
    /// Custom endpoint URL, e.g. DynamoDB Local (default: none)
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MAIN_TABLE_NAME` - Table name (default: "circles")
    /// - `MAIN_TABLE_GSI1_NAME` - Circle name index (default: "gsi1")
    /// - `MAIN_TABLE_GSI2_NAME` - Mail address index (default: "gsi2")
    /// - `ROOT_URI` - Base URI for created resources (default: "http://localhost/")
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (default: none)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("MAIN_TABLE_NAME").unwrap_or_else(|_| "circles".to_string()),
            gsi1_name: env::var("MAIN_TABLE_GSI1_NAME").unwrap_or_else(|_| "gsi1".to_string()),
            gsi2_name: env::var("MAIN_TABLE_GSI2_NAME").unwrap_or_else(|_| "gsi2".to_string()),
            root_uri: normalize_root_uri(
                env::var("ROOT_URI").unwrap_or_else(|_| "http://localhost/".to_string()),
            ),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok().filter(|url| !url.is_empty()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Appends the trailing slash resource paths are joined onto.
fn normalize_root_uri(root_uri: String) -> String {
    if root_uri.ends_with('/') {
        root_uri
    } else {
        format!("{root_uri}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_uri_normalization() {
        assert_eq!(
            normalize_root_uri("https://api.example.com/v1".to_string()),
            "https://api.example.com/v1/"
        );
        assert_eq!(
            normalize_root_uri("https://api.example.com/".to_string()),
            "https://api.example.com/"
        );
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("MAIN_TABLE_NAME");
        env::remove_var("MAIN_TABLE_GSI1_NAME");
        env::remove_var("MAIN_TABLE_GSI2_NAME");
        env::remove_var("ROOT_URI");
        env::remove_var("AWS_ENDPOINT_URL");
        env::remove_var("AWS_REGION");

        let config = Config::from_env();

        assert_eq!(config.table_name, "circles");
        assert_eq!(config.gsi1_name, "gsi1");
        assert_eq!(config.gsi2_name, "gsi2");
        assert_eq!(config.root_uri, "http://localhost/");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.region, "us-east-1");
    }
}
