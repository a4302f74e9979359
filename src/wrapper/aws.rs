use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the shared AWS configuration from the default provider chain.
///
/// SDK-level retries are off; calls are retried by
/// [`RetryPolicy`](crate::retry::RetryPolicy) instead.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }

    loader.load().await
}
