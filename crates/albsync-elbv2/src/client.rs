use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_elasticloadbalancingv2::Client;

/// Upper bound on a single ELBv2 operation, retries included.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Build an ELBv2 client for `region` from the default credential chain.
pub async fn build_client(region: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(OPERATION_TIMEOUT)
                .build(),
        )
        .load()
        .await;

    Client::new(&config)
}
