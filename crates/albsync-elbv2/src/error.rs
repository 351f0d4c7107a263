use thiserror::Error;

#[derive(Debug, Error)]
pub enum Elbv2Error {
    #[error("load balancer not found: {arn}")]
    NotFound { arn: String },

    #[error("ELBv2 DescribeLoadBalancers error: {0}")]
    Describe(String),

    #[error("ELBv2 DescribeTags error: {0}")]
    DescribeTags(String),

    #[error("ELBv2 CreateLoadBalancer error: {0}")]
    Create(String),

    #[error("ELBv2 modify error: {0}")]
    Modify(String),

    #[error("ELBv2 DeleteLoadBalancer error: {0}")]
    Delete(String),

    #[error("malformed ELBv2 response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Core(#[from] albsync_core::CoreError),
}

/// Walk the full error chain and join all causes into one string.
///
/// SDK errors often have terse `Display` impls (e.g. "service error")
/// but useful detail in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
