//! albsync-elbv2
//!
//! ELBv2 operations. Thin wrapper around the AWS Elastic Load Balancing v2 SDK.

pub mod client;
pub mod error;
pub mod load_balancers;
pub mod tags;

pub use aws_sdk_elasticloadbalancingv2::Client;
