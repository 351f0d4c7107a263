pub mod identity;
pub mod ingress;
pub mod load_balancer;
pub mod node;
pub mod service;
