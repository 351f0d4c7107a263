pub mod health;
pub mod hostnames;
pub mod nodeport;
pub mod status;
