pub mod adapters;
pub mod factory;
pub mod payment;

use serde::{Deserialize, Serialize};

// GatewayVia picks the payment gateway adapter a service is wired with.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum GatewayVia {
    Simulated,
}
