use std::sync::Arc;
use crate::gateway::GatewayVia;
use crate::gateway::adapters::simulated::SimulatedPaymentGateway;
use crate::gateway::payment::PaymentGateway;

pub fn create_payment_gateway(via: GatewayVia) -> Arc<dyn PaymentGateway> {
    match via {
        GatewayVia::Simulated => Arc::new(SimulatedPaymentGateway::new()),
    }
}
