use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::gateway::GatewayVia;
use crate::gateway::factory::create_payment_gateway;
use crate::lending::factory::create_lending_service;
use crate::payments::domain::PaymentService;
use crate::payments::domain::service::PaymentServiceImpl;

pub async fn create_payment_service(config: &Configuration, store: RepositoryStore,
                                    via: GatewayVia) -> LibraryResult<Box<dyn PaymentService>> {
    let lending_svc = create_lending_service(config, store).await?;
    Ok(Box::new(PaymentServiceImpl::new(lending_svc, create_payment_gateway(via))))
}
