pub mod checkout;
pub mod client;
pub mod webhooks;
