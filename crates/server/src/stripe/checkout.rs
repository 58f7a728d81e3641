use std::collections::HashMap;

use stripe::{
    CheckoutSession, CheckoutSessionMode, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    Currency,
};
use uuid::Uuid;

use super::client::StripeSettings;

/// Metadata attached to every wallet top-up session. The webhook reads
/// `user_id` back from it.
pub fn checkout_metadata(user_id: Uuid, amount_cents: i64) -> HashMap<String, String> {
    [
        ("user_id".to_string(), user_id.to_string()),
        ("amount_cents".to_string(), amount_cents.to_string()),
    ]
    .into_iter()
    .collect()
}

/// Create a one-time EUR Checkout session that tops up the user's wallet.
/// Returns the hosted page URL.
#[tracing::instrument(skip(settings, email))]
pub async fn create_wallet_checkout(
    settings: &StripeSettings,
    user_id: Uuid,
    email: &str,
    amount_cents: i64,
) -> Result<String, String> {
    let client = settings.client()?;
    let base_url = &settings.app_base_url;

    let success_url = format!("{base_url}/wallet?recharge=success");
    let cancel_url = format!("{base_url}/wallet?recharge=cancelled");
    let user_ref = user_id.to_string();

    let mut params = CreateCheckoutSession::new();
    params.mode = Some(CheckoutSessionMode::Payment);
    params.success_url = Some(&success_url);
    params.cancel_url = Some(&cancel_url);
    params.client_reference_id = Some(&user_ref);
    params.customer_email = Some(email);
    params.line_items = Some(vec![CreateCheckoutSessionLineItems {
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency: Currency::EUR,
            unit_amount: Some(amount_cents),
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: "Wallet recharge".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        quantity: Some(1),
        ..Default::default()
    }]);
    params.metadata = Some(checkout_metadata(user_id, amount_cents));

    let session = CheckoutSession::create(&client, params)
        .await
        .map_err(|e| format!("Failed to create checkout session: {}", e))?;

    session
        .url
        .ok_or_else(|| "No URL returned from Stripe".to_string())
}
