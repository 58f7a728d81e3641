use stripe::Client;

/// Stripe credentials and the public URL checkout redirects back to.
#[derive(Debug, Clone)]
pub struct StripeSettings {
    pub secret_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub app_base_url: String,
}

impl Default for StripeSettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            webhook_secret: None,
            app_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl StripeSettings {
    pub fn from_env() -> Self {
        Self {
            secret_key: stripe_secret_key().ok(),
            webhook_secret: stripe_webhook_secret().ok(),
            app_base_url: app_base_url(),
        }
    }

    /// Create a Stripe API client from the configured secret key.
    pub fn client(&self) -> Result<Client, String> {
        self.secret_key
            .as_deref()
            .map(Client::new)
            .ok_or_else(|| "STRIPE_SECRET_KEY is not configured".to_string())
    }

    pub fn webhook_secret(&self) -> Result<&str, String> {
        self.webhook_secret
            .as_deref()
            .ok_or_else(|| "STRIPE_WEBHOOK_SECRET is not configured".to_string())
    }
}

pub fn stripe_secret_key() -> Result<String, String> {
    std::env::var("STRIPE_SECRET_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "STRIPE_SECRET_KEY is not configured".to_string())
}

pub fn stripe_webhook_secret() -> Result<String, String> {
    std::env::var("STRIPE_WEBHOOK_SECRET")
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "STRIPE_WEBHOOK_SECRET is not configured".to_string())
}

pub fn app_base_url() -> String {
    std::env::var("APP_BASE_URL")
        .map(|u| u.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "http://localhost:8080".to_string())
}
