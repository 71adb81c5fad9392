// src/stripe.rs
//
// Integração com o Stripe via API REST (sem SDK): corpos form-encoded e
// respostas JSON lidas com serde_json. A trait PaymentProcessor é a costura
// que permite substituir o cliente real por um dublê nos testes.

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::AppError;

const STRIPE_API_BASE: &str = "https://api.stripe.com";

// Configuração estática do checkout: o locale do redirecionamento e os meios
// de pagamento aceitos não variam por requisição.
pub const CHECKOUT_LOCALE: &str = "de";
pub const PAYMENT_METHOD_TYPES: [&str; 2] = ["card", "twint"];

// ---
// 1. Tipos trocados com o processador
// ---

// Endereço de suporte do perfil de negócio. Só entra no formulário se pelo
// menos um campo estiver preenchido.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    pub name: String,
    pub url: String,
    pub support_address: Option<SupportAddress>,
}

// Pedido de criação de uma subconta "express"
#[derive(Debug, Clone, PartialEq)]
pub struct NewProcessorAccount {
    pub country: String,
    pub email: String,
    pub business_profile: BusinessProfile,
}

// Retrato da subconta devolvido pelo processador. `requirements` é opaco
// para nós; repassamos como veio.
#[derive(Debug, Clone)]
pub struct ProcessorAccount {
    pub id: String,
    pub charges_enabled: bool,
    pub payouts_enabled: bool,
    pub requirements: Value,
}

// Uma linha da sessão de checkout (valores em centavos)
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub unit_amount: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
    // Identificadores nossos, gravados na sessão para reconciliação externa.
    pub metadata: Vec<(String, String)>,
}

// ---
// 2. A costura com o mundo externo
// ---
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Cria a subconta e devolve o identificador dela.
    async fn create_account(&self, account: &NewProcessorAccount) -> Result<String, AppError>;

    /// Consulta o retrato atual da subconta (capacidades + pendências).
    async fn retrieve_account(&self, account_id: &str) -> Result<ProcessorAccount, AppError>;

    /// Emite um link de onboarding de curta duração para a subconta.
    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<String, AppError>;

    /// Cria uma sessão de checkout em nome da subconta e devolve a URL
    /// hospedada pelo processador.
    async fn create_checkout_session(
        &self,
        account_id: &str,
        session: &CheckoutSessionRequest,
    ) -> Result<String, AppError>;
}

// ---
// 3. Montagem dos formulários (puro, testável sem rede)
// ---

// Capacidades pedidas na criação da subconta. TWINT só faz sentido para
// contas suíças.
pub fn requested_capabilities(country: &str) -> Vec<&'static str> {
    let mut capabilities = vec!["card_payments", "transfers"];
    if country == "CH" {
        capabilities.push("twint_payments");
    }
    capabilities
}

pub fn account_params(account: &NewProcessorAccount) -> Vec<(String, String)> {
    let mut params = vec![
        ("type".to_string(), "express".to_string()),
        ("country".to_string(), account.country.clone()),
        ("email".to_string(), account.email.clone()),
        (
            "business_profile[name]".to_string(),
            account.business_profile.name.clone(),
        ),
        (
            "business_profile[url]".to_string(),
            account.business_profile.url.clone(),
        ),
    ];

    // Sub-campos vazios nunca são enviados; sem nenhum sub-campo, a chave
    // support_address não aparece no formulário.
    if let Some(address) = &account.business_profile.support_address {
        let subfields = [
            ("line1", &address.line1),
            ("city", &address.city),
            ("state", &address.state),
            ("postal_code", &address.postal_code),
            ("country", &address.country),
        ];
        for (key, value) in subfields {
            if let Some(value) = value {
                params.push((
                    format!("business_profile[support_address][{key}]"),
                    value.clone(),
                ));
            }
        }
    }

    for capability in requested_capabilities(&account.country) {
        params.push((format!("capabilities[{capability}][requested]"), "true".to_string()));
    }

    params
}

pub fn checkout_params(session: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut params = vec![("mode".to_string(), "payment".to_string())];

    for (i, method) in PAYMENT_METHOD_TYPES.iter().enumerate() {
        params.push((format!("payment_method_types[{i}]"), method.to_string()));
    }

    for (i, item) in session.line_items.iter().enumerate() {
        params.push((
            format!("line_items[{i}][price_data][currency]"),
            item.currency.clone(),
        ));
        params.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        if let Some(description) = &item.description {
            params.push((
                format!("line_items[{i}][price_data][product_data][description]"),
                description.clone(),
            ));
        }
        params.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            item.unit_amount.to_string(),
        ));
        params.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
    }

    params.push(("locale".to_string(), CHECKOUT_LOCALE.to_string()));
    params.push(("success_url".to_string(), session.success_url.clone()));
    params.push(("cancel_url".to_string(), session.cancel_url.clone()));

    for (key, value) in &session.metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }

    params
}

// Extrai a mensagem de recusa do corpo de erro do Stripe
fn rejection_message(body: &Value) -> String {
    body["error"]["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}

// ---
// 4. O cliente real
// ---
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    // Nenhum timeout próprio é aplicado: uma chamada lenta ao processador
    // mantém a requisição aberta.
    async fn post_form(
        &self,
        path: &str,
        params: &[(String, String)],
        stripe_account: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut request = self
            .http
            .post(format!("{}{}", self.api_base, path))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(params);

        if let Some(account_id) = stripe_account {
            request = request.header("Stripe-Account", account_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ProcessorUnavailable(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ProcessorUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::ProcessorRejected(rejection_message(&body)));
        }
        Ok(body)
    }

    async fn get_json(&self, path: &str) -> Result<Value, AppError> {
        let response = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::ProcessorUnavailable(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ProcessorUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::ProcessorRejected(rejection_message(&body)));
        }
        Ok(body)
    }

    fn string_field(body: &Value, field: &str) -> Result<String, AppError> {
        body[field]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                AppError::ProcessorRejected(format!("Resposta inesperada do Stripe: {body}"))
            })
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_account(&self, account: &NewProcessorAccount) -> Result<String, AppError> {
        let body = self
            .post_form("/v1/accounts", &account_params(account), None)
            .await?;
        Self::string_field(&body, "id")
    }

    async fn retrieve_account(&self, account_id: &str) -> Result<ProcessorAccount, AppError> {
        let body = self.get_json(&format!("/v1/accounts/{account_id}")).await?;
        Ok(ProcessorAccount {
            id: Self::string_field(&body, "id")?,
            charges_enabled: body["charges_enabled"].as_bool().unwrap_or(false),
            payouts_enabled: body["payouts_enabled"].as_bool().unwrap_or(false),
            requirements: body["requirements"].clone(),
        })
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<String, AppError> {
        let params = vec![
            ("account".to_string(), account_id.to_string()),
            ("type".to_string(), "account_onboarding".to_string()),
            ("refresh_url".to_string(), refresh_url.to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];
        let body = self.post_form("/v1/account_links", &params, None).await?;
        Self::string_field(&body, "url")
    }

    async fn create_checkout_session(
        &self,
        account_id: &str,
        session: &CheckoutSessionRequest,
    ) -> Result<String, AppError> {
        // A sessão é criada diretamente na subconta (cabeçalho Stripe-Account);
        // a conta da plataforma nunca é cobrada.
        let body = self
            .post_form(
                "/v1/checkout/sessions",
                &checkout_params(session),
                Some(account_id),
            )
            .await?;
        Self::string_field(&body, "url")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_without_address() -> NewProcessorAccount {
        NewProcessorAccount {
            country: "CH".to_string(),
            email: "dono@cafezero.ch".to_string(),
            business_profile: BusinessProfile {
                name: "Cafe Zero".to_string(),
                url: "https://restaurant-platform.test/restaurants/1".to_string(),
                support_address: None,
            },
        }
    }

    #[test]
    fn account_params_omits_support_address_when_absent() {
        let params = account_params(&profile_without_address());

        assert!(params
            .iter()
            .all(|(key, _)| !key.starts_with("business_profile[support_address]")));
        assert!(params.contains(&("business_profile[name]".to_string(), "Cafe Zero".to_string())));
    }

    #[test]
    fn account_params_includes_only_filled_address_subfields() {
        let mut account = profile_without_address();
        account.business_profile.support_address = Some(SupportAddress {
            line1: Some("Bahnhofstrasse 1".to_string()),
            city: Some("Zürich".to_string()),
            state: None,
            postal_code: None,
            country: Some("CH".to_string()),
        });

        let params = account_params(&account);

        assert!(params.contains(&(
            "business_profile[support_address][line1]".to_string(),
            "Bahnhofstrasse 1".to_string()
        )));
        assert!(params.contains(&(
            "business_profile[support_address][city]".to_string(),
            "Zürich".to_string()
        )));
        assert!(params
            .iter()
            .all(|(key, _)| key != "business_profile[support_address][state]"));
        assert!(params
            .iter()
            .all(|(key, _)| key != "business_profile[support_address][postal_code]"));
    }

    #[test]
    fn twint_capability_only_for_switzerland() {
        assert!(requested_capabilities("CH").contains(&"twint_payments"));
        assert!(!requested_capabilities("DE").contains(&"twint_payments"));

        let mut account = profile_without_address();
        account.country = "DE".to_string();
        let params = account_params(&account);
        assert!(params.contains(&("capabilities[card_payments][requested]".to_string(), "true".to_string())));
        assert!(params.contains(&("capabilities[transfers][requested]".to_string(), "true".to_string())));
        assert!(params
            .iter()
            .all(|(key, _)| key != "capabilities[twint_payments][requested]"));
    }

    #[test]
    fn checkout_params_indexes_line_items_and_skips_empty_description() {
        let session = CheckoutSessionRequest {
            line_items: vec![
                LineItem {
                    name: "Margherita Pizza".to_string(),
                    description: Some("Classic tomato, mozzarella, basil".to_string()),
                    currency: "chf".to_string(),
                    unit_amount: 1850,
                    quantity: 1,
                },
                LineItem {
                    name: "Iced Latte".to_string(),
                    description: None,
                    currency: "chf".to_string(),
                    unit_amount: 650,
                    quantity: 3,
                },
            ],
            success_url: "http://localhost:3000/checkout/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "http://localhost:3000/checkout/cancel".to_string(),
            metadata: vec![("restaurant_id".to_string(), "7".to_string())],
        };

        let params = checkout_params(&session);

        assert!(params.contains(&("mode".to_string(), "payment".to_string())));
        assert!(params.contains(&("payment_method_types[0]".to_string(), "card".to_string())));
        assert!(params.contains(&("payment_method_types[1]".to_string(), "twint".to_string())));
        assert!(params.contains(&(
            "line_items[0][price_data][unit_amount]".to_string(),
            "1850".to_string()
        )));
        assert!(params.contains(&("line_items[1][quantity]".to_string(), "3".to_string())));
        assert!(params
            .iter()
            .all(|(key, _)| key != "line_items[1][price_data][product_data][description]"));
        assert!(params.contains(&("locale".to_string(), "de".to_string())));
        assert!(params.contains(&("metadata[restaurant_id]".to_string(), "7".to_string())));
    }

    #[test]
    fn rejection_message_prefers_stripe_error_body() {
        let body = json!({ "error": { "message": "Invalid account." } });
        assert_eq!(rejection_message(&body), "Invalid account.");

        let unexpected = json!({ "foo": "bar" });
        assert_eq!(rejection_message(&unexpected), unexpected.to_string());
    }
}
