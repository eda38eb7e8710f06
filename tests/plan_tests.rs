use barzinhos_client::config::ClientOptions;
use barzinhos_client::models::{PlanId, User};
use barzinhos_client::Barzinhos;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn subscriber_client(mock_server: &MockServer) -> Barzinhos {
    let client = Barzinhos::new_with_options(
        ClientOptions::default()
            .with_base_url(&mock_server.uri())
            .with_persist_session(false),
    )
    .unwrap();
    let user: User = serde_json::from_value(json!({
        "id": "user-1",
        "email": "dona@example.com",
        "role": "establishment"
    }))
    .unwrap();
    client
        .session()
        .establish("test-token".to_string(), user)
        .unwrap();
    client
}

#[tokio::test]
async fn subscribing_to_a_paid_plan_returns_checkout_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/plans/subscribe"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(json!({ "plan_id": "premium" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Pagamento criado",
            "data": {
                "id": "pref-123",
                "init_point": "https://mercadopago.com.br/checkout/pref-123",
                "sandbox_init_point": "https://sandbox.mercadopago.com.br/checkout/pref-123",
                "status": "pending"
            }
        })))
        .mount(&mock_server)
        .await;

    let checkout = subscriber_client(&mock_server)
        .plans()
        .subscribe(PlanId::Premium)
        .await
        .unwrap();

    assert_eq!(checkout.id.as_deref(), Some("pref-123"));
    assert!(checkout.sandbox_init_point.is_some());
    assert!(checkout.init_point.is_some());
}

#[tokio::test]
async fn subscribing_to_the_free_plan_activates_without_checkout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/plans/subscribe"))
        .and(body_json(json!({ "plan_id": "free" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Plano gratuito ativado"
        })))
        .mount(&mock_server)
        .await;

    let checkout = subscriber_client(&mock_server)
        .plans()
        .subscribe(PlanId::Free)
        .await
        .unwrap();

    assert!(checkout.init_point.is_none());
    assert!(checkout.id.is_none());
}

#[tokio::test]
async fn my_subscription_parses_the_active_plan() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/plans/my-subscription"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plan_id": "vip",
            "price": 49.90,
            "features": ["Destaque na busca", "Selo VIP"],
            "is_active": true
        })))
        .mount(&mock_server)
        .await;

    let subscription = subscriber_client(&mock_server)
        .plans()
        .my_subscription()
        .await
        .unwrap();

    assert_eq!(subscription.plan_id, PlanId::Vip);
    assert!(subscription.is_active);
    assert_eq!(subscription.features.len(), 2);
    assert!(subscription.plan_id > PlanId::Premium);
}
