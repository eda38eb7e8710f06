use barzinhos_client::config::ClientOptions;
use barzinhos_client::models::{NewReview, User};
use barzinhos_client::Barzinhos;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(mock_server: &MockServer) -> Barzinhos {
    Barzinhos::new_with_options(
        ClientOptions::default()
            .with_base_url(&mock_server.uri())
            .with_persist_session(false),
    )
    .unwrap()
}

fn authenticated_client(mock_server: &MockServer) -> Barzinhos {
    let client = client(mock_server);
    let user: User = serde_json::from_value(json!({
        "id": "user-1",
        "email": "ana@example.com",
        "role": "user"
    }))
    .unwrap();
    client
        .session()
        .establish("test-token".to_string(), user)
        .unwrap();
    client
}

#[tokio::test]
async fn reviews_for_an_establishment_are_paginated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reviews/establishment/est-1"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviews": [
                {
                    "id": "rev-1",
                    "establishment_id": "est-1",
                    "reviewer_name": "Ana",
                    "rating": 5,
                    "comment": "Melhor caipirinha da Lapa"
                }
            ],
            "total": 12,
            "page": 1,
            "pages": 2
        })))
        .mount(&mock_server)
        .await;

    let page = client(&mock_server)
        .reviews()
        .for_establishment("est-1", 1, 10)
        .await
        .unwrap();

    assert_eq!(page.reviews.len(), 1);
    assert_eq!(page.reviews[0].rating, 5);
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn create_posts_the_validated_review() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/reviews"))
        .and(body_json(json!({
            "establishment_id": "est-1",
            "reviewer_name": "Ana",
            "rating": 4,
            "comment": "Voltarei com certeza"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "rev-9",
            "establishment_id": "est-1",
            "reviewer_name": "Ana",
            "rating": 4,
            "comment": "Voltarei com certeza",
            "is_approved": false
        })))
        .mount(&mock_server)
        .await;

    let review = NewReview::new("est-1", "Ana", 4)
        .unwrap()
        .with_comment("Voltarei com certeza");

    let created = authenticated_client(&mock_server)
        .reviews()
        .create(&review)
        .await
        .unwrap();

    assert_eq!(created.id, "rev-9");
    assert!(!created.is_approved);
}

#[tokio::test]
async fn update_and_delete_target_the_review_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/reviews/rev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "rev-1",
            "establishment_id": "est-1",
            "reviewer_name": "Ana",
            "rating": 3
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/reviews/rev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Avaliação removida"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authenticated_client(&mock_server);
    let review = NewReview::new("est-1", "Ana", 3).unwrap();

    let updated = client.reviews().update("rev-1", &review).await.unwrap();
    assert_eq!(updated.rating, 3);

    client.reviews().delete("rev-1").await.unwrap();
}

#[tokio::test]
async fn my_reviews_lists_the_users_reviews() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reviews/my-reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "rev-1",
                "establishment_id": "est-1",
                "reviewer_name": "Ana",
                "rating": 5
            },
            {
                "id": "rev-2",
                "establishment_id": "est-2",
                "reviewer_name": "Ana",
                "rating": 2
            }
        ])))
        .mount(&mock_server)
        .await;

    let reviews = authenticated_client(&mock_server)
        .reviews()
        .my_reviews()
        .await
        .unwrap();

    assert_eq!(reviews.len(), 2);
}

#[tokio::test]
async fn has_reviewed_reads_the_flag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reviews/check/est-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hasReviewed": true
        })))
        .mount(&mock_server)
        .await;

    assert!(authenticated_client(&mock_server).reviews().has_reviewed("est-1").await);
}

#[tokio::test]
async fn has_reviewed_answers_false_on_any_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reviews/check/est-1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Erro interno"
        })))
        .mount(&mock_server)
        .await;

    assert!(!authenticated_client(&mock_server).reviews().has_reviewed("est-1").await);
}

#[tokio::test]
async fn stats_aggregate_an_establishments_reviews() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reviews/stats/est-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_reviews": 12,
            "average_rating": 4.5
        })))
        .mount(&mock_server)
        .await;

    let stats = client(&mock_server).reviews().stats("est-1").await.unwrap();
    assert_eq!(stats.total_reviews, 12);
    assert!((stats.average_rating - 4.5).abs() < f64::EPSILON);
}
