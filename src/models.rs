//! Client-side mirrors of the remote-owned Barzinhos records
//!
//! The server owns every invariant on these records; the client submits
//! candidate data and surfaces server-reported errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Account role, gates UI visibility only — authorization is server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Establishment,
    Admin,
}

fn default_true() -> bool {
    true
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Image attached to an establishment; at most one is primary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstablishmentImage {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A business listing owned by a user with the establishment role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Establishment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Establishment category ("type" on the wire)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub images: Vec<EstablishmentImage>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(rename = "faixa_etaria", default)]
    pub age_rating: Option<String>,
    #[serde(default)]
    pub pet_friendly: bool,
    #[serde(default)]
    pub lgbt_friendly: bool,
    #[serde(rename = "horarios_funcionamento", default)]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(default)]
    pub delivery: bool,
    #[serde(rename = "link_delivery", default)]
    pub delivery_link: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Establishment {
    /// Rating text shown on listing cards
    pub fn rating_label(&self) -> String {
        rating_label(self.average_rating, self.total_reviews)
    }

    /// Primary image when one is flagged, otherwise the first upload
    pub fn primary_image(&self) -> Option<&EstablishmentImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

/// One-decimal rating text with the review count, or the no-reviews fallback
pub fn rating_label(average_rating: f64, total_reviews: u32) -> String {
    if average_rating > 0.0 {
        format!("{:.1} ({})", average_rating, total_reviews)
    } else {
        "Sem avaliações".to_string()
    }
}

/// Candidate establishment data for create/update calls.
///
/// `None` fields are omitted from the payload so partial updates never
/// null out server-held values.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EstablishmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(rename = "faixa_etaria", skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lgbt_friendly: Option<bool>,
    #[serde(
        rename = "horarios_funcionamento",
        skip_serializing_if = "Option::is_none"
    )]
    pub opening_hours: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<bool>,
    #[serde(rename = "link_delivery", skip_serializing_if = "Option::is_none")]
    pub delivery_link: Option<String>,
}

/// Visitor review of an establishment, moderated by admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub establishment_id: String,
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Candidate review; the rating range is checked before submission
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub establishment_id: String,
    pub reviewer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_email: Option<String>,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    /// Build a review, rejecting ratings outside 1..=5 locally
    pub fn new(establishment_id: &str, reviewer_name: &str, rating: u8) -> Result<Self, Error> {
        if !(1..=5).contains(&rating) {
            return Err(Error::validation(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            establishment_id: establishment_id.to_string(),
            reviewer_name: reviewer_name.to_string(),
            reviewer_email: None,
            rating,
            comment: None,
        })
    }

    /// Attach the reviewer's e-mail
    pub fn with_email(mut self, email: &str) -> Self {
        self.reviewer_email = Some(email.to_string());
        self
    }

    /// Attach a free-text comment
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// Subscription tier; ordering follows the upgrade path
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    #[default]
    Free,
    Premium,
    Vip,
}

impl PlanId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::Premium => "premium",
            PlanId::Vip => "vip",
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current plan subscription of the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub plan_id: PlanId,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: bool,
}

/// Checkout data returned when subscribing to a paid plan.
/// Free-plan activations come back with every field empty.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaymentCheckout {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_code_base64: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Paginated establishment listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EstablishmentPage {
    #[serde(default)]
    pub establishments: Vec<Establishment>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Paginated review listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReviewPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

/// Public directory statistics
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EstablishmentStats {
    #[serde(default)]
    pub total_establishments: u64,
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub average_rating: f64,
}

/// Review aggregation for one establishment
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReviewStats {
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub average_rating: f64,
}

/// Totals for a user population
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserTotals {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub active: u64,
}

/// Establishment totals broken down by moderation state
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModerationTotals {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// One bucket of a grouped report
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GroupCount {
    #[serde(alias = "_id", default)]
    pub name: String,
    #[serde(default)]
    pub count: u64,
}

/// Admin dashboard statistics
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DashboardStats {
    #[serde(default)]
    pub users: UserTotals,
    #[serde(default)]
    pub establishments: ModerationTotals,
    #[serde(rename = "establishmentsByNeighborhood", default)]
    pub establishments_by_neighborhood: Vec<GroupCount>,
    #[serde(rename = "establishmentsByType", default)]
    pub establishments_by_type: Vec<GroupCount>,
}

/// Successful credential exchange
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Account registration payload
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Establishment registration: credentials plus the initial listing data
#[derive(Debug, Clone, Serialize)]
pub struct RegisterEstablishmentRequest {
    #[serde(flatten)]
    pub credentials: RegisterRequest,
    #[serde(flatten)]
    pub establishment: EstablishmentRequest,
}

/// Registration outcome; servers differ on whether a session is returned
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_label_formats_to_one_decimal_with_count() {
        assert_eq!(rating_label(4.53, 12), "4.5 (12)");
        assert_eq!(rating_label(5.0, 1), "5.0 (1)");
    }

    #[test]
    fn rating_label_falls_back_when_unrated() {
        assert_eq!(rating_label(0.0, 0), "Sem avaliações");
    }

    #[test]
    fn new_review_rejects_out_of_range_rating() {
        assert!(NewReview::new("est-1", "Ana", 0).is_err());
        assert!(NewReview::new("est-1", "Ana", 6).is_err());
        let review = NewReview::new("est-1", "Ana", 5).unwrap();
        assert_eq!(review.rating, 5);
    }

    #[test]
    fn establishment_request_omits_unset_fields() {
        let request = EstablishmentRequest {
            name: Some("Bar da Lapa".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "Bar da Lapa" }));
    }

    #[test]
    fn plan_ids_follow_the_upgrade_order() {
        assert!(PlanId::Free < PlanId::Premium);
        assert!(PlanId::Premium < PlanId::Vip);
        assert_eq!(
            serde_json::to_value(PlanId::Vip).unwrap(),
            serde_json::json!("vip")
        );
    }

    #[test]
    fn primary_image_prefers_the_flagged_one() {
        let establishment: Establishment = serde_json::from_value(serde_json::json!({
            "id": "est-1",
            "name": "Boteco do Zé",
            "images": [
                { "id": "img-1", "filename": "a.jpg", "is_primary": false },
                { "id": "img-2", "filename": "b.jpg", "is_primary": true }
            ]
        }))
        .unwrap();
        assert_eq!(establishment.primary_image().unwrap().id, "img-2");
    }
}
