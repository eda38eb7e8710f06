//! Establishment listing, ownership and image management

use std::sync::Arc;

use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::json;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::models::{Establishment, EstablishmentPage, EstablishmentRequest, EstablishmentStats};
use crate::session::SessionStore;

/// Filters for the public establishment listing.
///
/// Unset fields are left out of the query string entirely, so the server
/// never sees empty parameters.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub min_rating: Option<f64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListFilters {
    pub fn with_search(mut self, value: &str) -> Self {
        self.search = Some(value.to_string());
        self
    }

    pub fn with_kind(mut self, value: &str) -> Self {
        self.kind = Some(value.to_string());
        self
    }

    pub fn with_neighborhood(mut self, value: &str) -> Self {
        self.neighborhood = Some(value.to_string());
        self
    }

    pub fn with_city(mut self, value: &str) -> Self {
        self.city = Some(value.to_string());
        self
    }

    pub fn with_min_rating(mut self, value: f64) -> Self {
        self.min_rating = Some(value);
        self
    }

    pub fn with_page(mut self, value: u32) -> Self {
        self.page = Some(value);
        self
    }

    pub fn with_limit(mut self, value: u32) -> Self {
        self.limit = Some(value);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text_fields = [
            ("search", &self.search),
            ("type", &self.kind),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                if !value.is_empty() {
                    pairs.push((key, value.clone()));
                }
            }
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("min_rating", min_rating.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Client for the `/api/establishments` endpoints
pub struct EstablishmentsClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
}

impl EstablishmentsClient {
    pub(crate) fn new(base_url: String, http_client: Client, session: Arc<SessionStore>) -> Self {
        Self {
            base_url,
            http_client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List approved establishments, filtered and paginated
    pub async fn list(&self, filters: ListFilters) -> Result<EstablishmentPage, Error> {
        let mut request = Fetch::get(&self.http_client, self.endpoint("/api/establishments"));
        for (key, value) in filters.query_pairs() {
            request = request.query(key, &value);
        }
        request.execute().await
    }

    /// Fetch a single establishment by id
    pub async fn get(&self, id: &str) -> Result<Establishment, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint(&format!("/api/establishments/{}", id)),
        )
        .execute()
        .await
    }

    /// Submit a new establishment for moderation
    pub async fn create(&self, request: &EstablishmentRequest) -> Result<Establishment, Error> {
        Fetch::post(&self.http_client, self.endpoint("/api/establishments"))
            .session(self.session.clone())
            .json(request)?
            .execute()
            .await
    }

    /// Fetch the establishment owned by the authenticated user
    pub async fn my_establishment(&self) -> Result<Establishment, Error> {
        Fetch::get(
            &self.http_client,
            self.endpoint("/api/establishments/my-establishment"),
        )
        .session(self.session.clone())
        .execute()
        .await
    }

    /// Update the establishment owned by the authenticated user.
    /// Only the fields set on `request` are sent.
    pub async fn update_my_establishment(
        &self,
        request: &EstablishmentRequest,
    ) -> Result<Establishment, Error> {
        Fetch::put(
            &self.http_client,
            self.endpoint("/api/establishments/my-establishment"),
        )
        .session(self.session.clone())
        .json(request)?
        .execute()
        .await
    }

    /// Upload one gallery image for an establishment
    pub async fn upload_image(
        &self,
        id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, Error> {
        debug!("uploading image {} for establishment {}", filename, id);
        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("image", part);

        Fetch::post(
            &self.http_client,
            self.endpoint(&format!("/api/establishments/{}/images", id)),
        )
        .session(self.session.clone())
        .multipart(form)
        .execute()
        .await
    }

    /// Upload several images at once, optionally flagged as the logo
    pub async fn upload_images(
        &self,
        files: Vec<(String, Vec<u8>)>,
        is_logo: bool,
    ) -> Result<serde_json::Value, Error> {
        let mut form = Form::new();
        for (filename, bytes) in files {
            form = form.part("images", Part::bytes(bytes).file_name(filename));
        }
        form = form.text("isLogo", is_logo.to_string());

        Fetch::post(
            &self.http_client,
            self.endpoint("/api/establishments/upload-images"),
        )
        .session(self.session.clone())
        .multipart(form)
        .execute()
        .await
    }

    /// Remove a gallery image by id
    pub async fn delete_image(&self, id: &str, image_id: &str) -> Result<(), Error> {
        Fetch::delete(
            &self.http_client,
            self.endpoint(&format!("/api/establishments/{}/images/{}", id, image_id)),
        )
        .session(self.session.clone())
        .execute_empty()
        .await
    }

    /// Remove an image by its public URL, the logo included
    pub async fn remove_image_by_url(&self, image_url: &str, is_logo: bool) -> Result<(), Error> {
        Fetch::delete(
            &self.http_client,
            self.endpoint("/api/establishments/remove-image"),
        )
        .session(self.session.clone())
        .json(&json!({ "imageUrl": image_url, "isLogo": is_logo }))?
        .execute_empty()
        .await
    }

    /// Public platform statistics
    pub async fn stats(&self) -> Result<EstablishmentStats, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/establishments/stats"))
            .execute()
            .await
    }

    /// Establishments within `radius` kilometers of a coordinate
    pub async fn nearby(
        &self,
        lat: f64,
        lng: f64,
        radius: f64,
    ) -> Result<Vec<Establishment>, Error> {
        Fetch::get(&self.http_client, self.endpoint("/api/establishments/nearby"))
            .query("lat", &lat.to_string())
            .query("lng", &lng.to_string())
            .query("radius", &radius.to_string())
            .execute()
            .await
    }
}

/// Establishment types offered by the registration and filter forms
pub fn establishment_types() -> Vec<&'static str> {
    vec![
        "Boteco",
        "Choperia",
        "Petiscaria",
        "Restaurante",
        "Bar",
        "Pub",
        "Lanchonete",
        "Pizzaria",
        "Hamburgueria",
        "Sorveteria",
        "Cafeteria",
        "Padaria",
        "Outro",
    ]
}

/// Neighborhoods offered by the filter form
pub fn neighborhoods() -> Vec<&'static str> {
    vec![
        "Centro",
        "Copacabana",
        "Ipanema",
        "Leblon",
        "Barra da Tijuca",
        "Tijuca",
        "Vila Isabel",
        "Lapa",
        "Santa Teresa",
        "Botafogo",
        "Flamengo",
        "Laranjeiras",
        "Urca",
        "São Cristóvão",
        "Maracanã",
        "Grajaú",
        "Vila da Penha",
        "Penha",
        "Ilha do Governador",
        "Campo Grande",
        "Bangu",
        "Realengo",
        "Jacarepaguá",
        "Recreio",
        "Guaratiba",
        "Outro",
    ]
}
