// Blocking client for the photo server API

use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::constants::{MAP_PATH, PHOTOS_PATH, UPLOAD_PATH};
use crate::error::{GeopicError, Result};
use crate::settings::Settings;

/// One photo descriptor from the server listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerPhoto {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub taken_at: Option<String>,
}

impl ServerPhoto {
    /// Downloadable reference for this photo (url preferred over path).
    pub fn asset_ref(&self) -> Option<&str> {
        self.url.as_deref().or(self.path.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct PhotoListing {
    photos: Vec<ServerPhoto>,
}

/// Blocking API client. Holds an immutable snapshot of the settings for
/// the duration of one operation; no request timeout is configured, so a
/// hung request blocks until the server answers.
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from the current settings snapshot. Rejected before
    /// any request is made when no server URL is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base = settings.base_url();
        if base.is_empty() {
            return Err(GeopicError::ServerNotConfigured);
        }

        let http = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self {
            base_url: base.to_string(),
            http,
            token: settings.auth_token().map(|t| t.to_string()),
        })
    }

    /// Upload one photo as multipart form data. Geotag and timestamp fields
    /// are omitted from the form when absent.
    pub fn upload_photo(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        lat: Option<f64>,
        lng: Option<f64>,
        taken_at: Option<&str>,
    ) -> Result<()> {
        let part = multipart::Part::bytes(bytes)
            .mime_str("image/jpeg")?
            .file_name(filename.to_string());
        let mut form = multipart::Form::new().part("file", part);
        if let Some(lat) = lat {
            form = form.text("lat", lat.to_string());
        }
        if let Some(lng) = lng {
            form = form.text("lng", lng.to_string());
        }
        if let Some(taken_at) = taken_at {
            form = form.text("taken_at", taken_at.to_string());
        }

        let request = self
            .http
            .post(format!("{}{}", self.base_url, UPLOAD_PATH))
            .multipart(form);
        let response = self.authorized(request).send()?;
        Self::expect_success(response)?;
        Ok(())
    }

    /// Fetch the server photo listing, optionally filtered to photos created
    /// since the given cursor.
    pub fn fetch_photos(&self, since: Option<&str>) -> Result<Vec<ServerPhoto>> {
        let mut request = self.http.get(format!("{}{}", self.base_url, PHOTOS_PATH));
        if let Some(since) = since {
            request = request.query(&[("since", since)]);
        }

        let response = self.authorized(request).send()?;
        let response = Self::expect_success(response)?;
        let listing: PhotoListing = response.json()?;
        Ok(listing.photos)
    }

    /// Download a server asset to raw bytes. Server-relative references
    /// resolve against the base URL.
    pub fn download(&self, reference: &str) -> Result<Vec<u8>> {
        let url = self.resolve(reference);
        let response = self.authorized(self.http.get(url)).send()?;
        let response = Self::expect_success(response)?;
        Ok(response.bytes()?.to_vec())
    }

    /// URL of the server map page. The page itself is an opaque HTML view
    /// rendered outside this client; the same bearer header applies.
    pub fn map_url(&self) -> String {
        format!("{}{}", self.base_url, MAP_PATH)
    }

    fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
        }
    }

    fn expect_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Err(GeopicError::ServerStatus { status, body })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.token {
            request.header(AUTHORIZATION, format!("Bearer {}", token))
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_server_url_rejected() {
        let err = ApiClient::from_settings(&Settings::default());
        assert!(matches!(err, Err(GeopicError::ServerNotConfigured)));
    }

    #[test]
    fn test_map_url_and_relative_resolution() {
        let settings = Settings {
            server_url: "http://example.com/".to_string(),
            token: String::new(),
        };
        let api = ApiClient::from_settings(&settings).unwrap();

        assert_eq!(api.map_url(), "http://example.com/map");
        assert_eq!(
            api.resolve("/uploads/a.jpg"),
            "http://example.com/uploads/a.jpg"
        );
        assert_eq!(
            api.resolve("uploads/a.jpg"),
            "http://example.com/uploads/a.jpg"
        );
        assert_eq!(
            api.resolve("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_listing_deserializes_sparse_descriptors() {
        let raw = r#"{"photos":[{"url":"a.jpg","filename":"a.jpg"},{"path":"uploads/b.jpg","lat":1.5,"lng":2.5,"taken_at":"2026-08-01T00:00:00Z"}]}"#;
        let listing: PhotoListing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.photos.len(), 2);
        assert_eq!(listing.photos[0].asset_ref(), Some("a.jpg"));
        assert!(listing.photos[0].lat.is_none());
        assert_eq!(listing.photos[1].asset_ref(), Some("uploads/b.jpg"));
        assert_eq!(listing.photos[1].lat, Some(1.5));
    }
}
