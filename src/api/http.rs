use crate::api::traits::BrokerageApi;
use crate::api::types::PageRequest;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::models::{
    Appointment, AuthResponse, Credentials, NewReview, Page, Property, PropertyId, Registration,
    Review, ReviewId, User, UserId,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// reqwest-backed client for the brokerage REST API
#[derive(Clone)]
pub struct HttpBrokerageApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBrokerageApi {
    /// Create a client from configuration, without a session token
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach (or drop) the bearer token sent with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned status: {}", status);
            return Err(ApiError::from_status(status, body));
        }

        Ok(response)
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        debug!("Received {} bytes", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl BrokerageApi for HttpBrokerageApi {
    #[tracing::instrument(skip(self), err)]
    async fn list_properties(&self, request: PageRequest) -> Result<Page<Property>> {
        let get = self
            .client
            .get(self.url("/real-estates"))
            .query(&[("page", request.page), ("limit", request.limit)]);
        self.read(get).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        let get = self.client.get(self.url(&format!("/real-estates/{}", id)));
        match self.read(get).await {
            Ok(property) => Ok(Some(property)),
            Err(ApiError::NotFound) => {
                debug!("Property {} not found", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn properties_by_realtor(&self, agent_id: UserId) -> Result<Vec<Property>> {
        let get = self
            .client
            .get(self.url(&format!("/real-estates/by-realtor/{}", agent_id)));
        self.read(get).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_reviews(&self) -> Result<Vec<Review>> {
        self.read(self.client.get(self.url("/reviews"))).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn reviews_for_realtor(&self, agent_id: UserId) -> Result<Vec<Review>> {
        let get = self
            .client
            .get(self.url(&format!("/reviews/realtor/{}", agent_id)));
        self.read(get).await
    }

    #[tracing::instrument(skip(self, review), err)]
    async fn create_review(&self, review: &NewReview) -> Result<Review> {
        let post = self.client.post(self.url("/reviews")).json(review);
        self.read(post).await
    }

    #[tracing::instrument(skip(self, review), fields(review_id = review.id), err)]
    async fn update_review(&self, review: &Review) -> Result<Review> {
        let put = self
            .client
            .put(self.url(&format!("/reviews/{}", review.id)))
            .json(review);
        self.read(put).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_review(&self, id: ReviewId) -> Result<()> {
        let delete = self.client.delete(self.url(&format!("/reviews/{}", id)));
        self.send(delete).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), err)]
    async fn my_appointments(&self) -> Result<Vec<Appointment>> {
        self.read(self.client.get(self.url("/appointments"))).await
    }

    #[tracing::instrument(skip(self, appointment), fields(appointment_id = appointment.id), err)]
    async fn update_appointment(&self, appointment: &Appointment) -> Result<Appointment> {
        let put = self
            .client
            .put(self.url(&format!("/appointments/{}", appointment.id)))
            .json(appointment);
        self.read(put).await
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_profile(&self, id: UserId) -> Result<User> {
        self.read(self.client.get(self.url(&format!("/profile/{}", id))))
            .await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = user.id), err)]
    async fn update_profile(&self, user: &User) -> Result<User> {
        let put = self
            .client
            .put(self.url(&format!("/profile/{}", user.id)))
            .json(user);
        self.read(put).await
    }

    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email), err)]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let post = self.client.post(self.url("/auth/login")).json(credentials);
        self.read(post).await
    }

    #[tracing::instrument(skip(self, registration), fields(email = %registration.email), err)]
    async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let post = self.client.post(self.url("/auth/register")).json(registration);
        self.read(post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyKind;
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Answer a single request with a canned response. Resolves the base URL
    /// and, once the request has been read, its head (request line and
    /// headers).
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (head_tx, head_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let _ = head_tx.send(String::from_utf8_lossy(&buf[..read]).to_string());

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), head_rx)
    }

    fn api_at(base_url: String) -> HttpBrokerageApi {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        HttpBrokerageApi {
            client,
            base_url,
            token: None,
        }
    }

    #[tokio::test]
    async fn missing_property_is_none() {
        let (url, _) = serve_once("404 Not Found", r#"{"message":"no such listing"}"#).await;

        let property = api_at(url).get_property(5).await.unwrap();

        assert!(property.is_none());
    }

    #[tokio::test]
    async fn forbidden_is_unauthorized() {
        let (url, _) = serve_once("403 Forbidden", "").await;

        let err = api_at(url).my_appointments().await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized(StatusCode::FORBIDDEN)));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_body() {
        let (url, _) = serve_once("502 Bad Gateway", "upstream down").await;

        match api_at(url).list_reviews().await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (url, _) = serve_once("200 OK", r#"{"content": "#).await;

        let err = api_at(url)
            .list_properties(PageRequest::new(0, 9))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn decodes_house_and_sends_bearer_token() {
        let body = r#"{
            "id": 5,
            "name": "Rodinný dům",
            "type": "HOUSE",
            "plotArea": 640,
            "status": "AVAILABLE",
            "contractType": "SALE",
            "price": 15000000,
            "usableArea": 180,
            "address": { "city": "Brno" },
            "agentId": 7
        }"#;
        let (url, head) = serve_once("200 OK", body).await;

        let property = api_at(url)
            .with_token(Some("abc".to_string()))
            .get_property(5)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(property.kind, PropertyKind::House { plot_area: 640.0 });
        assert_eq!(property.address.city, "Brno");

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /real-estates/5 http/1.1"));
        assert!(head.contains("authorization: bearer abc"));
    }

    #[test]
    fn joins_paths_onto_trimmed_base() {
        let config = ClientConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        };
        let api = HttpBrokerageApi::new(&config).unwrap();

        assert_eq!(api.url("/reviews/realtor/7"), "http://localhost:8080/api/reviews/realtor/7");
    }

    #[test]
    fn token_is_optional() {
        let api = HttpBrokerageApi::new(&ClientConfig::default())
            .unwrap()
            .with_token(Some("abc".to_string()));
        assert_eq!(api.token.as_deref(), Some("abc"));

        let api = api.with_token(None);
        assert!(api.token.is_none());
    }
}
