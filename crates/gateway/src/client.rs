use std::time::Duration;

use frontdesk_config::ApiConfig;
use frontdesk_session::{EntityId, SessionStore};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, GatewayResult};

/// A backend collection the client can list, fetch, create, update and delete.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Payload sent on create and update.
    type Draft: Serialize + Send + Sync;

    /// Path segment below the API root, e.g. `guests`.
    const COLLECTION: &'static str;

    fn id(&self) -> &EntityId;
}

/// How a 401 on this request should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    /// Login and registration: a 401 means bad credentials.
    Credentials,
    /// Everything else: a 401 with a token attached means the session expired.
    Session,
}

/// HTTP client for the hotel backend.
///
/// Reads the bearer token from the session store on every request, so a
/// login or logout elsewhere takes effect on the next call. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    verify_path: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> GatewayResult<Self> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|error| ApiError::Config(format!("invalid base url {:?}: {error}", config.base_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base url must use http or https, got {:?}",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|error| ApiError::Config(error.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            verify_path: config.verify_path.trim_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn verify_path(&self) -> &str {
        &self.verify_path
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn item_path(collection: &str, id: &EntityId) -> String {
        format!("{collection}/{}", urlencoding::encode(id.as_str()))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self
            .dispatch(Method::GET, path, RequestKind::Session, |request| request)
            .await?;
        decode(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B, kind: RequestKind) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(Method::POST, path, kind, |request| request.json(body))
            .await?;
        decode(response).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .dispatch(Method::PUT, path, RequestKind::Session, |request| request.json(body))
            .await?;
        decode(response).await
    }

    /// Delete accepts any 2xx, with or without a body.
    pub(crate) async fn delete(&self, path: &str) -> GatewayResult<()> {
        self.dispatch(Method::DELETE, path, RequestKind::Session, |request| request)
            .await?;
        Ok(())
    }

    async fn dispatch<F>(
        &self,
        method: Method,
        path: &str,
        kind: RequestKind,
        prepare: F,
    ) -> GatewayResult<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let mut request = self.http.request(method.clone(), self.url(path));

        let token = self.session.token();
        if let Some(token) = token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = prepare(request)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "api request completed");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let session_request = kind == RequestKind::Session && token.is_some();
        Err(ApiError::from_response(status, &body, session_request))
    }

    pub async fn list<R: Resource>(&self) -> GatewayResult<Vec<R>> {
        self.get(R::COLLECTION).await
    }

    pub async fn fetch<R: Resource>(&self, id: &EntityId) -> GatewayResult<R> {
        self.get(&Self::item_path(R::COLLECTION, id)).await
    }

    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> GatewayResult<R> {
        self.post(R::COLLECTION, draft, RequestKind::Session).await
    }

    pub async fn update<R: Resource>(&self, id: &EntityId, draft: &R::Draft) -> GatewayResult<R> {
        self.put(&Self::item_path(R::COLLECTION, id), draft).await
    }

    pub async fn delete_item<R: Resource>(&self, id: &EntityId) -> GatewayResult<()> {
        self.delete(&Self::item_path(R::COLLECTION, id)).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let body = response.text().await.map_err(ApiError::from_transport)?;
    serde_json::from_str(&body).map_err(|error| ApiError::Decode {
        message: error.to_string(),
    })
}
