//! Client for the users and companies REST backend.
//!
//! Every call goes straight to the backend. Nothing is cached, retried or
//! batched, and a non-2xx answer is reported as [`BackendError::Status`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod model;

use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub use error::BackendError;
pub use model::{Company, NewUser, User};

/// Default address of the REST backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000/";

/// Handle to the REST backend.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct Backend {
    client: Client,
    base_url: Url,
}

impl Backend {
    /// Create new `Backend` with the default [`Client`].
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create new `Backend` with the given [`Client`].
    #[must_use]
    pub fn with_client(base_url: Url, client: Client) -> Self {
        Self { client, base_url }
    }

    /// Parse `base_url` and create new `Backend` for it.
    pub fn parse(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::BaseUrl(base_url.into()));
        }
        Ok(Self::new(base_url))
    }

    /// Get base url.
    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /users/{id}`
    pub async fn user(&self, id: &str) -> Result<User, BackendError> {
        let url = self.endpoint(&["users", id])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// `GET /companies/{id}`
    pub async fn company(&self, id: &str) -> Result<Company, BackendError> {
        let url = self.endpoint(&["companies", id])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// `GET /companies/{id}/users`
    pub async fn company_users(&self, id: &str) -> Result<Vec<User>, BackendError> {
        let url = self.endpoint(&["companies", id, "users"])?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// `POST /users`
    pub async fn create_user(&self, user: &NewUser) -> Result<User, BackendError> {
        let url = self.endpoint(&["users"])?;
        self.send(Method::POST, url, Some(user)).await
    }

    /// Builds the url for `segments` below the base url. Each segment is
    /// percent-encoded, so a `/` inside an id stays part of that segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| BackendError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, %url, "calling backend");
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let result = match request.send().await {
            Ok(response) => read_json(method, url, response).await,
            Err(source) => Err(BackendError::Request {
                url: url.into(),
                source,
            }),
        };
        if let Err(e) = &result {
            tracing::error!(error = %e, "backend call failed");
        }
        result
    }
}

async fn read_json<T: DeserializeOwned>(method: Method, url: Url, response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::Status {
            method,
            url: url.into(),
            status,
        });
    }
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(source) => {
            return Err(BackendError::Request {
                url: url.into(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| BackendError::Decode {
        url: url.into(),
        source,
    })
}
