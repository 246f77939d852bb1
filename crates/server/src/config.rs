//! Server configuration.
//!
//! Nothing is read from the environment or the command line. The defaults are
//! the values the service runs with; tests build their own `Config` to point
//! the server at a mock backend.
use usergraph_backend::{Backend, BackendError, DEFAULT_BACKEND_URL};

/// Address the server listens on.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4000";
/// Route the schema is mounted on.
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Socket address to bind.
    pub listen_addr: String,
    /// Base url of the REST backend.
    pub backend_url: String,
    /// Path of the GraphQL route, also used by the GraphiQL console.
    pub graphql_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            backend_url: DEFAULT_BACKEND_URL.into(),
            graphql_path: DEFAULT_GRAPHQL_PATH.into(),
        }
    }
}

impl Config {
    /// Set the backend base url.
    #[must_use]
    pub fn backend_url(mut self, backend_url: impl Into<String>) -> Self {
        self.backend_url = backend_url.into();
        self
    }

    /// Set the listen address.
    #[must_use]
    pub fn listen_addr(mut self, listen_addr: impl Into<String>) -> Self {
        self.listen_addr = listen_addr.into();
        self
    }

    /// Set the GraphQL route path.
    #[must_use]
    pub fn graphql_path(mut self, graphql_path: impl Into<String>) -> Self {
        self.graphql_path = graphql_path.into();
        self
    }

    /// Build the backend handle for `backend_url`.
    pub fn backend(&self) -> Result<Backend, BackendError> {
        Backend::parse(&self.backend_url)
    }

    /// The GraphQL path with exactly one leading `/`.
    pub(crate) fn endpoint(&self) -> String {
        format!("/{}", self.graphql_path.trim_matches('/'))
    }
}
