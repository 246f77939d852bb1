//! HTTP entry point for usergraph.
//!
//! Mounts the GraphQL schema on a single route, with the GraphiQL console
//! served on `GET` requests that carry no query.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
mod endpoint;
mod shutdown;

use salvo::affix_state;
use salvo::logging::Logger;
use salvo::prelude::*;
use thiserror::Error;
use usergraph_backend::BackendError;
use usergraph_schema::{Context, create_schema};

pub use config::Config;
use endpoint::{GraphQLState, graphql};

/// Errors that stop the server.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend url in the config is unusable.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The listen address could not be bound.
    #[error("failed to bind `{addr}`: {source}")]
    Bind {
        /// Configured listen address.
        addr: String,
        /// Underlying error.
        #[source]
        source: salvo::Error,
    },
}

/// Build the router for `config`.
pub fn route(config: &Config) -> Result<Router, Error> {
    let context = Context::new(config.backend()?);
    let endpoint = config.endpoint();
    let state = GraphQLState::new(create_schema(), context, endpoint.clone());
    let router = Router::new().hoop(Logger::default()).push(
        Router::with_path(endpoint.trim_start_matches('/'))
            .hoop(affix_state::inject(state))
            .get(graphql)
            .post(graphql),
    );
    Ok(router)
}

/// Bind `config.listen_addr` and serve until a shutdown signal arrives.
pub async fn serve(config: Config) -> Result<(), Error> {
    let router = route(&config)?;
    let acceptor = TcpListener::new(config.listen_addr.clone())
        .try_bind()
        .await
        .map_err(|source| Error::Bind {
            addr: config.listen_addr.clone(),
            source,
        })?;
    tracing::info!(
        backend = %config.backend_url,
        "Listening on http://{}{}",
        config.listen_addr,
        config.endpoint()
    );

    let server = Server::new(acceptor);
    tokio::spawn(shutdown::listen(server.handle()));
    server.serve(router).await;
    Ok(())
}
