//! GraphQL schema for users and companies.
//!
//! Every resolver forwards to the REST backend through the [`Backend`] held in
//! the request [`Context`]. Relations are fetched only when selected, one
//! request per parent object.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod mutation;
mod object;
mod query;

use juniper::{EmptySubscription, RootNode};
use usergraph_backend::Backend;

pub use mutation::MutationRoot;
pub use object::{Company, User};
pub use query::QueryRoot;

/// The schema type served by usergraph.
pub type Schema = RootNode<'static, QueryRoot, MutationRoot, EmptySubscription<Context>>;

/// Create the schema.
#[must_use]
pub fn create_schema() -> Schema {
    Schema::new(QueryRoot, MutationRoot, EmptySubscription::<Context>::new())
}

/// Per request context handed to resolvers.
#[derive(Clone, Debug)]
pub struct Context {
    backend: Backend,
}

impl Context {
    /// Create new `Context` resolving against `backend`.
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Get backend reference.
    #[inline]
    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

impl juniper::Context for Context {}
