use juniper::{FieldResult, graphql_object};

use crate::{Company, Context, User};

/// Read entry points.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryRoot;

// A missing `id` is forwarded as an empty path segment and left to the backend.
#[graphql_object(context = Context, name = "RootQueryType")]
impl QueryRoot {
    /// Fetch a user by id.
    async fn user(context: &Context, id: Option<String>) -> FieldResult<Option<User>> {
        let user = context.backend().user(id.as_deref().unwrap_or_default()).await?;
        Ok(Some(user.into()))
    }

    /// Fetch a company by id.
    async fn company(context: &Context, id: Option<String>) -> FieldResult<Option<Company>> {
        let company = context.backend().company(id.as_deref().unwrap_or_default()).await?;
        Ok(Some(company.into()))
    }
}
