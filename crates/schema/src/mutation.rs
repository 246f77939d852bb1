use juniper::{FieldResult, graphql_object};
use usergraph_backend::NewUser;

use crate::{Context, User};

/// Write entry points.
#[derive(Clone, Copy, Debug, Default)]
pub struct MutationRoot;

#[graphql_object(context = Context, name = "Mutation")]
impl MutationRoot {
    /// Create a user. Only `firstName` and `age` are sent to the backend.
    async fn add_user(
        context: &Context,
        first_name: String,
        age: String,
        company_id: Option<String>,
    ) -> FieldResult<Option<User>> {
        tracing::debug!(%first_name, %age, ?company_id, "adding user");
        let user = context.backend().create_user(&NewUser { first_name, age }).await?;
        Ok(Some(user.into()))
    }
}
