use juniper::{FieldResult, graphql_object};
use usergraph_backend::model;

use crate::Context;

/// A user as stored by the backend.
#[derive(Clone, Debug)]
pub struct User(model::User);

impl From<model::User> for User {
    fn from(user: model::User) -> Self {
        Self(user)
    }
}

#[graphql_object(context = Context)]
impl User {
    fn id(&self) -> Option<&str> {
        self.0.id.as_deref()
    }

    fn first_name(&self) -> Option<&str> {
        self.0.first_name.as_deref()
    }

    fn age(&self) -> Option<i32> {
        self.0.age
    }

    /// The company the user works for, fetched when selected.
    async fn company(&self, context: &Context) -> FieldResult<Option<Company>> {
        let Some(company_id) = self.0.company_id.as_deref() else {
            return Ok(None);
        };
        let company = context.backend().company(company_id).await?;
        Ok(Some(company.into()))
    }
}

/// A company as stored by the backend.
#[derive(Clone, Debug)]
pub struct Company(model::Company);

impl From<model::Company> for Company {
    fn from(company: model::Company) -> Self {
        Self(company)
    }
}

#[graphql_object(context = Context)]
impl Company {
    fn id(&self) -> Option<&str> {
        self.0.id.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Users working for the company, fetched with a single request when selected.
    async fn users(&self, context: &Context) -> FieldResult<Option<Vec<Option<User>>>> {
        let Some(id) = self.0.id.as_deref() else {
            return Ok(None);
        };
        let users = context.backend().company_users(id).await?;
        Ok(Some(users.into_iter().map(|user| Some(user.into())).collect()))
    }
}
