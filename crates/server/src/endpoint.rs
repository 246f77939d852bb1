//! GraphQL route handler and GraphiQL console.
use std::sync::Arc;

use graphql_parser::query::{Definition, OperationDefinition, parse_query};
use juniper::InputValue;
use juniper::http::GraphQLRequest;
use juniper::http::graphiql::graphiql_source;
use salvo::http::Method;
use salvo::http::header::{self, HeaderValue};
use salvo::prelude::*;
use usergraph_schema::{Context, Schema};

const GRAPHQL_CONTENT_TYPE: &str = "application/graphql";
const HTML_CONTENT_TYPE: &str = "text/html";
// Anchor in juniper's GraphiQL page where the initial editor props are appended.
const GRAPHIQL_PROPS_ANCHOR: &str = "plugins: [explorerPlugin],";

/// Schema and resolver context shared by every request on the route.
#[derive(Clone)]
pub(crate) struct GraphQLState {
    schema: Arc<Schema>,
    context: Context,
    endpoint: String,
}

impl GraphQLState {
    pub(crate) fn new(schema: Schema, context: Context, endpoint: String) -> Self {
        Self {
            schema: Arc::new(schema),
            context,
            endpoint,
        }
    }
}

#[handler]
pub(crate) async fn graphql(req: &mut Request, depot: &mut Depot, res: &mut Response) -> Result<(), StatusError> {
    let state = depot
        .obtain::<GraphQLState>()
        .map_err(|_| StatusError::internal_server_error().brief("graphql state is not injected"))?
        .clone();

    let request = if req.method() == Method::GET {
        let Some(request) = request_from_query(req)? else {
            res.render(Text::Html(graphiql_page(&state.endpoint, None)));
            return Ok(());
        };
        if prefers_html(req) {
            res.render(Text::Html(graphiql_page(&state.endpoint, Some(&request))));
            return Ok(());
        }
        if selects_mutation(&request.query, request.operation_name.as_deref()) {
            res.headers_mut().insert(header::ALLOW, HeaderValue::from_static("POST"));
            return Err(StatusError::method_not_allowed()
                .brief("Can only perform a mutation operation from a POST request."));
        }
        request
    } else {
        request_from_body(req).await?
    };

    let response = request.execute(&*state.schema, &state.context).await;
    if !response.is_ok() {
        tracing::debug!("graphql request rejected before execution");
        res.status_code(StatusCode::BAD_REQUEST);
    }
    res.render(Json(response));
    Ok(())
}

/// Reads `query`, `operationName` and `variables` from the url query string.
/// Returns `None` when there is no `query`, which asks for the console.
fn request_from_query(req: &Request) -> Result<Option<GraphQLRequest>, StatusError> {
    let Some(query) = req.query::<String>("query") else {
        return Ok(None);
    };
    let operation_name = req.query::<String>("operationName").filter(|name| !name.is_empty());
    let variables = match req.query::<String>("variables") {
        Some(variables) if !variables.is_empty() => Some(parse_variables(&variables)?),
        _ => None,
    };
    Ok(Some(GraphQLRequest::new(query, operation_name, variables)))
}

async fn request_from_body(req: &mut Request) -> Result<GraphQLRequest, StatusError> {
    let raw_query = req
        .content_type()
        .is_some_and(|mime| mime.essence_str() == GRAPHQL_CONTENT_TYPE);
    if raw_query {
        let payload = req
            .payload()
            .await
            .map_err(|e| StatusError::bad_request().brief(format!("failed to read body: {e}")))?;
        let query = std::str::from_utf8(payload)
            .map_err(|_| StatusError::bad_request().brief("query must be utf-8"))?
            .to_owned();
        return Ok(GraphQLRequest::new(query, None, None));
    }
    req.parse_json::<GraphQLRequest>()
        .await
        .map_err(|e| StatusError::bad_request().brief(format!("invalid graphql request: {e}")))
}

/// A browser asking for html gets the console instead of a JSON answer,
/// unless `raw` is present in the query string.
fn prefers_html(req: &Request) -> bool {
    req.query::<String>("raw").is_none()
        && req
            .first_accept()
            .is_some_and(|mime| mime.essence_str() == HTML_CONTENT_TYPE)
}

/// Returns `true` when the operation that would run is a mutation.
///
/// A document that does not parse, or where the operation cannot be picked,
/// is left to the executor to reject.
fn selects_mutation(query: &str, operation_name: Option<&str>) -> bool {
    let Ok(document) = parse_query::<&str>(query) else {
        return false;
    };
    let mut operations = document.definitions.iter().filter_map(|definition| match definition {
        Definition::Operation(operation) => Some(operation),
        Definition::Fragment(_) => None,
    });
    let selected = match operation_name {
        Some(name) => operations.find(|operation| operation_name_of(operation) == Some(name)),
        None => operations.next().filter(|_| operations.next().is_none()),
    };
    matches!(selected, Some(OperationDefinition::Mutation(_)))
}

fn operation_name_of<'a>(operation: &OperationDefinition<'a, &'a str>) -> Option<&'a str> {
    match operation {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(query) => query.name,
        OperationDefinition::Mutation(mutation) => mutation.name,
        OperationDefinition::Subscription(subscription) => subscription.name,
    }
}

/// The GraphiQL console, with the editors filled from `request` when given.
fn graphiql_page(endpoint: &str, request: Option<&GraphQLRequest>) -> String {
    let page = graphiql_source(endpoint, None);
    let Some(request) = request else {
        return page;
    };
    let variables = request
        .variables
        .as_ref()
        .and_then(|variables| serde_json::to_string_pretty(variables).ok())
        .unwrap_or_default();
    let mut props = format!(
        "{GRAPHIQL_PROPS_ANCHOR}\n          query: {},\n          variables: {},",
        js_string(&request.query),
        js_string(&variables)
    );
    if let Some(operation_name) = &request.operation_name {
        props.push_str(&format!("\n          operationName: {},", js_string(operation_name)));
    }
    page.replacen(GRAPHIQL_PROPS_ANCHOR, &props, 1)
}

/// A JavaScript string literal that is safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace("</", "<\\/")
}

fn parse_variables(variables: &str) -> Result<InputValue, StatusError> {
    serde_json::from_str(variables).map_err(|e| StatusError::bad_request().brief(format!("variables are invalid: {e}")))
}
