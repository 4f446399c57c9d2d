/// GraphQL transport
///
/// ```text
/// POST /graphql   # execute a query or mutation
/// GET  /graphql   # GraphiQL IDE
/// ```

use crate::app::AppState;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};

/// Executes a GraphQL request against the schema
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    let request = req.into_inner();

    if let Some(name) = request.operation_name.as_deref() {
        tracing::debug!(operation = name, "Executing GraphQL operation");
    }

    state.schema.execute(request).await.into()
}

/// Serves the GraphiQL IDE pointed at this endpoint
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
