use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use hotcoffee_infra::InventoryServiceError;
use hotcoffee_inventory::IngredientId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_items))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

fn parse_id(raw: &str) -> Result<IngredientId, axum::response::Response> {
    IngredientId::parse(raw)
        .map_err(|e| errors::service_error_to_response(InventoryServiceError::from(e)))
}

pub async fn create_items(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::CreateItemsQuery>, QueryRejection>,
    body: Result<Json<dto::CreateItemsRequest>, JsonRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(v) => v,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let items = body.into_items();
    if items.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "at least one inventory item is required",
        );
    }

    let result = if query.atomic {
        services.inventory().save_inventory_batch(items).await
    } else {
        services.inventory().add_inventory_items(items).await
    };

    match result {
        Ok(created) => (StatusCode::CREATED, Json(dto::inventory_list_to_json(&created))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_items(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.inventory().get_inventory_items().await {
        Ok(items) => (StatusCode::OK, Json(dto::inventory_list_to_json(&items))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory().get_inventory_item_by_id(&id).await {
        Ok(item) => (StatusCode::OK, Json(dto::inventory_to_json(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateQuantityRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(v) => v,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.inventory().update_inventory_item(&id, body.quantity).await {
        Ok(item) => (StatusCode::OK, Json(dto::inventory_to_json(&item))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.inventory().delete_inventory_item(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
