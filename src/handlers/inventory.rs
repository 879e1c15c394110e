//! Inventory endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::handlers::{decode, require_id};
use crate::http::response::ApiError;
use crate::store::{InventoryStore, InventoryUpdate, NewInventoryItem};

#[derive(Clone)]
pub struct InventoryHandler {
    store: Arc<dyn InventoryStore>,
}

impl InventoryHandler {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, body: &[u8]) -> Result<Response, ApiError> {
        let payload: NewInventoryItem = decode(body)?;
        let item = self.store.create_inventory_item(payload).await?;
        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    pub async fn list(&self) -> Result<Response, ApiError> {
        Ok(Json(self.store.list_inventory_items().await?).into_response())
    }

    pub async fn get(&self, id: Option<&str>) -> Result<Response, ApiError> {
        let item = self.store.get_inventory_item(require_id(id)?).await?;
        Ok(Json(item).into_response())
    }

    pub async fn update(&self, id: Option<&str>, body: &[u8]) -> Result<Response, ApiError> {
        let id = require_id(id)?;
        let payload: InventoryUpdate = decode(body)?;
        let item = self.store.update_inventory_item(id, payload).await?;
        Ok(Json(item).into_response())
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<Response, ApiError> {
        self.store.delete_inventory_item(require_id(id)?).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_inventory_validation_surfaces_as_400() {
        let h = InventoryHandler::new(Arc::new(MemoryStore::new()));
        let err = h
            .create(br#"{"name":"Milk","quantity":-5,"unit":"ml"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let response = h
            .create(br#"{"id":"milk","name":"Milk","quantity":2000,"unit":"ml"}"#)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(h.get(Some("milk")).await.unwrap().status(), StatusCode::OK);
        assert_eq!(
            h.update(Some("sugar"), br#"{"quantity":1}"#)
                .await
                .unwrap_err()
                .status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
