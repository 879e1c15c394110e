//! Menu endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::handlers::{decode, require_id};
use crate::http::response::ApiError;
use crate::store::{MenuItemUpdate, MenuStore, NewMenuItem};

#[derive(Clone)]
pub struct MenuHandler {
    store: Arc<dyn MenuStore>,
}

impl MenuHandler {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, body: &[u8]) -> Result<Response, ApiError> {
        let payload: NewMenuItem = decode(body)?;
        let item = self.store.create_menu_item(payload).await?;
        tracing::info!(menu_item_id = %item.id, price_cents = item.price_cents, "Menu item added");
        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    pub async fn list(&self) -> Result<Response, ApiError> {
        Ok(Json(self.store.list_menu_items().await?).into_response())
    }

    pub async fn get(&self, id: Option<&str>) -> Result<Response, ApiError> {
        let item = self.store.get_menu_item(require_id(id)?).await?;
        Ok(Json(item).into_response())
    }

    pub async fn update(&self, id: Option<&str>, body: &[u8]) -> Result<Response, ApiError> {
        let id = require_id(id)?;
        let payload: MenuItemUpdate = decode(body)?;
        let item = self.store.update_menu_item(id, payload).await?;
        Ok(Json(item).into_response())
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<Response, ApiError> {
        self.store.delete_menu_item(require_id(id)?).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
