//! Order endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::handlers::{decode, require_id};
use crate::http::response::ApiError;
use crate::store::{NewOrder, OrderStore, OrderUpdate};

#[derive(Clone)]
pub struct OrderHandler {
    store: Arc<dyn OrderStore>,
}

impl OrderHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, body: &[u8]) -> Result<Response, ApiError> {
        let payload: NewOrder = decode(body)?;
        let order = self.store.create_order(payload).await?;
        tracing::info!(order_id = %order.id, items = order.items.len(), "Order created");
        Ok((StatusCode::CREATED, Json(order)).into_response())
    }

    pub async fn list(&self) -> Result<Response, ApiError> {
        let orders = self.store.list_orders().await?;
        Ok(Json(orders).into_response())
    }

    pub async fn get(&self, id: Option<&str>) -> Result<Response, ApiError> {
        let order = self.store.get_order(require_id(id)?).await?;
        Ok(Json(order).into_response())
    }

    pub async fn update(&self, id: Option<&str>, body: &[u8]) -> Result<Response, ApiError> {
        let id = require_id(id)?;
        let payload: OrderUpdate = decode(body)?;
        let order = self.store.update_order(id, payload).await?;
        Ok(Json(order).into_response())
    }

    pub async fn delete(&self, id: Option<&str>) -> Result<Response, ApiError> {
        self.store.delete_order(require_id(id)?).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    pub async fn close(&self, id: Option<&str>) -> Result<Response, ApiError> {
        let order = self.store.close_order(require_id(id)?).await?;
        tracing::info!(order_id = %order.id, total_cents = ?order.total_cents(), "Order closed");
        Ok(Json(order).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MenuStore, NewMenuItem, Order, OrderStatus};

    async fn handler() -> OrderHandler {
        let store = MemoryStore::new();
        store
            .create_menu_item(NewMenuItem {
                id: Some("latte".into()),
                name: "Latte".into(),
                description: String::new(),
                price_cents: 450,
                available: true,
            })
            .await
            .unwrap();
        OrderHandler::new(Arc::new(store))
    }

    async fn order_of(response: Response) -> Order {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_close() {
        let h = handler().await;
        let response = h
            .create(br#"{"customer_name":"Ada","items":[{"menu_item_id":"latte","quantity":2}]}"#)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let order = order_of(response).await;

        let response = h.close(Some(order.id.as_str())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(order_of(response).await.status, OrderStatus::Closed);

        let err = h.close(Some(order.id.as_str())).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_error_translation() {
        let h = handler().await;

        let err = h.get(Some("nope")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = h.create(b"[]").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = h.update(None, b"{}").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete() {
        let h = handler().await;
        let order = order_of(
            h.create(br#"{"customer_name":"Ada","items":[{"menu_item_id":"latte","quantity":1}]}"#)
                .await
                .unwrap(),
        )
        .await;

        let response = h.delete(Some(order.id.as_str())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            h.delete(Some(order.id.as_str())).await.unwrap_err().status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
