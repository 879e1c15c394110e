//! Aggregate report endpoints.
//!
//! The numbers come straight from the store; any store failure here is a 500.

use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::http::response::ApiError;
use crate::store::{ReportStore, StoreError};

#[derive(Clone)]
pub struct ReportHandler {
    store: Arc<dyn ReportStore>,
    popular_items_limit: usize,
}

impl ReportHandler {
    pub fn new(store: Arc<dyn ReportStore>, popular_items_limit: usize) -> Self {
        Self {
            store,
            popular_items_limit,
        }
    }

    pub async fn total_sales(&self) -> Result<Response, ApiError> {
        let sales = self.store.total_sales().await.map_err(internal)?;
        Ok(Json(sales).into_response())
    }

    pub async fn popular_items(&self) -> Result<Response, ApiError> {
        let items = self
            .store
            .popular_items(self.popular_items_limit)
            .await
            .map_err(internal)?;
        Ok(Json(items).into_response())
    }
}

fn internal(err: StoreError) -> ApiError {
    ApiError::Internal(err.to_string())
}
