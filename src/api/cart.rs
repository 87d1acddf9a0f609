//! Cart endpoints and the checkout entry point
//!
//! All routes here sit behind the auth middleware; the verified identity
//! arrives as a [`CurrentUser`] extension.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::checkout::{self, validate};
use crate::db::cart;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Cart row as served to the frontend, with the advisory stock hint
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    pub quantity: i32,
    /// Advisory only; checkout re-checks inside its transaction
    pub in_stock: bool,
}

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<CartItemView>>> {
    let items = cart::list_for_user(&state.pool, user.user_id).await?;
    let views = items
        .into_iter()
        .map(|item| CartItemView {
            in_stock: validate::sufficient(item.quantity, item.stock),
            id: item.id,
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image_url: item.image_url,
            stock: item.stock,
            quantity: item.quantity,
        })
        .collect();
    Ok(Json(views))
}

#[derive(Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    /// Defaults to 1 when omitted
    pub quantity: Option<i32>,
}

/// POST /api/cart/add
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<AddToCartRequest>,
) -> AppResult<Json<Value>> {
    let quantity = req.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::Validation(
            "Invalid quantity or product".to_string(),
        ));
    }

    match cart::add_item(&state.pool, user.user_id, req.product_id, quantity).await {
        Ok(()) => Ok(Json(json!({ "message": "Product added to cart." }))),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(
            AppError::Validation("Invalid quantity or product".to_string()),
        ),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/cart/{item_id}
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(item_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let removed = cart::remove_item(&state.pool, user.user_id, item_id).await?;
    if !removed {
        return Err(AppError::NotFound(
            "Item not found or does not belong to the user".to_string(),
        ));
    }
    Ok(Json(json!({ "message": "Item removed from cart." })))
}

/// POST /api/cart/checkout: the one operation with real invariants
pub async fn checkout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Value>> {
    let confirmation = checkout::checkout(&state.pool, user.user_id).await?;
    Ok(Json(json!({
        "message": format!(
            "Order #{} placed and stock updated successfully.",
            confirmation.order_id
        ),
        "orderId": confirmation.order_id,
    })))
}
