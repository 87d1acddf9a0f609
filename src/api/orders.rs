//! Order history endpoint

use axum::extract::State;
use axum::{Extension, Json};

use crate::auth::CurrentUser;
use crate::db::order::{self, OrderWithLines};
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/orders: the caller's own orders, newest first
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<OrderWithLines>>> {
    let orders = order::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(orders))
}
