//! Inventory CRUD
//!
//! Catalog reads are public; writes require the admin role and accept
//! multipart forms so an image file can ride along with the product
//! fields. Image files written for a request that ultimately fails are
//! removed again.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use crate::db::product::{self, ProductInput, ProductRow};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/inventory: public catalog
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<ProductRow>>> {
    let products = product::list(&state.pool).await?;
    Ok(Json(products))
}

/// Fields collected from the multipart form
#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    stock: Option<String>,
    image_url: Option<String>,
    image_data: Option<Vec<u8>>,
}

async fn read_form(mut multipart: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "stock" => form.stock = Some(field.text().await?),
            "image_url" => form.image_url = Some(field.text().await?),
            "image_file" => {
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.image_data = Some(data.to_vec());
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

impl ProductForm {
    /// Validate the text fields into a [`ProductInput`]; the resolved
    /// image URL is decided by the caller.
    fn to_input(&self, image_url: Option<String>) -> Result<ProductInput, AppError> {
        let invalid =
            || AppError::Validation("Name, price and stock are required and must be valid".into());

        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(invalid)?
            .to_string();

        let price: Decimal = self
            .price
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(invalid)?;
        if price <= Decimal::ZERO {
            return Err(invalid());
        }

        let stock: i32 = self
            .stock
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(invalid)?;
        if stock < 0 {
            return Err(invalid());
        }

        Ok(ProductInput {
            name,
            description: self.description.clone().filter(|d| !d.is_empty()),
            price,
            stock,
            image_url,
        })
    }
}

/// POST /api/inventory: create a product (admin)
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let form = read_form(multipart).await?;

    let uploaded = match &form.image_data {
        Some(data) => Some(state.uploads.save(data)?),
        None => None,
    };
    let image_url = uploaded
        .clone()
        .or_else(|| form.image_url.clone().filter(|u| !u.is_empty()));

    let input = match form.to_input(image_url) {
        Ok(input) => input,
        Err(e) => {
            if let Some(url) = &uploaded {
                state.uploads.delete(url);
            }
            return Err(e);
        }
    };

    match product::create(&state.pool, &input).await {
        Ok(id) => {
            tracing::info!(product_id = id, name = %input.name, "Product created");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "message": "Product created successfully.",
                    "id": id,
                    "image_url": input.image_url,
                })),
            ))
        }
        Err(e) => {
            if let Some(url) = &uploaded {
                state.uploads.delete(url);
            }
            Err(e.into())
        }
    }
}

/// PUT /api/inventory/{id}: full update (admin)
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let form = read_form(multipart).await?;

    let Some(existing) = product::get(&state.pool, id).await? else {
        return Err(AppError::NotFound("Product not found".to_string()));
    };

    let uploaded = match &form.image_data {
        Some(data) => Some(state.uploads.save(data)?),
        None => None,
    };
    // new file wins, then an explicit URL field, then the stored value
    let image_url = uploaded
        .clone()
        .or_else(|| form.image_url.clone().filter(|u| !u.is_empty()))
        .or_else(|| existing.image_url.clone());

    let input = match form.to_input(image_url) {
        Ok(input) => input,
        Err(e) => {
            if let Some(url) = &uploaded {
                state.uploads.delete(url);
            }
            return Err(e);
        }
    };

    match product::update(&state.pool, id, &input).await {
        Ok(true) => {}
        Ok(false) => {
            if let Some(url) = &uploaded {
                state.uploads.delete(url);
            }
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Err(e) => {
            if let Some(url) = &uploaded {
                state.uploads.delete(url);
            }
            return Err(e.into());
        }
    }

    // the old file is only removed once the row points elsewhere
    if uploaded.is_some()
        && let Some(old) = &existing.image_url
        && input.image_url.as_deref() != Some(old.as_str())
    {
        state.uploads.delete(old);
    }

    Ok(Json(json!({
        "message": "Product updated successfully.",
        "image_url": input.image_url,
    })))
}

/// DELETE /api/inventory/{id}: delete product and its image (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    match product::delete(&state.pool, id).await? {
        Some(image_url) => {
            if let Some(url) = image_url {
                state.uploads.delete(&url);
            }
            tracing::info!(product_id = id, "Product deleted");
            Ok(Json(json!({ "message": "Product deleted successfully." })))
        }
        None => Err(AppError::NotFound(
            "Product not found to delete".to_string(),
        )),
    }
}
