use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::listings::{
        CreateListingRequest, ListingDetail, ListingList, SellerProfile, UpdateListingRequest,
    },
    dto::reviews::ReviewWithAuthor,
    entity::listings::{ActiveModel, Column, Entity as Listings, Model as ListingModel},
    entity::{reviews, users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Listing,
    response::{ApiResponse, Meta},
    routes::params::{ListingQuery, ListingSort, ListingStatus},
    services::{auth_service::user_from_entity, notification_service, review_service},
    slug::slugify,
    state::AppState,
};

pub async fn search_listings(
    state: &AppState,
    viewer: Option<&AuthUser>,
    query: ListingQuery,
) -> AppResult<ApiResponse<ListingList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    // The public catalog only shows active listings; sellers browsing their
    // own inventory see every status short of deleted.
    match query.seller_id {
        Some(seller_id) => {
            condition = condition.add(Column::SellerId.eq(seller_id));
            let own = viewer.is_some_and(|v| v.user_id == seller_id);
            condition = if own {
                condition.add(Column::Status.ne(ListingStatus::Deleted.as_str()))
            } else {
                condition.add(Column::Status.eq(ListingStatus::Active.as_str()))
            };
        }
        None => {
            condition = condition.add(Column::Status.eq(ListingStatus::Active.as_str()));
        }
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Title).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::PriceCents.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::PriceCents.lte(max_price));
    }

    if let Some(cond) = query.condition {
        condition = condition.add(Column::Condition.eq(cond.as_str()));
    }

    let sort = query.sort.unwrap_or(ListingSort::Newest);
    let mut finder = Listings::find().filter(condition);
    finder = match sort {
        ListingSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ListingSort::Oldest => finder.order_by_asc(Column::CreatedAt),
        ListingSort::PriceAsc => finder.order_by_asc(Column::PriceCents),
        ListingSort::PriceDesc => finder.order_by_desc(Column::PriceCents),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(listing_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = ListingList { items };
    Ok(ApiResponse::success("Listings", data, Some(meta)))
}

pub async fn create_listing(
    state: &AppState,
    user: &AuthUser,
    payload: CreateListingRequest,
) -> AppResult<ApiResponse<Listing>> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if payload.description.trim().len() < 10 {
        return Err(AppError::BadRequest(
            "Description must be at least 10 characters".into(),
        ));
    }
    if payload.price_cents < 1 {
        return Err(AppError::BadRequest("Price must be greater than 0".into()));
    }

    let slug = slugify(&title);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Title must contain letters or numbers".into(),
        ));
    }
    ensure_slug_free(state, &slug).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        slug: Set(slug),
        description: Set(payload.description.trim().to_string()),
        price_cents: Set(payload.price_cents),
        condition: Set(payload.condition.as_str().to_string()),
        images: Set(serde_json::json!(payload.images.unwrap_or_default())),
        status: Set(ListingStatus::Active.as_str().to_string()),
        views: Set(0),
        seller_id: Set(user.user_id),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let listing = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "listing_create",
        Some("listings"),
        Some(serde_json::json!({ "listing_id": listing.id, "slug": listing.slug })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Listing created",
        listing_from_entity(listing),
        Some(Meta::empty()),
    ))
}

pub async fn get_listing(state: &AppState, slug: &str) -> AppResult<ApiResponse<ListingDetail>> {
    let listing = find_visible_by_slug(state, slug).await?;

    let seller = users::Entity::find_by_id(listing.seller_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let active_listings = Listings::find()
        .filter(Column::SellerId.eq(seller.id))
        .filter(Column::Status.eq(ListingStatus::Active.as_str()))
        .count(&state.orm)
        .await? as i64;

    let reviews = reviews::Entity::find()
        .filter(reviews::Column::ListingId.eq(listing.id))
        .find_also_related(users::Entity)
        .order_by_desc(reviews::Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(review, author)| {
            author.map(|a| ReviewWithAuthor {
                review: review_service::review_from_entity(review),
                author: user_from_entity(a),
            })
        })
        .collect();

    // View counting is best effort; a failed increment never fails the read.
    if let Err(err) = Listings::update_many()
        .col_expr(Column::Views, Expr::col(Column::Views).add(1))
        .filter(Column::Id.eq(listing.id))
        .exec(&state.orm)
        .await
    {
        tracing::warn!(error = %err, "view counter update failed");
    }

    let data = ListingDetail {
        listing: listing_from_entity(listing),
        seller: SellerProfile {
            user: user_from_entity(seller),
            active_listings,
        },
        reviews,
    };
    Ok(ApiResponse::success("Listing", data, None))
}

pub async fn update_listing(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    payload: UpdateListingRequest,
) -> AppResult<ApiResponse<Listing>> {
    let existing = find_visible_by_slug(state, slug).await?;
    ensure_owner_or_admin(user, &existing)?;

    let was_sold = existing.status == ListingStatus::Sold.as_str();
    let seller_id = existing.seller_id;
    let title_for_note = existing.title.clone();

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("Title is required".into()));
        }
        let new_slug = slugify(&title);
        if new_slug.is_empty() {
            return Err(AppError::BadRequest(
                "Title must contain letters or numbers".into(),
            ));
        }
        if new_slug != slug {
            ensure_slug_free(state, &new_slug).await?;
        }
        active.title = Set(title);
        active.slug = Set(new_slug);
    }
    if let Some(description) = payload.description {
        if description.trim().len() < 10 {
            return Err(AppError::BadRequest(
                "Description must be at least 10 characters".into(),
            ));
        }
        active.description = Set(description.trim().to_string());
    }
    if let Some(price_cents) = payload.price_cents {
        if price_cents < 1 {
            return Err(AppError::BadRequest("Price must be greater than 0".into()));
        }
        active.price_cents = Set(price_cents);
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(condition.as_str().to_string());
    }
    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(images));
    }
    let mut now_sold = false;
    if let Some(status) = payload.status {
        if status == ListingStatus::Deleted {
            return Err(AppError::BadRequest(
                "Use DELETE to remove a listing".into(),
            ));
        }
        now_sold = status == ListingStatus::Sold && !was_sold;
        active.status = Set(status.as_str().to_string());
    }
    active.updated_at = Set(Utc::now().into());

    let listing = active.update(&state.orm).await?;

    if now_sold {
        if let Err(err) = notification_service::notify(
            state,
            seller_id,
            "listing_sold",
            "Listing sold",
            &format!("Your listing \"{}\" was marked as sold.", title_for_note),
        )
        .await
        {
            tracing::warn!(error = %err, "notification failed");
        }
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "listing_update",
        Some("listings"),
        Some(serde_json::json!({ "listing_id": listing.id, "slug": listing.slug })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        listing_from_entity(listing),
        Some(Meta::empty()),
    ))
}

pub async fn delete_listing(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_visible_by_slug(state, slug).await?;
    ensure_owner_or_admin(user, &existing)?;

    let listing_id = existing.id;
    let mut active: ActiveModel = existing.into();
    active.status = Set(ListingStatus::Deleted.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "listing_delete",
        Some("listings"),
        Some(serde_json::json!({ "listing_id": listing_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Soft-deleted rows stay in the table but are invisible to every route.
pub async fn find_visible_by_slug(state: &AppState, slug: &str) -> AppResult<ListingModel> {
    let listing = Listings::find()
        .filter(Column::Slug.eq(slug))
        .filter(Column::Status.ne(ListingStatus::Deleted.as_str()))
        .one(&state.orm)
        .await?;
    match listing {
        Some(l) => Ok(l),
        None => Err(AppError::NotFound),
    }
}

fn ensure_owner_or_admin(user: &AuthUser, listing: &ListingModel) -> Result<(), AppError> {
    if listing.seller_id != user.user_id && user.role != "admin" {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn ensure_slug_free(state: &AppState, slug: &str) -> AppResult<()> {
    let exists = Listings::find()
        .filter(Column::Slug.eq(slug))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict(
            "A listing with this title already exists".into(),
        ));
    }
    Ok(())
}

pub fn listing_from_entity(model: ListingModel) -> Listing {
    let images = serde_json::from_value(model.images).unwrap_or_default();
    Listing {
        id: model.id,
        title: model.title,
        slug: model.slug,
        description: model.description,
        price_cents: model.price_cents,
        condition: model.condition,
        images,
        status: model.status,
        views: model.views,
        seller_id: model.seller_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
