use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::reviews::{CreateReviewRequest, ReviewList, ReviewWithAuthor},
    entity::reviews::{ActiveModel, Column, Entity as Reviews, Model as ReviewModel},
    entity::users,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{auth_service::user_from_entity, listing_service, notification_service},
    state::AppState,
};

pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    slug: &str,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }
    if payload.comment.trim().is_empty() {
        return Err(AppError::BadRequest("Comment is required".into()));
    }

    let listing = listing_service::find_visible_by_slug(state, slug).await?;
    if listing.seller_id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot review your own listing".into(),
        ));
    }

    let already = Reviews::find()
        .filter(Column::ListingId.eq(listing.id))
        .filter(Column::AuthorId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    if already.is_some() {
        return Err(AppError::Conflict(
            "You have already reviewed this listing".into(),
        ));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        listing_id: Set(listing.id),
        author_id: Set(user.user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment.trim().to_string()),
        created_at: NotSet,
    };
    let review = active.insert(&state.orm).await?;

    if let Err(err) = notification_service::notify(
        state,
        listing.seller_id,
        "review_received",
        "New review",
        &format!("Your listing \"{}\" received a new review.", listing.title),
    )
    .await
    {
        tracing::warn!(error = %err, "notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "review_create",
        Some("reviews"),
        Some(serde_json::json!({ "review_id": review.id, "listing_id": listing.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Review created",
        review_from_entity(review),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(
    state: &AppState,
    slug: &str,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let listing = listing_service::find_visible_by_slug(state, slug).await?;
    let (page, limit, offset) = pagination.normalize();

    let total = Reviews::find()
        .filter(Column::ListingId.eq(listing.id))
        .count(&state.orm)
        .await? as i64;

    let items = Reviews::find()
        .filter(Column::ListingId.eq(listing.id))
        .find_also_related(users::Entity)
        .order_by_desc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(review, author)| {
            author.map(|a| ReviewWithAuthor {
                review: review_from_entity(review),
                author: user_from_entity(a),
            })
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Reviews",
        ReviewList { items },
        Some(meta),
    ))
}

pub fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        listing_id: model.listing_id,
        author_id: model.author_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
