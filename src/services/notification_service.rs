use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::notifications::NotificationList,
    entity::notifications::{ActiveModel, Column, Entity as Notifications, Model as NotificationModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Notification,
    response::{ApiResponse, Meta},
    routes::params::NotificationListQuery,
    state::AppState,
};

/// Drop a notification on a user's pile. Callers treat failures as
/// non-fatal, mirroring the audit log.
pub async fn notify(
    state: &AppState,
    user_id: Uuid,
    kind: &str,
    title: &str,
    body: &str,
) -> AppResult<Notification> {
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind.to_string()),
        title: Set(title.to_string()),
        body: Set(body.to_string()),
        read: Set(false),
        created_at: NotSet,
    };
    let notification = active.insert(&state.orm).await?;
    Ok(notification_from_entity(notification))
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
    query: NotificationListQuery,
) -> AppResult<ApiResponse<NotificationList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut finder = Notifications::find().filter(Column::UserId.eq(user.user_id));
    if query.unread.unwrap_or(false) {
        finder = finder.filter(Column::Read.eq(false));
    }

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .order_by_desc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(notification_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Notifications",
        NotificationList { items },
        Some(meta),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let existing = Notifications::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };
    if existing.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if existing.read {
        return Ok(ApiResponse::success(
            "Read",
            notification_from_entity(existing),
            Some(Meta::empty()),
        ));
    }

    let mut active: ActiveModel = existing.into();
    active.read = Set(true);
    let notification = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "notification_read",
        Some("notifications"),
        Some(serde_json::json!({ "notification_id": notification.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Read",
        notification_from_entity(notification),
        Some(Meta::empty()),
    ))
}

pub fn notification_from_entity(model: NotificationModel) -> Notification {
    Notification {
        id: model.id,
        user_id: model.user_id,
        kind: model.kind,
        title: model.title,
        body: model.body,
        read: model.read,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
