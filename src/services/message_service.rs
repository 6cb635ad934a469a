use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::messages::{MessageList, SendMessageRequest},
    entity::messages::{ActiveModel, Column, Entity as Messages, Model as MessageModel},
    entity::users,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Message,
    response::{ApiResponse, Meta},
    routes::params::{MessageBox, MessageListQuery},
    services::notification_service,
    state::AppState,
};

pub async fn send_message(
    state: &AppState,
    user: &AuthUser,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message content is required".into()));
    }
    if payload.receiver_id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot message yourself".into(),
        ));
    }

    let receiver = users::Entity::find_by_id(payload.receiver_id)
        .one(&state.orm)
        .await?;
    if receiver.is_none() {
        return Err(AppError::NotFound);
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(user.user_id),
        receiver_id: Set(payload.receiver_id),
        content: Set(payload.content.trim().to_string()),
        read: Set(false),
        created_at: NotSet,
    };
    let message = active.insert(&state.orm).await?;

    if let Err(err) = notification_service::notify(
        state,
        payload.receiver_id,
        "message_received",
        "New message",
        "You have a new message.",
    )
    .await
    {
        tracing::warn!(error = %err, "notification failed");
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "message_send",
        Some("messages"),
        Some(serde_json::json!({ "message_id": message.id, "receiver_id": message.receiver_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Message sent",
        message_from_entity(message),
        Some(Meta::empty()),
    ))
}

pub async fn list_messages(
    state: &AppState,
    user: &AuthUser,
    query: MessageListQuery,
) -> AppResult<ApiResponse<MessageList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mailbox = query.mailbox.unwrap_or(MessageBox::Inbox);

    let finder = match mailbox {
        MessageBox::Inbox => Messages::find().filter(Column::ReceiverId.eq(user.user_id)),
        MessageBox::Sent => Messages::find().filter(Column::SenderId.eq(user.user_id)),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let unread = match mailbox {
        MessageBox::Inbox => {
            Messages::find()
                .filter(Column::ReceiverId.eq(user.user_id))
                .filter(Column::Read.eq(false))
                .count(&state.orm)
                .await? as i64
        }
        MessageBox::Sent => 0,
    };

    let items = finder
        .order_by_desc(Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(message_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Messages",
        MessageList { items, unread },
        Some(meta),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Message>> {
    let existing = Messages::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    if existing.receiver_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if existing.read {
        return Ok(ApiResponse::success(
            "Read",
            message_from_entity(existing),
            Some(Meta::empty()),
        ));
    }

    let mut active: ActiveModel = existing.into();
    active.read = Set(true);
    let message = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "message_read",
        Some("messages"),
        Some(serde_json::json!({ "message_id": message.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Read",
        message_from_entity(message),
        Some(Meta::empty()),
    ))
}

pub fn message_from_entity(model: MessageModel) -> Message {
    Message {
        id: model.id,
        sender_id: model.sender_id,
        receiver_id: model.receiver_id,
        content: model.content,
        read: model.read,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
