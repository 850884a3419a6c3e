use crate::api::AppState;
use crate::api::schemas::notifications::{
    DeviceNotificationRequest, NotificationRequest, NotificationResponse, TopicNotificationRequest,
};
use crate::domain::notification::SendIntent;
use crate::error::Result;
use axum::{Json, extract::State};

/// Sends a notification to a device token or topic, chosen by `sendToTopic`.
///
/// The request task waits on the dispatch handle; the dispatch itself runs on
/// its own task.
///
/// # Errors
/// Returns `AppError::BadRequest` if validation fails.
/// Returns `AppError::Dispatch` if the notification could not be delivered.
pub async fn send(
    State(state): State<AppState>,
    Json(payload): Json<NotificationRequest>,
) -> Result<Json<NotificationResponse>> {
    dispatch(&state, payload.into_intent()?).await
}

/// Sends a notification to every subscriber of a topic.
///
/// # Errors
/// Returns `AppError::BadRequest` if validation fails.
/// Returns `AppError::Dispatch` if the notification could not be delivered.
pub async fn send_to_topic(
    State(state): State<AppState>,
    Json(payload): Json<TopicNotificationRequest>,
) -> Result<Json<NotificationResponse>> {
    dispatch(&state, payload.into_intent()?).await
}

/// Sends a notification to a single device.
///
/// # Errors
/// Returns `AppError::BadRequest` if validation fails.
/// Returns `AppError::Dispatch` if the notification could not be delivered.
pub async fn send_to_device(
    State(state): State<AppState>,
    Json(payload): Json<DeviceNotificationRequest>,
) -> Result<Json<NotificationResponse>> {
    dispatch(&state, payload.into_intent()?).await
}

async fn dispatch(state: &AppState, intent: SendIntent) -> Result<Json<NotificationResponse>> {
    tracing::info!(destination = %intent.target(), "Received notification request");
    let message_id = state.dispatcher.dispatch(intent).await?;
    Ok(Json(NotificationResponse::sent(message_id)))
}
