use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Closed set of notification kinds a user's inbox may hold.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum NotificationType {
    #[sea_orm(string_value = "connection_request")]
    ConnectionRequest,
    #[sea_orm(string_value = "connection_accepted")]
    ConnectionAccepted,
    #[sea_orm(string_value = "connection_rejected")]
    ConnectionRejected,
    #[sea_orm(string_value = "connection_completed")]
    ConnectionCompleted,
    #[sea_orm(string_value = "connection_update")]
    ConnectionUpdate,
    #[sea_orm(string_value = "message_received")]
    MessageReceived,
    #[sea_orm(string_value = "goal_completed")]
    GoalCompleted,
    #[sea_orm(string_value = "meeting_scheduled")]
    MeetingScheduled,
    #[sea_orm(string_value = "profile_update")]
    ProfileUpdate,
    #[sea_orm(string_value = "system_notification")]
    SystemNotification,
    #[sea_orm(string_value = "progress_update")]
    ProgressUpdate,
    #[sea_orm(string_value = "application_received")]
    ApplicationReceived,
    #[sea_orm(string_value = "application_accepted")]
    ApplicationAccepted,
    #[sea_orm(string_value = "application_rejected")]
    ApplicationRejected,
    #[sea_orm(string_value = "application_cancelled")]
    ApplicationCancelled,
    #[sea_orm(string_value = "session_scheduled")]
    SessionScheduled,
    #[sea_orm(string_value = "session_updated")]
    SessionUpdated,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::ConnectionRequest => "connection_request",
            NotificationType::ConnectionAccepted => "connection_accepted",
            NotificationType::ConnectionRejected => "connection_rejected",
            NotificationType::ConnectionCompleted => "connection_completed",
            NotificationType::ConnectionUpdate => "connection_update",
            NotificationType::MessageReceived => "message_received",
            NotificationType::GoalCompleted => "goal_completed",
            NotificationType::MeetingScheduled => "meeting_scheduled",
            NotificationType::ProfileUpdate => "profile_update",
            NotificationType::SystemNotification => "system_notification",
            NotificationType::ProgressUpdate => "progress_update",
            NotificationType::ApplicationReceived => "application_received",
            NotificationType::ApplicationAccepted => "application_accepted",
            NotificationType::ApplicationRejected => "application_rejected",
            NotificationType::ApplicationCancelled => "application_cancelled",
            NotificationType::SessionScheduled => "session_scheduled",
            NotificationType::SessionUpdated => "session_updated",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "{}", self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("invalid notification type: {value}"))
    }
}
