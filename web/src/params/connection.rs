use domain::connection_status::ConnectionStatus;
use domain::role::RequestType;
use domain::UserId;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) to_user_id: UserId,
    #[serde(rename = "type")]
    pub(crate) request_type: RequestType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusParams {
    pub(crate) status: ConnectionStatus,
}
