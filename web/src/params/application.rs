use domain::application_status::ApplicationStatus;
use domain::UserId;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) mentor_id: UserId,
    pub(crate) message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusParams {
    pub(crate) status: ApplicationStatus,
}
