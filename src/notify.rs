use async_trait::async_trait;
use tracing::info;

use crate::users::model::User;

/// Outbound notification seam. The delivery transport lives behind this
/// trait; the service only needs the one capability.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_verification_email(&self, user: &User) -> anyhow::Result<()>;
}

/// Notifier that writes the verification link to the log instead of
/// delivering it. Suitable for development and embedded use.
pub struct LogNotifier {
    pub base_url: String,
}

#[async_trait]
impl NotificationGateway for LogNotifier {
    async fn send_verification_email(&self, user: &User) -> anyhow::Result<()> {
        let token = user
            .verification_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("user has no verification token"))?;
        info!(
            user_id = %user.id,
            email = %user.email,
            link = %format!("{}/{}/{}", self.base_url, user.id, token),
            "verification email dispatched"
        );
        Ok(())
    }
}
