use crate::domain::model::Participant;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Removes artifacts left by a previous run. Unrelated files stay.
    fn clear(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate_message(
        &self,
        gifter_name: &str,
        giftee_name: &str,
        giftee_description: &str,
    ) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, description: &str) -> Result<Vec<u8>>;
}

/// A delivery channel. SMTP and HTTP mail APIs both sit behind this.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn verify_connection(&self) -> Result<()>;

    async fn send_personalized_notification(
        &self,
        gifter: &Participant,
        giftee: &Participant,
        message: &str,
        image: &[u8],
    ) -> Result<()>;
}
