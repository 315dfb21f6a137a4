use crate::services::SubscriptionService;
use std::time::Duration;

const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Background jobs that run for the lifetime of the server.
pub fn spawn_all(subscription_service: SubscriptionService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match subscription_service.expire_lapsed().await {
                Ok(0) => {}
                Ok(n) => log::info!("Expiry sweep downgraded {n} lapsed accounts"),
                Err(e) => log::error!("Expiry sweep failed: {e}"),
            }
        }
    });
}
