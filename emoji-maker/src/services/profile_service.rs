use std::time::Duration;

use crate::models::NewProfile;

use super::ports::{ProfileRepository, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Existing,
    Created,
    /// Another request created the row between our lookup and insert.
    LostRace,
}

/// Makes sure `user_id` has a profile row, creating the default one if needed.
pub async fn ensure_profile(
    profiles: &dyn ProfileRepository,
    user_id: &str,
) -> Result<ProvisionOutcome, StoreError> {
    if profiles.find(user_id).await?.is_some() {
        return Ok(ProvisionOutcome::Existing);
    }

    let created = profiles.insert_if_absent(NewProfile::default_for(user_id)).await?;
    if created {
        tracing::info!(user_id = %user_id, "default profile created");
        Ok(ProvisionOutcome::Created)
    } else {
        Ok(ProvisionOutcome::LostRace)
    }
}

/// Best-effort variant used on the request path: bounded by `limit`,
/// failures are logged and never surface to the caller.
pub async fn provision_best_effort(
    profiles: &dyn ProfileRepository,
    user_id: &str,
    limit: Duration,
) -> Option<ProvisionOutcome> {
    match tokio::time::timeout(limit, ensure_profile(profiles, user_id)).await {
        Ok(Ok(outcome)) => Some(outcome),
        Ok(Err(e)) => {
            tracing::error!(error = %e, user_id = %user_id, "failed to create default profile");
            None
        }
        Err(_) => {
            tracing::warn!(user_id = %user_id, ?limit, "profile provisioning timed out");
            None
        }
    }
}
