//! Manage user roles.

use medimart_core::{UserId, UserRole};
use tracing::info;

/// Set the role on a user's profile document.
///
/// # Errors
///
/// Returns an error for an unknown role name or a failed platform write.
pub async fn set_role(uid: &str, role: &str) -> Result<(), Box<dyn std::error::Error>> {
    let role = match role {
        "admin" => UserRole::Admin,
        "user" => UserRole::User,
        other => return Err(format!("unknown role: {other} (expected admin or user)").into()),
    };

    let gateway = super::gateway_from_env()?;
    let uid = UserId::new(uid);
    let outcome = gateway.update_user_role(&uid, role).await;

    if outcome.success {
        info!(uid = %uid, role = %role, "Role updated");
        Ok(())
    } else {
        Err(outcome
            .error
            .unwrap_or_else(|| "role update failed".to_owned())
            .into())
    }
}
