use uuid::Uuid;

use super::repo_types::PublicUser;
use crate::error::AppError;

/// Only the creator of a resource may mutate or delete it.
///
/// Callers run this after the existence check, so a missing resource is a
/// 404 for everyone and a non-owner learns that the resource exists.
pub fn assert_ownership(identity: &PublicUser, owner_id: Uuid) -> Result<(), AppError> {
    if identity.id != owner_id {
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action".into(),
        ));
    }
    Ok(())
}
