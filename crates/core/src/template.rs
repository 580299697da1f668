//! Template and canvas constants plus ownership checks.

use crate::error::CoreError;
use crate::types::DbId;

/// Default canvas width of a new template.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Default canvas height of a new template.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Maximum template name length (characters).
pub const MAX_TEMPLATE_NAME_LEN: usize = 64;

/// Reject access to a resource owned by somebody else.
pub fn ensure_owner(
    entity: &'static str,
    owner_id: DbId,
    user_id: DbId,
) -> Result<(), CoreError> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{entity} belongs to another user"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn owner_passes() {
        assert!(ensure_owner("Template", 3, 3).is_ok());
    }

    #[test]
    fn other_user_is_forbidden() {
        assert_matches!(
            ensure_owner("Template", 3, 4),
            Err(CoreError::Forbidden(msg)) if msg == "Template belongs to another user"
        );
    }
}
