use crate::error::ApiError;
use crate::model::{Boat, BoatId};

pub const NAME_TAKEN: &str = "A boat with this name already exists";

/// Fails with Forbidden when another boat already holds `candidate` (exact, case-sensitive).
///
/// `updating` names the boat being modified; its own record never counts as a
/// collision, so re-sending a boat's current name is allowed.
pub fn ensure_unique_name(
    boats: &[Boat],
    candidate: &str,
    updating: Option<BoatId>,
) -> Result<(), ApiError> {
    let taken = boats
        .iter()
        .filter(|boat| Some(boat.id) != updating)
        .any(|boat| boat.data.name == candidate);

    if taken {
        return Err(ApiError::Forbidden(NAME_TAKEN.to_string()));
    }
    Ok(())
}
