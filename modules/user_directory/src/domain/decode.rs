use serde_json::Value;
use tracing::warn;

use crate::contract::model::UserProfile;

/// Convert a raw profile list record by record.
///
/// A record that does not decode (no `id`, wrong field types, not an object)
/// is dropped with a warning; the others keep their order.
pub fn decode_profiles(raw: Vec<Value>) -> Vec<UserProfile> {
    let total = raw.len();
    let profiles: Vec<UserProfile> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record.get("id").map(Value::to_string);
            match serde_json::from_value::<UserProfile>(record) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(index, id = ?id, "Skipping malformed profile record: {}", e);
                    None
                }
            }
        })
        .collect();

    if profiles.len() < total {
        warn!(
            kept = profiles.len(),
            dropped = total - profiles.len(),
            "Profile list partially decoded"
        );
    }
    profiles
}
