//! Recommendation request and response bodies

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::domain::{ItemId, UserId};

/// Path parameters of `GET /reco/{strategy_name}/{user_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RecoPath {
    pub strategy_name: String,
    #[serde(deserialize_with = "deserialize_user_id")]
    pub user_id: UserId,
}

/// Parse a signed integer id, saturating values outside the `UserId` range.
///
/// An oversized positive id stays above any user bound and an oversized
/// negative one stays unknown to every model; only non-integers fail.
pub fn parse_user_id(raw: &str) -> Option<UserId> {
    let digits = raw
        .strip_prefix('-')
        .or_else(|| raw.strip_prefix('+'))
        .unwrap_or(raw);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(raw.parse::<UserId>().unwrap_or(if raw.starts_with('-') {
        UserId::MIN
    } else {
        UserId::MAX
    }))
}

fn deserialize_user_id<'de, D>(deserializer: D) -> Result<UserId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse_user_id(&raw).ok_or_else(|| {
        de::Error::custom(format!("Cannot parse `user_id` with value `{}` to an integer", raw))
    })
}

/// Optional query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecoQuery {
    /// Page size override
    pub k: Option<usize>,
}

/// Successful recommendation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoResponse {
    pub user_id: UserId,
    pub items: Vec<ItemId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42"), Some(42));
        assert_eq!(parse_user_id("+42"), Some(42));
        assert_eq!(parse_user_id("-1"), Some(-1));
        assert_eq!(parse_user_id("99999999999999999999"), Some(UserId::MAX));
        assert_eq!(parse_user_id("-99999999999999999999"), Some(UserId::MIN));
    }

    #[test]
    fn test_parse_user_id_rejects_non_integers() {
        for raw in ["", "-", "abc", "1.5", "1e3", " 1", "0x10"] {
            assert_eq!(parse_user_id(raw), None, "{}", raw);
        }
    }

    #[test]
    fn test_response_shape() {
        let body = RecoResponse {
            user_id: 42,
            items: vec![3, 2, 1],
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"user_id": 42, "items": [3, 2, 1]})
        );
    }
}
