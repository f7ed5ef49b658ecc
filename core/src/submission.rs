//! Score submissions: parsing and normalization.
//!
//! Validation goes by type and parseability. A score of `0` is a real score;
//! only an absent or unparseable score is rejected.

use crate::{
    error::{ScoreError, ScoreResult},
    types::{PlayerId, Score, MAX_SCORE},
};
use serde_json::{Map, Value};

// Accepted JSON keys, canonical name first.
const PLAYER_ID_KEYS:    &[&str] = &["player_id", "telegram_id"];
const DISPLAY_NAME_KEYS: &[&str] = &["display_name", "username"];
const AVATAR_REF_KEYS:   &[&str] = &["avatar_ref", "profile_photo"];
const SCORE_KEYS:        &[&str] = &["score"];
const WALLET_REF_KEYS:   &[&str] = &["wallet_ref", "wallet_address"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub player_id:    PlayerId,
    pub display_name: Option<String>,
    pub avatar_ref:   Option<String>,
    pub score:        Score,
    pub wallet_ref:   Option<String>,
}

impl Submission {
    pub fn new(player_id: impl Into<PlayerId>, score: Score) -> Self {
        Self {
            player_id: player_id.into(),
            display_name: None,
            avatar_ref: None,
            score,
            wallet_ref: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_avatar_ref(mut self, avatar: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar.into());
        self
    }

    pub fn with_wallet_ref(mut self, wallet: impl Into<String>) -> Self {
        self.wallet_ref = Some(wallet.into());
        self
    }

    /// Parse a JSON request body.
    pub fn from_json(body: &Value) -> ScoreResult<Self> {
        let obj = body
            .as_object()
            .ok_or_else(|| ScoreError::invalid("body", "must be a JSON object"))?;

        let player_id = match lookup(obj, PLAYER_ID_KEYS) {
            None | Some(Value::Null) => return Err(ScoreError::invalid("player_id", "is required")),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.is_u64() || n.is_i64() => n.to_string(),
            Some(_) => {
                return Err(ScoreError::invalid("player_id", "must be a string or an integer"))
            }
        };

        Self {
            player_id,
            display_name: optional_text(obj, "display_name", DISPLAY_NAME_KEYS)?,
            avatar_ref: optional_text(obj, "avatar_ref", AVATAR_REF_KEYS)?,
            score: parse_score(lookup(obj, SCORE_KEYS))?,
            wallet_ref: optional_text(obj, "wallet_ref", WALLET_REF_KEYS)?,
        }
        .normalized()
    }

    /// Trim text fields, drop empty optionals, and reject an empty player id
    /// or an out-of-range score.
    pub fn normalized(self) -> ScoreResult<Self> {
        let player_id = self.player_id.trim().to_string();
        if player_id.is_empty() {
            return Err(ScoreError::invalid("player_id", "must not be empty"));
        }
        if self.score > MAX_SCORE {
            return Err(ScoreError::invalid("score", "is out of range"));
        }
        Ok(Self {
            player_id,
            display_name: non_empty(self.display_name),
            avatar_ref: non_empty(self.avatar_ref),
            score: self.score,
            wallet_ref: non_empty(self.wallet_ref),
        })
    }
}

/// Parse a score from a JSON integer or a base-10 integer string.
pub fn parse_score(value: Option<&Value>) -> ScoreResult<Score> {
    let score = match value {
        None | Some(Value::Null) => return Err(ScoreError::invalid("score", "is required")),
        Some(Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
            (Some(v), _) => v,
            (None, Some(_)) => return Err(ScoreError::invalid("score", "must not be negative")),
            (None, None) if n.is_f64() => {
                return Err(ScoreError::invalid("score", "must be a whole number"))
            }
            (None, None) => return Err(ScoreError::invalid("score", "is out of range")),
        },
        Some(Value::String(s)) => {
            let parsed: i64 = s
                .trim()
                .parse()
                .map_err(|_| ScoreError::invalid("score", format!("'{s}' is not an integer")))?;
            u64::try_from(parsed)
                .map_err(|_| ScoreError::invalid("score", "must not be negative"))?
        }
        Some(_) => return Err(ScoreError::invalid("score", "must be an integer")),
    };
    if score > MAX_SCORE {
        return Err(ScoreError::invalid("score", "is out of range"));
    }
    Ok(score)
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn optional_text(
    obj: &Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> ScoreResult<Option<String>> {
    match lookup(obj, keys) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ScoreError::invalid(field, "must be a string")),
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score_of(v: Value) -> ScoreResult<Score> {
        parse_score(Some(&v))
    }

    #[test]
    fn zero_is_a_score() {
        assert_eq!(score_of(json!(0)).unwrap(), 0);
        assert_eq!(score_of(json!("0")).unwrap(), 0);
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(score_of(json!(" 42 ")).unwrap(), 42);
        assert_eq!(score_of(json!(1234)).unwrap(), 1234);
    }

    #[test]
    fn unparseable_scores_are_rejected() {
        for bad in [json!("abc"), json!("12abc"), json!(""), json!(-3), json!("-3"),
                    json!(1.5), json!(true), json!([1])] {
            let err = score_of(bad.clone()).unwrap_err();
            assert!(err.is_invalid_input(), "{bad} should be invalid");
        }
        assert!(parse_score(None).unwrap_err().is_invalid_input());
        assert!(parse_score(Some(&Value::Null)).unwrap_err().is_invalid_input());
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let body = json!({
            "telegram_id": 998877,
            "username": "Ann",
            "profile_photo": "https://img/ann.png",
            "score": "10",
            "wallet_address": "EQ-wallet"
        });
        let sub = Submission::from_json(&body).unwrap();
        assert_eq!(sub.player_id, "998877");
        assert_eq!(sub.display_name.as_deref(), Some("Ann"));
        assert_eq!(sub.avatar_ref.as_deref(), Some("https://img/ann.png"));
        assert_eq!(sub.score, 10);
        assert_eq!(sub.wallet_ref.as_deref(), Some("EQ-wallet"));
    }

    #[test]
    fn blank_optionals_become_absent() {
        let body = json!({ "player_id": " p1 ", "display_name": "  ", "wallet_ref": "", "score": 3 });
        let sub = Submission::from_json(&body).unwrap();
        assert_eq!(sub.player_id, "p1");
        assert_eq!(sub.display_name, None);
        assert_eq!(sub.wallet_ref, None);
    }

    #[test]
    fn player_id_is_required() {
        for body in [json!({ "score": 1 }), json!({ "player_id": "", "score": 1 }),
                     json!({ "player_id": null, "score": 1 }), json!({ "player_id": {}, "score": 1 })] {
            let err = Submission::from_json(&body).unwrap_err();
            assert!(matches!(err, ScoreError::InvalidInput { field: "player_id", .. }));
        }
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(Submission::from_json(&json!([1, 2])).unwrap_err().is_invalid_input());
    }
}
