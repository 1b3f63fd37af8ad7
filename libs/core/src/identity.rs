use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Delimiter between the profile id and the chat id in a composite identity.
const DELIMITER: char = '|';

/// Composite user identity carried across the bot platform boundary.
///
/// The bot platform only knows a single opaque `user_id`, but addressing a
/// chat conversation needs both the sender's profile id and the chat id, so
/// the pair is packed into one token and unpacked on the way back.
///
/// Decoding splits on the *first* delimiter: a profile id must never contain
/// `|`, while anything after the first `|` belongs to the chat id.
///
/// ```
/// use cmb_core::CompositeId;
///
/// let id = CompositeId::new("alice", "room-7");
/// assert_eq!(id.encode(), "alice|room-7");
///
/// let parsed: CompositeId = "alice|room-7".parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeId {
    pub profile_id: String,
    pub chat_id: String,
}

impl CompositeId {
    pub fn new(profile_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let profile_id = profile_id.into();
        let chat_id = chat_id.into();
        debug_assert!(
            !profile_id.contains(DELIMITER),
            "profile id must not contain the delimiter"
        );
        Self {
            profile_id,
            chat_id,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.profile_id, DELIMITER, self.chat_id)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.profile_id, DELIMITER, self.chat_id)
    }
}

impl FromStr for CompositeId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (profile_id, chat_id) = s
            .split_once(DELIMITER)
            .ok_or(IdentityError::MissingDelimiter)?;
        Ok(Self {
            profile_id: profile_id.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("composite id is missing the '|' delimiter")]
    MissingDelimiter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let id = CompositeId::new("alice", "room-7");
        let parsed: CompositeId = id.encode().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let parsed: CompositeId = "alice|room|7".parse().unwrap();
        assert_eq!(parsed.profile_id, "alice");
        assert_eq!(parsed.chat_id, "room|7");
    }

    #[test]
    fn rejects_missing_delimiter() {
        let err = "alice-room-7".parse::<CompositeId>().unwrap_err();
        assert_eq!(err, IdentityError::MissingDelimiter);
    }

    #[test]
    fn empty_segments_are_preserved() {
        let parsed: CompositeId = "|room-7".parse().unwrap();
        assert_eq!(parsed.profile_id, "");
        assert_eq!(parsed.chat_id, "room-7");
    }
}
