//! Priority tiers and the compact priority token codec.
//!
//! A queue entry's tier decides where it is admitted in a stall's live queue.
//! Tiers are totally ordered; the ascending order is the service order:
//!
//! ```text
//! Round1 < Round2 < Round3 < Buffer < WalkIn
//! ```
//!
//! `Buffer` never belongs to a stored request. It only appears as a slot in
//! the rendered queue view (see [`crate::queue_view`]).
//!
//! The token form `<student_id>_<company_code>_<round>` is how registration
//! flows refer to a request's priority, e.g. `42_7_2` or `42_7_walkin`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Highest pre-listed round a company may run.
pub const MAX_ROUND: u8 = 3;

/// Separator between the three token segments.
const TOKEN_SEPARATOR: char = '_';

/// Round segment used for buffer tokens.
const ROUND_TOKEN_BUFFER: &str = "buffer";

/// Round segment used for walk-in tokens.
const ROUND_TOKEN_WALK_IN: &str = "walkin";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// How a student arrived in the queue. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PreListed,
    WalkIn,
}

impl Category {
    /// Parse a category string from the database or a query parameter.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "pre_listed" => Ok(Self::PreListed),
            "walk_in" => Ok(Self::WalkIn),
            _ => Err(CoreError::Validation(format!(
                "Invalid category '{s}'. Must be one of: pre_listed, walk_in"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreListed => "pre_listed",
            Self::WalkIn => "walk_in",
        }
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Priority class of a queue entry. Variant order is service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "round_1")]
    Round1,
    #[serde(rename = "round_2")]
    Round2,
    #[serde(rename = "round_3")]
    Round3,
    #[serde(rename = "buffer")]
    Buffer,
    #[serde(rename = "walk_in")]
    WalkIn,
}

impl Tier {
    /// Derive the tier of a new request from its category and round.
    ///
    /// Pre-listed requests default to round 1 when no round is given. Walk-ins
    /// always land in [`Tier::WalkIn`]; any round supplied with them is ignored.
    pub fn for_request(category: Category, round: Option<u8>) -> Result<Self, CoreError> {
        match category {
            Category::WalkIn => Ok(Self::WalkIn),
            Category::PreListed => Self::from_round(round.unwrap_or(1)),
        }
    }

    /// Map a pre-listed round number (1-based) to its tier.
    pub fn from_round(round: u8) -> Result<Self, CoreError> {
        match round {
            1 => Ok(Self::Round1),
            2 => Ok(Self::Round2),
            3 => Ok(Self::Round3),
            _ => Err(CoreError::Validation(format!(
                "Invalid round {round}. Must be between 1 and {MAX_ROUND}"
            ))),
        }
    }

    /// The pre-listed round number, or `None` for buffer and walk-in tiers.
    pub fn round(self) -> Option<u8> {
        match self {
            Self::Round1 => Some(1),
            Self::Round2 => Some(2),
            Self::Round3 => Some(3),
            Self::Buffer | Self::WalkIn => None,
        }
    }

    /// The tier a student must have completed before entering this one.
    pub fn preceding(self) -> Option<Self> {
        match self {
            Self::Round2 => Some(Self::Round1),
            Self::Round3 => Some(Self::Round2),
            Self::Round1 | Self::Buffer | Self::WalkIn => None,
        }
    }

    /// The tier whose admission a completed request of this tier unlocks.
    pub fn following(self) -> Option<Self> {
        match self {
            Self::Round1 => Some(Self::Round2),
            Self::Round2 => Some(Self::Round3),
            Self::Round3 | Self::Buffer | Self::WalkIn => None,
        }
    }

    /// The category a stored request with this tier belongs to.
    pub fn category(self) -> Option<Category> {
        match self {
            Self::Round1 | Self::Round2 | Self::Round3 => Some(Category::PreListed),
            Self::WalkIn => Some(Category::WalkIn),
            Self::Buffer => None,
        }
    }

    /// Parse a tier string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "round_1" => Ok(Self::Round1),
            "round_2" => Ok(Self::Round2),
            "round_3" => Ok(Self::Round3),
            "buffer" => Ok(Self::Buffer),
            "walk_in" => Ok(Self::WalkIn),
            _ => Err(CoreError::Validation(format!(
                "Invalid tier '{s}'. Must be one of: round_1, round_2, round_3, buffer, walk_in"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Round1 => "round_1",
            Self::Round2 => "round_2",
            Self::Round3 => "round_3",
            Self::Buffer => "buffer",
            Self::WalkIn => "walk_in",
        }
    }

    fn round_token(self) -> &'static str {
        match self {
            Self::Round1 => "1",
            Self::Round2 => "2",
            Self::Round3 => "3",
            Self::Buffer => ROUND_TOKEN_BUFFER,
            Self::WalkIn => ROUND_TOKEN_WALK_IN,
        }
    }

    fn from_round_token(token: &str) -> Option<Self> {
        match token {
            "1" => Some(Self::Round1),
            "2" => Some(Self::Round2),
            "3" => Some(Self::Round3),
            ROUND_TOKEN_BUFFER => Some(Self::Buffer),
            ROUND_TOKEN_WALK_IN => Some(Self::WalkIn),
            _ => None,
        }
    }
}

impl TryFrom<String> for Tier {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Token codec
// ---------------------------------------------------------------------------

/// Decoded form of a `<student_id>_<company_code>_<round>` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityToken {
    pub student_id: DbId,
    pub company_code: String,
    pub tier: Tier,
}

impl PriorityToken {
    pub fn new(student_id: DbId, company_code: impl Into<String>, tier: Tier) -> Self {
        Self {
            student_id,
            company_code: company_code.into(),
            tier,
        }
    }

    /// Render the token. Total over every tier.
    pub fn encode(&self) -> String {
        encode_priority(self.student_id, &self.company_code, self.tier)
    }

    /// Parse a token, failing with [`CoreError::MalformedPriorityToken`].
    pub fn decode(token: &str) -> Result<Self, CoreError> {
        let malformed = || CoreError::MalformedPriorityToken(token.to_string());

        let parts: Vec<&str> = token.split(TOKEN_SEPARATOR).collect();
        let [student, company, round] = parts.as_slice() else {
            return Err(malformed());
        };

        let student_id: DbId = student.parse().map_err(|_| malformed())?;
        if company.is_empty() {
            return Err(malformed());
        }
        let tier = Tier::from_round_token(round).ok_or_else(malformed)?;

        Ok(Self::new(student_id, *company, tier))
    }
}

/// Encode a priority token from its parts.
///
/// `company_code` must not contain `_`; company codes are numeric ids here.
pub fn encode_priority(student_id: DbId, company_code: &str, tier: Tier) -> String {
    format!(
        "{student_id}{TOKEN_SEPARATOR}{company_code}{TOKEN_SEPARATOR}{}",
        tier.round_token()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_sort_in_service_order() {
        let mut tiers = vec![
            Tier::WalkIn,
            Tier::Buffer,
            Tier::Round3,
            Tier::Round1,
            Tier::Round2,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                Tier::Round1,
                Tier::Round2,
                Tier::Round3,
                Tier::Buffer,
                Tier::WalkIn
            ]
        );
    }

    #[test]
    fn prelisted_defaults_to_round_one() {
        assert_eq!(
            Tier::for_request(Category::PreListed, None).unwrap(),
            Tier::Round1
        );
    }

    #[test]
    fn walk_in_ignores_round() {
        assert_eq!(
            Tier::for_request(Category::WalkIn, Some(3)).unwrap(),
            Tier::WalkIn
        );
    }

    #[test]
    fn prelisted_round_out_of_range_rejected() {
        assert!(matches!(
            Tier::for_request(Category::PreListed, Some(4)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            Tier::for_request(Category::PreListed, Some(0)),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn preceding_tier_chain() {
        assert_eq!(Tier::Round1.preceding(), None);
        assert_eq!(Tier::Round2.preceding(), Some(Tier::Round1));
        assert_eq!(Tier::Round3.preceding(), Some(Tier::Round2));
        assert_eq!(Tier::WalkIn.preceding(), None);
        for tier in [Tier::Round1, Tier::Round2] {
            assert_eq!(tier.following().and_then(Tier::preceding), Some(tier));
        }
        assert_eq!(Tier::Round3.following(), None);
        assert_eq!(Tier::WalkIn.following(), None);
    }

    #[test]
    fn encode_uses_round_segment() {
        assert_eq!(encode_priority(42, "7", Tier::Round2), "42_7_2");
        assert_eq!(encode_priority(42, "7", Tier::WalkIn), "42_7_walkin");
        assert_eq!(encode_priority(42, "7", Tier::Buffer), "42_7_buffer");
    }

    #[test]
    fn decode_walk_in_token() {
        let token = PriorityToken::decode("9_acme_walkin").unwrap();
        assert_eq!(token.student_id, 9);
        assert_eq!(token.company_code, "acme");
        assert_eq!(token.tier, Tier::WalkIn);
    }

    #[test]
    fn decode_rejects_unknown_round() {
        assert!(matches!(
            PriorityToken::decode("9_7_4"),
            Err(CoreError::MalformedPriorityToken(_))
        ));
        assert!(matches!(
            PriorityToken::decode("9_7_vip"),
            Err(CoreError::MalformedPriorityToken(_))
        ));
    }

    #[test]
    fn decode_rejects_wrong_segment_count() {
        for token in ["", "9_7", "9_7_1_extra", "9__7_1"] {
            assert!(
                matches!(
                    PriorityToken::decode(token),
                    Err(CoreError::MalformedPriorityToken(_))
                ),
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn decode_rejects_non_numeric_student() {
        assert!(matches!(
            PriorityToken::decode("abc_7_1"),
            Err(CoreError::MalformedPriorityToken(_))
        ));
    }

    #[test]
    fn decode_rejects_empty_company() {
        assert!(matches!(
            PriorityToken::decode("9__1"),
            Err(CoreError::MalformedPriorityToken(_))
        ));
    }

    #[test]
    fn tier_db_strings_parse_back() {
        for tier in [Tier::Round1, Tier::Round2, Tier::Round3, Tier::WalkIn] {
            assert_eq!(Tier::from_str_db(tier.as_str()).unwrap(), tier);
        }
        assert!(Tier::from_str_db("round_4").is_err());
    }

    #[test]
    fn tier_serializes_as_db_string() {
        let json = serde_json::to_string(&Tier::Round3).unwrap();
        assert_eq!(json, "\"round_3\"");
    }

    #[test]
    fn category_of_tiers() {
        assert_eq!(Tier::Round2.category(), Some(Category::PreListed));
        assert_eq!(Tier::WalkIn.category(), Some(Category::WalkIn));
        assert_eq!(Tier::Buffer.category(), None);
    }
}
