//! Coaching records: coach profiles, booked sessions, packages, reviews.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonCodec, field};
use crate::domain::patch::record_patch;

wire_enum! {
    /// How a coaching session is held.
    pub enum SessionType {
        #[default]
        Video => "video",
        Audio => "audio",
        Chat => "chat",
        InPerson => "in-person",
    }
}

wire_enum! {
    pub enum SessionStatus {
        #[default]
        Pending => "pending",
        Confirmed => "confirmed",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

wire_enum! {
    pub enum PaymentStatus {
        #[default]
        Pending => "pending",
        Paid => "paid",
        Refunded => "refunded",
        Failed => "failed",
    }
}

/// Public profile of a coach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CoachProfile {
    pub id: i64,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specialties: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    pub hourly_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Decimal>,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub is_accepting_clients: bool,
}

impl CoachProfile {
    pub fn new(id: i64, display_name: impl Into<String>, hourly_rate: Decimal) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            headline: None,
            bio: None,
            specialties: Vec::new(),
            languages: Vec::new(),
            hourly_rate,
            rating: None,
            review_count: 0,
            years_experience: None,
            avatar_url: None,
            is_verified: false,
            is_accepting_clients: false,
        }
    }
}

impl JsonCodec for CoachProfile {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            display_name: field::req_str(obj, path, "display_name")?,
            headline: field::opt_str(obj, path, "headline")?,
            bio: field::opt_str(obj, path, "bio")?,
            specialties: field::string_list(obj, path, "specialties")?,
            languages: field::string_list(obj, path, "languages")?,
            hourly_rate: field::req_decimal(obj, path, "hourly_rate")?,
            rating: field::opt_decimal(obj, path, "rating")?,
            review_count: field::u32_or_zero(obj, path, "review_count")?,
            years_experience: field::opt_u32(obj, path, "years_experience")?,
            avatar_url: field::opt_str(obj, path, "avatar_url")?,
            is_verified: field::bool_or_false(obj, path, "is_verified")?,
            is_accepting_clients: field::bool_or_false(obj, path, "is_accepting_clients")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CoachProfile::copy_with`].
    CoachProfile => CoachProfilePatch {
        required {
            id: i64,
            display_name: String,
            specialties: Vec<String>,
            languages: Vec<String>,
            hourly_rate: Decimal,
            review_count: u32,
            is_verified: bool,
            is_accepting_clients: bool,
        }
        optional {
            headline: String,
            bio: String,
            rating: Decimal,
            years_experience: u32,
            avatar_url: String,
        }
    }
}

/// A booked coaching session between a coach and a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CoachSession {
    pub id: i64,
    pub coach_id: i64,
    pub client_id: i64,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub hourly_rate: Decimal,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CoachSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        coach_id: i64,
        client_id: i64,
        session_type: SessionType,
        status: SessionStatus,
        scheduled_at: DateTime<Utc>,
        duration_minutes: u32,
        hourly_rate: Decimal,
        total_amount: Decimal,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            id,
            coach_id,
            client_id,
            session_type,
            status,
            scheduled_at,
            duration_minutes,
            hourly_rate,
            total_amount,
            payment_status,
            notes: None,
            cancellation_reason: None,
            completed_at: None,
        }
    }
}

impl JsonCodec for CoachSession {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            coach_id: field::req_i64(obj, path, "coach_id")?,
            client_id: field::req_i64(obj, path, "client_id")?,
            session_type: field::req_enum(obj, path, "session_type")?,
            status: field::req_enum(obj, path, "status")?,
            scheduled_at: field::req_timestamp(obj, path, "scheduled_at")?,
            duration_minutes: field::req_u32(obj, path, "duration_minutes")?,
            hourly_rate: field::req_decimal(obj, path, "hourly_rate")?,
            total_amount: field::req_decimal(obj, path, "total_amount")?,
            payment_status: field::req_enum(obj, path, "payment_status")?,
            notes: field::opt_str(obj, path, "notes")?,
            cancellation_reason: field::opt_str(obj, path, "cancellation_reason")?,
            completed_at: field::opt_timestamp(obj, path, "completed_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CoachSession::copy_with`].
    CoachSession => CoachSessionPatch {
        required {
            id: i64,
            coach_id: i64,
            client_id: i64,
            session_type: SessionType,
            status: SessionStatus,
            scheduled_at: DateTime<Utc>,
            duration_minutes: u32,
            hourly_rate: Decimal,
            total_amount: Decimal,
            payment_status: PaymentStatus,
        }
        optional {
            notes: String,
            cancellation_reason: String,
            completed_at: DateTime<Utc>,
        }
    }
}

/// A bundle of prepaid sessions sold by a coach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CoachPackage {
    pub id: i64,
    pub coach_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub session_count: u32,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_days: Option<u32>,
    pub is_active: bool,
}

impl CoachPackage {
    pub fn new(
        id: i64,
        coach_id: i64,
        title: impl Into<String>,
        session_count: u32,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            coach_id,
            title: title.into(),
            description: None,
            session_count,
            price,
            validity_days: None,
            is_active: false,
        }
    }
}

impl JsonCodec for CoachPackage {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            coach_id: field::req_i64(obj, path, "coach_id")?,
            title: field::req_str(obj, path, "title")?,
            description: field::opt_str(obj, path, "description")?,
            session_count: field::req_u32(obj, path, "session_count")?,
            price: field::req_decimal(obj, path, "price")?,
            validity_days: field::opt_u32(obj, path, "validity_days")?,
            is_active: field::bool_or_false(obj, path, "is_active")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CoachPackage::copy_with`].
    CoachPackage => CoachPackagePatch {
        required {
            id: i64,
            coach_id: i64,
            title: String,
            session_count: u32,
            price: Decimal,
            is_active: bool,
        }
        optional {
            description: String,
            validity_days: u32,
        }
    }
}

/// A client's review of a coach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CoachReview {
    pub id: i64,
    pub coach_id: i64,
    pub client_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    /// 1 to 5 stars.
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CoachReview {
    pub fn new(id: i64, coach_id: i64, client_id: i64, rating: u8, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            coach_id,
            client_id,
            session_id: None,
            rating,
            comment: None,
            created_at,
        }
    }
}

impl JsonCodec for CoachReview {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            coach_id: field::req_i64(obj, path, "coach_id")?,
            client_id: field::req_i64(obj, path, "client_id")?,
            session_id: field::opt_i64(obj, path, "session_id")?,
            rating: field::req_u8_in_range(obj, path, "rating", 1..=5)?,
            comment: field::opt_str(obj, path, "comment")?,
            created_at: field::req_timestamp(obj, path, "created_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CoachReview::copy_with`].
    CoachReview => CoachReviewPatch {
        required {
            id: i64,
            coach_id: i64,
            client_id: i64,
            rating: u8,
            created_at: DateTime<Utc>,
        }
        optional {
            session_id: i64,
            comment: String,
        }
    }
}
