//! Video/voice call records.
//!
//! Signaling and media routing live in the calling SDK; these types carry
//! the session metadata the app exchanges with it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonCodec, field};
use crate::domain::patch::record_patch;

wire_enum! {
    pub enum CallType {
        #[default]
        Video => "video",
        Voice => "voice",
    }
}

wire_enum! {
    pub enum CallStatus {
        #[default]
        Connecting => "connecting",
        Ongoing => "ongoing",
        Ended => "ended",
        Failed => "failed",
    }
}

wire_enum! {
    pub enum CallRole {
        Host => "host",
        #[default]
        Guest => "guest",
    }
}

wire_enum! {
    /// Coarse link quality as reported by the calling SDK.
    pub enum ConnectionQuality {
        Excellent => "excellent",
        Good => "good",
        Poor => "poor",
        #[default]
        Unknown => "unknown",
    }
}

/// Last reported transport statistics for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionStats {
    pub quality: ConnectionQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_loss_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
}

impl ConnectionStats {
    pub fn new(quality: ConnectionQuality) -> Self {
        Self {
            quality,
            latency_ms: None,
            packet_loss_pct: None,
            bitrate_kbps: None,
        }
    }
}

impl JsonCodec for ConnectionStats {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            quality: field::req_enum(obj, path, "quality")?,
            latency_ms: field::opt_u32(obj, path, "latency_ms")?,
            packet_loss_pct: field::opt_decimal(obj, path, "packet_loss_pct")?,
            bitrate_kbps: field::opt_u32(obj, path, "bitrate_kbps")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ConnectionStats::copy_with`].
    ConnectionStats => ConnectionStatsPatch {
        required {
            quality: ConnectionQuality,
        }
        optional {
            latency_ms: u32,
            packet_loss_pct: Decimal,
            bitrate_kbps: u32,
        }
    }
}

/// One participant in a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallParticipant {
    pub user_id: String,
    pub display_name: String,
    pub role: CallRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_at: Option<DateTime<Utc>>,
    pub is_muted: bool,
    pub is_video_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionStats>,
}

impl CallParticipant {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, role: CallRole) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role,
            joined_at: None,
            left_at: None,
            is_muted: false,
            is_video_enabled: false,
            connection: None,
        }
    }
}

impl JsonCodec for CallParticipant {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            user_id: field::req_str(obj, path, "user_id")?,
            display_name: field::req_str(obj, path, "display_name")?,
            role: field::req_enum(obj, path, "role")?,
            joined_at: field::opt_timestamp(obj, path, "joined_at")?,
            left_at: field::opt_timestamp(obj, path, "left_at")?,
            is_muted: field::bool_or_false(obj, path, "is_muted")?,
            is_video_enabled: field::bool_or_false(obj, path, "is_video_enabled")?,
            connection: field::opt_record(obj, path, "connection")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CallParticipant::copy_with`].
    CallParticipant => CallParticipantPatch {
        required {
            user_id: String,
            display_name: String,
            role: CallRole,
            is_muted: bool,
            is_video_enabled: bool,
        }
        optional {
            joined_at: DateTime<Utc>,
            left_at: DateTime<Utc>,
            connection: ConnectionStats,
        }
    }
}

/// A live or finished call attached to a coaching session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallSession {
    pub id: String,
    pub coach_session_id: i64,
    /// SDK channel the participants join.
    pub channel_name: String,
    pub call_type: CallType,
    pub status: CallStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<CallParticipant>,
    pub is_recording: bool,
}

impl CallSession {
    pub fn new(
        id: impl Into<String>,
        coach_session_id: i64,
        channel_name: impl Into<String>,
        call_type: CallType,
        status: CallStatus,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            coach_session_id,
            channel_name: channel_name.into(),
            call_type,
            status,
            started_at,
            ended_at: None,
            participants: Vec::new(),
            is_recording: false,
        }
    }

    /// Patches the participant with `user_id`, leaving everyone else (and
    /// `self`) untouched. No-op when the participant is not present.
    #[must_use]
    pub fn copy_with_participant(&self, user_id: &str, patch: CallParticipantPatch) -> Self {
        let mut next = self.clone();
        if let Some(p) = next.participants.iter_mut().find(|p| p.user_id == user_id) {
            *p = p.copy_with(patch);
        }
        next
    }
}

impl JsonCodec for CallSession {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_str(obj, path, "id")?,
            coach_session_id: field::req_i64(obj, path, "coach_session_id")?,
            channel_name: field::req_str(obj, path, "channel_name")?,
            call_type: field::req_enum(obj, path, "call_type")?,
            status: field::req_enum(obj, path, "status")?,
            started_at: field::req_timestamp(obj, path, "started_at")?,
            ended_at: field::opt_timestamp(obj, path, "ended_at")?,
            participants: field::list_of(obj, path, "participants")?,
            is_recording: field::bool_or_false(obj, path, "is_recording")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CallSession::copy_with`].
    CallSession => CallSessionPatch {
        required {
            id: String,
            coach_session_id: i64,
            channel_name: String,
            call_type: CallType,
            status: CallStatus,
            started_at: DateTime<Utc>,
            participants: Vec<CallParticipant>,
            is_recording: bool,
        }
        optional {
            ended_at: DateTime<Utc>,
        }
    }
}

/// Short-lived credentials for joining an SDK channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CallTokenResponse {
    pub token: String,
    pub channel_name: String,
    pub uid: u32,
    pub expires_at: DateTime<Utc>,
}

impl CallTokenResponse {
    pub fn new(
        token: impl Into<String>,
        channel_name: impl Into<String>,
        uid: u32,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            channel_name: channel_name.into(),
            uid,
            expires_at,
        }
    }
}

impl JsonCodec for CallTokenResponse {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            token: field::req_str(obj, path, "token")?,
            channel_name: field::req_str(obj, path, "channel_name")?,
            uid: field::req_u32(obj, path, "uid")?,
            expires_at: field::req_timestamp(obj, path, "expires_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`CallTokenResponse::copy_with`].
    CallTokenResponse => CallTokenResponsePatch {
        required {
            token: String,
            channel_name: String,
            uid: u32,
            expires_at: DateTime<Utc>,
        }
        optional {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn call() -> CallSession {
        let host = CallParticipant::new("u7", "Dana", CallRole::Host).copy_with(
            CallParticipantPatch::new()
                .joined_at(ts("2024-03-10T14:00:05Z"))
                .is_video_enabled(true)
                .connection(
                    ConnectionStats::new(ConnectionQuality::Good).copy_with(
                        ConnectionStatsPatch::new()
                            .latency_ms(48)
                            .packet_loss_pct(dec("0.4"))
                            .bitrate_kbps(1200),
                    ),
                ),
        );
        let guest = CallParticipant::new("u19", "Alex", CallRole::Guest);

        CallSession::new(
            "call-1",
            41,
            "session-41",
            CallType::Video,
            CallStatus::Ongoing,
            ts("2024-03-10T14:00:00Z"),
        )
        .copy_with(CallSessionPatch::new().participants(vec![host, guest]).is_recording(true))
    }

    #[test]
    fn call_session_round_trip() {
        let original = call();
        let tree = original.encode();

        assert_eq!(tree["call_type"], json!("video"));
        assert_eq!(tree["participants"][0]["connection"]["quality"], json!("good"));

        assert_eq!(CallSession::decode(&tree).unwrap(), original);
    }

    #[test]
    fn bad_participant_field_reports_indexed_path() {
        let mut tree = call().encode();
        tree["participants"][1]["user_id"] = json!(42);
        let err = CallSession::decode(&tree).unwrap_err();
        assert_eq!(err.path(), Some("$.participants[1].user_id"));
    }

    #[test]
    fn unknown_quality_decodes_as_unknown() {
        let mut tree = call().encode();
        tree["participants"][0]["connection"]["quality"] = json!("stellar");
        let decoded = CallSession::decode(&tree).unwrap();
        let connection = decoded.participants[0].connection.as_ref().unwrap();
        assert_eq!(connection.quality, ConnectionQuality::Unknown);
    }

    #[test]
    fn muting_one_participant_leaves_the_rest_alone() {
        let original = call();
        let muted = original.copy_with_participant("u19", CallParticipantPatch::new().is_muted(true));

        assert!(muted.participants[1].is_muted);
        assert!(!muted.participants[0].is_muted);
        assert!(!original.participants[1].is_muted);
    }

    #[test]
    fn token_response_round_trip() {
        let original = CallTokenResponse::new("tok", "session-41", 7, ts("2024-03-10T15:00:00Z"));
        assert_eq!(CallTokenResponse::decode(&original.encode()).unwrap(), original);
    }
}
