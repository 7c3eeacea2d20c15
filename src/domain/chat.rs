//! Chat records: messages, participants, conversations.
//!
//! Pure immutable values. Delivery, ordering and retry live in the
//! messaging backend; these types only describe the wire shapes.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonCodec, JsonObject, field};
use crate::domain::patch::record_patch;

wire_enum! {
    /// Who authored a message.
    pub enum MessageType {
        #[default]
        User => "user",
        Assistant => "assistant",
        System => "system",
    }
}

wire_enum! {
    /// Delivery state as last reported by the backend.
    pub enum MessageStatus {
        Sending => "sending",
        #[default]
        Sent => "sent",
        Failed => "failed",
    }
}

wire_enum! {
    pub enum ParticipantRole {
        #[default]
        Member => "member",
        Coach => "coach",
        Moderator => "moderator",
    }
}

wire_enum! {
    pub enum ConversationType {
        #[default]
        Direct => "direct",
        Group => "group",
        Support => "support",
    }
}

/// A single chat message.
///
/// `reply_to` is a plain nested value, not a graph edge: reply chains are
/// acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(rename = "reply_to_message", skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Box<ChatMessage>>,
    /// Emoji → reacting user ids. Wire key order is irrelevant.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub reactions: BTreeMap<String, Vec<String>>,
    /// Free-form payload attached by the backend (attachment info, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        kind: MessageType,
        status: MessageStatus,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            kind,
            status,
            timestamp,
            conversation_id: None,
            sender_id: None,
            reply_to: None,
            reactions: BTreeMap::new(),
            metadata: None,
        }
    }
}

// `metadata` holds arbitrary JSON and stays out of the hash; equal
// messages still hash equal because equality covers it.
impl Hash for ChatMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.content.hash(state);
        self.kind.hash(state);
        self.status.hash(state);
        self.timestamp.hash(state);
        self.conversation_id.hash(state);
        self.sender_id.hash(state);
        self.reply_to.hash(state);
        self.reactions.hash(state);
    }
}

impl JsonCodec for ChatMessage {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_str(obj, path, "id")?,
            content: field::req_str(obj, path, "content")?,
            kind: field::req_enum(obj, path, "type")?,
            status: field::req_enum(obj, path, "status")?,
            timestamp: field::req_timestamp(obj, path, "timestamp")?,
            conversation_id: field::opt_str(obj, path, "conversation_id")?,
            sender_id: field::opt_str(obj, path, "sender_id")?,
            reply_to: field::opt_record(obj, path, "reply_to_message")?.map(Box::new),
            reactions: field::map_of_string_lists(obj, path, "reactions")?,
            metadata: field::opt_object(obj, path, "metadata")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ChatMessage::copy_with`].
    ChatMessage => ChatMessagePatch {
        required {
            id: String,
            content: String,
            kind: MessageType,
            status: MessageStatus,
            timestamp: DateTime<Utc>,
            reactions: BTreeMap<String, Vec<String>>,
        }
        optional {
            conversation_id: String,
            sender_id: String,
            reply_to: Box<ChatMessage>,
            metadata: JsonObject,
        }
    }
}

/// One member of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChatParticipant {
    pub id: String,
    pub display_name: String,
    pub role: ParticipantRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl ChatParticipant {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, role: ParticipantRole) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role,
            avatar_url: None,
            is_online: false,
            last_seen_at: None,
        }
    }
}

impl JsonCodec for ChatParticipant {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_str(obj, path, "id")?,
            display_name: field::req_str(obj, path, "display_name")?,
            role: field::req_enum(obj, path, "role")?,
            avatar_url: field::opt_str(obj, path, "avatar_url")?,
            is_online: field::bool_or_false(obj, path, "is_online")?,
            last_seen_at: field::opt_timestamp(obj, path, "last_seen_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ChatParticipant::copy_with`].
    ChatParticipant => ChatParticipantPatch {
        required {
            id: String,
            display_name: String,
            role: ParticipantRole,
            is_online: bool,
        }
        optional {
            avatar_url: String,
            last_seen_at: DateTime<Utc>,
        }
    }
}

/// A conversation between two or more participants.
///
/// Participant order is significant (it is the display order); reaction
/// and metadata maps on the contained messages are not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conversation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConversationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<ChatParticipant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<ChatMessage>,
    pub unread_count: u32,
    pub is_muted: bool,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn new(
        id: impl Into<String>,
        kind: ConversationType,
        participants: Vec<ChatParticipant>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: None,
            participants,
            last_message: None,
            unread_count: 0,
            is_muted: false,
            is_archived: false,
            created_at,
            updated_at: None,
        }
    }

    /// Patches the nested last message without rebuilding the whole
    /// conversation. No-op when there is no last message.
    #[must_use]
    pub fn copy_with_last_message(&self, patch: ChatMessagePatch) -> Self {
        let mut next = self.clone();
        next.last_message = self.last_message.as_ref().map(|m| m.copy_with(patch));
        next
    }
}

impl JsonCodec for Conversation {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_str(obj, path, "id")?,
            kind: field::req_enum(obj, path, "type")?,
            title: field::opt_str(obj, path, "title")?,
            participants: field::list_of(obj, path, "participants")?,
            last_message: field::opt_record(obj, path, "last_message")?,
            unread_count: field::u32_or_zero(obj, path, "unread_count")?,
            is_muted: field::bool_or_false(obj, path, "is_muted")?,
            is_archived: field::bool_or_false(obj, path, "is_archived")?,
            created_at: field::req_timestamp(obj, path, "created_at")?,
            updated_at: field::opt_timestamp(obj, path, "updated_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`Conversation::copy_with`].
    Conversation => ConversationPatch {
        required {
            id: String,
            kind: ConversationType,
            participants: Vec<ChatParticipant>,
            unread_count: u32,
            is_muted: bool,
            is_archived: bool,
            created_at: DateTime<Utc>,
        }
        optional {
            title: String,
            last_message: ChatMessage,
            updated_at: DateTime<Utc>,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DecodeError, Patch};
    use proptest::prelude::*;
    use serde_json::json;
    use std::hash::DefaultHasher;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn message(id: &str) -> ChatMessage {
        ChatMessage::new(
            id,
            "hi",
            MessageType::User,
            MessageStatus::Sent,
            ts("2024-01-01T00:00:00Z"),
        )
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn message_round_trip_with_absent_conversation_id() {
        let original = message("m1");
        let tree = original.encode();

        // Absent optionals are omitted, not written as null.
        assert!(tree.get("conversation_id").is_none());
        assert_eq!(tree["type"], json!("user"));
        assert_eq!(tree["timestamp"], json!("2024-01-01T00:00:00Z"));

        let decoded = ChatMessage::decode(&tree).unwrap();
        assert_eq!(decoded, original);
        assert!(decoded.conversation_id.is_none());

        // String form round-trips too.
        assert_eq!(ChatMessage::decode_str(&original.encode_string()).unwrap(), original);
    }

    #[test]
    fn message_round_trip_with_everything_set() {
        let mut metadata = JsonObject::new();
        metadata.insert("attachment".into(), json!({ "kind": "image", "bytes": 123 }));
        let original = message("m2").copy_with(
            ChatMessagePatch::new()
                .conversation_id("c1".to_string())
                .sender_id("u9".to_string())
                .reply_to(Box::new(message("m1")))
                .reactions(BTreeMap::from([(
                    "👍".to_string(),
                    vec!["u1".to_string(), "u2".to_string()],
                )]))
                .metadata(metadata),
        );

        let decoded = ChatMessage::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.reply_to.as_deref(), Some(&message("m1")));
    }

    #[test]
    fn unknown_enum_value_falls_back_to_default() {
        let decoded = ChatMessage::decode(&json!({
            "id": "m1",
            "content": "hi",
            "type": "robot",
            "status": "sent",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(decoded.kind, MessageType::User);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let decoded = ChatMessage::decode(&json!({
            "id": "m1",
            "content": "hi",
            "type": "user",
            "status": "sent",
            "timestamp": "2024-01-01T00:00:00Z",
            "legacy_flags": { "starred": true }
        }));
        assert!(decoded.is_ok());
    }

    #[test]
    fn missing_required_field_names_its_path() {
        let err = ChatMessage::decode(&json!({
            "id": "m1",
            "type": "user",
            "status": "sent",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::MissingField { path: "$.content".into() });
    }

    #[test]
    fn garbage_input_is_rejected_as_a_whole() {
        assert!(matches!(
            ChatMessage::decode_str("not json").unwrap_err(),
            DecodeError::Json { .. }
        ));
    }

    #[test]
    fn copy_with_empty_patch_is_identity() {
        let m = message("m1");
        assert_eq!(m.copy_with(ChatMessagePatch::new()), m);
    }

    #[test]
    fn copy_with_can_clear_an_optional_field() {
        let m = message("m1").copy_with(ChatMessagePatch::new().conversation_id("c1".to_string()));
        let cleared = m.copy_with(ChatMessagePatch::new().conversation_id(Patch::Clear));

        assert_eq!(cleared.conversation_id, None);
        // The original is untouched.
        assert_eq!(m.conversation_id.as_deref(), Some("c1"));
    }

    #[test]
    fn copy_with_does_not_share_collections_with_the_original() {
        let m = message("m1").copy_with(ChatMessagePatch::new().reactions(BTreeMap::from([(
            "👍".to_string(),
            vec!["u1".to_string()],
        )])));
        let updated = m.copy_with(ChatMessagePatch::new().reactions(BTreeMap::new()));

        assert!(updated.reactions.is_empty());
        assert_eq!(m.reactions.len(), 1);
    }

    #[test]
    fn reaction_insertion_order_does_not_affect_equality_or_hash() {
        let a = message("m1").copy_with(ChatMessagePatch::new().reactions(BTreeMap::from([
            ("👍".to_string(), vec!["u1".to_string()]),
            ("🎉".to_string(), vec!["u2".to_string()]),
        ])));
        let b = message("m1").copy_with(ChatMessagePatch::new().reactions(BTreeMap::from([
            ("🎉".to_string(), vec!["u2".to_string()]),
            ("👍".to_string(), vec!["u1".to_string()]),
        ])));

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn participant_order_is_significant() {
        let a = ChatParticipant::new("u1", "Aru", ParticipantRole::Member);
        let b = ChatParticipant::new("u2", "Bek", ParticipantRole::Coach);
        let created = ts("2024-01-01T00:00:00Z");

        let ab = Conversation::new("c1", ConversationType::Direct, vec![a.clone(), b.clone()], created);
        let ba = Conversation::new("c1", ConversationType::Direct, vec![b, a], created);
        assert_ne!(ab, ba);
    }

    #[test]
    fn conversation_round_trip_with_nested_message() {
        let participants = vec![
            ChatParticipant::new("u1", "Aru", ParticipantRole::Member),
            ChatParticipant::new("u2", "Bek", ParticipantRole::Coach),
        ];
        let original = Conversation::new(
            "c1",
            ConversationType::Group,
            participants,
            ts("2024-01-01T00:00:00Z"),
        )
        .copy_with(
            ConversationPatch::new()
                .title("Standup".to_string())
                .last_message(message("m1"))
                .unread_count(3),
        );

        let decoded = Conversation::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn nested_participant_error_carries_its_index() {
        let err = Conversation::decode(&json!({
            "id": "c1",
            "type": "direct",
            "participants": [
                { "id": "u1", "display_name": "Aru", "role": "member" },
                { "id": "u2", "role": "coach" }
            ],
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err.path(), Some("$.participants[1].display_name"));
    }

    #[test]
    fn copy_with_last_message_patches_in_place() {
        let base = Conversation::new(
            "c1",
            ConversationType::Direct,
            vec![ChatParticipant::new("u1", "Aru", ParticipantRole::Member)],
            ts("2024-01-01T00:00:00Z"),
        )
        .copy_with(ConversationPatch::new().last_message(message("m1")));

        let updated = base.copy_with_last_message(
            ChatMessagePatch::new().status(MessageStatus::Failed),
        );

        assert_eq!(updated.last_message.as_ref().unwrap().status, MessageStatus::Failed);
        assert_eq!(base.last_message.as_ref().unwrap().status, MessageStatus::Sent);
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_generated_messages(
            id in "[a-z0-9]{1,12}",
            content in ".{0,40}",
            kind_idx in 0usize..3,
            status_idx in 0usize..3,
            secs in 0i64..4_000_000_000i64,
            conversation_id in proptest::option::of("[a-z]{1,8}"),
        ) {
            let kinds = [MessageType::User, MessageType::Assistant, MessageType::System];
            let statuses = [MessageStatus::Sending, MessageStatus::Sent, MessageStatus::Failed];
            let mut original = ChatMessage::new(
                id,
                content,
                kinds[kind_idx],
                statuses[status_idx],
                DateTime::from_timestamp(secs, 0).unwrap(),
            );
            original.conversation_id = conversation_id;

            let decoded = ChatMessage::decode(&original.encode()).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
