//! The record catalogue. Pure immutable values, no I/O.
//!
//! Every type here follows the same contract: required fields are
//! constructor arguments, optionals default, equality and hashing are
//! structural, and `copy_with` produces a modified clone without touching
//! the original.

pub mod call;
pub mod chat;
pub mod coaching;
pub mod content;
pub mod errors;
pub mod patch;
pub mod subscription;

pub use call::{
    CallParticipant, CallParticipantPatch, CallRole, CallSession, CallSessionPatch, CallStatus,
    CallTokenResponse, CallTokenResponsePatch, CallType, ConnectionQuality, ConnectionStats,
    ConnectionStatsPatch,
};
pub use chat::{
    ChatMessage, ChatMessagePatch, ChatParticipant, ChatParticipantPatch, Conversation,
    ConversationPatch, ConversationType, MessageStatus, MessageType, ParticipantRole,
};
pub use coaching::{
    CoachPackage, CoachPackagePatch, CoachProfile, CoachProfilePatch, CoachReview,
    CoachReviewPatch, CoachSession, CoachSessionPatch, PaymentStatus, SessionStatus, SessionType,
};
pub use content::{
    ArticleStatus, ContentArticle, ContentArticlePatch, ContentAuthor, ContentAuthorPatch,
    ContentCategory, ContentCategoryPatch,
};
pub use errors::DecodeError;
pub use patch::Patch;
pub use subscription::{
    BillingPeriod, SubscriptionTier, SubscriptionTierPatch, TierPricing, TierPricingPatch,
};
