//! Content library records: articles, categories, authors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::codec::enums::wire_enum;
use crate::codec::{JsonCodec, field};
use crate::domain::patch::record_patch;

wire_enum! {
    pub enum ArticleStatus {
        #[default]
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentAuthor {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ContentAuthor {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: None,
            avatar_url: None,
        }
    }
}

impl JsonCodec for ContentAuthor {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            name: field::req_str(obj, path, "name")?,
            title: field::opt_str(obj, path, "title")?,
            avatar_url: field::opt_str(obj, path, "avatar_url")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ContentAuthor::copy_with`].
    ContentAuthor => ContentAuthorPatch {
        required {
            id: i64,
            name: String,
        }
        optional {
            title: String,
            avatar_url: String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub article_count: u32,
}

impl ContentCategory {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            article_count: 0,
        }
    }
}

impl JsonCodec for ContentCategory {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            name: field::req_str(obj, path, "name")?,
            slug: field::req_str(obj, path, "slug")?,
            description: field::opt_str(obj, path, "description")?,
            article_count: field::u32_or_zero(obj, path, "article_count")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ContentCategory::copy_with`].
    ContentCategory => ContentCategoryPatch {
        required {
            id: i64,
            name: String,
            slug: String,
            article_count: u32,
        }
        optional {
            description: String,
        }
    }
}

/// An article in the in-app content library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentArticle {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub body: String,
    pub status: ArticleStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ContentCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<ContentAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image_url: Option<String>,
    /// Estimated reading time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentArticle {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
        status: ArticleStatus,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            summary: None,
            body: body.into(),
            status,
            tags: Vec::new(),
            category: None,
            author: None,
            hero_image_url: None,
            read_minutes: None,
            published_at: None,
            updated_at: None,
        }
    }
}

impl JsonCodec for ContentArticle {
    fn decode_at(value: &Value, path: &str) -> Result<Self, crate::domain::DecodeError> {
        let obj = field::as_object(value, path)?;
        Ok(Self {
            id: field::req_i64(obj, path, "id")?,
            title: field::req_str(obj, path, "title")?,
            slug: field::req_str(obj, path, "slug")?,
            summary: field::opt_str(obj, path, "summary")?,
            body: field::req_str(obj, path, "body")?,
            status: field::req_enum(obj, path, "status")?,
            tags: field::string_list(obj, path, "tags")?,
            category: field::opt_record(obj, path, "category")?,
            author: field::opt_record(obj, path, "author")?,
            hero_image_url: field::opt_str(obj, path, "hero_image_url")?,
            read_minutes: field::opt_u32(obj, path, "read_minutes")?,
            published_at: field::opt_timestamp(obj, path, "published_at")?,
            updated_at: field::opt_timestamp(obj, path, "updated_at")?,
        })
    }
}

record_patch! {
    /// Field overrides for [`ContentArticle::copy_with`].
    ContentArticle => ContentArticlePatch {
        required {
            id: i64,
            title: String,
            slug: String,
            body: String,
            status: ArticleStatus,
            tags: Vec<String>,
        }
        optional {
            summary: String,
            category: ContentCategory,
            author: ContentAuthor,
            hero_image_url: String,
            read_minutes: u32,
            published_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Patch;
    use serde_json::json;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn article() -> ContentArticle {
        ContentArticle::new(5, "Sleep basics", "sleep-basics", "Go to bed.", ArticleStatus::Published)
            .copy_with(
                ContentArticlePatch::new()
                    .summary("Why sleep matters".to_string())
                    .tags(vec!["sleep".to_string(), "recovery".to_string()])
                    .category(ContentCategory::new(2, "Wellness", "wellness"))
                    .author(ContentAuthor::new(9, "Dr. Kim"))
                    .read_minutes(4)
                    .published_at(ts("2024-02-01T08:00:00Z")),
            )
    }

    #[test]
    fn article_round_trip_with_nested_records() {
        let original = article();
        let tree = original.encode();
        assert_eq!(tree["category"]["slug"], json!("wellness"));
        assert_eq!(ContentArticle::decode(&tree).unwrap(), original);
    }

    #[test]
    fn unknown_status_decodes_as_draft() {
        let mut tree = article().encode();
        tree["status"] = json!("embargoed");
        assert_eq!(ContentArticle::decode(&tree).unwrap().status, ArticleStatus::Draft);
    }

    #[test]
    fn copy_with_clears_nested_optional_records() {
        let original = article();
        let stripped = original.copy_with(
            ContentArticlePatch::new()
                .category(Patch::Clear)
                .author(Patch::Clear)
                .summary(Patch::Clear),
        );

        assert!(stripped.category.is_none());
        assert!(stripped.author.is_none());
        // Original keeps its nested records.
        assert!(original.category.is_some());
    }

    #[test]
    fn tag_order_is_significant() {
        let a = article();
        let b = a.copy_with(
            ContentArticlePatch::new().tags(vec!["recovery".to_string(), "sleep".to_string()]),
        );
        assert_ne!(a, b);
    }

    #[test]
    fn bad_nested_author_reports_nested_path() {
        let mut tree = article().encode();
        tree["author"] = json!({ "name": "Dr. Kim" });
        let err = ContentArticle::decode(&tree).unwrap_err();
        assert_eq!(err.path(), Some("$.author.id"));
    }
}
