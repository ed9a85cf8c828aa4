//! The article record as the remote store speaks it, plus the image upload
//! result used to build banner URLs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical article record. Field names follow the remote JSON (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Empty until the remote store has created the record.
    pub id: String,
    pub title: String,
    /// Permalink slug.
    pub url: String,
    /// Absolute URL of an uploaded image, or empty.
    pub banner: String,
    pub publish_date: DateTime<Utc>,
    /// Local file name of the document; doubles as the import-origin tag.
    pub data_source: String,
    pub author: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub content: String,
}

/// Wire shape of an article as the remote store sends it. Document stores may
/// carry the key as `id`, `_id` or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "_id", default)]
    object_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    banner: String,
    #[serde(default = "Utc::now")]
    publish_date: DateTime<Utc>,
    #[serde(default)]
    data_source: String,
    #[serde(default)]
    author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    tags: Vec<String>,
    #[serde(default)]
    content: String,
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        let id = if record.id.is_empty() {
            record.object_id
        } else {
            record.id
        };
        Article {
            id,
            title: record.title,
            url: record.url,
            banner: record.banner,
            publish_date: record.publish_date,
            data_source: record.data_source,
            author: record.author,
            categories: record.categories,
            tags: record.tags,
            content: record.content,
        }
    }
}

impl<'de> Deserialize<'de> for Article {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ArticleRecord::deserialize(deserializer).map(Article::from)
    }
}

impl Default for Article {
    fn default() -> Self {
        Article {
            id: String::new(),
            title: String::new(),
            url: String::new(),
            banner: String::new(),
            publish_date: Utc::now(),
            data_source: String::new(),
            author: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            content: String::new(),
        }
    }
}

impl Article {
    /// Whether the remote store already knows this article.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Response of an image upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "articleId", default)]
    pub article_id: String,
    #[serde(rename = "filename", default)]
    pub file_name: String,
    #[serde(rename = "contentType", default)]
    pub content_type: String,
}

// The remote store writes `null` for lists it never received.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
