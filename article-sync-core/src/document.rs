//! Frontmatter document codec.
//!
//! An article is stored locally as a YAML metadata header followed by the
//! body text:
//!
//! ```text
//! ---
//! id: ''
//! title: Hello
//! url: /hello
//! banner: ''
//! publishDate: 01/02/2020
//! dataSource: hello.md
//! author: Jane
//! categories: a, b
//! tags: x
//! ---
//! Body text
//! ```
//!
//! Every header value is a string: the date uses `MM/DD/YYYY` and lists are
//! comma-space joined. The opening `---` is optional on read. Decoding starts
//! from caller-supplied defaults and only overwrites what the document
//! actually carries, so a half-filled file never wipes known state.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::article::Article;
use crate::error::SyncError;
use crate::list_codec;

/// chrono pattern for `MM/DD/YYYY`.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

const DELIMITER: &str = "---";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentHeader {
    #[serde(default, deserialize_with = "scalar_string")]
    id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    title: String,
    #[serde(default, deserialize_with = "scalar_string")]
    url: String,
    #[serde(default, deserialize_with = "scalar_string")]
    banner: String,
    #[serde(default, deserialize_with = "scalar_string")]
    publish_date: String,
    #[serde(default, deserialize_with = "scalar_string")]
    data_source: String,
    #[serde(default, deserialize_with = "scalar_string")]
    author: String,
    #[serde(default, deserialize_with = "scalar_string")]
    categories: String,
    #[serde(default, deserialize_with = "scalar_string")]
    tags: String,
}

impl From<&Article> for DocumentHeader {
    fn from(article: &Article) -> Self {
        DocumentHeader {
            id: article.id.clone(),
            title: article.title.clone(),
            url: article.url.clone(),
            banner: article.banner.clone(),
            publish_date: format_date(&article.publish_date),
            data_source: article.data_source.clone(),
            author: article.author.clone(),
            categories: list_codec::encode(&article.categories),
            tags: list_codec::encode(&article.tags),
        }
    }
}

impl DocumentHeader {
    fn merge_into(self, mut article: Article, body: &str) -> Article {
        if !self.id.is_empty() {
            article.id = self.id;
        }
        if !self.banner.is_empty() {
            article.banner = self.banner;
        }
        if !self.data_source.is_empty() {
            article.data_source = self.data_source;
        }
        article.title = self.title;
        article.url = self.url;
        article.author = self.author;

        match parse_date(&self.publish_date) {
            Some(date) => article.publish_date = date,
            None => {
                debug!(value = %self.publish_date, "[DOCUMENT] publishDate missing or unparsable, keeping default");
            }
        }

        article.categories = decode_list("categories", &self.categories);
        article.tags = decode_list("tags", &self.tags);
        article.content = body.to_string();
        article
    }
}

/// Renders the article as header plus body.
pub fn encode(article: &Article) -> Result<Vec<u8>, SyncError> {
    let header = DocumentHeader::from(article);
    let yaml =
        serde_yaml::to_string(&header).map_err(|e| SyncError::Serialization(e.to_string()))?;

    let mut out = String::with_capacity(yaml.len() + article.content.len() + 8);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&article.content);
    Ok(out.into_bytes())
}

/// Parses a document on top of `defaults`.
///
/// Fails only when the bytes are not a header plus body at all; field-level
/// problems (bad date, odd list text) fall back to the default value.
pub fn decode(bytes: &[u8], defaults: Article) -> Result<Article, SyncError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SyncError::Deserialization(format!("document is not UTF-8: {e}")))?;
    let (header_text, body) = split_document(text)?;

    let header: DocumentHeader = if header_text.trim().is_empty() {
        DocumentHeader::default()
    } else {
        serde_yaml::from_str(header_text)
            .map_err(|e| SyncError::Deserialization(format!("invalid metadata header: {e}")))?
    };

    Ok(header.merge_into(defaults, body))
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reads `MM/DD/YYYY` as midnight UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
}

fn decode_list(field: &str, text: &str) -> Vec<String> {
    match list_codec::decode(text) {
        Ok(items) => items,
        Err(err) => {
            warn!(field, error = %err, "[DOCUMENT] list could not be decoded, using an empty list");
            Vec::new()
        }
    }
}

/// Returns `(header, body)`. The body starts right after the closing
/// delimiter line and is returned verbatim.
fn split_document(text: &str) -> Result<(&str, &str), SyncError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rest = match next_line(text) {
        Some((first, after)) if is_delimiter(first) => after,
        _ => text,
    };

    let mut offset = 0;
    while let Some((line, after)) = next_line(&rest[offset..]) {
        if is_delimiter(line) {
            return Ok((&rest[..offset], after));
        }
        offset = rest.len() - after.len();
    }

    Err(SyncError::Deserialization(format!(
        "missing closing `{DELIMITER}` delimiter after the metadata header"
    )))
}

fn next_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    Some(match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    })
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).map_err(D::Error::custom)
}

// Hand-edited headers may hold numbers, booleans, or a YAML list where a
// string is expected.
fn scalar_to_string(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Sequence(items) => items
            .into_iter()
            .map(scalar_to_string)
            .collect::<Result<Vec<_>, _>>()
            .map(|items| items.join(list_codec::SEPARATOR)),
        Value::Tagged(tagged) => {
            let tagged = *tagged;
            scalar_to_string(tagged.value)
        }
        Value::Mapping(_) => Err("expected a string, found a mapping".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample() -> Article {
        Article {
            id: "abc123".into(),
            title: "Hello: a story".into(),
            url: "/hello".into(),
            banner: "https://cms.example.com/images/img1".into(),
            publish_date: midnight(2021, 12, 31),
            data_source: "hello.md".into(),
            author: "Jane".into(),
            categories: list(&["rust", "cli"]),
            tags: list(&["x", "y z"]),
            content: "# Heading\n\nFirst paragraph.\n---\nnot a header\n".into(),
        }
    }

    #[test]
    fn decodes_document_without_opening_delimiter() {
        let text = "id: \ntitle: Hello\nurl: /hello\nbanner: \npublishDate: 01/02/2020\ndataSource: hello.md\nauthor: Jane\ncategories: a, b\ntags: x\n---\nBody text";
        let defaults = Article {
            id: "keep-me".into(),
            banner: "https://cms.example.com/images/old".into(),
            ..Article::default()
        };

        let article = decode(text.as_bytes(), defaults).unwrap();

        assert_eq!(article.title, "Hello");
        assert_eq!(article.url, "/hello");
        assert_eq!(article.author, "Jane");
        assert_eq!(article.categories, list(&["a", "b"]));
        assert_eq!(article.tags, list(&["x"]));
        assert_eq!(article.publish_date, midnight(2020, 1, 2));
        assert_eq!(article.content, "Body text");
        assert_eq!(article.id, "keep-me");
        assert_eq!(article.banner, "https://cms.example.com/images/old");
        assert_eq!(article.data_source, "hello.md");
    }

    #[test]
    fn encode_then_decode_keeps_fields() {
        let original = sample();
        let bytes = encode(&original).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("---\n"));
        assert!(text.contains("publishDate: 12/31/2021"));
        assert!(text.contains("categories: rust, cli"));

        let decoded = decode(&bytes, Article::default()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn round_trip_drops_time_of_day() {
        let mut original = sample();
        original.publish_date = Utc.with_ymd_and_hms(2022, 3, 4, 17, 45, 9).unwrap();
        let decoded = decode(&encode(&original).unwrap(), Article::default()).unwrap();
        assert_eq!(decoded.publish_date, midnight(2022, 3, 4));
    }

    #[test]
    fn list_items_are_trimmed_on_decode() {
        let text = "---\ntitle: T\ncategories: ' a ,b  ,  c'\ntags: ''\n---\n";
        let article = decode(text.as_bytes(), Article::default()).unwrap();
        assert_eq!(article.categories, list(&["a", "b", "c"]));
        assert!(article.tags.is_empty());
        assert_eq!(article.content, "");
    }

    #[test]
    fn format_then_parse_date_is_identity() {
        let dates = [
            midnight(2020, 1, 2),
            midnight(2024, 2, 29),
            midnight(1999, 12, 31),
            midnight(1, 1, 1),
        ];
        for date in dates {
            assert_eq!(parse_date(&format_date(&date)), Some(date));
        }
    }

    #[test]
    fn unparsable_date_keeps_the_default() {
        let default_date = midnight(2019, 6, 1);
        let defaults = Article {
            publish_date: default_date,
            ..Article::default()
        };
        let text = "---\ntitle: T\npublishDate: next tuesday\n---\nbody";
        let article = decode(text.as_bytes(), defaults).unwrap();
        assert_eq!(article.publish_date, default_date);
    }

    #[test]
    fn non_string_scalars_are_coerced() {
        let text = "---\nid: 42\ntitle: true\ncategories:\n  - a\n  - b\n---\n";
        let article = decode(text.as_bytes(), Article::default()).unwrap();
        assert_eq!(article.id, "42");
        assert_eq!(article.title, "true");
        assert_eq!(article.categories, list(&["a", "b"]));
    }

    #[test]
    fn missing_closing_delimiter_is_a_deserialization_error() {
        let err = decode(b"title: Hello\nno delimiter here", Article::default()).unwrap_err();
        assert!(matches!(err, SyncError::Deserialization(_)));
    }

    #[test]
    fn invalid_header_is_a_deserialization_error() {
        let err = decode(b"---\ntitle: [unclosed\n---\nbody", Article::default()).unwrap_err();
        assert!(matches!(err, SyncError::Deserialization(_)));

        let err = decode(b"---\ntitle:\n  nested: map\n---\n", Article::default()).unwrap_err();
        assert!(matches!(err, SyncError::Deserialization(_)));
    }

    #[test]
    fn non_utf8_is_a_deserialization_error() {
        let err = decode(&[0xff, 0xfe, 0x00], Article::default()).unwrap_err();
        assert!(matches!(err, SyncError::Deserialization(_)));
    }

    #[test]
    fn crlf_documents_are_accepted() {
        let text = "---\r\ntitle: Hello\r\n---\r\nBody\r\n";
        let article = decode(text.as_bytes(), Article::default()).unwrap();
        assert_eq!(article.title, "Hello");
        assert_eq!(article.content, "Body\r\n");
    }
}
