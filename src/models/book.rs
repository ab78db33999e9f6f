//! Book record model and related request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Book record as held in the store and returned by `GET /books/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque generated identifier
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    /// Always `<= page_count`
    pub read_page: u32,
    pub reading: bool,
    pub finished: bool,
    #[serde(with = "iso_millis")]
    pub inserted_at: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Short book representation used in lists
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update request body.
///
/// Every field is optional on the wire. Missing fields take these defaults:
/// `name` empty (also for `null`), `year` 0, text fields empty, page counts 0,
/// `reading` and `finished` false.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    pub finished: bool,
}

/// A payload that passed validation, with `finished` derived
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBook {
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    pub finished: bool,
}

impl ValidBook {
    /// Build a new record around the validated fields
    pub fn into_book(self, id: String, now: DateTime<Utc>) -> Book {
        Book {
            id,
            name: self.name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
            finished: self.finished,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite everything but `id` and `inserted_at`
    pub fn apply_to(self, book: &mut Book, now: DateTime<Utc>) {
        book.name = self.name;
        book.year = self.year;
        book.author = self.author;
        book.summary = self.summary;
        book.publisher = self.publisher;
        book.page_count = self.page_count;
        book.read_page = self.read_page;
        book.reading = self.reading;
        book.finished = self.finished;
        book.updated_at = now;
    }
}

/// Book list query parameters
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive pattern matched against the book name
    pub name: Option<String>,
    /// "1" for books being read, "0" for the others
    pub reading: Option<String>,
    /// "1" for finished books, "0" for the others
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build from raw query pairs. The first occurrence of a repeated key
    /// wins and unknown keys are ignored, so decoding never fails.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Decoded list filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        Self {
            name: query.name.filter(|n| !n.is_empty()),
            reading: query.reading.as_deref().and_then(parse_flag),
            finished: query.finished.as_deref().and_then(parse_flag),
        }
    }
}

/// "1" and "0" select; any other value means no filter
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// `data` of a successful create
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookCreated {
    pub book_id: String,
}

/// `data` of a list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<BookShort>,
}

/// `data` of a get
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
}

/// ISO-8601 UTC timestamps with millisecond precision, e.g. `2024-05-01T10:20:30.123Z`
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
