//! Composition of the conjunctive book search filter.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// Optional search parameters. Absent or blank parameters do not constrain
/// the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchCriteria {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
}

/// Column a matcher is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    AuthorName,
    GenreName,
}

impl SearchField {
    fn column(self) -> &'static str {
        match self {
            SearchField::Title => "b.title",
            SearchField::AuthorName => "a.name",
            SearchField::GenreName => "g.name",
        }
    }
}

/// Case-insensitive substring condition on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    pub field: SearchField,
    /// Text the field must contain, as supplied by the caller.
    pub needle: String,
}

impl SearchCriteria {
    pub fn new(title: Option<&str>, author: Option<&str>, genre: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            genre: genre.map(str::to_string),
        }
    }

    /// One matcher per present, non-blank parameter.
    pub fn matchers(&self) -> Vec<Matcher> {
        [
            (SearchField::Title, &self.title),
            (SearchField::AuthorName, &self.author),
            (SearchField::GenreName, &self.genre),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| Matcher {
                    field,
                    needle: v.to_string(),
                })
        })
        .collect()
    }
}

/// Append the criteria to a query whose `WHERE` clause is already open.
///
/// Starts from the universal truth and ANDs one `instr` test per matcher, so
/// wildcard characters in the needle are matched literally. Column and needle
/// are folded by the same SQLite `lower()`, which only folds ASCII letters.
pub fn compose_filter(builder: &mut QueryBuilder<'_, Sqlite>, criteria: &SearchCriteria) {
    builder.push("1 = 1");
    for matcher in criteria.matchers() {
        builder
            .push(" AND instr(lower(")
            .push(matcher.field.column())
            .push("), lower(")
            .push_bind(matcher.needle)
            .push(")) > 0");
    }
}
