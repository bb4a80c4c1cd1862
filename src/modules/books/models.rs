use std::{fmt, str::FromStr};

use garde::Validate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;

use crate::modules::{authors::models::Author, genres::models::Genre};
use crate::utils::not_blank;

/// Monetary amount with exactly two fractional digits, held as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    /// Largest accepted price, 999 999 999 999.99. JSON carries prices as
    /// binary floats, which keep every cent exact well past this bound.
    pub const MAX: Price = Price(99_999_999_999_999);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("invalid price '{0}'")]
    Malformed(String),
    #[error("price '{0}' has more than two fractional digits")]
    TooPrecise(String),
    #[error("price '{0}' is out of range")]
    OutOfRange(String),
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value.strip_prefix('+').unwrap_or(value)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return Err(PriceError::Malformed(raw.to_string()));
        }
        if fraction.len() > 2 {
            return Err(PriceError::TooPrecise(raw.to_string()));
        }

        let out_of_range = || PriceError::OutOfRange(raw.to_string());
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let fraction: i64 = format!("{fraction:0<2}").parse().map_err(|_| out_of_range())?;

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(out_of_range)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount with at most two fractional digits")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                v.checked_mul(100)
                    .map(Price)
                    .ok_or_else(|| E::custom(PriceError::OutOfRange(v.to_string())))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom(PriceError::OutOfRange(v.to_string())))
                    .and_then(|v| self.visit_i64(v))
            }

            // Shortest round-trip formatting recovers the literal digits, so
            // 19.99 is parsed as "19.99" rather than 19.989999...
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                if !v.is_finite() {
                    return Err(E::custom(PriceError::Malformed(v.to_string())));
                }
                v.to_string().parse().map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// `garde` rule: price must be strictly positive and at most [`Price::MAX`].
pub fn price_in_range(value: &Price, _ctx: &()) -> garde::Result {
    if !value.is_positive() {
        return Err(garde::Error::new("must be positive"));
    }
    if *value > Price::MAX {
        return Err(garde::Error::new(format!("must be at most {}", Price::MAX)));
    }
    Ok(())
}

/// Reference to an existing author or genre by id. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(default)]
    pub id: Option<i64>,
}

impl EntityRef {
    pub fn id(id: i64) -> Self {
        Self { id: Some(id) }
    }
}

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookDraft {
    #[serde(default)]
    #[garde(custom(not_blank))]
    pub title: String,
    #[serde(default)]
    #[garde(custom(price_in_range))]
    pub price: Price,
    #[serde(default)]
    #[garde(range(min = 0))]
    pub quantity: i32,
    #[garde(required)]
    pub author: Option<EntityRef>,
    #[garde(required)]
    pub genre: Option<EntityRef>,
}

/// A book with its author and genre fully loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub price: Price,
    pub quantity: i32,
    pub author: Author,
    pub genre: Genre,
}

/// Flat row produced by joining books with authors and genres.
#[derive(Debug, FromRow)]
pub(crate) struct BookRow {
    id: i64,
    title: String,
    price_cents: i64,
    quantity: i32,
    author_id: i64,
    author_name: String,
    genre_id: i64,
    genre_name: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            price: Price::from_cents(row.price_cents),
            quantity: row.quantity,
            author: Author {
                id: Some(row.author_id),
                name: row.author_name,
            },
            genre: Genre {
                id: Some(row.genre_id),
                name: row.genre_name,
            },
        }
    }
}
