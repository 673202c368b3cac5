//! Table-browsing vocabulary: filter operators, sort order, pagination math,
//! and identifier quoting.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API layer and the database layer. Operators and sort order are strict
//! allow-lists: anything outside them is rejected before a query is built, so
//! free-form request text never reaches SQL as syntax.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of rows per page when the request omits `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// 1-based page number for an offset/limit window.
///
/// Callers must have validated `limit > 0` via [`validate_window`].
pub fn current_page(offset: i64, limit: i64) -> i64 {
    offset / limit + 1
}

/// Total number of pages for `total` records at `limit` per page.
///
/// Callers must have validated `limit > 0` via [`validate_window`].
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// Validate a pagination window.
///
/// `limit` of zero would make the page arithmetic divide by zero and a
/// negative offset has no meaning in `OFFSET ?`, so both are rejected.
pub fn validate_window(limit: i64, offset: i64) -> Result<(), CoreError> {
    if limit <= 0 {
        return Err(CoreError::Validation(format!(
            "limit must be a positive integer, got {limit}"
        )));
    }
    if offset < 0 {
        return Err(CoreError::Validation(format!(
            "offset must not be negative, got {offset}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Filter operators
// ---------------------------------------------------------------------------

/// Comparison operator allowed in a `WHERE` clause.
///
/// `Like` is special-cased everywhere: the bound value is wrapped in `%`
/// wildcards, while every other operator binds the raw search text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
}

impl SearchOperator {
    /// Parse a request-supplied operator string.
    ///
    /// `LIKE` is matched case-insensitively (the original UI sends both
    /// spellings); symbol operators must match exactly.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::Le),
            ">=" => Ok(Self::Ge),
            _ if raw.eq_ignore_ascii_case("LIKE") => Ok(Self::Like),
            _ => Err(CoreError::Validation(format!(
                "unsupported search_operator '{raw}'"
            ))),
        }
    }

    /// SQL text for this operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Like => "LIKE",
        }
    }

    /// The value actually bound for this operator.
    ///
    /// `LIKE` gets substring semantics via `%` wildcards; everything else
    /// binds the text unmodified.
    pub fn bind_value(self, search_text: &str) -> String {
        match self {
            Self::Like => format!("%{search_text}%"),
            _ => search_text.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Sort direction for an `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a request-supplied sort order, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.eq_ignore_ascii_case("ASC") {
            Ok(Self::Asc)
        } else if raw.eq_ignore_ascii_case("DESC") {
            Ok(Self::Desc)
        } else {
            Err(CoreError::Validation(format!(
                "unsupported sort_order '{raw}'"
            )))
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Identifier quoting
// ---------------------------------------------------------------------------

/// Quote an identifier for interpolation into SQL text.
///
/// Identifiers are only ever interpolated after they have been confirmed
/// against the database catalog; quoting on top of that keeps names with
/// spaces or keywords working and doubles any embedded quote.
///
/// # Examples
///
/// ```
/// use framescope_core::browse::quote_ident;
/// assert_eq!(quote_ident("events"), "\"events\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
