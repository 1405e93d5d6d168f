//! # Language Negotiation
//!
//! Picks the response language from `Accept-Language` and localizes error
//! summaries.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Accept-Language: uk-UA, uk;q=0.9, en;q=0.5                             │
//! │        │                                                                │
//! │        ▼  negotiate(header, default)                                    │
//! │   Locale::Uk ──► request extensions (handlers extract `Locale`)         │
//! │        │                                                                │
//! │        ▼  after the handler                                             │
//! │   Content-Language: uk                                                  │
//! │   error body "message" rewritten in Ukrainian                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, CONTENT_LENGTH};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, ErrorInfo};
use crate::AppState;

// =============================================================================
// Locale
// =============================================================================

/// Supported response languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Uk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Uk => "uk",
        }
    }

    /// Matches a language tag by its primary subtag (`uk-UA` → `Uk`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next()?.trim();
        Locale::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(primary))
    }
}

/// Chooses a locale from an `Accept-Language` header.
///
/// Highest q-value wins, ties keep header order, `q=0` excludes a
/// language and `*` stands for the default. Anything unparseable is
/// skipped.
///
/// ## Example
/// ```rust
/// use bistro_api::i18n::{negotiate, Locale};
///
/// assert_eq!(negotiate(Some("uk-UA,uk;q=0.9,en;q=0.8"), Locale::En), Locale::Uk);
/// assert_eq!(negotiate(Some("de, en;q=0.4"), Locale::Uk), Locale::En);
/// assert_eq!(negotiate(None, Locale::Uk), Locale::Uk);
/// ```
pub fn negotiate(header: Option<&str>, default: Locale) -> Locale {
    let Some(header) = header else {
        return default;
    };

    let mut best: Option<(Locale, u16)> = None;
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() {
            continue;
        }

        let mut weight = 1000u16;
        for param in parts {
            if let Some(q) = param.trim().strip_prefix("q=") {
                weight = parse_q(q).unwrap_or(0);
            }
        }
        if weight == 0 {
            continue;
        }

        let locale = if tag == "*" { Some(default) } else { Locale::from_tag(tag) };
        if let Some(locale) = locale {
            if best.map_or(true, |(_, w)| weight > w) {
                best = Some((locale, weight));
            }
        }
    }

    best.map(|(locale, _)| locale).unwrap_or(default)
}

/// q-value in thousandths (`0.8` → 800); `None` when malformed.
fn parse_q(value: &str) -> Option<u16> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: u16 = whole.parse().ok()?;
    if whole > 1 {
        return None;
    }
    let fraction: u16 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<3}").parse().ok()?
    };
    let q = whole * 1000 + fraction;
    (q <= 1000).then_some(q)
}

// =============================================================================
// Messages
// =============================================================================

/// Localized one-line summary for an error code.
pub fn message(code: ErrorCode, locale: Locale) -> &'static str {
    match (code, locale) {
        (ErrorCode::ValidationError, Locale::En) => "The request contains invalid values",
        (ErrorCode::ValidationError, Locale::Uk) => "Запит містить некоректні значення",
        (ErrorCode::BadRequest, Locale::En) => "The request could not be read",
        (ErrorCode::BadRequest, Locale::Uk) => "Не вдалося прочитати запит",
        (ErrorCode::NotFound, Locale::En) => "The requested resource does not exist",
        (ErrorCode::NotFound, Locale::Uk) => "Запитаний ресурс не існує",
        (ErrorCode::Duplicate, Locale::En) => "A record with the same value already exists",
        (ErrorCode::Duplicate, Locale::Uk) => "Запис з таким значенням вже існує",
        (ErrorCode::InvalidReference, Locale::En) => "The request refers to a record that does not exist",
        (ErrorCode::InvalidReference, Locale::Uk) => "Запит посилається на запис, якого не існує",
        (ErrorCode::Conflict, Locale::En) => "The operation is not allowed in the current state",
        (ErrorCode::Conflict, Locale::Uk) => "Операція недоступна в поточному стані",
        (ErrorCode::BusinessRule, Locale::En) => "The operation breaks a business rule",
        (ErrorCode::BusinessRule, Locale::Uk) => "Операція порушує бізнес-правило",
        (ErrorCode::InternalError, Locale::En) => "An internal error occurred",
        (ErrorCode::InternalError, Locale::Uk) => "Сталася внутрішня помилка",
    }
}

// =============================================================================
// Middleware / Extractor
// =============================================================================

/// Negotiates the locale, tags the response, and localizes error bodies.
pub async fn locale_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let locale = negotiate(header, state.settings.i18n.default_locale);
    request.extensions_mut().insert(locale);

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.as_str()));

    let Some(info) = parts.extensions.get::<ErrorInfo>().cloned() else {
        return Response::from_parts(parts, body);
    };

    parts.headers.remove(CONTENT_LENGTH);
    let localized = info.body(message(info.code, locale));
    Response::from_parts(parts, Body::from(localized.to_string()))
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(locale) = parts.extensions.get::<Locale>() {
            return Ok(*locale);
        }
        let header = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(negotiate(header, Locale::default()))
    }
}
