use itertools::Itertools;
use std::cmp::Ordering;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_HTML: &str = "text/html";

/// One entry of an `Accept` header, e.g. `text/*;q=0.5`.
#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    kind: String,
    subtype: String,
    q: f32,
}

impl MediaRange {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (kind, subtype) = split_media_type(parts.next()?)?;

        let q = parts
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
            .map(|(_, value)| value.trim().parse::<f32>().unwrap_or(0.0).clamp(0.0, 1.0))
            .unwrap_or(1.0);

        Some(Self { kind, subtype, q })
    }

    fn matches(&self, kind: &str, subtype: &str) -> bool {
        (self.kind == "*" || self.kind == kind) && (self.subtype == "*" || self.subtype == subtype)
    }

    fn specificity(&self) -> u8 {
        match (self.kind.as_str(), self.subtype.as_str()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ => 2,
        }
    }
}

fn split_media_type(raw: &str) -> Option<(String, String)> {
    let (kind, subtype) = raw.trim().split_once('/')?;
    let (kind, subtype) = (kind.trim(), subtype.trim());
    if kind.is_empty() || subtype.is_empty() {
        return None;
    }
    Some((kind.to_ascii_lowercase(), subtype.to_ascii_lowercase()))
}

/// Strips parameters from a `Content-Type` value: `application/json; charset=utf-8` -> `application/json`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// How strongly the client asks for one media type, taken from the range that matched it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preference {
    pub q: f32,
    specificity: u8,
    /// Position of the matching range in the `Accept` header.
    position: usize,
}

/// The client's preference for `media_type`, or `None` when it is not acceptable.
/// A missing or blank header accepts everything equally.
pub fn preference(accept: Option<&str>, media_type: &str) -> Option<Preference> {
    let Some(accept) = accept.filter(|value| !value.trim().is_empty()) else {
        return Some(Preference {
            q: 1.0,
            specificity: 0,
            position: 0,
        });
    };
    let (kind, subtype) = split_media_type(media_type)?;

    accept
        .split(',')
        .enumerate()
        .filter_map(|(position, raw)| MediaRange::parse(raw).map(|range| (position, range)))
        .filter(|(_, range)| range.matches(&kind, &subtype))
        .map(|(position, range)| Preference {
            q: range.q,
            specificity: range.specificity(),
            position,
        })
        .max_by(|a, b| {
            a.specificity
                .cmp(&b.specificity)
                .then(a.q.partial_cmp(&b.q).unwrap_or(Ordering::Equal))
                .then(b.position.cmp(&a.position))
        })
        .filter(|preference| preference.q > 0.0)
}

pub fn quality(accept: Option<&str>, media_type: &str) -> f32 {
    preference(accept, media_type).map(|p| p.q).unwrap_or(0.0)
}

pub fn accepts(accept: Option<&str>, media_type: &str) -> bool {
    preference(accept, media_type).is_some()
}

/// Picks the offer the client prefers: highest q, then the more specific
/// matching range, then the range listed first, then the earlier offer.
pub fn negotiate<'a>(accept: Option<&str>, offers: &[&'a str]) -> Option<&'a str> {
    offers
        .iter()
        .enumerate()
        .filter_map(|(index, offer)| preference(accept, offer).map(|p| (index, *offer, p)))
        .sorted_by(|(ia, _, a), (ib, _, b)| {
            b.q.partial_cmp(&a.q)
                .unwrap_or(Ordering::Equal)
                .then(b.specificity.cmp(&a.specificity))
                .then(a.position.cmp(&b.position))
                .then(ia.cmp(ib))
        })
        .map(|(_, offer, _)| offer)
        .next()
}
