use bias_core::Headline;
use serde::{Deserialize, Serialize};

use crate::parse::parse_timestamp;

/// Headline as delivered by the news feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHeadline {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Drop headlines without a title or a parseable timestamp; newest first.
pub fn normalize_headlines(raw: &[RawHeadline]) -> Vec<Headline> {
    let mut headlines: Vec<Headline> = raw
        .iter()
        .filter_map(|r| {
            let title = r.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
            let published_at = r.published_at.as_deref().and_then(parse_timestamp)?;
            Some(Headline {
                published_at,
                title: title.to_string(),
                source: r.source.clone(),
            })
        })
        .collect();
    headlines.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    headlines
}
