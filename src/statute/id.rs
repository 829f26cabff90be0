//! Stable diagram identifiers.
//!
//! A diagram id addresses one paragraph (or item) of an article:
//! `A<article>[_P<paragraph>][_I<item>]`. Branch articles such as
//! "Article 20-3" carry multi-part numbers, joined with `_` (`A20_3_P2`).
//! A `DiagramKey` prefixes the law id: `{lawId}/{articleId}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramId {
    pub article: Vec<String>,
    pub paragraph: Option<String>,
    pub item: Option<String>,
}

impl DiagramId {
    /// Build an id from raw statute numbers. Article parts may already be
    /// `_`-joined ("20_3"); empty paragraph/item numbers are dropped.
    pub fn new(article: &str, paragraph: Option<&str>, item: Option<&str>) -> Self {
        let article = article
            .split('_')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        let keep = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
        DiagramId {
            article,
            paragraph: keep(paragraph),
            item: keep(item),
        }
    }

    pub fn article_num(&self) -> String {
        self.article.join("_")
    }

    /// Human-readable form, joining article parts with a locale connective
    /// (`display_with("の")` renders `20の3`, paragraph and item appended).
    pub fn display_with(&self, connective: &str) -> String {
        let mut out = self.article.join(connective);
        if let Some(p) = &self.paragraph {
            out.push_str(&format!(" ¶{p}"));
        }
        if let Some(i) = &self.item {
            out.push_str(&format!(" ({i})"));
        }
        out
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.article_num())?;
        if let Some(p) = &self.paragraph {
            write!(f, "_P{p}")?;
        }
        if let Some(i) = &self.item {
            write!(f, "_I{i}")?;
        }
        Ok(())
    }
}

impl FromStr for DiagramId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(rest) = s.strip_prefix('A') else {
            return Err(IdError::MissingArticlePrefix(s.to_string()));
        };

        let mut article = Vec::new();
        let mut paragraph = None;
        let mut item = None;
        for part in rest.split('_') {
            let in_article = paragraph.is_none() && item.is_none();
            if let Some(p) = part.strip_prefix('P').filter(|_| in_article) {
                if p.is_empty() {
                    return Err(IdError::EmptySegment {
                        id: s.to_string(),
                        segment: "paragraph",
                    });
                }
                paragraph = Some(p.to_string());
            } else if let Some(i) = part.strip_prefix('I').filter(|_| item.is_none()) {
                if i.is_empty() {
                    return Err(IdError::EmptySegment {
                        id: s.to_string(),
                        segment: "item",
                    });
                }
                item = Some(i.to_string());
            } else if in_article && !part.is_empty() {
                article.push(part.to_string());
            } else {
                return Err(IdError::EmptySegment {
                    id: s.to_string(),
                    segment: "article",
                });
            }
        }

        if article.is_empty() {
            return Err(IdError::EmptyArticle(s.to_string()));
        }
        Ok(DiagramId {
            article,
            paragraph,
            item,
        })
    }
}

impl Serialize for DiagramId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DiagramId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `{lawId}/{articleId}` address of one diagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramKey {
    pub law_id: String,
    pub diagram_id: DiagramId,
}

impl DiagramKey {
    pub fn new(law_id: &str, diagram_id: DiagramId) -> Self {
        DiagramKey {
            law_id: law_id.to_string(),
            diagram_id,
        }
    }
}

impl fmt::Display for DiagramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.law_id, self.diagram_id)
    }
}

impl FromStr for DiagramKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((law_id, article_id)) = s.split_once('/') else {
            return Err(IdError::MalformedKey(s.to_string()));
        };
        if law_id.is_empty() || article_id.contains('/') {
            return Err(IdError::MalformedKey(s.to_string()));
        }
        Ok(DiagramKey {
            law_id: law_id.to_string(),
            diagram_id: article_id.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_paragraph_and_item_ids() {
        let id = DiagramId::new("20_3", Some("2"), None);
        assert_eq!(id.to_string(), "A20_3_P2");

        let id = DiagramId::new("20_3", Some("2"), Some("1"));
        assert_eq!(id.to_string(), "A20_3_P2_I1");
    }

    #[test]
    fn empty_item_is_dropped() {
        let id = DiagramId::new("43", Some("1"), Some(""));
        assert_eq!(id.to_string(), "A43_P1");
    }

    #[test]
    fn parses_back_to_parts() {
        let id: DiagramId = "A20_3_P2_I1".parse().unwrap();
        assert_eq!(id.article, vec!["20", "3"]);
        assert_eq!(id.paragraph.as_deref(), Some("2"));
        assert_eq!(id.item.as_deref(), Some("1"));
        assert_eq!(id.display_with("の"), "20の3 ¶2 (1)");
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(
            "P2".parse::<DiagramId>(),
            Err(IdError::MissingArticlePrefix(_))
        ));
        assert!(matches!(
            "A_P2".parse::<DiagramId>(),
            Err(IdError::EmptySegment { .. })
        ));
        assert!("A".parse::<DiagramId>().is_err());
    }

    #[test]
    fn diagram_key_round_trips() {
        let key: DiagramKey = "325AC0000000201/A20_3_P2".parse().unwrap();
        assert_eq!(key.law_id, "325AC0000000201");
        assert_eq!(key.diagram_id.to_string(), "A20_3_P2");
        assert_eq!(key.to_string(), "325AC0000000201/A20_3_P2");
        assert!("no-slash".parse::<DiagramKey>().is_err());
    }
}
