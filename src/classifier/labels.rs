use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Whatever identifier a classifier natively emits: a bare class index,
/// or a string token like "LABEL_0", "1" or "HOAX".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLabel {
    Index(usize),
    Text(String),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Index(idx) => write!(f, "{idx}"),
            RawLabel::Text(text) => f.write_str(text),
        }
    }
}

/// The ordered pair of canonical classes one comparison is expressed in,
/// e.g. ["HOAX", "NON-HOAX"]. Strictly two-class; never mixed across domains
/// within a single comparison.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    classes: [String; 2],
}

impl Taxonomy {
    pub fn classes(&self) -> &[String; 2] {
        &self.classes
    }

    /// Position of a canonical label within the pair, if it is a member.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

#[derive(Deserialize)]
struct VocabularyFile {
    classes: [String; 2],
    tokens: HashMap<String, String>,
}

/// Fixed mapping from raw label tokens to the two canonical classes of one
/// domain. Lookup is exact-match on the token's string form; unknown tokens
/// pass through unchanged.
pub struct LabelVocabulary {
    taxonomy: Taxonomy,
    tokens: HashMap<String, String>,
}

impl LabelVocabulary {
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn normalize(&self, raw: &RawLabel) -> String {
        let key = raw.to_string();
        self.tokens.get(&key).cloned().unwrap_or(key)
    }
}

macro_rules! vocab_file {
    ($name:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/vocab/",
            $name,
            ".json"
        ))
    };
}

static HOAX_VOCABULARY: Lazy<LabelVocabulary> =
    Lazy::new(|| load_vocabulary(vocab_file!("hoax")));
static FAKE_REAL_VOCABULARY: Lazy<LabelVocabulary> =
    Lazy::new(|| load_vocabulary(vocab_file!("fake_real")));

pub fn vocabulary(name: &str) -> &'static LabelVocabulary {
    match name {
        "fake_real" => &FAKE_REAL_VOCABULARY,
        _ => &HOAX_VOCABULARY,
    }
}

fn load_vocabulary(raw: &str) -> LabelVocabulary {
    let parsed: VocabularyFile = serde_json::from_str(raw).expect("invalid vocabulary config");
    LabelVocabulary {
        taxonomy: Taxonomy {
            classes: parsed.classes,
        },
        tokens: parsed.tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(classes: [&str; 2], entries: &[(&str, &str)]) -> LabelVocabulary {
        LabelVocabulary {
            taxonomy: Taxonomy {
                classes: [classes[0].to_string(), classes[1].to_string()],
            },
            tokens: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn known_tokens_map_to_their_class() {
        let v = vocabulary("hoax");
        assert_eq!(v.normalize(&RawLabel::Text("LABEL_0".into())), "HOAX");
        assert_eq!(v.normalize(&RawLabel::Text("LABEL_1".into())), "NON-HOAX");
        assert_eq!(v.normalize(&RawLabel::Index(0)), "HOAX");
        assert_eq!(v.normalize(&RawLabel::Index(1)), "NON-HOAX");
        assert_eq!(v.normalize(&RawLabel::Text("0".into())), "HOAX");
    }

    #[test]
    fn index_and_numeric_string_normalize_identically() {
        let v = vocab(["FAKE", "REAL"], &[("0", "FAKE"), ("1", "REAL")]);
        assert_eq!(
            v.normalize(&RawLabel::Index(1)),
            v.normalize(&RawLabel::Text("1".into()))
        );
        assert_eq!(v.normalize(&RawLabel::Index(1)), "REAL");
    }

    #[test]
    fn unknown_tokens_pass_through_as_string_form() {
        let v = vocab(["FAKE", "REAL"], &[]);
        assert_eq!(v.normalize(&RawLabel::Text("UNEXPECTED".into())), "UNEXPECTED");
        assert_eq!(v.normalize(&RawLabel::Index(7)), "7");
    }

    #[test]
    fn canonical_labels_are_idempotent() {
        let v = vocabulary("fake_real");
        assert_eq!(v.normalize(&RawLabel::Text("FAKE".into())), "FAKE");
        assert_eq!(v.normalize(&RawLabel::Text("REAL".into())), "REAL");
        // Pass-through also keeps a canonical label stable with no identity entry.
        let empty = vocab(["FAKE", "REAL"], &[]);
        assert_eq!(empty.normalize(&RawLabel::Text("FAKE".into())), "FAKE");
    }

    #[test]
    fn taxonomy_positions() {
        let v = vocabulary("hoax");
        assert_eq!(v.taxonomy().position("HOAX"), Some(0));
        assert_eq!(v.taxonomy().position("NON-HOAX"), Some(1));
        assert_eq!(v.taxonomy().position("REAL"), None);
    }
}
