//! Tag vocabularies and normalization.
//!
//! Every entity that stores a tag set goes through [`normalize_tags`], so a
//! comma-separated string and a JSON list are interchangeable at the
//! boundary.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Tool vocabulary.
pub const TOOL_TAGS: &[&str] = &[
    "round brush",
    "flat brush",
    "highlight brush",
    "detail brush",
    "drybrush",
    "airbrush",
];

/// Skill vocabulary.
pub const SKILL_TAGS: &[&str] = &[
    "airbrushing",
    "basecoating",
    "washing",
    "basing",
    "highlighting",
    "layering",
    "speedpainting",
    "glazing",
    "blending",
    "feathering",
    "drybrushing",
    "weathering",
    "effects",
    "object source lighting",
    "non metallic metal",
];

/// Known paint brands.
pub const PAINT_BRAND_TAGS: &[&str] = &[
    "AK",
    "Army Painter",
    "Citadel",
    "Pro Acryl",
    "Vallejo",
    "P3",
    "Scale75",
    "Two Thin Coats",
    "CuttleFish Colors",
    "Golden",
    "Mindwork",
    "Daler-Rowney FW",
    "Windsor and Newton",
    "Castle",
];

/// Known paint media.
pub const PAINT_MEDIUM_TAGS: &[&str] = &[
    "Artist Acrylic",
    "Acrylic",
    "Oil",
    "Speed/Contrast",
    "Wash",
    "Ink",
    "Glaze",
    "Texture",
];

/// Skills offered as profile focus choices.
pub const PROFILE_FOCUS_SKILLS: &[&str] = &[
    "Basing",
    "Basecoating",
    "Drybrushing",
    "Glazing",
    "Freehand",
    "Layering",
    "Slapchop",
    "Underpainting",
    "Washing",
    "Wetblending",
];

/// Normalize a loosely-typed tag value.
///
/// Strings are split on commas, trimmed, and empty parts dropped. Lists map
/// each element to its string form. Anything else yields no tags.
pub fn normalize_tags(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_tags(s),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Comma-separated form of [`normalize_tags`].
pub fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim every tag and drop the empty ones.
pub fn tidy_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Serde adapter accepting either tag shape.
pub fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(normalize_tags).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tidy_tags() {
        let tags = vec![" glazing ".to_string(), "   ".to_string(), "basing".to_string()];
        assert_eq!(tidy_tags(tags), vec!["glazing", "basing"]);
    }

    #[test]
    fn test_normalize_comma_string() {
        assert_eq!(
            normalize_tags(&json!(" round brush, ,detail brush ,")),
            vec!["round brush", "detail brush"]
        );
        assert!(normalize_tags(&json!("  ,  ")).is_empty());
    }

    #[test]
    fn test_normalize_list_stringifies() {
        assert_eq!(
            normalize_tags(&json!(["glazing", 3, true])),
            vec!["glazing", "3", "true"]
        );
    }

    #[test]
    fn test_normalize_other_shapes() {
        assert!(normalize_tags(&json!(null)).is_empty());
        assert!(normalize_tags(&json!({"a": 1})).is_empty());
        assert!(normalize_tags(&json!(12)).is_empty());
    }

    #[test]
    fn test_deserialize_either_shape() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_tags")]
            tags: Vec<String>,
        }

        let from_str: Holder = serde_json::from_value(json!({"tags": "a, b"})).unwrap();
        assert_eq!(from_str.tags, vec!["a", "b"]);
        let from_list: Holder = serde_json::from_value(json!({"tags": ["c"]})).unwrap();
        assert_eq!(from_list.tags, vec!["c"]);
        let missing: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(missing.tags.is_empty());
        let null: Holder = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(null.tags.is_empty());
    }

    #[test]
    fn test_vocabularies_are_lowercase_where_matched() {
        assert!(TOOL_TAGS.iter().all(|t| *t == t.to_lowercase()));
        assert!(SKILL_TAGS.iter().all(|t| *t == t.to_lowercase()));
    }
}
