//! `paintquest tags`: the suggested tag vocabularies.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::tags::{
    PAINT_BRAND_TAGS, PAINT_MEDIUM_TAGS, PROFILE_FOCUS_SKILLS, SKILL_TAGS, TOOL_TAGS,
};

/// Print a tag vocabulary
#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Vocabulary to print
    #[arg(value_enum)]
    pub vocabulary: Vocabulary,
}

/// Known tag vocabularies
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// Tool tags
    Tools,
    /// Skill tags
    Skills,
    /// Paint brands
    Brands,
    /// Paint media
    Media,
    /// Skills offered as profile focus
    Focus,
}

impl Vocabulary {
    /// The tags in this vocabulary.
    pub const fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Tools => TOOL_TAGS,
            Self::Skills => SKILL_TAGS,
            Self::Brands => PAINT_BRAND_TAGS,
            Self::Media => PAINT_MEDIUM_TAGS,
            Self::Focus => PROFILE_FOCUS_SKILLS,
        }
    }
}

/// A printed vocabulary.
#[derive(Debug, Serialize)]
pub struct TagList {
    /// Tags in vocabulary order.
    pub tags: Vec<&'static str>,
}

impl CommandOutput for TagList {
    fn to_human(&self) -> String {
        self.tags.join("\n")
    }
}

/// Print one vocabulary.
pub async fn execute(args: TagsArgs, json_mode: bool) -> Result<()> {
    output(
        &TagList {
            tags: args.vocabulary.tags().to_vec(),
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_are_distinct_lists() {
        assert!(Vocabulary::Tools.tags().contains(&"airbrush"));
        assert!(Vocabulary::Brands.tags().contains(&"Citadel"));
        assert!(Vocabulary::Focus.tags().contains(&"Glazing"));
        assert_ne!(Vocabulary::Skills.tags(), Vocabulary::Media.tags());
    }

    #[test]
    fn test_human_output_one_per_line() {
        let list = TagList {
            tags: Vocabulary::Media.tags()[..2].to_vec(),
        };
        assert_eq!(list.to_human(), "Artist Acrylic\nAcrylic");
    }
}
