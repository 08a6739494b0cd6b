//! Coarse file categories.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Category a file is sorted into.
///
/// The declaration order is the order categories appear in reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Documents,
    Code,
    Audio,
    Images,
    Config,
    LivingScrolls,
    FortProjects,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_are_snake_case() {
        assert_eq!(Category::LivingScrolls.to_string(), "living_scrolls");
        assert_eq!(Category::FortProjects.as_ref(), "fort_projects");
        assert_eq!(Category::from_str("images").unwrap(), Category::Images);
    }

    #[test]
    fn test_closed_set() {
        assert_eq!(Category::iter().count(), 8);
        assert_eq!(Category::iter().last(), Some(Category::Other));
    }
}
