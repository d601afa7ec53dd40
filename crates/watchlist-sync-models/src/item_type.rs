use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog item kind. The catalog assigns movie and TV identifiers from
/// independent sequences, so an item is only unique as (id, type).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Movie,
    Tv,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Movie => "movie",
            ItemType::Tv => "tv",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(ItemType::Movie),
            "tv" => Ok(ItemType::Tv),
            other => Err(format!("Invalid item type: {}. Use 'movie' or 'tv'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_wire_form() {
        assert_eq!(serde_json::to_string(&ItemType::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&ItemType::Tv).unwrap(), "\"tv\"");
        assert_eq!(serde_json::from_str::<ItemType>("\"tv\"").unwrap(), ItemType::Tv);
    }

    #[test]
    fn test_item_type_from_str() {
        assert_eq!("movie".parse::<ItemType>().unwrap(), ItemType::Movie);
        assert_eq!("TV".parse::<ItemType>().unwrap(), ItemType::Tv);
        assert!("episode".parse::<ItemType>().is_err());
    }
}
