//! Built-in level catalog
//!
//! Levels ship as JSON embedded in the binary, in play order.

use crate::sim::level::{LevelDescriptor, LoadError};

const BUILTIN: &[(&str, &str)] = &[
    ("intro", include_str!("../levels/intro.json")),
    ("crossroads", include_str!("../levels/crossroads.json")),
    ("switchback", include_str!("../levels/switchback.json")),
];

/// Catalog keys in play order
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN.iter().map(|&(key, _)| key)
}

pub fn first() -> &'static str {
    BUILTIN[0].0
}

/// Key of the level that follows `key`, if any
pub fn next_after(key: &str) -> Option<&'static str> {
    let index = BUILTIN.iter().position(|&(k, _)| k == key)?;
    BUILTIN.get(index + 1).map(|&(k, _)| k)
}

/// Parse a built-in level. Unnamed levels take their catalog key as name.
pub fn builtin(key: &str) -> Result<LevelDescriptor, LoadError> {
    let (_, json) = BUILTIN
        .iter()
        .find(|&&(k, _)| k == key)
        .ok_or_else(|| LoadError::UnknownLevel(key.to_string()))?;
    let mut desc = LevelDescriptor::from_json(json)?;
    if desc.name.is_empty() {
        desc.name = key.to_string();
    }
    Ok(desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_HEIGHT, MAX_WIDTH};
    use crate::sim::LevelState;

    #[test]
    fn test_all_builtins_load() {
        for key in names() {
            let desc = builtin(key).unwrap();
            assert!(!desc.name.is_empty());
            assert!(desc.width() <= MAX_WIDTH, "{key} too wide");
            assert!(desc.height() <= MAX_HEIGHT, "{key} too tall");
            let state = LevelState::load(&desc).unwrap();
            assert!(
                state.anchors().any(|(_, a)| a.kind == crate::sim::AnchorKind::Exit),
                "{key} has no exit"
            );
        }
    }

    #[test]
    fn test_catalog_order() {
        assert_eq!(first(), "intro");
        assert_eq!(next_after("intro"), Some("crossroads"));
        assert_eq!(next_after("switchback"), None);
        assert_eq!(next_after("missing"), None);
    }

    #[test]
    fn test_unknown_level() {
        assert!(matches!(
            builtin("nope"),
            Err(LoadError::UnknownLevel(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_crossroads_extras() {
        let state = LevelState::load(&builtin("crossroads").unwrap()).unwrap();
        assert_eq!(state.wands().len(), 4);
        assert_eq!(state.walls.len(), 2);
        let points: u32 = state.anchors().map(|(_, a)| a.points).sum();
        assert_eq!(points, 3000);
    }
}
