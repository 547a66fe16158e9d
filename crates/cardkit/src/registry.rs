use crate::card::{Card, ModeSelectorCard, PurifierCard, TowerFanCard};
use crate::config::{AIR_PURIFIER_CARD, CardTag, MODE_SELECTOR_CARD, TOWER_FAN_CARD, TagError};
use std::collections::HashMap;
use thiserror::Error;

pub type CardFactory = fn() -> Box<dyn Card>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Card '{0}' is already defined")]
    AlreadyDefined(CardTag),
    #[error("No card defined for '{0}'")]
    Unknown(String),
    #[error(transparent)]
    InvalidTag(#[from] TagError),
}

/// Maps custom card tags to the factories that build them.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: HashMap<CardTag, CardFactory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the air purifier, mode selector and tower fan cards.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin: [(&str, CardFactory); 3] = [
            (AIR_PURIFIER_CARD, || Box::new(PurifierCard::new())),
            (MODE_SELECTOR_CARD, || Box::new(ModeSelectorCard::new())),
            (TOWER_FAN_CARD, || Box::new(TowerFanCard::new())),
        ];
        for (tag, factory) in builtin {
            if let Err(e) = registry.define(tag, factory) {
                log::error!("Failed to register built-in card: {}", e);
            }
        }
        registry
    }

    pub fn define(&mut self, tag: &str, factory: CardFactory) -> Result<(), RegistryError> {
        let tag: CardTag = tag.parse()?;
        if self.factories.contains_key(&tag) {
            return Err(RegistryError::AlreadyDefined(tag));
        }
        log::debug!("Registered card '{}'", tag);
        self.factories.insert(tag, factory);
        Ok(())
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        tag.parse::<CardTag>()
            .is_ok_and(|tag| self.factories.contains_key(&tag))
    }

    pub fn create(&self, tag: &str) -> Result<Box<dyn Card>, RegistryError> {
        let parsed: CardTag = tag.parse()?;
        self.factories
            .get(&parsed)
            .map(|factory| factory())
            .ok_or_else(|| RegistryError::Unknown(tag.to_string()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &CardTag> {
        self.factories.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_cards() {
        let registry = ComponentRegistry::with_builtin();
        assert_eq!(registry.tags().count(), 3);

        for tag in [AIR_PURIFIER_CARD, MODE_SELECTOR_CARD, TOWER_FAN_CARD] {
            let card = registry.create(tag).unwrap();
            assert_eq!(card.tag(), tag);
            assert_eq!(card.card_size(), 5);
        }
    }

    #[test]
    fn test_define_rejects_duplicates_and_bad_tags() {
        let mut registry = ComponentRegistry::with_builtin();
        let err = registry
            .define(TOWER_FAN_CARD, || Box::new(TowerFanCard::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyDefined(_)));

        let err = registry
            .define("towerfan", || Box::new(TowerFanCard::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTag(TagError::NoHyphen(_))));

        registry
            .define("desk-fan-card", || Box::new(TowerFanCard::new()))
            .unwrap();
        assert!(registry.is_defined("desk-fan-card"));
    }

    #[test]
    fn test_unknown_tag() {
        let registry = ComponentRegistry::new();
        assert!(matches!(
            registry.create("air-purifier-card"),
            Err(RegistryError::Unknown(_))
        ));
        assert!(!registry.is_defined("air-purifier-card"));

        let registry = ComponentRegistry::with_builtin();
        assert!(registry.is_defined(TOWER_FAN_CARD));
        assert!(!registry.is_defined("Tower-Fan"));
        assert!(matches!(
            registry.create("purifier"),
            Err(RegistryError::InvalidTag(TagError::NoHyphen(_)))
        ));
    }
}
