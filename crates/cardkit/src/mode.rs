use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ModeId(String);

crate::impl_string_newtype!(ModeId);

/// Icon reference understood by the renderer, e.g. `pap:sleep_mode`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconToken(String);

crate::impl_string_newtype!(IconToken);

impl IconToken {
    pub const FALLBACK: &'static str = "circle";

    /// The icon name without its set prefix.
    pub fn name(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, name)| name)
    }
}

const ICON_SET: &str = "pap";

/// Preset modes with a dedicated icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum KnownMode {
    Pollution,
    Allergen,
    Bacteria,
    Sleep,
    #[strum(serialize = "speed_1")]
    Speed1,
    #[strum(serialize = "speed_2")]
    Speed2,
    #[strum(serialize = "speed_3")]
    Speed3,
    Turbo,
}

impl KnownMode {
    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Pollution => "purification_only_mode",
            Self::Allergen => "allergen_mode",
            Self::Bacteria => "bacteria_virus_mode",
            Self::Sleep => "sleep_mode",
            Self::Speed1 => "speed_1",
            Self::Speed2 => "speed_2",
            Self::Speed3 => "speed_3",
            Self::Turbo => "fan_speed_button",
        }
    }
}

pub fn icon_for(mode: &ModeId) -> IconToken {
    let name = KnownMode::from_str(mode)
        .map(KnownMode::icon_name)
        .unwrap_or(IconToken::FALLBACK);
    IconToken::new(format!("{ICON_SET}:{name}"))
}

/// Ordered list of the modes a device offers. Each mode appears once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSet(Vec<ModeId>);

impl ModeSet {
    /// Repeated modes are dropped, keeping the first occurrence.
    pub fn new(modes: Vec<ModeId>) -> Self {
        let mut seen = HashSet::new();
        Self(
            modes
                .into_iter()
                .filter(|mode| seen.insert(mode.clone()))
                .collect(),
        )
    }

    pub fn modes(&self) -> &[ModeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Everything except `selected`, in declared order. With no selection
    /// nothing is excluded.
    pub fn options(&self, selected: Option<&ModeId>) -> Vec<ModeId> {
        self.0
            .iter()
            .filter(|mode| Some(*mode) != selected)
            .cloned()
            .collect()
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        Self(
            KnownMode::iter()
                .map(|mode| ModeId::new(mode.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<ModeId>> for ModeSet {
    fn from(modes: Vec<ModeId>) -> Self {
        Self::new(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(names: &[&str]) -> ModeSet {
        ModeSet::new(names.iter().copied().map(ModeId::from).collect())
    }

    #[test]
    fn test_icon_lookup() {
        let cases = vec![
            ("pollution", "pap:purification_only_mode"),
            ("allergen", "pap:allergen_mode"),
            ("bacteria", "pap:bacteria_virus_mode"),
            ("speed_2", "pap:speed_2"),
            ("turbo", "pap:fan_speed_button"),
            ("auto", "pap:circle"),
            ("", "pap:circle"),
        ];

        for (mode, expected) in cases {
            assert_eq!(icon_for(&ModeId::from(mode)).as_str(), expected);
        }
    }

    #[test]
    fn test_icon_name() {
        assert_eq!(icon_for(&ModeId::from("sleep")).name(), "sleep_mode");
        assert_eq!(IconToken::from("bare").name(), "bare");
    }

    #[test]
    fn test_default_mode_set() {
        let set = ModeSet::default();
        assert_eq!(set.len(), 8);
        assert_eq!(set.modes()[0].as_str(), "pollution");
        assert_eq!(set.modes()[4].as_str(), "speed_1");
        assert_eq!(set.modes()[7].as_str(), "turbo");
    }

    #[test]
    fn test_options_exclude_selected() {
        let set = modes(&["pollution", "allergen", "bacteria"]);
        let selected = ModeId::from("allergen");

        assert_eq!(
            set.options(Some(&selected)),
            vec![ModeId::from("pollution"), ModeId::from("bacteria")]
        );
        assert_eq!(set.options(None).len(), 3);
        assert_eq!(set.options(Some(&ModeId::from("turbo"))).len(), 3);
    }

    #[test]
    fn test_repeated_modes_dropped() {
        let set = modes(&["sleep", "sleep", "turbo", "sleep"]);
        assert_eq!(set, modes(&["sleep", "turbo"]));
        assert_eq!(
            ModeSet::from(vec![ModeId::from("turbo"), ModeId::from("turbo")]).len(),
            1
        );
    }
}
