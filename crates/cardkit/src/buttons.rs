use crate::error::CardError;
use crate::host::{ScriptId, ServiceCall};
use crate::scene::Point;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// Buttons of the tower fan panel. Each one is bound to its script by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum ButtonAction {
    PowerToggle,
    RotationToggle,
    ModeToggle,
    FanIncrease,
    FanDecrease,
    Timer,
    LockToggle,
}

impl ButtonAction {
    /// Configuration key holding the script for this button.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::PowerToggle => "power_script_id",
            Self::RotationToggle => "rotation_script_id",
            Self::ModeToggle => "mode_script_id",
            Self::FanIncrease => "increase_speed_script_id",
            Self::FanDecrease => "decrease_speed_script_id",
            Self::Timer => "timer_script_id",
            Self::LockToggle => "lock_script_id",
        }
    }

    /// Button center and diameter on the panel.
    pub fn placement(self) -> (Point, f64) {
        match self {
            Self::RotationToggle => (Point::new(60.0, 50.0), 40.0),
            Self::PowerToggle => (Point::new(240.0, 50.0), 40.0),
            Self::ModeToggle => (Point::new(150.0, 100.0), 40.0),
            Self::FanIncrease => (Point::new(210.0, 160.0), 40.0),
            Self::Timer => (Point::new(150.0, 220.0), 40.0),
            Self::FanDecrease => (Point::new(90.0, 160.0), 40.0),
            Self::LockToggle => (Point::new(150.0, 160.0), 64.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PowerToggle => "power",
            Self::RotationToggle => "swing",
            Self::ModeToggle => "mode",
            Self::FanIncrease => "+",
            Self::FanDecrease => "-",
            Self::Timer => "timer",
            Self::LockToggle => "lock",
        }
    }
}

/// Script per button, read from the `*_script_id` keys of the card config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default, rename = "power_script_id", alias = "power")]
    pub power: Option<ScriptId>,
    #[serde(default, rename = "rotation_script_id", alias = "rotation")]
    pub rotation: Option<ScriptId>,
    #[serde(default, rename = "mode_script_id", alias = "mode")]
    pub mode: Option<ScriptId>,
    #[serde(default, rename = "increase_speed_script_id", alias = "increase_speed")]
    pub increase_speed: Option<ScriptId>,
    #[serde(default, rename = "decrease_speed_script_id", alias = "decrease_speed")]
    pub decrease_speed: Option<ScriptId>,
    #[serde(default, rename = "timer_script_id", alias = "timer")]
    pub timer: Option<ScriptId>,
    #[serde(default, rename = "lock_script_id", alias = "lock")]
    pub lock: Option<ScriptId>,
}

impl ScriptConfig {
    pub fn script_for(&self, action: ButtonAction) -> Option<&ScriptId> {
        match action {
            ButtonAction::PowerToggle => self.power.as_ref(),
            ButtonAction::RotationToggle => self.rotation.as_ref(),
            ButtonAction::ModeToggle => self.mode.as_ref(),
            ButtonAction::FanIncrease => self.increase_speed.as_ref(),
            ButtonAction::FanDecrease => self.decrease_speed.as_ref(),
            ButtonAction::Timer => self.timer.as_ref(),
            ButtonAction::LockToggle => self.lock.as_ref(),
        }
    }

    /// Buttons that have no script and will do nothing when pressed.
    pub fn unbound(&self) -> Vec<ButtonAction> {
        ButtonAction::iter()
            .filter(|action| self.script_for(*action).is_none())
            .collect()
    }

    pub fn press(&self, action: ButtonAction) -> Result<ServiceCall, CardError> {
        self.script_for(action)
            .map(ServiceCall::run_script)
            .ok_or(CardError::Configuration(action.config_key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_script_config_accepts_both_key_styles() {
        let config: ScriptConfig = serde_json::from_value(json!({
            "power_script_id": "fan_power",
            "rotation": "fan_rotate",
            "timer_script_id": "fan_timer",
        }))
        .unwrap();

        assert_eq!(config.power, Some(ScriptId::from("fan_power")));
        assert_eq!(config.rotation, Some(ScriptId::from("fan_rotate")));
        assert_eq!(config.timer, Some(ScriptId::from("fan_timer")));
        assert_eq!(
            config.unbound(),
            vec![
                ButtonAction::ModeToggle,
                ButtonAction::FanIncrease,
                ButtonAction::FanDecrease,
                ButtonAction::LockToggle,
            ]
        );
    }

    #[test]
    fn test_press_binds_by_name() {
        let config = ScriptConfig {
            timer: Some(ScriptId::from("fan_timer")),
            decrease_speed: Some(ScriptId::from("fan_slower")),
            ..Default::default()
        };

        let call = config.press(ButtonAction::Timer).unwrap();
        assert_eq!(call.data, json!({ "entity_id": "script.fan_timer" }));
        let call = config.press(ButtonAction::FanDecrease).unwrap();
        assert_eq!(call.data, json!({ "entity_id": "script.fan_slower" }));

        let err = config.press(ButtonAction::LockToggle).unwrap_err();
        assert!(matches!(err, CardError::Configuration("lock_script_id")));
    }

    #[test]
    fn test_action_ids() {
        assert_eq!(ButtonAction::FanDecrease.to_string(), "fan-decrease");
        assert_eq!(
            "lock-toggle".parse::<ButtonAction>().unwrap(),
            ButtonAction::LockToggle
        );
    }
}
