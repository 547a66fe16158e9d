use cardkit::StateSnapshot;
use cardkit::config::CardConfig;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    State(StateSnapshot),
    Config(CardConfig),
    ConfigReload,
}
