use aircard::config;
use aircard::gui::app::AppModel;
use aircard::sys::host::SocketHost;
use aircard::sys::runtime;
use cardkit::ComponentRegistry;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    if let Err(e) = config::write_default_config() {
        log::warn!("Could not write default config: {}", e);
    }
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);
    let (calls_tx, calls_rx) = async_channel::bounded(64);

    // Start Background Services
    runtime::start_background_services(tx, calls_rx);

    let app = RelmApp::new("org.aircard.aircard");

    app.run::<AppModel>((
        config,
        ComponentRegistry::with_builtin(),
        SocketHost::new(calls_tx),
        rx,
    ));
}
