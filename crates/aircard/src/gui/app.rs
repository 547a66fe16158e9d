use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::card::{self, AssetStore, CardModel, Timer};
use crate::gui::theme::{self, ThemeColors};
use crate::sys::host::SocketHost;
use cardkit::card::{Card, CardStep, PurifierCard};
use cardkit::config::CardConfig;
use cardkit::registry::ComponentRegistry;
use cardkit::scene::Point;
use cardkit::schedule::Ticket;
use cardkit::StateSnapshot;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

pub struct AppModel {
    pub card: Rc<RefCell<CardModel>>,
    pub assets: Rc<RefCell<AssetStore>>,
    pub registry: ComponentRegistry,
    pub config: Config,
    pub last_state: Option<StateSnapshot>,
    pub visible: bool,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    Click(Point),
    Frame,
    Step(Ticket<CardStep>),
    State(StateSnapshot),
    Config(CardConfig),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::State(states) => AppMsg::State(states),
            AppEvent::Config(config) => AppMsg::Config(config),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn build_card(registry: &ComponentRegistry, config: &CardConfig) -> Box<dyn Card> {
    match registry.create(config.card_type.as_str()) {
        Ok(card) => card,
        Err(e) => {
            log::error!("{}, falling back to the air purifier card", e);
            Box::new(PurifierCard::new())
        }
    }
}

impl AppModel {
    fn arm(timers: Vec<Timer>, sender: &ComponentSender<Self>) {
        for (delay, ticket) in timers {
            let sender = sender.clone();
            glib::timeout_add_local_once(delay, move || sender.input(AppMsg::Step(ticket)));
        }
    }

    /// Rebuilds the card if its type changed, then hands it the configuration
    /// and the last known state.
    fn apply_card_config(&mut self, config: CardConfig) {
        let mut card = self.card.borrow_mut();
        if card.tag() != config.card_type.as_str() {
            log::info!("Switching card to {}", config.card_type);
            card.replace_card(build_card(&self.registry, &config));
            if self.visible {
                card.connect(&*self.assets.borrow());
            }
        }
        card.set_config(config);
        if let Some(state) = &self.last_state {
            card.set_hass(state);
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        ComponentRegistry,
        SocketHost,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Aircard"),
            set_default_size: (model.config.window.width, model.config.window.height),
            #[watch]
            set_visible: model.visible,
            add_css_class: "aircard-window",
            set_resizable: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "aircard-drawing-area",

                add_controller = gtk::GestureClick {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Click(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, registry, host, rx) = init;

        theme::load_css();

        let assets = AssetStore::load(config.assets_dir());
        let mut card = CardModel::new(
            build_card(&registry, &config.card),
            Box::new(host),
        );
        card.set_config(config.card.clone());
        let visible = !config.window.hidden;
        if visible {
            card.connect(&assets);
        }

        let model = AppModel {
            card: Rc::new(RefCell::new(card)),
            assets: Rc::new(RefCell::new(assets)),
            registry,
            config,
            last_state: None,
            visible,
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let card_draw = model.card.clone();
        let assets_draw = model.assets.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let elements = card_draw.borrow().render_list(Instant::now());
                if let Err(e) = card::draw(cr, &elements, &assets_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let card_tick = model.card.clone();
        let sender_tick = sender.clone();
        widgets.drawing_area.add_tick_callback(move |_, _| {
            if card_tick.borrow().is_animating() {
                sender_tick.input(AppMsg::Frame);
            }
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                if !self.visible {
                    self.card.borrow_mut().connect(&*self.assets.borrow());
                }
                self.visible = true;
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                if self.visible {
                    self.card.borrow_mut().disconnect();
                }
                self.visible = false;
            }
            AppMsg::Click(point) => {
                if !self.visible {
                    return;
                }
                let timers = self.card.borrow_mut().click(point, Instant::now());
                Self::arm(timers, &sender);
                self.drawing_area.queue_draw();
            }
            AppMsg::Frame => {
                let timers = self.card.borrow_mut().frame(Instant::now());
                Self::arm(timers, &sender);
                self.drawing_area.queue_draw();
            }
            AppMsg::Step(ticket) => {
                let timers = self.card.borrow_mut().step(ticket, Instant::now());
                Self::arm(timers, &sender);
                self.drawing_area.queue_draw();
            }
            AppMsg::State(states) => {
                log::debug!("State update for {} entities", states.len());
                self.card.borrow_mut().set_hass(&states);
                self.last_state = Some(states);
                self.drawing_area.queue_draw();
            }
            AppMsg::Config(card_config) => {
                self.apply_card_config(card_config.clone());
                self.config.card = card_config;
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    if new_config.assets != self.config.assets {
                        *self.assets.borrow_mut() = AssetStore::load(new_config.assets_dir());
                        if self.visible {
                            self.card.borrow_mut().connect(&*self.assets.borrow());
                        }
                    }
                    self.apply_card_config(new_config.card.clone());
                    self.config = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
