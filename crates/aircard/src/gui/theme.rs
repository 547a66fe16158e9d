use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub card: Srgba<f64>,
    pub hub: Srgba<f64>,
    pub option: Srgba<f64>,
    pub button: Srgba<f64>,
    pub text: Srgba<f64>,
    pub notice: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            card: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.12, 0.12, 0.14, 0.95),
                None,
            ),
            hub: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.2, 0.45, 0.8, 0.9),
                Some(0.9),
            ),
            option: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.3, 0.3, 0.32, 0.85),
                Some(0.25),
            ),
            button: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.25, 0.25, 0.25, 0.6),
                Some(0.15),
            ),
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.95, 0.95, 0.95, 1.0),
                Some(1.0),
            ),
            notice: Self::lookup_color(
                context,
                "error_color",
                Srgba::new(0.9, 0.3, 0.3, 1.0),
                Some(1.0),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.aircard-window {
    border-radius: 12px;
}
.aircard-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
