use super::assets::{AssetStore, ICON_SIZE};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use cardkit::scene::{Content, Element, ElementId, Shape, Style};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

struct ElementRenderer<'a> {
    element: &'a Element,
    style: &'a Style,
    assets: &'a AssetStore,
}

impl<'a> ElementRenderer<'a> {
    fn new(element: &'a Element, style: &'a Style, assets: &'a AssetStore) -> Self {
        Self {
            element,
            style,
            assets,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.style.opacity <= 0.0 {
            return Ok(());
        }

        cr.save()?;
        cr.push_group();
        self.draw_background(cr, colors)?;
        self.draw_content(cr, colors)?;
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.style.opacity)?;
        cr.restore()
    }

    fn draw_background(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.element.shape != Shape::Circle {
            return Ok(());
        }
        let color = match &self.element.id {
            ElementId::Hub => colors.hub,
            ElementId::Option(_) => colors.option,
            ElementId::Button(_) => colors.button,
            _ => return Ok(()),
        };
        set_color(cr, color);
        cr.arc(
            self.style.center.x,
            self.style.center.y,
            self.style.width / 2.0,
            0.0,
            2.0 * PI,
        );
        cr.fill()
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        match &self.element.content {
            Content::Empty => Ok(()),
            Content::Icon(token) => match self.assets.icon(token) {
                Some(pixbuf) => self.draw_icon(cr, pixbuf),
                None => self.draw_text(cr, token.name(), colors.text, 10.0),
            },
            Content::Image(name) => match self.assets.image(name) {
                Some(pixbuf) => self.draw_image(cr, pixbuf),
                None => Ok(()),
            },
            Content::Text(text) => {
                let color = if self.element.id == ElementId::Notice {
                    colors.notice
                } else {
                    colors.text
                };
                let size = if self.element.id == ElementId::Title {
                    16.0
                } else {
                    12.0
                };
                self.draw_text(cr, text, color, size)
            }
        }
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let icon_scale = self.style.icon_size / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(self.style.center.x - iw / 2.0, self.style.center.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    /// Scales the image to fit its box, keeping the aspect ratio.
    fn draw_image(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
        if pw <= 0.0 || ph <= 0.0 {
            return Ok(());
        }
        let scale = (self.style.width / pw).min(self.style.height / ph);

        cr.save()?;
        cr.translate(
            self.style.center.x - pw * scale / 2.0,
            self.style.center.y - ph * scale / 2.0,
        );
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_text(
        &self,
        cr: &Context,
        text: &str,
        color: Srgba<f64>,
        size: f64,
    ) -> Result<(), cairo::Error> {
        set_color(cr, color);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(size);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(
                self.style.center.x - ext.width() / 2.0,
                self.style.center.y + ext.height() / 2.0,
            );
            cr.show_text(text)?;
        }
        Ok(())
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(
    cr: &Context,
    elements: &[(Element, Style)],
    assets: &AssetStore,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.card);
    cr.paint()?;

    for (element, style) in elements {
        ElementRenderer::new(element, style, assets).draw(cr, colors)?;
    }
    Ok(())
}
