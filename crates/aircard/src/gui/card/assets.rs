use cardkit::mode::{IconToken, KnownMode};
use cardkit::card::purifier::DEVICE_ASSET;
use cardkit::panel::{COVER_CLOSED_ASSET, Overlay};
use cardkit::scene::{AssetName, ElementId, Surface};
use gdk_pixbuf::Pixbuf;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub const ICON_SIZE: i32 = 128;

/// Images loaded from the assets directory, keyed by file name. Icons live
/// under `icons/` and are keyed by icon name.
#[derive(Default)]
pub struct AssetStore {
    root: Option<PathBuf>,
    images: HashMap<AssetName, Pixbuf>,
    icons: HashMap<String, Pixbuf>,
}

impl AssetStore {
    pub fn load(root: Option<PathBuf>) -> Self {
        let Some(root) = root else {
            log::warn!("No assets directory, images will not be drawn");
            return Self::default();
        };

        let names = [DEVICE_ASSET, COVER_CLOSED_ASSET]
            .into_iter()
            .map(AssetName::from)
            .chain(Overlay::iter().map(Overlay::asset));
        let images = names
            .filter_map(|name| load_image(&root.join(name.as_str())).map(|p| (name, p)))
            .collect();

        let icon_names = KnownMode::iter()
            .map(KnownMode::icon_name)
            .chain(std::iter::once(IconToken::FALLBACK));
        let icons = icon_names
            .filter_map(|name| {
                let path = root.join("icons").join(format!("{name}.svg"));
                load_icon(&path).map(|p| (name.to_string(), p))
            })
            .collect();

        Self {
            root: Some(root),
            images,
            icons,
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn image(&self, name: &AssetName) -> Option<&Pixbuf> {
        self.images.get(name)
    }

    pub fn icon(&self, token: &IconToken) -> Option<&Pixbuf> {
        self.icons
            .get(token.name())
            .or_else(|| self.icons.get(IconToken::FALLBACK))
    }
}

impl Surface for AssetStore {
    fn contains(&self, id: &ElementId) -> bool {
        match id {
            ElementId::DeviceImage => self.images.contains_key(&AssetName::from(DEVICE_ASSET)),
            ElementId::CoverClosed => self.images.contains_key(&AssetName::from(COVER_CLOSED_ASSET)),
            ElementId::Overlay(overlay) => self.images.contains_key(&overlay.asset()),
            _ => true,
        }
    }
}

fn load_image(path: &Path) -> Option<Pixbuf> {
    Pixbuf::from_file(path)
        .map_err(|e| log::warn!("Failed to load image {}: {}", path.display(), e))
        .ok()
}

fn load_icon(path: &Path) -> Option<Pixbuf> {
    Pixbuf::from_file_at_size(path, ICON_SIZE, ICON_SIZE)
        .map_err(|e| log::debug!("No icon at {}: {}", path.display(), e))
        .ok()
}
