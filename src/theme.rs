use serde::{Deserialize, Serialize};

use crate::highlights::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub panel: Rgb,
    pub card: Rgb,
    pub border: Rgb,
    pub secondary_text: Rgb,
    pub accent: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
}

const ACCENT: Rgb = Rgb::new(74, 85, 162);
const SUCCESS: Rgb = Rgb::new(40, 167, 69);
const WARNING: Rgb = Rgb::new(255, 193, 7);

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Rgb::new(255, 255, 255),
        foreground: Rgb::new(33, 37, 41),
        panel: Rgb::new(248, 249, 250),
        card: Rgb::new(255, 255, 255),
        border: Rgb::new(222, 226, 230),
        secondary_text: Rgb::new(108, 117, 125),
        accent: ACCENT,
        success: SUCCESS,
        warning: WARNING,
    };

    pub const DARK: Palette = Palette {
        background: Rgb::new(33, 37, 41),
        foreground: Rgb::new(248, 249, 250),
        panel: Rgb::new(45, 52, 54),
        card: Rgb::new(52, 58, 64),
        border: Rgb::new(73, 80, 87),
        secondary_text: Rgb::new(173, 181, 189),
        accent: ACCENT,
        success: SUCCESS,
        warning: WARNING,
    };

    pub fn for_mode(mode: ThemeMode) -> &'static Palette {
        match mode {
            ThemeMode::Light => &Palette::LIGHT,
            ThemeMode::Dark => &Palette::DARK,
        }
    }
}

/// Something that can re-color itself when the theme changes.
pub trait ThemeRefreshable {
    fn refresh_theme(&mut self, palette: &Palette);
}

/// A view-level element. Most components have nothing to refresh; the ones
/// that do return themselves from `as_theme_refreshable`.
pub trait Component {
    fn name(&self) -> &str;

    fn as_theme_refreshable(&mut self) -> Option<&mut dyn ThemeRefreshable> {
        None
    }
}

#[derive(Debug, Default)]
pub struct ThemeService {
    mode: ThemeMode,
}

impl ThemeService {
    pub fn new(dark_mode: bool) -> Self {
        let mut service = Self::default();
        service.set_dark_mode(dark_mode);
        service
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    /// Flips between light and dark, returning the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.mode
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.mode = if dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
    }

    pub fn palette(&self) -> &'static Palette {
        Palette::for_mode(self.mode)
    }

    /// Pushes the current palette to every component that opts in. Returns the
    /// number of components refreshed.
    pub fn apply(&self, components: &mut [Box<dyn Component>]) -> usize {
        let palette = self.palette();
        let mut refreshed = 0;
        for component in components.iter_mut() {
            if let Some(target) = component.as_theme_refreshable() {
                target.refresh_theme(palette);
                refreshed += 1;
            }
        }
        refreshed
    }
}
