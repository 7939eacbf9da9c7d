use clap::ValueEnum;
use crossterm::style::Color;

/// Colour theme for progress output and the final grid
#[derive(Debug, Clone)]
pub struct Theme {
    /// Grid border color
    pub border: Color,
    /// Given (puzzle) cell color
    pub given: Color,
    /// Evolved cell color while a run is still unsolved
    pub evolved: Color,
    /// Cell clashing with another in its column or block
    pub conflict: Color,
    /// Solved grid and success messages
    pub success: Color,
    /// Exhausted runs and warnings
    pub error: Color,
    /// Progress line text color
    pub info: Color,
    /// Highlighted numbers in progress lines
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            border: Color::Rgb { r: 130, g: 140, b: 170 },
            given: Color::Rgb { r: 255, g: 255, b: 255 },
            evolved: Color::Rgb { r: 80, g: 180, b: 255 },
            conflict: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            border: Color::Rgb { r: 60, g: 60, b: 80 },
            given: Color::Rgb { r: 0, g: 0, b: 0 },
            evolved: Color::Rgb { r: 30, g: 100, b: 200 },
            conflict: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// Terminal default colours everywhere
    pub fn plain() -> Self {
        Self {
            border: Color::Reset,
            given: Color::Reset,
            evolved: Color::Reset,
            conflict: Color::Reset,
            success: Color::Reset,
            error: Color::Reset,
            info: Color::Reset,
            key: Color::Reset,
        }
    }
}

/// Theme choices on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Plain,
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
            ThemeName::Plain => Theme::plain(),
        }
    }
}
