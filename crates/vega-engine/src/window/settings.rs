/// Window configuration consumed once at startup.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub fullscreen: bool,

    /// Convenience shutdown path for demos and tools.
    pub quit_on_escape: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Vega Window".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            fullscreen: false,
            quit_on_escape: false,
        }
    }
}

impl WindowSettings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_quit_on_escape(mut self, quit_on_escape: bool) -> Self {
        self.quit_on_escape = quit_on_escape;
        self
    }
}
