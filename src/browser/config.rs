use std::path::PathBuf;

/// Options for launching a Chrome/Chromium instance
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Keep Chrome's sandbox on; containers usually need it off
    pub sandbox: bool,

    pub window_width: u32,

    pub window_height: u32,

    /// Custom browser binary
    pub chrome_path: Option<PathBuf>,

    /// Profile directory; a throwaway one is used when unset
    pub user_data_dir: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            user_data_dir: None,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new()
            .headless(false)
            .sandbox(false)
            .window_size(800, 600)
            .chrome_path("/usr/bin/chromium");

        assert!(!opts.headless);
        assert!(!opts.sandbox);
        assert_eq!(opts.window_width, 800);
        assert_eq!(opts.window_height, 600);
        assert_eq!(opts.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(opts.user_data_dir.is_none());
    }

    #[test]
    fn test_defaults_are_headless() {
        let opts = LaunchOptions::default();
        assert!(opts.headless);
        assert!(opts.sandbox);
    }
}
