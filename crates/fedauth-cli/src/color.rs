use clap::ValueEnum;

/// When to color output.
#[allow(missing_docs)]
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    No,
    Yes,
    Auto,
}

impl Color {
    /// Resolves [`Color::Auto`] against the terminal fedauth reports to.
    pub fn is_enabled(self) -> bool {
        match self {
            Color::No => false,
            Color::Yes => true,
            Color::Auto => supports_color::on(supports_color::Stream::Stderr).is_some(),
        }
    }
}

/// Installs the error report handler, without colors when they are disabled.
pub fn install_color_eyre(color: Color) -> color_eyre::Result<(), color_eyre::Report> {
    if color.is_enabled() {
        color_eyre::install()
    } else {
        // An empty theme disables error coloring
        color_eyre::config::HookBuilder::new()
            .theme(color_eyre::config::Theme::new())
            .install()
    }
}
