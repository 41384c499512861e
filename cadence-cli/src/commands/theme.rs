//! Print the theme as CSS.

use crate::config::Config;

/// Run the theme command.
pub fn run(config: &Config) {
    println!("{}", config.theme.to_css());
}
