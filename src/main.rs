//! notiview - terminal notification panel

use clap::Parser;
use notiview::model::AppError;
use notiview::services::StaticTheme;
use notiview::view::{ColorConfig, ViewOptions};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Browse JSONL notifications in a virtualized terminal list
#[derive(Parser, Debug)]
#[command(name = "notiview")]
#[command(version)]
#[command(about = "Browse JSONL notifications in a virtualized terminal list")]
pub struct Args {
    /// Path to a JSONL notification file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_parser = StaticTheme::NAMES)]
    pub theme: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → config file → env vars → CLI args
    let config = {
        let config_file = notiview::config::load_config_with_precedence(args.config.clone())?;
        let merged = notiview::config::merge_config(config_file);
        let with_env = notiview::config::apply_env_overrides(merged);
        notiview::config::apply_cli_overrides(with_env, args.theme.clone())
    };

    notiview::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let key_bindings = config.key_bindings()?;
    let input_source = notiview::source::detect_input_source(args.file.clone())?;
    let theme = Rc::new(StaticTheme::named(&config.theme));
    let options = ViewOptions {
        cell_width_px: config.cell_width_px,
        max_idle_templates: config.max_idle_templates,
        colors: ColorConfig::from_env_and_args(args.no_color),
    };

    notiview::view::run_with_source(input_source, key_bindings, theme, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["notiview", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["notiview", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["notiview"]);
        assert_eq!(args.file, None);
        assert_eq!(args.config, None);
        assert_eq!(args.theme, None);
        assert!(!args.no_color);
    }

    #[test]
    fn test_file_path_populates_file_field() {
        let args = Args::parse_from(["notiview", "notes.jsonl"]);
        assert_eq!(args.file, Some(PathBuf::from("notes.jsonl")));
    }

    #[test]
    fn test_theme_accepts_known_names() {
        let args = Args::parse_from(["notiview", "--theme", "high-contrast"]);
        assert_eq!(args.theme.as_deref(), Some("high-contrast"));
    }

    #[test]
    fn test_theme_rejects_unknown_names() {
        let err = Args::try_parse_from(["notiview", "--theme", "solarized"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_config_and_no_color_flags() {
        let args = Args::parse_from(["notiview", "--config", "/tmp/n.toml", "--no-color"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/n.toml")));
        assert!(args.no_color);
    }
}
