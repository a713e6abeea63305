//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            init_config(path, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", path.display()))
            );
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", path.display());
            if !path.exists() {
                println!("{}", formatter.info("File does not exist yet; defaults are in use"));
            }
            Ok(())
        }
    }
}

/// Write the default configuration to `path`.
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".kizuna").join("config.toml");

        init_config(&path, false).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        assert!(matches!(init_config(&path, false), Err(CliError::InvalidInput(_))));
        init_config(&path, true).unwrap();
        assert!(Config::load_from(&path).unwrap().settings.color);
    }
}
