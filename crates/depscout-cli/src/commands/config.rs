use anyhow::bail;
use depscout_core::Config;
use std::path::Path;

#[derive(clap::Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(path: Option<&Path>, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load(path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let target = match path {
                Some(p) => p.to_path_buf(),
                None => Config::config_path()?,
            };
            if target.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite",
                    target.display()
                );
            }
            let written = Config::default().save(Some(&target))?;
            println!("Wrote {}", written.display());
        }
    }
    Ok(())
}
