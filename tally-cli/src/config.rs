use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputSection,
    pub classifier: ClassifierSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSection {
    /// Directory scanned for statement documents.
    pub dir: PathBuf,
    /// Ledger store path.
    pub ledger: PathBuf,
    /// Rename ingested files with the `-read` suffix.
    pub mark_read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSection {
    pub model: String,
    pub base_url: String,
    /// Falls back to the GROQ_API_KEY environment variable when unset.
    pub api_key: Option<String>,
    pub batch_size: usize,
    pub inter_call_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputSection {
                dir: PathBuf::from("client_docs"),
                ledger: PathBuf::from("ledger.json"),
                mark_read: true,
            },
            classifier: ClassifierSection {
                model: tally_classify::service::DEFAULT_MODEL.to_string(),
                base_url: tally_classify::service::DEFAULT_BASE_URL.to_string(),
                api_key: None,
                batch_size: tally_classify::DEFAULT_BATCH_SIZE,
                inter_call_delay_ms: tally_classify::DEFAULT_INTER_CALL_DELAY_MS,
                timeout_secs: tally_classify::service::DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

pub fn tally_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

pub fn ensure_tally_home() -> Result<PathBuf> {
    let dir = tally_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    ensure_tally_home()?;
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.classifier.batch_size, cfg.classifier.batch_size);
        assert_eq!(back.input.dir, cfg.input.dir);
        assert!(back.classifier.api_key.is_none());
    }
}
