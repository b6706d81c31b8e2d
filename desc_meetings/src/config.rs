use std::path::Path;
use chrono_tz::Tz;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings for a crawl. Every field has a default, so an absent config file is fine.
#[derive(Deserialize,Debug,Clone)]
#[serde(default)]
pub struct Config {
    /// The public meetings page that links to the schedule PDF and the minutes page.
    pub start_url : String,
    pub user_agent : String,
    /// Where downloaded PDFs are kept while being parsed.
    pub temp_dir : String,
    /// Timezone in which meeting times are written. Used to decide whether a meeting has passed.
    pub timezone : Tz,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_url: "https://www.descmiworks.com/about-us/public-meetings/".to_string(),
            user_agent: "city-scrapers/desc_meetings".to_string(),
            temp_dir: "data/temp".to_string(),
            timezone: chrono_tz::America::Detroit,
        }
    }
}

impl Config {
    /// Load from a toml file. A missing file gives the defaults, a malformed one is an error.
    pub fn load(path:&Path) -> anyhow::Result<Config> {
        if !path.exists() { return Ok(Config::default()) }
        let file = std::fs::read_to_string(path)?;
        let config : Config = toml::de::from_str(&file)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config : Config = toml::de::from_str(r#"temp_dir = "/tmp/desc""#).unwrap();
        assert_eq!(config.temp_dir,"/tmp/desc");
        assert_eq!(config.start_url,"https://www.descmiworks.com/about-us/public-meetings/");
        assert_eq!(config.timezone,chrono_tz::America::Detroit);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("definitely/not/a/config.toml")).unwrap();
        assert_eq!(config.temp_dir,"data/temp");
    }

    #[test]
    fn test_bad_timezone_is_an_error() {
        assert!(toml::de::from_str::<Config>(r#"timezone = "Mars/Olympus""#).is_err());
    }
}
