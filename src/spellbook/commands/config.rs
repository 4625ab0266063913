use crate::commands::{CmdMessage, CmdResult, SpellbookPaths};
use crate::config::SpellbookConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &SpellbookPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = paths.data_dir();
    match action {
        ConfigAction::ShowAll => {
            let config = SpellbookConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = SpellbookConfig::load(dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = SpellbookConfig::load(dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::config::{KEY_DATABASE, KEY_EXPORT_DIR};
    use tempfile::TempDir;

    #[test]
    fn test_set_persists_and_show_reads_back() {
        let temp = TempDir::new().unwrap();
        let paths = SpellbookPaths::new(temp.path());

        let set = run(
            &paths,
            ConfigAction::Set(KEY_EXPORT_DIR.into(), "exports".into()),
        )
        .unwrap();
        assert_eq!(set.messages[0].level, MessageLevel::Success);

        let shown = run(&paths, ConfigAction::ShowKey(KEY_EXPORT_DIR.into())).unwrap();
        assert_eq!(shown.messages[0].content, "exports");

        let all = run(&paths, ConfigAction::ShowAll).unwrap();
        let config = all.config.unwrap();
        assert_eq!(config.export_dir.as_deref(), Some("exports"));
        assert_eq!(config.get(KEY_DATABASE).as_deref(), Some("spellbook.sqlite3"));
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let temp = TempDir::new().unwrap();
        let paths = SpellbookPaths::new(temp.path());

        let set = run(&paths, ConfigAction::Set("colour".into(), "red".into())).unwrap();
        assert_eq!(set.messages[0].level, MessageLevel::Error);

        let shown = run(&paths, ConfigAction::ShowKey("colour".into())).unwrap();
        assert_eq!(shown.messages[0].level, MessageLevel::Error);
    }
}
