//! Configuration validation.

use super::error::{ConfigError, ConfigResult};
use super::schema::{AntiSpamSettings, BotConfig, HeraldConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_anti_spam(&config.anti_spam)?;
    validate_logging(&config.logging)?;
    Ok(())
}

fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.prefix.is_empty() {
        return Err(ConfigError::missing_field("bot.prefix"));
    }
    if bot.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Prefix must not contain whitespace: {:?}",
            bot.prefix
        )));
    }
    if bot.developers.iter().any(|id| id.trim().is_empty()) {
        return Err(ConfigError::validation("Developer ids must not be empty"));
    }
    if bot.support_server_id.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::validation(
            "bot.support_server_id must not be empty when set",
        ));
    }
    Ok(())
}

fn validate_anti_spam(anti_spam: &AntiSpamSettings) -> ConfigResult<()> {
    if anti_spam.max_hits > 0 && anti_spam.window_ms == 0 {
        return Err(ConfigError::validation(
            "anti_spam.window_ms must be greater than 0 when anti-spam is enabled",
        ));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_is_valid() {
        assert_ok!(validate_config(&HeraldConfig::default()));
    }

    #[test]
    fn test_bad_prefix() {
        let mut config = HeraldConfig::default();
        config.bot.prefix = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.bot.prefix = "! ".into();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_empty_developer_id() {
        let mut config = HeraldConfig::default();
        config.bot.developers = vec!["1".into(), " ".into()];
        assert_err!(validate_config(&config));
    }

    #[test]
    fn test_anti_spam_window() {
        let mut config = HeraldConfig::default();
        config.anti_spam.window_ms = 0;
        assert_err!(validate_config(&config));

        config.anti_spam.max_hits = 0;
        assert_ok!(validate_config(&config));
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = HeraldConfig::default();
        config.logging.output = LogOutput::File;
        assert_err!(validate_config(&config));

        config.logging.file_path = Some("herald.log".into());
        assert_ok!(validate_config(&config));
    }
}
