//! 配置校验模块
//!
//! 校验规则：
//! - output.path 非空
//! - append 只能用于文件输出
//! - logging.level 是合法的过滤指令
//! - metrics_port 不为 0

use contracts::ContractError;

use crate::EmitterConfig;

/// 校验 EmitterConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &EmitterConfig) -> Result<(), ContractError> {
    validate_output_path(config)?;
    validate_append(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_output_path(config: &EmitterConfig) -> Result<(), ContractError> {
    if config.output.path.trim().is_empty() {
        return Err(ContractError::config_validation(
            "output.path",
            "must not be empty, use \"-\" for stdout",
        ));
    }
    Ok(())
}

fn validate_append(config: &EmitterConfig) -> Result<(), ContractError> {
    if config.output.append && config.output.is_stdout() {
        return Err(ContractError::config_validation(
            "output.append",
            "append requires a file path",
        ));
    }
    Ok(())
}

fn validate_logging(config: &EmitterConfig) -> Result<(), ContractError> {
    observability::parse_filter(&config.logging.default_log_level)
        .map_err(|e| ContractError::config_validation("logging.level", format!("{e:#}")))?;

    if config.logging.metrics_port == Some(0) {
        return Err(ContractError::config_validation(
            "logging.metrics_port",
            "port must be non-zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputConfig;
    use contracts::OutputFormat;

    fn valid_config() -> EmitterConfig {
        EmitterConfig::new(OutputConfig::new(OutputFormat::Text))
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_path() {
        let mut config = valid_config();
        config.output.path = "  ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("output.path"));
    }

    #[test]
    fn test_append_to_stdout() {
        let mut config = valid_config();
        config.output.append = true;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("output.append"));

        config.output.path = "graph.txt".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.logging.default_log_level = "emitter=verbose".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_zero_metrics_port() {
        let mut config = valid_config();
        config.logging.metrics_port = Some(0);
        assert!(validate(&config).is_err());
    }
}
