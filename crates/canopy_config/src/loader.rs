//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::BuildConfig;

/// Loads and validates a `canopy.toml` build configuration.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a build configuration from a TOML string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<BuildConfig, ConfigError> {
    let config: BuildConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates required fields and cross-field consistency.
fn validate_config(config: &BuildConfig) -> Result<(), ConfigError> {
    if config.project_name.is_empty() {
        return Err(ConfigError::MissingField("project_name".to_string()));
    }
    if config.output_dir.is_empty() {
        return Err(ConfigError::MissingField("output_dir".to_string()));
    }
    if config.clock_period == 0 {
        return Err(ConfigError::ValidationError(
            "clock_period must be positive".to_string(),
        ));
    }
    config.precision_bits()?;
    if let Some(pdr) = &config.pdr {
        if pdr.banks == 0 || pdr.trees_per_bank == 0 || pdr.trees_per_class == 0 {
            return Err(ConfigError::ValidationError(
                "pdr.banks, pdr.trees_per_bank and pdr.trees_per_class must be positive"
                    .to_string(),
            ));
        }
        if config.xilinx_board.is_none() {
            return Err(ConfigError::MissingField("xilinx_board".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
project_name = "iris_bdt"
output_dir = "prj_iris"
precision = "ap_fixed<18,8>"
xilinx_part = "xcu250-figd2104-2L-e"
clock_period = 5
"#;
        let cfg = load_config_from_str(toml).unwrap();
        assert_eq!(cfg.project_name, "iris_bdt");
        assert!(!cfg.is_pdr());
        assert!(cfg.tool.is_none());
    }

    #[test]
    fn parse_pdr_config() {
        let toml = r#"
project_name = "iris_bdt"
output_dir = "prj_iris"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg-ffvb1156-2-e"
xilinx_board = "xilinx.com:zcu102:part0:3.3"
clock_period = 5
tool = "vitis_hls"

[pdr]
banks = 2
trees_per_bank = 2
trees_per_class = 4
"#;
        let cfg = load_config_from_str(toml).unwrap();
        let pdr = cfg.pdr().unwrap();
        assert_eq!(pdr.banks, 2);
        assert_eq!(pdr.trees_per_bank, 2);
        assert_eq!(pdr.trees_per_class, 4);
        assert_eq!(cfg.tool, Some(crate::HlsTool::VitisHls));
    }

    #[test]
    fn pdr_requires_board() {
        let toml = r#"
project_name = "p"
output_dir = "o"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg"
clock_period = 5

[pdr]
banks = 2
trees_per_bank = 2
trees_per_class = 4
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(f) if f == "xilinx_board"));
    }

    #[test]
    fn pdr_rejects_zero_banks() {
        let toml = r#"
project_name = "p"
output_dir = "o"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg"
xilinx_board = "b"
clock_period = 5

[pdr]
banks = 0
trees_per_bank = 2
trees_per_class = 4
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_clock() {
        let toml = r#"
project_name = "p"
output_dir = "o"
precision = "ap_fixed<18,8>"
xilinx_part = "xczu9eg"
clock_period = 0
"#;
        assert!(load_config_from_str(toml).is_err());
    }
}
