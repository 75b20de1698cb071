//! Configuration types deserialized from `canopy.toml`.

use serde::Deserialize;

use crate::error::ConfigError;

/// The build configuration for one HLS project.
///
/// Constructed either from a `canopy.toml` file or programmatically via
/// [`BuildConfig::auto_config`]. Every build targets a unique
/// `output_dir`; the scaffolder refuses to reuse an existing one.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// The HLS project name; also the top-function name.
    pub project_name: String,
    /// Directory the generated project is written to. Must not exist yet.
    pub output_dir: String,
    /// Fixed-point precision format string (e.g. `ap_fixed<18,8>`).
    pub precision: String,
    /// Full Xilinx part number (e.g. `xcvu9p-flgb2104-2L-e`).
    pub xilinx_part: String,
    /// Xilinx board identifier, required for PDR block-design generation.
    #[serde(default)]
    pub xilinx_board: Option<String>,
    /// Target clock period in nanoseconds.
    pub clock_period: u32,
    /// Explicit HLS tool selection; when absent the invoker probes the
    /// search path in its default priority order.
    #[serde(default)]
    pub tool: Option<HlsTool>,
    /// Partial-dynamic-reconfiguration layout, absent for plain builds.
    #[serde(default)]
    pub pdr: Option<PdrConfig>,
}

/// Layout parameters for a partial-dynamic-reconfiguration build.
#[derive(Debug, Clone, Deserialize)]
pub struct PdrConfig {
    /// Number of physical tree banks in the systolic array.
    pub banks: usize,
    /// Number of tree-evaluation slots per bank.
    pub trees_per_bank: usize,
    /// Number of boosting rounds per output class.
    pub trees_per_class: usize,
}

/// The supported Xilinx HLS tool variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HlsTool {
    /// Classic Vivado HLS (deprecated by Xilinx, still widely installed).
    VivadoHls,
    /// Vitis HLS, the only variant supporting partial reconfiguration.
    VitisHls,
}

impl HlsTool {
    /// The executable name probed on the search path.
    pub fn executable(self) -> &'static str {
        match self {
            HlsTool::VivadoHls => "vivado_hls",
            HlsTool::VitisHls => "vitis_hls",
        }
    }

    /// Probe order when no tool is configured explicitly.
    pub fn probe_order() -> &'static [HlsTool] {
        &[HlsTool::VivadoHls, HlsTool::VitisHls]
    }

    /// Whether this variant supports the partial-reconfiguration flow.
    pub fn supports_pdr(self) -> bool {
        matches!(self, HlsTool::VitisHls)
    }
}

impl BuildConfig {
    /// A ready-to-edit default configuration mirroring the historical
    /// `auto_config` defaults.
    pub fn auto_config() -> Self {
        BuildConfig {
            project_name: "my_prj".to_string(),
            output_dir: "my-canopy-prj".to_string(),
            precision: "ap_fixed<18,8>".to_string(),
            xilinx_part: "xcvu9p-flgb2104-2L-e".to_string(),
            xilinx_board: None,
            clock_period: 5,
            tool: None,
            pdr: None,
        }
    }

    /// Whether this is a partial-reconfiguration build.
    pub fn is_pdr(&self) -> bool {
        self.pdr.is_some()
    }

    /// The PDR layout, or a [`ConfigError`] when it was not configured.
    pub fn pdr(&self) -> Result<&PdrConfig, ConfigError> {
        self.pdr
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("pdr".to_string()))
    }

    /// Total bits of the configured fixed-point format.
    ///
    /// Parsed from the width field of `ap_fixed<W,I,...>`; the interconnect
    /// sizing of the reconfigurable system depends on it.
    pub fn precision_bits(&self) -> Result<u32, ConfigError> {
        let inner = self
            .precision
            .split_once('<')
            .map(|(_, rest)| rest)
            .ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "precision '{}' is not of the form ap_fixed<W,I>",
                    self.precision
                ))
            })?;
        let width = inner.split(',').next().unwrap_or("").trim();
        let bits: u32 = width.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "precision width '{width}' is not an integer"
            ))
        })?;
        if bits == 0 {
            return Err(ConfigError::ValidationError(
                "precision width must be positive".to_string(),
            ));
        }
        Ok(bits)
    }
}
