// src/provision/options.rs

use crate::types::Platform;

/// Switches recognised by `zinc create`.
///
/// Passed explicitly into [`crate::provision::provision`]; optional add-on
/// tasks only enter the graph when their switch is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Leave out repository initialisation.
    pub skip_version_control: bool,
    /// Drives the platform path fix-up.
    pub platform: Platform,
    /// Install the CSS toolchain.
    pub style_tooling: bool,
    /// Download the HTTP helper script into the project.
    pub http_helper: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            skip_version_control: false,
            platform: Platform::host(),
            style_tooling: true,
            http_helper: false,
        }
    }
}
