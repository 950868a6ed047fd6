//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;
use campus_drive::{PlatformProfile, ViewMode};

/// Default placement seed.
const DEFAULT_SEED: u64 = 0x5eed;

/// Device class used to pick a [`PlatformProfile`].
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(not(target_family = "wasm"), derive(clap::ValueEnum))]
pub enum Platform {
    /// Keyboard, mouse and gamepad.
    #[default]
    Desktop,
    /// Touch screen with an on-screen joystick.
    Mobile,
}

impl Platform {
    pub fn profile(self) -> PlatformProfile {
        match self {
            Self::Desktop => PlatformProfile::desktop(),
            Self::Mobile => PlatformProfile::mobile(),
        }
    }
}

/// Launch parameters for the viewer.
#[derive(Resource, Debug)]
pub struct LaunchParams {
    /// Initial camera view.
    pub view_mode: ViewMode,
    /// Device class.
    pub platform: Platform,
    /// Seed for tree placement.
    pub seed: u64,
    /// Start in driving mode.
    pub drive: bool,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            platform: Platform::default(),
            seed: DEFAULT_SEED,
            drive: false,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Explorable 3D campus with a drivable vehicle")]
    struct CliArgs {
        /// Initial camera view (overview or driver).
        #[arg(long, default_value_t = ViewMode::default())]
        view_mode: ViewMode,

        /// Device class, selecting camera and control presets.
        #[arg(long, value_enum, default_value_t = Platform::default())]
        platform: Platform,

        /// Seed for tree placement.
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Start in driving mode.
        #[arg(long)]
        drive: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            view_mode: args.view_mode,
            platform: args.platform,
            seed: args.seed,
            drive: args.drive,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
