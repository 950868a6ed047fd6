//! Headless driving simulator.
//!
//! Replays a scripted input program through the same `DriveSession` the
//! viewer uses and prints CSV telemetry (one row per tick) to stdout.
//!
//! A program is a comma-separated list of `KEYS:TICKS` segments. `KEYS` is
//! any combination of `F` (forward), `B` (backward), `L` (left) and `R`
//! (right), or `-` for no keys, optionally followed by `@X/Y` for a
//! joystick vector.
//!
//! Run with: cargo run -p campus-viewer --bin drive-sim -- --program "F:120,FL:60,-:90"

#[cfg(target_family = "wasm")]
fn main() {
    eprintln!("ERROR: drive-sim is a native command-line tool");
}

#[cfg(not(target_family = "wasm"))]
mod sim {
    use std::fmt::Write as _;

    use campus_drive::{
        CameraRigConfig, DriveKeys, DriveSession, InputState, PlatformProfile, VehicleParams,
        ViewMode,
    };
    use campus_viewer::campus;
    use clap::Parser;
    use glam::Vec2;

    /// One program segment: an input held for a number of ticks.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Segment {
        pub input: InputState,
        pub ticks: u32,
    }

    /// A parsed input program.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Program(pub Vec<Segment>);

    fn parse_keys(keys: &str) -> Result<InputState, String> {
        let (keys, stick) = match keys.split_once('@') {
            Some((keys, stick)) => (keys, Some(stick)),
            None => (keys, None),
        };

        let mut state = DriveKeys::default();
        if keys != "-" {
            for key in keys.chars() {
                match key.to_ascii_uppercase() {
                    'F' => state.forward = true,
                    'B' => state.backward = true,
                    'L' => state.left = true,
                    'R' => state.right = true,
                    other => return Err(format!("unknown key '{other}' in '{keys}'")),
                }
            }
        }

        let joystick = match stick {
            Some(stick) => {
                let (x, y) = stick
                    .split_once('/')
                    .ok_or_else(|| format!("expected joystick as X/Y, got '{stick}'"))?;
                let x = x
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| format!("invalid joystick x: {e}"))?;
                let y = y
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| format!("invalid joystick y: {e}"))?;
                Vec2::new(x, y)
            }
            None => Vec2::ZERO,
        };

        Ok(InputState::new(state, joystick))
    }

    /// Parse a `KEYS:TICKS,...` program.
    pub fn parse_program(s: &str) -> Result<Program, String> {
        let segments = s
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let (keys, ticks) = segment
                    .rsplit_once(':')
                    .ok_or_else(|| format!("expected KEYS:TICKS, got '{segment}'"))?;
                let ticks = ticks
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid tick count in '{segment}': {e}"))?;
                Ok(Segment {
                    input: parse_keys(keys.trim())?,
                    ticks,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        if segments.is_empty() {
            return Err("program has no segments".to_string());
        }
        Ok(Program(segments))
    }

    #[derive(Parser)]
    #[command(about = "Replay a scripted drive and print CSV telemetry")]
    struct CliArgs {
        /// Input program, e.g. "F:120,FL:60,-:90".
        #[arg(long, value_parser = parse_program)]
        program: Program,

        /// Camera view to simulate.
        #[arg(long, default_value_t = ViewMode::Driver)]
        view_mode: ViewMode,

        /// Use the mobile camera presets.
        #[arg(long)]
        mobile: bool,
    }

    /// CSV header for [`telemetry_row`].
    pub const TELEMETRY_HEADER: &str =
        "tick,speed,heading,pos_x,pos_z,cam_x,cam_y,cam_z,look_x,look_y,look_z";

    /// Format the session state after `tick` as one CSV row.
    pub fn telemetry_row(tick: u64, session: &DriveSession) -> String {
        let vehicle = session.vehicle();
        let camera = session.camera();
        let mut row = String::new();
        let _ = write!(
            row,
            "{tick},{:.5},{:.5},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            vehicle.speed,
            vehicle.heading,
            vehicle.position.x,
            vehicle.position.y,
            camera.position().x,
            camera.position().y,
            camera.position().z,
            camera.look_at().x,
            camera.look_at().y,
            camera.look_at().z,
        );
        row
    }

    /// Drive the program through a fresh session, calling `emit` after every
    /// tick.
    pub fn simulate(
        program: &Program,
        profile: PlatformProfile,
        view_mode: ViewMode,
        mut emit: impl FnMut(u64, &DriveSession),
    ) -> Result<DriveSession, Box<dyn std::error::Error>> {
        let layout = campus::default_layout()?;
        let mut session = DriveSession::new(
            VehicleParams::default(),
            CameraRigConfig::default(),
            profile,
            *layout.bounds(),
            campus::SPAWN_POSE,
        )?;
        session.enter();
        session.set_view_mode(view_mode);

        for segment in &program.0 {
            for _ in 0..segment.ticks {
                session.tick(&segment.input);
                session.update_camera();
                emit(session.tick_count(), &session);
            }
        }
        Ok(session)
    }

    pub fn run() {
        let args = CliArgs::parse();
        let profile = if args.mobile {
            PlatformProfile::mobile()
        } else {
            PlatformProfile::desktop()
        };

        println!("{TELEMETRY_HEADER}");
        let result = simulate(&args.program, profile, args.view_mode, |tick, session| {
            println!("{}", telemetry_row(tick, session));
        });

        match result {
            Ok(session) => {
                let vehicle = session.vehicle();
                eprintln!(
                    "# {} ticks, final speed {:.4}, position ({:.2}, {:.2})",
                    session.tick_count(),
                    vehicle.speed,
                    vehicle.position.x,
                    vehicle.position.y
                );
            }
            Err(err) => {
                eprintln!("ERROR: {err}");
                std::process::exit(1);
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_program() {
            let program = parse_program("F:120, FL:60 ,-:90").unwrap();
            assert_eq!(program.0.len(), 3);
            assert!(program.0[1].input.keys.forward && program.0[1].input.keys.left);
            assert_eq!(program.0[2].input, InputState::default());
            assert_eq!(program.0[2].ticks, 90);
        }

        #[test]
        fn test_parse_joystick() {
            let program = parse_program("-@0.5/1:10").unwrap();
            assert_eq!(program.0[0].input.joystick, Vec2::new(0.5, 1.0));
        }

        #[test]
        fn test_parse_errors() {
            assert!(parse_program("").is_err());
            assert!(parse_program("F").is_err());
            assert!(parse_program("X:10").is_err());
            assert!(parse_program("F:ten").is_err());
            assert!(parse_program("-@1:10").is_err());
        }

        #[test]
        fn test_simulate_accelerate_then_coast() {
            let program = parse_program("F:60,-:60").unwrap();
            let mut rows = Vec::new();
            let session = simulate(
                &program,
                PlatformProfile::desktop(),
                ViewMode::Driver,
                |tick, session| rows.push(telemetry_row(tick, session)),
            )
            .unwrap();

            assert_eq!(rows.len(), 120);
            assert_eq!(session.tick_count(), 120);
            assert!(rows[0].starts_with("1,"));
            assert_eq!(
                rows[0].split(',').count(),
                TELEMETRY_HEADER.split(',').count()
            );
            // 60 coasting ticks from top speed is past the stop point.
            assert!(session.vehicle().speed.abs() < f32::EPSILON);
            assert!(session.vehicle().position.y > campus::SPAWN_POSE.position.y);
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() {
    sim::run();
}
