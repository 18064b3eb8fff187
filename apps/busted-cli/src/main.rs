use anyhow::{Context, bail};
use busted_camera::{Camera, CameraSettings};
use busted_common::Geometry;
use busted_input::{Action, InputState, KeyBindings, VirtualCursor};
use clap::{Parser, Subcommand, ValueEnum};
use glam::{Mat4, Vec2, Vec3};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "busted-cli", about = "Headless tools for the fly camera")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Camera placement shared by every subcommand.
#[derive(clap::Args)]
struct CameraArgs {
    /// Viewport width in pixels
    #[arg(long, default_value = "800")]
    width: u32,
    /// Viewport height in pixels
    #[arg(long, default_value = "600")]
    height: u32,
    /// Initial camera position as x,y,z
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [0.0, 0.0, 26.0])]
    position: Vec<f32>,
    /// Vertical field of view in degrees
    #[arg(long, default_value = "45")]
    fov: f32,
    /// Near clip plane
    #[arg(long, default_value = "0.1")]
    near: f32,
    /// Far clip plane
    #[arg(long, default_value = "100")]
    far: f32,
}

impl CameraArgs {
    fn build(&self, settings: CameraSettings) -> anyhow::Result<Camera> {
        if self.position.len() != 3 {
            bail!("--position takes x,y,z, got {} values", self.position.len());
        }
        let position = Vec3::from_slice(&self.position);
        Camera::with_settings(self.width, self.height, position, settings)
            .context("invalid camera arguments")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, default settings and demo geometry sizes
    Info,
    /// Print the view-projection matrix for a camera placement
    Matrix {
        #[command(flatten)]
        camera: CameraArgs,
    },
    /// Simulate a scripted fly session and print the resulting camera state
    Fly {
        #[command(flatten)]
        camera: CameraArgs,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Movement actions held for the whole session
        #[arg(long, value_enum, value_delimiter = ',')]
        hold: Vec<Movement>,
        /// Cursor motion per frame in pixels as dx,dy; non-zero holds mouse look
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = [0.0, 0.0])]
        drag: Vec<f32>,
        /// Movement speed in units per second
        #[arg(long)]
        speed: Option<f32>,
        /// Degrees per full-viewport cursor sweep
        #[arg(long)]
        sensitivity: Option<f32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    Sprint,
}

impl Movement {
    fn action(self) -> Action {
        match self {
            Movement::Forward => Action::MoveForward,
            Movement::Backward => Action::MoveBackward,
            Movement::Left => Action::StrafeLeft,
            Movement::Right => Action::StrafeRight,
            Movement::Up => Action::Ascend,
            Movement::Down => Action::Descend,
            Movement::Sprint => Action::Sprint,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let settings = CameraSettings::default();
            println!("busted-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "camera: speed={} sprint={} sensitivity={} max_pitch={}",
                settings.speed,
                settings.sprint_speed,
                settings.sensitivity,
                settings.max_pitch_degrees
            );
            println!(
                "projection: fov={} near={} far={}",
                settings.fov_degrees, settings.near, settings.far
            );
            let quad = Geometry::quad();
            let grid = Geometry::grid(10, 20, 1.0);
            println!(
                "geometry: quad {} vertices / {} indices, grid {} vertices / {} indices",
                quad.vertices.len(),
                quad.index_count(),
                grid.vertices.len(),
                grid.index_count()
            );
        }
        Commands::Matrix { camera } => {
            let cam = camera.build(CameraSettings::default())?;
            let matrix = cam.matrix(camera.fov, camera.near, camera.far)?;
            println!("{}", cam.summary());
            print_matrix(&matrix);
        }
        Commands::Fly {
            camera,
            frames,
            dt,
            hold,
            drag,
            speed,
            sensitivity,
        } => {
            let defaults = CameraSettings::default();
            let settings = CameraSettings {
                speed: speed.unwrap_or(defaults.speed),
                sensitivity: sensitivity.unwrap_or(defaults.sensitivity),
                ..defaults
            };
            let mut cam = camera.build(settings)?;
            if drag.len() != 2 {
                bail!("--drag takes dx,dy, got {} values", drag.len());
            }
            let drag = Vec2::from_slice(&drag);
            let input = scripted_input(&hold, drag != Vec2::ZERO);

            let mut cursor = VirtualCursor::default();
            fly(&mut cam, &input, &mut cursor, frames, dt, drag);

            println!("{}", cam.summary());
            println!("cursor warps: {}", cursor.warps());
            print_matrix(&cam.matrix(camera.fov, camera.near, camera.far)?);
        }
    }

    Ok(())
}

/// Input state holding every requested movement, plus mouse look if `look` is set.
fn scripted_input(hold: &[Movement], look: bool) -> InputState {
    let bindings = KeyBindings::default();
    let mut input = InputState::new(bindings.clone());
    for movement in hold {
        if let Some(key) = bindings.key_for(movement.action()) {
            input.press_key(key);
        }
    }
    if look {
        input.press_button(bindings.button_for_look());
    }
    input
}

/// Run `frames` frames of input, moving the cursor by `drag` before each, then release everything.
fn fly(
    camera: &mut Camera,
    input: &InputState,
    cursor: &mut VirtualCursor,
    frames: u32,
    dt: f32,
    drag: Vec2,
) {
    for frame in 0..frames {
        cursor.move_by(drag);
        camera.inputs(input, cursor, dt);
        tracing::debug!(
            frame,
            position = ?camera.position(),
            pitch = camera.pitch_degrees(),
            yaw = camera.yaw_degrees(),
            "simulated frame"
        );
    }
    let released = InputState::new(input.bindings().clone());
    camera.inputs(&released, cursor, 0.0);
}

fn print_matrix(matrix: &Mat4) {
    println!("view-projection (row-major):");
    for row in 0..4 {
        let r = matrix.row(row);
        println!("  [{:>10.5} {:>10.5} {:>10.5} {:>10.5}]", r.x, r.y, r.z, r.w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busted_camera::RotationState;
    use busted_input::CursorMode;

    #[test]
    fn fly_forward_one_second() {
        let mut cam = Camera::new(800, 600, Vec3::new(0.0, 0.0, 26.0)).unwrap();
        let input = scripted_input(&[Movement::Forward], false);
        let mut cursor = VirtualCursor::default();
        fly(&mut cam, &input, &mut cursor, 10, 0.1, Vec2::ZERO);
        let expected = Vec3::new(0.0, 0.0, 26.0 - CameraSettings::default().speed);
        assert!(cam.position().abs_diff_eq(expected, 1e-4));
        assert_eq!(cursor.warps(), 0);
    }

    #[test]
    fn fly_with_drag_releases_cursor() {
        let mut cam = Camera::new(800, 600, Vec3::ZERO).unwrap();
        let input = scripted_input(&[], true);
        let mut cursor = VirtualCursor::default();
        fly(&mut cam, &input, &mut cursor, 5, 0.016, Vec2::new(8.0, 0.0));
        assert_eq!(cam.rotation_state(), RotationState::Idle);
        assert_eq!(cursor.mode(), CursorMode::Normal);
        // The first frame only captures; the next four each turn one degree.
        assert!((cam.yaw_degrees() - (-86.0)).abs() < 1e-3);
    }

    #[test]
    fn camera_args_parse_position() {
        let cli = Cli::parse_from(["busted-cli", "matrix", "--position", "1,2,3", "--fov", "60"]);
        let Commands::Matrix { camera } = cli.command else {
            panic!("expected matrix subcommand");
        };
        assert_eq!(camera.position, vec![1.0, 2.0, 3.0]);
        let cam = camera.build(CameraSettings::default()).unwrap();
        assert_eq!(cam.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn short_position_is_rejected() {
        let cli = Cli::parse_from(["busted-cli", "matrix", "--position", "1,2"]);
        let Commands::Matrix { camera } = cli.command else {
            panic!("expected matrix subcommand");
        };
        assert!(camera.build(CameraSettings::default()).is_err());
    }

    #[test]
    fn zero_height_is_rejected() {
        let cli = Cli::parse_from(["busted-cli", "matrix", "--height", "0"]);
        let Commands::Matrix { camera } = cli.command else {
            panic!("expected matrix subcommand");
        };
        assert!(camera.build(CameraSettings::default()).is_err());
    }
}
