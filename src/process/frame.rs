use cgmath::{Deg, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::DemoConfig;
use crate::primitives::camera::CameraTransform;
use crate::primitives::color::TargetColor;
use crate::primitives::mesh::Mesh;
use crate::process::convergence::{ColorConvergence, StepOutcome};
use crate::process::input::{Buttons, PadSnapshot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    IdleOnTarget,
    Transitioning,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Quit,
}

/// Everything the demo mutates from frame to frame.
///
/// `update` runs the CPU half of a frame (camera, target selection,
/// convergence step); the caller then uploads [`mesh`](Self::mesh), draws,
/// presents and calls [`finish_frame`](Self::finish_frame).
pub struct DemoState {
    config: DemoConfig,
    mesh: Mesh,
    convergence: ColorConvergence,
    camera: CameraTransform,
    target: TargetColor,
    previous: TargetColor,
    phase: Phase,
    rng: StdRng,
}

impl DemoState {
    pub fn new(config: DemoConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: DemoConfig, rng: StdRng) -> Self {
        let mesh = Mesh::sphere(config.sphere_radius, config.sphere_sectors, config.sphere_stacks);
        Self::with_mesh(config, mesh, rng)
    }

    pub fn with_mesh(config: DemoConfig, mesh: Mesh, rng: StdRng) -> Self {
        let convergence = ColorConvergence::for_mesh(&mesh, config.changes_per_frame);
        Self {
            config,
            mesh,
            convergence,
            camera: CameraTransform::new(),
            target: TargetColor::default(),
            previous: TargetColor::default(),
            // the asset does not start out in the default color
            phase: Phase::Transitioning,
            rng,
        }
    }

    pub fn update(&mut self, input: &PadSnapshot) -> FrameControl {
        self.apply_motion(input.held);
        self.select_target(input.held);

        if input.just_pressed.contains(Buttons::RESET_TRANSFORM) {
            log::debug!("Transform reset");
            self.camera.reset();
        } else if input.just_pressed.contains(Buttons::QUIT) {
            log::info!("Quit requested");
            return FrameControl::Quit;
        }

        let outcome = self.convergence.step(&mut self.mesh, self.target.rgb(), &mut self.rng);
        let done = match outcome {
            StepOutcome::Converged => true,
            StepOutcome::Progressed { remaining, .. } => remaining == 0,
        };
        if done && self.phase == Phase::Transitioning {
            log::info!("Sphere converged to {:?}", self.target);
            self.phase = Phase::IdleOnTarget;
        }

        FrameControl::Continue
    }

    /// Remembers this frame's target so the next frame can detect a change.
    pub fn finish_frame(&mut self) {
        self.previous = self.target;
    }

    fn apply_motion(&mut self, held: Buttons) {
        let direction = if held.contains(Buttons::LEFT) {
            -1.0
        } else if held.contains(Buttons::RIGHT) {
            1.0
        } else {
            return;
        };
        self.camera
            .translate(Vector3::new(direction * self.config.translate_step, 0.0, 0.0));
        self.camera
            .rotate(Deg(direction * self.config.rotate_step_deg), Vector3::unit_y());
    }

    fn select_target(&mut self, held: Buttons) {
        self.target = if held.contains(Buttons::UP) {
            TargetColor::Blue
        } else if held.contains(Buttons::DOWN) {
            TargetColor::Green
        } else {
            TargetColor::Red
        };

        if self.target != self.previous {
            log::info!("Target color {:?} -> {:?}", self.previous, self.target);
            self.convergence.reset();
            self.phase = Phase::Transitioning;
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera(&self) -> &CameraTransform {
        &self.camera
    }

    pub fn convergence(&self) -> &ColorConvergence {
        &self.convergence
    }

    pub fn target(&self) -> TargetColor {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
