//! Annotation viewer demo
//!
//! Builds a small turbofan-like scene, spawns labels on its parts and orbits
//! a camera around it, logging where each label ends up. Pass a TOML or RON
//! settings file as the first argument to override the built-in labels.

use std::path::PathBuf;

use annotation_engine::debug::{colors, DebugShape};
use annotation_engine::foundation::logging;
use annotation_engine::foundation::math::constants::TAU;
use annotation_engine::prelude::*;
use thiserror::Error;

const FRAMES: u32 = 240;
const ORBIT_RADIUS: f32 = 6.0;
const ORBIT_HEIGHT: f32 = 1.5;
const FRAME_TIME: f32 = 1.0 / 60.0;
const STAND_GIZMO: &str = "inspection_stand";

#[derive(Error, Debug)]
enum ViewerError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),
}

/// Part layout of the demo model: name, center, size
const TURBOFAN_PARTS: &[(&str, [f32; 3], [f32; 3])] = &[
    ("Fan", [0.0, 0.0, 2.0], [2.0, 2.0, 0.3]),
    ("Compressor", [0.0, 0.0, 1.0], [1.4, 1.4, 1.2]),
    ("Combustor", [0.0, 0.0, 0.0], [1.2, 1.2, 0.8]),
    ("Turbine", [0.0, 0.0, -0.9], [1.3, 1.3, 0.8]),
    ("Nozzle", [0.0, 0.0, -1.8], [0.9, 0.9, 0.9]),
    ("IgniterA", [0.55, 0.1, 0.0], [0.1, 0.1, 0.2]),
    ("IgniterB", [0.6, -0.1, 0.05], [0.1, 0.1, 0.2]),
];

fn default_settings() -> AnnotationSettings {
    AnnotationSettings {
        entries: vec![
            AnnotationEntry::new("Fan", "Fan Blades"),
            AnnotationEntry::new("Compressor", "High Pressure Compressor"),
            AnnotationEntry::new("Combustor", "Combustion Chamber"),
            AnnotationEntry::new("Turbine", "Turbine Stages"),
            AnnotationEntry::new("Nozzle", "Exhaust Nozzle"),
            AnnotationEntry::new("IgniterA", "Igniter A"),
            AnnotationEntry::new("IgniterB", "Igniter B"),
            AnnotationEntry::new("Thrust Reverser", "Thrust Reverser"),
        ],
        annotation: AnnotationConfig::default().with_obstruction_mask(CollisionLayers::ENVIRONMENT),
        ..AnnotationSettings::default()
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<AnnotationSettings, ViewerError> {
    let settings = match path {
        Some(path) => AnnotationSettings::load_from_file(path)?,
        None => default_settings(),
    };
    settings.validate()?;
    Ok(settings)
}

struct AnnotationViewer {
    scene: SimpleScene,
    model: ModelHandle,
    manager: AnnotationManager,
    camera: Camera,
    viewport: Viewport,
    debug: DebugDrawSystem,
    indicator: EdgeIndicator,
    orbit_angle: f32,
}

impl AnnotationViewer {
    fn new(settings: &AnnotationSettings) -> Result<Self, ViewerError> {
        let mut scene = SimpleScene::new();
        let model = scene.add_model("Turbofan");

        for &(name, center, size) in TURBOFAN_PARTS {
            let center = Vec3::from(center);
            if let Some(anchor) = scene.add_part(model, name, center) {
                scene.add_renderable(anchor, AABB::from_center_size(center, Vec3::from(size)));
            }
        }

        // Inspection stand between the camera path and the engine core
        let stand = AABB::from_center_size(Vec3::new(0.0, -1.2, 0.0), Vec3::new(3.0, 0.4, 5.0));
        scene.add_obstacle(stand, CollisionLayers::ENVIRONMENT);

        log::info!(
            "Scene built: {} anchors, {} obstacles",
            scene.anchor_count(),
            scene.obstacle_count()
        );

        let mut manager = AnnotationManager::from_settings(settings)?;
        manager.set_current_model(&scene, model);

        let viewport = Viewport::new(1280.0, 720.0);
        let camera = Camera::perspective(
            Vec3::new(0.0, ORBIT_HEIGHT, -ORBIT_RADIUS),
            60.0,
            viewport.aspect(),
            0.1,
            100.0,
        );

        let mut debug = DebugDrawSystem::new();
        debug.enabled = settings.engine.debug_gizmos;
        debug.draw_persistent(STAND_GIZMO, DebugShape::aabb(&stand, colors::GRAY));

        Ok(Self {
            scene,
            model,
            manager,
            camera,
            viewport,
            debug,
            indicator: EdgeIndicator::new(),
            orbit_angle: 0.0,
        })
    }

    fn run(&mut self, frames: u32) -> Result<(), ViewerError> {
        let report = self.manager.spawn_annotations(&self.scene)?;
        if !report.missing.is_empty() {
            log::warn!("Parts without labels: {}", report.missing.join(", "));
        }

        for frame in 0..frames {
            self.orbit_camera(TAU / frames as f32);

            let stats = self.manager.tick(&self.scene, Some(&self.camera));
            self.debug.update(FRAME_TIME);
            self.manager.draw_gizmos(&mut self.debug);

            if frame % 60 == 0 {
                self.log_frame(frame, stats.placed, stats.skipped);
            }

            if frame == frames / 2 {
                log::info!("Hiding labels for one frame");
                self.manager.toggle(&self.scene)?;
                self.manager.tick(&self.scene, Some(&self.camera));
                self.manager.show();
            }
        }

        // Swap to a bigger fan and refresh bounds
        if let Some(fan) = self.scene.find_part(self.model, "Fan") {
            self.scene.add_renderable(fan, AABB::from_center_size(Vec3::new(0.0, 0.0, 2.0), Vec3::new(3.0, 3.0, 0.3)));
            self.manager.recalculate_bounds(&self.scene);
        }
        self.manager.tick(&self.scene, Some(&self.camera));
        if let Some((_, _, placer)) = self.manager.labels().find(|(_, part, _)| *part == "Fan") {
            log::info!("Fan label after bounds refresh: scale {:.3}", placer.scale());
        }

        self.manager.clear_all();
        self.debug.clear_persistent(STAND_GIZMO);
        log::info!("Viewer finished, {} labels remain", self.manager.total_count());
        Ok(())
    }

    fn orbit_camera(&mut self, step: f32) {
        self.orbit_angle += step;
        let position = Vec3::new(
            ORBIT_RADIUS * self.orbit_angle.sin(),
            ORBIT_HEIGHT,
            -ORBIT_RADIUS * self.orbit_angle.cos(),
        );
        self.camera.set_position(position);
        self.camera.set_target(Vec3::zeros());
    }

    fn log_frame(&self, frame: u32, placed: usize, skipped: usize) {
        log::info!(
            "Frame {frame}: {placed} placed, {skipped} skipped, {} gizmos",
            self.debug.shape_count()
        );

        for (_, part, placer) in self.manager.labels() {
            let p = placer.position();
            let screen = self.camera.world_to_screen(p, self.viewport);
            log::info!(
                "  {:<12} '{}' at ({:.2}, {:.2}, {:.2}) scale {:.2} screen ({:.0}, {:.0})",
                part,
                placer.label(),
                p.x,
                p.y,
                p.z,
                placer.scale(),
                screen.x,
                screen.y
            );
        }

        let arrow = self.indicator.place(Vec3::new(0.0, 0.0, -1.8), &self.camera, self.viewport);
        log::debug!(
            "Nozzle indicator at ({:.0}, {:.0}) rotated {:.1}° (behind camera: {})",
            arrow.screen_position.x,
            arrow.screen_position.y,
            arrow.rotation_degrees,
            arrow.behind_camera
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = load_settings(settings_path.as_ref())?;
    logging::init_with_level(&settings.engine.log_level);

    log::info!("Starting annotation viewer");
    match &settings_path {
        Some(path) => log::info!("Settings loaded from {}", path.display()),
        None => log::info!("Using built-in turbofan labels"),
    }
    let mut viewer = AnnotationViewer::new(&settings)?;
    viewer.run(FRAMES)?;
    Ok(())
}
