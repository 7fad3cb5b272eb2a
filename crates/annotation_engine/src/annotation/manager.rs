//! # Annotation Manager
//!
//! Owns the labels for the model currently on display, the registry they
//! share and the per-frame update order.
//!
//! Labels are spawned from a list of [`AnnotationEntry`] values, each naming
//! a part of the current model. Hiding labels removes them from the registry
//! so they stop pushing visible labels around; showing them re-registers
//! them.

use slotmap::SlotMap;

use crate::annotation::placer::{AnnotationPlacer, UpdateOutcome};
use crate::annotation::registry::AnnotationRegistry;
use crate::annotation::AnnotationError;
use crate::core::config::{AnnotationConfig, AnnotationEntry, AnnotationSettings};
use crate::debug::DebugDrawSystem;
use crate::render::Camera;
use crate::scene::{GeometryQuery, ModelHandle, PartLookup, SceneQuery};

slotmap::new_key_type! {
    /// Handle to a label owned by an [`AnnotationManager`]
    pub struct LabelId;
}

#[derive(Debug)]
struct ManagedLabel {
    part_name: String,
    placer: AnnotationPlacer,
}

/// Outcome of [`AnnotationManager::spawn_annotations`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Labels created, in entry order
    pub spawned: Vec<LabelId>,
    /// Number of configured entries
    pub requested: usize,
    /// Part names not found in the model
    pub missing: Vec<String>,
}

/// Counts from one [`AnnotationManager::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Labels placed this frame
    pub placed: usize,
    /// Labels skipped for a missing anchor or camera
    pub skipped: usize,
}

/// Spawns, shows, hides and updates the labels of one model
#[derive(Debug)]
pub struct AnnotationManager {
    config: AnnotationConfig,
    entries: Vec<AnnotationEntry>,
    registry: AnnotationRegistry,
    labels: SlotMap<LabelId, ManagedLabel>,
    current_model: Option<ModelHandle>,
    visible: bool,
}

impl AnnotationManager {
    /// Create a manager spawning `entries` with a shared `config`
    pub fn new(config: AnnotationConfig, entries: Vec<AnnotationEntry>) -> Self {
        Self {
            config,
            entries,
            registry: AnnotationRegistry::new(),
            labels: SlotMap::with_key(),
            current_model: None,
            visible: false,
        }
    }

    /// Create a manager from validated settings
    pub fn from_settings(settings: &AnnotationSettings) -> Result<Self, AnnotationError> {
        settings.validate()?;
        Ok(Self::new(settings.annotation.clone(), settings.entries.clone()))
    }

    /// Switch to a new model, clearing every existing label
    pub fn set_current_model<L: PartLookup + ?Sized>(&mut self, scene: &L, model: ModelHandle) {
        self.clear_all();
        self.current_model = Some(model);
        log::info!(
            "Current model set to: {}",
            scene.model_name(model).unwrap_or("<unnamed>")
        );
    }

    /// Model labels are spawned on
    pub fn current_model(&self) -> Option<ModelHandle> {
        self.current_model
    }

    /// Configured entries
    pub fn entries(&self) -> &[AnnotationEntry] {
        &self.entries
    }

    /// Replace the entries used by the next spawn
    pub fn set_entries(&mut self, entries: Vec<AnnotationEntry>) {
        self.entries = entries;
    }

    /// Create one label per entry whose part exists in the current model
    ///
    /// Existing labels are cleared first. Entries naming a missing part are
    /// reported and skipped.
    pub fn spawn_annotations<S>(&mut self, scene: &S) -> Result<SpawnReport, AnnotationError>
    where
        S: PartLookup + GeometryQuery + ?Sized,
    {
        let Some(model) = self.current_model else {
            log::warn!("No model set. Cannot spawn annotations.");
            return Err(AnnotationError::NoModel);
        };
        self.config.validate()?;

        self.clear_all();

        let model_name = scene.model_name(model).unwrap_or("<unnamed>").to_string();
        let mut report = SpawnReport {
            requested: self.entries.len(),
            ..SpawnReport::default()
        };

        for entry in &self.entries {
            let Some(anchor) = scene.find_part(model, &entry.part_name) else {
                log::warn!(
                    "Could not find part '{}' in model '{}'!",
                    entry.part_name,
                    model_name
                );
                report.missing.push(entry.part_name.clone());
                continue;
            };

            let placer = AnnotationPlacer::new(
                anchor,
                entry.label.clone(),
                self.config.clone(),
                scene,
                &mut self.registry,
            )?;
            let id = self.labels.insert(ManagedLabel {
                part_name: entry.part_name.clone(),
                placer,
            });
            report.spawned.push(id);
        }

        self.visible = true;
        log::info!(
            "Annotation spawning complete. {}/{} annotations spawned.",
            report.spawned.len(),
            report.requested
        );
        Ok(report)
    }

    /// Hide visible labels, or spawn them if hidden
    pub fn toggle<S>(&mut self, scene: &S) -> Result<(), AnnotationError>
    where
        S: PartLookup + GeometryQuery + ?Sized,
    {
        if self.visible {
            self.hide();
        } else {
            self.spawn_annotations(scene)?;
        }
        Ok(())
    }

    /// Hide every label and drop it from the registry
    pub fn hide(&mut self) {
        for label in self.labels.values_mut() {
            label.placer.detach(&mut self.registry);
        }
        self.visible = false;
        log::info!("Annotations hidden.");
    }

    /// Show every label and return it to the registry
    pub fn show(&mut self) {
        for label in self.labels.values_mut() {
            label.placer.attach(&mut self.registry);
        }
        self.visible = true;
        log::info!("Annotations shown.");
    }

    /// Destroy every label
    pub fn clear_all(&mut self) {
        self.labels.clear();
        self.registry.clear();
        self.visible = false;
        log::info!("All annotations cleared.");
    }

    /// Destroy the labels spawned for `part_name`, returning how many
    pub fn clear_by_part_name(&mut self, part_name: &str) -> usize {
        let doomed: Vec<LabelId> = self
            .labels
            .iter()
            .filter(|(_, label)| label.part_name == part_name)
            .map(|(id, _)| id)
            .collect();

        for id in &doomed {
            if let Some(mut label) = self.labels.remove(*id) {
                label.placer.detach(&mut self.registry);
                log::info!("Cleared annotation for part: {}", part_name);
            }
        }
        doomed.len()
    }

    /// Whether labels are shown and there is at least one
    pub fn are_visible(&self) -> bool {
        self.visible && !self.labels.is_empty()
    }

    /// Number of labels currently shown
    pub fn active_count(&self) -> usize {
        if self.visible {
            self.labels.len()
        } else {
            0
        }
    }

    /// Number of labels, shown or hidden
    pub fn total_count(&self) -> usize {
        self.labels.len()
    }

    /// Run one frame for every visible label
    ///
    /// All labels read the same registry snapshot; positions are committed
    /// only after every label has been updated.
    pub fn tick<S: SceneQuery>(&mut self, scene: &S, camera: Option<&Camera>) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.visible {
            return report;
        }

        let peers = self.registry.snapshot();
        for label in self.labels.values_mut() {
            match label.placer.update(scene, camera, &peers) {
                UpdateOutcome::Placed(_) => report.placed += 1,
                UpdateOutcome::Skipped(_) => report.skipped += 1,
            }
        }

        for label in self.labels.values() {
            label.placer.commit(&mut self.registry);
        }

        for label in self.labels.values_mut() {
            label.placer.late_update(scene, camera);
        }

        report
    }

    /// Recompute every label's cached bounds
    pub fn recalculate_bounds<G: GeometryQuery + ?Sized>(&mut self, scene: &G) {
        for label in self.labels.values_mut() {
            label.placer.recalculate_bounds(scene);
        }
    }

    /// Queue gizmos for every visible label
    pub fn draw_gizmos(&self, debug: &mut DebugDrawSystem) {
        if !self.visible {
            return;
        }
        for label in self.labels.values() {
            label.placer.draw_gizmos(debug);
        }
    }

    /// Placer behind a label handle
    pub fn placer(&self, id: LabelId) -> Result<&AnnotationPlacer, AnnotationError> {
        self.labels
            .get(id)
            .map(|label| &label.placer)
            .ok_or(AnnotationError::UnknownAnnotation(id))
    }

    /// Every label with its part name
    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &str, &AnnotationPlacer)> {
        self.labels
            .iter()
            .map(|(id, label)| (id, label.part_name.as_str(), &label.placer))
    }

    /// Registry shared by the labels
    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }
}
