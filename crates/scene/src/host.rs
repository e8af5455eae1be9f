use foundation::math::{Vec2, Vec3};

use crate::camera::Camera;
use crate::components::{Geometry, Label, LineStyle, PointStyle, PolygonStyle, Transform};
use crate::dynamic::Dynamic;
use crate::entity::EntityId;
use crate::input::{CursorStyle, InputChannel};
use crate::picking::{PickHit, PickOptions, pick_ray};
use crate::surface::Surface;
use crate::world::World;

/// Headless scene host: entity world, camera, pickable surface and the input
/// channel, with no rendering attached.
#[derive(Debug)]
pub struct Scene {
    world: World,
    camera: Camera,
    surface: Surface,
    input: InputChannel,
    cursor: CursorStyle,
    pick: PickOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSnapshot {
    pub entity: EntityId,
    pub position: Vec3,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    pub entity: EntityId,
    pub name: Option<String>,
    pub vertices: Vec<Vec3>,
    pub label: Option<(String, Vec3)>,
}

/// Everything visible in one frame, with every live binding pulled once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub markers: Vec<MarkerSnapshot>,
    pub lines: Vec<PathSnapshot>,
    pub polygons: Vec<PathSnapshot>,
}

impl Scene {
    pub fn new(camera: Camera, surface: Surface) -> Self {
        Self {
            world: World::new(),
            camera,
            surface,
            input: InputChannel::new(),
            cursor: CursorStyle::default(),
            pick: PickOptions::default(),
        }
    }

    /// Flat map at height 0 seen through `Camera::planar_identity`.
    pub fn planar() -> Self {
        Self::new(Camera::planar_identity(), Surface::plane(0.0))
    }

    pub fn with_pick_options(mut self, pick: PickOptions) -> Self {
        self.pick = pick;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn input(&self) -> &InputChannel {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputChannel {
        &mut self.input
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    /// Surface point under the pixel; `None` when the ray misses the map.
    pub fn pick_surface(&self, screen: Vec2) -> Option<Vec3> {
        let ray = self.camera.screen_to_ray(screen)?;
        self.surface.intersect(ray)
    }

    /// Topmost visible entity under the pixel.
    pub fn pick(&self, screen: Vec2) -> Option<PickHit> {
        let ray = self.camera.screen_to_ray(screen)?;
        pick_ray(&self.world, ray, self.pick)
    }

    pub fn spawn_point(
        &mut self,
        position: Vec3,
        style: PointStyle,
        label: Option<Label>,
    ) -> EntityId {
        let entity = self.world.spawn();
        self.world.set_transform(entity, Transform::at(position));
        self.world.set_geometry(entity, Geometry::Point { style });
        if let Some(label) = label {
            self.world.set_label(entity, label);
        }
        entity
    }

    pub fn spawn_line(&mut self, positions: Dynamic<Vec<Vec3>>, style: LineStyle) -> EntityId {
        let entity = self.world.spawn();
        self.world
            .set_geometry(entity, Geometry::Line { positions, style });
        entity
    }

    pub fn spawn_polygon(
        &mut self,
        hierarchy: Dynamic<Vec<Vec3>>,
        style: PolygonStyle,
    ) -> EntityId {
        let entity = self.world.spawn();
        self.world
            .set_geometry(entity, Geometry::Polygon { hierarchy, style });
        entity
    }

    pub fn extract(&self) -> SceneSnapshot {
        let mut out = SceneSnapshot::default();

        for entity in self.world.entities() {
            if !self.world.is_visible(entity) {
                continue;
            }
            let Some(geometry) = self.world.geometry(entity) else {
                continue;
            };
            let label = self.world.label(entity).map(|l| l.text.clone());
            let anchor = self.world.transform(entity).map(|t| t.position);

            match geometry {
                Geometry::Point { .. } => {
                    let Some(position) = anchor else {
                        continue;
                    };
                    out.markers.push(MarkerSnapshot {
                        entity,
                        position,
                        label,
                    });
                }
                Geometry::Line { positions, .. } => out.lines.push(PathSnapshot {
                    entity,
                    name: self.world.name(entity).map(str::to_string),
                    vertices: positions.sample(),
                    label: label.zip(anchor),
                }),
                Geometry::Polygon { hierarchy, .. } => out.polygons.push(PathSnapshot {
                    entity,
                    name: self.world.name(entity).map(str::to_string),
                    vertices: hierarchy.sample(),
                    label: label.zip(anchor),
                }),
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::camera::Camera;
    use crate::components::{Label, LabelStyle, LineStyle, PointStyle, PolygonStyle};
    use crate::dynamic::Dynamic;
    use crate::picking::PickOptions;
    use foundation::math::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    #[test]
    fn pick_surface_and_entity_through_camera() {
        let mut scene = Scene::planar();
        assert_eq!(
            scene.pick_surface(Vec2::new(4.0, 2.0)),
            Some(Vec3::new(4.0, 2.0, 0.0))
        );

        let marker = scene.spawn_point(Vec3::new(4.0, 2.0, 0.0), PointStyle::default(), None);
        assert_eq!(scene.pick(Vec2::new(4.0, 2.0)).map(|h| h.entity), Some(marker));
        assert!(scene.pick(Vec2::new(40.0, 2.0)).is_none());
    }

    #[test]
    fn panned_camera_and_wider_marker_radius() {
        let mut scene = Scene::planar().with_pick_options(PickOptions {
            marker_radius: 3.0,
            ..PickOptions::default()
        });
        scene.set_camera(Camera::Planar {
            origin: Vec2::new(100.0, 0.0),
            units_per_px: 1.0,
            height: 1000.0,
        });
        assert_eq!(
            scene.pick_surface(Vec2::new(4.0, 2.0)),
            Some(Vec3::new(104.0, 2.0, 0.0))
        );

        let marker = scene.spawn_point(Vec3::new(100.0, 0.0, 0.0), PointStyle::default(), None);
        assert_eq!(scene.pick(Vec2::new(2.0, 0.0)).map(|h| h.entity), Some(marker));
    }

    #[test]
    fn extract_groups_by_geometry_kind() {
        let mut scene = Scene::planar();
        scene.spawn_point(
            Vec3::ZERO,
            PointStyle::default(),
            Some(Label::new("1", LabelStyle::default())),
        );
        let line = scene.spawn_line(
            Dynamic::Static(vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]),
            LineStyle::default(),
        );
        scene.world_mut().set_name(line, "7polyline");
        scene.spawn_polygon(
            Dynamic::Static(vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]),
            PolygonStyle::default(),
        );

        let snap = scene.extract();
        assert_eq!(snap.markers.len(), 1);
        assert_eq!(snap.markers[0].label.as_deref(), Some("1"));
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.lines[0].name.as_deref(), Some("7polyline"));
        assert_eq!(snap.polygons[0].vertices.len(), 3);
        assert_eq!(snap.polygons[0].label, None);
    }
}
