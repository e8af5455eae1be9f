use foundation::math::precision::round_to;
use foundation::math::{Geodetic, Vec2, Vec3};
use scene::components::{Label, LabelStyle, LineStyle, PolygonStyle};
use scene::dynamic::Dynamic;
use scene::entity::EntityId;
use scene::input::{CursorStyle, InputKind, InputOwner, PointerEvent};
use tracing::{debug, info};

use crate::adapter::{SceneAdapter, bind_all, release_all};
use crate::config::CaptureConfig;
use crate::error::CaptureError;
use crate::measure::{GeoReadout, polygon_centroid, shoelace_area};

/// A committed region polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub polygon: EntityId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegionOutcome {
    Ignored,
    PointAdded {
        points: usize,
    },
    Previewed {
        points: usize,
    },
    Committed {
        index: usize,
        name: String,
        count: usize,
    },
    Discarded {
        points: usize,
    },
    Cancelled,
}

/// Closed-area capture on lon/lat pairs.
///
/// Each click adds a pair rounded to four decimals. The single preview
/// primitive is rebuilt on every click and move: a line for two points, a
/// polygon from three on.
#[derive(Debug)]
pub struct RegionCapture {
    owner: InputOwner,
    prefix: String,
    min_points: usize,
    line_style: LineStyle,
    polygon_style: PolygonStyle,
    label_style: LabelStyle,
    capturing: bool,
    coordinates: Vec<[f64; 2]>,
    preview: Option<EntityId>,
    regions: Vec<Region>,
    visible: bool,
}

impl RegionCapture {
    pub fn new(owner: InputOwner, config: &CaptureConfig) -> Self {
        Self {
            owner,
            prefix: config.region_prefix.clone(),
            min_points: config.min_region_points,
            line_style: config.styles.region_line.clone(),
            polygon_style: config.styles.region_polygon.clone(),
            label_style: config.styles.region_label.clone(),
            capturing: false,
            coordinates: Vec::new(),
            preview: None,
            regions: Vec::new(),
            visible: true,
        }
    }

    pub fn owner(&self) -> InputOwner {
        self.owner
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Pairs accumulated so far, `[lon, lat]` in degrees.
    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.coordinates
    }

    pub fn preview(&self) -> Option<EntityId> {
        self.preview
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn regions_visible(&self) -> bool {
        self.visible
    }

    pub fn start<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if self.capturing {
            self.cancel(scene);
        }
        bind_all(scene, self.owner);
        self.coordinates.clear();
        self.capturing = true;
        scene.set_cursor(CursorStyle::Crosshair);
        debug!("region capture started");
    }

    pub fn handle<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        event: PointerEvent,
    ) -> Result<RegionOutcome, CaptureError> {
        match event.kind {
            InputKind::PrimaryClick => Ok(self.on_primary_click(scene, event.position)),
            InputKind::PointerMove => Ok(self.on_pointer_move(scene, event.position)),
            InputKind::SecondaryClick => self.on_secondary_click(scene),
        }
    }

    pub fn on_primary_click<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        screen: Vec2,
    ) -> RegionOutcome {
        if !self.capturing {
            return RegionOutcome::Ignored;
        }
        let Some(geo) = scene.pick_geographic(screen) else {
            return RegionOutcome::Ignored;
        };
        self.coordinates.push(readout_pair(geo));
        let coordinates = self.coordinates.clone();
        self.redraw(scene, &coordinates);
        RegionOutcome::PointAdded {
            points: self.coordinates.len(),
        }
    }

    /// Preview with the cursor appended as a tentative last point.
    pub fn on_pointer_move<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
        screen: Vec2,
    ) -> RegionOutcome {
        if !self.capturing || self.coordinates.is_empty() {
            return RegionOutcome::Ignored;
        }
        let Some(geo) = scene.pick_geographic(screen) else {
            return RegionOutcome::Ignored;
        };
        let mut tentative = self.coordinates.clone();
        tentative.push(readout_pair(geo));
        self.redraw(scene, &tentative);
        RegionOutcome::Previewed {
            points: tentative.len(),
        }
    }

    /// Finish the capture: commit a polygon if enough points were placed,
    /// otherwise drop them silently.
    pub fn on_secondary_click<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<RegionOutcome, CaptureError> {
        if !self.capturing {
            return Ok(RegionOutcome::Ignored);
        }
        self.remove_preview(scene);

        let points = self.coordinates.len();
        let result = if points >= self.min_points {
            self.commit(scene)
        } else {
            debug!(points, "region discarded");
            Ok(RegionOutcome::Discarded { points })
        };
        self.finish(scene);
        result
    }

    pub fn cancel<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) -> RegionOutcome {
        if !self.capturing {
            return RegionOutcome::Ignored;
        }
        self.remove_preview(scene);
        self.finish(scene);
        RegionOutcome::Cancelled
    }

    /// Per-vertex readout of a committed region, read back from the scene.
    pub fn region_positions<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        index: usize,
    ) -> Result<Vec<GeoReadout>, CaptureError> {
        let ring = self.rendered_ring(scene, index)?;
        let height = scene.camera_height();
        Ok(ring
            .into_iter()
            .map(|p| GeoReadout::new(scene.world_to_geographic(p), height))
            .collect())
    }

    /// Planar shoelace area over the committed polygon's world coordinates.
    pub fn region_area<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        index: usize,
    ) -> Result<f64, CaptureError> {
        Ok(shoelace_area(&self.rendered_ring(scene, index)?))
    }

    /// Show or hide every region, including ones committed later.
    pub fn set_regions_visible<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, visible: bool) {
        self.visible = visible;
        for region in &self.regions {
            scene.set_visible(region.polygon, visible);
        }
    }

    fn commit<S: SceneAdapter + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<RegionOutcome, CaptureError> {
        let name = format!("{} {}", self.prefix, self.regions.len() + 1);
        let ring = to_world(&*scene, &self.coordinates);
        let polygon = scene.add_polygon(Some(&name), Dynamic::Static(ring), &self.polygon_style);

        // The label goes at the centroid of what the host actually rendered.
        let rendered = scene
            .positions(polygon)
            .ok_or(CaptureError::MissingPositions(polygon))?;
        let lonlat: Vec<Vec2> = rendered
            .iter()
            .map(|p| {
                let geo = scene.world_to_geographic(*p);
                Vec2::new(geo.lon_deg(), geo.lat_deg())
            })
            .collect();
        if let Some(center) = polygon_centroid(&lonlat) {
            let anchor = scene.geographic_to_world(Geodetic::from_degrees(center.x, center.y, 0.0));
            let label = Label::new(name.clone(), self.label_style.clone());
            scene.set_label_anchor(polygon, label, anchor);
        }
        if !self.visible {
            scene.set_visible(polygon, false);
        }

        self.regions.push(Region {
            name: name.clone(),
            polygon,
        });
        let count = self.regions.len();
        info!(%name, count, "region committed");
        Ok(RegionOutcome::Committed {
            index: count - 1,
            name,
            count,
        })
    }

    fn finish<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        release_all(scene, self.owner);
        self.coordinates.clear();
        self.capturing = false;
        scene.set_cursor(CursorStyle::Pointer);
    }

    fn redraw<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S, points: &[[f64; 2]]) {
        self.remove_preview(scene);
        let world = to_world(&*scene, points);
        self.preview = match world.len() {
            0 | 1 => None,
            2 => Some(scene.add_line(None, Dynamic::Static(world), &self.line_style)),
            _ => Some(scene.add_polygon(None, Dynamic::Static(world), &self.polygon_style)),
        };
    }

    fn remove_preview<S: SceneAdapter + ?Sized>(&mut self, scene: &mut S) {
        if let Some(preview) = self.preview.take() {
            scene.remove_entity(preview);
        }
    }

    fn rendered_ring<S: SceneAdapter + ?Sized>(
        &self,
        scene: &S,
        index: usize,
    ) -> Result<Vec<Vec3>, CaptureError> {
        let region = self
            .regions
            .get(index)
            .ok_or(CaptureError::UnknownRegion(index))?;
        scene
            .positions(region.polygon)
            .ok_or(CaptureError::MissingPositions(region.polygon))
    }
}

fn readout_pair(geo: Geodetic) -> [f64; 2] {
    [round_to(geo.lon_deg(), 4), round_to(geo.lat_deg(), 4)]
}

fn to_world<S: SceneAdapter + ?Sized>(scene: &S, points: &[[f64; 2]]) -> Vec<Vec3> {
    points
        .iter()
        .map(|&[lon, lat]| scene.geographic_to_world(Geodetic::from_degrees(lon, lat, 0.0)))
        .collect()
}
