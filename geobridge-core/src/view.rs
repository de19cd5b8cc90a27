use serde::{Deserialize, Serialize};

use crate::bbox::{BoundingBox, Direction};
use crate::layer::{Control, TileLayer};
use crate::tiles::MAX_ZOOM;
use crate::{LonLat, MapError};

#[cfg(feature = "tracing")]
use std::time::Instant;

pub const DEFAULT_CONTAINER: &str = "map";

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        ViewportSize {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Name of the element the view renders into.
    pub container: String,
    pub size: ViewportSize,
    /// The single layer attached on init.
    pub layer: TileLayer,
}

impl Default for MapSettings {
    fn default() -> Self {
        MapSettings {
            container: DEFAULT_CONTAINER.to_owned(),
            size: ViewportSize::default(),
            layer: TileLayer::default(),
        }
    }
}

/// State of one map view: where it renders, what it shows and where it
/// looks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    container: String,
    size: ViewportSize,
    center: LonLat,
    extent: BoundingBox,
    zoom: u8,
    layers: Vec<TileLayer>,
    controls: Vec<Control>,
}

impl MapView {
    /// Empty view bound to `container`, showing the whole world.
    pub fn new(container: &str, size: ViewportSize) -> Result<Self, MapError> {
        if container.trim().is_empty() {
            return Err(MapError::MissingContainer);
        }
        Ok(MapView {
            container: container.to_owned(),
            size,
            center: BoundingBox::MAX_EXTENT.center(),
            extent: BoundingBox::MAX_EXTENT,
            zoom: 0,
            layers: Vec::new(),
            controls: Vec::new(),
        })
    }

    /// Binds a view to the configured container, attaches the configured
    /// tile layer and a layer switcher, then zooms to the maximum extent.
    pub fn init(settings: &MapSettings) -> Result<Self, MapError> {
        #[cfg(feature = "tracing")]
        let now = Instant::now();

        let mut view = MapView::new(&settings.container, settings.size)?;
        view.add_layer(settings.layer.clone());
        view.add_control(Control::LayerSwitcher);
        view.zoom_to_max_extent();

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Map view on '{}' ready with layer '{}'. took {}us",
            view.container,
            settings.layer.name,
            now.elapsed().as_micros()
        );

        Ok(view)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn center(&self) -> LonLat {
        self.center
    }

    pub fn extent(&self) -> BoundingBox {
        self.extent
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Appends a base layer. It starts hidden when another layer is already
    /// visible; use [`MapView::switch_base_layer`] to show it.
    pub fn add_layer(&mut self, mut layer: TileLayer) {
        if self.layers.iter().any(|layer| layer.visible) {
            layer.visible = false;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("Add layer '{}'", layer.name);
        self.layers.push(layer);
    }

    pub fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    /// Makes `name` the only visible layer.
    pub fn switch_base_layer(&mut self, name: &str) -> Result<(), MapError> {
        if !self.layers.iter().any(|layer| layer.name == name) {
            return Err(MapError::UnknownLayer(name.to_owned()));
        }
        for layer in self.layers.iter_mut() {
            layer.visible = layer.name == name;
        }
        Ok(())
    }

    /// Shows the merged extent of all layers, or the world when there are
    /// none.
    pub fn zoom_to_max_extent(&mut self) {
        let extent = self
            .layers
            .iter()
            .map(|layer| layer.extent)
            .reduce(|mut acc, extent| {
                acc.merge(&extent);
                acc
            })
            .unwrap_or(BoundingBox::MAX_EXTENT);
        self.extent = extent;
        self.center = extent.center();
        self.zoom = 0;
    }

    /// Re-centers the view on exactly `center`, keeping the extent size.
    pub fn pan_to(&mut self, center: LonLat) -> Result<(), MapError> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinate(center.to_string()));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("Pan '{}' to {center}", self.container);
        self.extent = self.extent.centered_on(center);
        self.center = center;
        Ok(())
    }

    /// Moves the view one navigation step.
    pub fn step(&mut self, direction: Direction) {
        self.extent.step(direction);
        self.center = self.extent.center();
    }

    pub fn zoom_in(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom += 1;
            self.extent = self.extent.scaled(0.5).centered_on(self.center);
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom > 0 {
            self.zoom -= 1;
            self.extent = self.extent.scaled(2.0).centered_on(self.center);
        }
    }

    /// One request url per visible layer for the current view.
    pub fn tile_requests(&self) -> Vec<String> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .map(|layer| layer.request_url(&self.extent, self.center, self.size, self.zoom))
            .collect()
    }
}
