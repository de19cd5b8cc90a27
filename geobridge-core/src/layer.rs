use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::tiles;
use crate::view::ViewportSize;
use crate::LonLat;

pub const DEFAULT_WMS_NAME: &str = "OpenLayers WMS";
pub const DEFAULT_WMS_URL: &str = "http://labs.metacarta.com/wms/vmap0";
pub const DEFAULT_WMS_LAYERS: &str = "basic";

/// Where a layer's imagery comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TileSource {
    /// OGC Web Map Service, one GetMap image per view.
    Wms {
        url: String,
        layers: String,
        #[serde(default = "default_format")]
        format: String,
        #[serde(default = "default_srs")]
        srs: String,
        #[serde(default = "default_version")]
        version: String,
    },
    /// `{z}/{x}/{y}` tile server.
    Xyz { url_template: String },
}

fn default_format() -> String {
    "image/png".to_owned()
}

fn default_srs() -> String {
    "EPSG:4326".to_owned()
}

fn default_version() -> String {
    "1.1.1".to_owned()
}

impl TileSource {
    pub fn wms(url: &str, layers: &str) -> Self {
        TileSource::Wms {
            url: url.to_owned(),
            layers: layers.to_owned(),
            format: default_format(),
            srs: default_srs(),
            version: default_version(),
        }
    }

    pub fn osm() -> Self {
        TileSource::Xyz {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    pub source: TileSource,
    /// Extent covered by the layer's data.
    #[serde(default)]
    pub extent: BoundingBox,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl TileLayer {
    pub fn new(name: &str, source: TileSource) -> Self {
        TileLayer {
            name: name.to_owned(),
            source,
            extent: BoundingBox::MAX_EXTENT,
            visible: true,
        }
    }

    /// Url a renderer fetches to draw this layer for the given view.
    ///
    /// WMS layers get one GetMap image for `bbox` stretched to the viewport
    /// ratio; XYZ layers get the tile under `center`.
    pub fn request_url(
        &self,
        bbox: &BoundingBox,
        center: LonLat,
        size: ViewportSize,
        zoom: u8,
    ) -> String {
        match &self.source {
            TileSource::Wms {
                url,
                layers,
                format,
                srs,
                version,
            } => {
                let bbox = bbox.fit_to(size.width, size.height);
                let separator = if url.contains('?') { '&' } else { '?' };
                let layers = encode_query_value(layers);
                let format = encode_query_value(format);
                let srs = encode_query_value(srs);
                let version = encode_query_value(version);
                format!(
                    "{url}{separator}SERVICE=WMS&VERSION={version}&REQUEST=GetMap\
                     &LAYERS={layers}&STYLES=&SRS={srs}&BBOX={bbox}\
                     &WIDTH={}&HEIGHT={}&FORMAT={format}&TRANSPARENT=TRUE",
                    size.width, size.height,
                )
            }
            TileSource::Xyz { url_template } => {
                let (x, y) = tiles::deg2num(center.lat, center.lon, zoom);
                tiles::tile_url(url_template, x, y, zoom)
            }
        }
    }
}

/// Percent-encodes a query value, keeping unreserved characters and `:/,`.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b':'
            | b'/' | b',' => encoded.push(char::from(byte)),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

impl Default for TileLayer {
    fn default() -> Self {
        TileLayer::new(
            DEFAULT_WMS_NAME,
            TileSource::wms(DEFAULT_WMS_URL, DEFAULT_WMS_LAYERS),
        )
    }
}

/// UI controls attached to a map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Lets the user pick the visible base layer.
    LayerSwitcher,
}
