use clap::Parser;
use geobridge_core::{BoundingBox, Direction, LonLat, TileSource};
use geobridge_utils::{Verb, DEFAULT_ENDPOINT};

use super::{build_map, send_request, Args, MapArgs, RequestArgs, Settings};

fn write_config(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test_log::test]
fn settings_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.request.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.request.http_timeout_ms, None);
    assert_eq!(settings.map.container, "map");
    assert_eq!(settings.map.layer.name, "OpenLayers WMS");
}

#[test_log::test]
fn settings_from_file() -> anyhow::Result<()> {
    let path = write_config(
        "geobridge-settings-full.toml",
        r#"
[request]
endpoint = "http://10.0.0.2:8080"
http_timeout_ms = 1500

[map]
container = "world"

[map.size]
width = 400
height = 400

[map.layer]
name = "osm"

[map.layer.source]
kind = "xyz"
url_template = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
"#,
    );

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.request.endpoint, "http://10.0.0.2:8080");
    assert_eq!(settings.request.http_timeout_ms, Some(1500));
    assert_eq!(settings.map.container, "world");
    assert_eq!(settings.map.size.width, 400);
    assert_eq!(settings.map.layer.source, TileSource::osm());
    assert!(settings.map.layer.visible);
    Ok(())
}

#[test_log::test]
fn settings_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let path = write_config(
        "geobridge-settings-partial.toml",
        r#"
[map]
container = "canvas"
"#,
    );

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.request.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(settings.map.container, "canvas");
    assert_eq!(settings.map.size.height, 600);
    Ok(())
}

#[test_log::test]
fn parse_request_args() {
    let Args::Request(args) =
        Args::try_parse_from(["geobridge", "request", "update", "--payload", "a=b"]).unwrap()
    else {
        panic!("expected request command");
    };
    assert_eq!(args.verb, Verb::Update);
    assert_eq!(args.payload.as_deref(), Some("a=b"));

    assert!(Args::try_parse_from(["geobridge", "request", "PATCH"]).is_err());
}

#[test_log::test]
fn parse_map_args() {
    let Args::Map(args) = Args::try_parse_from([
        "geobridge", "map", "--pan", "-122.4,37.7", "-z", "2", "-s", "north", "-s", "w",
    ])
    .unwrap() else {
        panic!("expected map command");
    };
    assert_eq!(args.pan, Some(LonLat::new(-122.4, 37.7)));
    assert_eq!(args.zoom_in, 2);
    assert_eq!(args.step, vec![Direction::North, Direction::West]);
}

#[test_log::test]
fn map_report_follows_navigation() -> anyhow::Result<()> {
    let settings = Settings::default();
    let report = build_map(
        &settings,
        &MapArgs {
            pan: Some(LonLat::new(10.0, 0.0)),
            zoom_in: 1,
            step: vec![Direction::South],
        },
    )?;

    assert_eq!(report.view.zoom(), 1);
    assert_eq!(report.view.extent(), BoundingBox::new(-80.0, -54.0, 100.0, 36.0));
    assert_eq!(report.view.layers().len(), 1);
    assert_eq!(report.view.controls().len(), 1);
    assert_eq!(report.tile_requests.len(), 1);

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["view"]["container"], "map");
    assert_eq!(json["view"]["controls"][0], "layer_switcher");
    Ok(())
}

#[test_log::test]
fn map_rejects_bad_pan() {
    let result = build_map(
        &Settings::default(),
        &MapArgs {
            pan: Some(LonLat::new(200.0, 0.0)),
            zoom_in: 0,
            step: Vec::new(),
        },
    );
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn request_to_closed_endpoint_fails() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let mut settings = Settings::default();
    settings.request.endpoint = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let result = send_request(
        &settings,
        RequestArgs {
            verb: Verb::Get,
            payload: None,
        },
    )
    .await;
    assert!(result.is_err());
    Ok(())
}

#[test_log::test]
fn shipped_config_matches_defaults() -> anyhow::Result<()> {
    let settings = Settings::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/geobridge.toml"))?;
    assert_eq!(settings, Settings::default());
    Ok(())
}

#[test_log::test]
fn settings_layering() -> anyhow::Result<()> {
    let path = write_config(
        "geobridge-settings-layering.toml",
        r#"
[request]
endpoint = "http://10.0.0.3:8080"

[map]
container = "canvas"
"#,
    );

    std::env::set_var("GEOBRIDGE_CONFIG_FILE", &path);
    std::env::set_var("GEOBRIDGE__REQUEST__ENDPOINT", "http://10.1.1.1:9");
    let result = Settings::new();
    std::env::remove_var("GEOBRIDGE_CONFIG_FILE");
    std::env::remove_var("GEOBRIDGE__REQUEST__ENDPOINT");

    let settings = result?;
    // env beats file
    assert_eq!(settings.request.endpoint, "http://10.1.1.1:9");
    // file beats defaults
    assert_eq!(settings.map.container, "canvas");
    // untouched keys keep defaults
    assert_eq!(settings.map.size.width, 800);
    assert_eq!(settings.map.layer, Settings::default().map.layer);
    Ok(())
}
