// Copyright 2025 the Rasterline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders a small synthetic map tile and saves it as a binary PPM.
//!
//! Run with `RUST_LOG=debug` to see what every draw does.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kurbo::{Cap, Join};
use log::info;
use rasterline::{CompOp, LineStyle, MarkerShape, PointStyle, PolyStyle, Rgba8, Session};
use rasterline_geometry::{ByteOrder, ConvCurve, PathStorage, decode_path, encode_path};

/// Render a sample scene with Rasterline.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image width in pixels
    #[arg(short = 'W', long, default_value = "256")]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value = "256")]
    height: u32,

    /// Output PPM file
    #[arg(short, long, default_value = "tile.ppm")]
    output: PathBuf,

    /// Marker shape for the points of interest
    #[arg(long, default_value = "triangle_up")]
    marker: String,

    /// Operator used to composite the overlay layer
    #[arg(long, default_value = "multiply")]
    overlay_op: String,

    /// Opacity of the overlay layer
    #[arg(long, default_value = "0.6")]
    overlay_opacity: f64,
}

/// Scene coordinates span `0..=100` in both directions.
const SCENE: f64 = 100.0;

fn polygon(points: &[(f64, f64)]) -> PathStorage {
    let mut path = PathStorage::with_capacity(points.len() + 1);
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_polygon();
    path
}

fn polyline(points: &[(f64, f64)]) -> PathStorage {
    let mut path = PathStorage::with_capacity(points.len());
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = Session::new();
    let base = session
        .create_buffer(args.width, args.height)
        .context("allocating the base layer")?;
    let overlay = session
        .create_buffer(args.width, args.height)
        .context("allocating the overlay layer")?;
    let pipeline = session.create_pipeline();
    let sx = f64::from(args.width) / SCENE;
    let sy = f64::from(args.height) / SCENE;
    session.set_transform(pipeline, sx, sy, 0.0, 0.0)?;
    info!("rendering {}x{} tile", args.width, args.height);

    // Land use.
    session.set_background(base, Rgba8::rgb(242, 239, 233))?;
    let mut park = polygon(&[(5.0, 8.0), (42.0, 5.0), (47.0, 38.0), (12.0, 45.0)]);
    let park_style = PolyStyle::fill(Rgba8::rgb(200, 230, 180))
        .with_line(LineStyle::new(Rgba8::rgb(120, 170, 100), 1.5));
    session.draw_polygon(pipeline, Some(base), &mut park, 0, &park_style)?;

    // The lake goes through the binary path format, as a host binding would.
    let mut lake = PathStorage::new();
    lake.move_to((60.0, 55.0));
    lake.quad_to((95.0, 50.0), (90.0, 80.0));
    lake.quad_to((70.0, 98.0), (58.0, 78.0));
    lake.close_polygon();
    let flat = {
        let mut curve = ConvCurve::with_tolerance(&mut lake, 0.05);
        encode_path(&mut curve, 0, ByteOrder::LittleEndian)
    };
    let mut lake = decode_path(&flat, ByteOrder::LittleEndian)?;
    session.draw_polygon(
        pipeline,
        Some(base),
        &mut lake,
        0,
        &PolyStyle::fill(Rgba8::rgb(170, 210, 240)),
    )?;

    // Roads: casing first, then the fill on top.
    let mut road = polyline(&[(0.0, 60.0), (30.0, 55.0), (55.0, 30.0), (100.0, 25.0)]);
    let casing = LineStyle::new(Rgba8::rgb(150, 150, 150), 7.0)
        .with_join(Join::Round)
        .with_cap(Cap::Butt);
    let fill = LineStyle::new(Rgba8::WHITE, 5.0).with_join(Join::Round);
    session.draw_line(pipeline, Some(base), &mut road, 0, &casing)?;
    session.draw_line(pipeline, Some(base), &mut road, 0, &fill)?;

    let mut trail = polyline(&[(10.0, 95.0), (25.0, 75.0), (40.0, 90.0), (52.0, 70.0)]);
    let trail_style = LineStyle::new(Rgba8::rgb(160, 80, 40), 1.5)
        .with_dash(&[(4.0, 2.0), (1.0, 2.0)])
        .with_cap(Cap::Round);
    session.draw_line(pipeline, Some(base), &mut trail, 0, &trail_style)?;

    let mut pois = polyline(&[(20.0, 20.0), (35.0, 30.0), (75.0, 65.0)]);
    let marker = MarkerShape::from_name(&args.marker);
    let poi_style = PointStyle::new(marker, Rgba8::rgb(200, 40, 40), 10.0, 10.0)
        .with_line(LineStyle::new(Rgba8::BLACK, 1.0));
    session.draw_point(pipeline, Some(base), &mut pois, 0, &poi_style)?;

    // A translucent hillshade band, blended in as a separate layer.
    session.set_background(overlay, Rgba8::TRANSPARENT)?;
    let mut band = polygon(&[(0.0, 70.0), (100.0, 40.0), (100.0, 55.0), (0.0, 85.0)]);
    let band_style = PolyStyle::fill(Rgba8::new(90, 90, 120, 160)).with_comp_op(CompOp::Src);
    session.draw_polygon(pipeline, Some(overlay), &mut band, 0, &band_style)?;
    session.composite(base, overlay, &args.overlay_op, args.overlay_opacity)?;

    session
        .write_ppm(base, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    session.dispose_buffer(overlay)?;
    session.dispose_buffer(base)?;
    session.dispose_pipeline(pipeline)?;
    Ok(())
}
