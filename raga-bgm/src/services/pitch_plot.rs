//! Pitch contour plot rendered as SVG
//!
//! The plot carries no text (titles and axis labels live in the HTML or
//! the file name), so no font backend is needed.

use crate::error::{BgmError, BgmResult};
use plotters::prelude::*;
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (900, 320);
const CONTOUR_COLOR: RGBColor = RGBColor(128, 0, 128);

/// Render the pitch trace (index on x, Hz on y) to an SVG document
pub fn render_pitch_plot_svg(pitches: &[f32]) -> BgmResult<String> {
    let plot_err = |e: &dyn std::fmt::Display| BgmError::Plot(e.to_string());

    let x_max = (pitches.len().max(2) - 1) as f32;
    let y_max = pitches.iter().copied().fold(0.0f32, f32::max).max(1.0) * 1.05;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PLOT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| plot_err(&e))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(0f32..x_max, 0f32..y_max)
            .map_err(|e| plot_err(&e))?;

        chart
            .draw_series(LineSeries::new(
                pitches.iter().enumerate().map(|(i, &p)| (i as f32, p)),
                &CONTOUR_COLOR,
            ))
            .map_err(|e| plot_err(&e))?;

        root.present().map_err(|e| plot_err(&e))?;
    }

    Ok(svg)
}

/// Render and write the pitch contour plot to `path`
pub fn write_pitch_plot(pitches: &[f32], path: &Path) -> BgmResult<()> {
    let svg = render_pitch_plot_svg(pitches)?;
    std::fs::write(path, svg)?;
    tracing::info!(path = %path.display(), points = pitches.len(), "Pitch plot written");
    Ok(())
}
