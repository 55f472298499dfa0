// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;
use crate::quantile::QuantileSeries;

use plotters::prelude::*;

use std::path::Path;

const LINE: RGBColor = BLUE;
const LINE_WIDTH: u32 = 2;

/// Rendering options for the CDF image. The defaults draw a single blue
/// series labeled `latency` on a 640x480 canvas.
#[derive(Clone, Debug)]
pub struct PlotConfig {
    caption: Option<String>,
    label: String,
    x_desc: String,
    y_desc: String,
    size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            caption: None,
            label: "latency".to_owned(),
            x_desc: "latency".to_owned(),
            y_desc: "percentile".to_owned(),
            size: (640, 480),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = Some(caption.as_ref().to_owned());
        self
    }

    pub fn label(&mut self, label: impl AsRef<str>) -> &mut Self {
        self.label = label.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    pub fn get_size(&self) -> (u32, u32) {
        self.size
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }

    /// Draws `series` with latency on the x-axis and percentile on the y-axis
    /// and writes it as a PNG to `path`, replacing any existing file.
    ///
    /// The image is drawn into a temporary file beside `path` and only moved
    /// into place once drawing succeeded, so a failed render leaves `path`
    /// untouched.
    pub fn render(&self, series: &QuantileSeries, path: &Path) -> Result<(), Error> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let scratch = tempfile::Builder::new()
            .prefix(".cdf")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| Error::io(dir, e))?;

        // the backend is dropped, and the image flushed, before draw returns
        self.draw(series, scratch.path()).map_err(|e| Error::Render {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        scratch
            .persist(path)
            .map_err(|e| Error::io(path, e.error))?;
        Ok(())
    }

    fn draw(
        &self,
        series: &QuantileSeries,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (min, max) = x_range(series);

        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut builder = ChartBuilder::on(&root);
        builder
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40);
        if let Some(caption) = &self.caption {
            builder.caption(caption, ("sans-serif", 24));
        }
        let mut chart = builder.build_cartesian_2d(min..max, 0.0..100.0)?;

        chart
            .configure_mesh()
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc)
            .draw()?;

        let points = series.points().iter().map(|p| (p.latency, p.percentile));
        chart
            .draw_series(LineSeries::new(points, LINE.stroke_width(LINE_WIDTH)))?
            .label(&self.label)
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], LINE.stroke_width(LINE_WIDTH))
            });

        // the curve climbs from the lower left, leaving the lower right empty
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

/// Latency range of the x-axis, widened when every point shares one value.
fn x_range(series: &QuantileSeries) -> (f64, f64) {
    let min = series.min_latency();
    let max = series.max_latency();
    if max > min {
        (min, max)
    } else {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
        (min - pad, max + pad)
    }
}
