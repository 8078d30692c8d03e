//! Warp-rate chart widget, drawn with Plotters into the Ratatui buffer.
//!
//! Plotters gives us proper axis scaling and line clipping for free; the
//! `plotters-ratatui-backend` crate adapts its drawing primitives onto the
//! terminal cell grid.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only description of one warp-rate chart.
///
/// The series and bounds are computed by the caller; `render()` just draws.
pub struct WarpPlottersChart<'a> {
    /// Per-year warp rates as `(year, days)`, drawn as a line plus markers.
    pub series: &'a [(f64, f64)],
    /// Draw the zero-shift baseline when it falls inside `y_bounds`.
    pub zero_line: bool,
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds (day shift).
    pub y_bounds: [f64; 2],
    /// Axis captions.
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Tick label formatting.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for WarpPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters can fail to build a chart in a tiny area; show a hint
        // instead of panicking inside the draw call.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let finite = x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite();
        if !finite || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Label areas stay compact; terminal cells are coarse.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines turn into noise at terminal resolution, so only the
            // axes and tick labels are drawn.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let rate_color = RGBColor(0, 255, 255); // cyan
            let zero_color = RGBColor(128, 128, 128); // gray

            // Zero baseline first so the series draws over it.
            if self.zero_line && y0 < 0.0 && 0.0 < y1 {
                chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &zero_color))?;
            }

            chart.draw_series(LineSeries::new(self.series.iter().copied(), &rate_color))?;

            // Per-year markers as single pixels. `Circle` is avoided: the
            // ratatui backend maps circle radii into normalized canvas units,
            // so even radius 1 covers a large part of the chart.
            chart.draw_series(self.series.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
