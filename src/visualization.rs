//! # Visualization
//!
//! $$
//! \{(x_i, y_i)\}_{i=1}^n \mapsto \text{annotated line charts on shared pages}
//! $$
//!
//! Thin builders over `plotly`. A [`LineChart`] renders on its own or as one
//! panel of a [`GridPlotter`] page; pages can be stitched into a single
//! printable document with [`write_document`].
//!
use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use ndarray::Array1;
use plotly::common::Anchor;
use plotly::common::DashType;
use plotly::common::Fill;
use plotly::common::Font;
use plotly::common::Line;
use plotly::common::Marker;
use plotly::common::Mode;
use plotly::layout::Annotation;
use plotly::layout::Axis;
use plotly::layout::GridPattern;
use plotly::layout::LayoutGrid;
use plotly::layout::Margin;
use plotly::layout::Shape;
use plotly::layout::ShapeLine;
use plotly::layout::ShapeType;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;

use crate::quant::strategies::StrategyProfile;
use crate::traits::PayoffExt;

/// Default standalone chart size in pixels (9x6 inches at 150 dpi).
pub const CHART_WIDTH: usize = 1350;
pub const CHART_HEIGHT: usize = 900;

const DARK_BACKGROUND: &str = "#111111";
const DARK_FOREGROUND: &str = "#e6e6e6";
const DARK_GRID: &str = "rgba(255,255,255,0.25)";
const LIGHT_GRID: &str = "rgba(128,128,128,0.3)";

/// Color theme of a chart.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  fn apply(self, layout: Layout) -> Layout {
    match self {
      Theme::Light => layout,
      Theme::Dark => layout
        .paper_background_color(DARK_BACKGROUND)
        .plot_background_color(DARK_BACKGROUND)
        .font(Font::new().color(DARK_FOREGROUND)),
    }
  }

  fn grid_color(self) -> &'static str {
    match self {
      Theme::Light => LIGHT_GRID,
      Theme::Dark => DARK_GRID,
    }
  }

  fn label_background(self) -> &'static str {
    match self {
      Theme::Light => "rgba(255,255,255,0.9)",
      Theme::Dark => "rgba(0,0,0,0.6)",
    }
  }
}

#[derive(Clone, Debug)]
struct Series {
  label: String,
  x: Array1<f64>,
  y: Array1<f64>,
  dash: DashType,
  width: f64,
  color: Option<String>,
  fill: Option<String>,
  show_legend: bool,
}

#[derive(Clone, Debug)]
struct VLine {
  x: f64,
  dash: DashType,
  color: Option<String>,
}

#[derive(Clone, Debug)]
struct Note {
  x: f64,
  y: f64,
  text: String,
  arrow: bool,
}

#[derive(Clone, Debug)]
struct Point {
  x: f64,
  y: f64,
  color: String,
}

/// Line chart with vertical markers, a zero line, point markers and notes.
#[derive(Clone, Debug)]
pub struct LineChart {
  title: String,
  x_label: String,
  y_label: String,
  series: Vec<Series>,
  vlines: Vec<VLine>,
  notes: Vec<Note>,
  points: Vec<Point>,
  zero_line: bool,
  x_range: Option<(f64, f64)>,
  y_range: Option<(f64, f64)>,
  theme: Theme,
}

impl LineChart {
  pub fn new(title: &str) -> Self {
    Self {
      title: title.into(),
      x_label: String::new(),
      y_label: String::new(),
      series: Vec::new(),
      vlines: Vec::new(),
      notes: Vec::new(),
      points: Vec::new(),
      zero_line: false,
      x_range: None,
      y_range: None,
      theme: Theme::Light,
    }
  }

  pub fn x_label(mut self, label: &str) -> Self {
    self.x_label = label.into();
    self
  }

  pub fn y_label(mut self, label: &str) -> Self {
    self.y_label = label.into();
    self
  }

  pub fn theme(mut self, theme: Theme) -> Self {
    self.theme = theme;
    self
  }

  /// Solid line.
  pub fn line(self, label: &str, x: &Array1<f64>, y: &Array1<f64>) -> Self {
    self.styled_line(label, x, y, DashType::Solid, 2.0, None)
  }

  pub fn styled_line(
    mut self,
    label: &str,
    x: &Array1<f64>,
    y: &Array1<f64>,
    dash: DashType,
    width: f64,
    color: Option<&str>,
  ) -> Self {
    self.series.push(Series {
      label: label.into(),
      x: x.clone(),
      y: y.clone(),
      dash,
      width,
      color: color.map(String::from),
      fill: None,
      show_legend: true,
    });
    self
  }

  /// Shade the area between `y` and zero.
  pub fn fill_to_zero(mut self, x: &Array1<f64>, y: &Array1<f64>, color: &str) -> Self {
    self.series.push(Series {
      label: String::new(),
      x: x.clone(),
      y: y.clone(),
      dash: DashType::Solid,
      width: 0.0,
      color: Some(color.into()),
      fill: Some(color.into()),
      show_legend: false,
    });
    self
  }

  pub fn vline(mut self, x: f64, dash: DashType) -> Self {
    self.vlines.push(VLine { x, dash, color: None });
    self
  }

  pub fn colored_vline(mut self, x: f64, dash: DashType, color: &str) -> Self {
    self.vlines.push(VLine {
      x,
      dash,
      color: Some(color.into()),
    });
    self
  }

  pub fn zero_line(mut self) -> Self {
    self.zero_line = true;
    self
  }

  /// Boxed label pointing at `(x, y)`. Newlines become line breaks.
  pub fn annotate(mut self, x: f64, y: f64, text: &str) -> Self {
    self.notes.push(Note {
      x,
      y,
      text: text.replace('\n', "<br>"),
      arrow: true,
    });
    self
  }

  /// Free label anchored at `(x, y)`.
  pub fn text(mut self, x: f64, y: f64, text: &str) -> Self {
    self.notes.push(Note {
      x,
      y,
      text: text.replace('\n', "<br>"),
      arrow: false,
    });
    self
  }

  pub fn point(mut self, x: f64, y: f64, color: &str) -> Self {
    self.points.push(Point {
      x,
      y,
      color: color.into(),
    });
    self
  }

  pub fn x_range(mut self, lo: f64, hi: f64) -> Self {
    self.x_range = Some((lo, hi));
    self
  }

  pub fn y_range(mut self, lo: f64, hi: f64) -> Self {
    self.y_range = Some((lo, hi));
    self
  }

  pub fn n_series(&self) -> usize {
    self.series.len()
  }

  fn x_axis(&self) -> Axis {
    let mut axis = Axis::new()
      .title(self.x_label.as_str())
      .grid_color(self.theme.grid_color());
    if let Some((lo, hi)) = self.x_range {
      axis = axis.range(vec![lo, hi]);
    }
    axis
  }

  fn y_axis(&self) -> Axis {
    let mut axis = Axis::new()
      .title(self.y_label.as_str())
      .grid_color(self.theme.grid_color());
    if let Some((lo, hi)) = self.y_range {
      axis = axis.range(vec![lo, hi]);
    }
    axis
  }

  /// Add traces to `plot` on subplot `subplot_idx` (1-based); return the
  /// shapes and annotations the layout must carry.
  fn render_into(
    &self,
    plot: &mut Plot,
    subplot_idx: usize,
  ) -> (Vec<Shape>, Vec<Annotation>) {
    let xa = axis_name(subplot_idx, "x");
    let ya = axis_name(subplot_idx, "y");

    for series in &self.series {
      let mut line = Line::new().width(series.width).dash(series.dash.clone());
      if let Some(color) = &series.color {
        line = line.color(color.clone());
      }
      let mut trace = Scatter::from_array(series.x.clone(), series.y.clone())
        .mode(Mode::Lines)
        .name(series.label.as_str())
        .line(line)
        .show_legend(series.show_legend)
        .x_axis(xa.as_str())
        .y_axis(ya.as_str());
      if let Some(fill) = &series.fill {
        trace = trace.fill(Fill::ToZeroY).fill_color(fill.clone());
      }
      plot.add_trace(trace);
    }

    for point in &self.points {
      let trace = Scatter::new(vec![point.x], vec![point.y])
        .mode(Mode::Markers)
        .marker(Marker::new().size(11).color(point.color.clone()))
        .show_legend(false)
        .x_axis(xa.as_str())
        .y_axis(ya.as_str());
      plot.add_trace(trace);
    }

    let mut shapes = Vec::with_capacity(self.vlines.len() + 1);
    for vline in &self.vlines {
      let mut line = ShapeLine::new().width(1.0).dash(vline.dash.clone());
      if let Some(color) = &vline.color {
        line = line.color(color.clone());
      }
      shapes.push(
        Shape::new()
          .shape_type(ShapeType::Line)
          .x_ref(xa.as_str())
          .y_ref(format!("{ya} domain"))
          .x0(vline.x)
          .x1(vline.x)
          .y0(0.0)
          .y1(1.0)
          .line(line),
      );
    }
    if self.zero_line {
      shapes.push(
        Shape::new()
          .shape_type(ShapeType::Line)
          .x_ref(format!("{xa} domain"))
          .y_ref(ya.as_str())
          .x0(0.0)
          .x1(1.0)
          .y0(0.0)
          .y1(0.0)
          .line(ShapeLine::new().width(1.2)),
      );
    }

    let annotations = self
      .notes
      .iter()
      .map(|note| {
        Annotation::new()
          .text(note.text.as_str())
          .x_ref(xa.as_str())
          .y_ref(ya.as_str())
          .x(note.x)
          .y(note.y)
          .show_arrow(note.arrow)
          .x_anchor(Anchor::Left)
          .font(Font::new().size(11))
          .background_color(self.theme.label_background())
          .border_pad(3.0)
      })
      .collect();

    (shapes, annotations)
  }

  /// Standalone figure.
  pub fn plot(&self) -> Plot {
    let mut plot = Plot::new();
    let (shapes, annotations) = self.render_into(&mut plot, 1);
    let layout = Layout::new()
      .title(self.title.as_str())
      .width(CHART_WIDTH)
      .height(CHART_HEIGHT)
      .x_axis(self.x_axis())
      .y_axis(self.y_axis())
      .shapes(shapes)
      .annotations(annotations);
    plot.set_layout(self.theme.apply(layout));
    plot
  }
}

fn axis_name(subplot_idx: usize, axis: &str) -> String {
  if subplot_idx == 1 {
    axis.to_string()
  } else {
    format!("{axis}{subplot_idx}")
  }
}

fn with_axes(layout: Layout, subplot_idx: usize, x: Axis, y: Axis) -> Layout {
  match subplot_idx {
    1 => layout.x_axis(x).y_axis(y),
    2 => layout.x_axis2(x).y_axis2(y),
    3 => layout.x_axis3(x).y_axis3(y),
    4 => layout.x_axis4(x).y_axis4(y),
    5 => layout.x_axis5(x).y_axis5(y),
    6 => layout.x_axis6(x).y_axis6(y),
    _ => layout,
  }
}

/// Vertical gap between stacked panels of a three-row page.
const PANEL_GAP: f64 = 0.12;

/// Stacks [`LineChart`] panels into one figure, one per row.
pub struct GridPlotter {
  entries: Vec<LineChart>,
  row_height: usize,
  width: usize,
  pattern: GridPattern,
  theme: Theme,
}

impl Default for GridPlotter {
  fn default() -> Self {
    Self::new()
  }
}

impl GridPlotter {
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
      row_height: 520,
      width: 1000,
      pattern: GridPattern::Independent,
      theme: Theme::Light,
    }
  }

  pub fn row_height(mut self, h: usize) -> Self {
    self.row_height = h;
    self
  }

  pub fn width(mut self, w: usize) -> Self {
    self.width = w;
    self
  }

  /// Share x-axes down each column.
  pub fn shared_x(mut self) -> Self {
    self.pattern = GridPattern::Coupled;
    self
  }

  pub fn theme(mut self, theme: Theme) -> Self {
    self.theme = theme;
    self
  }

  pub fn register(mut self, chart: LineChart) -> Self {
    self.entries.push(chart.theme(self.theme));
    self
  }

  pub fn plot(self) -> Plot {
    let n = self.entries.len();
    let rows = n.max(1);
    let mut plot = Plot::new();
    let mut shapes = Vec::new();
    let mut annotations = Vec::new();
    let mut layout = Layout::new();

    for (idx, entry) in self.entries.iter().enumerate() {
      let subplot_idx = idx + 1;
      let (s, a) = entry.render_into(&mut plot, subplot_idx);
      shapes.extend(s);
      annotations.extend(a);

      annotations.push(
        Annotation::new()
          .text(format!("<b>{}</b>", entry.title))
          .x_ref(format!("{} domain", axis_name(subplot_idx, "x")))
          .y_ref(format!("{} domain", axis_name(subplot_idx, "y")))
          .x(0.5)
          .y(1.0)
          .x_anchor(Anchor::Center)
          .y_anchor(Anchor::Bottom)
          .font(Font::new().size(13))
          .show_arrow(false),
      );
      layout = with_axes(layout, subplot_idx, entry.x_axis(), entry.y_axis());
    }

    let y_gap = if rows > 1 {
      (PANEL_GAP * 3.0 / rows as f64).min(0.5)
    } else {
      0.0
    };
    layout = layout
      .width(self.width)
      .height(rows * self.row_height + 120)
      .margin(Margin::new().left(70).right(30).top(90).bottom(50))
      .shapes(shapes)
      .annotations(annotations)
      .grid(
        LayoutGrid::new()
          .rows(rows)
          .columns(1)
          .y_gap(y_gap)
          .pattern(self.pattern),
      );
    plot.set_layout(self.theme.apply(layout));
    plot
  }
}

/// Payoff (dashed) and profit (solid) of a strategy with zero line, strike
/// marker and breakeven point.
pub fn strategy_chart<P: PayoffExt>(
  strategy: &P,
  profile: &StrategyProfile,
  strike: f64,
  profit_color: &str,
) -> LineChart {
  let name = strategy.name();
  let mut chart = LineChart::new(&format!("{name} Strategy (Strike K={strike})"))
    .x_label("Stock Price at Expiration (S_T)")
    .y_label("Profit / Loss")
    .styled_line(
      &format!("{name} Payoff (No Premium)"),
      &profile.s_t,
      &profile.payoff,
      DashType::Dash,
      1.5,
      None,
    )
    .styled_line(
      &format!("{name} Profit"),
      &profile.s_t,
      &profile.profit,
      DashType::Solid,
      2.5,
      Some(profit_color),
    )
    .zero_line()
    .colored_vline(strike, DashType::Dot, "gray");

  if let Some(breakeven) = strategy.breakeven() {
    chart = chart
      .point(breakeven, 0.0, "black")
      .annotate(breakeven, 0.0, &format!("Breakeven\n(${breakeven})"));
  }
  chart
}

/// Write a self-contained interactive HTML file.
pub fn write_html<P: AsRef<Path>>(plot: &Plot, path: P) -> Result<()> {
  let path = path.as_ref();
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed creating plot output directory {:?}", parent))?;
  }
  fs::write(path, plot.to_html()).with_context(|| format!("failed writing {:?}", path))?;
  Ok(())
}

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// Write several figures into one HTML document, one per printed page.
pub fn write_document<P: AsRef<Path>>(pages: &[Plot], title: &str, path: P) -> Result<()> {
  let path = path.as_ref();
  let mut body = String::new();
  for (i, page) in pages.iter().enumerate() {
    let div_id = format!("page-{}", i + 1);
    body.push_str("<section class=\"page\">\n");
    body.push_str(&page.to_inline_html(Some(div_id.as_str())));
    body.push_str("\n</section>\n");
  }

  let html = format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{title}</title>\n\
     <script src=\"{PLOTLY_JS}\"></script>\n<style>\n\
     body {{ background: {DARK_BACKGROUND}; margin: 0; }}\n\
     .page {{ page-break-after: always; break-after: page; }}\n\
     .page:last-child {{ page-break-after: auto; break-after: auto; }}\n\
     </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
  );

  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed creating document directory {:?}", parent))?;
  }
  fs::write(path, html).with_context(|| format!("failed writing {:?}", path))?;
  Ok(())
}

/// Static image export through the kaleido backend.
#[cfg(feature = "static-export")]
pub fn write_image<P: AsRef<Path>>(
  plot: &Plot,
  path: P,
  format: plotly::ImageFormat,
  width: usize,
  height: usize,
) -> Result<()> {
  use std::panic::catch_unwind;
  use std::panic::AssertUnwindSafe;

  let path = path.as_ref();
  catch_unwind(AssertUnwindSafe(|| {
    plot.write_image(path, format, width, height, 1.0)
  }))
  .map_err(|_| anyhow::anyhow!("kaleido failed to render {:?}", path))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quant::strategies::profile;
  use crate::quant::strategies::ShortCall;

  fn sample_chart() -> LineChart {
    let x = Array1::linspace(0.0, 1.0, 11);
    let y = x.mapv(|v| v * v);
    LineChart::new("Squares")
      .x_label("x")
      .y_label("y")
      .line("x^2", &x, &y)
      .vline(0.5, DashType::Dash)
      .annotate(0.5, 0.25, "mid\npoint")
  }

  #[test]
  fn standalone_chart_serializes() {
    let json = sample_chart().plot().to_json();

    assert!(json.contains("Squares"));
    assert!(json.contains("x^2"));
    assert!(json.contains("mid<br>point"));
  }

  #[test]
  fn grid_places_panels_on_own_axes() {
    let plot = GridPlotter::new()
      .theme(Theme::Dark)
      .register(sample_chart())
      .register(sample_chart())
      .register(sample_chart())
      .plot();
    let json = plot.to_json();

    assert!(json.contains("\"xaxis\":\"x3\""));
    assert!(json.contains("\"yaxis\":\"y2\""));
    assert!(json.contains(DARK_BACKGROUND));
  }

  #[test]
  fn strategy_chart_marks_breakeven() {
    let sc = ShortCall::default();
    let prof = profile(&sc, &ShortCall::grid().to_array());
    let chart = strategy_chart(&sc, &prof, sc.k, "red");

    assert_eq!(chart.n_series(), 2);
    let json = chart.plot().to_json();
    assert!(json.contains("Breakeven<br>($120)"));
    assert!(!json.contains("Max Profit"));
  }

  #[test]
  fn document_contains_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.html");
    let pages = vec![sample_chart().plot(), sample_chart().plot()];

    write_document(&pages, "Doc", &path).unwrap();
    let html = fs::read_to_string(&path).unwrap();

    assert_eq!(html.matches("<section class=\"page\">").count(), 2);
    assert!(html.contains("page-1"));
    assert!(html.contains("page-2"));
  }

  #[test]
  fn write_html_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("chart.html");

    write_html(&sample_chart().plot(), &path).unwrap();
    assert!(path.exists());
  }
}
