//! SVG rendering of [`LearningCurvesPlot`].

use super::{LearningCurvesPlot, LegendLocation};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 55.0;

const LEGEND_WIDTH: f64 = 140.0;
const LEGEND_ROW: f64 = 20.0;
const LEGEND_PAD: f64 = 10.0;

/// Pixel rectangle `(left, top, right, bottom)`.
#[derive(Clone, Copy)]
struct Rect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rect {
    fn contains(&self, (px, py): (f64, f64)) -> bool {
        px >= self.left && px <= self.right && py >= self.top && py <= self.bottom
    }
}

/// Maps data coordinates into the plot area.
struct Frame {
    area: Rect,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Frame {
    fn px(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.area.left + (x - lo) / (hi - lo) * (self.area.right - self.area.left)
    }

    fn py(&self, y: f64) -> f64 {
        let (lo, hi) = self.y_range;
        self.area.bottom - (y - lo) / (hi - lo) * (self.area.bottom - self.area.top)
    }

    fn point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.px(x), self.py(y))
    }
}

fn x_range(plot: &LearningCurvesPlot) -> (f64, f64) {
    let xs = plot.curves.iter().flat_map(|c| c.x.iter().copied());
    let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    }
}

/// Tick positions at a 1/2/5 x 10^k step inside `range`.
fn ticks((lo, hi): (f64, f64), target: usize) -> (Vec<f64>, f64) {
    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    let values = (first..=last).map(|k| k as f64 * step).collect();
    (values, step)
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = (-step.log10() - 1e-9).ceil().max(0.0) as usize;
    format!("{:.*}", decimals, value)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn legend_rect(area: Rect, location: LegendLocation, height: f64) -> Rect {
    let (left, top) = match location {
        LegendLocation::UpperRight | LegendLocation::Best => {
            (area.right - LEGEND_PAD - LEGEND_WIDTH, area.top + LEGEND_PAD)
        }
        LegendLocation::UpperLeft => (area.left + LEGEND_PAD, area.top + LEGEND_PAD),
        LegendLocation::LowerLeft => (area.left + LEGEND_PAD, area.bottom - LEGEND_PAD - height),
        LegendLocation::LowerRight => (
            area.right - LEGEND_PAD - LEGEND_WIDTH,
            area.bottom - LEGEND_PAD - height,
        ),
    };
    Rect {
        left,
        top,
        right: left + LEGEND_WIDTH,
        bottom: top + height,
    }
}

/// Resolves `Best` to the corner that hides the fewest drawn points.
fn place_legend(plot: &LearningCurvesPlot, frame: &Frame, height: f64) -> Rect {
    let candidates = [
        LegendLocation::UpperRight,
        LegendLocation::UpperLeft,
        LegendLocation::LowerLeft,
        LegendLocation::LowerRight,
    ];
    if plot.legend != LegendLocation::Best {
        return legend_rect(frame.area, plot.legend, height);
    }

    let mut drawn: Vec<(f64, f64)> = Vec::new();
    for curve in &plot.curves {
        drawn.extend(curve.x.iter().zip(&curve.y).map(|(&x, &y)| frame.point(x, y)));
    }
    for band in &plot.bands {
        for (i, &x) in band.x.iter().enumerate() {
            drawn.push(frame.point(x, band.lower[i]));
            drawn.push(frame.point(x, band.upper[i]));
        }
    }

    candidates
        .iter()
        .map(|&loc| legend_rect(frame.area, loc, height))
        .min_by_key(|rect| drawn.iter().filter(|&&p| rect.contains(p)).count())
        .unwrap_or_else(|| legend_rect(frame.area, LegendLocation::UpperRight, height))
}

pub(super) fn render(plot: &LearningCurvesPlot) -> String {
    let area = Rect {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        right: WIDTH - MARGIN_RIGHT,
        bottom: HEIGHT - MARGIN_BOTTOM,
    };
    let frame = Frame {
        area,
        x_range: x_range(plot),
        y_range: plot.ylim,
    };

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        "<defs><clipPath id=\"plot-area\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/></clipPath></defs>\n",
        area.left,
        area.top,
        area.right - area.left,
        area.bottom - area.top
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    let (x_ticks, x_step) = ticks(frame.x_range, 6);
    let (y_ticks, y_step) = ticks(frame.y_range, 5);

    if plot.grid {
        svg.push_str("<g stroke=\"#b0b0b0\" stroke-width=\"0.8\">\n");
        for &x in &x_ticks {
            let px = frame.px(x);
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                px, area.top, px, area.bottom
            ));
        }
        for &y in &y_ticks {
            let py = frame.py(y);
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                area.left, py, area.right, py
            ));
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("<g clip-path=\"url(#plot-area)\">\n");
    for band in &plot.bands {
        let mut outline: Vec<(f64, f64)> = band
            .x
            .iter()
            .zip(&band.upper)
            .map(|(&x, &y)| frame.point(x, y))
            .collect();
        outline.extend(
            band.x
                .iter()
                .zip(&band.lower)
                .rev()
                .map(|(&x, &y)| frame.point(x, y)),
        );
        svg.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\"/>\n",
            points_attr(&outline),
            escape(&band.color),
            band.alpha
        ));
    }
    for curve in &plot.curves {
        let line: Vec<(f64, f64)> = curve
            .x
            .iter()
            .zip(&curve.y)
            .map(|(&x, &y)| frame.point(x, y))
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
            points_attr(&line),
            escape(&curve.color)
        ));
    }
    svg.push_str("</g>\n");

    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"none\" stroke=\"black\"/>\n",
        area.left,
        area.top,
        area.right - area.left,
        area.bottom - area.top
    ));
    for &x in &x_ticks {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
            frame.px(x),
            area.bottom + 16.0,
            tick_label(x, x_step)
        ));
    }
    for &y in &y_ticks {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            area.left - 6.0,
            frame.py(y),
            tick_label(y, y_step)
        ));
    }

    let center_x = (area.left + area.right) / 2.0;
    let center_y = (area.top + area.bottom) / 2.0;
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
        center_x,
        MARGIN_TOP / 2.0 + 5.0,
        escape(&plot.title)
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{}</text>\n",
        center_x,
        HEIGHT - 15.0,
        escape(&plot.x_label)
    ));
    svg.push_str(&format!(
        "<text x=\"18\" y=\"{:.2}\" text-anchor=\"middle\" transform=\"rotate(-90 18 {:.2})\">{}</text>\n",
        center_y,
        center_y,
        escape(&plot.y_label)
    ));

    if !plot.curves.is_empty() {
        let height = LEGEND_ROW * plot.curves.len() as f64 + 8.0;
        let rect = place_legend(plot, &frame, height);
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"white\" fill-opacity=\"0.8\" stroke=\"#cccccc\"/>\n",
            rect.left, rect.top, LEGEND_WIDTH, height
        ));
        for (i, curve) in plot.curves.iter().enumerate() {
            let y = rect.top + 4.0 + LEGEND_ROW * (i as f64 + 0.5);
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                rect.left + 8.0,
                y,
                rect.left + 32.0,
                y,
                escape(&curve.color)
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\">{}</text>\n",
                rect.left + 40.0,
                y,
                escape(&curve.label)
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualization::create_learning_curves_plot;

    #[test]
    fn test_ticks() {
        let (values, step) = ticks((0.55, 1.005), 5);
        assert!((step - 0.1).abs() < 1e-12);
        assert_eq!(values.len(), 5);
        assert!((values[0] - 0.6).abs() < 1e-12);
        assert_eq!(tick_label(values[0], step), "0.6");

        let (values, step) = ticks((0.0, 100.0), 6);
        assert_eq!(step, 20.0);
        assert_eq!(values, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(tick_label(40.0, step), "40");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_best_legend_avoids_curves() {
        // scores hug the top of the chart, so the legend goes to the bottom
        let plot = create_learning_curves_plot(
            &[10, 20, 30, 40],
            &[vec![1.0], vec![1.0], vec![1.0], vec![1.0]],
            &[vec![0.99], vec![0.99], vec![0.99], vec![0.99]],
            "top",
            Some((0.0, 1.05)),
        )
        .unwrap();
        let frame = Frame {
            area: Rect {
                left: MARGIN_LEFT,
                top: MARGIN_TOP,
                right: WIDTH - MARGIN_RIGHT,
                bottom: HEIGHT - MARGIN_BOTTOM,
            },
            x_range: x_range(&plot),
            y_range: plot.ylim,
        };
        let rect = place_legend(&plot, &frame, 48.0);
        assert!(rect.top > (frame.area.top + frame.area.bottom) / 2.0);
    }

    #[test]
    fn test_single_size_has_finite_range() {
        let plot =
            create_learning_curves_plot(&[5], &[vec![1.0]], &[vec![0.7]], "one", None).unwrap();
        let svg = render(&plot);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }
}
