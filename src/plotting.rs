use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::error::RenderError;
use crate::simulation::SimulationHistory;

const CHART_SIZE: (u32, u32) = (1024, 600);
const PALETTE: [RGBColor; 4] = [BLUE, RED, GREEN, MAGENTA];

struct Trace<'a> {
    label: String,
    values: &'a [f64],
    color: RGBColor,
}

/// Smallest and largest finite value over all traces, padded by 5%
fn value_range(traces: &[Trace]) -> (f64, f64) {
    let (lo, hi) = traces
        .iter()
        .flat_map(|trace| trace.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (-1.0, 1.0);
    }
    let pad = 0.05 * (hi - lo).max(1.0e-9);
    (lo - pad, hi + pad)
}

fn draw_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    time: &[f64],
    traces: &[Trace],
) -> Result<(), Box<dyn std::error::Error>> {
    let t_end = time.last().copied().unwrap_or(0.0).max(f64::EPSILON);
    let (y_min, y_max) = value_range(traces);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .caption(title, ("sans-serif", 28))
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..t_end, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("time (s)")
        .y_desc(y_desc)
        .draw()?;

    for trace in traces {
        let color = trace.color;
        chart
            .draw_series(LineSeries::new(
                time.iter().copied().zip(trace.values.iter().copied()),
                color.stroke_width(2),
            ))?
            .label(trace.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn render_chart(
    out_dir: &Path,
    file_name: &str,
    title: &str,
    y_desc: &str,
    time: &[f64],
    traces: &[Trace],
) -> Result<PathBuf, RenderError> {
    let path = out_dir.join(file_name);
    draw_chart(&path, title, y_desc, time, traces).map_err(|e| RenderError::Plot {
        chart: file_name.to_owned(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), "chart written");
    Ok(path)
}

/// Render the history into `out_dir`, one SVG per chart:
/// each state (true and estimated), the recorded error, the control input and
/// the reference. Returns the written paths.
pub fn render_history<const N: usize>(
    history: &SimulationHistory<N>,
    state_labels: &[&str; N],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, RenderError> {
    if history.is_empty() {
        return Err(RenderError::EmptyHistory);
    }
    std::fs::create_dir_all(out_dir)?;

    let time = history.time.as_slice();
    let mut written = Vec::with_capacity(N + 3);

    for (i, label) in state_labels.iter().enumerate() {
        let x = SimulationHistory::component(&history.x, i);
        let x_hat = SimulationHistory::component(&history.x_hat, i);
        written.push(render_chart(
            out_dir,
            &format!("{label}.svg"),
            &format!("Plant vs observer {label}"),
            label,
            time,
            &[
                Trace {
                    label: format!("plant {label}"),
                    values: x.as_slice(),
                    color: PALETTE[0],
                },
                Trace {
                    label: format!("observer {label}"),
                    values: x_hat.as_slice(),
                    color: PALETTE[1],
                },
            ],
        )?);
    }

    let error_components: Vec<Vec<f64>> = (0..N)
        .map(|i| SimulationHistory::component(&history.error, i))
        .collect();
    let error_traces: Vec<Trace> = error_components
        .iter()
        .zip(state_labels.iter())
        .enumerate()
        .map(|(i, (values, label))| Trace {
            label: format!("error {label}"),
            values: values.as_slice(),
            color: PALETTE[i % PALETTE.len()],
        })
        .collect();
    written.push(render_chart(
        out_dir,
        "error.svg",
        "Error",
        "error",
        time,
        &error_traces,
    )?);

    written.push(render_chart(
        out_dir,
        "control.svg",
        "Control input",
        "u",
        time,
        &[Trace {
            label: "control input u".to_owned(),
            values: history.u.as_slice(),
            color: PALETTE[0],
        }],
    )?);

    written.push(render_chart(
        out_dir,
        "reference.svg",
        "Reference input",
        "r",
        time,
        &[Trace {
            label: "reference r".to_owned(),
            values: history.r.as_slice(),
            color: PALETTE[0],
        }],
    )?);

    Ok(written)
}
