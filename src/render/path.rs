use serde::{Deserialize, Serialize};

use crate::render::PathCommand;

/// Curve used to connect consecutive series points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    #[default]
    Linear,
    /// Horizontal-vertical-horizontal steps centered between points.
    Step,
    /// Vertical then horizontal steps.
    StepBefore,
    /// Horizontal then vertical steps.
    StepAfter,
    /// Uniform cubic B-spline; does not pass through interior points.
    Basis,
    /// Cardinal spline with tension 0.7.
    Cardinal,
    /// Monotone cubic in x; never overshoots the data.
    Monotone,
}

const CARDINAL_TENSION: f64 = 0.7;
const EPSILON: f64 = 1e-6;

/// Builds path commands through pixel-space points using `interpolation`.
///
/// Curve modes fall back to straight segments for fewer than three points.
#[must_use]
pub fn line_path(points: &[(f64, f64)], interpolation: Interpolation) -> Vec<PathCommand> {
    let Some(&(x0, y0)) = points.first() else {
        return Vec::new();
    };
    let mut commands = vec![PathCommand::MoveTo { x: x0, y: y0 }];
    if points.len() == 1 {
        return commands;
    }

    match interpolation {
        Interpolation::Linear => push_linear(points, &mut commands),
        Interpolation::Step => push_step(points, &mut commands),
        Interpolation::StepBefore => {
            for pair in points.windows(2) {
                let ((px, _), (x, y)) = (pair[0], pair[1]);
                commands.push(PathCommand::LineTo { x: px, y });
                commands.push(PathCommand::LineTo { x, y });
            }
        }
        Interpolation::StepAfter => {
            for pair in points.windows(2) {
                let ((_, py), (x, y)) = (pair[0], pair[1]);
                commands.push(PathCommand::LineTo { x, y: py });
                commands.push(PathCommand::LineTo { x, y });
            }
        }
        Interpolation::Basis if points.len() >= 3 => push_basis(points, &mut commands),
        Interpolation::Cardinal if points.len() >= 3 => {
            push_cardinal(points, CARDINAL_TENSION, &mut commands);
        }
        Interpolation::Monotone if points.len() >= 3 => push_monotone(points, &mut commands),
        Interpolation::Basis | Interpolation::Cardinal | Interpolation::Monotone => {
            push_linear(points, &mut commands);
        }
    }
    commands
}

fn push_linear(points: &[(f64, f64)], commands: &mut Vec<PathCommand>) {
    commands.extend(
        points
            .iter()
            .skip(1)
            .map(|&(x, y)| PathCommand::LineTo { x, y }),
    );
}

fn push_step(points: &[(f64, f64)], commands: &mut Vec<PathCommand>) {
    for pair in points.windows(2) {
        let ((px, py), (x, y)) = (pair[0], pair[1]);
        let mid = (px + x) / 2.0;
        commands.push(PathCommand::LineTo { x: mid, y: py });
        commands.push(PathCommand::LineTo { x: mid, y });
    }
    if let Some(&(x, y)) = points.last() {
        commands.push(PathCommand::LineTo { x, y });
    }
}

const BASIS_1: [f64; 4] = [0.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];
const BASIS_2: [f64; 4] = [0.0, 1.0 / 3.0, 2.0 / 3.0, 0.0];
const BASIS_3: [f64; 4] = [0.0, 1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0];

fn dot4(weights: [f64; 4], values: [f64; 4]) -> f64 {
    weights
        .iter()
        .zip(values.iter())
        .map(|(weight, value)| weight * value)
        .sum()
}

fn push_basis(points: &[(f64, f64)], commands: &mut Vec<PathCommand>) {
    let (x0, y0) = points[0];
    let mut xs = [x0, x0, x0, points[1].0];
    let mut ys = [y0, y0, y0, points[1].1];
    commands.push(PathCommand::LineTo {
        x: dot4(BASIS_3, xs),
        y: dot4(BASIS_3, ys),
    });

    // The last point is repeated once so the curve reaches it.
    let last = points[points.len() - 1];
    for &(x, y) in points[2..].iter().chain(std::iter::once(&last)) {
        xs.rotate_left(1);
        xs[3] = x;
        ys.rotate_left(1);
        ys[3] = y;
        commands.push(PathCommand::CubicTo {
            x1: dot4(BASIS_1, xs),
            y1: dot4(BASIS_1, ys),
            x2: dot4(BASIS_2, xs),
            y2: dot4(BASIS_2, ys),
            x: dot4(BASIS_3, xs),
            y: dot4(BASIS_3, ys),
        });
    }
    commands.push(PathCommand::LineTo {
        x: last.0,
        y: last.1,
    });
}

/// Cardinal spline with the end points doubled, as d3's `curveCardinal`.
fn push_cardinal(points: &[(f64, f64)], tension: f64, commands: &mut Vec<PathCommand>) {
    let k = (1.0 - tension) / 6.0;
    let last = points.len() - 1;
    for i in 0..last {
        let prev = points[i.saturating_sub(1)];
        let (p0, p1) = (points[i], points[i + 1]);
        let after = points[(i + 2).min(last)];
        commands.push(PathCommand::CubicTo {
            x1: p0.0 + k * (p1.0 - prev.0),
            y1: p0.1 + k * (p1.1 - prev.1),
            x2: p1.0 - k * (after.0 - p0.0),
            y2: p1.1 - k * (after.1 - p0.1),
            x: p1.0,
            y: p1.1,
        });
    }
}

fn slope((x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> f64 {
    let dx = x1 - x0;
    if dx.abs() < f64::EPSILON {
        0.0
    } else {
        (y1 - y0) / dx
    }
}

/// Fritsch-Carlson slopes, one per point.
fn monotone_slopes(points: &[(f64, f64)]) -> Vec<f64> {
    let secants: Vec<f64> = points.windows(2).map(|pair| slope(pair[0], pair[1])).collect();

    let mut m = Vec::with_capacity(points.len());
    m.push(secants[0]);
    for pair in secants.windows(2) {
        m.push(if pair[0] * pair[1] <= 0.0 {
            0.0
        } else {
            (pair[0] + pair[1]) / 2.0
        });
    }
    m.push(secants[secants.len() - 1]);

    for (i, &d) in secants.iter().enumerate() {
        if d.abs() < EPSILON {
            m[i] = 0.0;
            m[i + 1] = 0.0;
            continue;
        }
        let a = m[i] / d;
        let b = m[i + 1] / d;
        let s = a * a + b * b;
        if s > 9.0 {
            let s = 3.0 / s.sqrt();
            m[i] = s * a * d;
            m[i + 1] = s * b * d;
        }
    }
    m
}

/// Cubic segments with control points a third of the way along x.
fn push_monotone(points: &[(f64, f64)], commands: &mut Vec<PathCommand>) {
    let m = monotone_slopes(points);
    for (i, pair) in points.windows(2).enumerate() {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        let dx = (x1 - x0) / 3.0;
        commands.push(PathCommand::CubicTo {
            x1: x0 + dx,
            y1: y0 + dx * m[i],
            x2: x1 - dx,
            y2: y1 - dx * m[i + 1],
            x: x1,
            y: y1,
        });
    }
}
