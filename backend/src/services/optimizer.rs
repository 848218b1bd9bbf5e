//! Derivative-free minimisation over the unit box.
//!
//! Used to estimate smoothing weights. Every candidate is clamped to
//! `[0, 1]` per coordinate, and all tie-breaks are positional, so the result
//! depends only on the objective and the start point.

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Settings for [`minimize_in_unit_box`].
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    pub max_iterations: usize,
    /// Stop when best and worst vertex values differ by less than this
    pub tolerance: f64,
    /// Edge length of the initial simplex
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

fn clamp_unit(point: &mut [f64]) {
    for x in point.iter_mut() {
        *x = x.clamp(0.0, 1.0);
    }
}

/// Objective value with non-finite results ranked last.
fn evaluate<F>(objective: &mut F, point: &[f64]) -> f64
where
    F: FnMut(&[f64]) -> f64,
{
    let value = objective(point);
    if value.is_finite() {
        value
    } else {
        f64::INFINITY
    }
}

/// Minimise `objective` with the Nelder-Mead simplex method, starting at
/// `start`. Returns the best point and its value.
pub fn minimize_in_unit_box<F>(
    mut objective: F,
    start: &[f64],
    options: NelderMeadOptions,
) -> (Vec<f64>, f64)
where
    F: FnMut(&[f64]) -> f64,
{
    let dim = start.len();
    let mut origin = start.to_vec();
    clamp_unit(&mut origin);

    if dim == 0 {
        let value = evaluate(&mut objective, &origin);
        return (origin, value);
    }

    // Step away from the nearer bound so no vertex collapses onto the start.
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    simplex.push((origin.clone(), evaluate(&mut objective, &origin)));
    for i in 0..dim {
        let mut vertex = origin.clone();
        vertex[i] = if vertex[i] + options.initial_step <= 1.0 {
            vertex[i] + options.initial_step
        } else {
            vertex[i] - options.initial_step
        };
        clamp_unit(&mut vertex);
        let value = evaluate(&mut objective, &vertex);
        simplex.push((vertex, value));
    }

    for _ in 0..options.max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let best = simplex[0].1;
        let worst = simplex[dim].1;
        if (worst - best).abs() < options.tolerance {
            break;
        }

        let mut centroid = vec![0.0; dim];
        for (vertex, _) in simplex.iter().take(dim) {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x / dim as f64;
            }
        }

        let toward = |coef: f64, from: &[f64]| -> Vec<f64> {
            let mut point: Vec<f64> = centroid
                .iter()
                .zip(from)
                .map(|(c, x)| c + coef * (c - x))
                .collect();
            clamp_unit(&mut point);
            point
        };

        let worst_point = simplex[dim].0.clone();
        let reflected = toward(REFLECTION, &worst_point);
        let reflected_value = evaluate(&mut objective, &reflected);

        if reflected_value < best {
            let expanded = toward(EXPANSION, &worst_point);
            let expanded_value = evaluate(&mut objective, &expanded);
            simplex[dim] = if expanded_value < reflected_value {
                (expanded, expanded_value)
            } else {
                (reflected, reflected_value)
            };
            continue;
        }

        if reflected_value < simplex[dim - 1].1 {
            simplex[dim] = (reflected, reflected_value);
            continue;
        }

        let contracted = toward(-CONTRACTION, &worst_point);
        let contracted_value = evaluate(&mut objective, &contracted);
        if contracted_value < worst {
            simplex[dim] = (contracted, contracted_value);
            continue;
        }

        let best_point = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (x, b) in vertex.iter_mut().zip(&best_point) {
                *x = b + SHRINK * (*x - b);
            }
            *value = evaluate(&mut objective, vertex);
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    let (point, value) = simplex.swap_remove(0);
    (point, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_interior_minimum() {
        let (point, value) = minimize_in_unit_box(
            |p| (p[0] - 0.3).powi(2) + (p[1] - 0.8).powi(2),
            &[0.5, 0.5],
            NelderMeadOptions::default(),
        );
        assert!((point[0] - 0.3).abs() < 1e-3);
        assert!((point[1] - 0.8).abs() < 1e-3);
        assert!(value < 1e-6);
    }

    #[test]
    fn test_stays_inside_bounds() {
        let (point, _) = minimize_in_unit_box(
            |p| -p[0] + p[1],
            &[0.9, 0.1],
            NelderMeadOptions::default(),
        );
        assert!(point.iter().all(|x| (0.0..=1.0).contains(x)));
        assert!(point[0] > 0.99);
        assert!(point[1] < 0.01);
    }

    #[test]
    fn test_deterministic() {
        let f = |p: &[f64]| (p[0] - 0.42).abs() + (p[1] * p[2] - 0.1).powi(2);
        let a = minimize_in_unit_box(f, &[0.5, 0.5, 0.5], NelderMeadOptions::default());
        let b = minimize_in_unit_box(f, &[0.5, 0.5, 0.5], NelderMeadOptions::default());
        assert_eq!(a, b);
    }
}
