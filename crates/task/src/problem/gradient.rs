use log::debug;
use lsfit_core::{EvalError, packed};

use crate::{model::Model, workspace::Workspace};

/// Accumulates the gradient `Jᵀr` and packed Hessian `JᵀJ` over all points.
///
/// `gradient` and `hessian` must be zeroed and `workspace` prepared for
/// `params` by the caller.
pub(super) fn gradient<D: ?Sized>(
    model: &Model<'_, D>,
    fixed: &[bool],
    workspace: &mut Workspace,
    params: &[f64],
    gradient: &mut [f64],
    hessian: &mut [f64],
) -> Result<(), EvalError> {
    for i in 0..model.n_data() {
        let Some(v) = point_derivatives(model, i, fixed, workspace, params) else {
            debug!("{} model derivatives failed at data point {i}", model.kind());
            return Err(EvalError::at(i));
        };
        accumulate(&workspace.diff, v, gradient, hessian);
    }
    Ok(())
}

/// Fills `workspace.diff` for data point `i` and returns its residual.
fn point_derivatives<D: ?Sized>(
    model: &Model<'_, D>,
    i: usize,
    fixed: &[bool],
    workspace: &mut Workspace,
    params: &[f64],
) -> Option<f64> {
    match model {
        Model::Point(m) => {
            let w = m.weight(i, &workspace.mparam);
            let v = w * (m.value(i, &workspace.mparam)? - m.observed(i));
            central_differences(|p| m.value(i, p), w, fixed, workspace, params)?;
            Some(v)
        }
        Model::Vector(m) => {
            let v = m.residual(i, &workspace.mparam)?;
            central_differences(|p| m.residual(i, p), 1.0, fixed, workspace, params)?;
            Some(v)
        }
        Model::VectorArray(m) if m.has_derivative() => {
            let v = m.residual(i, &workspace.mparam)?;
            m.derivative(i, fixed, &mut workspace.diff, &workspace.mparam)?;
            for (d, _) in workspace.diff.iter_mut().zip(fixed).filter(|(_, f)| **f) {
                *d = 0.0;
            }
            Some(v)
        }
        Model::VectorArray(m) => {
            let v = m.residual(i, &workspace.mparam)?;
            central_differences(|p| m.residual(i, p), 1.0, fixed, workspace, params)?;
            Some(v)
        }
    }
}

/// Central-difference derivatives `w·(f(p + h) − f(p − h))/2h` of `eval`.
///
/// Perturbs one free parameter at a time in `workspace.mparam` and restores
/// it afterwards. Fixed parameters get a zero derivative.
fn central_differences<E>(
    eval: E,
    weight: f64,
    fixed: &[bool],
    workspace: &mut Workspace,
    params: &[f64],
) -> Option<()>
where
    E: Fn(&[f64]) -> Option<f64>,
{
    let Workspace {
        h, mparam, diff, ..
    } = workspace;

    for (j, &p) in params.iter().enumerate() {
        if fixed[j] {
            diff[j] = 0.0;
            continue;
        }

        mparam[j] = p - h[j];
        let minus = eval(mparam.as_slice())?;

        mparam[j] = p + h[j];
        let plus = eval(mparam.as_slice())?;

        mparam[j] = p;
        diff[j] = weight * (plus - minus) / (2.0 * h[j]);
    }
    Some(())
}

/// Adds one point's contribution: `g += v·d`, `H += d·dᵀ` (lower triangle).
fn accumulate(diff: &[f64], v: f64, gradient: &mut [f64], hessian: &mut [f64]) {
    for (j, &dj) in diff.iter().enumerate() {
        gradient[j] += v * dj;
        for (k, &dk) in diff[..=j].iter().enumerate() {
            hessian[packed::index(j, k)] += dj * dk;
        }
    }
}
