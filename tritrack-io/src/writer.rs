//! CSV writers for the two per-event reports.

use crate::Result;
use std::io::Write;
use tritrack_algorithms::{DeflectionRow, EventReport, PixelizedPoint, UncertaintyRow};

/// Header of the geometry/prediction table.
pub const DEFLECTION_HEADER: &str = "eventID,l1_x_mm,l1_y_mm,l1_z_mm,l3_x_mm,l3_y_mm,l3_z_mm,\
pred_x_mm,pred_y_mm,pred_z_mm,act2_x_mm,act2_y_mm,act2_z_mm,err_mm,\
px1,py1,px3,py3,pixel_pred_x,pixel_pred_y,pixel_act_x,pixel_act_y,\
px1_mm,py1_mm,px3_mm,py3_mm,pixel_pred_x_mm,pixel_pred_y_mm,pixel_act_x_mm,pixel_act_y_mm";

/// Header of the uncertainty table.
pub const UNCERTAINTY_HEADER: &str = "event,L2_pred_pixcenter_x_mm,L2_pred_pixcenter_y_mm,\
i_pred,j_pred,sigma_x_mm,sigma_y_mm,sigma_r_mm,r95_mm,sigma_r_px,r95_px,crossesAl";

/// Value written to `err_mm` when the middle plane was not crossed.
pub const MISSING_ERROR_MM: f64 = -1.0;

/// Significant digits of floats in the uncertainty table.
pub const UNCERTAINTY_DIGITS: usize = 6;

/// The two report tables of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTable {
    /// Geometry and prediction per event.
    Deflection,
    /// Scattering uncertainty per event.
    Uncertainty,
}

/// Writes both report tables, one row each per event.
pub struct ReportWriter<D: Write, U: Write> {
    deflection: D,
    uncertainty: U,
    rows: usize,
}

impl<D: Write, U: Write> ReportWriter<D, U> {
    /// Wraps the two table writers and emits their headers.
    ///
    /// # Errors
    /// Returns an error if a header cannot be written.
    pub fn new(mut deflection: D, mut uncertainty: U) -> Result<Self> {
        writeln!(deflection, "{DEFLECTION_HEADER}")?;
        writeln!(uncertainty, "{UNCERTAINTY_HEADER}")?;
        Ok(Self {
            deflection,
            uncertainty,
            rows: 0,
        })
    }

    /// Number of events written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Writes one event to both tables.
    ///
    /// # Errors
    /// Returns an error if either table cannot be written.
    pub fn write_event(&mut self, report: &EventReport) -> Result<()> {
        write_deflection_row(&mut self.deflection, &report.deflection)?;
        write_uncertainty_row(&mut self.uncertainty, &report.uncertainty)?;
        self.rows += 1;
        Ok(())
    }

    /// Writes every event of `reports`.
    ///
    /// # Errors
    /// Returns an error on the first failed row.
    pub fn write_all(&mut self, reports: &[EventReport]) -> Result<()> {
        for report in reports {
            self.write_event(report)?;
        }
        Ok(())
    }

    /// Flushes both tables and returns the underlying writers.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> Result<(D, U)> {
        self.deflection.flush()?;
        self.uncertainty.flush()?;
        Ok((self.deflection, self.uncertainty))
    }
}

fn write_position<W: Write>(w: &mut W, p: &PixelizedPoint) -> std::io::Result<()> {
    write!(w, "{:.6},{:.6},{:.6},", p.position.x, p.position.y, p.position.z)
}

fn write_deflection_row<W: Write>(w: &mut W, row: &DeflectionRow) -> Result<()> {
    write!(w, "{},", row.event_id)?;
    write_position(w, &row.l1)?;
    write_position(w, &row.l3)?;
    write_position(w, &row.predicted)?;
    write_position(w, &row.actual)?;
    write!(w, "{:.6},", row.error_mm.unwrap_or(MISSING_ERROR_MM))?;

    for p in [&row.l1, &row.l3, &row.predicted, &row.actual] {
        write!(w, "{},{},", p.pixel.0, p.pixel.1)?;
    }

    let centers = [&row.l1, &row.l3, &row.predicted, &row.actual];
    for (k, p) in centers.iter().enumerate() {
        let sep = if k + 1 == centers.len() { '\n' } else { ',' };
        write!(w, "{:.6},{:.6}{sep}", p.center.0, p.center.1)?;
    }
    Ok(())
}

/// Formats `value` with `digits` significant digits, `%g` style.
///
/// Plain notation is used for decimal exponents in `-4..digits`, scientific
/// otherwise. Trailing zeros are dropped in both.
pub(crate) fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let max_exponent = i32::try_from(digits).unwrap_or(i32::MAX);

    if (-4..max_exponent).contains(&exponent) {
        let decimals = usize::try_from(max_exponent - 1 - exponent).unwrap_or(0);
        trim_fraction(format!("{value:.decimals$}"))
    } else {
        format!("{}e{exponent}", trim_fraction(mantissa.to_string()))
    }
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let kept = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(kept);
    }
    s
}

fn write_uncertainty_row<W: Write>(w: &mut W, row: &UncertaintyRow) -> Result<()> {
    let g = |v: f64| format_significant(v, UNCERTAINTY_DIGITS);
    writeln!(
        w,
        "{},{},{},{},{},{},{},{},{},{},{},{}",
        row.event_id,
        g(row.predicted_center.0),
        g(row.predicted_center.1),
        row.predicted_pixel.0,
        row.predicted_pixel.1,
        g(row.sigma_mm.sigma_x),
        g(row.sigma_mm.sigma_y),
        g(row.sigma_mm.sigma_r),
        g(row.sigma_mm.r95),
        g(row.sigma_px.sigma_r),
        g(row.sigma_px.r95),
        u8::from(row.crosses_absorber)
    )?;
    Ok(())
}
