//! Layout planning: one consolidated matrix or several paired column groups.
//!
//! The planner only sees the church count and the page geometry. It never
//! looks at cell contents, so a plan is fully determined by
//! `(churches, dates, geometry, pairing)`.

use escala_shared::{PageGeometry, PairingPolicy};

use super::error::ReportError;

/// Tolerance for floating point division of page widths.
const WIDTH_EPSILON: f64 = 1e-6;

/// Summary layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Every church fits one matrix.
    Single,
    /// Churches are split into column groups.
    Paginated,
}

/// An ordered subset of churches rendered as one matrix.
///
/// Groups never own dates: every group is laid against the same axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixGroup {
    /// Position in the partition, 0-based.
    pub index: usize,
    /// Church names in column order.
    pub churches: Vec<String>,
}

/// Output of the layout planner.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    /// Single or paginated.
    pub mode: LayoutMode,
    /// `floor(W / m)`.
    pub max_churches_per_matrix: usize,
    /// Width of each church column.
    pub column_width_mm: f32,
    /// Column groups, covering every church exactly once.
    pub groups: Vec<MatrixGroup>,
    /// Group indexes placed on each summary page.
    pub pages: Vec<Vec<usize>>,
}

impl LayoutPlan {
    /// Number of summary pages.
    #[must_use]
    pub fn summary_pages(&self) -> usize {
        self.pages.len()
    }
}

/// Decides how the summary matrix is split over pages.
#[derive(Debug, Clone, Copy)]
pub struct LayoutPlanner<'g> {
    geometry: &'g PageGeometry,
    pairing: PairingPolicy,
}

impl<'g> LayoutPlanner<'g> {
    /// Creates a planner, rejecting geometries that cannot hold one column.
    pub fn new(geometry: &'g PageGeometry, pairing: PairingPolicy) -> Result<Self, ReportError> {
        validate_geometry(geometry)?;
        Ok(Self { geometry, pairing })
    }

    /// `floor(W / m)`: how many church columns one matrix can hold.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_churches_per_matrix(&self) -> usize {
        let ratio = f64::from(self.geometry.content_width_mm)
            / f64::from(self.geometry.min_column_width_mm);
        (ratio + WIDTH_EPSILON).floor() as usize
    }

    /// Plans the summary phase for an already sorted church list.
    ///
    /// `date_count` is only consulted by [`PairingPolicy::WhenFits`].
    #[must_use]
    pub fn plan(&self, churches: &[String], date_count: usize) -> LayoutPlan {
        let max = self.max_churches_per_matrix();
        let width = self.geometry.content_width_mm;

        if churches.len() <= max {
            let column_width_mm = if churches.is_empty() {
                width
            } else {
                (width / churches.len() as f32).max(self.geometry.min_column_width_mm)
            };
            let groups: Vec<MatrixGroup> = if churches.is_empty() {
                Vec::new()
            } else {
                vec![MatrixGroup {
                    index: 0,
                    churches: churches.to_vec(),
                }]
            };
            let pages = if groups.is_empty() { Vec::new() } else { vec![vec![0]] };

            return LayoutPlan {
                mode: LayoutMode::Single,
                max_churches_per_matrix: max,
                column_width_mm,
                groups,
                pages,
            };
        }

        let groups: Vec<MatrixGroup> = churches
            .chunks(max)
            .enumerate()
            .map(|(index, chunk)| MatrixGroup {
                index,
                churches: chunk.to_vec(),
            })
            .collect();

        let per_page = if self.pair_fits(date_count) { 2 } else { 1 };
        let indexes: Vec<usize> = (0..groups.len()).collect();
        let pages = indexes.chunks(per_page).map(<[usize]>::to_vec).collect();

        LayoutPlan {
            mode: LayoutMode::Paginated,
            max_churches_per_matrix: max,
            column_width_mm: width / max as f32,
            groups,
            pages,
        }
    }

    /// Whether two matrices of `date_count` rows may share a page.
    fn pair_fits(&self, date_count: usize) -> bool {
        match self.pairing {
            PairingPolicy::Always => true,
            PairingPolicy::WhenFits => {
                let matrix_height = (date_count + 1) as f32 * self.geometry.row_height_mm;
                2.0 * matrix_height + self.geometry.group_gap_mm
                    <= self.geometry.table_area_height_mm()
            }
        }
    }
}

/// Rejects geometries the planner or renderer cannot work with.
pub fn validate_geometry(geometry: &PageGeometry) -> Result<(), ReportError> {
    let w = geometry.content_width_mm;
    let m = geometry.min_column_width_mm;

    if !w.is_finite() || w <= 0.0 {
        return Err(ReportError::invalid_geometry(format!(
            "content width must be positive, got {w}"
        )));
    }
    if !m.is_finite() || m <= 0.0 {
        return Err(ReportError::invalid_geometry(format!(
            "minimum column width must be positive, got {m}"
        )));
    }
    if m > w {
        return Err(ReportError::invalid_geometry(format!(
            "minimum column width {m} exceeds content width {w}"
        )));
    }
    if !geometry.row_height_mm.is_finite() || geometry.row_height_mm <= 0.0 {
        return Err(ReportError::invalid_geometry("row height must be positive"));
    }
    let usable = geometry.page_width_mm - 2.0 * geometry.margin_mm;
    if geometry.fixed_columns_mm() + w > usable + 0.01 {
        return Err(ReportError::invalid_geometry(format!(
            "fixed columns plus content width exceed the printable width {usable}"
        )));
    }
    if geometry.table_area_height_mm() <= geometry.row_height_mm {
        return Err(ReportError::invalid_geometry(
            "page height leaves no room for a table",
        ));
    }
    Ok(())
}
