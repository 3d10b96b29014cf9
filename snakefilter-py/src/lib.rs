//! Python bindings for the snakefilter contour selection library.
//!
//! This module exposes the greedy snake filter to Python via PyO3.

use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use snakefilter::{
    AcceptedSnake as RustAcceptedSnake, BinaryMask, FilterConfig as RustFilterConfig, Footprint,
    ImageContext, ImageRepo, RejectedSnake as RustRejectedSnake, SnakeCandidate, SnakeFilter,
    SnakeFilterError,
};

/// Convert a SnakeFilterError to a Python exception.
fn to_py_err(err: SnakeFilterError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn mask_from_array(array: &PyReadonlyArray2<'_, u8>) -> PyResult<BinaryMask> {
    let shape = array.shape();
    let height = shape[0];
    let width = shape[1];
    let data: Vec<u8> = array.as_slice()?.to_vec();
    BinaryMask::new(data, width, height).map_err(to_py_err)
}

/// Thresholds for accepting a candidate contour.
#[pyclass]
#[derive(Clone)]
pub struct FilterConfig {
    inner: RustFilterConfig,
}

#[pymethods]
impl FilterConfig {
    /// Create a new FilterConfig.
    ///
    /// Args:
    ///     min_avg_inner_darkness: Minimum dark fraction inside the contour (default: 0.1)
    ///     max_area: Maximum area, in average cell discs (default: 2.0)
    ///     min_area: Minimum area, in average cell discs (default: 0.07)
    ///     max_overlap: Maximum already-claimed fraction (default: 0.3)
    ///     max_free_border: Maximum free border, as a fraction of points (default: 0.4)
    ///     avg_cell_diameter: Expected cell diameter in pixels (default: 35.0)
    ///     points: Boundary points per star contour (default: 36)
    #[new]
    #[pyo3(signature = (
        min_avg_inner_darkness = 0.1,
        max_area = 2.0,
        min_area = 0.07,
        max_overlap = 0.3,
        max_free_border = 0.4,
        avg_cell_diameter = 35.0,
        points = 36
    ))]
    fn new(
        min_avg_inner_darkness: f64,
        max_area: f64,
        min_area: f64,
        max_overlap: f64,
        max_free_border: f64,
        avg_cell_diameter: f64,
        points: usize,
    ) -> PyResult<Self> {
        let inner = RustFilterConfig {
            min_avg_inner_darkness,
            max_area,
            min_area,
            max_overlap,
            max_free_border,
            avg_cell_diameter,
            star_points: points,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "FilterConfig(min_avg_inner_darkness={}, max_area={}, min_area={}, max_overlap={}, max_free_border={}, avg_cell_diameter={}, points={})",
            self.inner.min_avg_inner_darkness,
            self.inner.max_area,
            self.inner.min_area,
            self.inner.max_overlap,
            self.inner.max_free_border,
            self.inner.avg_cell_diameter,
            self.inner.star_points
        )
    }
}

/// Candidate contour: rank, metrics and a local footprint placed at (x, y).
#[pyclass]
#[derive(Clone)]
pub struct Snake {
    #[pyo3(get, set)]
    pub rank: f64,
    /// Enclosed pixel count; measured from the footprint when None.
    #[pyo3(get, set)]
    pub area: Option<f64>,
    /// Dark fraction; measured against the cell-content mask when None.
    #[pyo3(get, set)]
    pub avg_inner_darkness: Option<f64>,
    #[pyo3(get, set)]
    pub max_contiguous_free_border: usize,
    #[pyo3(get)]
    pub x: usize,
    #[pyo3(get)]
    pub y: usize,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

#[pymethods]
impl Snake {
    /// Create a candidate.
    ///
    /// Args:
    ///     rank: Priority, lower is better
    ///     footprint: 2D uint8 numpy array (height x width), nonzero inside
    ///     x, y: Top-left corner of the footprint in the image
    ///     max_contiguous_free_border: Longest unsupported boundary run (default: 0)
    ///     area, avg_inner_darkness: Optional precomputed metrics
    #[new]
    #[pyo3(signature = (rank, footprint, x, y, max_contiguous_free_border = 0, area = None, avg_inner_darkness = None))]
    fn new(
        rank: f64,
        footprint: PyReadonlyArray2<'_, u8>,
        x: usize,
        y: usize,
        max_contiguous_free_border: usize,
        area: Option<f64>,
        avg_inner_darkness: Option<f64>,
    ) -> PyResult<Self> {
        let shape = footprint.shape();
        Ok(Self {
            rank,
            area,
            avg_inner_darkness,
            max_contiguous_free_border,
            x,
            y,
            width: shape[1],
            height: shape[0],
            pixels: footprint.as_slice()?.to_vec(),
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "Snake(rank={}, x={}, y={}, size={}x{})",
            self.rank, self.x, self.y, self.width, self.height
        )
    }
}

impl Snake {
    fn to_candidate(&self, repo: &ImageRepo) -> PyResult<SnakeCandidate> {
        let footprint = Footprint::new(
            self.x,
            self.y,
            self.width,
            self.height,
            self.pixels.clone(),
        )
        .map_err(to_py_err)?;
        let measured = SnakeCandidate::from_footprint(
            self.rank,
            footprint,
            repo.cell_content_mask(),
            self.max_contiguous_free_border,
        )
        .map_err(to_py_err)?;
        Ok(SnakeCandidate::new(
            self.rank,
            self.area.unwrap_or(measured.area),
            self.avg_inner_darkness
                .unwrap_or(measured.avg_inner_darkness),
            self.max_contiguous_free_border,
            measured.footprint,
        ))
    }
}

/// Accepted candidate with its post-trim metrics.
#[pyclass]
#[derive(Clone)]
pub struct AcceptedSnake {
    /// Position in the input list.
    #[pyo3(get)]
    pub index: usize,
    /// Label in the segmentation array.
    #[pyo3(get)]
    pub label: i32,
    #[pyo3(get)]
    pub rank: f64,
    #[pyo3(get)]
    pub area: f64,
    #[pyo3(get)]
    pub avg_inner_darkness: f64,
    #[pyo3(get)]
    pub original_area: f64,
}

#[pymethods]
impl AcceptedSnake {
    fn __repr__(&self) -> String {
        format!(
            "AcceptedSnake(index={}, label={}, rank={:.3}, area={:.1}, avg_inner_darkness={:.3})",
            self.index, self.label, self.rank, self.area, self.avg_inner_darkness
        )
    }
}

impl From<&RustAcceptedSnake> for AcceptedSnake {
    fn from(a: &RustAcceptedSnake) -> Self {
        Self {
            index: a.index,
            label: a.label,
            rank: a.rank,
            area: a.area,
            avg_inner_darkness: a.avg_inner_darkness,
            original_area: a.original_area,
        }
    }
}

/// Rejected candidate and the first failed check.
#[pyclass]
#[derive(Clone)]
pub struct RejectedSnake {
    #[pyo3(get)]
    pub index: usize,
    #[pyo3(get)]
    pub rank: f64,
    /// Short reason, e.g. "too much overlapping".
    #[pyo3(get)]
    pub reason: String,
    /// Reason with the measured value.
    #[pyo3(get)]
    pub detail: String,
}

impl From<&RustRejectedSnake> for RejectedSnake {
    fn from(r: &RustRejectedSnake) -> Self {
        Self {
            index: r.index,
            rank: r.rank,
            reason: r.reason.reason().to_string(),
            detail: r.reason.to_string(),
        }
    }
}

#[pymethods]
impl RejectedSnake {
    fn __repr__(&self) -> String {
        format!("RejectedSnake(index={}, {})", self.index, self.detail)
    }
}

/// Result of a filter pass.
#[pyclass]
pub struct FilterResult {
    #[pyo3(get)]
    accepted: Vec<AcceptedSnake>,
    #[pyo3(get)]
    rejected: Vec<RejectedSnake>,
    /// Input index of the sentinel-ranked candidate that ended the pass.
    #[pyo3(get)]
    stopped_at: Option<usize>,
    labels: Vec<i32>,
    width: usize,
    height: usize,
}

#[pymethods]
impl FilterResult {
    /// Segmentation as a 2D int32 numpy array (height x width); 0 is background.
    #[getter]
    fn segmentation<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<i32>>> {
        PyArray1::from_vec(py, self.labels.clone()).reshape([self.height, self.width])
    }

    fn __repr__(&self) -> String {
        format!(
            "FilterResult(accepted={}, rejected={}, size={}x{})",
            self.accepted.len(),
            self.rejected.len(),
            self.width,
            self.height
        )
    }
}

/// Select a non-overlapping subset of candidate contours.
///
/// Args:
///     snakes: List of Snake candidates
///     cell_content: 2D uint8 numpy array, nonzero where cell content is present
///     mask: Optional 2D uint8 validity mask (default: whole image valid)
///     config: FilterConfig (default: FilterConfig())
///     parallel: Precompute footprint metrics in parallel (default: False)
///
/// Returns:
///     FilterResult with accepted/rejected records and the segmentation
#[pyfunction]
#[pyo3(signature = (snakes, cell_content, mask = None, config = None, parallel = false))]
fn filter_snakes(
    snakes: Vec<Snake>,
    cell_content: PyReadonlyArray2<'_, u8>,
    mask: Option<PyReadonlyArray2<'_, u8>>,
    config: Option<FilterConfig>,
    parallel: bool,
) -> PyResult<FilterResult> {
    let content = mask_from_array(&cell_content)?;
    let repo = match mask {
        Some(mask) => ImageRepo::new(mask_from_array(&mask)?, content),
        None => ImageRepo::unmasked(content),
    }
    .map_err(to_py_err)?;

    let candidates = snakes
        .iter()
        .map(|s| s.to_candidate(&repo))
        .collect::<PyResult<Vec<_>>>()?;

    let cfg = config.map(|c| c.inner).unwrap_or_default();
    let filter = SnakeFilter::new(cfg).map_err(to_py_err)?;
    let outcome = if parallel {
        filter.filter_par(&repo, &candidates)
    } else {
        filter.filter(&repo, &candidates)
    }
    .map_err(to_py_err)?;

    let (width, height) = outcome.segmentation.dims();
    Ok(FilterResult {
        accepted: outcome.accepted.iter().map(AcceptedSnake::from).collect(),
        rejected: outcome.rejected.iter().map(RejectedSnake::from).collect(),
        stopped_at: outcome.stopped_at,
        labels: outcome.segmentation.into_labels().into_vec(),
        width,
        height,
    })
}

/// Load a binary mask (nonzero becomes 1) from an image file.
///
/// Returns:
///     2D uint8 numpy array (height x width)
#[pyfunction]
fn load_mask<'py>(py: Python<'py>, path: &str) -> PyResult<Bound<'py, PyArray2<u8>>> {
    let mask = snakefilter::io::load_mask(path).map_err(to_py_err)?;
    let (width, height) = mask.dims();
    PyArray1::from_vec(py, mask.into_vec()).reshape([height, width])
}

/// Python module for snake filtering.
#[pymodule]
fn _snakefilter(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<FilterConfig>()?;
    m.add_class::<Snake>()?;
    m.add_class::<AcceptedSnake>()?;
    m.add_class::<RejectedSnake>()?;
    m.add_class::<FilterResult>()?;
    m.add_function(wrap_pyfunction!(filter_snakes, m)?)?;
    m.add_function(wrap_pyfunction!(load_mask, m)?)?;
    m.add("MAX_RANK", snakefilter::MAX_RANK)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
