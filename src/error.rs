//! Error types for corten
//!
//! Failures fall into three classes, exposed through [`Error::kind`]:
//!
//! - [`ErrorKind::Configuration`]: shape/type/layout mismatches detected
//!   during `validate`/`configure`. Always recoverable - the caller can retry
//!   with corrected inputs.
//! - [`ErrorKind::Precondition`]: contract violations such as mutating a
//!   non-resizable descriptor, extending locked paddings, or running a kernel
//!   with an out-of-bounds sub-window. These signal a programming error in
//!   the caller.
//! - [`ErrorKind::OutOfRange`]: a coordinate or index outside a shape.
//!
//! Pre-flight `validate` entry points return [`Status`] so call sites can
//! check compatibility without treating the failure as fatal; `configure`
//! surfaces the identical condition as a hard error.

use crate::dtype::DataType;
use thiserror::Error;

/// Result type alias using corten's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Status returned by pre-flight `validate` entry points
pub type Status = Result<()>;

/// Coarse classification of an [`Error`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Incompatible inputs detected during validate/configure; recoverable
    Configuration,
    /// Contract violation by the caller; fatal
    Precondition,
    /// Coordinate or index outside a shape; fatal
    OutOfRange,
}

/// Errors that can occur in corten operations
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch between operands
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Data type mismatch between operands
    #[error("Data type mismatch: {lhs} vs {rhs}")]
    DTypeMismatch {
        /// Left-hand side data type
        lhs: DataType,
        /// Right-hand side data type
        rhs: DataType,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Sub-tensor view violates its parent's bounds or layout axes
    #[error("Invalid sub-tensor: {reason}")]
    InvalidSubTensor {
        /// Reason for invalidity
        reason: String,
    },

    /// Window dimensions violate an invariant (end < start, zero step, ...)
    #[error("Invalid window: {reason}")]
    InvalidWindow {
        /// Reason for invalidity
        reason: String,
    },

    /// Attempt to mutate the shape or type of a non-resizable descriptor
    #[error("Descriptor is not resizable")]
    NotResizable,

    /// Attempt to extend padding on a descriptor with locked paddings
    #[error("Paddings are locked")]
    PaddingsLocked,

    /// Operation requires a configured (non-empty) descriptor
    #[error("Descriptor is empty: cannot {op}")]
    EmptyDescriptor {
        /// The operation that was attempted
        op: &'static str,
    },

    /// A kernel was asked to run outside its configured window
    #[error("Sub-window is not contained in the configured window")]
    SubWindowOutOfBounds,

    /// A tensor operand was not bound to a buffer before dispatch
    #[error("Tensor {id} is not bound to a buffer")]
    UnboundTensor {
        /// Descriptor id of the unbound operand
        id: usize,
    },

    /// Rounding with a non-positive divisor or negative value
    #[error("Invalid rounding: value {value}, divisor {divisor}")]
    InvalidRounding {
        /// The value to round
        value: i64,
        /// The requested multiple
        divisor: i64,
    },

    /// Scheduler construction or dispatch failure
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Coordinate outside the descriptor's shape
    #[error("Coordinate {index} out of range for axis {axis} with extent {extent}")]
    OutOfRange {
        /// The offending coordinate
        index: isize,
        /// Axis the coordinate applies to
        axis: usize,
        /// Extent of that axis
        extent: usize,
    },
}

impl Error {
    /// Classify this error into the coarse taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. }
            | Self::DTypeMismatch { .. }
            | Self::InvalidArgument { .. }
            | Self::InvalidSubTensor { .. }
            | Self::InvalidWindow { .. }
            | Self::Scheduler(_) => ErrorKind::Configuration,
            Self::NotResizable
            | Self::PaddingsLocked
            | Self::EmptyDescriptor { .. }
            | Self::SubWindowOutOfBounds
            | Self::UnboundTensor { .. }
            | Self::InvalidRounding { .. } => ErrorKind::Precondition,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }

    /// Whether the caller may retry with corrected inputs
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create a sub-tensor error
    pub fn sub_tensor(reason: impl Into<String>) -> Self {
        Self::InvalidSubTensor {
            reason: reason.into(),
        }
    }

    /// Create a window error
    pub fn window(reason: impl Into<String>) -> Self {
        Self::InvalidWindow {
            reason: reason.into(),
        }
    }
}
