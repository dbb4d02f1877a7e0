//! Tensor metadata: shapes, strides, padding, valid regions, descriptors,
//! and zero-copy sub-tensor views
//!
//! A [`TensorDescriptor`] is the owning metadata record for one tensor; it
//! never owns element storage. Descriptors live in a [`TensorArena`] and are
//! addressed by stable [`TensorHandle`]s, which is also how
//! [`SubTensorView`]s alias their parent without holding a reference.

mod arena;
mod coords;
mod descriptor;
mod padding;
mod region;
mod shape;
mod strides;
mod subtensor;

pub use arena::{TensorArena, TensorHandle};
pub use coords::Coordinates;
pub use descriptor::TensorDescriptor;
pub use padding::PaddingSize;
pub use region::ValidRegion;
pub use shape::TensorShape;
pub use strides::Strides;
pub use subtensor::SubTensorView;

pub(crate) use shape::MAX_DIMS;
