mod discriminated_union;
mod intersection;
mod lazy;
mod pipe;
mod transform;
mod union;

pub use discriminated_union::ZDiscriminatedUnion;
pub use intersection::ZIntersection;
pub use lazy::ZLazy;
pub use pipe::ZPipe;
pub use transform::ZTransform;
pub use union::ZUnion;
