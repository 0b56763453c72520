//! Symbolic positions to canvas coordinates.
//!
//! Pure functions: no clamping, no I/O. Absolute coordinates are echoed
//! unchanged even when they put a layer off-canvas; keeping layers on the
//! canvas is the caller's job.

use quizreel_project_model::position::{
    AxisPosition, Coordinate, LayerPosition, NamedPosition, PositionDescriptor, Size,
};

/// Resolve one axis.
///
/// - `Absolute(v)` → `v`
/// - `left`/`top` → `padding`
/// - `right`/`bottom` → `container − content − padding`
/// - `center` → the [`Coordinate::Centered`] sentinel
pub fn resolve_axis(
    setting: AxisPosition,
    content_extent: f64,
    container_extent: f64,
    padding: f64,
) -> Coordinate {
    match setting {
        AxisPosition::Absolute(value) => Coordinate::At(value),
        AxisPosition::Named(NamedPosition::Left | NamedPosition::Top) => Coordinate::At(padding),
        AxisPosition::Named(NamedPosition::Right | NamedPosition::Bottom) => {
            Coordinate::At(container_extent - content_extent - padding)
        }
        AxisPosition::Named(NamedPosition::Center) => Coordinate::Centered,
    }
}

/// Resolve both axes of a descriptor for content of `content` size.
pub fn resolve_position(
    descriptor: &PositionDescriptor,
    content: Size,
    container: Size,
) -> LayerPosition {
    LayerPosition {
        x: resolve_axis(
            descriptor.x,
            content.width,
            container.width,
            descriptor.padding,
        ),
        y: resolve_axis(
            descriptor.y,
            content.height,
            container.height,
            descriptor.padding,
        ),
    }
}
