use std::cell::Cell;
use std::rc::Rc;

use crate::drawable::InvalidateHandle;
use crate::geometry::Rect;
use crate::resources::density_scale;

/// Geometry shared by the press ripple and the focus/hover highlight.
///
/// The hotspot bounds are the owning ripple drawable's own cell, so a
/// component always sees the owner's current bounds.
pub struct RippleComponent {
    owner: InvalidateHandle,
    hotspot_bounds: Rc<Cell<Rect>>,
    target_radius: f32,
    has_max_radius: bool,
    density_scale: f32,
}

impl RippleComponent {
    pub fn new(owner: InvalidateHandle, hotspot_bounds: Rc<Cell<Rect>>) -> Self {
        Self {
            owner,
            hotspot_bounds,
            target_radius: 0.0,
            has_max_radius: false,
            density_scale: 1.0,
        }
    }

    /// Fix the radius to `max_radius` when non-negative, otherwise derive it
    /// from the hotspot bounds. Returns the new target radius.
    pub fn setup(&mut self, max_radius: f32, density_dpi: u32) -> f32 {
        if max_radius >= 0.0 {
            self.has_max_radius = true;
            self.target_radius = max_radius;
        } else {
            self.has_max_radius = false;
            self.target_radius = radius_for(self.hotspot_bounds.get());
        }
        self.density_scale = density_scale(density_dpi);
        self.target_radius
    }

    /// Re-derive the radius after a bounds change. `None` when the radius is
    /// fixed.
    pub fn recompute(&mut self) -> Option<f32> {
        if self.has_max_radius {
            return None;
        }
        self.target_radius = radius_for(self.hotspot_bounds.get());
        Some(self.target_radius)
    }

    pub fn target_radius(&self) -> f32 {
        self.target_radius
    }

    pub fn has_max_radius(&self) -> bool {
        self.has_max_radius
    }

    pub fn density_scale(&self) -> f32 {
        self.density_scale
    }

    pub fn hotspot_bounds(&self) -> Rect {
        self.hotspot_bounds.get()
    }

    /// Square enclosing the effect, centred on the origin.
    pub fn bounds(&self) -> Rect {
        let r = self.target_radius.ceil() as i32;
        Rect::new(-r, -r, r, r)
    }

    /// Invalidate the owning ripple drawable.
    pub fn invalidate_self(&self) {
        self.owner.invalidate();
    }
}

/// Half the diagonal of `bounds`.
fn radius_for(bounds: Rect) -> f32 {
    let half_width = bounds.width() as f32 / 2.0;
    let half_height = bounds.height() as f32 / 2.0;
    (half_width * half_width + half_height * half_height).sqrt()
}

/// An effect drawn by a ripple drawable, built on a [`RippleComponent`].
pub trait RippleEffect {
    fn component(&self) -> &RippleComponent;

    fn component_mut(&mut self) -> &mut RippleComponent;

    fn on_target_radius_changed(&mut self, _target_radius: f32) {}

    fn setup(&mut self, max_radius: f32, density_dpi: u32) {
        let radius = self.component_mut().setup(max_radius, density_dpi);
        self.on_target_radius_changed(radius);
    }

    fn on_bounds_change(&mut self) {
        if let Some(radius) = self.component_mut().recompute() {
            self.on_target_radius_changed(radius);
        }
    }

    fn on_hotspot_bounds_changed(&mut self) {
        if let Some(radius) = self.component_mut().recompute() {
            self.on_target_radius_changed(radius);
        }
    }

    fn bounds(&self) -> Rect {
        self.component().bounds()
    }

    fn invalidate_self(&self) {
        self.component().invalidate_self();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::testing::RecordingCallback;
    use crate::drawable::{Callback, DrawableBase};

    fn component(bounds: Rect) -> (RippleComponent, Rc<Cell<Rect>>) {
        let cell = Rc::new(Cell::new(bounds));
        let owner = DrawableBase::new();
        (RippleComponent::new(owner.invalidate_handle(), cell.clone()), cell)
    }

    #[test]
    fn test_auto_radius_is_half_diagonal() {
        let (mut component, _) = component(Rect::from_size(6, 8));
        assert_eq!(component.setup(-1.0, 160), 5.0);
        assert_eq!(component.bounds(), Rect::new(-5, -5, 5, 5));
        assert_eq!(component.density_scale(), 1.0);
    }

    #[test]
    fn test_auto_radius_follows_bounds() {
        let (mut component, cell) = component(Rect::from_size(6, 8));
        component.setup(-1.0, 160);
        cell.set(Rect::from_size(10, 24));
        assert_eq!(component.recompute(), Some(13.0));
        assert_eq!(component.bounds(), Rect::new(-13, -13, 13, 13));
    }

    #[test]
    fn test_explicit_radius_is_kept() {
        let (mut component, cell) = component(Rect::from_size(6, 8));
        assert_eq!(component.setup(3.2, 320), 3.2);
        assert_eq!(component.bounds(), Rect::new(-4, -4, 4, 4));
        assert_eq!(component.density_scale(), 2.0);

        cell.set(Rect::from_size(100, 100));
        assert_eq!(component.recompute(), None);
        assert_eq!(component.target_radius(), 3.2);
    }

    #[test]
    fn test_invalidate_reaches_owner() {
        let mut owner = DrawableBase::new();
        let recorder = Rc::new(RecordingCallback::default());
        let callback: Rc<dyn Callback> = recorder.clone();
        owner.set_callback(Some(&callback));

        let component = RippleComponent::new(
            owner.invalidate_handle(),
            Rc::new(Cell::new(Rect::EMPTY)),
        );
        component.invalidate_self();
        assert_eq!(*recorder.invalidated.borrow(), vec![owner.id()]);
    }
}
