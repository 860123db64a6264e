//! Stateful 2D drawables for GUI toolkits.
//!
//! Drawables paint widget backgrounds and visual feedback into a recording
//! [`Canvas`]. Hosts feed them bounds, [`StateSet`]s and levels; drawables
//! answer whether their appearance changed and request redraws through a
//! [`Callback`].
//!
//! ```
//! use std::rc::Rc;
//! use drawables::prelude::*;
//!
//! let colors = ColorStateList::new(vec![
//!     (StateSpec::with(StateSet::PRESSED), 0xFF3366CC),
//!     (StateSpec::ANY, 0xFF336699),
//! ]);
//! let mut background = ColorStateListDrawable::with_color_state_list(Rc::new(colors));
//! background.set_bounds(Rect::new(0, 0, 120, 32));
//!
//! assert!(background.set_state(StateSet::ENABLED | StateSet::PRESSED));
//!
//! let mut canvas = Canvas::new();
//! background.draw(&mut canvas);
//! assert_eq!(canvas.commands().len(), 1);
//! ```

pub mod blend;
pub mod canvas;
pub mod color;
pub mod color_state_list;
pub mod decode;
pub mod drawable;
pub mod executor;
pub mod geometry;
pub mod resources;
pub mod state;

pub use blend::BlendMode;
pub use canvas::{Canvas, DrawCommand};
pub use color::{Color, ColorInt};
pub use color_state_list::ColorStateList;
pub use decode::{DecodeError, Frame, FrameSource, ImageFrameSource};
pub use drawable::{
    AnimatedImageDrawable, AnimationCallback, AnyDrawable, Callback, ColorDrawable,
    ColorStateListDrawable, ConstantState, Drawable, DrawableId, LevelListDrawable,
    RippleDrawable, RoundRectShape, Runnable, ShapeDrawable,
};
pub use executor::{DecodeExecutor, ExecutorConfig, ExecutorError};
pub use geometry::{Insets, Rect, RectF};
pub use resources::{DisplayMetrics, Resources};
pub use state::{StateSet, StateSpec};

pub mod prelude {
    pub use crate::canvas::{Canvas, DrawCommand};
    pub use crate::color::{Color, ColorInt};
    pub use crate::color_state_list::ColorStateList;
    pub use crate::drawable::{
        AnimatedImageDrawable, AnyDrawable, Callback, ColorDrawable, ColorStateListDrawable,
        ConstantState, Drawable, DrawableId, LevelListDrawable, RippleConfig, RippleDrawable,
        RoundRectShape, Runnable, ShapeDrawable,
    };
    pub use crate::executor::{DecodeExecutor, ExecutorConfig};
    pub use crate::geometry::{Insets, Rect, RectF};
    pub use crate::resources::Resources;
    pub use crate::state::{StateSet, StateSpec};
}
