// ABOUTME: Slide positioning engine placing each slide in 3-D space
// ABOUTME: Advances a running coordinate/rotation/scale state once per slide

use crate::theme::SlideGlobal;
use log::debug;

/// Running placement state; one instance is shared by a whole deck.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub coords: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: f64,
    started: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            coords: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
            started: false,
        }
    }
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next slide using its effective slide theme.
    ///
    /// The first slide sits at the origin declared by the theme; later slides
    /// move by the theme's step vector. Explicit `data-x/y/z` values replace
    /// the corresponding axis.
    pub fn set_position(&mut self, theme: &SlideGlobal) {
        let explicit = theme.explicit_coords();
        let step = if self.started {
            theme.step()
        } else {
            self.coords = [0.0; 3];
            [0.0; 3]
        };
        for axis in 0..3 {
            self.coords[axis] = match explicit[axis] {
                Some(value) => value,
                None => self.coords[axis] + step[axis],
            };
        }
        self.rotation = theme.rotation();
        self.scale = theme.scale();
        self.started = true;
        debug!(
            "Slide placed at {:?} rotation {:?} scale {}",
            self.coords, self.rotation, self.scale
        );
    }
}
