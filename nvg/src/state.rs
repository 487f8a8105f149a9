// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state and the save/restore stack.

use peniko::color::palette::css::{BLACK, WHITE};
use peniko::kurbo::{Affine, Cap, Join};

use crate::{CompositeState, Error, Paint, MAX_STATES};

/// Clip rectangle, stored as a transform to its center and its half size.
///
/// A negative extent means no clipping.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Scissor {
    pub transform: Affine,
    pub extent: [f32; 2],
}

impl Scissor {
    /// No clipping.
    pub const NONE: Self = Self {
        transform: Affine::IDENTITY,
        extent: [-1.0, -1.0],
    };

    pub fn is_active(&self) -> bool {
        self.extent[0] >= 0.0
    }
}

impl Default for Scissor {
    fn default() -> Self {
        Self::NONE
    }
}

/// One frame of the state stack.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct State {
    pub composite: CompositeState,
    pub shape_anti_alias: bool,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub miter_limit: f32,
    pub line_join: Join,
    pub line_cap: Cap,
    pub alpha: f32,
    pub transform: Affine,
    pub scissor: Scissor,
}

impl Default for State {
    fn default() -> Self {
        Self {
            composite: CompositeState::default(),
            shape_anti_alias: true,
            fill: Paint::color(WHITE),
            stroke: Paint::color(BLACK),
            stroke_width: 1.0,
            miter_limit: 10.0,
            line_join: Join::Miter,
            line_cap: Cap::Butt,
            alpha: 1.0,
            transform: Affine::IDENTITY,
            scissor: Scissor::NONE,
        }
    }
}

/// Bounded stack of [`State`]s.
///
/// The current state lives outside the saved frames so there always is one, and
/// the depth counts it as the base frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct StateStack {
    current: State,
    saved: Vec<State>,
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            current: State::default(),
            saved: Vec::with_capacity(MAX_STATES - 1),
        }
    }

    pub fn current(&self) -> &State {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut State {
        &mut self.current
    }

    /// Number of frames, including the base frame.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn save(&mut self) -> Result<(), Error> {
        if self.depth() >= MAX_STATES {
            return Err(Error::StateStackOverflow { depth: MAX_STATES });
        }
        self.saved.push(self.current.clone());
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), Error> {
        let previous = self.saved.pop().ok_or(Error::StateStackUnderflow)?;
        self.current = previous;
        Ok(())
    }

    /// Resets the current frame to the defaults, keeping saved frames.
    pub fn reset(&mut self) {
        self.current = State::default();
    }

    /// Drops every saved frame and resets the base frame.
    pub fn clear(&mut self) {
        self.saved.clear();
        self.reset();
    }
}
