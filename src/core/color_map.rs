//! Per-color data storage.
//!
//! `ColorMap` is a fixed two-slot store indexed by `Color`, used for
//! clocks, agents and anything else kept once per side.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::color::Color;

/// Per-color data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use reversi_arena::core::{Color, ColorMap};
///
/// let mut pieces: ColorMap<u32> = ColorMap::with_value(2);
/// pieces[Color::Black] += 1;
///
/// assert_eq!(pieces[Color::Black], 3);
/// assert_eq!(pieces[Color::White], 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(Color) -> T) -> Self {
        Self {
            data: [factory(Color::Black), factory(Color::White)],
        }
    }

    /// Create a map with explicit values for each color.
    pub fn from_pair(black: T, white: T) -> Self {
        Self { data: [black, white] }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a color's entry.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's entry.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Color, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Color, &mut T)> {
        Color::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Transform every entry, keeping the color association.
    pub fn map<U>(self, mut f: impl FnMut(Color, T) -> U) -> ColorMap<U> {
        let [black, white] = self.data;
        ColorMap {
            data: [f(Color::Black, black), f(Color::White, white)],
        }
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}
