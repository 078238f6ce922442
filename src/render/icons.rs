// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Unicode symbols for the TUI.
//!
//! Variation Selector-15 (`\u{FE0E}`) asks terminals to draw a symbol as
//! monochrome text rather than a colourful emoji, so that it respects the
//! TUI's styling.

pub(crate) const ICON_CAMERA: &str = "\u{1F4F7}\u{FE0E}";
pub(crate) const ICON_CORRECT: &str = "\u{2714}";
pub(crate) const ICON_WRONG: &str = "\u{2718}";
pub(crate) const ICON_SELECTED: &str = "\u{25B6}";
pub(crate) const ICON_LOADING: &str = "\u{231B}\u{FE0E}";
pub(crate) const ICON_TROPHY: &str = "\u{1F3C6}\u{FE0E}";
