/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};

/// Knobs the display compositor sets once for every surface it resolves.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct ResolvedFrameConfig {
    /// Apply offset tag values to tagged quads. When off,
    /// `update_offset_tags` does nothing and tagged quads draw unmoved.
    pub enable_offset_tags: bool,
    /// Let a root pass whose client id changed keep the previous root's
    /// aggregated id.
    pub reuse_root_pass_id: bool,
}

impl Default for ResolvedFrameConfig {
    fn default() -> Self {
        ResolvedFrameConfig {
            enable_offset_tags: true,
            reuse_root_pass_id: true,
        }
    }
}
