/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use api::{AggregatedRenderPassId, CompositorRenderPassId, SurfaceId};
use api::units::DeviceIntRect;
use crate::resolved_frame::ResolvedFrameData;
use crate::resolved_pass::{MergeState, RenderPassSource};
use crate::resource_provider::{ChildId, DisplayResourceId};
use ron::{de, ser};
use serde::{Deserialize, Serialize};


pub struct CaptureConfig {
    pub root: PathBuf,
    pretty: ser::PrettyConfig,
}

impl CaptureConfig {
    pub fn new(root: PathBuf) -> Self {
        CaptureConfig {
            root,
            pretty: ser::PrettyConfig::default(),
        }
    }

    pub fn serialize<T, P>(&self, data: &T, name: P) -> io::Result<()>
    where
        T: Serialize,
        P: AsRef<Path>,
    {
        let ron = ser::to_string_pretty(data, self.pretty.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let path = self.root
            .join(name)
            .with_extension("ron");
        let mut file = File::create(path)?;
        writeln!(file, "{}", ron)
    }

    pub fn deserialize<T, P>(root: &Path, name: P) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
        P: AsRef<Path>,
    {
        let mut string = String::new();
        let path = root
            .join(name)
            .with_extension("ron");
        File::open(path)
            .ok()?
            .read_to_string(&mut string)
            .ok()?;
        match de::from_str(&string) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("unable to read capture: {}", e);
                None
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CapturedPass {
    pub render_pass_id: CompositorRenderPassId,
    pub remapped_id: AggregatedRenderPassId,
    pub is_root: bool,
    pub embed_count: u32,
    pub embedded_passes: Vec<CompositorRenderPassId>,
    pub remapped_resources: Vec<DisplayResourceId>,
    pub source: RenderPassSource,
    pub merge_state: MergeState,
}

/// What a `ResolvedFrameData` made of its surface's active frame.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CapturedFrameData {
    pub surface_id: SurfaceId,
    pub child_id: ChildId,
    pub valid: bool,
    pub frame_index: Option<u64>,
    pub previous_frame_index: Option<u64>,
    pub output_rect: DeviceIntRect,
    pub surface_damage: DeviceIntRect,
    pub passes: Vec<CapturedPass>,
}

impl ResolvedFrameData {
    pub fn capture(&self) -> CapturedFrameData {
        let passes = self.resolved_passes().map(|pass| {
            CapturedPass {
                render_pass_id: pass.render_pass_id(),
                remapped_id: pass.remapped_id(),
                is_root: pass.is_root(),
                embed_count: pass.embed_count(),
                embedded_passes: pass
                    .embedded_passes()
                    .iter()
                    .map(|&index| self.resolved_pass(index).render_pass_id())
                    .collect(),
                remapped_resources: pass
                    .draw_quads()
                    .iter()
                    .flat_map(|quad| quad.remapped_resources.iter().cloned())
                    .collect(),
                source: pass.render_pass_source(),
                merge_state: pass.previous_persistent_data().merge_state,
            }
        }).collect();

        CapturedFrameData {
            surface_id: self.surface_id(),
            child_id: self.child_id(),
            valid: self.is_valid(),
            frame_index: self.frame_index(),
            previous_frame_index: self.previous_frame_index(),
            output_rect: self.output_rect(),
            surface_damage: self.surface_damage(),
            passes,
        }
    }
}
