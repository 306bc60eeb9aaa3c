// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Stratum Sandbox
// Renders a few frames of a small scene against the recording device and
// reports how much state the engine skipped.

use std::sync::Arc;

use anyhow::Result;
use stratum_core::renderer::api::*;
use stratum_core::renderer::StateObjectFactory;
use stratum_infra::recording::{RecordingDevice, RecordingStateFactory};
use stratum_state::{DrawCall, DrawContext, PipelineStateCache, SamplerStateCache};

const FRAMES: usize = 3;

/// Loads the settings from the JSON file given as first argument, if any.
fn load_settings() -> Result<EngineSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let settings = EngineSettings::from_json_str(&json)?;
            log::info!("Loaded settings from {path}");
            Ok(settings)
        }
        None => Ok(EngineSettings::default()),
    }
}

fn build_scene(
    cache: &PipelineStateCache,
    samplers: &SamplerStateCache,
) -> Result<Vec<DrawCall>> {
    let opaque = cache.get_or_create(
        &PipelineStateDescriptor::new(ShaderProgramId(1), Some(ShaderProgramId(2)))
            .with_depth_stencil(DepthStencilStateDescriptor::depth_read_write()),
    )?;
    let transparent = cache.get_or_create(
        &PipelineStateDescriptor::new(ShaderProgramId(1), Some(ShaderProgramId(3)))
            .with_depth_stencil(DepthStencilStateDescriptor::depth_read_only())
            .with_blend(BlendStateDescriptor {
                targets: BlendStates::single(RenderTargetBlendDescriptor::ALPHA_BLEND),
                ..BlendStateDescriptor::default()
            }),
    )?;
    let debug_lines = cache.get_or_create(
        &PipelineStateDescriptor::new(ShaderProgramId(4), Some(ShaderProgramId(5)))
            .with_raster(RasterStateDescriptor::wireframe()),
    )?;

    let sampler = samplers.predefined(PredefinedSampler::Anisotropic)?;
    let mesh = Arc::new(
        ResourceBindingSet::default()
            .with_render_targets(vec![RenderTargetViewId(1)], Some(DepthStencilViewId(1)))
            .with_vertex_buffers(
                vec![VertexBufferBinding {
                    buffer: BufferId(1),
                    stride: 32,
                    offset: 0,
                }],
                Some(InputLayoutId(1)),
            )
            .with_index_buffer(Some(IndexBufferBinding {
                buffer: BufferId(2),
                format: IndexFormat::Uint16,
                offset: 0,
            }))
            .with_constant_buffers(ShaderStage::Vertex, vec![BufferId(3)])
            .with_shader_resources(ShaderStage::Pixel, vec![ShaderResourceViewId(1)])
            .with_pixel_samplers(vec![sampler.handle()]),
    );
    let parameters = DrawCallParameters::with_viewport(Viewport::from_size(1280.0, 720.0));
    let mesh_draw = DrawKind::DrawIndexed {
        index_count: 36,
        start_index: 0,
        base_vertex: 0,
    };

    let mut scene = Vec::new();
    for _ in 0..4 {
        scene.push(
            DrawCall::new(Arc::clone(&opaque), Arc::clone(&mesh), mesh_draw)
                .with_parameters(parameters.clone()),
        );
    }
    scene.push(
        DrawCall::new(transparent, Arc::clone(&mesh), mesh_draw).with_parameters(DrawCallParameters {
            blend_factor: stratum_core::LinearRgba::new(1.0, 1.0, 1.0, 0.5),
            ..parameters.clone()
        }),
    );
    scene.push(
        DrawCall::new(
            debug_lines,
            Arc::new(mesh.as_ref().clone().with_index_buffer(None)),
            DrawKind::Draw {
                vertex_count: 24,
                start_vertex: 0,
            },
        )
        .with_parameters(DrawCallParameters {
            topology: PrimitiveTopology::LineList,
            ..parameters
        }),
    );
    Ok(scene)
}

fn main() -> Result<()> {
    stratum_infra::logging::init();

    let settings = load_settings()?;
    settings.validate()?;

    let factory = Arc::new(RecordingStateFactory::new());
    let shared: Arc<dyn StateObjectFactory> = factory.clone();
    let cache = Arc::new(PipelineStateCache::with_settings(
        Arc::clone(&shared),
        settings.clone(),
    ));
    let samplers = Arc::new(SamplerStateCache::new(shared, &settings)?);
    let scene = build_scene(&cache, &samplers)?;
    log::info!(
        "Scene uses {} pipeline states and {} samplers",
        cache.len(),
        samplers.len()
    );

    let mut context = DrawContext::new(
        Arc::clone(&cache),
        Arc::clone(&samplers),
        RecordingDevice::new(),
    );
    for frame in 0..FRAMES {
        for draw in &scene {
            context.submit(draw)?;
        }
        let commands = context.device_mut().take_commands();
        let state_changes = commands.iter().filter(|c| c.is_state_change()).count();
        log::info!(
            "Frame {frame}: {} device commands, {state_changes} state changes",
            commands.len()
        );
    }

    let stats = context.statistics();
    log::info!(
        "{} draws, {} pipeline changes, {} binding changes, {} redundant ({:.0}%)",
        stats.draw_calls,
        stats.pipeline_state_changes,
        stats.binding_changes,
        stats.redundant_submissions,
        stats.redundancy_ratio() * 100.0
    );

    context.reset(true);
    cache.clear();
    for kind in [
        StateObjectKind::Raster,
        StateObjectKind::DepthStencil,
        StateObjectKind::Blend,
    ] {
        log::debug!(
            "{kind} objects: {} created, {} live",
            factory.created(kind),
            factory.live(kind)
        );
    }

    Ok(())
}
