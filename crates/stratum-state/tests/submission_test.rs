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

use std::sync::Arc;
use stratum_core::math::LinearRgba;
use stratum_core::renderer::api::*;
use stratum_infra::recording::{DeviceCommand, RecordingDevice, RecordingStateFactory};
use stratum_core::renderer::StateObjectFactory;
use stratum_state::{DrawCall, DrawContext, PipelineStateCache, SamplerStateCache, StateError};

struct Fixture {
    cache: Arc<PipelineStateCache>,
    samplers: Arc<SamplerStateCache>,
    context: DrawContext<RecordingDevice>,
}

impl Fixture {
    fn new() -> Self {
        stratum_infra::logging::init_with_default_filter("warn");
        let factory: Arc<dyn StateObjectFactory> = Arc::new(RecordingStateFactory::new());
        let cache = Arc::new(PipelineStateCache::new(Arc::clone(&factory)));
        let samplers = Arc::new(
            SamplerStateCache::new(factory, &EngineSettings::default())
                .expect("predefined samplers"),
        );
        let context = DrawContext::new(
            Arc::clone(&cache),
            Arc::clone(&samplers),
            RecordingDevice::new(),
        );
        Self {
            cache,
            samplers,
            context,
        }
    }

    fn sampler(&self) -> SamplerStateHandle {
        self.samplers
            .predefined(PredefinedSampler::Default)
            .expect("predefined sampler")
            .handle()
    }

    fn bindings(&self) -> ResourceBindingSet {
        bindings_with_sampler(self.sampler())
    }

    fn commands(&self) -> &[DeviceCommand] {
        self.context.device().commands()
    }

    fn clear_log(&mut self) {
        self.context.device_mut().clear_commands();
    }
}

fn descriptor() -> PipelineStateDescriptor {
    PipelineStateDescriptor::new(ShaderProgramId(1), Some(ShaderProgramId(2)))
}

fn bindings_with_sampler(sampler: SamplerStateHandle) -> ResourceBindingSet {
    ResourceBindingSet::default()
        .with_render_targets(vec![RenderTargetViewId(1)], Some(DepthStencilViewId(1)))
        .with_vertex_buffers(
            vec![VertexBufferBinding {
                buffer: BufferId(10),
                stride: 24,
                offset: 0,
            }],
            Some(InputLayoutId(1)),
        )
        .with_index_buffer(Some(IndexBufferBinding {
            buffer: BufferId(11),
            format: IndexFormat::Uint16,
            offset: 0,
        }))
        .with_constant_buffers(ShaderStage::Vertex, vec![BufferId(12)])
        .with_constant_buffers(ShaderStage::Pixel, vec![BufferId(13)])
        .with_shader_resources(ShaderStage::Pixel, vec![ShaderResourceViewId(1)])
        .with_pixel_samplers(vec![sampler])
}

fn indexed(count: u32) -> DrawKind {
    DrawKind::DrawIndexed {
        index_count: count,
        start_index: 0,
        base_vertex: 0,
    }
}

fn draw_call(fx: &Fixture) -> anyhow::Result<DrawCall> {
    let state = fx.cache.get_or_create(&descriptor())?;
    Ok(DrawCall::new(state, Arc::new(fx.bindings()), indexed(36))
        .with_parameters(DrawCallParameters::with_viewport(Viewport::from_size(
            1280.0, 720.0,
        ))))
}

#[test]
fn first_draw_applies_every_state() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;

    fx.context.submit(&draw)?;

    let state = &draw.pipeline_state;
    let commands = fx.commands();
    // 8 binding groups + 5 pipeline components + topology, viewports, scissors + draw.
    assert_eq!(commands.len(), 17);
    assert!(commands.contains(&DeviceCommand::SetRasterState(state.raster_state())));
    assert!(commands.contains(&DeviceCommand::SetDepthStencilState {
        state: state.depth_stencil_state(),
        stencil_reference: 0
    }));
    assert!(commands.contains(&DeviceCommand::SetBlendState {
        state: state.blend_state(),
        blend_factor: LinearRgba::WHITE,
        sample_mask: u32::MAX
    }));
    assert!(commands.contains(&DeviceCommand::SetVertexProgram(Some(ShaderProgramId(1)))));
    assert!(commands.contains(&DeviceCommand::SetPixelProgram(Some(ShaderProgramId(2)))));
    assert!(commands.contains(&DeviceCommand::SetPrimitiveTopology(
        PrimitiveTopology::TriangleList
    )));
    assert!(!commands.iter().any(|c| matches!(
        c,
        DeviceCommand::BindShaderResources {
            stage: ShaderStage::Vertex,
            ..
        }
    )));
    assert!(commands.contains(&DeviceCommand::BindSamplers {
        stage: ShaderStage::Pixel,
        samplers: vec![fx.sampler()]
    }));
    assert_eq!(
        commands.last(),
        Some(&DeviceCommand::DrawIndexed {
            index_count: 36,
            start_index: 0,
            base_vertex: 0
        })
    );
    Ok(())
}

#[test]
fn identical_resubmission_only_draws() -> anyhow::Result<()> {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();

    // --- 2. ACT ---
    fx.context.submit(&draw)?;

    // --- 3. ASSERT ---
    assert_eq!(fx.commands().len(), 1);
    assert!(fx.commands()[0].is_draw());
    let stats = fx.context.statistics();
    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.redundant_submissions, 1);
    Ok(())
}

#[test]
fn reset_forces_a_full_diff() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    let first_submission = fx.commands().to_vec();

    fx.context.reset(false);
    assert_eq!(fx.commands().last(), Some(&DeviceCommand::ClearState));
    fx.clear_log();
    fx.context.submit(&draw)?;

    assert_eq!(fx.commands(), &first_submission[..]);
    Ok(())
}

#[test]
fn index_buffer_change_rebinds_only_the_index_buffer() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();

    let new_index_buffer = IndexBufferBinding {
        buffer: BufferId(99),
        format: IndexFormat::Uint32,
        offset: 0,
    };
    let next = DrawCall {
        bindings: Arc::new(
            draw.bindings
                .as_ref()
                .clone()
                .with_index_buffer(Some(new_index_buffer)),
        ),
        ..draw.clone()
    };
    fx.context.submit(&next)?;

    assert_eq!(
        fx.commands(),
        &[
            DeviceCommand::BindIndexBuffer(Some(new_index_buffer)),
            DeviceCommand::DrawIndexed {
                index_count: 36,
                start_index: 0,
                base_vertex: 0
            },
        ]
    );
    Ok(())
}

#[test]
fn raster_only_pipeline_change_rebinds_raster() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();

    let wireframe = fx
        .cache
        .get_or_create(&descriptor().with_raster(RasterStateDescriptor::wireframe()))?;
    let next = DrawCall {
        pipeline_state: Arc::clone(&wireframe),
        ..draw.clone()
    };
    fx.context.submit(&next)?;

    assert_eq!(fx.commands().len(), 2);
    assert_eq!(
        fx.commands()[0],
        DeviceCommand::SetRasterState(wireframe.raster_state())
    );
    Ok(())
}

#[test]
fn blend_factor_change_reissues_blend_state() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();

    let factor = LinearRgba::new(0.5, 0.5, 0.5, 1.0);
    let next = draw.clone().with_parameters(DrawCallParameters {
        blend_factor: factor,
        ..draw.parameters.clone()
    });
    fx.context.submit(&next)?;

    assert_eq!(
        fx.commands()[0],
        DeviceCommand::SetBlendState {
            state: draw.pipeline_state.blend_state(),
            blend_factor: factor,
            sample_mask: u32::MAX
        }
    );
    assert_eq!(fx.commands().len(), 2);
    Ok(())
}

#[test]
fn new_viewport_list_with_same_values_is_reapplied() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();

    let next = draw.clone().with_parameters(DrawCallParameters {
        viewports: Arc::from(draw.parameters.viewports.to_vec()),
        ..draw.parameters.clone()
    });
    fx.context.submit(&next)?;

    assert_eq!(
        fx.commands()[0],
        DeviceCommand::SetViewports(vec![Viewport::from_size(1280.0, 720.0)])
    );
    assert_eq!(fx.commands().len(), 2);
    Ok(())
}

#[test]
fn every_draw_kind_is_dispatched() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    let kinds = [
        DrawKind::Draw {
            vertex_count: 3,
            start_vertex: 1,
        },
        indexed(6),
        DrawKind::DrawInstanced {
            vertex_count_per_instance: 4,
            instance_count: 10,
            start_vertex: 0,
            start_instance: 2,
        },
        DrawKind::DrawIndexedInstanced {
            index_count_per_instance: 6,
            instance_count: 3,
            start_index: 1,
            base_vertex: -2,
            start_instance: 0,
        },
    ];

    for kind in kinds {
        fx.context.submit(&draw.clone().with_kind(kind))?;
    }

    let draws: Vec<_> = fx.commands().iter().filter(|c| c.is_draw()).cloned().collect();
    assert_eq!(
        draws,
        vec![
            DeviceCommand::Draw {
                vertex_count: 3,
                start_vertex: 1
            },
            DeviceCommand::DrawIndexed {
                index_count: 6,
                start_index: 0,
                base_vertex: 0
            },
            DeviceCommand::DrawInstanced {
                vertex_count_per_instance: 4,
                instance_count: 10,
                start_vertex: 0,
                start_instance: 2
            },
            DeviceCommand::DrawIndexedInstanced {
                index_count_per_instance: 6,
                instance_count: 3,
                start_index: 1,
                base_vertex: -2,
                start_instance: 0
            },
        ]
    );
    assert_eq!(fx.context.statistics().draw_calls, 4);
    assert_eq!(fx.context.statistics().redundant_submissions, 3);
    Ok(())
}

#[test]
fn stale_pipeline_state_is_rejected() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.cache.clear();

    let err = fx.context.submit(&draw).unwrap_err();

    assert!(matches!(
        err,
        StateError::StalePipelineState {
            state_generation: 0,
            cache_generation: 1,
            ..
        }
    ));
    assert!(fx.commands().is_empty());
    assert_eq!(fx.context.statistics().draw_calls, 0);
    Ok(())
}

#[test]
fn recreated_state_after_clear_is_fully_applied() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.cache.clear();
    fx.clear_log();

    let fresh = DrawCall {
        pipeline_state: fx.cache.get_or_create(&descriptor())?,
        ..draw.clone()
    };
    fx.context.submit(&fresh)?;

    // The bindings and per-draw parameters are unchanged; the whole pipeline is not.
    assert_eq!(fx.commands().len(), 6);
    assert!(fx
        .commands()
        .contains(&DeviceCommand::SetRasterState(fresh.pipeline_state.raster_state())));
    Ok(())
}

#[test]
fn vertex_shader_resources_are_not_implemented() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    let next = DrawCall {
        bindings: Arc::new(
            fx.bindings().with_shader_resources(ShaderStage::Vertex, vec![ShaderResourceViewId(7)]),
        ),
        ..draw
    };

    let err = fx.context.submit(&next).unwrap_err();

    assert!(matches!(err, StateError::NotImplemented(_)));
    assert!(fx.commands().is_empty());
    assert!(fx.context.last_bindings().is_none());
    Ok(())
}

#[test]
fn limits_are_validated_before_any_device_call() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;

    let too_many_targets = DrawCall {
        bindings: Arc::new(
            fx.bindings().with_render_targets(vec![RenderTargetViewId(1); 9], None),
        ),
        ..draw.clone()
    };
    let too_many_viewports = draw.clone().with_parameters(DrawCallParameters {
        viewports: Arc::from(vec![Viewport::default(); 17]),
        ..DrawCallParameters::default()
    });
    let unindexed = DrawCall {
        bindings: Arc::new(fx.bindings().with_index_buffer(None)),
        ..draw
    };

    for bad in [too_many_targets, too_many_viewports, unindexed] {
        let err = fx.context.submit(&bad).unwrap_err();
        assert!(matches!(err, StateError::InvalidArgument(_)), "{err}");
    }
    assert!(fx.commands().is_empty());
    Ok(())
}

#[test]
fn device_state_tracks_the_last_draw_call() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let a = draw_call(&fx)?;
    let b = DrawCall {
        pipeline_state: fx.cache.get_or_create(
            &descriptor()
                .with_raster(RasterStateDescriptor::no_culling())
                .with_depth_stencil(DepthStencilStateDescriptor::depth_read_write()),
        )?,
        bindings: Arc::new(fx.bindings().with_index_buffer(None)),
        parameters: DrawCallParameters {
            topology: PrimitiveTopology::TriangleStrip,
            stencil_reference: 3,
            ..DrawCallParameters::default()
        },
        kind: DrawKind::Draw {
            vertex_count: 4,
            start_vertex: 0,
        },
    };

    for draw in [&a, &b, &b, &a, &b] {
        fx.context.submit(draw)?;
    }

    let bound = fx.context.device().bound_state();
    assert_eq!(bound.raster, Some(b.pipeline_state.raster_state()));
    assert_eq!(
        bound.depth_stencil,
        Some((b.pipeline_state.depth_stencil_state(), 3))
    );
    assert_eq!(bound.index_buffer, None);
    assert_eq!(bound.topology, Some(PrimitiveTopology::TriangleStrip));
    assert!(bound.viewports.is_empty());
    assert_eq!(fx.context.device().draw_count(), 5);
    assert_eq!(fx.context.statistics().redundant_submissions, 1);
    Ok(())
}

#[test]
fn statistics_can_be_reset() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.context.submit(&draw)?;
    assert_eq!(fx.context.statistics().draw_calls, 2);
    assert!((fx.context.statistics().redundancy_ratio() - 0.5).abs() < f64::EPSILON);

    fx.context.reset_statistics();

    assert_eq!(fx.context.statistics().draw_calls, 0);
    assert_eq!(fx.context.statistics().redundancy_ratio(), 0.0);
    Ok(())
}

#[test]
fn samplers_released_by_a_clear_are_rejected() -> anyhow::Result<()> {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();
    let released = fx.sampler();

    // --- 2. ACT ---
    fx.samplers.clear()?;
    let err = fx.context.submit(&draw).unwrap_err();

    // --- 3. ASSERT ---
    assert!(matches!(
        err,
        StateError::StaleSamplerState {
            handle,
            cache_generation: 1
        } if handle == released
    ));
    assert!(fx.commands().is_empty());
    assert_eq!(fx.context.statistics().draw_calls, 1);

    let rebuilt = DrawCall {
        bindings: Arc::new(fx.bindings()),
        ..draw
    };
    fx.context.submit(&rebuilt)?;
    assert!(fx.commands().contains(&DeviceCommand::BindSamplers {
        stage: ShaderStage::Pixel,
        samplers: vec![fx.sampler()]
    }));
    Ok(())
}

#[test]
fn samplers_from_outside_the_cache_are_rejected() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    let unknown = DrawCall {
        bindings: Arc::new(
            fx.bindings()
                .with_samplers(ShaderStage::Vertex, vec![SamplerStateHandle(usize::MAX)]),
        ),
        ..draw
    };

    let err = fx.context.submit(&unknown).unwrap_err();

    assert!(matches!(err, StateError::StaleSamplerState { .. }));
    assert!(fx.commands().is_empty());
    Ok(())
}

#[test]
fn vertex_sampler_change_rebinds_only_vertex_samplers() -> anyhow::Result<()> {
    // --- 1. ARRANGE ---
    let mut fx = Fixture::new();
    let draw = draw_call(&fx)?;
    fx.context.submit(&draw)?;
    fx.clear_log();
    let point = fx.samplers.predefined(PredefinedSampler::Point)?.handle();

    // --- 2. ACT ---
    let next = DrawCall {
        bindings: Arc::new(
            draw.bindings
                .as_ref()
                .clone()
                .with_samplers(ShaderStage::Vertex, vec![point]),
        ),
        ..draw.clone()
    };
    fx.context.submit(&next)?;

    // --- 3. ASSERT ---
    assert_eq!(
        fx.commands(),
        &[
            DeviceCommand::BindSamplers {
                stage: ShaderStage::Vertex,
                samplers: vec![point]
            },
            DeviceCommand::DrawIndexed {
                index_count: 36,
                start_index: 0,
                base_vertex: 0
            },
        ]
    );
    assert_eq!(fx.context.device().bound_state().vertex_samplers, vec![point]);
    assert_eq!(
        fx.context.device().bound_state().pixel_samplers,
        vec![fx.sampler()]
    );
    Ok(())
}

#[test]
fn states_from_another_cache_are_rejected() -> anyhow::Result<()> {
    let mut fx = Fixture::new();
    let other = PipelineStateCache::new(Arc::new(RecordingStateFactory::new()));
    let draw = DrawCall {
        pipeline_state: other.get_or_create(&descriptor())?,
        ..draw_call(&fx)?
    };

    let err = fx.context.submit(&draw).unwrap_err();

    assert!(matches!(err, StateError::ForeignPipelineState { index: 0 }));
    assert!(fx.commands().is_empty());
    Ok(())
}
