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

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use stratum_core::renderer::api::*;
use stratum_infra::recording::{RecordingDevice, RecordingStateFactory};
use stratum_core::renderer::StateObjectFactory;
use stratum_state::{DrawCall, DrawContext, PipelineStateCache, SamplerStateCache};

fn descriptor(program: usize) -> PipelineStateDescriptor {
    PipelineStateDescriptor::new(ShaderProgramId(program), Some(ShaderProgramId(program + 1)))
}

fn bench_cache(c: &mut Criterion) {
    let cache = PipelineStateCache::new(Arc::new(RecordingStateFactory::new()));
    // 256 entries sharing a handful of sub-state objects.
    for i in 0..256 {
        let raster = if i % 2 == 0 {
            RasterStateDescriptor::default()
        } else {
            RasterStateDescriptor::no_culling()
        };
        let _ = cache.get_or_create(&descriptor(i * 2).with_raster(raster));
    }

    let mut group = c.benchmark_group("Pipeline State Cache");

    group.bench_function("Hit (first entry)", |b| {
        let first = descriptor(0);
        b.iter(|| black_box(cache.get_or_create(black_box(&first))));
    });

    group.bench_function("Hit (last entry)", |b| {
        let last = descriptor(510).with_raster(RasterStateDescriptor::no_culling());
        b.iter(|| black_box(cache.get_or_create(black_box(&last))));
    });

    group.finish();
}

fn bench_submit(c: &mut Criterion) {
    let factory: Arc<dyn StateObjectFactory> = Arc::new(RecordingStateFactory::new());
    let cache = Arc::new(PipelineStateCache::new(Arc::clone(&factory)));
    let Ok(samplers) = SamplerStateCache::new(factory, &EngineSettings::default()) else {
        return;
    };
    let samplers = Arc::new(samplers);
    let opaque = cache.get_or_create(&descriptor(0));
    let blended = cache.get_or_create(&descriptor(0).with_blend(BlendStateDescriptor {
        targets: BlendStates::single(RenderTargetBlendDescriptor::ALPHA_BLEND),
        ..BlendStateDescriptor::default()
    }));
    let (Ok(opaque), Ok(blended)) = (opaque, blended) else {
        return;
    };
    let bindings = Arc::new(
        ResourceBindingSet::default()
            .with_render_targets(vec![RenderTargetViewId(1)], Some(DepthStencilViewId(1)))
            .with_constant_buffers(ShaderStage::Vertex, vec![BufferId(1)]),
    );
    let kind = DrawKind::Draw {
        vertex_count: 3,
        start_vertex: 0,
    };
    let a = DrawCall::new(opaque, Arc::clone(&bindings), kind);
    let b = DrawCall::new(blended, bindings, kind);

    let mut group = c.benchmark_group("Draw Submission");

    group.bench_function("Redundant", |bench| {
        let mut context = DrawContext::new(
            Arc::clone(&cache),
            Arc::clone(&samplers),
            RecordingDevice::new(),
        );
        bench.iter(|| {
            let _ = context.submit(black_box(&a));
            context.device_mut().clear_commands();
        });
    });

    group.bench_function("Alternating blend state", |bench| {
        let mut context = DrawContext::new(
            Arc::clone(&cache),
            Arc::clone(&samplers),
            RecordingDevice::new(),
        );
        bench.iter(|| {
            let _ = context.submit(black_box(&a));
            let _ = context.submit(black_box(&b));
            context.device_mut().clear_commands();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cache, bench_submit);
criterion_main!(benches);
