//! Presentation Pass: draws the current generation as a grid of squares.

use bytemuck::{Pod, Zeroable};
use lifegrid_engine::coords::Viewport;
use lifegrid_engine::paint::Color;
use lifegrid_engine::render::quad::{QuadBuffers, QuadVertex};
use lifegrid_engine::render::{RenderCtx, RenderTarget};

use crate::grid::GridDims;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GridViewUniform {
    viewport: [f32; 2],
    origin: [f32; 2],
    cell_size: f32,
    cols: u32,
    rows: u32,
    _pad: u32,
    live: [f32; 4],
    dead: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<GridViewUniform>() == 64);

/// Cell colors and size for [`GridRenderer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridStyle {
    pub cell_size: f32,
    pub live: Color,
    pub dead: Color,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            live: Color::BLACK,
            dead: Color::WHITE,
        }
    }
}

/// Instanced renderer: one unit quad per cell, colored from a cell arena.
///
/// Arenas are bound once per run with [`bind`](Self::bind); each frame draws
/// from the slot the store reports as current. The grid is centered in the
/// viewport. Output depends only on the bound arena contents.
pub struct GridRenderer {
    style: GridStyle,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: wgpu::BindGroupLayout,
    view_ubo: wgpu::Buffer,
    quad: QuadBuffers,

    dims: Option<GridDims>,
    /// One bind group per bound arena, indexed by slot.
    slots: Vec<wgpu::BindGroup>,
}

impl GridRenderer {
    pub fn new(device: &wgpu::Device, style: GridStyle) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lifegrid grid bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<GridViewUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let view_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lifegrid grid view ubo"),
            size: std::mem::size_of::<GridViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            style,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout,
            view_ubo,
            quad: QuadBuffers::new(device, "lifegrid grid"),
            dims: None,
            slots: Vec::new(),
        }
    }

    pub fn style(&self) -> GridStyle {
        self.style
    }

    pub fn set_style(&mut self, style: GridStyle) {
        self.style = style;
    }

    /// Binds the cell arenas of one run. Slot `i` draws from `arenas[i]`.
    ///
    /// Every arena must hold `dims.cell_count()` `u32` cells and carry
    /// `STORAGE` usage.
    pub fn bind(&mut self, device: &wgpu::Device, dims: GridDims, arenas: &[&wgpu::Buffer]) {
        self.slots = arenas
            .iter()
            .enumerate()
            .map(|(i, arena)| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("lifegrid grid slot {i}")),
                    layout: &self.bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: self.view_ubo.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: arena.as_entire_binding(),
                        },
                    ],
                })
            })
            .collect();
        self.dims = Some(dims);
    }

    /// Drops bind groups referencing the current run's arenas.
    pub fn unbind(&mut self) {
        self.slots.clear();
        self.dims = None;
    }

    pub fn is_bound(&self) -> bool {
        self.dims.is_some() && !self.slots.is_empty()
    }

    /// Draws the arena bound at `slot` into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, slot: usize) {
        let Some(dims) = self.dims else { return };
        if slot >= self.slots.len() {
            log::debug!("GridRenderer: slot {slot} not bound; skipped");
            return;
        }

        self.ensure_pipeline(ctx);
        self.write_view_uniform(ctx, dims);

        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        let mut rpass = target.begin_load_pass("lifegrid grid pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.slots[slot], &[]);
        rpass.set_vertex_buffer(0, self.quad.vertices.slice(..));
        rpass.set_index_buffer(self.quad.indices.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QuadBuffers::INDEX_COUNT, 0, 0..dims.cell_count() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lifegrid grid shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/grid.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lifegrid grid pipeline layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lifegrid grid pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn write_view_uniform(&self, ctx: &RenderCtx<'_>, dims: GridDims) {
        let u = grid_view(self.style, dims, ctx.viewport.width, ctx.viewport.height);
        ctx.queue.write_buffer(&self.view_ubo, 0, bytemuck::bytes_of(&u));
    }
}

fn grid_view(style: GridStyle, dims: GridDims, width: f32, height: f32) -> GridViewUniform {
    let viewport = Viewport::new(width.max(1.0), height.max(1.0));
    let origin = viewport.centered_origin(
        dims.cols() as f32 * style.cell_size,
        dims.rows() as f32 * style.cell_size,
    );

    GridViewUniform {
        viewport: [viewport.width, viewport.height],
        origin,
        cell_size: style.cell_size,
        cols: dims.cols(),
        rows: dims.rows(),
        _pad: 0,
        live: style.live.to_array(),
        dead: style.dead.to_array(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_centered() {
        let dims = GridDims::new(4, 10).unwrap();
        let u = grid_view(GridStyle::default(), dims, 105.0, 47.0);
        assert_eq!(u.origin, [2.5, 3.5]);
        assert_eq!(u.viewport, [105.0, 47.0]);
        assert_eq!((u.rows, u.cols), (4, 10));
    }

    #[test]
    fn colors_follow_style() {
        let style = GridStyle {
            cell_size: 4.0,
            live: Color::WHITE,
            dead: Color::BLACK,
        };
        let u = grid_view(style, GridDims::new(1, 1).unwrap(), 4.0, 4.0);
        assert_eq!(u.live, Color::WHITE.to_array());
        assert_eq!(u.dead, Color::BLACK.to_array());
        assert_eq!(u.cell_size, 4.0);
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let dims = GridDims::new(1, 1).unwrap();
        let u = grid_view(GridStyle::default(), dims, 0.0, -3.0);
        assert_eq!(u.viewport, [1.0, 1.0]);
    }
}
