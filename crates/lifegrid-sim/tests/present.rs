//! Grid renderer output read back from an offscreen target.
//!
//! Each test returns early when the machine has no usable adapter.

use lifegrid_engine::coords::Viewport;
use lifegrid_engine::device::{ComputeDevice, request_compute_device};
use lifegrid_engine::paint::Color;
use lifegrid_engine::render::{RenderCtx, RenderTarget};
use lifegrid_sim::{Generation, GpuBackend, GridRenderer, GridStyle, Simulation};

const SIZE: u32 = 64;
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const CELL: u32 = 8;

const LIVE: [u8; 4] = [0, 0, 0, 255];
const DEAD: [u8; 4] = [255, 255, 255, 255];

fn device() -> Option<ComputeDevice> {
    match pollster::block_on(request_compute_device("lifegrid present test")) {
        Ok(gpu) => Some(gpu),
        Err(err) => {
            eprintln!("skipping GPU test: {err:#}");
            None
        }
    }
}

/// Offscreen color target the renderer draws into.
struct Canvas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Canvas {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lifegrid test canvas"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Clears to light gray, draws `slot`, and returns tightly packed RGBA rows.
    fn draw(&self, gpu: &ComputeDevice, renderer: &mut GridRenderer, slot: usize) -> Vec<u8> {
        let device = &gpu.device;
        let viewport = Viewport::new(SIZE as f32, SIZE as f32);
        let rctx = RenderCtx::new(device, &gpu.queue, FORMAT, viewport);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lifegrid test encoder"),
        });
        {
            let mut target = RenderTarget::new(&mut encoder, &self.view);
            target.clear(Color::LIGHT_GRAY);
            renderer.render(&rctx, &mut target, slot);
        }

        // 64 texels of 4 bytes meet the 256-byte row alignment exactly.
        let bytes_per_row = SIZE * 4;
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lifegrid test readback"),
            size: u64::from(bytes_per_row * SIZE),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        let submission = gpu.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: None,
            })
            .unwrap();
        rx.recv().unwrap().unwrap();

        let pixels = slice.get_mapped_range().to_vec();
        staging.unmap();
        pixels
    }
}

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let at = ((y * SIZE + x) * 4) as usize;
    [pixels[at], pixels[at + 1], pixels[at + 2], pixels[at + 3]]
}

/// Center of cell `(row, col)` for a grid of `rows` x `cols` centered in the canvas.
fn cell_center(rows: u32, cols: u32, row: u32, col: u32) -> (u32, u32) {
    let left = (SIZE - cols * CELL) / 2;
    let top = (SIZE - rows * CELL) / 2;
    (left + col * CELL + CELL / 2, top + row * CELL + CELL / 2)
}

/// Asserts every cell center shows the color of the matching pattern cell.
fn assert_cells(pixels: &[u8], rows: &[&str]) {
    let (h, w) = (rows.len() as u32, rows[0].len() as u32);
    for (r, line) in rows.iter().enumerate() {
        for (c, ch) in line.chars().enumerate() {
            let (x, y) = cell_center(h, w, r as u32, c as u32);
            let expected = if ch == '#' { LIVE } else { DEAD };
            assert_eq!(pixel(pixels, x, y), expected, "cell ({r}, {c})");
        }
    }
}

fn assert_background(pixels: &[u8]) {
    // 0.9 quantizes to 229 or 230 depending on rounding.
    for (x, y) in [(2, 2), (SIZE - 3, 2), (2, SIZE - 3), (SIZE - 3, SIZE - 3)] {
        let [r, g, b, a] = pixel(pixels, x, y);
        for channel in [r, g, b] {
            assert!((228..=231).contains(&channel), "background at ({x}, {y})");
        }
        assert_eq!(a, 255);
    }
}

#[test]
fn draws_current_generation_centered() {
    let Some(gpu) = device() else { return };
    let horizontal = [".....", ".....", ".###.", ".....", "....."];
    let vertical = [".....", "..#..", "..#..", "..#..", "....."];

    let initial = Generation::from_rows(&horizontal).unwrap();
    let dims = initial.dims();
    let backend = GpuBackend::new(gpu.clone()).unwrap();
    let mut sim = Simulation::initialize_with(backend, initial).unwrap();

    let style = GridStyle {
        cell_size: CELL as f32,
        ..GridStyle::default()
    };
    let mut renderer = GridRenderer::new(&gpu.device, style);
    {
        let [a, b] = sim.store().arenas().unwrap();
        renderer.bind(&gpu.device, dims, &[a, b]);
    }
    let canvas = Canvas::new(&gpu.device);

    let slot = sim.store().current_index().unwrap();
    let pixels = canvas.draw(&gpu, &mut renderer, slot);
    assert_cells(&pixels, &horizontal);
    assert_background(&pixels);

    sim.advance().unwrap();
    let slot = sim.store().current_index().unwrap();
    assert_eq!(slot, 1);
    let pixels = canvas.draw(&gpu, &mut renderer, slot);
    assert_cells(&pixels, &vertical);
    assert_background(&pixels);

    renderer.unbind();
    sim.release().unwrap();
}

#[test]
fn unbound_renderer_leaves_clear_color() {
    let Some(gpu) = device() else { return };
    let mut renderer = GridRenderer::new(&gpu.device, GridStyle::default());
    let canvas = Canvas::new(&gpu.device);

    let pixels = canvas.draw(&gpu, &mut renderer, 0);
    assert_background(&pixels);
    let (x, y) = (SIZE / 2, SIZE / 2);
    let [r, ..] = pixel(&pixels, x, y);
    assert!((228..=231).contains(&r), "center: {r}");
}
