//! 2D Infinite Square Well Visualization
//!
//! Real part, imaginary part and probability density of a stationary state
//! (nx, ny), animated in real time as three overlaid height fields.
//!
//! Controls:
//! - Left mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Pause/resume
//! - R: Reset time
//! - 1/2/3/4: Show all / real / imaginary / probability
//! - Left/Right: Change nx
//! - Up/Down: Change ny
//! - +/-: Adjust time speed
//! - H: Hide/show panels

use common::{Camera3D, GraphicsContext};
use glam::Vec3;
use quantum_well::config::{CameraPreset, WellConfig, MAX_FRAME_DT};
use quantum_well::controls::{command_for_key, draw_control_panel, draw_status_bar};
use quantum_well::equations_ui::{draw_equations_sidebar, WELL_EQUATIONS, WELL_VARIABLES};
use quantum_well::renderer::WellRenderer;
use quantum_well::{ControlCommand, QuantumWell};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: WellRenderer,
    well: QuantumWell,
    camera: Camera3D,
    camera_preset: CameraPreset,
    show_panels: bool,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, well: QuantumWell) -> Self {
        let renderer = WellRenderer::new(&ctx, well.surfaces());

        let camera_preset = CameraPreset::for_width(ctx.size.width);
        let camera = preset_camera(camera_preset, ctx.aspect_ratio());
        log::info!(
            "Window {}×{}, {} camera layout",
            ctx.size.width,
            ctx.size.height,
            if camera_preset.is_compact() { "compact" } else { "desktop" }
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &ctx.device,
            ctx.config.format,
            None,
            1,
        );

        Self {
            ctx,
            renderer,
            well,
            camera,
            camera_preset,
            show_panels: true,
            mouse_pressed: false,
            last_mouse_pos: None,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        // Minimizing reports 0×0; the surface keeps its size until restored
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer
            .resize(&self.ctx.device, self.ctx.size.width, self.ctx.size.height);

        if let Some(preset) = self
            .camera_preset
            .after_resize(self.ctx.size.width, self.ctx.size.height)
        {
            log::info!(
                "Switching to {} camera layout",
                if preset.is_compact() { "compact" } else { "desktop" }
            );
            self.camera_preset = preset;
            self.camera = preset_camera(preset, self.ctx.aspect_ratio());
        }
    }

    fn update(&mut self, dt: f32) {
        self.well.tick(dt);
    }

    fn apply(&mut self, command: ControlCommand) {
        match self.well.apply(command) {
            Ok(effect) => log::debug!("{:?} -> {:?}", command, effect),
            Err(e) => log::warn!("Rejected {:?}: {}", command, e),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        self.renderer.upload(&self.ctx.queue, &self.well);

        // Build egui UI; commands are applied after the pass so the frame
        // draws one consistent state
        let mut commands = Vec::new();
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            let state = self.well.state();
            draw_status_bar(ctx, state, self.camera_preset.is_compact());
            if self.show_panels {
                commands = draw_control_panel(ctx, state);
                draw_equations_sidebar(
                    ctx,
                    "Infinite Square Well",
                    WELL_EQUATIONS,
                    WELL_VARIABLES,
                    state,
                );
            }
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &self.well);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for command in commands {
            self.apply(command);
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        if key == KeyCode::KeyH {
            self.show_panels = !self.show_panels;
            return;
        }

        if let Some(command) = command_for_key(key, self.well.state()) {
            self.apply(command);
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.mouse_pressed {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let dx = (x - last_x) as f32 * 0.01;
                let dy = (y - last_y) as f32 * 0.01;
                self.camera.orbit(-dx, dy);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.zoom(delta * 0.5);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn preset_camera(preset: CameraPreset, aspect_ratio: f32) -> Camera3D {
    let mut camera = Camera3D::looking_at(Vec3::from_array(preset.position), Vec3::ZERO, aspect_ratio);
    camera.set_distance_limits(preset.min_distance, preset.max_distance);
    camera
}

fn main() {
    let (ctx, event_loop) = match pollster::block_on(GraphicsContext::new(
        "Quantum Well - 2D Infinite Square Well",
        1280,
        720,
    )) {
        Ok(init) => init,
        Err(e) => {
            log::error!("Graphics initialization failed: {}", e);
            eprintln!("This program needs a GPU with Vulkan, Metal, DX12 or OpenGL support: {}", e);
            std::process::exit(1);
        }
    };

    let well = match QuantumWell::new(&WellConfig::default()) {
        Ok(well) => well,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx, well);
    let mut last_time = std::time::Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::MouseInput { state, button, .. } => {
                            if *button == MouseButton::Left {
                                app.mouse_pressed = *state == ElementState::Pressed;
                                if !app.mouse_pressed {
                                    app.last_mouse_pos = None;
                                }
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => app.handle_key(*key, *state),
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32().min(MAX_FRAME_DT);
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("GPU out of memory");
                                    elwt.exit();
                                }
                                Err(e) => log::warn!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(e) = result {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
