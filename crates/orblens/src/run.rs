//! Window bring-up, the event loop, and per-frame orchestration.
//!
//! Types:
//!
//! - `App` owns the GPU stack, the widgets, and the interaction state.
//! - `LaunchPlan` schedules the staged launch choreography.
//!
//! Functions:
//!
//! - `initialise_tracing` configures logging.
//! - `run` builds the window and drives the event loop until exit.
//!
//! Rendering is event-driven: every state mutation that affects visuals
//! requests a redraw, and the loop otherwise waits (or waits-until for the
//! next scheduled choreography step). Nothing polls on a fixed frame clock.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use glam::Vec2;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gesture::{
    CrossfadeIcon, GestureCoordinator, GestureThresholds, HintVisibility, OrbIcon, PageCarousel,
    ScrollState,
};
use renderer::{
    surface_mvp, BlitUniforms, GpuContext, IconInstance, LensRenderer, MetaballFieldState,
    MetaballRenderer, ProgramDescriptor, ShaderProgram, TextureSource, ViewToTextureBridge,
};

use crate::cli::Cli;
use crate::content::{paint_page, ContentProvider, ProceduralPages};
use crate::defaults;
use crate::haptics::{HapticSink, LogHaptics};
use crate::lens::LensWidget;
use crate::orb::OrbWidget;

const QUAD_VERT: &str = include_str!("../shaders/quad.vert");
const METABALL_FRAG: &str = include_str!("../shaders/metaball.frag");
const LENS_FRAG: &str = include_str!("../shaders/lens.frag");
const PAGE_FRAG: &str = include_str!("../shaders/page.frag");

pub fn initialise_tracing() {
    let default_filter =
        "warn,orblens=info,renderer=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let window = WindowBuilder::new()
        .with_title("orblens")
        .with_inner_size(LogicalSize::new(cli.width, cli.height))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut app = App::new(window.clone(), &cli).context("failed to initialise renderer")?;
    window.request_redraw();

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                WindowEvent::Resized(new_size) => app.resize(new_size),
                WindowEvent::CursorMoved { position, .. } => app.pointer_moved(position),
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => app.pointer_button(state),
                WindowEvent::RedrawRequested => match app.render_frame() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        app.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("surface out of memory; exiting");
                        elwt.exit();
                    }
                    Err(other) => {
                        warn!(error = ?other, "surface error; retrying next frame");
                    }
                },
                _ => {}
            },
            Event::AboutToWait => {
                let deadline_due = app
                    .next_deadline()
                    .is_some_and(|deadline| deadline <= Instant::now());
                if app.needs_frame() || deadline_due {
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else if let Some(deadline) = app.next_deadline() {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
                } else {
                    elwt.set_control_flow(ControlFlow::Wait);
                }
            }
            _ => {}
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}

/// Staged launch timeline. Each step fires once; a skipped plan fires none.
struct LaunchPlan {
    orb_reveal: Option<Instant>,
    hints_reveal: Option<Instant>,
    fake_drag: Option<Instant>,
}

impl LaunchPlan {
    fn scheduled(start: Instant) -> Self {
        Self {
            orb_reveal: Some(start + defaults::LAUNCH_ORB_REVEAL),
            hints_reveal: Some(start + defaults::LAUNCH_HINTS_REVEAL),
            fake_drag: Some(start + defaults::LAUNCH_FAKE_DRAG),
        }
    }

    fn skipped() -> Self {
        Self {
            orb_reveal: None,
            hints_reveal: None,
            fake_drag: None,
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.orb_reveal, self.hints_reveal, self.fake_drag]
            .into_iter()
            .flatten()
            .min()
    }

    fn take_due(&mut self, now: Instant) -> (bool, bool, bool) {
        let mut take = |slot: &mut Option<Instant>| match slot {
            Some(at) if now >= *at => {
                *slot = None;
                true
            }
            _ => false,
        };
        (
            take(&mut self.orb_reveal),
            take(&mut self.hints_reveal),
            take(&mut self.fake_drag),
        )
    }
}

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    bridge: ViewToTextureBridge,
    page_blit: ShaderProgram,
    metaballs: MetaballRenderer,
    lens_renderer: LensRenderer,
    orb: OrbWidget,
    lens: LensWidget,
    slot_icon: CrossfadeIcon,
    coordinator: GestureCoordinator,
    carousel: PageCarousel,
    pages: ProceduralPages,
    haptics: Box<dyn HapticSink>,
    hints: HintVisibility,
    launch: LaunchPlan,
    cursor: Vec2,
    last_tick: Instant,
    settle_deadline: Option<Instant>,
    page_dirty: bool,
    animating: bool,
}

impl App {
    fn new(window: Arc<Window>, cli: &Cli) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuContext::new(window.as_ref(), size)?;
        let (width, height) = (gpu.size.width, gpu.size.height);

        let bridge = ViewToTextureBridge::new(&gpu.device, width, height);
        let page_blit = ShaderProgram::new(
            &gpu.device,
            gpu.surface_format,
            &ProgramDescriptor {
                label: "page blit",
                vertex_source: QUAD_VERT,
                fragment_source: PAGE_FRAG,
                uniform_size: std::mem::size_of::<BlitUniforms>() as u64,
                texture_view: Some(bridge.texture_view()),
            },
        )?;
        let mut metaballs = MetaballRenderer::new(
            &gpu.device,
            gpu.surface_format,
            QUAD_VERT,
            METABALL_FRAG,
            width,
            height,
        )?;
        let lens_renderer = LensRenderer::new(
            &gpu.device,
            gpu.surface_format,
            QUAD_VERT,
            LENS_FRAG,
            &bridge,
            width,
            height,
        )?;

        let slot_center = slot_center(width, height);
        metaballs.set_slot(MetaballFieldState::new(
            slot_center,
            defaults::SLOT_RADIUS,
            defaults::SLOT_COLOR,
        ));

        let mut orb = OrbWidget::new();
        orb.set_rest(slot_center);

        let now = Instant::now();
        let launch = if cli.skip_onboarding {
            orb.show_immediately();
            LaunchPlan::skipped()
        } else {
            // Locked for the whole choreography; released when the scripted
            // drag completes.
            orb.set_user_input_enabled(false);
            LaunchPlan::scheduled(now)
        };

        let page_count = cli.pages.max(1);
        info!(width, height, pages = page_count, "orblens started");

        Ok(Self {
            window,
            gpu,
            bridge,
            page_blit,
            metaballs,
            lens_renderer,
            orb,
            lens: LensWidget::new(),
            slot_icon: CrossfadeIcon::new(OrbIcon::Empty),
            coordinator: GestureCoordinator::new(GestureThresholds::default()),
            carousel: PageCarousel::new(page_count),
            pages: ProceduralPages::new(page_count),
            haptics: Box::new(LogHaptics),
            hints: HintVisibility::default(),
            launch,
            cursor: Vec2::ZERO,
            last_tick: now,
            settle_deadline: None,
            page_dirty: true,
            animating: !cli.skip_onboarding,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.gpu.resize(new_size);
        let (width, height) = (new_size.width, new_size.height);

        self.bridge.resize(&self.gpu.device, width, height);
        self.page_blit
            .rebind_texture(&self.gpu.device, self.bridge.texture_view());
        self.lens_renderer.rebind(&self.gpu.device, &self.bridge);
        self.lens_renderer.resize(width, height);
        self.metaballs.resize(width, height);

        let slot_center = slot_center(width, height);
        self.metaballs.set_slot(MetaballFieldState::new(
            slot_center,
            defaults::SLOT_RADIUS,
            defaults::SLOT_COLOR,
        ));
        self.orb.set_rest(slot_center);

        self.page_dirty = true;
        self.window.request_redraw();
    }

    fn reconfigure(&mut self) {
        let size = self.gpu.size;
        self.gpu.resize(size);
        self.window.request_redraw();
    }

    fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = Vec2::new(position.x as f32, position.y as f32);
        if self.orb.is_dragging() {
            self.orb.pointer_moved(self.cursor);
            self.window.request_redraw();
        }
    }

    fn pointer_button(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.orb.pointer_down(self.cursor) {
                    self.window.request_redraw();
                }
            }
            ElementState::Released => {
                if self.orb.is_dragging() {
                    self.orb.pointer_up();
                    self.window.request_redraw();
                }
            }
        }
    }

    fn needs_frame(&self) -> bool {
        self.animating || self.page_dirty
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.launch.next_deadline(), self.settle_deadline]
            .into_iter()
            .flatten()
            .min()
    }

    /// Advances physics and gesture state by one frame and applies every
    /// decision to the render state.
    fn tick(&mut self, now: Instant) {
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        apply_launch_steps(&mut self.launch, &mut self.orb, &mut self.hints, now);

        let frame = self.orb.tick(dt);
        if frame.surface_revealed {
            info!("orb revealed");
        }
        if frame.fake_drag_ended {
            self.orb.set_user_input_enabled(true);
            debug!("onboarding drag finished");
        }

        if let Some(deadline) = self.settle_deadline {
            if now >= deadline {
                self.settle_deadline = None;
                if let Some(index) = self.carousel.set_scroll_state(ScrollState::Idle) {
                    debug!(index, "carousel wrapped");
                }
            }
        }

        let decisions = self
            .coordinator
            .update(frame.offset, self.orb.is_dragging(), now);

        self.orb.set_icon(decisions.orb_icon, now);
        self.slot_icon.set_icon(decisions.slot_icon, now);

        if let Some(direction) = decisions.page_advance {
            self.carousel.advance(direction);
            self.settle_deadline = Some(now + defaults::CAROUSEL_SETTLE);
            self.page_dirty = true;
            if let Some(page) = self.carousel.real_index(self.carousel.current_index()) {
                info!(direction, page, "page changed");
            }
        }
        for _ in 0..decisions.haptic_pulses {
            self.haptics.pulse();
        }
        if decisions.dismiss_hint_left || decisions.dismiss_hint_up || decisions.dismiss_hint_right
        {
            self.hints.dismiss(
                decisions.dismiss_hint_left,
                decisions.dismiss_hint_up,
                decisions.dismiss_hint_right,
            );
            if !self.hints.any_visible() {
                debug!("all onboarding hints dismissed");
            }
        }

        self.lens.set_attached(decisions.lens.attached);
        if decisions.lens.attached {
            self.lens.update_lens(
                frame.center,
                decisions.lens.expand_fraction,
                self.gpu.size.width as f32,
            );
            self.lens_renderer.set_params(self.lens.params());
        }

        let orb_radius = if decisions.orb_field_visible {
            defaults::ORB_RADIUS
        } else {
            0.0
        };
        self.metaballs.set_orb(MetaballFieldState::new(
            frame.center,
            orb_radius,
            defaults::ORB_COLOR,
        ));
        let (icon_in, icon_out) = self.orb.icon_layers(now);
        let (slot_in, _) = self.slot_icon.sample(now);
        self.metaballs.set_icons(
            icon_instance(icon_in),
            icon_instance(icon_out),
            icon_instance(slot_in),
        );

        self.animating =
            frame.animating || self.orb.icon_fading(now) || self.slot_icon.is_fading(now);
    }

    /// Repaints the bridged page texture for the current carousel position.
    fn render_page(&mut self) {
        let Some(page) = self.carousel.real_index(self.carousel.current_index()) else {
            return;
        };
        let style = self.pages.item_at(page);
        if let Some(mut canvas) = self.bridge.begin_frame() {
            paint_page(&mut canvas, &style, page);
            self.bridge.end_frame(canvas);
        }
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        self.tick(now);
        if self.page_dirty {
            self.render_page();
            self.page_dirty = false;
        }

        let frame = self.gpu.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        self.bridge.sample_update(&self.gpu.queue);
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(defaults::CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let (width, height) = (self.gpu.size.width as f32, self.gpu.size.height as f32);
            let blit_uniforms = BlitUniforms::new(surface_mvp(width, height), [width, height]);
            self.page_blit.draw(&self.gpu.queue, &mut pass, &blit_uniforms);

            if self.orb.surface_visible() {
                self.metaballs.render(&self.gpu.queue, &mut pass);
            }
            if self.lens.attached() {
                self.lens_renderer
                    .render(&self.gpu.queue, &mut pass, &self.bridge);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Fires whichever launch steps are due. User input is disabled when the
/// plan is scheduled and stays disabled across every step until the scripted
/// drag completes, so an early touch cannot interrupt the choreography.
fn apply_launch_steps(
    plan: &mut LaunchPlan,
    orb: &mut OrbWidget,
    hints: &mut HintVisibility,
    now: Instant,
) {
    let (orb_due, hints_due, fake_due) = plan.take_due(now);
    if orb_due {
        orb.show();
    }
    if hints_due {
        hints.reveal_all();
        info!("onboarding hints revealed");
    }
    if fake_due {
        if orb.begin_onboarding_drag(defaults::FAKE_DRAG_DELTA) {
            debug!("onboarding drag started");
        } else {
            warn!("onboarding drag refused; re-enabling input");
            orb.set_user_input_enabled(true);
        }
    }
}

fn slot_center(width: u32, height: u32) -> Vec2 {
    Vec2::new(
        width as f32 / 2.0,
        height as f32 - defaults::SLOT_BOTTOM_MARGIN,
    )
}

fn icon_instance(layer: gesture::icon::IconLayer) -> IconInstance {
    IconInstance::new(icon_kind(layer.icon), layer.alpha, layer.scale)
}

/// Glyph selector understood by the metaball fragment shader.
fn icon_kind(icon: OrbIcon) -> f32 {
    match icon {
        OrbIcon::Empty => 0.0,
        OrbIcon::Default => 1.0,
        OrbIcon::ArrowUp => 2.0,
        OrbIcon::ArrowLeft => 3.0,
        OrbIcon::ArrowRight => 4.0,
        OrbIcon::Close => 5.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_plan_fires_each_step_once() {
        let start = Instant::now();
        let mut plan = LaunchPlan::scheduled(start);
        assert_eq!(plan.take_due(start), (false, false, false));

        let after_orb = start + defaults::LAUNCH_ORB_REVEAL;
        assert_eq!(plan.take_due(after_orb), (true, false, false));
        assert_eq!(plan.take_due(after_orb), (false, false, false));

        let after_all = start + defaults::LAUNCH_FAKE_DRAG;
        assert_eq!(plan.take_due(after_all), (false, true, true));
        assert_eq!(plan.next_deadline(), None);
    }

    #[test]
    fn skipped_plan_never_fires() {
        let mut plan = LaunchPlan::skipped();
        assert_eq!(plan.next_deadline(), None);
        let far = Instant::now() + defaults::LAUNCH_FAKE_DRAG;
        assert_eq!(plan.take_due(far), (false, false, false));
    }

    #[test]
    fn input_stays_disabled_between_reveal_and_scripted_drag() {
        let start = Instant::now();
        let mut plan = LaunchPlan::scheduled(start);
        let mut orb = OrbWidget::new();
        let rest = Vec2::new(210.0, 660.0);
        orb.set_rest(rest);
        orb.set_user_input_enabled(false);
        let mut hints = HintVisibility::default();

        apply_launch_steps(&mut plan, &mut orb, &mut hints, start + defaults::LAUNCH_ORB_REVEAL);
        let mut revealed = false;
        for _ in 0..2000 {
            revealed |= orb.tick(1.0 / 60.0).surface_revealed;
            if revealed {
                break;
            }
        }
        assert!(revealed);

        // The orb is resting and visible, but the choreography still owns it:
        // a touch right on the orb must be refused.
        assert!(!orb.pointer_down(rest));

        apply_launch_steps(&mut plan, &mut orb, &mut hints, start + defaults::LAUNCH_FAKE_DRAG);
        assert!(hints.any_visible());

        let mut ended = false;
        for _ in 0..2000 {
            ended |= orb.tick(1.0 / 60.0).fake_drag_ended;
            if ended {
                break;
            }
        }
        assert!(ended);
        orb.set_user_input_enabled(true);
        assert!(orb.pointer_down(rest));
    }

    #[test]
    fn icon_kinds_are_distinct() {
        let kinds = [
            OrbIcon::Empty,
            OrbIcon::Default,
            OrbIcon::ArrowUp,
            OrbIcon::ArrowLeft,
            OrbIcon::ArrowRight,
            OrbIcon::Close,
        ]
        .map(icon_kind);
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
