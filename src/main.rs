// main.rs — window, event loop and frame driver

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use panorama_tour::assets::{spawn_load, AssetSlot, LoadedAsset};
use panorama_tour::config::ViewerConfig;
use panorama_tour::error::ViewerError;
use panorama_tour::i18n;
use panorama_tour::renderer::Renderer;
use panorama_tour::session::ViewerSession;
use panorama_tour::ui::{draw_ui, pick_image_file, UiAction, UiState};
use panorama_tour::viewer::PanoramaViewer;

use glam::Vec2;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let lang = i18n::resolve_lang_from_args();
    i18n::init(lang.clone());

    let config = match ViewerConfig::from_args() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title(i18n::tr("app.title"))
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)
    {
        Ok(w) => Arc::new(w),
        Err(e) => {
            log::error!("{}", ViewerError::ContextUnavailable(e.to_string()));
            std::process::exit(1);
        }
    };

    let renderer = match pollster::block_on(Renderer::new(&window)) {
        Ok(r) => r,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut viewer = PanoramaViewer::new(&config);
    let size = window.inner_size();
    viewer.resize(Vec2::new(size.width as f32, size.height as f32));

    let (tx, rx): (Sender<LoadedAsset>, Receiver<LoadedAsset>) = channel();
    let mut ui_state = UiState::new(lang);

    for (slot, path) in config.panoramas.iter().enumerate() {
        ui_state.pending_loads += 1;
        spawn_load(path.clone(), AssetSlot::Panorama(slot), tx.clone());
    }
    for marker in &viewer.scene.markers {
        if let Some(icon) = &marker.icon {
            ui_state.pending_loads += 1;
            spawn_load(icon.clone(), AssetSlot::MarkerIcon(marker.id), tx.clone());
        }
    }

    let mut session = ViewerSession::mount(viewer, renderer);

    let mut cursor = Vec2::ZERO;
    let mut last_frame = Instant::now();
    let mut fps_window_start = Instant::now();
    let mut frame_count = 0u32;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if !session.is_mounted() {
            *control_flow = ControlFlow::Exit;
            return;
        }

        while let Ok(asset) = rx.try_recv() {
            ui_state.pending_loads = ui_state.pending_loads.saturating_sub(1);
            deliver_asset(&mut session, &mut ui_state, asset);
        }

        match event {
            Event::WindowEvent { event, .. } => {
                if let Ok(renderer) = session.resources_mut("window event") {
                    let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                    if response.consumed {
                        return;
                    }
                }

                if let Err(e) = handle_window_event(
                    &mut session,
                    &mut ui_state,
                    &window,
                    &tx,
                    &mut cursor,
                    event,
                ) {
                    if e.is_recoverable() {
                        log::warn!("{}", e);
                    } else {
                        log::error!("{}", e);
                        session.unmount();
                    }
                }

                if !session.is_mounted() {
                    *control_flow = ControlFlow::Exit;
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32().min(0.1);
                last_frame = now;

                frame_count += 1;
                let window_secs = now.duration_since(fps_window_start).as_secs_f32();
                if window_secs >= 1.0 {
                    ui_state.fps = frame_count as f32 / window_secs;
                    frame_count = 0;
                    fps_window_start = now;
                }

                let mut actions = Vec::new();
                let result = session.frame(dt).and_then(|frame| {
                    let (viewer, renderer) = session.parts_mut("redraw")?;
                    renderer.update_frame(&frame);
                    let ui_state = &mut ui_state;
                    let render_result = renderer.render_with_ui(&window, |ctx| {
                        actions = draw_ui(ctx, viewer, ui_state, &frame);
                    });
                    Ok(render_result)
                });

                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(wgpu::SurfaceError::Lost)) => {
                        if let Ok(r) = session.resources_mut("surface lost") {
                            r.resize(r.size);
                        }
                    }
                    Ok(Err(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("GPU out of memory");
                        session.unmount();
                        *control_flow = ControlFlow::Exit;
                    }
                    Ok(Err(e)) => log::error!("render error: {:?}", e),
                    Err(e) => log::debug!("{}", e),
                }

                for action in actions {
                    apply_ui_action(&mut session, &mut ui_state, &window, &tx, action);
                }
                if !session.is_mounted() {
                    *control_flow = ControlFlow::Exit;
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn handle_window_event(
    session: &mut ViewerSession<Renderer>,
    ui_state: &mut UiState,
    window: &Window,
    tx: &Sender<LoadedAsset>,
    cursor: &mut Vec2,
    event: WindowEvent,
) -> Result<(), ViewerError> {
    match event {
        WindowEvent::CloseRequested => {
            session.unmount();
        }

        WindowEvent::Resized(new_size) => {
            session.resources_mut("resize")?.resize(new_size);
            session
                .viewer_mut("resize")?
                .resize(Vec2::new(new_size.width as f32, new_size.height as f32));
        }

        WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
            match input.virtual_keycode {
                Some(VirtualKeyCode::O) => {
                    if let Some(path) = pick_image_file() {
                        let slot = session.viewer().scene.sphere.current_texture();
                        ui_state.pending_loads += 1;
                        spawn_load(path, AssetSlot::Panorama(slot), tx.clone());
                    }
                }
                Some(VirtualKeyCode::F11) => toggle_fullscreen(ui_state, window),
                Some(VirtualKeyCode::R) => session.viewer_mut("reset")?.reset_view(),
                Some(VirtualKeyCode::Space) => {
                    session.viewer_mut("auto-rotate toggle")?.driver.toggle_auto_rotate()
                }
                _ => {}
            }
        }

        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => {
            let viewer = session.viewer_mut("pointer button")?;
            match state {
                ElementState::Pressed => viewer.pointer_down(*cursor),
                ElementState::Released => {
                    if let Some(hit) = viewer.pointer_up(*cursor) {
                        log::info!("marker {:?} clicked ({:?})", hit.id, hit.action);
                    }
                }
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            *cursor = Vec2::new(position.x as f32, position.y as f32);
            session.viewer_mut("pointer move")?.pointer_move(*cursor);
        }

        WindowEvent::CursorLeft { .. } => {
            session.viewer_mut("pointer leave")?.pointer_leave();
        }

        WindowEvent::MouseWheel { delta, .. } => {
            // DOM convention: positive delta scrolls down and zooms out
            let delta_y = match delta {
                MouseScrollDelta::LineDelta(_, y) => -y * 100.0,
                MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
            };
            session.viewer_mut("wheel")?.wheel(delta_y);
        }

        WindowEvent::DroppedFile(path) => {
            let slot = session.viewer().scene.sphere.current_texture();
            ui_state.pending_loads += 1;
            spawn_load(path, AssetSlot::Panorama(slot), tx.clone());
        }

        _ => {}
    }
    Ok(())
}

fn deliver_asset(session: &mut ViewerSession<Renderer>, ui_state: &mut UiState, asset: LoadedAsset) {
    let renderer = match session.resources_mut("asset delivery") {
        Ok(r) => r,
        Err(e) => {
            log::debug!("{}: dropping {:?}", e, asset.path);
            return;
        }
    };
    match asset.slot {
        AssetSlot::Panorama(slot) => renderer.load_panorama(slot, asset.image),
        AssetSlot::MarkerIcon(id) => {
            let ctx = renderer.egui_ctx.clone();
            ui_state.register_icon(&ctx, id, &asset.image);
        }
    }
}

fn apply_ui_action(
    session: &mut ViewerSession<Renderer>,
    ui_state: &mut UiState,
    window: &Window,
    tx: &Sender<LoadedAsset>,
    action: UiAction,
) {
    match action {
        UiAction::OpenPanorama { slot, path } => {
            ui_state.pending_loads += 1;
            spawn_load(path, AssetSlot::Panorama(slot), tx.clone());
        }
        UiAction::ToggleFullscreen => toggle_fullscreen(ui_state, window),
        UiAction::LanguageChanged => window.set_title(&i18n::tr("app.title")),
        UiAction::Exit => session.unmount(),
    }
}

fn toggle_fullscreen(ui_state: &mut UiState, window: &Window) {
    ui_state.is_fullscreen = !ui_state.is_fullscreen;
    if ui_state.is_fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}
