use std::{sync::Arc, time::Instant};

use anyhow::Result;
use log::{error, info, warn};
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{CursorGrabMode, Window, WindowBuilder},
};

use crate::{
    config::{CameraConfig, Config},
    render::{camera::Camera, RenderState},
    scene::SceneManager,
};

pub mod input;
pub use input::*;

pub async fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?,
    );
    grab_cursor(&window);

    let mut camera = create_camera(&window, &config.camera);
    let mut render = RenderState::init(window.clone(), &config.assets.shader).await?;
    let mut scene = SceneManager::default();
    scene.prepare_scene(&mut render, &config.assets)?;
    info!("{} draws ready", render.draw_count());

    let camera_config = config.camera;
    let mut move_speed = camera_config.move_speed;
    let mut input = Input::default();
    let mut input_action = InputAction::default();
    let mut last_time = Instant::now();

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(move |event, target| {
        input.handle_event(&event);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => target.exit(),
                WindowEvent::Resized(size) => {
                    if size.width > 0 && size.height > 0 {
                        render.resize(size.width, size.height);
                        camera.set_aspect(size.width, size.height);
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Err(err) = render.redraw(&camera) {
                        error!("{:?}", err);
                        target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = now.duration_since(last_time).as_secs_f32();
                last_time = now;

                if input.is_just_pressed(KeyCode::Escape) {
                    target.exit();
                }
                input_action.update(&input);

                let wheel = input.get_mouse_delta_wheel().y;
                if wheel != 0.0 {
                    move_speed = (move_speed + wheel * camera_config.scroll_step)
                        .clamp(camera_config.min_move_speed, camera_config.max_move_speed);
                }
                let dpos = dt * move_speed * input_action.get_move();
                camera.translate_local(&dpos);
                let dmouse = input.get_mouse_delta_pos();
                camera.turn(dmouse.x, dmouse.y, camera_config.mouse_sensitivity);
                if let Some(projection) = input_action.get_projection() {
                    camera.set_projection(projection);
                }
                camera.calculate();

                input.end_frame();
                window.request_redraw();
            }
            Event::LoopExiting => render.textures.destroy_textures(),
            _ => {}
        }
    })?;
    Ok(())
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(err) => warn!("could not grab the cursor: {}", err),
    }
}

fn create_camera(window: &Window, config: &CameraConfig) -> Camera {
    let size = window.inner_size();
    let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
    Camera::from_config(config, aspect)
}
