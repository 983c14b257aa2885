use clap::Parser;
use entry::DemoEntry;
use settings::Settings;
use three_d::*;
mod common;
mod entry;
mod gui;
mod loader;
mod render;
mod settings;

pub fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Create a window (a canvas on web)
    let window = Window::new(WindowSettings {
        title: "Scene Demos".to_string(),
        #[cfg(not(target_arch = "wasm32"))]
        max_size: Some((1280, 720)),
        ..Default::default()
    })?;

    // Get the graphics context from the window
    let context: Context = window.gl();

    let mut camera: Camera = Camera::new_perspective(
        window.viewport(),
        vec3(4.0, 3.0, 6.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(45.0),
        0.1,
        100.0,
    );
    let mut control = OrbitControl::new(*camera.target(), 1.0, 50.0);
    let mut demo_entry = DemoEntry::new(&context, &settings)?;
    // Start the main render loop
    window.render_loop(
        move |mut frame_input| // Begin a new frame with an updated frame input
    {
        let escape = frame_input
            .events
            .iter()
            .any(|event| matches!(event, Event::KeyPress { kind: Key::Escape, .. }));
        if escape {
            log::info!("Escape pressed, leaving the render loop");
            return FrameOutput {
                exit: true,
                ..Default::default()
            };
        }

        // Ensure the viewport matches the current window viewport which changes if the window is resized
        camera.set_viewport(frame_input.viewport);
        if !demo_entry.drives_camera() {
            control.handle_events(&mut camera, &mut frame_input.events);
        }
        frame_input
            .screen()
            .clear(ClearState::color_and_depth(0.8, 0.8, 0.8, 1.0, 1.0));
        demo_entry.render_loop(&context, &mut camera, &mut frame_input);

        FrameOutput::default()
    },
    );
    Ok(())
}
