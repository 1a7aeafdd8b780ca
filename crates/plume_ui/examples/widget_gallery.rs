//! Widget Gallery
//!
//! Runs a few frames of a settings window without a GPU and logs what each
//! frame would hand to a render backend.
//!
//! Run with: RUST_LOG=debug cargo run -p plume_ui --example widget_gallery

use plume_core::Vec2;
use plume_platform::{Event, InputEvent, InputState, MouseButton, MouseEvent, WindowEvent};
use plume_text::FontAtlas;
use plume_ui::{Condition, UiClipper, UiContext, WindowFlags};

#[derive(Default)]
struct Settings {
    vsync: bool,
    gamma: f32,
    samples: i32,
    quality: i32,
    name: String,
    window_open: bool,
    show_demo: bool,
    show_debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut atlas = FontAtlas::new();
    atlas.add_default_font()?;
    atlas.build()?;

    let mut ui = UiContext::new();
    ui.set_font_atlas(&atlas);

    let mut input = InputState::new();
    input.handle_event(&Event::Window(WindowEvent::Resized {
        width: 1280.0,
        height: 720.0,
    }));

    let mut settings = Settings {
        gamma: 2.2,
        samples: 4,
        name: "plume".to_string(),
        window_open: true,
        ..Default::default()
    };

    // hover and click the VSync checkbox over a few frames
    let script = [
        MouseEvent::Moved { x: 35.0, y: 68.0 },
        MouseEvent::Moved { x: 35.0, y: 68.0 },
        MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 35.0,
            y: 68.0,
        },
        MouseEvent::ButtonReleased {
            button: MouseButton::Left,
            x: 35.0,
            y: 68.0,
        },
        MouseEvent::Moved { x: 400.0, y: 300.0 },
    ];

    for (frame, event) in script.into_iter().enumerate() {
        input.handle_event(&Event::Input(InputEvent::Mouse(event)));
        input.new_frame(1.0 / 60.0);

        ui.new_frame(&input);
        build_ui(&mut ui, &mut settings);
        let draw_data = ui.render();

        tracing::info!(
            frame,
            vertices = draw_data.vertices.len(),
            indices = draw_data.indices.len(),
            commands = draw_data.commands.len(),
            "frame rendered"
        );
    }

    tracing::info!(vsync = settings.vsync, gamma = settings.gamma, "final settings");
    Ok(())
}

fn build_ui(ui: &mut UiContext, settings: &mut Settings) {
    ui.set_next_window_pos(Vec2::new(20.0, 20.0), Condition::ONCE);
    ui.set_next_window_size(Vec2::new(360.0, 420.0), Condition::ONCE);
    if ui.begin_window("Settings", Some(&mut settings.window_open), WindowFlags::NONE) {
        ui.checkbox("VSync", &mut settings.vsync);
        if ui.was_last_item_hovered() {
            ui.tooltip("Sync presentation to the display refresh");
        }
        ui.slider_float_f("Gamma", &mut settings.gamma, 1.0, 3.0, "%.2f");
        ui.slider_int("Samples", &mut settings.samples, 1, 16);
        ui.input_text("Name", &mut settings.name);

        ui.layout_dynamic(0.0, 3);
        ui.radio_button("Low", &mut settings.quality, 0);
        ui.radio_button("Medium", &mut settings.quality, 1);
        ui.radio_button("High", &mut settings.quality, 2);
        ui.layout_dynamic(0.0, 1);

        ui.layout_dynamic(0.0, 2);
        ui.checkbox("Demo", &mut settings.show_demo);
        ui.checkbox("Debug", &mut settings.show_debug);
        ui.layout_dynamic(0.0, 1);

        ui.separator();
        if ui.begin_tab_bar("sections") {
            if ui.begin_tab("Log") {
                let mut clipper = UiClipper::new(500);
                while ui.step_clipper(&mut clipper) {
                    for line in clipper.display_start()..clipper.display_end() {
                        ui.text(&format!("[{line:03}] frame event"));
                    }
                }
                ui.end_tab();
            }
            if ui.begin_tab("About") {
                ui.labeled_text("Version", env!("CARGO_PKG_VERSION"));
                ui.end_tab();
            }
            ui.end_tab_bar();
        }
        ui.end_window();
    }

    ui.show_demo_window(&mut settings.show_demo);
    ui.show_debug_window(&mut settings.show_debug);
}
