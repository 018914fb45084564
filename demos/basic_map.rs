use macroquad::prelude::*;
use macroquad_tilescene::Map;

fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut map = Map::load("assets/map.json")
        .await
        .expect("Failed to load map");

    loop {
        map.update(get_frame_time());

        clear_background(BLACK);
        map.draw_background();
        map.draw();

        draw_text(&format!("FPS: {}", get_fps()), 20.0, 30.0, 30.0, RED);
        next_frame().await;
    }
}
