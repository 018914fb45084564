use macroquad::prelude::*;
use macroquad_tilescene::Map;

fn window_conf() -> Conf {
    Conf {
        window_title: "Edit Tiles".into(),
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

        // Left click paints tile gid 1, right click erases.
        let gid = if is_mouse_button_down(MouseButton::Left) {
            Some(1)
        } else if is_mouse_button_down(MouseButton::Right) {
            Some(0)
        } else {
            None
        };
        if let (Some(gid), Some(ground)) = (
            gid,
            map.layer_mut(&["Ground"]).and_then(|l| l.as_tiles_mut()),
        ) {
            let (mx, my) = mouse_position();
            ground.set_tile_at_pixel(mx, my, gid);
        }

        clear_background(BLACK);
        map.draw_background();
        map.draw();

        draw_text("click to paint, right-click to erase", 20.0, 30.0, 30.0, WHITE);
        next_frame().await;
    }
}
