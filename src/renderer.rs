use crate::{
    config::Config,
    map::Map,
    player::Player,
    raycast::{Column, cast_columns},
    surface::DrawSurface,
};

/// Draw one frame: clear to black, one shaded rect per row per column, present.
pub fn render_frame<S: DrawSurface>(surface: &mut S, map: &Map, player: &Player, cfg: &Config) {
    surface.set_draw_color(0, 0, 0, 255);
    surface.clear();

    let columns = cast_columns(map, player, cfg);
    for (x, column) in columns.iter().enumerate() {
        draw_column(surface, x as u32, column, cfg);
    }

    surface.present();
}

fn draw_column<S: DrawSurface>(surface: &mut S, x: u32, column: &Column, cfg: &Config) {
    let (cw, ch) = (cfg.cell_width_x, cfg.cell_width_y);
    let px = (x * cw) as i32;
    for row in 0..cfg.num_rows {
        let [r, g, b] = column.row_color(row as i32, cfg.num_rows);
        surface.set_draw_color(r, g, b, 255);
        surface.fill_rect(px, (row * ch) as i32, cw, ch);
    }
}
